//! Loan application form and feature encoding

use crate::error::{AgentifyError, Result};
use serde::{Deserialize, Serialize};

// Sorted vocabularies, so codes match a label encoder fitted on training data
const GENDER: &[&str] = &["Female", "Male"];
const YES_NO: &[&str] = &["No", "Yes"];
const DEPENDENTS: &[&str] = &["0", "1", "2", "3+"];
const EDUCATION: &[&str] = &["Graduate", "Not Graduate"];
const PROPERTY_AREA: &[&str] = &["Rural", "Semiurban", "Urban"];

/// Number of model input features
pub const FEATURE_COUNT: usize = 11;

/// Applicant details as submitted
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoanApplication {
    #[serde(rename = "Gender")]
    pub gender: String,
    #[serde(rename = "Married")]
    pub married: String,
    #[serde(rename = "Dependents")]
    pub dependents: String,
    #[serde(rename = "Education")]
    pub education: String,
    #[serde(rename = "Self_Employed")]
    pub self_employed: String,
    #[serde(rename = "ApplicantIncome")]
    pub applicant_income: i64,
    #[serde(rename = "CoapplicantIncome")]
    pub coapplicant_income: f64,
    #[serde(rename = "LoanAmount")]
    pub loan_amount: f64,
    #[serde(rename = "Loan_Amount_Term")]
    pub loan_amount_term: i64,
    #[serde(rename = "Credit_History")]
    pub credit_history: i64,
    #[serde(rename = "Property_Area")]
    pub property_area: String,
}

impl LoanApplication {
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json)
            .map_err(|e| AgentifyError::Validation(format!("invalid loan application: {}", e)))
    }

    /// Encode into model column order
    pub fn features(&self) -> Result<Vec<f64>> {
        if self.applicant_income < 0 || self.coapplicant_income < 0.0 || self.loan_amount < 0.0 {
            return Err(AgentifyError::Validation(
                "incomes and loan amount must not be negative".to_string(),
            ));
        }
        if self.loan_amount_term <= 0 {
            return Err(AgentifyError::Validation(
                "Loan_Amount_Term must be positive".to_string(),
            ));
        }
        if !matches!(self.credit_history, 0 | 1) {
            return Err(AgentifyError::Validation(format!(
                "Credit_History must be 0 or 1, got {}",
                self.credit_history
            )));
        }

        Ok(vec![
            encode("Gender", GENDER, &self.gender)?,
            encode("Married", YES_NO, &self.married)?,
            encode("Dependents", DEPENDENTS, &self.dependents)?,
            encode("Education", EDUCATION, &self.education)?,
            encode("Self_Employed", YES_NO, &self.self_employed)?,
            self.applicant_income as f64,
            self.coapplicant_income,
            self.loan_amount,
            self.loan_amount_term as f64,
            self.credit_history as f64,
            encode("Property_Area", PROPERTY_AREA, &self.property_area)?,
        ])
    }
}

fn encode(column: &str, vocabulary: &[&str], value: &str) -> Result<f64> {
    let value = value.trim();
    vocabulary
        .iter()
        .position(|v| v.eq_ignore_ascii_case(value))
        .map(|code| code as f64)
        .ok_or_else(|| {
            AgentifyError::Validation(format!(
                "unknown {} {:?}, expected one of: {}",
                column,
                value,
                vocabulary.join(", ")
            ))
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    fn sample() -> LoanApplication {
        LoanApplication::from_json(
            r#"{
                "Gender": "Male",
                "Married": "Yes",
                "Dependents": "3+",
                "Education": "Not Graduate",
                "Self_Employed": "No",
                "ApplicantIncome": 5849,
                "CoapplicantIncome": 1508.0,
                "LoanAmount": 128.0,
                "Loan_Amount_Term": 360,
                "Credit_History": 1,
                "Property_Area": "Semiurban"
            }"#,
        )
        .unwrap()
    }

    #[test]
    fn test_features_in_column_order() {
        let features = sample().features().unwrap();
        assert_eq!(features.len(), FEATURE_COUNT);
        assert_eq!(
            features,
            vec![1.0, 1.0, 3.0, 1.0, 0.0, 5849.0, 1508.0, 128.0, 360.0, 1.0, 1.0]
        );
    }

    #[test]
    fn test_categories_ignore_case() {
        let mut app = sample();
        app.gender = "female".to_string();
        app.property_area = " URBAN ".to_string();
        let features = app.features().unwrap();
        assert_eq!(features[0], 0.0);
        assert_eq!(features[10], 2.0);
    }

    #[test]
    fn test_unknown_category() {
        let mut app = sample();
        app.dependents = "4".to_string();
        let err = app.features().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation);
        assert!(err.to_string().contains("Dependents"));
    }

    #[test]
    fn test_numeric_checks() {
        let mut app = sample();
        app.credit_history = 2;
        assert!(app.features().is_err());

        let mut app = sample();
        app.loan_amount = -1.0;
        assert!(app.features().is_err());
    }

    #[test]
    fn test_missing_field_is_validation_error() {
        let err = LoanApplication::from_json(r#"{"Gender": "Male"}"#).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation);
    }
}
