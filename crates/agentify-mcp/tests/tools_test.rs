//! Integration tests for MCP tools over in-process fakes

use agentify_core::{
    AgentifyError, AnswerPipeline, ContextSource, DocumentSource, Generator, LoanClassifier,
    LoanApprover, LoanDecision, MarketData, PipelineOptions, Result, RetrievedDocument,
    StockAnalyst, SymbolDirectory, WeeklyBar, WeeklySeries,
};
use agentify_mcp::tools::*;
use agentify_mcp::Services;
use async_trait::async_trait;
use serde_json::json;
use std::sync::Arc;

struct StaticSource {
    source: DocumentSource,
    contents: Vec<&'static str>,
}

#[async_trait]
impl ContextSource for StaticSource {
    fn name(&self) -> &str {
        "static"
    }

    fn source(&self) -> DocumentSource {
        self.source
    }

    fn may_fail(&self) -> bool {
        self.source == DocumentSource::WebSearch
    }

    async fn retrieve(&self, _question: &str) -> Result<Vec<RetrievedDocument>> {
        Ok(self
            .contents
            .iter()
            .map(|c| RetrievedDocument {
                content: c.to_string(),
                score: None,
                source: self.source,
            })
            .collect())
    }
}

struct CannedGenerator(&'static str);

#[async_trait]
impl Generator for CannedGenerator {
    async fn generate(&self, _prompt: &str) -> Result<String> {
        Ok(self.0.to_string())
    }

    fn model_name(&self) -> &str {
        "canned"
    }
}

struct FlatMarket;

#[async_trait]
impl MarketData for FlatMarket {
    async fn weekly_series(&self, symbol: &str) -> Result<WeeklySeries> {
        let bars = (1..=8)
            .map(|day| WeeklyBar {
                date: chrono_date(day),
                open: 10.0,
                high: 12.0,
                low: 9.0,
                close: 10.0 + day as f64,
                volume: 500,
            })
            .collect();
        Ok(WeeklySeries::new(symbol, bars))
    }
}

fn chrono_date(day: u32) -> chrono::NaiveDate {
    chrono::NaiveDate::from_ymd_opt(2024, 3, day).unwrap()
}

struct RejectingClassifier;

#[async_trait]
impl LoanClassifier for RejectingClassifier {
    async fn predict(&self, features: &[f64]) -> Result<LoanDecision> {
        if features.len() != 11 {
            return Err(AgentifyError::ExternalError("bad feature count".to_string()));
        }
        Ok(LoanDecision::Rejected)
    }
}

fn services() -> Services {
    let answers = AnswerPipeline::new(
        Arc::new(StaticSource {
            source: DocumentSource::VectorIndex,
            contents: vec!["SBI Regular Savings: 2.7% interest"],
        }),
        Arc::new(StaticSource {
            source: DocumentSource::WebSearch,
            contents: vec!["HDFC savings rate 3%"],
        }),
        Arc::new(CannedGenerator("HDFC pays slightly more.")),
        PipelineOptions::default(),
    );

    let directory = Arc::new(
        SymbolDirectory::from_reader("symbol,name\nHDB,HDFC Bank Ltd\n".as_bytes()).unwrap(),
    );
    let stocks = StockAnalyst::new(directory.clone(), Arc::new(FlatMarket))
        .with_generator(Arc::new(CannedGenerator("2024: flat")));

    Services {
        answers: Some(answers),
        directory: Some(directory),
        stocks: Some(stocks),
        loans: Some(LoanApprover::new(Arc::new(RejectingClassifier))),
    }
}

#[tokio::test]
async fn test_ask_question_tool() {
    let args = json!({"question": "Which savings account pays more?"});
    let result = handle_ask_question(&services(), args).await.unwrap();

    let structured = result.structured_content.unwrap();
    assert_eq!(structured["question"], "Which savings account pays more?");
    assert_eq!(structured["answer"], "HDFC pays slightly more.");
}

#[tokio::test]
async fn test_ask_question_rejects_empty() {
    let err = handle_ask_question(&services(), json!({"question": ""}))
        .await
        .unwrap_err();
    assert!(agentify_mcp::server::describe_error(&err).starts_with("ValidationFailure:"));
}

#[tokio::test]
async fn test_stock_tools() {
    let services = services();

    let symbol = handle_get_stock_symbol(&services, json!({"company_name": "hdfc"}))
        .await
        .unwrap();
    assert_eq!(symbol.structured_content.unwrap()["stock_symbol"], "HDB");

    let weeks = handle_past_five_weeks(&services, json!({"company_name": "hdfc"}))
        .await
        .unwrap();
    let structured = weeks.structured_content.unwrap();
    let weeks = structured["weeks"].as_array().unwrap();
    assert_eq!(weeks.len(), 5);
    assert_eq!(weeks[0]["date"], "2024-03-08");

    let analysis = handle_analyze_stock(&services, json!({"company_name": "hdfc"}))
        .await
        .unwrap();
    assert_eq!(analysis.structured_content.unwrap()["analysis"], "2024: flat");
}

#[tokio::test]
async fn test_stock_tool_requires_company() {
    let err = handle_get_stock_symbol(&services(), json!({})).await.unwrap_err();
    assert!(err.to_string().contains("company_name"));
}

#[tokio::test]
async fn test_loan_approval_tool() {
    let args = json!({
        "Gender": "Male", "Married": "No", "Dependents": "1",
        "Education": "Graduate", "Self_Employed": "No",
        "ApplicantIncome": 3000, "CoapplicantIncome": 0.0, "LoanAmount": 66.0,
        "Loan_Amount_Term": 360, "Credit_History": 0, "Property_Area": "Urban"
    });

    let result = handle_loan_approval(&services(), args).await.unwrap();
    assert_eq!(
        result.structured_content.unwrap(),
        json!({"Loan_Approval_Prediction": "N"})
    );
}

#[tokio::test]
async fn test_health_reports_configured_tools() {
    let result = handle_health(&services()).await.unwrap();
    let structured = result.structured_content.unwrap();
    assert_eq!(structured["status"], "Healthy");
    assert_eq!(structured["tools"]["ask_question"], true);
    assert_eq!(structured["tools"]["analyze_stock"], true);

    let result = handle_health(&Services::default()).await.unwrap();
    assert_eq!(result.structured_content.unwrap()["tools"]["loan_approval"], false);
}
