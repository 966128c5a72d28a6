//! Loan approval
//!
//! Applications are encoded into the classifier's feature layout and scored
//! by a pre-trained model served over HTTP.

mod application;
mod classifier;

pub use application::{LoanApplication, FEATURE_COUNT};
pub use classifier::{
    HttpLoanClassifier, LoanApprover, LoanClassifier, LoanDecision, LoanPrediction,
};
