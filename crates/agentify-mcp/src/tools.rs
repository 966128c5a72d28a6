//! MCP tool definitions and handlers

use crate::protocol::*;
use agentify_core::{
    AgentifyError, AlphaVantageClient, AnswerPipeline, Config, HttpGenerator, LoanApplication,
    LoanApprover, StockAnalyst, SymbolDirectory,
};
use anyhow::Result;
use serde_json::Value;
use std::sync::Arc;

/// Clients the tools run against. Question answering is required; a stock
/// or loan feature whose settings are incomplete is left out and its tools
/// report a configuration failure.
#[derive(Default)]
pub struct Services {
    pub answers: Option<AnswerPipeline>,
    pub directory: Option<Arc<SymbolDirectory>>,
    pub stocks: Option<StockAnalyst>,
    pub loans: Option<LoanApprover>,
}

impl Services {
    /// Fails when the answer pipeline cannot be built
    pub fn from_config(config: &Config) -> agentify_core::Result<Self> {
        let answers = Some(AnswerPipeline::from_config(config)?);

        let directory = SymbolDirectory::from_path(&config.market_data.listing_path)
            .map(Arc::new)
            .map_err(|e| tracing::warn!("Symbol lookups disabled: {}", e))
            .ok();

        let stocks = directory.as_ref().and_then(|dir| {
            let market = config
                .validate_for_market_data()
                .and_then(|_| AlphaVantageClient::from_config(&config.market_data))
                .map_err(|e| tracing::warn!("Stock data tools disabled: {}", e))
                .ok()?;
            let analyst = StockAnalyst::new(dir.clone(), Arc::new(market));

            match config
                .validate_for_stock_analysis()
                .and_then(|_| HttpGenerator::from_config(&config.generation))
            {
                Ok(generator) => Some(analyst.with_generator(Arc::new(generator))),
                Err(e) => {
                    tracing::warn!("analyze_stock disabled: {}", e);
                    Some(analyst)
                }
            }
        });

        let loans = LoanApprover::from_config(config)
            .map_err(|e| tracing::warn!("loan_approval disabled: {}", e))
            .ok();

        Ok(Self {
            answers,
            directory,
            stocks,
            loans,
        })
    }
}

fn unavailable(feature: &str) -> anyhow::Error {
    AgentifyError::Config(format!(
        "{} is not configured; run `agentify config check`",
        feature
    ))
    .into()
}

fn company_arg(args: &Value) -> Result<String> {
    args.get("company_name")
        .and_then(|v| v.as_str())
        .map(str::to_string)
        .ok_or_else(|| AgentifyError::Validation("Missing company_name".to_string()).into())
}

fn company_schema(description: &str) -> Value {
    serde_json::json!({
        "type": "object",
        "properties": {
            "company_name": {
                "type": "string",
                "description": description
            }
        },
        "required": ["company_name"]
    })
}

pub fn ask_question_tool_definition() -> ToolDefinition {
    ToolDefinition {
        name: "ask_question".to_string(),
        description: "Answer a question about SBI and HDFC cards and accounts, grounded in the \
                      product knowledge base and live web results"
            .to_string(),
        input_schema: serde_json::json!({
            "type": "object",
            "properties": {
                "question": {
                    "type": "string",
                    "description": "Natural-language banking question"
                }
            },
            "required": ["question"]
        }),
    }
}

pub fn get_stock_symbol_tool_definition() -> ToolDefinition {
    ToolDefinition {
        name: "get_stock_symbol".to_string(),
        description: "Resolve a company name to its ticker symbol".to_string(),
        input_schema: company_schema("Company name or part of it"),
    }
}

pub fn analyze_stock_tool_definition() -> ToolDefinition {
    ToolDefinition {
        name: "analyze_stock".to_string(),
        description: "Year-by-year performance analysis from weekly price history".to_string(),
        input_schema: company_schema("Company to analyze"),
    }
}

pub fn past_five_weeks_tool_definition() -> ToolDefinition {
    ToolDefinition {
        name: "past_five_weeks".to_string(),
        description: "Open, high, low, close and volume for the five most recent weeks"
            .to_string(),
        input_schema: company_schema("Company to look up"),
    }
}

pub fn loan_approval_tool_definition() -> ToolDefinition {
    ToolDefinition {
        name: "loan_approval".to_string(),
        description: "Predict whether a loan application would be approved (Y or N)".to_string(),
        input_schema: serde_json::json!({
            "type": "object",
            "properties": {
                "Gender": {"type": "string", "enum": ["Male", "Female"]},
                "Married": {"type": "string", "enum": ["Yes", "No"]},
                "Dependents": {"type": "string", "enum": ["0", "1", "2", "3+"]},
                "Education": {"type": "string", "enum": ["Graduate", "Not Graduate"]},
                "Self_Employed": {"type": "string", "enum": ["Yes", "No"]},
                "ApplicantIncome": {"type": "integer"},
                "CoapplicantIncome": {"type": "number"},
                "LoanAmount": {"type": "number", "description": "In thousands"},
                "Loan_Amount_Term": {"type": "integer", "description": "In months"},
                "Credit_History": {"type": "integer", "enum": [0, 1]},
                "Property_Area": {"type": "string", "enum": ["Urban", "Semiurban", "Rural"]}
            },
            "required": [
                "Gender", "Married", "Dependents", "Education", "Self_Employed",
                "ApplicantIncome", "CoapplicantIncome", "LoanAmount", "Loan_Amount_Term",
                "Credit_History", "Property_Area"
            ]
        }),
    }
}

pub fn health_tool_definition() -> ToolDefinition {
    ToolDefinition {
        name: "health".to_string(),
        description: "Report server health and which tools are configured".to_string(),
        input_schema: serde_json::json!({
            "type": "object",
            "properties": {}
        }),
    }
}

pub fn all_tool_definitions() -> Vec<ToolDefinition> {
    vec![
        ask_question_tool_definition(),
        get_stock_symbol_tool_definition(),
        analyze_stock_tool_definition(),
        past_five_weeks_tool_definition(),
        loan_approval_tool_definition(),
        health_tool_definition(),
    ]
}

pub async fn handle_ask_question(services: &Services, args: Value) -> Result<ToolResult> {
    let question = args
        .get("question")
        .and_then(|v| v.as_str())
        .ok_or_else(|| AgentifyError::Validation("Missing question".to_string()))?;

    let pipeline = services
        .answers
        .as_ref()
        .ok_or_else(|| unavailable("ask_question"))?;
    let answer = pipeline.answer(question).await?;

    Ok(ToolResult::text(
        answer.answer.clone(),
        serde_json::to_value(&answer)?,
    ))
}

pub async fn handle_get_stock_symbol(services: &Services, args: Value) -> Result<ToolResult> {
    let company = company_arg(&args)?;
    let directory = services
        .directory
        .as_ref()
        .ok_or_else(|| unavailable("get_stock_symbol"))?;

    let symbol = directory.resolve(&company)?;

    Ok(ToolResult::text(
        format!("{}: {}", symbol.company_name, symbol.stock_symbol),
        serde_json::to_value(&symbol)?,
    ))
}

pub async fn handle_analyze_stock(services: &Services, args: Value) -> Result<ToolResult> {
    let company = company_arg(&args)?;
    let analyst = services
        .stocks
        .as_ref()
        .ok_or_else(|| unavailable("analyze_stock"))?;

    let analysis = analyst.analyze(&company).await?;
    Ok(ToolResult::text(
        analysis.analysis.clone(),
        serde_json::to_value(&analysis)?,
    ))
}

pub async fn handle_past_five_weeks(services: &Services, args: Value) -> Result<ToolResult> {
    let company = company_arg(&args)?;
    let analyst = services
        .stocks
        .as_ref()
        .ok_or_else(|| unavailable("past_five_weeks"))?;

    let weeks = analyst.past_weeks(&company).await?;

    let mut text = String::new();
    for bar in &weeks {
        text.push_str(&format!(
            "{}: open {:.2}, high {:.2}, low {:.2}, close {:.2}, volume {}\n",
            bar.date, bar.open, bar.high, bar.low, bar.close, bar.volume
        ));
    }

    Ok(ToolResult::text(
        text,
        serde_json::json!({
            "company_name": company,
            "weeks": weeks,
        }),
    ))
}

pub async fn handle_loan_approval(services: &Services, args: Value) -> Result<ToolResult> {
    let application: LoanApplication = serde_json::from_value(args)
        .map_err(|e| AgentifyError::Validation(format!("invalid loan application: {}", e)))?;
    let approver = services
        .loans
        .as_ref()
        .ok_or_else(|| unavailable("loan_approval"))?;

    let result = approver.approve(&application).await?;
    Ok(ToolResult::text(
        format!("Loan_Approval_Prediction: {}", result.prediction.as_str()),
        serde_json::to_value(result)?,
    ))
}

pub async fn handle_health(services: &Services) -> Result<ToolResult> {
    let stocks = services.stocks.as_ref();
    let structured = serde_json::json!({
        "status": "Healthy",
        "message": "API is running smoothly!",
        "tools": {
            "ask_question": services.answers.is_some(),
            "get_stock_symbol": services.directory.is_some(),
            "analyze_stock": stocks.is_some_and(|s| s.can_analyze()),
            "past_five_weeks": stocks.is_some(),
            "loan_approval": services.loans.is_some(),
        }
    });

    Ok(ToolResult::text(
        "Healthy: API is running smoothly!",
        structured,
    ))
}
