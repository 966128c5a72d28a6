//! Config inspection commands

use crate::app::{ConfigAction, ConfigArgs, OutputFormat};
use crate::output;
use agentify_core::config::CONFIG_PATH_ENV;
use agentify_core::{Config, Result as CoreResult};
use anyhow::Result;
use serde::Serialize;

#[derive(Serialize)]
struct FeatureStatus {
    feature: &'static str,
    ready: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    problem: Option<String>,
}

impl FeatureStatus {
    fn new(feature: &'static str, check: CoreResult<()>) -> Self {
        Self {
            feature,
            ready: check.is_ok(),
            problem: check.err().map(|e| e.to_string()),
        }
    }
}

pub async fn run(args: ConfigArgs, config: &Config, format: OutputFormat) -> Result<()> {
    match args.action {
        ConfigAction::Check => {
            let source = std::env::var(CONFIG_PATH_ENV)
                .unwrap_or_else(|_| Config::default_path().display().to_string());
            let statuses = vec![
                FeatureStatus::new("ask", config.validate_for_answering()),
                FeatureStatus::new("stock weeks", config.validate_for_market_data()),
                FeatureStatus::new("stock analyze", config.validate_for_stock_analysis()),
                FeatureStatus::new("loan", config.validate_for_loans()),
            ];

            match format {
                OutputFormat::Json => {
                    let value = serde_json::json!({
                        "config_path": source,
                        "features": statuses,
                    });
                    print!("{}", output::json::to_pretty(&value)?);
                }
                OutputFormat::Cli => {
                    println!("Config file: {}", source);
                    println!();
                    for status in &statuses {
                        match status.problem {
                            None => println!("  ok       {}", status.feature),
                            Some(ref problem) => {
                                println!("  missing  {}: {}", status.feature, problem)
                            }
                        }
                    }
                }
            }
        }
        ConfigAction::Show => {
            let mut value = serde_json::to_value(config)?;
            redact(&mut value);
            // Same rendering for both formats
            print!("{}", output::json::to_pretty(&value)?);
        }
    }
    Ok(())
}

/// Replace every `api_key` value with a placeholder
fn redact(value: &mut serde_json::Value) {
    match value {
        serde_json::Value::Object(map) => {
            for (key, entry) in map.iter_mut() {
                if key == "api_key" {
                    *entry = serde_json::Value::String("********".to_string());
                } else {
                    redact(entry);
                }
            }
        }
        serde_json::Value::Array(items) => items.iter_mut().for_each(redact),
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_redact_nested_keys() {
        let mut value = serde_json::json!({
            "generation": {"api_key": "secret", "model": "gemini-pro"},
            "vector_index": {"host": "h", "api_key": "pc"}
        });
        redact(&mut value);
        assert_eq!(value["generation"]["api_key"], "********");
        assert_eq!(value["generation"]["model"], "gemini-pro");
        assert_eq!(value["vector_index"]["api_key"], "********");
    }
}
