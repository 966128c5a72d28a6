//! Terminal output formatter

use agentify_core::{Answer, StockAnalysis, WeeklyBar};

pub fn format_answer(answer: &Answer) -> String {
    let mut output = answer.answer.trim_end().to_string();
    output.push('\n');
    output
}

pub fn format_analysis(analysis: &StockAnalysis) -> String {
    format!(
        "{} ({})\n\n{}\n",
        analysis.company_name,
        analysis.stock_symbol,
        analysis.analysis.trim_end()
    )
}

pub fn format_weeks(weeks: &[WeeklyBar]) -> String {
    if weeks.is_empty() {
        return "No weekly data\n".to_string();
    }

    let mut output = format!(
        "{:<10} {:>10} {:>10} {:>10} {:>10} {:>14}\n",
        "Date", "Open", "High", "Low", "Close", "Volume"
    );
    for bar in weeks {
        output.push_str(&format!(
            "{:<10} {:>10.2} {:>10.2} {:>10.2} {:>10.2} {:>14}\n",
            bar.date.to_string(),
            bar.open,
            bar.high,
            bar.low,
            bar.close,
            bar.volume
        ));
    }
    output
}
