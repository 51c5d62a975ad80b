//! Prompt templates for the order assistant.

use crate::summary::OrderSummary;

/// Words that mark a question as a chart request.
const CHART_KEYWORDS: &[&str] = &["plot", "graph", "chart", "กราฟ"];

/// Reply text when the model is asked for a chart but the data cannot support one.
pub const NOT_ENOUGH_DATA_FOR_CHART: &str = "Not enough data to plot a chart";

const PERSONA: &str = "You are a friendly, upbeat and approachable assistant that analyzes order data.";

const GROUNDING: &str = "Important: answer using only the data from the database. Do not make up any data. \
Reply in natural, casual language; emoji and playful phrasing are fine, \
but every figure must be accurate, on point and taken from the real data.";

/// True when `question` asks for a chart or trend plot.
pub fn is_chart_question(question: &str) -> bool {
    let question = question.to_lowercase();
    CHART_KEYWORDS.iter().any(|k| question.contains(k))
}

/// Prompt for an ordinary question: summary and question only.
pub fn chat_prompt(summary: &OrderSummary, question: &str) -> String {
    format!(
        "{PERSONA}\n\n\
         Summary: {summary}\n\n\
         Question: {question}\n\n\
         {GROUNDING}\n",
        summary = summary.summary,
    )
}

/// Prompt for a chart request: adds the daily and weekly series and asks for
/// chart JSON.
pub fn chart_prompt(summary: &OrderSummary, question: &str) -> String {
    format!(
        "{PERSONA}\n\n\
         Daily orders: {daily}\n\
         Weekly orders: {weekly}\n\
         Summary: {summary}\n\n\
         Question: {question}\n\n\
         {GROUNDING}\n\n\
         If the question is about a trend or a comparison, produce chart JSON in this format:\n\
         ```json\n\
         {{\n  \"labels\": [\"dates or weeks that exist in the data\"],\n  \"data\": [order quantities that exist in the data]\n}}\n\
         ```\n\
         Use only values that appear in the daily or weekly orders above.\n\
         If the data is insufficient, say \"{NOT_ENOUGH_DATA_FOR_CHART}\".\n",
        daily = summary.daily_orders,
        weekly = summary.weekly_orders,
        summary = summary.summary,
    )
}

/// Picks the chart or chat prompt depending on the question.
pub fn build_prompt(summary: &OrderSummary, question: &str) -> String {
    if is_chart_question(question) {
        chart_prompt(summary, question)
    } else {
        chat_prompt(summary, question)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn summary() -> OrderSummary {
        OrderSummary {
            summary: "Total orders: 3".into(),
            daily_orders: r#"[["2024-01-01",8.0]]"#.into(),
            weekly_orders: r#"[["2024-01-01",8.0]]"#.into(),
            loaded: true,
        }
    }

    #[test]
    fn detects_chart_questions() {
        assert!(is_chart_question("Can you PLOT daily orders?"));
        assert!(is_chart_question("show me a chart"));
        assert!(is_chart_question("ขอกราฟยอดขาย"));
        assert!(!is_chart_question("how many orders yesterday?"));
    }

    #[test]
    fn chat_prompt_omits_series() {
        let prompt = chat_prompt(&summary(), "How many orders?");
        assert!(prompt.contains("Summary: Total orders: 3"));
        assert!(prompt.contains("Question: How many orders?"));
        assert!(!prompt.contains("Daily orders"));
    }

    #[test]
    fn chart_prompt_includes_series_and_format() {
        let prompt = chart_prompt(&summary(), "plot it");
        assert!(prompt.contains(r#"Daily orders: [["2024-01-01",8.0]]"#));
        assert!(prompt.contains("Weekly orders:"));
        assert!(prompt.contains("\"labels\""));
        assert!(prompt.contains(NOT_ENOUGH_DATA_FOR_CHART));
    }

    #[test]
    fn build_prompt_dispatches() {
        assert!(build_prompt(&summary(), "graph please").contains("Daily orders"));
        assert!(!build_prompt(&summary(), "hello").contains("Daily orders"));
    }
}
