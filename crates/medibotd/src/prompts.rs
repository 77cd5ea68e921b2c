//! Prompt building for the generation and evaluation calls.

/// Fallback shown to the user when the generation endpoint is unavailable
pub const APOLOGY: &str =
    "I'm having trouble connecting to my knowledge base right now. Please try again later.";

/// Score labels the evaluation model is asked to emit, in order
pub const SCORE_LABELS: [&str; 4] = ["ROUGE-1", "ROUGE-2", "ROUGE-L", "BLEU"];

/// Build the medical-assistant prompt embedding the user's query
pub fn build_generation_prompt(query: &str) -> String {
    format!(
        r#"You are a helpful medical assistant chatbot. You provide general medical information but always remind users that they should consult with a healthcare professional for specific medical advice or emergencies.

User query: {query}

Please provide a helpful, accurate response with medical information.
Format your response using Markdown for better readability."#
    )
}

/// Build the scoring prompt for a query/response pair.
///
/// The model is asked for one `LABEL: score` line per metric and nothing else.
pub fn build_evaluation_prompt(query: &str, response: &str) -> String {
    let format_lines: Vec<String> = SCORE_LABELS
        .iter()
        .map(|label| format!("{}: [score]", label))
        .collect();

    format!(
        r#"Evaluate the following AI response to a medical query using ROUGE-1, ROUGE-2, ROUGE-L, and BLEU scores.

User Query: {query}
AI Response: {response}

Calculate and provide only the numerical scores (between 0 and 1) in this exact format:
{format}

Do not include any other text or explanations and always give some score in way illustrated above."#,
        format = format_lines.join("\n")
    )
}
