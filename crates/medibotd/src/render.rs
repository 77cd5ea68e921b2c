//! HTML rendering of the exchange history page.

use medibot_common::Exchange;

const PAGE_HEAD: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<title>Medical Chatbot - History</title>
<style>
body { font-family: sans-serif; max-width: 960px; margin: 2em auto; color: #222; }
.exchange { border: 1px solid #ddd; border-radius: 6px; padding: 1em; margin-bottom: 1em; }
.meta { color: #777; font-size: 0.85em; }
.response { white-space: pre-wrap; }
table.scores td { padding: 0 1em 0 0; }
</style>
</head>
<body>
<h1>Conversation history</h1>
"#;

const PAGE_TAIL: &str = "</body>\n</html>\n";

/// Escape text for inclusion in HTML element content or attributes
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

fn format_score(score: Option<f64>) -> String {
    score
        .map(|s| format!("{:.2}", s))
        .unwrap_or_else(|| "n/a".to_string())
}

/// Render the history page; `exchanges` are expected most recent first
pub fn render_history(exchanges: &[Exchange]) -> String {
    let mut html = String::from(PAGE_HEAD);

    if exchanges.is_empty() {
        html.push_str("<p>No conversations yet.</p>\n");
    }

    for exchange in exchanges {
        let scores = &exchange.scores;
        html.push_str(&format!(
            r#"<div class="exchange" id="exchange-{id}">
<div class="meta">#{id} &middot; {created}</div>
<p><strong>Q:</strong> {query}</p>
<div class="response">{response}</div>
<table class="scores"><tr><td>ROUGE-1: {r1}</td><td>ROUGE-2: {r2}</td><td>ROUGE-L: {rl}</td><td>BLEU: {bleu}</td></tr></table>
</div>
"#,
            id = exchange.id,
            created = exchange.created_at.format("%Y-%m-%d %H:%M:%S UTC"),
            query = escape_html(&exchange.query),
            response = escape_html(&exchange.response),
            r1 = format_score(scores.rouge1),
            r2 = format_score(scores.rouge2),
            rl = format_score(scores.rouge_l),
            bleu = format_score(scores.bleu),
        ));
    }

    html.push_str(PAGE_TAIL);
    html
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use medibot_common::Scores;

    fn exchange(id: i64, query: &str, response: &str, scores: Scores) -> Exchange {
        Exchange {
            id,
            query: query.to_string(),
            response: response.to_string(),
            scores,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_escape_html() {
        assert_eq!(
            escape_html(r#"<script>alert("x") & 'y'</script>"#),
            "&lt;script&gt;alert(&quot;x&quot;) &amp; &#39;y&#39;&lt;/script&gt;"
        );
        assert_eq!(escape_html("plain text"), "plain text");
    }

    #[test]
    fn test_render_empty_history() {
        let html = render_history(&[]);
        assert!(html.contains("No conversations yet."));
        assert!(html.ends_with("</html>\n"));
    }

    #[test]
    fn test_render_escapes_and_formats_scores() {
        let scores = Scores {
            rouge1: Some(0.8),
            ..Default::default()
        };
        let html = render_history(&[exchange(3, "<b>dose?</b>", "Take **one**.", scores)]);
        assert!(html.contains("&lt;b&gt;dose?&lt;/b&gt;"));
        assert!(!html.contains("<b>dose?</b>"));
        assert!(html.contains("ROUGE-1: 0.80"));
        assert!(html.contains("BLEU: n/a"));
        assert!(html.contains(r#"id="exchange-3""#));
    }

    #[test]
    fn test_render_keeps_given_order() {
        let html = render_history(&[
            exchange(2, "newer", "b", Scores::default()),
            exchange(1, "older", "a", Scores::default()),
        ]);
        let newer = html.find("newer").unwrap();
        let older = html.find("older").unwrap();
        assert!(newer < older);
    }
}
