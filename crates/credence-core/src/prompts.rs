//! Prompt templates.

/// Max article characters embedded in an analysis prompt.
pub const ANALYSIS_MAX_CHARS: usize = 4000;

/// Prompt asking for exactly one risk label token.
pub fn classification(article: &str) -> String {
    format!(
        r#"You are a news credibility risk classifier.

Task:
Given a news article, classify it strictly into one of the following labels:
- LOW_RISK
- MEDIUM_RISK
- HIGH_RISK

Rules:
- Output ONLY the label.
- Do NOT explain.
- Do NOT add extra text.
- Be consistent across similar articles.

Article:
"{article}"
"#
    )
}

/// Prompt asking for a JSON credibility assessment.
pub fn analysis(article: &str) -> String {
    let excerpt: String = article.chars().take(ANALYSIS_MAX_CHARS).collect();
    let excerpt = excerpt.replace('"', "\\\"");
    format!(
        r#"You are an expert news analyst. Analyze the following article for misinformation risk.
Return a valid JSON object with:
- "score": A credibility score between 0 (fake/misleading) and 100 (highly credible).
- "risk": One of "Low", "Medium", "High".
- "explanation": A concise 1-2 sentence explanation of why.

Article Text:
"{excerpt}""#
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classification_embeds_article_verbatim() {
        let article = "He said \"now\", twice.";
        let prompt = classification(article);
        assert!(prompt.contains(article));
        for token in ["LOW_RISK", "MEDIUM_RISK", "HIGH_RISK"] {
            assert!(prompt.contains(token));
        }
        assert!(prompt.contains("Output ONLY the label."));
    }

    #[test]
    fn analysis_truncates_by_chars_and_escapes_quotes() {
        let article = "é".repeat(ANALYSIS_MAX_CHARS + 50);
        let prompt = analysis(&article);
        assert_eq!(prompt.matches('é').count(), ANALYSIS_MAX_CHARS);

        let prompt = analysis("a \"quoted\" claim");
        assert!(prompt.contains(r#"a \"quoted\" claim"#));
        assert!(prompt.ends_with('"'));
    }
}
