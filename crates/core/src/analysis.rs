//! The final, typed result of analyzing one take.

use serde::{Deserialize, Serialize};

use crate::chart::ChartSpec;

/// Maximum roast length: one post.
pub const MAX_ROAST_CHARS: usize = 280;

/// Verdict, roast and receipts for a take.
///
/// `verdict` is expected to be "trash", "mid" or "valid" but any string the
/// model produced is kept as-is.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TakeAnalysis {
    pub verdict: String,
    /// In [0, 1]
    pub confidence: f64,
    /// At most [`MAX_ROAST_CHARS`] characters
    pub roast: String,
    pub reasoning: String,
    pub stats_used: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chart_data: Option<ChartSpec>,
    #[serde(skip)]
    pub chart_png: Option<Vec<u8>>,
}

/// Truncate to the first `max` characters (not bytes).
pub fn truncate_chars(text: &str, max: usize) -> String {
    match text.char_indices().nth(max) {
        Some((idx, _)) => text[..idx].to_string(),
        None => text.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truncate_counts_characters() {
        let s = "é".repeat(300);
        let t = truncate_chars(&s, MAX_ROAST_CHARS);
        assert_eq!(t.chars().count(), 280);
    }

    #[test]
    fn truncate_short_is_identity() {
        assert_eq!(truncate_chars("cooked", 280), "cooked");
        assert_eq!(truncate_chars("", 280), "");
    }

    #[test]
    fn chart_png_not_serialized() {
        let analysis = TakeAnalysis {
            verdict: "trash".into(),
            confidence: 0.9,
            roast: "r".into(),
            reasoning: String::new(),
            stats_used: vec![],
            chart_data: None,
            chart_png: Some(vec![1, 2, 3]),
        };
        let json = serde_json::to_string(&analysis).unwrap();
        assert!(!json.contains("chart_png"));
    }
}
