use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SentimentLabel {
    Positive,
    Negative,
    Neutral,
}

impl fmt::Display for SentimentLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SentimentLabel::Positive => write!(f, "positive"),
            SentimentLabel::Negative => write!(f, "negative"),
            SentimentLabel::Neutral => write!(f, "neutral"),
        }
    }
}

impl FromStr for SentimentLabel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "positive" | "pos" | "label_1" => Ok(SentimentLabel::Positive),
            "negative" | "neg" | "label_2" => Ok(SentimentLabel::Negative),
            "neutral" | "neu" | "label_0" => Ok(SentimentLabel::Neutral),
            _ => Err(format!("Unknown sentiment label: {s}")),
        }
    }
}

/// Classifier output for a single text.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SentimentScore {
    pub label: SentimentLabel,
    pub score: f64,
}

/// Per-article sentiment row returned to clients.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SentimentResult {
    pub title: String,
    pub snippet: String,
    pub url: String,
    pub sentiment: SentimentLabel,
    pub score: f64,
}

/// First two `". "`-separated sentences of `content`, joined with a space.
pub fn snippet(content: &str) -> String {
    content.split(". ").take(2).collect::<Vec<_>>().join(" ")
}

pub fn round4(x: f64) -> f64 {
    (x * 10_000.0).round() / 10_000.0
}
