//! On-demand article digests from a local generative model server
//! (Ollama-style generate endpoint).

use std::fmt;
use std::time::Duration;

use regex::Regex;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::app::{InletError, Result};

/// Hard cap on article text embedded in the prompt.
pub const MAX_ARTICLE_CHARS: usize = 15_000;
/// Placeholder used when the model response doesn't match the expected
/// format.
pub const UNAVAILABLE: &str = "Summary unavailable";

const SUMMARIZE_TIMEOUT: Duration = Duration::from_secs(60);

#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    stream: bool,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    response: String,
}

/// Parsed digest: a one-line TLDR plus bullet key points.
#[derive(Debug, Clone, PartialEq)]
pub struct Digest {
    pub tldr: String,
    pub key_points: Vec<String>,
}

impl fmt::Display for Digest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "TLDR: {}", self.tldr)?;
        for point in &self.key_points {
            writeln!(f, "  - {point}")?;
        }
        Ok(())
    }
}

pub struct Summarizer {
    client: Client,
    endpoint: String,
    model: String,
}

impl Summarizer {
    pub fn new(endpoint: String, model: String) -> Self {
        let client = Client::builder()
            .timeout(SUMMARIZE_TIMEOUT)
            .build()
            .expect("Failed to build HTTP client");
        Self {
            client,
            endpoint,
            model,
        }
    }

    pub async fn summarize(&self, title: &str, text: &str) -> Result<Digest> {
        let prompt = build_prompt(title, text);
        let request = GenerateRequest {
            model: &self.model,
            prompt: &prompt,
            stream: false,
        };

        let response = self
            .client
            .post(format!("{}/api/generate", self.endpoint.trim_end_matches('/')))
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(InletError::Other(format!(
                "summarization endpoint returned HTTP {status}: {body}"
            )));
        }

        let parsed: GenerateResponse = response.json().await?;
        Ok(parse_digest(&parsed.response))
    }

    /// Convert a fetched article page to plain text for the prompt.
    pub fn page_to_text(html: &str) -> Option<String> {
        let text = html2text::from_read(html.as_bytes(), 80).ok()?;
        let cleaned: String = text
            .lines()
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .collect::<Vec<_>>()
            .join("\n");
        if cleaned.is_empty() {
            None
        } else {
            Some(cleaned)
        }
    }
}

fn build_prompt(title: &str, text: &str) -> String {
    let body = truncate_chars(text, MAX_ARTICLE_CHARS);
    format!(
        "Summarize the following article.\n\
         Respond with exactly one line starting with \"TLDR:\" followed by\n\
         3-5 key points, one per line, each starting with \"- \".\n\n\
         Title: {title}\n\nArticle:\n{body}"
    )
}

/// Char-boundary-safe truncation.
fn truncate_chars(s: &str, max: usize) -> &str {
    match s.char_indices().nth(max) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}

/// Fixed-format parse of the model output. A response without a TLDR line
/// degrades to the explicit placeholder instead of erroring.
pub fn parse_digest(text: &str) -> Digest {
    let tldr_re = Regex::new(r"(?m)^\s*TLDR:\s*(.+)$").expect("valid tldr regex");
    let bullet_re = Regex::new(r"(?m)^\s*[-*\u{2022}]\s+(.+)$").expect("valid bullet regex");

    let Some(tldr) = tldr_re
        .captures(text)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().trim().to_string())
    else {
        return Digest {
            tldr: UNAVAILABLE.to_string(),
            key_points: Vec::new(),
        };
    };

    let key_points = bullet_re
        .captures_iter(text)
        .filter_map(|caps| caps.get(1))
        .map(|m| m.as_str().trim().to_string())
        .collect();

    Digest { tldr, key_points }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_well_formed_response() {
        let text = "TLDR: The gist of it.\n- First point\n- Second point\n* Third point\n";
        let digest = parse_digest(text);
        assert_eq!(digest.tldr, "The gist of it.");
        assert_eq!(
            digest.key_points,
            vec!["First point", "Second point", "Third point"]
        );
    }

    #[test]
    fn test_parse_tldr_mid_response() {
        let text = "Sure, here's a summary:\n\nTLDR: Buried lede.\n- Only point\n";
        let digest = parse_digest(text);
        assert_eq!(digest.tldr, "Buried lede.");
        assert_eq!(digest.key_points, vec!["Only point"]);
    }

    #[test]
    fn test_parse_unformatted_response_degrades() {
        let digest = parse_digest("I could not summarize this article, sorry.");
        assert_eq!(digest.tldr, UNAVAILABLE);
        assert!(digest.key_points.is_empty());
    }

    #[test]
    fn test_truncate_chars_boundary_safe() {
        let s = "héllo wörld";
        assert_eq!(truncate_chars(s, 4), "héll");
        assert_eq!(truncate_chars(s, 100), s);
    }

    #[test]
    fn test_prompt_embeds_title_and_caps_body() {
        let long_text = "x".repeat(MAX_ARTICLE_CHARS + 500);
        let prompt = build_prompt("My Title", &long_text);
        assert!(prompt.contains("Title: My Title"));
        assert!(prompt.len() < MAX_ARTICLE_CHARS + 500);
    }

    #[test]
    fn test_digest_display() {
        let digest = Digest {
            tldr: "Short".into(),
            key_points: vec!["One".into(), "Two".into()],
        };
        let rendered = digest.to_string();
        assert!(rendered.starts_with("TLDR: Short"));
        assert!(rendered.contains("  - One"));
    }

    #[test]
    fn test_page_to_text_strips_markup() {
        let html = "<html><body><p>Hello</p>\n\n<p>world</p></body></html>";
        let text = Summarizer::page_to_text(html).unwrap();
        assert!(text.contains("Hello"));
        assert!(text.contains("world"));
    }
}
