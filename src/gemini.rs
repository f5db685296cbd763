use reqwest::Client;
use serde::Deserialize;
use serde_json::json;
use thiserror::Error;
use tracing::{info, error};

use crate::models::ApiCredential;

const MODEL: &str = "gemini-1.5-flash";

// Sampling parameters are fixed per request and not user-configurable.
const TEMPERATURE: f32 = 0.7;
const TOP_K: u32 = 40;
const TOP_P: f32 = 0.95;
const MAX_OUTPUT_TOKENS: u32 = 8192;

#[derive(Debug, Error)]
pub enum GenerateError {
    #[error("API key not configured")]
    ApiKeyMissing,
    #[error("generation failed: {0}")]
    Generation(String),
    #[error("response parsing failed: {0}")]
    Parse(String),
}

impl GenerateError {
    /// Localized message shown to the user.
    pub fn user_message(&self) -> &'static str {
        match self {
            GenerateError::ApiKeyMissing => {
                "Gemini API Key সেট করা হয়নি। অনুগ্রহ করে আপনার API Key প্রবেশ করান।"
            }
            GenerateError::Generation(_) => {
                "কনটেন্ট তৈরি করতে সমস্যা হয়েছে। অনুগ্রহ করে আবার চেষ্টা করুন।"
            }
            GenerateError::Parse(_) => "রেসপন্স পার্স করতে সমস্যা হয়েছে।",
        }
    }
}

pub struct GeminiClient {
    client: Client,
    base_url: String,
}

impl GeminiClient {
    pub fn new() -> Self {
        let base_url = std::env::var("GEMINI_API_BASE")
            .unwrap_or_else(|_| "https://generativelanguage.googleapis.com/v1beta".to_string());
        Self {
            client: Client::new(),
            base_url,
        }
    }

    /// Sends the prompt to the generation endpoint and returns the model's
    /// raw text reply. One attempt per request, no retry.
    pub async fn generate_text(
        &self,
        credential: &ApiCredential,
        prompt: &str,
    ) -> Result<String, GenerateError> {
        let url = format!(
            "{}/models/{}:generateContent?key={}",
            self.base_url,
            MODEL,
            credential.key()
        );

        info!("🔗 Making request to: {}", url.replace(credential.key(), "***"));
        info!("📤 Prompt ({} chars): {}", prompt.chars().count(), truncate(prompt, 120));

        let request_body = json!({
            "contents": [{
                "parts": [{"text": prompt}]
            }],
            "generationConfig": {
                "temperature": TEMPERATURE,
                "topK": TOP_K,
                "topP": TOP_P,
                "maxOutputTokens": MAX_OUTPUT_TOKENS
            }
        });

        let response = self
            .client
            .post(&url)
            .json(&request_body)
            .send()
            .await
            .map_err(|e| GenerateError::Generation(format!("http: {e}")))?;

        let status = response.status();
        info!("📥 Response status: {}", status);

        let response_text = response
            .text()
            .await
            .map_err(|e| GenerateError::Generation(format!("body: {e}")))?;

        if !status.is_success() {
            error!("❌ API error response: {}", truncate(&response_text, 500));
            return Err(GenerateError::Generation(format!(
                "status={} body={}",
                status,
                truncate(&response_text, 500)
            )));
        }

        let parsed: GeminiResponse = serde_json::from_str(&response_text).map_err(|e| {
            GenerateError::Parse(format!("{}: {}", e, truncate(&response_text, 500)))
        })?;

        for candidate in &parsed.candidates {
            for part in &candidate.content.parts {
                if let Part::Text { text } = part {
                    info!("✅ Received {} chars of generated text", text.chars().count());
                    return Ok(text.trim().to_string());
                }
            }
        }

        Err(GenerateError::Generation(
            "no text content found in response".to_string(),
        ))
    }
}

fn truncate(s: &str, max_chars: usize) -> String {
    if s.chars().count() <= max_chars {
        s.to_string()
    } else {
        let head: String = s.chars().take(max_chars).collect();
        format!("{head}…")
    }
}

// --- Response Parsing Helpers ---

#[derive(Debug, Deserialize)]
struct GeminiResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    #[serde(default)]
    content: Content,
}

#[derive(Debug, Deserialize, Default)]
struct Content {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum Part {
    Text { text: String },
    Other(serde_json::Value),
}
