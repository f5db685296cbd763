use serde::{Serialize, Deserialize};
use chrono::{DateTime, Utc};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ContentType {
    #[serde(rename = "eBook")]
    EBook,
    #[serde(rename = "Facebook Post")]
    FacebookPost,
    #[serde(rename = "Instagram Post")]
    InstagramPost,
}

impl ContentType {
    pub fn label(&self) -> &'static str {
        match self {
            ContentType::EBook => "eBook",
            ContentType::FacebookPost => "Facebook Post",
            ContentType::InstagramPost => "Instagram Post",
        }
    }

    /// Bengali label used inside the generation prompt.
    pub fn bengali_label(&self) -> &'static str {
        match self {
            ContentType::EBook => "ই-বুক",
            ContentType::FacebookPost => "ফেসবুক পোস্ট",
            ContentType::InstagramPost => "ইনস্টাগ্রাম ক্যাপশন",
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GenerationOptions {
    #[serde(default)]
    pub word_count: Option<u32>,
    #[serde(default)]
    pub page_count: Option<u32>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationRequest {
    pub topic: String,
    pub content_type: ContentType,
    #[serde(default)]
    pub options: GenerationOptions,
}

/// User-supplied Gemini API key, held in memory for the session only.
#[derive(Clone)]
pub struct ApiCredential {
    key: String,
}

impl ApiCredential {
    /// Returns `None` for blank input.
    pub fn new(key: impl Into<String>) -> Option<Self> {
        let key = key.into().trim().to_string();
        if key.is_empty() {
            None
        } else {
            Some(Self { key })
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }
}

/// Sections extracted from the raw model reply. Missing sections carry
/// placeholder text instead of failing the request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedContent {
    pub title: String,
    pub body: String,
    pub image_ideas: Vec<String>,
}

/// Same shape as [`ParsedContent`], after the cleanup pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RefinedContent {
    pub title: String,
    pub body: String,
    pub image_ideas: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneratedContent {
    pub id: Uuid,
    pub topic: String,
    pub content_type: ContentType,
    pub title: String,
    pub body: String,
    pub image_ideas: Vec<String>,
    pub pages: Vec<String>,
    pub created_at: DateTime<Utc>,
}
