use axum::{Json, extract::State, http::StatusCode, response::{IntoResponse, Response}};
use axum::response::Html;
use chrono::Utc;
use parking_lot::RwLock;
use serde::{Serialize, Deserialize};
use serde_json::json;
use std::sync::Arc;
use uuid::Uuid;

use crate::{
    gemini::{GeminiClient, GenerateError},
    models::{ApiCredential, GeneratedContent, GenerationRequest},
    parser::parse_response,
    prompt::build_prompt,
    refine::refine,
    render::{self, Block, Paginator},
};

#[derive(Clone)]
pub struct AppState {
    pub session: Arc<RwLock<Session>>,
    pub gemini: Arc<GeminiClient>,
}

/// Per-session state: the in-memory credential and the single request slot.
/// A new generation replaces the previous result atomically.
#[derive(Default)]
pub struct Session {
    pub credential: Option<ApiCredential>,
    pub request: RequestState,
}

#[derive(Default)]
pub enum RequestState {
    #[default]
    Idle,
    Pending,
    Succeeded {
        content: GeneratedContent,
        paginator: Paginator,
    },
    Failed(String),
}

pub struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    fn busy() -> Self {
        Self {
            status: StatusCode::CONFLICT,
            message: "একটি রিকোয়েস্ট ইতিমধ্যে চলছে। অনুগ্রহ করে অপেক্ষা করুন।".to_string(),
        }
    }

    fn no_content() -> Self {
        Self {
            status: StatusCode::NOT_FOUND,
            message: "এখনো কোনো কনটেন্ট তৈরি হয়নি।".to_string(),
        }
    }

    fn empty_topic() -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: "একটি টপিক লিখুন।".to_string(),
        }
    }
}

impl From<GenerateError> for ApiError {
    fn from(error: GenerateError) -> Self {
        let status = match &error {
            GenerateError::ApiKeyMissing => StatusCode::UNAUTHORIZED,
            GenerateError::Generation(_) => StatusCode::BAD_GATEWAY,
            GenerateError::Parse(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        Self {
            status,
            message: error.user_message().to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(json!({ "error": self.message }))).into_response()
    }
}

#[derive(Debug, Deserialize)]
pub struct CredentialRequest {
    pub api_key: String,
}

pub async fn set_credential(
    State(state): State<AppState>,
    Json(body): Json<CredentialRequest>,
) -> Result<Json<serde_json::Value>, ApiError> {
    match ApiCredential::new(body.api_key) {
        Some(credential) => {
            state.session.write().credential = Some(credential);
            tracing::info!("🔑 API key configured for this session");
            Ok(Json(json!({ "message": "API Key সেট হয়েছে!" })))
        }
        None => Err(ApiError {
            status: StatusCode::BAD_REQUEST,
            message: "একটি বৈধ API Key প্রবেশ করান।".to_string(),
        }),
    }
}

pub async fn generate_content(
    State(state): State<AppState>,
    Json(body): Json<GenerationRequest>,
) -> Result<Json<GeneratedContent>, ApiError> {
    if body.topic.trim().is_empty() {
        return Err(ApiError::empty_topic());
    }

    // Claim the single request slot. A submit while one is pending is a no-op.
    let credential = {
        let mut session = state.session.write();
        if matches!(session.request, RequestState::Pending) {
            return Err(ApiError::busy());
        }
        let credential = session
            .credential
            .clone()
            .ok_or(GenerateError::ApiKeyMissing)?;
        session.request = RequestState::Pending;
        credential
    };

    tracing::info!(
        "🚀 Generating {} for topic: {}",
        body.content_type.label(),
        body.topic.trim()
    );

    let result = run_generation(&state, &credential, &body).await;

    let mut session = state.session.write();
    match result {
        Ok(content) => {
            tracing::info!(
                "✅ Generated \"{}\" with {} page(s) and {} image idea(s)",
                content.title,
                content.pages.len(),
                content.image_ideas.len()
            );
            let paginator = Paginator::new(content.pages.len());
            let response = content.clone();
            session.request = RequestState::Succeeded { content, paginator };
            Ok(Json(response))
        }
        Err(error) => {
            tracing::error!("❌ Generation failed: {}", error);
            session.request = RequestState::Failed(error.user_message().to_string());
            Err(error.into())
        }
    }
}

async fn run_generation(
    state: &AppState,
    credential: &ApiCredential,
    request: &GenerationRequest,
) -> Result<GeneratedContent, GenerateError> {
    let prompt = build_prompt(request);
    let raw = state.gemini.generate_text(credential, &prompt).await?;
    let parsed = parse_response(&raw);
    let refined = refine(parsed, request.content_type);
    let pages = render::split_pages(&refined.body, request.content_type);

    Ok(GeneratedContent {
        id: Uuid::new_v4(),
        topic: request.topic.trim().to_string(),
        content_type: request.content_type,
        title: refined.title,
        body: refined.body,
        image_ideas: refined.image_ideas,
        pages,
        created_at: Utc::now(),
    })
}

pub async fn get_content(State(state): State<AppState>) -> Result<Json<GeneratedContent>, ApiError> {
    match &state.session.read().request {
        RequestState::Succeeded { content, .. } => Ok(Json(content.clone())),
        RequestState::Failed(message) => Err(ApiError {
            status: StatusCode::BAD_GATEWAY,
            message: message.clone(),
        }),
        RequestState::Idle | RequestState::Pending => Err(ApiError::no_content()),
    }
}

/// One page of the current content, with its rendered display fragments.
#[derive(Debug, Serialize)]
pub struct PageView {
    pub page_index: usize,
    pub page_count: usize,
    pub text: String,
    pub blocks: Vec<Block>,
    /// Every page joined for the copy-all affordance.
    pub copy_all: String,
}

fn page_view(content: &GeneratedContent, paginator: Paginator) -> PageView {
    let index = paginator.index();
    let text = content.pages[index].clone();
    let blocks = render::render_blocks(&text, content.content_type);
    PageView {
        page_index: index,
        page_count: content.pages.len(),
        text,
        blocks,
        copy_all: content.pages.join(render::CHAPTER_COPY_JOIN),
    }
}

pub async fn current_page(State(state): State<AppState>) -> Result<Json<PageView>, ApiError> {
    match &state.session.read().request {
        RequestState::Succeeded { content, paginator } => {
            Ok(Json(page_view(content, *paginator)))
        }
        _ => Err(ApiError::no_content()),
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PageNav {
    Next,
    Prev,
    Goto(usize),
}

pub async fn navigate_page(
    State(state): State<AppState>,
    Json(nav): Json<PageNav>,
) -> Result<Json<PageView>, ApiError> {
    let mut session = state.session.write();
    let RequestState::Succeeded { content, paginator } = &mut session.request else {
        return Err(ApiError::no_content());
    };
    match nav {
        PageNav::Next => paginator.next_page(),
        PageNav::Prev => paginator.prev_page(),
        PageNav::Goto(index) => paginator.go_to(index),
    }
    Ok(Json(page_view(content, *paginator)))
}

const EXAMPLE_TOPICS: [&str; 6] = [
    "ডিজিটাল মার্কেটিং গাইড",
    "ওয়েব ডেভেলপমেন্ট শিখুন",
    "ব্যবসায়ের কৌশল",
    "AI এর ভবিষ্যৎ",
    "অনলাইন আয়ের উপায়",
    "স্বাস্থ্য ও ফিটনেস",
];

pub async fn index() -> Html<String> {
    let topics = EXAMPLE_TOPICS
        .iter()
        .map(|topic| format!("<li>{topic}</li>"))
        .collect::<Vec<_>>()
        .join("\n            ");

    Html(format!(
        r#"<!DOCTYPE html>
<html lang="bn">
<head>
    <title>AI Content Studio</title>
    <meta charset="utf-8">
</head>
<body>
    <h1>AI Content Studio</h1>
    <p>টপিক দিন, Gemini দিয়ে ই-বুক, ফেসবুক পোস্ট বা ইনস্টাগ্রাম ক্যাপশন তৈরি করুন।</p>
    <h2>Endpoints</h2>
    <ul>
        <li>POST /api/credential — Gemini API Key সেট করুন</li>
        <li>POST /api/generate — কনটেন্ট তৈরি করুন</li>
        <li>GET /api/content — সর্বশেষ কনটেন্ট</li>
        <li>GET /api/content/page — বর্তমান পৃষ্ঠা</li>
        <li>POST /api/content/page — পৃষ্ঠা নেভিগেশন (next / prev / goto)</li>
        <li>GET /health — Health check</li>
    </ul>
    <h2>উদাহরণ টপিক</h2>
    <ul>
            {topics}
    </ul>
</body>
</html>"#
    ))
}

pub async fn health_check() -> &'static str {
    "OK"
}
