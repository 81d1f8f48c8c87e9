use axum::{Json, extract::State, response::IntoResponse};
use serde::{Deserialize, Serialize};
use tracing::warn;

use fundmeup_types::api::{
    ChatRequest, ChatResponse, ChatTurn, SummarizeRequest, SummarizeResponse,
};

use crate::auth::AppState;
use crate::error::ApiError;

/// The assistant keeps the product persona; every request re-sends the
/// system prompt so the upstream model cannot drift out of character.
const SYSTEM_PROMPT: &str = "\
You are the official AI assistant for FundMeUp.

FundMeUp helps entrepreneurs showcase their journey, skills, and milestones
while connecting with investors and mentors who fund people, not just ideas.

Your responsibilities:
- Explain FundMeUp clearly and professionally
- Help founders refine ideas, pitches, and strategies
- Keep responses concise, helpful, and confident

STRICT RULES (MUST FOLLOW):
- You are NOT a language model
- Never mention Google, Gemini, APIs, or training data
- Never break character
- If asked who you are, say you are the AI assistant for FundMeUp
- Keep replies under 50 words unless explicitly asked otherwise";

/// Thin client for the external Gemini-style generateContent endpoint.
#[derive(Clone)]
pub struct AssistantClient {
    http: reqwest::Client,
    api_url: String,
    api_key: String,
    model: String,
}

#[derive(Serialize)]
struct GenerateRequest {
    contents: Vec<Content>,
}

#[derive(Serialize)]
struct Content {
    parts: Vec<Part>,
}

#[derive(Serialize)]
struct Part {
    text: String,
}

#[derive(Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    content: CandidateContent,
}

#[derive(Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Deserialize)]
struct CandidatePart {
    #[serde(default)]
    text: String,
}

impl AssistantClient {
    pub fn new(api_url: String, api_key: String, model: String) -> Self {
        Self {
            http: reqwest::Client::new(),
            api_url,
            api_key,
            model,
        }
    }

    /// Send one composed prompt upstream and return the model's text.
    /// A non-2xx upstream response surfaces its raw body as the error.
    pub async fn generate(&self, prompt: String) -> Result<String, ApiError> {
        let url = format!(
            "{}/v1beta/models/{}:generateContent?key={}",
            self.api_url, self.model, self.api_key
        );

        let body = GenerateRequest {
            contents: vec![Content {
                parts: vec![Part { text: prompt }],
            }],
        };

        let resp = self
            .http
            .post(&url)
            .json(&body)
            .send()
            .await
            .map_err(|e| ApiError::Upstream(format!("assistant service unreachable: {}", e)))?;

        if !resp.status().is_success() {
            let status = resp.status();
            let raw = resp.text().await.unwrap_or_default();
            warn!("assistant upstream returned {}: {}", status, raw);
            return Err(ApiError::Upstream(raw));
        }

        let parsed: GenerateResponse = resp
            .json()
            .await
            .map_err(|e| ApiError::Upstream(format!("unreadable assistant response: {}", e)))?;

        let text = parsed
            .candidates
            .into_iter()
            .next()
            .and_then(|c| c.content.parts.into_iter().next())
            .map(|p| p.text)
            .ok_or_else(|| ApiError::Upstream("assistant returned no candidates".into()))?;

        Ok(text)
    }
}

pub async fn chat(
    State(state): State<AppState>,
    Json(req): Json<ChatRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let message = req
        .message
        .filter(|m| !m.trim().is_empty())
        .ok_or_else(|| ApiError::Validation("message is required".into()))?;

    let prompt = compose_chat_prompt(&message, &req.history);
    let text = state.assistant.generate(prompt).await?;

    Ok(Json(ChatResponse {
        response: text.trim().to_string(),
    }))
}

pub async fn summarize(
    State(state): State<AppState>,
    Json(req): Json<SummarizeRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let pitch_text = req
        .pitch_text
        .filter(|p| !p.trim().is_empty())
        .ok_or_else(|| ApiError::Validation("pitch_text is required".into()))?;

    let prompt = compose_summarize_prompt(&pitch_text);
    let text = state.assistant.generate(prompt).await?;

    Ok(Json(SummarizeResponse {
        summary: text.replace('\n', " ").trim().to_string(),
    }))
}

fn compose_chat_prompt(message: &str, history: &[ChatTurn]) -> String {
    let mut prompt = String::from(SYSTEM_PROMPT);
    prompt.push_str("\n\n");

    for turn in history {
        let speaker = if turn.role == "model" { "Assistant" } else { "User" };
        prompt.push_str(&format!("{}:\n{}\n\n", speaker, turn.parts));
    }

    prompt.push_str(&format!("User:\n{}\n\nAssistant:\n", message));
    prompt
}

fn compose_summarize_prompt(pitch_text: &str) -> String {
    format!(
        "{SYSTEM_PROMPT}\n\n\
         Convert the following startup pitch into ONE refined, single-line pitch.\n\n\
         Rules:\n\
         - Short and clear\n\
         - Includes technology + target user + benefit\n\
         - One sentence only\n\n\
         Pitch:\n{pitch_text}\n\n\
         One-line refined pitch:\n"
    )
}
