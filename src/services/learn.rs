//! Learn API client — the typed transport layer behind the learning views.
//!
//! ARCHITECTURE
//! ============
//! Mirrors the per-view API surface: category/topic lists with offset+limit
//! pagination, notes CRUD, quiz question generation and grading, and
//! AI-character chat. Every call goes through the same-origin gateway and
//! parses the `{ success, message?, data? }` envelope, failing closed on
//! mismatch. Chat sends synthesize the user echo and AI reply locally; the
//! server copy is never reconciled.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;

use crate::envelope::{Envelope, EnvelopeError};

#[derive(Debug, thiserror::Error)]
pub enum LearnError {
    /// The gateway was unreachable or the request failed mid-flight.
    #[error("request failed: {0}")]
    Transport(String),
    /// The reply body is not JSON.
    #[error("non-JSON reply: {0}")]
    Decode(String),
    /// The backend reported `success: false`.
    #[error("rejected: {message}")]
    Rejected { message: String },
    /// The reply envelope or payload had an unexpected shape.
    #[error("unexpected reply shape: {0}")]
    Shape(String),
    /// A chat message was empty after newline normalization.
    #[error("empty chat message")]
    EmptyMessage,
}

impl From<EnvelopeError> for LearnError {
    fn from(e: EnvelopeError) -> Self {
        match e {
            EnvelopeError::Rejected { message } => Self::Rejected { message },
            EnvelopeError::Shape(detail) => Self::Shape(detail),
        }
    }
}

// =============================================================================
// RECORDS
// =============================================================================

/// Paginated list envelope: `{ count, next_offset, data }`.
/// `next_offset = null` marks the final page.
#[derive(Debug, Clone, Deserialize)]
pub struct Page<T> {
    pub count: i64,
    pub next_offset: Option<i64>,
    pub data: Vec<T>,
}

impl<T> Page<T> {
    #[must_use]
    pub fn has_more(&self) -> bool {
        self.next_offset.is_some()
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Category {
    pub id: i64,
    pub category: String,
    #[serde(default)]
    pub category_image: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Topic {
    pub id: i64,
    pub topic: String,
    #[serde(default)]
    pub topic_image: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub category: Option<Category>,
}

#[derive(Debug, Clone, Copy, Deserialize)]
pub struct UserStatistics {
    pub total_score: i64,
    pub questions_asked: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TopicDetail {
    pub id: i64,
    pub topic: String,
    #[serde(default)]
    pub topic_image: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub user_statistics: Option<UserStatistics>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GeneratedQuestion {
    pub question: String,
}

/// Grading verdict for a submitted answer.
#[derive(Debug, Clone, Deserialize)]
pub struct AnswerReview {
    pub feedback: String,
    #[serde(default)]
    pub improved_answer: Option<String>,
    pub score: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Note {
    pub id: i64,
    pub title: String,
    pub content: String,
    pub is_starred: bool,
    pub created_at: String,
}

/// Partial note update; absent fields are left untouched by the backend.
#[derive(Debug, Clone, Default, Serialize)]
pub struct NotePatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_starred: Option<bool>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Character {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub avatar: Option<String>,
    #[serde(default)]
    pub is_active: bool,
    #[serde(default)]
    pub topic: Option<Topic>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatSender {
    User,
    Ai,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub id: i64,
    pub sender: ChatSender,
    pub message: String,
    pub created_at: String,
    #[serde(default)]
    pub user: Option<i64>,
    #[serde(default)]
    pub ai_character: Option<i64>,
}

/// The two locally-synthesized messages appended after a successful send.
#[derive(Debug, Clone)]
pub struct ChatExchange {
    pub user: ChatMessage,
    pub reply: ChatMessage,
}

// =============================================================================
// PURE HELPERS
// =============================================================================

/// Collapse runs of blank lines down to a single blank line and trim the
/// ends, so pasted chat text does not arrive as a wall of empty space.
#[must_use]
pub fn normalize_newlines(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut blank_run = 0usize;
    for line in text.lines() {
        if line.trim().is_empty() {
            blank_run += 1;
            continue;
        }
        if !out.is_empty() {
            out.push('\n');
            if blank_run > 0 {
                out.push('\n');
            }
        }
        out.push_str(line.trim_end());
        blank_run = 0;
    }
    out.trim_start().to_owned()
}

/// Build the locally-synthesized user echo + AI reply for a sent message.
/// Ids are the client timestamp (and timestamp + 1), like the view layer
/// they stand in for; nothing reconciles them with server copies.
#[must_use]
pub fn synthesize_exchange(character_id: i64, sent: &str, reply: &str, at_unix_ms: i64) -> ChatExchange {
    let created_at = rfc3339_from_unix_ms(at_unix_ms);
    let user = ChatMessage {
        id: at_unix_ms,
        sender: ChatSender::User,
        message: sent.to_owned(),
        created_at: created_at.clone(),
        user: None,
        ai_character: Some(character_id),
    };
    let ai = ChatMessage {
        id: at_unix_ms + 1,
        sender: ChatSender::Ai,
        message: reply.to_owned(),
        created_at,
        user: None,
        ai_character: Some(character_id),
    };
    ChatExchange { user, reply: ai }
}

fn rfc3339_from_unix_ms(unix_ms: i64) -> String {
    OffsetDateTime::from_unix_timestamp_nanos(i128::from(unix_ms) * 1_000_000)
        .ok()
        .and_then(|at| at.format(&Rfc3339).ok())
        .unwrap_or_default()
}

fn now_unix_ms() -> i64 {
    let nanos = OffsetDateTime::now_utc().unix_timestamp_nanos();
    i64::try_from(nanos / 1_000_000).unwrap_or(i64::MAX)
}

// =============================================================================
// CLIENT
// =============================================================================

/// Cookie-carrying client over the gateway origin, one per browsing session.
pub struct LearnClient {
    http: reqwest::Client,
    origin: String,
}

impl LearnClient {
    /// # Errors
    ///
    /// Returns an error if the underlying HTTP client fails to build.
    pub fn new(origin: &str) -> Result<Self, LearnError> {
        let http = reqwest::Client::builder()
            .cookie_store(true)
            .build()
            .map_err(|e| LearnError::Transport(e.to_string()))?;
        Ok(Self { http, origin: origin.trim_end_matches('/').to_owned() })
    }

    /// `GET /api/learn/categories/list`.
    pub async fn categories(&self, limit: u32, offset: u32, search: &str) -> Result<Page<Category>, LearnError> {
        let query = [
            ("limit", limit.to_string()),
            ("offset", offset.to_string()),
            ("search", search.to_owned()),
        ];
        let body = self.get_json("/api/learn/categories/list", &query).await?;
        typed(&body)
    }

    /// `GET /api/learn/topics/list`. `category` filters by category name;
    /// empty means all.
    pub async fn topics(
        &self,
        limit: u32,
        offset: u32,
        search: &str,
        category: &str,
    ) -> Result<Page<Topic>, LearnError> {
        let query = [
            ("limit", limit.to_string()),
            ("offset", offset.to_string()),
            ("search", search.to_owned()),
            ("category", category.to_owned()),
        ];
        let body = self.get_json("/api/learn/topics/list", &query).await?;
        typed(&body)
    }

    /// `GET /api/learn/topic/{id}/details`.
    pub async fn topic_details(&self, topic_id: i64) -> Result<TopicDetail, LearnError> {
        let body = self.get_json(&format!("/api/learn/topic/{topic_id}/details"), &[]).await?;
        typed(&body)
    }

    /// `GET /api/learn/generate/{id}/question` — one AI-generated quiz
    /// question at the requested difficulty.
    pub async fn generate_question(&self, topic_id: i64, difficulty: &str) -> Result<GeneratedQuestion, LearnError> {
        #[derive(Deserialize)]
        struct QuestionData {
            question: GeneratedQuestion,
        }
        let query = [("difficulty", difficulty.to_owned())];
        let body = self
            .get_json(&format!("/api/learn/generate/{topic_id}/question"), &query)
            .await?;
        let data: QuestionData = typed(&body)?;
        Ok(data.question)
    }

    /// `POST /api/learn/question/answer/result` — grade an answer.
    pub async fn submit_answer(&self, topic_id: i64, question: &str, answer: &str) -> Result<AnswerReview, LearnError> {
        let body = serde_json::json!({
            "topic_id": topic_id,
            "question": question,
            "answer": answer,
        });
        let reply = self.post_json("/api/learn/question/answer/result", &body).await?;
        typed(&reply)
    }

    /// `GET /api/learn/notes/list`.
    pub async fn notes(&self) -> Result<Vec<Note>, LearnError> {
        let body = self.get_json("/api/learn/notes/list", &[]).await?;
        typed(&body)
    }

    /// `POST /api/learn/notes/create`.
    pub async fn create_note(&self, title: &str, content: &str) -> Result<Note, LearnError> {
        let body = serde_json::json!({ "title": title, "content": content });
        let reply = self.post_json("/api/learn/notes/create", &body).await?;
        typed(&reply)
    }

    /// `POST /api/learn/notes/{id}/update`.
    pub async fn update_note(&self, note_id: i64, patch: &NotePatch) -> Result<Note, LearnError> {
        let body = serde_json::to_value(patch).map_err(|e| LearnError::Shape(e.to_string()))?;
        let reply = self.post_json(&format!("/api/learn/notes/{note_id}/update"), &body).await?;
        typed(&reply)
    }

    /// `DELETE /api/learn/notes/{id}/delete`.
    pub async fn delete_note(&self, note_id: i64) -> Result<(), LearnError> {
        let response = self
            .http
            .delete(format!("{}/api/learn/notes/{note_id}/delete", self.origin))
            .send()
            .await
            .map_err(|e| LearnError::Transport(e.to_string()))?;
        let body: Value = response.json().await.map_err(|e| LearnError::Decode(e.to_string()))?;
        let envelope = Envelope::parse(&body)?;
        if envelope.success {
            Ok(())
        } else {
            Err(LearnError::Rejected {
                message: envelope.message.unwrap_or_else(|| "failed to delete note".to_owned()),
            })
        }
    }

    /// `GET /api/ai-characters/{id}/details`.
    pub async fn character_details(&self, character_id: i64) -> Result<Character, LearnError> {
        #[derive(Deserialize)]
        struct CharacterData {
            character: Character,
        }
        let body = self
            .get_json(&format!("/api/ai-characters/{character_id}/details"), &[])
            .await?;
        let data: CharacterData = typed(&body)?;
        Ok(data.character)
    }

    /// `GET /api/ai-characters/{id}/chat/messages` — history page; callers
    /// prepend older pages while scrolling back.
    pub async fn chat_messages(
        &self,
        character_id: i64,
        limit: u32,
        offset: u32,
    ) -> Result<Page<ChatMessage>, LearnError> {
        let query = [("limit", limit.to_string()), ("offset", offset.to_string())];
        let body = self
            .get_json(&format!("/api/ai-characters/{character_id}/chat/messages"), &query)
            .await?;
        typed(&body)
    }

    /// `POST /api/ai-characters/chat` — send a message, returning the
    /// locally-synthesized user echo and AI reply.
    pub async fn send_chat(&self, character_id: i64, message: &str) -> Result<ChatExchange, LearnError> {
        #[derive(Deserialize)]
        struct ChatReply {
            response: String,
        }
        let text = normalize_newlines(message);
        if text.is_empty() {
            return Err(LearnError::EmptyMessage);
        }
        let body = serde_json::json!({ "character_id": character_id, "message": text });
        let reply = self.post_json("/api/ai-characters/chat", &body).await?;
        let data: ChatReply = typed(&reply)?;
        Ok(synthesize_exchange(character_id, &text, &data.response, now_unix_ms()))
    }

    async fn get_json(&self, path: &str, query: &[(&str, String)]) -> Result<Value, LearnError> {
        let response = self
            .http
            .get(format!("{}{path}", self.origin))
            .query(query)
            .send()
            .await
            .map_err(|e| LearnError::Transport(e.to_string()))?;
        response.json().await.map_err(|e| LearnError::Decode(e.to_string()))
    }

    async fn post_json(&self, path: &str, body: &Value) -> Result<Value, LearnError> {
        let response = self
            .http
            .post(format!("{}{path}", self.origin))
            .json(body)
            .send()
            .await
            .map_err(|e| LearnError::Transport(e.to_string()))?;
        response.json().await.map_err(|e| LearnError::Decode(e.to_string()))
    }
}

fn typed<T: serde::de::DeserializeOwned>(body: &Value) -> Result<T, LearnError> {
    Ok(Envelope::parse(body)?.into_data()?)
}

#[cfg(test)]
#[path = "learn_test.rs"]
mod tests;
