//! HTTP request handlers

use super::state::AppState;
use crate::agent::{ApplicantDetails, EmailDraft};
use crate::error::AgentError;
use crate::mail::SendReceipt;
use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{error, info};

/// JSON error body `{"detail": ...}`
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    detail: String,
}

impl ApiError {
    fn bad_request(detail: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            detail: detail.into(),
        }
    }

    /// Map an agent failure, prefixing server-side errors with `context`
    fn from_agent(context: &str, err: AgentError) -> Self {
        if err.is_client_error() {
            return Self::bad_request(err.to_string());
        }
        error!("{} failed: {}", context, err);
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            detail: format!("{}: {}", context, err),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(json!({ "detail": self.detail }))).into_response()
    }
}

/// Response for `/apply`
#[derive(Debug, Serialize, Deserialize)]
pub struct ApplyResponse {
    pub email_draft: String,
}

/// Draft an application email
pub async fn apply(
    State(state): State<AppState>,
    Json(details): Json<ApplicantDetails>,
) -> Result<Json<ApplyResponse>, ApiError> {
    info!("POST /apply role={:?} resume={:?}", details.role, details.resume_path);
    let email_draft = state
        .agent
        .run(&details)
        .await
        .map_err(|e| ApiError::from_agent("Agent error", e))?;
    info!("apply completed email_chars={}", email_draft.chars().count());
    Ok(Json(ApplyResponse { email_draft }))
}

/// Body for `/send`; a full draft may stand in for the individual fields
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct SendRequest {
    pub to_email: Option<String>,
    pub sender_name: Option<String>,
    pub repo_url: Option<String>,
    pub subject: Option<String>,
    pub body: Option<String>,
    pub email_draft: Option<String>,
}

/// Recipient, subject and body resolved from a [`SendRequest`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutgoingMessage {
    pub to: String,
    pub subject: String,
    pub body: String,
}

fn present(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

impl SendRequest {
    /// Fill unset fields from the draft, then from the sender and repo
    pub fn resolve(self) -> Result<OutgoingMessage, ApiError> {
        let draft = match present(self.email_draft) {
            Some(text) => Some(EmailDraft::parse(&text).ok_or_else(|| {
                ApiError::bad_request(
                    "email_draft must follow the To:/Subject:/Body:/Attachment: format",
                )
            })?),
            None => None,
        };
        let repo_url = present(self.repo_url);
        let sender_name = present(self.sender_name).unwrap_or_else(|| "Applicant".to_string());

        let to = present(self.to_email)
            .or_else(|| draft.as_ref().map(|d| d.to.clone()))
            .filter(|to| !to.is_empty())
            .ok_or_else(|| ApiError::bad_request("to_email is required"))?;

        let subject = present(self.subject)
            .or_else(|| draft.as_ref().map(|d| d.subject.clone()))
            .unwrap_or_else(|| match repo_url.as_deref() {
                Some(url) => format!("Application: {}", repo_name(url)),
                None => "Application".to_string(),
            });

        let body = present(self.body)
            .or_else(|| draft.as_ref().map(|d| d.body.clone()))
            .unwrap_or_else(|| compose_body(&sender_name, repo_url.as_deref()));

        Ok(OutgoingMessage { to, subject, body })
    }
}

/// Last path segment of a repository URL, without `.git`
pub fn repo_name(repo_url: &str) -> String {
    let path = url::Url::parse(repo_url)
        .map(|u| u.path().to_string())
        .unwrap_or_else(|_| repo_url.to_string());
    let segment = path
        .trim_end_matches('/')
        .rsplit('/')
        .next()
        .unwrap_or_default();
    let name = segment.trim_end_matches(".git");
    if name.is_empty() {
        repo_url.to_string()
    } else {
        name.to_string()
    }
}

fn compose_body(sender_name: &str, repo_url: Option<&str>) -> String {
    let mut body = String::from("Hello,\n\n");
    match repo_url {
        Some(url) => body.push_str(&format!(
            "I would like to apply for the open role. My project repository is here: {}\n\n",
            url
        )),
        None => body.push_str("I would like to apply for the open role.\n\n"),
    }
    body.push_str(&format!("Best regards,\n{}", sender_name));
    body
}

/// Response for `/send`
#[derive(Debug, Serialize)]
pub struct SendResponse {
    pub status: &'static str,
    #[serde(flatten)]
    pub receipt: SendReceipt,
}

/// Send an email, either composed here or taken from a draft
pub async fn send(
    State(state): State<AppState>,
    Json(request): Json<SendRequest>,
) -> Result<Json<SendResponse>, ApiError> {
    let message = request.resolve()?;
    info!("POST /send to={} subject={:?}", message.to, message.subject);
    let receipt = state
        .mailer
        .send(&message.to, &message.subject, &message.body)
        .await
        .map_err(|e| ApiError::from_agent("Send error", e))?;
    Ok(Json(SendResponse {
        status: "sent",
        receipt,
    }))
}

/// Health check handler
pub async fn health(State(state): State<AppState>) -> impl IntoResponse {
    Json(json!({
        "status": "ok",
        "version": crate::VERSION,
        "providers": state.active_providers(),
        "engines": state.provider_status(),
    }))
}
