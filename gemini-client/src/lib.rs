//! # gemini-client
//!
//! Raw REST client for the Google Gemini API: `generateContent` and simple
//! media upload. Thin transport layer; the completion abstraction lives in
//! completion-client.

use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

mod error;

pub use error::{GeminiError, Result};

pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";
pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";

/// One part of a request content block: inline text or a reference to an
/// uploaded file.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum Part {
    Text {
        text: String,
    },
    FileData {
        #[serde(rename = "fileData")]
        file_data: FileData,
    },
}

/// Reference to a previously uploaded file, as returned by [`GeminiClient::upload_file`].
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FileData {
    pub file_uri: String,
    pub mime_type: String,
}

/// A role-tagged block of parts in a `generateContent` request.
#[derive(Debug, Clone, Serialize)]
pub struct Content {
    pub role: String,
    pub parts: Vec<Part>,
}

impl Content {
    /// User-role content block. The API only accepts the `user` role for
    /// request turns here; the system instruction travels separately.
    pub fn user(parts: Vec<Part>) -> Self {
        Self {
            role: "user".to_string(),
            parts,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest<'a> {
    contents: &'a [Content],
    #[serde(skip_serializing_if = "Option::is_none")]
    system_instruction: Option<SystemInstruction>,
}

#[derive(Debug, Serialize)]
struct SystemInstruction {
    parts: Vec<Part>,
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<ResponseContent>,
}

#[derive(Debug, Deserialize)]
struct ResponseContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
struct ResponsePart {
    #[serde(default)]
    text: Option<String>,
}

/// Concatenated text parts of the first candidate; empty string when the
/// response carries no candidate or no text.
fn reply_text(response: &GenerateContentResponse) -> String {
    response
        .candidates
        .first()
        .and_then(|c| c.content.as_ref())
        .map(|content| {
            content
                .parts
                .iter()
                .filter_map(|p| p.text.as_deref())
                .collect::<Vec<_>>()
                .join("")
        })
        .unwrap_or_default()
}

#[derive(Debug, Deserialize)]
struct UploadFileResponse {
    file: Option<UploadedFile>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UploadedFile {
    uri: Option<String>,
    mime_type: Option<String>,
}

/// Gemini REST client. Explicitly constructed and passed to callers; holds no
/// global state.
#[derive(Clone)]
pub struct GeminiClient {
    http: reqwest::Client,
    api_key: String,
    base_url: String,
}

impl GeminiClient {
    /// Creates a client against the public Gemini endpoint.
    pub fn new(api_key: String) -> Self {
        Self::with_base_url(api_key, DEFAULT_BASE_URL.to_string())
    }

    /// Creates a client against a custom base URL (e.g. a test double).
    pub fn with_base_url(api_key: String, base_url: String) -> Self {
        Self {
            http: reqwest::Client::new(),
            api_key,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Calls `models/{model}:generateContent` and returns the reply text.
    /// An answer without candidates or text resolves to an empty string; the
    /// caller decides how to present that.
    #[instrument(skip(self, contents, system_instruction))]
    pub async fn generate_content(
        &self,
        model: &str,
        contents: &[Content],
        system_instruction: Option<&str>,
    ) -> Result<String> {
        let url = format!("{}/v1beta/models/{}:generateContent", self.base_url, model);
        let body = GenerateContentRequest {
            contents,
            system_instruction: system_instruction.map(|text| SystemInstruction {
                parts: vec![Part::Text {
                    text: text.to_string(),
                }],
            }),
        };

        let response = self
            .http
            .post(&url)
            .query(&[("key", self.api_key.as_str())])
            .json(&body)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let detail = response.text().await.unwrap_or_default();
            return Err(GeminiError::Api { status, detail });
        }

        let parsed: GenerateContentResponse = response.json().await?;
        let text = reply_text(&parsed);
        debug!(reply_len = text.len(), "generateContent resolved");
        Ok(text)
    }

    /// Uploads raw file bytes and returns the file reference for use in a
    /// `fileData` part. A response without a URI is an explicit failure; the
    /// call never silently proceeds without the reference.
    #[instrument(skip(self, bytes, mime_type, display_name), fields(mime_type = %mime_type, size = bytes.len()))]
    pub async fn upload_file(
        &self,
        bytes: Vec<u8>,
        mime_type: &str,
        display_name: &str,
    ) -> Result<FileData> {
        let url = format!("{}/upload/v1beta/files", self.base_url);
        let response = self
            .http
            .post(&url)
            .query(&[("key", self.api_key.as_str())])
            .header(reqwest::header::CONTENT_TYPE, mime_type)
            .header("X-Goog-Upload-Protocol", "raw")
            .header("X-Goog-File-Name", display_name)
            .body(bytes)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let detail = response.text().await.unwrap_or_default();
            return Err(GeminiError::Api { status, detail });
        }

        let parsed: UploadFileResponse = response.json().await?;
        let file = parsed.file.ok_or(GeminiError::UploadMissingUri)?;
        let uri = file.uri.ok_or(GeminiError::UploadMissingUri)?;
        Ok(FileData {
            file_uri: uri,
            // The API may omit the stored media type; fall back to PNG as the
            // original upload path did.
            mime_type: file.mime_type.unwrap_or_else(|| "image/png".to_string()),
        })
    }
}
