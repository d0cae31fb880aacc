//! Gemini-backed [`CompletionService`]: uploads the staged image first, then
//! sends only the latest user turn plus the system instruction.

use anyhow::Result;
use async_trait::async_trait;
use gemini_client::{Content, GeminiClient, Part};
use tracing::{info, instrument};

use crate::{latest_user_text, CompletionRequest, CompletionService};

/// Reply used when the history holds no user turn and no image was attached.
/// Callers normally guarantee a user turn exists; this mirrors the service's
/// own degenerate-input answer rather than failing.
pub const NO_USER_MESSAGE_REPLY: &str = "No user message.";

/// [`CompletionService`] implementation over [`GeminiClient`].
#[derive(Clone)]
pub struct GeminiCompletionService {
    client: GeminiClient,
    model: String,
}

impl GeminiCompletionService {
    pub fn new(client: GeminiClient) -> Self {
        Self {
            client,
            model: gemini_client::DEFAULT_MODEL.to_string(),
        }
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn from_config(config: &crate::GeminiConfig) -> Self {
        Self::new(GeminiClient::with_base_url(
            config.api_key.clone(),
            config.base_url.clone(),
        ))
        .with_model(config.model.clone())
    }
}

#[async_trait]
impl CompletionService for GeminiCompletionService {
    /// Builds one user content block: latest user text, then the uploaded
    /// image reference when a staged image rides along. The system
    /// instruction is always included in the request configuration.
    #[instrument(skip(self, request), fields(model = %self.model))]
    async fn complete(&self, request: CompletionRequest) -> Result<String> {
        let latest = latest_user_text(&request.history);
        if latest.is_none() && request.image.is_none() {
            return Ok(NO_USER_MESSAGE_REPLY.to_string());
        }

        let mut parts = Vec::new();
        if let Some(text) = latest {
            parts.push(Part::Text {
                text: text.to_string(),
            });
        }
        if let Some(image) = request.image {
            // Upload first; a missing URI fails the whole call rather than
            // silently dropping the image.
            let file = self
                .client
                .upload_file(image.bytes, &image.mime_type, &image.file_name)
                .await?;
            info!(uri = %file.file_uri, "image uploaded");
            parts.push(Part::FileData { file_data: file });
        }

        let contents = vec![Content::user(parts)];
        let text = self
            .client
            .generate_content(&self.model, &contents, Some(&request.system_instruction))
            .await?;
        Ok(text)
    }
}
