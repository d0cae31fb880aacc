use thiserror::Error;

#[derive(Error, Debug)]
pub enum GeminiError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Gemini API error ({status}): {detail}")]
    Api { status: u16, detail: String },

    #[error("Image upload failed: no URI returned.")]
    UploadMissingUri,
}

pub type Result<T> = std::result::Result<T, GeminiError>;
