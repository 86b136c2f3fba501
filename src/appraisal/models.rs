use crate::appraisal::AppraisalError;

/// One part of a model request, in send order.
#[derive(Debug, Clone, PartialEq)]
pub enum RequestPart {
    Text(String),
    Blob { media_type: String, bytes: Vec<u8> },
}

/// An ordered multimodal request. `json_output` asks the transport to
/// constrain the reply to a single JSON document.
#[derive(Debug, Clone, PartialEq)]
pub struct ModelRequest {
    pub parts: Vec<RequestPart>,
    pub json_output: bool,
}

impl ModelRequest {
    /// Plain one-shot text request (the advisor chat uses these).
    pub fn text_only(text: impl Into<String>) -> Self {
        Self {
            parts: vec![RequestPart::Text(text.into())],
            json_output: false,
        }
    }

    pub fn blob_count(&self) -> usize {
        self.parts
            .iter()
            .filter(|p| matches!(p, RequestPart::Blob { .. }))
            .count()
    }
}

/// Seam to the generative-model provider: hand over the parts, get the raw
/// reply text back.
pub trait GenerativeBackend: Send + Sync {
    fn generate(&self, request: &ModelRequest) -> Result<String, AppraisalError>;
}
