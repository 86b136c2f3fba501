use crate::appraisal::{AppraisalError, GenerativeBackend, ModelRequest, RequestPart};
use base64::Engine;
use reqwest::blocking::Client;
use serde::{Deserialize, Serialize};

/// Blocking client for the Gemini `generateContent` REST endpoint. The API
/// key is optional at construction; a missing key turns into a Config error
/// on first use so the server can boot without one.
pub struct GeminiClient {
    api_key: Option<String>,
    model: String,
    base_url: String,
    client: Client,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GeneratePayload<'a> {
    contents: Vec<ContentPayload<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    generation_config: Option<GenerationConfig>,
}

#[derive(Serialize)]
struct ContentPayload<'a> {
    role: &'a str,
    parts: Vec<PartPayload>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct PartPayload {
    #[serde(skip_serializing_if = "Option::is_none")]
    text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    inline_data: Option<InlineData>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct InlineData {
    mime_type: String,
    data: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    response_mime_type: &'static str,
}

#[derive(Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    #[serde(default)]
    content: Option<CandidateContent>,
}

#[derive(Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Deserialize)]
struct CandidatePart {
    #[serde(default)]
    text: Option<String>,
}

impl GeminiClient {
    pub fn new(
        api_key: Option<String>,
        model: impl Into<String>,
        base_url: impl Into<String>,
    ) -> Self {
        Self {
            api_key,
            model: model.into(),
            base_url: base_url.into(),
            client: Client::new(),
        }
    }
}

fn to_wire(request: &ModelRequest) -> GeneratePayload<'static> {
    let parts = request
        .parts
        .iter()
        .map(|part| match part {
            RequestPart::Text(text) => PartPayload {
                text: Some(text.clone()),
                inline_data: None,
            },
            RequestPart::Blob { media_type, bytes } => PartPayload {
                text: None,
                inline_data: Some(InlineData {
                    mime_type: media_type.clone(),
                    data: base64::engine::general_purpose::STANDARD.encode(bytes),
                }),
            },
        })
        .collect();

    GeneratePayload {
        contents: vec![ContentPayload {
            role: "user",
            parts,
        }],
        generation_config: request.json_output.then_some(GenerationConfig {
            response_mime_type: "application/json",
        }),
    }
}

fn first_candidate_text(body: GenerateResponse) -> String {
    body.candidates
        .into_iter()
        .next()
        .and_then(|candidate| candidate.content)
        .map(|content| {
            content
                .parts
                .into_iter()
                .filter_map(|part| part.text)
                .collect::<Vec<_>>()
                .join("")
        })
        .unwrap_or_default()
}

impl GenerativeBackend for GeminiClient {
    fn generate(&self, request: &ModelRequest) -> Result<String, AppraisalError> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or_else(|| AppraisalError::Config("GEMINI_API_KEY is not set".to_string()))?;

        let url = format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url, self.model
        );

        let resp = self
            .client
            .post(&url)
            .header("x-goog-api-key", api_key)
            .header("Content-Type", "application/json")
            .json(&to_wire(request))
            .send()
            .map_err(|e| AppraisalError::Network(e.to_string()))?;

        if !resp.status().is_success() {
            let status = resp.status();
            let error_body = resp.text().unwrap_or_else(|_| "Unknown error".to_string());
            return Err(AppraisalError::Provider(format!(
                "generateContent returned {status}: {error_body}"
            )));
        }

        let body: GenerateResponse = resp
            .json()
            .map_err(|e| AppraisalError::Parse(e.to_string()))?;

        let text = first_candidate_text(body);
        if text.is_empty() {
            return Err(AppraisalError::Provider(
                "model returned no text candidates".to_string(),
            ));
        }
        Ok(text)
    }
}
