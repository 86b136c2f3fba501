use crate::appraisal::{AppraisalError, GenerativeBackend, ModelRequest};
use crate::domain::appraisal::AppraisalResult;
use std::sync::Arc;
use std::time::Duration;
use tracing::warn;

/// Attempt budget for one appraisal: three tries with a beat of backoff
/// in between.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub backoff: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            backoff: Duration::from_secs(1),
        }
    }
}

pub struct AppraisalClient {
    backend: Arc<dyn GenerativeBackend>,
    retry: RetryPolicy,
}

impl AppraisalClient {
    pub fn new(backend: Arc<dyn GenerativeBackend>, retry: RetryPolicy) -> Self {
        Self { backend, retry }
    }

    /// Runs a request through to an accepted appraisal. Provider errors and
    /// unparseable replies both consume an attempt; when the budget runs out
    /// the last error comes back with its message intact.
    pub fn submit(&self, request: &ModelRequest) -> Result<AppraisalResult, AppraisalError> {
        let mut last_err = None;

        for attempt in 1..=self.retry.max_attempts {
            match self.try_once(request) {
                Ok(result) => return Ok(result),
                Err(e) => {
                    warn!("appraisal attempt {attempt} failed: {e}");
                    last_err = Some(e);
                    if attempt < self.retry.max_attempts {
                        std::thread::sleep(self.retry.backoff);
                    }
                }
            }
        }

        Err(last_err
            .unwrap_or_else(|| AppraisalError::Provider("no attempts were made".to_string())))
    }

    fn try_once(&self, request: &ModelRequest) -> Result<AppraisalResult, AppraisalError> {
        let text = self.backend.generate(request)?;
        parse_appraisal(&text)
    }
}

/// Removes markdown code fences the model likes to wrap JSON in. Fence-free
/// text passes through untouched.
pub fn strip_code_fences(text: &str) -> String {
    text.replace("```json", "")
        .replace("```", "")
        .trim()
        .to_string()
}

pub fn parse_appraisal(text: &str) -> Result<AppraisalResult, AppraisalError> {
    let cleaned = strip_code_fences(text);
    serde_json::from_str(&cleaned).map_err(|e| AppraisalError::Parse(e.to_string()))
}
