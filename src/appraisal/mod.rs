mod appraisal_error;
mod client;
mod gemini;
mod models;
mod request;

pub use appraisal_error::AppraisalError;
pub use client::{parse_appraisal, strip_code_fences, AppraisalClient, RetryPolicy};
pub use gemini::GeminiClient;
pub use models::{GenerativeBackend, ModelRequest, RequestPart};
pub use request::build_appraisal_request;
