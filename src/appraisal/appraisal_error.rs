use std::error::Error;
use std::fmt;

#[derive(Debug)]
pub enum AppraisalError {
    Config(String),
    Network(String),
    Provider(String),
    Parse(String),
}

impl fmt::Display for AppraisalError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppraisalError::Config(msg) => write!(f, "Configuration error: {msg}"),
            AppraisalError::Network(msg) => write!(f, "Network error: {msg}"),
            AppraisalError::Provider(msg) => write!(f, "Provider error: {msg}"),
            AppraisalError::Parse(msg) => write!(f, "Output parse error: {msg}"),
        }
    }
}

impl Error for AppraisalError {}
