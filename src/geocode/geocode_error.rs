use std::error::Error;
use std::fmt;

#[derive(Debug)]
pub enum GeocodeError {
    Network(String),
    Provider(String),
    Parse(String),
}

impl fmt::Display for GeocodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GeocodeError::Network(msg) => write!(f, "Network error: {msg}"),
            GeocodeError::Provider(msg) => write!(f, "Provider error: {msg}"),
            GeocodeError::Parse(msg) => write!(f, "Response parse error: {msg}"),
        }
    }
}

impl Error for GeocodeError {}
