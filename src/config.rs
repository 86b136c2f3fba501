use std::env;

/// Runtime configuration, read once at startup. Everything has a default so
/// the server boots without any environment; GEMINI_API_KEY is the one value
/// that must be present for appraisals to succeed, and its absence is
/// reported per-request rather than at boot.
#[derive(Clone, Debug)]
pub struct AppConfig {
    pub database_path: String,
    pub evidence_dir: String,
    pub server_host: String,
    pub server_port: u16,
    pub gemini_api_key: Option<String>,
    pub gemini_model: String,
    pub gemini_url: String,
    pub nominatim_url: String,
}

impl AppConfig {
    pub fn from_env() -> Self {
        let database_path =
            env::var("DATABASE_PATH").unwrap_or_else(|_| "real_estate.db".to_string());
        let evidence_dir = env::var("EVIDENCE_DIR").unwrap_or_else(|_| "data/evidence".to_string());
        let server_host = env::var("SERVER_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let server_port = env::var("SERVER_PORT")
            .ok()
            .and_then(|value| value.parse().ok())
            .unwrap_or(3000);
        let gemini_api_key = env::var("GEMINI_API_KEY").ok().filter(|k| !k.is_empty());
        let gemini_model =
            env::var("GEMINI_MODEL").unwrap_or_else(|_| "gemini-flash-latest".to_string());
        let gemini_url = env::var("GEMINI_URL")
            .unwrap_or_else(|_| "https://generativelanguage.googleapis.com".to_string());
        let nominatim_url = env::var("NOMINATIM_URL")
            .unwrap_or_else(|_| "https://nominatim.openstreetmap.org".to_string());

        Self {
            database_path,
            evidence_dir,
            server_host,
            server_port,
            gemini_api_key,
            gemini_model,
            gemini_url,
            nominatim_url,
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            database_path: "real_estate.db".to_string(),
            evidence_dir: "data/evidence".to_string(),
            server_host: "127.0.0.1".to_string(),
            server_port: 3000,
            gemini_api_key: None,
            gemini_model: "gemini-flash-latest".to_string(),
            gemini_url: "https://generativelanguage.googleapis.com".to_string(),
            nominatim_url: "https://nominatim.openstreetmap.org".to_string(),
        }
    }
}
