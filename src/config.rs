use std::env;
use std::path::PathBuf;
use std::time::Duration;

use crate::models::ai_settings::DEFAULT_TIMEOUT_SECS;
use crate::models::{AiProvider, AiSettings};

#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub static_path: PathBuf,
    /// JSON profile loaded at startup. The built-in demo profile is used when unset.
    pub profile_path: Option<PathBuf>,
    pub ai: AiSettings,
}

impl Config {
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        let provider = match env::var("FINADVISOR_AI_PROVIDER") {
            Ok(value) => value.parse().unwrap_or_else(|_| {
                tracing::warn!(
                    "Unknown FINADVISOR_AI_PROVIDER '{}', using {}",
                    value,
                    AiProvider::default().as_str()
                );
                AiProvider::default()
            }),
            Err(_) => AiProvider::default(),
        };

        let api_key = env::var("FINADVISOR_AI_API_KEY")
            .or_else(|_| env::var("API_KEY"))
            .ok();

        let timeout_secs = env::var("FINADVISOR_AI_TIMEOUT_SECS")
            .ok()
            .and_then(|t| t.parse().ok())
            .unwrap_or(DEFAULT_TIMEOUT_SECS);

        let ai = AiSettings::new(
            provider,
            env::var("FINADVISOR_AI_BASE_URL").ok(),
            api_key,
            env::var("FINADVISOR_AI_MODEL").ok(),
        )
        .with_timeout(Duration::from_secs(timeout_secs));

        Self {
            host: env::var("FINADVISOR_HOST").unwrap_or_else(|_| "0.0.0.0".into()),
            port: env::var("FINADVISOR_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(7070),
            static_path: env::var("FINADVISOR_STATIC_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("static")),
            profile_path: env::var("FINADVISOR_PROFILE_PATH")
                .ok()
                .filter(|p| !p.is_empty())
                .map(PathBuf::from),
            ai,
        }
    }

    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
