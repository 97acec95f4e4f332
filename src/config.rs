use anyhow::{Context, Result};
use std::env;
use std::str::FromStr;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    Dev,
    Staging,
    Prod,
}

impl Environment {
    pub fn from_str(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "prod" | "production" => Self::Prod,
            "staging" => Self::Staging,
            _ => Self::Dev,
        }
    }

    pub fn is_dev(&self) -> bool {
        matches!(self, Self::Dev)
    }
}

/// Log output format. Defaults to JSON in prod and pretty elsewhere.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Pretty,
    Json,
}

impl LogFormat {
    fn parse(raw: Option<&str>, env: &Environment) -> Self {
        match raw.map(str::to_lowercase).as_deref() {
            Some("json") => Self::Json,
            Some("pretty") | Some("text") => Self::Pretty,
            _ if matches!(env, Environment::Prod) => Self::Json,
            _ => Self::Pretty,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Settings {
    pub env: Environment,
    pub log_format: LogFormat,
    pub server_addr: String,

    // Database
    pub database_url: Option<String>,
    pub database_max_connections: u32,

    // CORS
    pub cors_allow_origins: Vec<String>,

    // AI Service
    pub gemini_api_key: Option<String>,
    pub gemini_model: String,
    pub gemini_base_url: String,
    pub ai_timeout_seconds: u64,
    pub ai_retry_max_elapsed_seconds: u64,

    // Requests
    pub request_timeout_seconds: u64,
    pub recommendation_catalog_limit: i64,
}

fn parse_or<T: FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
    default: T,
) -> Result<T>
where
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .with_context(|| format!("{key} has an invalid value: {raw:?}")),
        None => Ok(default),
    }
}

impl Settings {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds settings from an arbitrary key lookup. Empty values count as
    /// unset.
    pub fn from_lookup(source: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let lookup = |key: &str| source(key).filter(|v| !v.trim().is_empty());

        let env = Environment::from_str(&lookup("ENV").unwrap_or_else(|| "dev".to_string()));
        let log_format = LogFormat::parse(lookup("LOG_FORMAT").as_deref(), &env);
        let server_addr = match lookup("PORT") {
            Some(port) => {
                let port: u16 = port
                    .trim()
                    .parse()
                    .with_context(|| format!("PORT has an invalid value: {port:?}"))?;
                format!("0.0.0.0:{port}")
            }
            None => lookup("SERVER_ADDR").unwrap_or_else(|| "0.0.0.0:8000".to_string()),
        };

        // Database
        let database_url = lookup("DATABASE_URL");
        let database_max_connections = parse_or(&lookup, "DATABASE_MAX_CONNECTIONS", 10)?;

        // CORS
        let cors_allow_origins = lookup("CORS_ALLOW_ORIGINS")
            .unwrap_or_else(|| "http://localhost:3000".to_string())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        // AI Service
        let gemini_api_key = lookup("GEMINI_API_KEY");
        let gemini_model = lookup("GEMINI_MODEL").unwrap_or_else(|| "gemini-2.0-flash".to_string());
        let gemini_base_url = lookup("GEMINI_BASE_URL")
            .unwrap_or_else(|| "https://generativelanguage.googleapis.com".to_string());
        url::Url::parse(&gemini_base_url)
            .with_context(|| format!("GEMINI_BASE_URL is not a valid URL: {gemini_base_url:?}"))?;
        let ai_timeout_seconds = parse_or(&lookup, "AI_TIMEOUT_SECONDS", 30)?;
        let ai_retry_max_elapsed_seconds = parse_or(&lookup, "AI_RETRY_MAX_ELAPSED_SECONDS", 20)?;

        // Requests
        let request_timeout_seconds = parse_or(&lookup, "REQUEST_TIMEOUT_SECONDS", 90)?;
        let recommendation_catalog_limit =
            parse_or(&lookup, "RECOMMENDATION_CATALOG_LIMIT", 100)?;

        Ok(Settings {
            env,
            log_format,
            server_addr,
            database_url,
            database_max_connections,
            cors_allow_origins,
            gemini_api_key,
            gemini_model,
            gemini_base_url,
            ai_timeout_seconds,
            ai_retry_max_elapsed_seconds,
            request_timeout_seconds,
            recommendation_catalog_limit,
        })
    }
}
