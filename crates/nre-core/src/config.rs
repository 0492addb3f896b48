use crate::app_config::{AppConfig, EmbeddingBackend, Environment};
use crate::ConfigError;

/// Largest ranking size `NRE_TOP_K` may request.
pub const MAX_TOP_K: usize = 5;

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if required env vars are missing or values are invalid.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files.
///
/// # Errors
///
/// Returns `ConfigError` if required env vars are missing or values are invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// Decoupled from the real environment so tests can use a plain `HashMap`.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::net::SocketAddr;
    use std::path::PathBuf;

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let optional = |var: &str| -> Option<String> {
        lookup(var)
            .ok()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    };

    let invalid = |var: &str, reason: String| ConfigError::InvalidEnvVar {
        var: var.to_string(),
        reason,
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        or_default(var, default)
            .parse::<u64>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let env = parse_environment(&or_default("NRE_ENV", "development"))?;

    let bind_addr = or_default("NRE_BIND_ADDR", "0.0.0.0:8000")
        .parse::<SocketAddr>()
        .map_err(|e| invalid("NRE_BIND_ADDR", e.to_string()))?;
    let log_level = or_default("NRE_LOG_LEVEL", "info");
    let ticks_path = PathBuf::from(or_default("NRE_TICKS_PATH", "./data/ticks_dataset.json"));

    let embedding_backend = parse_backend(&or_default("NRE_EMBEDDING_BACKEND", "local"))?;
    let embedding_model = or_default("NRE_EMBEDDING_MODEL", "all-MiniLM-L6-v2");
    let model_cache_dir = optional("NRE_MODEL_CACHE_DIR").map(PathBuf::from);

    let tei_url = optional("NRE_TEI_URL").map(|u| u.trim_end_matches('/').to_string());
    if embedding_backend == EmbeddingBackend::Tei && tei_url.is_none() {
        return Err(ConfigError::MissingEnvVar("NRE_TEI_URL".to_string()));
    }
    let tei_timeout_secs = parse_u64("NRE_TEI_TIMEOUT_SECS", "30")?;

    let scraper_program = or_default("NRE_SCRAPER_PROGRAM", "node");
    let scraper_script = match lookup("NRE_SCRAPER_SCRIPT") {
        Ok(raw) if raw.trim().is_empty() => None,
        Ok(raw) => Some(raw),
        Err(_) => Some("backend/app/scraper.js".to_string()),
    };
    let scraper_timeout_secs = parse_u64("NRE_SCRAPER_TIMEOUT_SECS", "60")?;

    let top_k = or_default("NRE_TOP_K", "5")
        .parse::<usize>()
        .map_err(|e| invalid("NRE_TOP_K", e.to_string()))?;
    if !(1..=MAX_TOP_K).contains(&top_k) {
        return Err(invalid(
            "NRE_TOP_K",
            format!("must be between 1 and {MAX_TOP_K}"),
        ));
    }

    Ok(AppConfig {
        env,
        bind_addr,
        log_level,
        ticks_path,
        embedding_backend,
        embedding_model,
        model_cache_dir,
        tei_url,
        tei_timeout_secs,
        scraper_program,
        scraper_script,
        scraper_timeout_secs,
        top_k,
    })
}

/// Parse a string into an `Environment` variant.
///
/// # Errors
///
/// Returns `ConfigError::InvalidEnvVar` for unrecognized values.
fn parse_environment(s: &str) -> Result<Environment, ConfigError> {
    match s {
        "development" => Ok(Environment::Development),
        "test" => Ok(Environment::Test),
        "production" => Ok(Environment::Production),
        other => Err(ConfigError::InvalidEnvVar {
            var: "NRE_ENV".to_string(),
            reason: format!("unknown environment '{other}'"),
        }),
    }
}

fn parse_backend(s: &str) -> Result<EmbeddingBackend, ConfigError> {
    match s.to_ascii_lowercase().as_str() {
        "local" => Ok(EmbeddingBackend::Local),
        "tei" => Ok(EmbeddingBackend::Tei),
        other => Err(ConfigError::InvalidEnvVar {
            var: "NRE_EMBEDDING_BACKEND".to_string(),
            reason: format!("expected 'local' or 'tei', got '{other}'"),
        }),
    }
}
