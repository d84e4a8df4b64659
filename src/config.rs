use std::env;
use std::sync::LazyLock;
use std::time::Duration;

use regex::Regex;

pub const DEFAULT_AI_API_URL: &str = "https://api.openai.com/v1/chat/completions";
pub const DEFAULT_AI_MODEL: &str = "llama-3.3-70b-versatile";

const DEFAULT_PORT: &str = "5000";
const DEFAULT_JWT_EXPIRE: &str = "7d";
const DEFAULT_CORS_ORIGINS: [&str; 3] = [
    "http://localhost:5173",
    "http://localhost:8080",
    "http://localhost:8081",
];

static EXPIRY_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d+)\s*([smhd]?)$").expect("expiry pattern compiles"));

#[derive(Debug, Clone)]
pub struct Config {
    pub port: String,
    pub auth: AuthConfig,
    pub ai: AiConfig,
    pub cors_origins: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct AuthConfig {
    pub jwt_secret: String,
    pub token_ttl: Duration,
    pub bcrypt_cost: u32,
}

/// Settings for the remote program generator. A missing key is not an error:
/// the engine simply stays on its local generator.
#[derive(Debug, Clone)]
pub struct AiConfig {
    pub api_url: String,
    pub api_key: Option<String>,
    pub model: String,
    pub timeout: Option<Duration>,
}

impl Default for AiConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_AI_API_URL.to_string(),
            api_key: None,
            model: DEFAULT_AI_MODEL.to_string(),
            timeout: None,
        }
    }
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let non_empty = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let jwt_secret =
            non_empty("JWT_SECRET").ok_or_else(|| anyhow::anyhow!("JWT_SECRET must be set"))?;
        let port = non_empty("PORT").unwrap_or_else(|| DEFAULT_PORT.to_string());

        let token_ttl = parse_expiry(
            &non_empty("JWT_EXPIRE").unwrap_or_else(|| DEFAULT_JWT_EXPIRE.to_string()),
        )?;

        let bcrypt_cost = match non_empty("BCRYPT_COST") {
            Some(raw) => raw
                .trim()
                .parse()
                .map_err(|e| anyhow::anyhow!("Invalid BCRYPT_COST '{}': {}", raw, e))?,
            None => bcrypt::DEFAULT_COST,
        };

        let cors_origins: Vec<String> = match non_empty("CORS_ORIGIN") {
            Some(raw) => raw
                .split(',')
                .map(|origin| origin.trim().to_string())
                .filter(|origin| !origin.is_empty())
                .collect(),
            None => DEFAULT_CORS_ORIGINS.iter().map(|o| o.to_string()).collect(),
        };
        // Credentialed CORS responses cannot use a wildcard origin.
        if cors_origins.iter().any(|origin| origin == "*") {
            anyhow::bail!("CORS_ORIGIN must list explicit origins, '*' is not allowed");
        }

        let timeout = match non_empty("AI_TIMEOUT_SECS") {
            Some(raw) => Some(Duration::from_secs(raw.trim().parse().map_err(|e| {
                anyhow::anyhow!("Invalid AI_TIMEOUT_SECS '{}': {}", raw, e)
            })?)),
            None => None,
        };

        let ai = AiConfig {
            api_url: non_empty("AI_API_URL").unwrap_or_else(|| DEFAULT_AI_API_URL.to_string()),
            api_key: non_empty("AI_API_KEY"),
            model: non_empty("AI_MODEL").unwrap_or_else(|| DEFAULT_AI_MODEL.to_string()),
            timeout,
        };

        Ok(Self {
            port,
            auth: AuthConfig {
                jwt_secret,
                token_ttl,
                bcrypt_cost,
            },
            ai,
            cors_origins,
        })
    }
}

/// Parses token lifetimes such as `7d`, `12h`, `30m`, `45s` or bare seconds.
pub fn parse_expiry(raw: &str) -> anyhow::Result<Duration> {
    let captures = EXPIRY_PATTERN
        .captures(raw.trim())
        .ok_or_else(|| anyhow::anyhow!("Invalid JWT_EXPIRE value '{}'", raw))?;

    let amount: u64 = captures[1]
        .parse()
        .map_err(|e| anyhow::anyhow!("Invalid JWT_EXPIRE value '{}': {}", raw, e))?;

    let seconds = match &captures[2] {
        "m" => amount * 60,
        "h" => amount * 60 * 60,
        "d" => amount * 24 * 60 * 60,
        _ => amount,
    };

    Ok(Duration::from_secs(seconds))
}
