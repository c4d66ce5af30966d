use anyhow::anyhow;
use chrono_tz::Tz;
use std::env;
use std::fmt;
use std::str::FromStr;

const DEFAULT_MAIL_FROM: &str = "dailyattendance@semjjonline.xyz";
const DEFAULT_RESEND_API_URL: &str = "https://api.resend.com/emails";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MailProvider {
    Resend,
    Smtp,
    None,
}

impl MailProvider {
    pub fn as_str(&self) -> &'static str {
        match self {
            MailProvider::Resend => "resend",
            MailProvider::Smtp => "smtp",
            MailProvider::None => "none",
        }
    }
}

impl FromStr for MailProvider {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "resend" => Ok(MailProvider::Resend),
            "smtp" => Ok(MailProvider::Smtp),
            "none" | "disabled" | "log" => Ok(MailProvider::None),
            other => Err(anyhow!("Invalid MAIL_PROVIDER value: {}", other)),
        }
    }
}

#[derive(Clone)]
pub struct MailConfig {
    pub provider: MailProvider,
    pub from_address: String,
    pub resend_api_key: String,
    pub resend_api_url: String,
    pub smtp_host: String,
    pub smtp_port: u16,
    pub smtp_username: String,
    pub smtp_password: String,
}

impl fmt::Debug for MailConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MailConfig")
            .field("provider", &self.provider)
            .field("from_address", &self.from_address)
            .field("resend_api_key", &redacted(&self.resend_api_key))
            .field("resend_api_url", &self.resend_api_url)
            .field("smtp_host", &self.smtp_host)
            .field("smtp_port", &self.smtp_port)
            .field("smtp_username", &self.smtp_username)
            .field("smtp_password", &redacted(&self.smtp_password))
            .finish()
    }
}

fn redacted(secret: &str) -> &'static str {
    if secret.is_empty() {
        ""
    } else {
        "***"
    }
}

impl MailConfig {
    /// A transport that only logs; used when no provider is configured.
    pub fn disabled() -> Self {
        Self {
            provider: MailProvider::None,
            from_address: DEFAULT_MAIL_FROM.to_string(),
            resend_api_key: String::new(),
            resend_api_url: DEFAULT_RESEND_API_URL.to_string(),
            smtp_host: "localhost".to_string(),
            smtp_port: 587,
            smtp_username: String::new(),
            smtp_password: String::new(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub database_max_connections: u32,
    pub port: u16,
    pub time_zone: Tz,
    pub cors_allow_origins: Vec<String>,
    pub mail: MailConfig,
}

impl Config {
    pub fn load() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary key lookup so parsing can be
    /// exercised without touching the process environment.
    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let database_url = var("DATABASE_URL")
            .unwrap_or_else(|| "postgres://localhost:5432/attendance".to_string());

        let database_max_connections = parse_or(
            "DATABASE_MAX_CONNECTIONS",
            var("DATABASE_MAX_CONNECTIONS"),
            10,
        )?;
        let port = parse_or("PORT", var("PORT"), 5000)?;

        let time_zone_name = var("APP_TIMEZONE").unwrap_or_else(|| "UTC".to_string());
        let time_zone: Tz = time_zone_name
            .parse()
            .map_err(|_| anyhow!("Invalid APP_TIMEZONE value: {}", time_zone_name))?;

        let cors_allow_origins = var("CORS_ALLOW_ORIGINS")
            .unwrap_or_else(|| "*".to_string())
            .split(',')
            .map(|origin| origin.trim().to_string())
            .filter(|origin| !origin.is_empty())
            .collect();

        let resend_api_key = var("RESEND_API_KEY").unwrap_or_default();
        let smtp_host = var("SMTP_HOST").unwrap_or_else(|| "localhost".to_string());
        let provider = match var("MAIL_PROVIDER") {
            Some(value) => value.parse()?,
            None if !resend_api_key.is_empty() => MailProvider::Resend,
            None => MailProvider::None,
        };
        if provider == MailProvider::Resend && resend_api_key.is_empty() {
            return Err(anyhow!("MAIL_PROVIDER=resend requires RESEND_API_KEY"));
        }

        let mail = MailConfig {
            provider,
            from_address: var("MAIL_FROM").unwrap_or_else(|| DEFAULT_MAIL_FROM.to_string()),
            resend_api_key,
            resend_api_url: var("RESEND_API_URL")
                .unwrap_or_else(|| DEFAULT_RESEND_API_URL.to_string()),
            smtp_host,
            smtp_port: parse_or("SMTP_PORT", var("SMTP_PORT"), 587)?,
            smtp_username: var("SMTP_USERNAME").unwrap_or_default(),
            smtp_password: var("SMTP_PASSWORD").unwrap_or_default(),
        };

        Ok(Config {
            database_url,
            database_max_connections,
            port,
            time_zone,
            cors_allow_origins,
            mail,
        })
    }

    pub fn allows_any_origin(&self) -> bool {
        self.cors_allow_origins.iter().any(|origin| origin == "*")
    }
}

fn parse_or<T>(key: &str, value: Option<String>, default: T) -> anyhow::Result<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match value {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|e| anyhow!("Invalid {} value {:?}: {}", key, raw, e)),
        None => Ok(default),
    }
}
