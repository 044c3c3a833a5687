use std::net::IpAddr;

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub jwt_secret: String,
    pub host: IpAddr,
    pub port: u16,
    pub mail_from: String,
    pub max_body_size: usize,
    pub log_level: String,
    pub smtp: SmtpConfig,
}

#[derive(Debug, Clone)]
pub struct SmtpConfig {
    pub host: String,
    pub port: u16,
    pub user: String,
    pub pass: String,
}

impl Config {
    pub fn from_env() -> Result<Self, String> {
        let database_url = env_required("DATABASE_URL")?;
        let jwt_secret = env_required("JWT_SECRET")?;

        let host: IpAddr = env_or("ROLEPLAY_HOST", "0.0.0.0")
            .parse()
            .map_err(|e| format!("Invalid ROLEPLAY_HOST: {e}"))?;

        let port: u16 = env_or("ROLEPLAY_PORT", "3333")
            .parse()
            .map_err(|e| format!("Invalid ROLEPLAY_PORT: {e}"))?;

        let mail_from = env_or("ROLEPLAY_MAIL_FROM", "no-reply@roleplay.com");

        let max_body_size: usize = env_or("ROLEPLAY_MAX_BODY_SIZE", "1048576")
            .parse()
            .map_err(|e| format!("Invalid ROLEPLAY_MAX_BODY_SIZE: {e}"))?;

        let log_level = env_or("ROLEPLAY_LOG_LEVEL", "info");

        let smtp = SmtpConfig {
            host: env_required("ROLEPLAY_SMTP_HOST")?,
            port: env_or("ROLEPLAY_SMTP_PORT", "587")
                .parse()
                .map_err(|e| format!("Invalid ROLEPLAY_SMTP_PORT: {e}"))?,
            user: env_required("ROLEPLAY_SMTP_USER")?,
            pass: env_required("ROLEPLAY_SMTP_PASS")?,
        };

        Ok(Config {
            database_url,
            jwt_secret,
            host,
            port,
            mail_from,
            max_body_size,
            log_level,
            smtp,
        })
    }
}

fn env_required(key: &str) -> Result<String, String> {
    std::env::var(key).map_err(|_| format!("Missing required environment variable: {key}"))
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}
