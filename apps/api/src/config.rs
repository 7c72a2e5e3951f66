use anyhow::{Context, Result};

/// Application configuration loaded from environment variables.
///
/// `DATABASE_URL` is optional: when it is absent the process runs against
/// the in-memory store. Object-storage settings carry development
/// placeholders so the server boots without a configured bucket.
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: Option<String>,
    pub s3_endpoint: String,
    pub aws_access_key_id: String,
    pub aws_secret_access_key: String,
    pub s3_bucket: String,
    pub s3_public_url: String,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            database_url: std::env::var("DATABASE_URL")
                .ok()
                .filter(|v| !v.is_empty()),
            s3_endpoint: env_or(
                "S3_ENDPOINT",
                "https://your-account-id.r2.cloudflarestorage.com",
            ),
            aws_access_key_id: env_or("AWS_ACCESS_KEY_ID", "dev-access-key"),
            aws_secret_access_key: env_or("AWS_SECRET_ACCESS_KEY", "dev-secret-key"),
            s3_bucket: env_or("S3_BUCKET", "jobflow-resumes"),
            s3_public_url: env_or("S3_PUBLIC_URL", "https://resumes.jobflow.dev"),
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        })
    }
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}
