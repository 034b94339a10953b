use std::path::PathBuf;

use config::{Config, ConfigError, Environment as EnvironmentSource, File};
use serde::Deserialize;

use super::Environment;

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub server: ServerSettings,
    pub transport: TransportSettings,
    pub transcription: TranscriptionSettings,
    pub rewrite: RewriteSettings,
    pub smtp: SmtpSettings,
    pub report: ReportSettings,
    pub intake: IntakeSettings,
    pub logging: LoggingSettings,
}

impl Settings {
    /// Layered load: `appsettings.{environment}.toml` first, then
    /// `APP__`-prefixed environment variables (`APP__SMTP__PASSWORD`
    /// overrides `smtp.password`). Secrets are expected from the
    /// environment, not the checked-in file.
    pub fn load(environment: Environment) -> Result<Self, ConfigError> {
        Config::builder()
            .add_source(
                File::with_name(&format!("appsettings.{}", environment.as_str())).required(false),
            )
            .add_source(
                EnvironmentSource::with_prefix("APP")
                    .prefix_separator("__")
                    .separator("__"),
            )
            .build()?
            .try_deserialize()
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TransportSettings {
    pub base_url: String,
    pub bot_token: String,
    /// The bot's own address; inbound messages from it are ignored.
    pub bot_email: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TranscriptionSettings {
    pub api_key: String,
    pub base_url: String,
    pub model: String,
    /// Transcription language, pinned so short clips are not misdetected.
    pub language: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RewriteSettings {
    pub api_key: String,
    pub base_url: String,
    pub model: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SmtpSettings {
    pub host: String,
    pub username: String,
    pub password: String,
    pub sender: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ReportSettings {
    pub template_path: PathBuf,
    pub output_dir: PathBuf,
    pub recipient: String,
    pub mail_subject: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct IntakeSettings {
    /// Roster offered on the investigator selection card.
    pub investigators: Vec<String>,
    pub collaborator_timeout_seconds: u64,
    /// When set, sessions are persisted to this file and survive a
    /// restart; otherwise they live in process memory only.
    pub session_file: Option<PathBuf>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingSettings {
    pub level: String,
    pub enable_json: bool,
}
