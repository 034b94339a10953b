mod environment;
mod settings;

pub use environment::Environment;
pub use settings::{
    IntakeSettings, LoggingSettings, ReportSettings, RewriteSettings, ServerSettings, Settings,
    SmtpSettings, TranscriptionSettings, TransportSettings,
};
