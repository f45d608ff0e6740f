use thiserror::Error;

/// Failure of a single backend request.
///
/// Transport, HTTP status and `success:false` all end up on the same
/// error screen; the variants only differ in how the message is chosen.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("{0}")]
    Transport(String),
    #[error("HTTP ошибка: {0}")]
    Status(u16),
    #[error("rejected by server")]
    Rejected(Option<String>),
    #[error("invalid response body: {0}")]
    Decode(String),
}

impl From<reqwest::Error> for FetchError {
    fn from(e: reqwest::Error) -> Self {
        if let Some(status) = e.status() {
            FetchError::Status(status.as_u16())
        } else if e.is_decode() {
            FetchError::Decode(e.to_string())
        } else {
            FetchError::Transport(e.to_string())
        }
    }
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("preference file error: {0}")]
    Io(#[from] std::io::Error),
    #[error("preference encoding error: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config file error: {0}")]
    Io(#[from] std::io::Error),
    #[error("config parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("config root must be a mapping")]
    NotAMapping,
}

#[derive(Debug, Error)]
pub enum LogError {
    #[error("cannot open log file: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid logger config: {0}")]
    Config(#[from] log4rs::config::runtime::ConfigErrors),
    #[error("logger already set: {0}")]
    SetLogger(#[from] log::SetLoggerError),
}
