use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoreError {
    #[error("invalid stored value for setting '{key}': {message}")]
    InvalidSettingValue { key: String, message: String },

    #[error("unknown setting key '{0}'")]
    UnknownSettingKey(String),

    #[error("template is missing a name: {0}")]
    MissingTemplateName(&'static str),
}

pub type Result<T> = std::result::Result<T, CoreError>;
