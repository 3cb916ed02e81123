#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum ConfigurationError {
    #[error("unknown session variable '{0}'")]
    UnknownVariable(String),
    #[error("invalid value '{value}' for session variable '{key}': {reason}")]
    InvalidValue {
        key: String,
        value: String,
        reason: String,
    },
    #[error("value '{value}' for session variable '{key}' is out of range [{min}, {max}]")]
    OutOfRange {
        key: String,
        value: String,
        min: i64,
        max: i64,
    },
}
