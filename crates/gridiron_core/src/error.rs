use std::fmt;

#[derive(Debug)]
pub enum ConfigError {
    MissingSection(String),
    EmptyTable(String),
    InvalidTable { table: String, reason: String },
    ParseError(String),
}

#[derive(Debug)]
pub enum EngineError {
    Config(ConfigError),
    MissingPlayer(String),
    InvalidContext(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ConfigError::MissingSection(name) => {
                write!(f, "Configuration section missing: {}", name)
            }
            ConfigError::EmptyTable(name) => {
                write!(f, "Table unavailable: {} has no rows with positive weight", name)
            }
            ConfigError::InvalidTable { table, reason } => {
                write!(f, "Invalid table {}: {}", table, reason)
            }
            ConfigError::ParseError(msg) => write!(f, "Parse error: {}", msg),
        }
    }
}

impl std::error::Error for ConfigError {}

impl fmt::Display for EngineError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            EngineError::Config(err) => write!(f, "{}", err),
            EngineError::MissingPlayer(msg) => write!(f, "Missing player: {}", msg),
            EngineError::InvalidContext(msg) => write!(f, "Invalid context: {}", msg),
        }
    }
}

impl std::error::Error for EngineError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            EngineError::Config(err) => Some(err),
            _ => None,
        }
    }
}

impl From<ConfigError> for EngineError {
    fn from(err: ConfigError) -> Self {
        EngineError::Config(err)
    }
}

impl From<serde_yaml::Error> for ConfigError {
    fn from(err: serde_yaml::Error) -> Self {
        ConfigError::ParseError(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, EngineError>;
