use std::path::PathBuf;

/// Errors that can occur when loading or validating configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    FileRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse TOML: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("config validation error: {0}")]
    Validation(String),
}

/// Errors raised by an agent when the controller hands it a bad index.
///
/// These indicate a defect in the caller and are never retried.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AgentError {
    #[error("choice {choice} out of range (n_options: {n_options})")]
    ChoiceOutOfRange { choice: usize, n_options: usize },

    #[error("trial {t} out of range (t_max: {t_max})")]
    TrialOutOfRange { t: usize, t_max: usize },

    #[error("agent has {field} = {agent} but the task has {field} = {task}")]
    TaskMismatch {
        field: &'static str,
        agent: usize,
        task: usize,
    },
}

/// Errors that can occur while persisting simulation results.
#[derive(Debug, thiserror::Error)]
pub enum SinkError {
    #[error("failed to create data directory {path}: {source}")]
    CreateDir {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to read results from {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse results from {path}: {source}")]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Errors that can occur during a simulation run.
#[derive(Debug, thiserror::Error)]
pub enum SimulationError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("agent {agent} of {model} failed: {source}")]
    Agent {
        model: &'static str,
        agent: usize,
        source: AgentError,
    },

    #[error("result sink error: {0}")]
    Sink(#[from] SinkError),
}
