use thiserror::Error;

/// Error types for gesture configuration
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MotionError {
    /// No gesture preset with this name
    #[error("Unknown gesture preset: '{0}' (expected one of: flap, wave, greet)")]
    UnknownPreset(String),

    /// Session parameters that cannot be played
    #[error("Invalid session: {0}")]
    InvalidSession(String),

    /// Stage configuration that cannot be used
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Result type using MotionError
pub type Result<T> = std::result::Result<T, MotionError>;

/// Error building a stage from a model file
#[derive(Error, Debug)]
pub enum StageError {
    /// The model could not be loaded
    #[error(transparent)]
    Load(#[from] avatar_rig::LoadError),

    /// The stage configuration was rejected
    #[error(transparent)]
    Config(#[from] MotionError),
}
