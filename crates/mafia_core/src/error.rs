use thiserror::Error;

pub mod error_codes {
    pub const VALIDATION_ERROR: &str = "engine.validation_error";
    pub const MISSING_ROLE: &str = "engine.missing_role";
    pub const MISSING_SEAT: &str = "engine.missing_seat";
    pub const UNKNOWN_ROLE: &str = "engine.unknown_role";
    pub const MISSING_STATE: &str = "engine.missing_state";
    pub const ACTOR_NOT_FOUND: &str = "engine.actor_not_found";
    pub const RNG_ERROR: &str = "engine.rng_error";
}

/// Failures of the selection helpers in [`crate::rng::EngineRng`].
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RngError {
    #[error("Cannot choose from an empty domain")]
    EmptyDomain,

    #[error("Weights length ({weights}) must match items length ({items})")]
    WeightMismatch { items: usize, weights: usize },
}

#[derive(Error, Debug)]
pub enum EngineError {
    #[error("Invalid engine input: {message}")]
    Validation { message: String, details: Vec<String> },

    #[error("Player role is required for game construction (player '{player_id}')")]
    MissingRole { player_id: String },

    #[error("Player seat number is required to load a game (player '{player_id}')")]
    MissingSeat { player_id: String },

    #[error("Unknown role: {0}")]
    UnknownRole(String),

    #[error("State is required to {action} a game")]
    MissingState { action: &'static str },

    #[error("Actor not found: seat {number}")]
    ActorNotFound { number: u8 },

    #[error(transparent)]
    Rng(#[from] RngError),
}

impl EngineError {
    pub fn validation(message: impl Into<String>, details: Vec<String>) -> Self {
        EngineError::Validation { message: message.into(), details }
    }

    pub fn code(&self) -> &'static str {
        match self {
            EngineError::Validation { .. } => error_codes::VALIDATION_ERROR,
            EngineError::MissingRole { .. } => error_codes::MISSING_ROLE,
            EngineError::MissingSeat { .. } => error_codes::MISSING_SEAT,
            EngineError::UnknownRole(_) => error_codes::UNKNOWN_ROLE,
            EngineError::MissingState { .. } => error_codes::MISSING_STATE,
            EngineError::ActorNotFound { .. } => error_codes::ACTOR_NOT_FOUND,
            EngineError::Rng(_) => error_codes::RNG_ERROR,
        }
    }

    /// Input errors abort the call; nothing in this enum is recoverable
    /// inside a round.
    pub fn is_input_error(&self) -> bool {
        !matches!(self, EngineError::Rng(_))
    }
}

impl From<serde_json::Error> for EngineError {
    fn from(err: serde_json::Error) -> Self {
        let details = vec![format!("line {}, column {}", err.line(), err.column())];
        EngineError::Validation { message: err.to_string(), details }
    }
}

pub type Result<T> = std::result::Result<T, EngineError>;
