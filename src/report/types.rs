//! Error types for report construction and serialization.

use crate::screenshot::CaptureError;

/// Result type for report operations
pub type ReportResult<T> = Result<T, ReportError>;

/// Error types for report operations
#[derive(Debug)]
pub enum ReportError {
    /// A step started while no scenario or step was open
    StepWithoutOpenNode { step: String },

    /// A step completion arrived while no step was open
    UnexpectedStepCompletion { step: String },

    /// A completion referenced a scenario id that never started
    UnknownScenario { id: String },

    /// A node was completed a second time
    AlreadyCompleted { name: String },

    /// A screenshot capture rejected during serialization
    Capture(CaptureError),

    /// JSON assembly error
    Serialization(serde_json::Error),
}

impl std::fmt::Display for ReportError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ReportError::StepWithoutOpenNode { step } => {
                write!(f, "Step '{}' started with no open scenario or step", step)
            }
            ReportError::UnexpectedStepCompletion { step } => {
                write!(f, "Step '{}' completed but no step is open", step)
            }
            ReportError::UnknownScenario { id } => {
                write!(f, "Completion for unknown scenario '{}'", id)
            }
            ReportError::AlreadyCompleted { name } => {
                write!(f, "Node '{}' was already completed", name)
            }
            ReportError::Capture(err) => write!(f, "Screenshot error: {}", err),
            ReportError::Serialization(err) => write!(f, "Serialization error: {}", err),
        }
    }
}

impl std::error::Error for ReportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ReportError::Capture(err) => Some(err),
            ReportError::Serialization(err) => Some(err),
            _ => None,
        }
    }
}

impl From<CaptureError> for ReportError {
    fn from(err: CaptureError) -> Self {
        ReportError::Capture(err)
    }
}

impl From<serde_json::Error> for ReportError {
    fn from(err: serde_json::Error) -> Self {
        ReportError::Serialization(err)
    }
}
