use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    // Descriptor errors
    #[error("Missing required {field} for {mode} descriptor")]
    MissingFrameField {
        mode: &'static str,
        field: &'static str,
    },

    #[error("Invalid hardware descriptor: {message}")]
    InvalidDescriptor { message: String },

    // Payload errors
    #[error("Invalid item payload: {message}")]
    InvalidPayload { message: String },

    // IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Create a missing frame field error.
    pub fn missing_frame_field(mode: &'static str, field: &'static str) -> Self {
        Self::MissingFrameField { mode, field }
    }

    /// Create an invalid descriptor error.
    pub fn invalid_descriptor(message: impl Into<String>) -> Self {
        Self::InvalidDescriptor {
            message: message.into(),
        }
    }

    /// Create an invalid payload error.
    pub fn invalid_payload(message: impl Into<String>) -> Self {
        Self::InvalidPayload {
            message: message.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
