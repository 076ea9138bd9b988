//! Error types for the Guise identity overlay engine
//!
//! All errors are local to a single requested operation; none corrupt
//! registry state. Caller precondition violations (`AlreadyDisguised`,
//! `NotDisguised`) surface synchronously to the operator layer, while pool
//! exhaustion is fatal to the single disguise request that hit it.

use crate::types::ParticipantId;

/// Core error types for the Guise engine
#[derive(Debug, thiserror::Error)]
pub enum GuiseError {
    #[error("Participant {participant} is already disguised")]
    AlreadyDisguised { participant: ParticipantId },

    #[error("Participant {participant} is not disguised")]
    NotDisguised { participant: ParticipantId },

    #[error("Participant {participant} is not connected")]
    NotConnected { participant: ParticipantId },

    #[error("Skin pool is empty")]
    EmptyPool,

    #[error("Name pool exhausted after {attempts} candidates")]
    NamePoolExhausted { attempts: usize },

    #[error("Avatar fetch failed: {reason}")]
    AvatarFetch { reason: String },

    #[error("Invalid identifier: {message}")]
    InvalidIdentifier { message: String },

    /// Channel communication error (internal to the runtime architecture)
    #[error("Channel error: {message}")]
    Channel { message: String },
}

// ----------------------------------------------------------------------------
// Convenience Error Constructors
// ----------------------------------------------------------------------------

impl GuiseError {
    /// Create an invalid identifier error with a message
    pub fn invalid_identifier<T: Into<String>>(message: T) -> Self {
        GuiseError::InvalidIdentifier {
            message: message.into(),
        }
    }

    /// Create a channel error with a message
    pub fn channel_error<T: Into<String>>(message: T) -> Self {
        GuiseError::Channel {
            message: message.into(),
        }
    }

    /// Create an avatar fetch error with a reason
    pub fn avatar_fetch<T: Into<String>>(reason: T) -> Self {
        GuiseError::AvatarFetch {
            reason: reason.into(),
        }
    }
}

// ----------------------------------------------------------------------------
// Type Aliases
// ----------------------------------------------------------------------------

pub type Result<T> = core::result::Result<T, GuiseError>;
