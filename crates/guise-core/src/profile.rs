//! Profiles, participants, and overlay records
//!
//! Two identity variants exist per disguised participant: the *real* profile
//! captured at disguise time, and a synthesized *substitute* profile carrying
//! the real account ID but a substitute display name and avatar. The
//! [`IdentityOverlay`] record binds both together for the lifetime of a
//! disguise.

use serde::{Deserialize, Serialize};

use crate::types::{GameMode, ParticipantId, Timestamp};

// ----------------------------------------------------------------------------
// Avatar Descriptor
// ----------------------------------------------------------------------------

/// Opaque avatar descriptor: texture blob plus optional signature.
///
/// The engine never inspects the contents; it only moves descriptors between
/// the pool and broadcast entries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AvatarDescriptor {
    pub texture: String,
    pub signature: Option<String>,
}

impl AvatarDescriptor {
    /// Create a new avatar descriptor
    pub fn new(texture: impl Into<String>, signature: Option<String>) -> Self {
        Self {
            texture: texture.into(),
            signature,
        }
    }

    /// Default descriptor used when the skin pool is unavailable.
    ///
    /// Skin-pool emptiness is non-fatal to disguise: avatar collision or
    /// absence is cosmetically harmless while name collision is not.
    pub fn placeholder() -> Self {
        Self {
            texture: String::new(),
            signature: None,
        }
    }

    /// Whether this is the placeholder descriptor
    pub fn is_placeholder(&self) -> bool {
        self.texture.is_empty() && self.signature.is_none()
    }
}

// ----------------------------------------------------------------------------
// Profile
// ----------------------------------------------------------------------------

/// A participant profile: durable account ID, display name, avatar.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    /// Durable account identifier, stable across sessions and disguise
    pub account_id: ParticipantId,
    /// Presented display name
    pub name: String,
    /// Presented avatar descriptor
    pub avatar: AvatarDescriptor,
}

impl Profile {
    /// Create a new profile
    pub fn new(account_id: ParticipantId, name: impl Into<String>, avatar: AvatarDescriptor) -> Self {
        Self {
            account_id,
            name: name.into(),
            avatar,
        }
    }
}

// ----------------------------------------------------------------------------
// Participant
// ----------------------------------------------------------------------------

/// A currently-connected participant as seen by the host session layer.
///
/// `display_name` is the locally-visible display metadata the registry
/// updates on disguise and restores on undisguise; `profile` stays the real
/// profile throughout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Participant {
    pub profile: Profile,
    pub display_name: String,
    pub latency: u32,
    pub mode: GameMode,
}

impl Participant {
    /// Create a participant whose display name matches the profile name
    pub fn new(profile: Profile) -> Self {
        let display_name = profile.name.clone();
        Self {
            profile,
            display_name,
            latency: 0,
            mode: GameMode::default(),
        }
    }

    /// The participant's durable account identifier
    pub fn id(&self) -> ParticipantId {
        self.profile.account_id
    }
}

// ----------------------------------------------------------------------------
// Identity Overlay
// ----------------------------------------------------------------------------

/// The unit of state per disguised participant.
///
/// Invariant: `substitute.account_id == real.account_id`. Only the presented
/// name and avatar change; identity continuity is preserved at the session
/// level. The constructor is the only way to build one, so the invariant
/// holds by construction. Never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdentityOverlay {
    participant_id: ParticipantId,
    real: Profile,
    substitute: Profile,
    created_at: Timestamp,
}

impl IdentityOverlay {
    /// Build an overlay from the real profile and the allocated substitutes.
    pub fn new(
        real: Profile,
        substitute_name: impl Into<String>,
        substitute_avatar: AvatarDescriptor,
        created_at: Timestamp,
    ) -> Self {
        let participant_id = real.account_id;
        let substitute = Profile::new(participant_id, substitute_name, substitute_avatar);
        Self {
            participant_id,
            real,
            substitute,
            created_at,
        }
    }

    /// The disguised participant's ID
    pub fn participant_id(&self) -> ParticipantId {
        self.participant_id
    }

    /// The genuine profile captured at disguise time
    pub fn real(&self) -> &Profile {
        &self.real
    }

    /// The synthesized profile presented to other participants
    pub fn substitute(&self) -> &Profile {
        &self.substitute
    }

    /// The substitute display name
    pub fn substitute_name(&self) -> &str {
        &self.substitute.name
    }

    /// The participant's real display name
    pub fn real_name(&self) -> &str {
        &self.real.name
    }

    /// When the overlay was created
    pub fn created_at(&self) -> Timestamp {
        self.created_at
    }
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------
