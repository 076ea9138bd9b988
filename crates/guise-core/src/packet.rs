//! Identity-broadcast message model
//!
//! The protocol message informing clients of other participants' presence,
//! name, avatar, and connection state. The engine does not own the wire
//! encoding; the host transport serializes these however it likes (the serde
//! derives exist for that and for audit consumers). The engine only rewrites
//! the in-memory entries before each per-recipient send.

use serde::{Deserialize, Serialize};

use crate::profile::Profile;
use crate::types::{GameMode, ParticipantId};

/// One entry of an identity-broadcast message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PresenceEntry {
    /// The presented profile; its `account_id` identifies the participant
    pub profile: Profile,
    /// Connection latency in milliseconds, passed through by the filter
    pub latency: u32,
    /// Play state, passed through by the filter
    pub mode: GameMode,
    /// Display metadata shown in rosters and overlays
    pub display_name: String,
}

impl PresenceEntry {
    /// Create an entry whose display name matches the profile name
    pub fn new(profile: Profile, latency: u32, mode: GameMode) -> Self {
        let display_name = profile.name.clone();
        Self {
            profile,
            latency,
            mode,
            display_name,
        }
    }

    /// The participant this entry describes
    pub fn participant_id(&self) -> ParticipantId {
        self.profile.account_id
    }
}

/// An outbound identity-broadcast message addressed to one recipient.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PresenceUpdate {
    pub entries: Vec<PresenceEntry>,
}

impl PresenceUpdate {
    /// Create a broadcast over the given entries
    pub fn new(entries: Vec<PresenceEntry>) -> Self {
        Self { entries }
    }

    /// A broadcast with no entries; the filter passes these through untouched
    pub fn empty() -> Self {
        Self::default()
    }

    /// Whether the entry sequence is empty
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------
