//! Guise Core
//!
//! Foundational types and pure logic for the Guise identity overlay engine:
//! participant profiles, overlay records, substitute-name allocation, the
//! avatar pool, and the per-recipient presence rewrite. Everything stateful
//! (registry, resynchronization, filtering against live state) lives in
//! `guise-runtime`.

// ----------------------------------------------------------------------------
// Module Declarations
// ----------------------------------------------------------------------------

pub mod config;
pub mod errors;
pub mod filter;
pub mod namegen;
pub mod packet;
pub mod profile;
pub mod skins;
pub mod types;

// ----------------------------------------------------------------------------
// Public API
// ----------------------------------------------------------------------------

pub use config::{ChannelConfig, GuiseConfig, NameConfig, SkinConfig};
pub use errors::{GuiseError, Result};
pub use filter::rewrite_presence_update;
pub use namegen::{NameAllocator, NameSource, WordlistNameSource};
pub use packet::{PresenceEntry, PresenceUpdate};
pub use profile::{AvatarDescriptor, IdentityOverlay, Participant, Profile};
pub use skins::SkinPool;
pub use types::{GameMode, ParticipantId, Timestamp};
