//! Guise Runtime
//!
//! The live identity overlay engine: the registry that owns disguise state,
//! the presence resynchronizer that marshals visibility refreshes onto the
//! host's privileged context, the registry-backed rewrite filter the
//! transport calls per outbound identity broadcast, and the builder that
//! wires in the external collaborators.

// ----------------------------------------------------------------------------
// Module Declarations
// ----------------------------------------------------------------------------

pub mod builder;
pub mod events;
pub mod filter;
pub mod registry;
pub mod resync;

// ----------------------------------------------------------------------------
// Public API
// ----------------------------------------------------------------------------

pub use builder::{AvatarSource, DisguisePolicy, EngineBuilder, EngineHandle};
pub use events::{overlay_event_channel, OverlayEvent};
pub use filter::PresenceRewriteFilter;
pub use registry::IdentityRegistry;
pub use resync::{NullVisibilityHost, PresenceResynchronizer, VisibilityHost};

// Re-export the core crate for embedders
pub use guise_core;
