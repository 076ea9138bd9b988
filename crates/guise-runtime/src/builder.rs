//! Engine Builder API
//!
//! Builder-style wiring for embedders: inject the external collaborators
//! (avatar-descriptor source, name-generation source, visibility host,
//! auto-disguise policy) and get back a running engine handle.

use std::sync::Arc;

use async_trait::async_trait;
use guise_core::{
    AvatarDescriptor, GuiseConfig, NameAllocator, NameSource, Participant, ParticipantId, Result,
    SkinPool, WordlistNameSource,
};
use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tracing::{info, warn};

use crate::events::{overlay_event_channel, OverlayEvent};
use crate::filter::PresenceRewriteFilter;
use crate::registry::IdentityRegistry;
use crate::resync::{NullVisibilityHost, PresenceResynchronizer, VisibilityHost};

// ----------------------------------------------------------------------------
// Collaborator Interfaces
// ----------------------------------------------------------------------------

/// One-shot bulk source of substitute avatar descriptors.
///
/// Fetched exactly once at startup; the engine never re-fetches. A failed
/// fetch leaves the pool empty (disguises degrade to the placeholder avatar)
/// rather than blocking startup.
#[async_trait]
pub trait AvatarSource: Send + Sync {
    /// Fetch up to `count` descriptors
    async fn fetch(&self, count: usize) -> Result<Vec<AvatarDescriptor>>;
}

/// Decision hook for disguising participants automatically at join time.
///
/// The engine ships no default policy; disguise is explicit unless the
/// embedder installs one.
pub trait DisguisePolicy: Send + Sync {
    /// Whether the joining participant should be disguised immediately
    fn should_disguise(&self, participant: &Participant) -> bool;
}

impl<F> DisguisePolicy for F
where
    F: Fn(&Participant) -> bool + Send + Sync,
{
    fn should_disguise(&self, participant: &Participant) -> bool {
        self(participant)
    }
}

// ----------------------------------------------------------------------------
// Engine Builder
// ----------------------------------------------------------------------------

/// Builder for the identity overlay engine.
pub struct EngineBuilder {
    config: GuiseConfig,
    name_source: Box<dyn NameSource>,
    avatar_source: Option<Box<dyn AvatarSource>>,
    visibility_host: Box<dyn VisibilityHost>,
    policy: Option<Box<dyn DisguisePolicy>>,
}

impl EngineBuilder {
    /// Create a builder with default configuration, the wordlist name
    /// source, no avatar source, and a no-op visibility host.
    pub fn new() -> Self {
        Self {
            config: GuiseConfig::default(),
            name_source: Box::new(WordlistNameSource),
            avatar_source: None,
            visibility_host: Box::new(NullVisibilityHost),
            policy: None,
        }
    }

    /// Set the engine configuration
    pub fn with_config(mut self, config: GuiseConfig) -> Self {
        self.config = config;
        self
    }

    /// Set the candidate-name generator
    pub fn with_name_source(mut self, source: Box<dyn NameSource>) -> Self {
        self.name_source = source;
        self
    }

    /// Set the avatar-descriptor source fetched once at startup
    pub fn with_avatar_source(mut self, source: Box<dyn AvatarSource>) -> Self {
        self.avatar_source = Some(source);
        self
    }

    /// Set the host session layer's visibility API
    pub fn with_visibility_host(mut self, host: Box<dyn VisibilityHost>) -> Self {
        self.visibility_host = host;
        self
    }

    /// Install an auto-disguise-at-join policy
    pub fn with_disguise_policy(mut self, policy: Box<dyn DisguisePolicy>) -> Self {
        self.policy = Some(policy);
        self
    }

    /// Build and start the engine: fetch the avatar pool, spawn the
    /// visibility context, and wire the registry.
    pub async fn build_and_start(self) -> EngineHandle {
        let skins = match self.avatar_source {
            Some(source) => match source.fetch(self.config.skins.fetch_count).await {
                Ok(descriptors) => {
                    info!(count = descriptors.len(), "Avatar pool populated");
                    SkinPool::new(descriptors)
                }
                Err(err) => {
                    warn!(error = %err, "Avatar source unavailable; starting with an empty pool");
                    SkinPool::empty()
                }
            },
            None => SkinPool::empty(),
        };

        let (resync, resync_task) =
            PresenceResynchronizer::spawn(self.visibility_host, self.config.channels.refresh_buffer);
        let (events, _) = overlay_event_channel(self.config.channels.event_buffer);
        let allocator = NameAllocator::new(self.name_source, self.config.names.clone());

        let registry = Arc::new(IdentityRegistry::new(allocator, skins, resync, events));

        EngineHandle {
            registry,
            policy: self.policy,
            resync_task: Some(resync_task),
        }
    }
}

impl Default for EngineBuilder {
    fn default() -> Self {
        Self::new()
    }
}

// ----------------------------------------------------------------------------
// Engine Handle
// ----------------------------------------------------------------------------

/// Handle to a running identity overlay engine.
pub struct EngineHandle {
    registry: Arc<IdentityRegistry>,
    policy: Option<Box<dyn DisguisePolicy>>,
    resync_task: Option<JoinHandle<()>>,
}

impl EngineHandle {
    /// The identity registry, the operator command surface
    pub fn registry(&self) -> Arc<IdentityRegistry> {
        Arc::clone(&self.registry)
    }

    /// A rewrite filter to register with the transport for the
    /// identity-broadcast message type
    pub fn filter(&self) -> PresenceRewriteFilter {
        PresenceRewriteFilter::new(Arc::clone(&self.registry))
    }

    /// Subscribe to overlay lifecycle notifications
    pub fn subscribe(&self) -> broadcast::Receiver<OverlayEvent> {
        self.registry.subscribe()
    }

    /// Session layer callback: a participant joined. Applies the
    /// auto-disguise policy if one is installed.
    pub async fn on_participant_joined(&self, participant: Participant) -> Result<()> {
        let id = participant.id();
        let auto = self
            .policy
            .as_ref()
            .is_some_and(|policy| policy.should_disguise(&participant));

        self.registry.on_participant_joined(participant).await;
        if auto {
            self.registry.disguise(id).await?;
        }
        Ok(())
    }

    /// Session layer callback: a participant left
    pub async fn on_participant_left(&self, participant: ParticipantId) {
        self.registry.on_participant_left(participant).await;
    }

    /// Shut down the visibility context and wait for it to drain.
    pub async fn shutdown(mut self) {
        info!("Shutting down identity overlay engine");
        // Dropping the registry drops the resynchronizer handle, closing the
        // refresh channel and letting the visibility task finish. Outstanding
        // registry clones held by the embedder keep the channel open, so cap
        // the wait and abort.
        let task = self.resync_task.take();
        drop(self.registry);
        if let Some(mut task) = task {
            if tokio::time::timeout(std::time::Duration::from_secs(5), &mut task)
                .await
                .is_err()
            {
                task.abort();
            }
        }
    }
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------
