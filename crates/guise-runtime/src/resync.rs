//! Presence resynchronization
//!
//! Identity-broadcast messages are normally sent once per join, so an overlay
//! created afterwards would never be seen. On overlay create/destroy every
//! other connected participant's client must forget and re-learn the affected
//! participant (remove then re-add), which re-emits the broadcast through the
//! rewrite filter with current overlay state.
//!
//! Host environments require player-visibility mutations to run on a single
//! privileged execution context rather than arbitrary worker threads. The
//! resynchronizer owns that context as a dedicated task: requests are
//! marshaled over an mpsc channel and acknowledged with a oneshot once the
//! remove/add pair has settled for every observer.

use guise_core::{GuiseError, ParticipantId, Result};
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tracing::debug;

// ----------------------------------------------------------------------------
// Visibility Host
// ----------------------------------------------------------------------------

/// The host session layer's player-visibility API.
///
/// Called only from the resynchronizer's task, so implementations need no
/// internal synchronization.
pub trait VisibilityHost: Send + 'static {
    /// Make `subject` invisible to `observer`
    fn hide(&mut self, observer: ParticipantId, subject: ParticipantId);
    /// Make `subject` visible to `observer` again, triggering a fresh
    /// identity broadcast for `subject`
    fn show(&mut self, observer: ParticipantId, subject: ParticipantId);
}

/// No-op visibility host for embedders whose session layer refreshes
/// presence on its own, and for tests.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullVisibilityHost;

impl VisibilityHost for NullVisibilityHost {
    fn hide(&mut self, _observer: ParticipantId, _subject: ParticipantId) {}
    fn show(&mut self, _observer: ParticipantId, _subject: ParticipantId) {}
}

// ----------------------------------------------------------------------------
// Refresh Requests
// ----------------------------------------------------------------------------

struct RefreshRequest {
    subject: ParticipantId,
    observers: Vec<ParticipantId>,
    done: oneshot::Sender<()>,
}

// ----------------------------------------------------------------------------
// Presence Resynchronizer
// ----------------------------------------------------------------------------

/// Handle for requesting presence refreshes on the host's visibility context.
#[derive(Clone)]
pub struct PresenceResynchronizer {
    requests: mpsc::Sender<RefreshRequest>,
}

impl PresenceResynchronizer {
    /// Spawn the visibility task over `host` and return the request handle.
    pub fn spawn(host: Box<dyn VisibilityHost>, buffer: usize) -> (Self, JoinHandle<()>) {
        let (requests, rx) = mpsc::channel(buffer);
        let task = tokio::spawn(run_visibility_task(host, rx));
        (Self { requests }, task)
    }

    /// Force every observer to forget and re-learn `subject`, waiting until
    /// the host context has settled the full remove/add pair.
    pub async fn refresh(
        &self,
        subject: ParticipantId,
        observers: Vec<ParticipantId>,
    ) -> Result<()> {
        let (done, completed) = oneshot::channel();
        self.requests
            .send(RefreshRequest {
                subject,
                observers,
                done,
            })
            .await
            .map_err(|_| GuiseError::channel_error("Visibility context is not running"))?;

        completed
            .await
            .map_err(|_| GuiseError::channel_error("Visibility context dropped a refresh"))
    }
}

/// The privileged visibility context. Runs until every handle is dropped.
async fn run_visibility_task(
    mut host: Box<dyn VisibilityHost>,
    mut requests: mpsc::Receiver<RefreshRequest>,
) {
    while let Some(request) = requests.recv().await {
        debug!(
            subject = %request.subject,
            observers = request.observers.len(),
            "Refreshing presence"
        );

        // Every remove completes before any add, avoiding duplicate-presence
        // glitches on the observers' clients.
        for observer in &request.observers {
            host.hide(*observer, request.subject);
        }
        for observer in &request.observers {
            host.show(*observer, request.subject);
        }

        // Caller may have given up waiting; that is not our problem.
        let _ = request.done.send(());
    }
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------
