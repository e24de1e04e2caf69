use std::collections::HashMap;
use std::time::Duration;

use futures::future::join_all;
use parking_lot::Mutex;
use serde::Serialize;
use tokio::sync::mpsc;

use mason_core::ids::{ConnectionId, ProjectId};

pub const DEFAULT_SEND_QUEUE: usize = 256;
pub const DEFAULT_SEND_TIMEOUT: Duration = Duration::from_secs(5);

/// Per-project event fan-out for WebSocket subscribers.
///
/// One bus per process, constructed at startup and shared via `Arc`. The
/// mutex guards only the registry's shape; delivery never runs under it,
/// so a slow subscriber cannot block registrations or other broadcasts.
pub struct ProjectBus {
    /// project -> (connection -> outbound sender). A project key exists
    /// only while its set is non-empty.
    projects: Mutex<HashMap<ProjectId, HashMap<ConnectionId, mpsc::Sender<String>>>>,
    max_send_queue: usize,
    send_timeout: Duration,
}

impl ProjectBus {
    pub fn new(max_send_queue: usize, send_timeout: Duration) -> Self {
        Self {
            projects: Mutex::new(HashMap::new()),
            // mpsc panics on a zero-capacity channel
            max_send_queue: max_send_queue.max(1),
            send_timeout,
        }
    }

    /// Register a subscriber for a project. Called after the WebSocket
    /// handshake has completed; only the map insert runs under the lock.
    pub fn connect(&self, project_id: &ProjectId) -> (ConnectionId, mpsc::Receiver<String>) {
        let id = ConnectionId::new();
        let (tx, rx) = mpsc::channel(self.max_send_queue);
        let mut projects = self.projects.lock();
        projects
            .entry(project_id.clone())
            .or_default()
            .insert(id.clone(), tx);
        (id, rx)
    }

    /// Remove a subscriber. A no-op for unknown projects or connections,
    /// so it is safe to call unconditionally on handler exit.
    pub fn disconnect(&self, project_id: &ProjectId, connection_id: &ConnectionId) {
        let mut projects = self.projects.lock();
        if let Some(conns) = projects.get_mut(project_id) {
            conns.remove(connection_id);
            if conns.is_empty() {
                projects.remove(project_id);
            }
        }
    }

    /// Deliver a payload to every current subscriber of a project.
    ///
    /// Snapshots the subscriber set under the lock, releases it, then sends
    /// to all subscribers concurrently with a per-send timeout. Subscribers
    /// whose send fails (closed channel, or wedged past the timeout) are
    /// removed in a single follow-up locked pass. Best effort: failures are
    /// never surfaced to the caller and nothing is retried.
    pub async fn broadcast<T: Serialize>(&self, project_id: &ProjectId, payload: &T) {
        let json = match serde_json::to_string(payload) {
            Ok(j) => j,
            Err(e) => {
                tracing::warn!(project_id = %project_id, error = %e, "failed to serialize payload");
                return;
            }
        };

        let recipients: Vec<(ConnectionId, mpsc::Sender<String>)> = {
            let projects = self.projects.lock();
            match projects.get(project_id) {
                Some(conns) => conns
                    .iter()
                    .map(|(id, tx)| (id.clone(), tx.clone()))
                    .collect(),
                None => return,
            }
        };

        tracing::debug!(
            project_id = %project_id,
            recipients = recipients.len(),
            "broadcast"
        );

        let timeout = self.send_timeout;
        let sends = recipients.into_iter().map(|(id, tx)| {
            let json = json.clone();
            async move {
                match tokio::time::timeout(timeout, tx.send(json)).await {
                    Ok(Ok(())) => None,
                    Ok(Err(_)) | Err(_) => Some(id),
                }
            }
        });
        let failed: Vec<ConnectionId> = join_all(sends).await.into_iter().flatten().collect();

        if failed.is_empty() {
            return;
        }

        let mut projects = self.projects.lock();
        if let Some(conns) = projects.get_mut(project_id) {
            for id in &failed {
                if conns.remove(id).is_some() {
                    tracing::warn!(
                        project_id = %project_id,
                        connection_id = %id,
                        "pruned dead subscriber"
                    );
                }
            }
            if conns.is_empty() {
                projects.remove(project_id);
            }
        }
    }

    /// Current subscriber count for a project (0 if unknown).
    pub fn count_connections(&self, project_id: &ProjectId) -> usize {
        self.projects
            .lock()
            .get(project_id)
            .map(|conns| conns.len())
            .unwrap_or(0)
    }

    /// Total subscribers across all projects.
    pub fn total_connections(&self) -> usize {
        self.projects.lock().values().map(|conns| conns.len()).sum()
    }

    /// Number of projects with at least one subscriber.
    pub fn project_count(&self) -> usize {
        self.projects.lock().len()
    }
}

impl Default for ProjectBus {
    fn default() -> Self {
        Self::new(DEFAULT_SEND_QUEUE, DEFAULT_SEND_TIMEOUT)
    }
}
