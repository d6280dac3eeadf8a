use crate::agent::Agent;
use chrono::{DateTime, Utc};
use std::fmt;
use std::sync::Arc;
use tokio::sync::{Mutex, OwnedMutexGuard, RwLock};
use tracing::{debug, info};
use uuid::Uuid;

/// Exclusive use of one session's agent. The session cannot be replaced
/// while a `TaskGuard` for it is alive.
pub type TaskGuard = OwnedMutexGuard<()>;

/// One live agent plus the gate that keeps its task episodes from overlapping.
pub struct Session {
    id: Uuid,
    created_at: DateTime<Utc>,
    agent: Box<dyn Agent>,
    task_gate: Arc<Mutex<()>>,
}

impl Session {
    fn new(agent: Box<dyn Agent>) -> Self {
        Self {
            id: Uuid::new_v4(),
            created_at: Utc::now(),
            agent,
            task_gate: Arc::new(Mutex::new(())),
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn agent(&self) -> &dyn Agent {
        self.agent.as_ref()
    }

    async fn lock_task_gate(&self) -> TaskGuard {
        Arc::clone(&self.task_gate).lock_owned().await
    }
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("id", &self.id)
            .field("created_at", &self.created_at)
            .field("step_count", &self.agent.step_count())
            .finish()
    }
}

/// Holder of at most one [`Session`].
///
/// The slot lock is only held long enough to clone or swap the `Arc`, so
/// status reads never queue behind a running task. Replacing a session
/// first takes that session's task gate and therefore waits for its
/// in-flight task.
#[derive(Default)]
pub struct SessionRegistry {
    slot: RwLock<Option<Arc<Session>>>,
}

impl SessionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Install `agent`, discarding whatever session was there before.
    pub async fn set(&self, agent: Box<dyn Agent>) -> Uuid {
        let session = Arc::new(Session::new(agent));
        let id = session.id;

        let previous = loop {
            let current = self.get().await;
            let _gate = match &current {
                Some(current) => Some(current.lock_task_gate().await),
                None => None,
            };

            let mut slot = self.slot.write().await;
            if same_session(slot.as_ref(), current.as_ref()) {
                break slot.replace(Arc::clone(&session));
            }
            debug!("Session changed while waiting for its task gate, retrying");
        };

        match previous {
            Some(previous) => info!(
                session_id = %id,
                previous_session = %previous.id,
                "Replaced agent session"
            ),
            None => info!(session_id = %id, "Installed agent session"),
        }
        id
    }

    /// Current session, or `None` when nothing has been installed.
    pub async fn get(&self) -> Option<Arc<Session>> {
        self.slot.read().await.clone()
    }

    /// Current session together with its task gate.
    ///
    /// Retries if the session was replaced while waiting for the gate, so the
    /// returned session is never one that has already been discarded.
    pub async fn acquire(&self) -> Option<(Arc<Session>, TaskGuard)> {
        loop {
            let session = self.get().await?;
            let gate = session.lock_task_gate().await;
            if same_session(self.slot.read().await.as_ref(), Some(&session)) {
                return Some((session, gate));
            }
            debug!(session_id = %session.id, "Session replaced while waiting, retrying");
        }
    }

    pub async fn is_populated(&self) -> bool {
        self.slot.read().await.is_some()
    }

    /// Drop the installed session. Only used on shutdown.
    pub async fn clear(&self) -> bool {
        let previous = self.slot.write().await.take();
        match previous {
            Some(session) => {
                info!(session_id = %session.id, "Cleared agent session");
                true
            }
            None => {
                debug!("No agent session to clear");
                false
            }
        }
    }
}

fn same_session(a: Option<&Arc<Session>>, b: Option<&Arc<Session>>) -> bool {
    match (a, b) {
        (Some(a), Some(b)) => Arc::ptr_eq(a, b),
        (None, None) => true,
        _ => false,
    }
}
