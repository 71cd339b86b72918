//! Matchmaking across all live sessions.

use crate::error::LobbyError;
use crate::participant::{Notification, Participant};
use crate::session::{Session, SessionId, SessionPhase};
use chrono::{DateTime, Utc};
use derive_getters::Getters;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tracing::{debug, info, instrument, warn};

/// Default maximum number of concurrently live sessions.
pub const DEFAULT_CAPACITY: usize = 100;

/// Diagnostic summary of one session.
#[derive(Debug, Clone, Getters, derive_new::new)]
pub struct SessionSummary {
    /// Session id.
    id: SessionId,
    /// Creation time.
    created_at: DateTime<Utc>,
    /// Current phase.
    phase: SessionPhase,
    /// Occupied seats (0-2).
    occupancy: usize,
}

/// Owns every live session, keyed by id.
///
/// Cloning yields another handle to the same registry. Lock order is
/// registry first, then a session; sessions never call back into the
/// registry.
#[derive(Debug, Clone)]
pub struct SessionRegistry {
    sessions: Arc<Mutex<HashMap<SessionId, Arc<Session>>>>,
    capacity: usize,
}

impl SessionRegistry {
    /// Creates an empty registry allowing at most `capacity` sessions.
    #[instrument]
    pub fn new(capacity: usize) -> Self {
        info!(capacity, "Creating session registry");
        Self {
            sessions: Arc::new(Mutex::new(HashMap::new())),
            capacity,
        }
    }

    /// Maximum number of live sessions.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<SessionId, Arc<Session>>> {
        self.sessions.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Places a participant into a session.
    ///
    /// A session already holding this participant is returned as is, full
    /// or not. Otherwise the participant joins the first open session, or a new one
    /// is created while under capacity. The whole scan runs under the
    /// registry lock, so concurrent joins fill open seats before any new
    /// session is made.
    ///
    /// # Errors
    ///
    /// Returns [`LobbyError::CapacityExceeded`] if no session is open and the
    /// registry is at capacity; the participant is told as well.
    #[instrument(skip(self, participant), fields(participant = %participant.id()))]
    pub fn add_participant(&self, participant: &Arc<dyn Participant>) -> Result<Arc<Session>, LobbyError> {
        let mut sessions = self.lock();
        let id = participant.id();

        if let Some(session) = sessions
            .values()
            .find(|s| s.has_participant(id))
        {
            debug!(session_id = %session.id(), "Participant already seated");
            return Ok(Arc::clone(session));
        }

        for session in sessions.values() {
            if !session.is_full() && session.join(participant).is_ok() {
                info!(session_id = %session.id(), "Matched into open session");
                return Ok(Arc::clone(session));
            }
        }

        if sessions.len() >= self.capacity {
            warn!(capacity = self.capacity, "Cannot create new session: maximum sessions reached");
            let err = LobbyError::CapacityExceeded {
                capacity: self.capacity,
            };
            if participant.is_reachable() {
                participant.notify(Notification::Error(err.to_string()));
            }
            return Err(err);
        }

        let session = Arc::new(Session::new());
        session.join(participant)?;
        sessions.insert(session.id().clone(), Arc::clone(&session));
        info!(
            session_id = %session.id(),
            active = sessions.len(),
            "Created new game session"
        );
        Ok(session)
    }

    /// Looks up a session by id.
    pub fn session(&self, id: &SessionId) -> Option<Arc<Session>> {
        self.lock().get(id).cloned()
    }

    /// Removes a session. Returns whether it was present.
    #[instrument(skip(self))]
    pub fn remove_session(&self, id: &SessionId) -> bool {
        let mut sessions = self.lock();
        let removed = sessions.remove(id).is_some();
        if removed {
            info!(session_id = %id, active = sessions.len(), "Removed game session");
        }
        removed
    }

    /// Removes every session with no occupied seat. Returns how many went.
    ///
    /// Emptiness is checked under the registry lock. Seats are only filled
    /// through [`SessionRegistry::add_participant`], which takes the same
    /// lock, so a session cannot be refilled between check and removal.
    #[instrument(skip(self))]
    pub fn cleanup_empty_sessions(&self) -> usize {
        let mut sessions = self.lock();
        let before = sessions.len();
        sessions.retain(|_, session| !session.is_empty());
        let removed = before - sessions.len();
        if removed > 0 {
            info!(removed, active = sessions.len(), "Cleaned up empty sessions");
        }
        removed
    }

    /// Number of live sessions.
    pub fn count_active(&self) -> usize {
        self.lock().len()
    }

    /// Snapshot of every live session.
    pub fn sessions(&self) -> Vec<SessionSummary> {
        let sessions: Vec<Arc<Session>> = self.lock().values().cloned().collect();
        sessions
            .iter()
            .map(|s| SessionSummary::new(s.id().clone(), s.created_at(), s.phase(), s.occupancy()))
            .collect()
    }

    /// Logs the session listing.
    #[instrument(skip(self))]
    pub fn log_status(&self) {
        let summaries = self.sessions();
        info!(active = summaries.len(), capacity = self.capacity, "Game session statistics");
        for summary in &summaries {
            info!(
                session_id = %summary.id(),
                created = %summary.created_at(),
                phase = %summary.phase(),
                occupancy = summary.occupancy(),
                "Session"
            );
        }
    }
}

impl Default for SessionRegistry {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}
