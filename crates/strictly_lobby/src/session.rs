//! One game between two seated participants.

use crate::error::LobbyError;
use crate::participant::{Notification, Participant, ParticipantId};
use chrono::{DateTime, Utc};
use derive_getters::Getters;
use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};
use strictly_tictactoe::{Board, Game, GameStatus, Mark};
use tracing::{debug, info, instrument, warn};

static NEXT_SESSION: AtomicU64 = AtomicU64::new(1);

/// Unique identifier for a game session.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, derive_more::Display)]
pub struct SessionId(String);

impl SessionId {
    /// Generates an id of the form `SESSION_<unix-millis>_<sequence>`.
    ///
    /// The sequence is process-wide, so ids never repeat within a process.
    pub fn generate() -> Self {
        let seq = NEXT_SESSION.fetch_add(1, Ordering::Relaxed);
        Self(format!("SESSION_{}_{}", Utc::now().timestamp_millis(), seq))
    }

    /// The id as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Lifecycle phase of a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, strum::Display)]
pub enum SessionPhase {
    /// At least one seat is open.
    Waiting,
    /// Both seats taken, game running.
    InProgress,
    /// Both seats taken, game decided.
    Terminal,
}

/// Consistent copy of a session's visible state.
#[derive(Debug, Clone, Getters)]
pub struct SessionSnapshot {
    /// Session id.
    id: SessionId,
    /// Board at the time of the snapshot.
    board: Board,
    /// Mark that owns the next move.
    to_move: Mark,
    /// Game status.
    status: GameStatus,
    /// Phase derived from seats and status.
    phase: SessionPhase,
    /// Seat X then seat O.
    seats: [Option<ParticipantId>; 2],
}

/// Non-owning binding of a participant to a seat.
#[derive(Debug)]
struct Seat {
    id: ParticipantId,
    handle: Weak<dyn Participant>,
}

impl Seat {
    /// The participant, if it is still alive and connected.
    fn reachable(&self) -> Option<Arc<dyn Participant>> {
        self.handle.upgrade().filter(|p| p.is_reachable())
    }
}

const SEAT_MARKS: [Mark; 2] = [Mark::X, Mark::O];

fn seat_index(mark: Mark) -> usize {
    match mark {
        Mark::X => 0,
        Mark::O => 1,
    }
}

#[derive(Debug, Default)]
struct SessionState {
    game: Game,
    seats: [Option<Seat>; 2],
}

impl SessionState {
    fn mark_of(&self, id: ParticipantId) -> Option<Mark> {
        SEAT_MARKS
            .into_iter()
            .find(|&mark| self.seats[seat_index(mark)].as_ref().is_some_and(|s| s.id == id))
    }

    fn is_full(&self) -> bool {
        self.seats.iter().all(Option::is_some)
    }

    fn is_empty(&self) -> bool {
        self.seats.iter().all(Option::is_none)
    }

    fn phase(&self) -> SessionPhase {
        if !self.is_full() {
            SessionPhase::Waiting
        } else if self.game.is_over() {
            SessionPhase::Terminal
        } else {
            SessionPhase::InProgress
        }
    }

    /// Sends to every reachable seat; unreachable ones are skipped.
    fn broadcast(&self, notification: &Notification) {
        for seat in self.seats.iter().flatten() {
            if let Some(participant) = seat.reachable() {
                participant.notify(notification.clone());
            }
        }
    }

    fn broadcast_board(&self) {
        self.broadcast(&Notification::board_state(self.game.board(), self.game.to_move()));
    }

    fn try_move(&mut self, id: ParticipantId, row: usize, col: usize) -> Result<GameStatus, LobbyError> {
        if self.game.is_over() {
            return Err(strictly_tictactoe::MoveError::GameOver.into());
        }
        let Some(mark) = self.mark_of(id) else {
            return Err(strictly_tictactoe::MoveError::NotYourTurn {
                expected: self.game.to_move(),
            }
            .into());
        };
        if !self.is_full() {
            return Err(LobbyError::WaitingForOpponent);
        }
        Ok(self.game.place_at(mark, row, col)?)
    }
}

/// A game session with two seats.
///
/// All mutation goes through one mutex, and each operation broadcasts while
/// still holding it, so participants observe moves in the order they were
/// applied.
#[derive(Debug)]
pub struct Session {
    id: SessionId,
    created_at: DateTime<Utc>,
    state: Mutex<SessionState>,
}

impl Session {
    /// Creates an empty session with a fresh id.
    #[instrument]
    pub fn new() -> Self {
        let id = SessionId::generate();
        info!(session_id = %id, "Creating new game session");
        Self {
            id,
            created_at: Utc::now(),
            state: Mutex::new(SessionState::default()),
        }
    }

    /// Session id.
    pub fn id(&self) -> &SessionId {
        &self.id
    }

    /// Creation time.
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    fn lock(&self) -> MutexGuard<'_, SessionState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Seats a participant in the first open seat, X before O.
    ///
    /// The participant is told its mark. Filling the last seat starts a fresh
    /// game and sends the board to both seats. Joining a session the
    /// participant already sits in returns its existing mark.
    ///
    /// # Errors
    ///
    /// Returns [`LobbyError::SessionFull`] if both seats are taken.
    #[instrument(skip(self, participant), fields(session_id = %self.id, participant = %participant.id()))]
    pub fn join(&self, participant: &Arc<dyn Participant>) -> Result<Mark, LobbyError> {
        let mut state = self.lock();
        let id = participant.id();

        if let Some(mark) = state.mark_of(id) {
            debug!(%mark, "Participant already seated");
            return Ok(mark);
        }

        let Some(mark) = SEAT_MARKS
            .into_iter()
            .find(|&mark| state.seats[seat_index(mark)].is_none())
        else {
            warn!("Session already has 2 players");
            return Err(LobbyError::SessionFull);
        };

        state.seats[seat_index(mark)] = Some(Seat {
            id,
            handle: Arc::downgrade(participant),
        });
        if participant.is_reachable() {
            participant.assign_mark(mark);
            participant.notify(Notification::MarkAssigned(mark));
        }
        info!(%mark, "Player joined session");

        if state.is_full() {
            state.game.reset();
            state.broadcast_board();
            info!("Both seats taken, game started");
        }
        Ok(mark)
    }

    /// Vacates the participant's seat, if it has one.
    ///
    /// A remaining opponent is told about the disconnect. The session is never
    /// removed here; the registry collects it once it is observed empty.
    #[instrument(skip(self), fields(session_id = %self.id))]
    pub fn leave(&self, participant: ParticipantId) -> Option<Mark> {
        let mut state = self.lock();
        let mark = state.mark_of(participant)?;
        state.seats[seat_index(mark)] = None;
        info!(%mark, "Player left session");

        if let Some(opponent) = &state.seats[seat_index(mark.opponent())]
            && let Some(handle) = opponent.reachable()
        {
            handle.notify(Notification::OpponentDisconnected);
        }
        Some(mark)
    }

    /// Applies a move for `participant` at zero-based `(row, col)`.
    ///
    /// On success both seats get the new board, or the outcome if the move
    /// ended the game. On failure only the requester is told.
    ///
    /// # Errors
    ///
    /// Checked in order: game over, not seated / not your turn, waiting for
    /// an opponent, then an out-of-range or occupied cell.
    #[instrument(skip(self), fields(session_id = %self.id))]
    pub fn make_move(&self, participant: ParticipantId, row: usize, col: usize) -> Result<GameStatus, LobbyError> {
        let mut state = self.lock();
        match state.try_move(participant, row, col) {
            Ok(status) => {
                match status {
                    GameStatus::Won(mark) => {
                        info!(winner = %mark, "Game finished");
                        state.broadcast(&Notification::Winner(Some(mark)));
                    }
                    GameStatus::Draw => {
                        info!("Game finished in a draw");
                        state.broadcast(&Notification::Winner(None));
                    }
                    GameStatus::InProgress => state.broadcast_board(),
                }
                Ok(status)
            }
            Err(err) => {
                warn!(error = %err, "Move rejected");
                if let Some(mark) = state.mark_of(participant)
                    && let Some(seat) = &state.seats[seat_index(mark)]
                    && let Some(handle) = seat.reachable()
                {
                    handle.notify(Notification::Error(err.to_string()));
                }
                Err(err)
            }
        }
    }

    /// Starts a fresh game if both seats are taken and reachable.
    ///
    /// Returns whether the restart happened; otherwise nothing changes.
    #[instrument(skip(self), fields(session_id = %self.id))]
    pub fn restart(&self) -> bool {
        let mut state = self.lock();
        let both_reachable = state
            .seats
            .iter()
            .all(|seat| seat.as_ref().and_then(Seat::reachable).is_some());
        if !both_reachable {
            debug!("Restart ignored, a seat is open or unreachable");
            return false;
        }

        state.game.reset();
        state.broadcast_board();
        info!("Game restarted");
        true
    }

    /// Both seats taken.
    pub fn is_full(&self) -> bool {
        self.lock().is_full()
    }

    /// No seat taken; eligible for cleanup.
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Whether `participant` sits in either seat.
    pub fn has_participant(&self, participant: ParticipantId) -> bool {
        self.lock().mark_of(participant).is_some()
    }

    /// Number of occupied seats.
    pub fn occupancy(&self) -> usize {
        self.lock().seats.iter().flatten().count()
    }

    /// Current phase.
    pub fn phase(&self) -> SessionPhase {
        self.lock().phase()
    }

    /// Copies the visible state under the session lock.
    pub fn snapshot(&self) -> SessionSnapshot {
        let state = self.lock();
        SessionSnapshot {
            id: self.id.clone(),
            board: state.game.board().clone(),
            to_move: state.game.to_move(),
            status: state.game.status(),
            phase: state.phase(),
            seats: [0, 1].map(|i| state.seats[i].as_ref().map(|s| s.id)),
        }
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}
