//! Turn sequencing for one human-vs-advisor game.
//!
//! The human plays by tapping an origin square and then a destination square.
//! Once a human move is on the board the advisor is asked for a reply in the
//! same call, so a new human move cannot start before the reply has resolved.
//!
//! ```text
//! AwaitingOrigin --tap--> AwaitingDestination --tap--+--plain--> AwaitingRemoteReply --> AwaitingOrigin
//!                                                    +--promotion--> PromotionPending --choice--^
//!                                                    +--invalid--> AwaitingOrigin
//! ```
//!
//! Any terminal status, after either side's move, parks the session in
//! [`Phase::Finished`] until it is reset.

use std::fmt;

use tracing::{debug, info, warn};

use crate::advisor::Advisor;
use crate::board::Square;
use crate::error::AdvisorError;
use crate::history::{Attribution, HistoryEntry, HistoryLog};
use crate::movegen::Move;
use crate::position::{GameStatus, Position};
use crate::resolver::{self, PromotionPiece, Resolution};
use crate::view::BoardView;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    AwaitingOrigin,
    AwaitingDestination { origin: Square },
    PromotionPending { from: Square, to: Square },
    AwaitingRemoteReply,
    Finished(GameStatus),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationKind {
    Status(GameStatus),
    InvalidMove,
    AdvisorUnavailable,
    MalformedAdvisorReply,
}

/// Something the player should be told about.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub kind: NotificationKind,
    pub message: String,
}

impl Notification {
    fn for_status(status: GameStatus) -> Option<Self> {
        status.message().map(|message| Self {
            kind: NotificationKind::Status(status),
            message: message.to_string(),
        })
    }

    fn invalid_move() -> Self {
        Self {
            kind: NotificationKind::InvalidMove,
            message: "This move is not allowed.".to_string(),
        }
    }

    fn advisor_failure(error: &AdvisorError) -> Self {
        if error.is_malformed() {
            Self {
                kind: NotificationKind::MalformedAdvisorReply,
                message: format!("The move advisor sent an unusable reply: {}", error),
            }
        } else {
            Self {
                kind: NotificationKind::AdvisorUnavailable,
                message: format!("Failed to connect to the move advisor: {}", error),
            }
        }
    }
}

impl fmt::Display for Notification {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(&self.message)
    }
}

pub struct Session<A> {
    position: Position,
    history: HistoryLog,
    phase: Phase,
    advisor: A,
}

impl<A: Advisor> Session<A> {
    pub fn new(advisor: A) -> Self {
        Self::from_position(Position::new(), advisor)
    }

    /// Starts from an arbitrary position. [`Session::reset`] still returns to
    /// the standard initial position.
    pub fn from_position(position: Position, advisor: A) -> Self {
        let status = position.status();
        let phase = if status.is_terminal() {
            Phase::Finished(status)
        } else {
            Phase::AwaitingOrigin
        };
        Self {
            position,
            history: HistoryLog::new(),
            phase,
            advisor,
        }
    }

    pub fn position(&self) -> &Position {
        &self.position
    }

    pub fn history(&self) -> &[HistoryEntry] {
        self.history.all()
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn status(&self) -> GameStatus {
        self.position.status()
    }

    pub fn view(&self) -> BoardView {
        BoardView::of(self.position.board())
    }

    pub fn advisor(&self) -> &A {
        &self.advisor
    }

    /// The origin held from a first tap, if any.
    pub fn pending_selection(&self) -> Option<Square> {
        match self.phase {
            Phase::AwaitingDestination { origin } => Some(origin),
            _ => None,
        }
    }

    /// Handles a tap on `square`: first tap selects, second tap moves.
    pub fn tap(&mut self, square: Square) -> Vec<Notification> {
        let mut notifications = Vec::new();

        match self.phase {
            Phase::AwaitingOrigin => {
                debug!(%square, "origin selected");
                self.phase = Phase::AwaitingDestination { origin: square };
            }
            Phase::AwaitingDestination { origin } => {
                // The selection is consumed whatever the outcome.
                self.phase = Phase::AwaitingOrigin;
                match resolver::resolve(&self.position, origin, square) {
                    Resolution::Plain(mv) => self.play_human_move(mv, &mut notifications),
                    Resolution::PromotionRequired { from, to } => {
                        debug!(%from, %to, "waiting for promotion choice");
                        self.phase = Phase::PromotionPending { from, to };
                    }
                    Resolution::Invalid => {
                        info!(%origin, %square, "rejected invalid move");
                        notifications.push(Notification::invalid_move());
                    }
                }
            }
            phase => warn!(?phase, %square, "ignoring tap"),
        }

        notifications
    }

    /// Completes a pending promotion with the chosen piece.
    pub fn choose_promotion(&mut self, choice: PromotionPiece) -> Vec<Notification> {
        let mut notifications = Vec::new();

        let (from, to) = match self.phase {
            Phase::PromotionPending { from, to } => (from, to),
            phase => {
                warn!(?phase, ?choice, "no promotion is pending");
                return notifications;
            }
        };

        self.phase = Phase::AwaitingOrigin;
        match resolver::finalize_promotion(&self.position, from, to, choice) {
            Some(mv) => self.play_human_move(mv, &mut notifications),
            None => notifications.push(Notification::invalid_move()),
        }
        notifications
    }

    /// Back to the initial position with an empty history. Always succeeds.
    pub fn reset(&mut self) {
        info!("session reset");
        self.position = Position::new();
        self.history.clear();
        self.phase = Phase::AwaitingOrigin;
    }

    fn play_human_move(&mut self, mv: Move, notifications: &mut Vec<Notification>) {
        if self.commit(mv, Attribution::Human, notifications) {
            return;
        }
        self.request_remote_move(notifications);
    }

    /// Applies `mv` and reports the resulting status. Returns true if the game is over.
    fn commit(&mut self, mv: Move, attribution: Attribution, notifications: &mut Vec<Notification>) -> bool {
        self.position = self.position.apply(&mv);
        self.history.append(HistoryEntry::new(attribution, &mv));
        info!(who = attribution.label(), %mv, "move played");

        let status = self.position.status();
        notifications.extend(Notification::for_status(status));

        if status.is_terminal() {
            info!(%status, "game over");
            self.phase = Phase::Finished(status);
            true
        } else {
            self.phase = Phase::AwaitingOrigin;
            false
        }
    }

    fn request_remote_move(&mut self, notifications: &mut Vec<Notification>) {
        self.phase = Phase::AwaitingRemoteReply;
        let fen = self.position.to_fen();

        let reply = match self.advisor.request_move(&fen) {
            Ok(uci) => uci.resolve(&self.position).ok_or(AdvisorError::IllegalMove(uci)),
            Err(error) => Err(error),
        };

        match reply {
            Ok(mv) => {
                self.commit(mv, Attribution::Remote, notifications);
            }
            Err(error) => {
                warn!(%error, %fen, "no advisor move this turn");
                notifications.push(Notification::advisor_failure(&error));
                self.phase = Phase::AwaitingOrigin;
            }
        }
    }
}
