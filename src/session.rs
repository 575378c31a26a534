//! Turn controller: owns the position, alternates human and engine plies,
//! and reports terminal results. Engine requests run on a worker thread and
//! come back through a channel, so the session itself never blocks on the
//! bot unless asked to.

use std::sync::{mpsc, Arc};
use std::thread;

use cozy_chess::Color;
use log::{info, warn};
use thiserror::Error;

use crate::board::cozy::{Position, PositionError, Termination};
use crate::engine::{EngineError, MoveEngine};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Checkmate { winner: Color },
    Stalemate,
    InsufficientMaterial,
    FiftyMoveRule,
    EngineUnavailable,
    EngineProtocol { reply: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Phase {
    AwaitingHumanMove,
    AwaitingEngineMove,
    GameOver(Outcome),
}

/// Directives for the presentation layer, in emission order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    BoardChanged,
    InputEnabled(bool),
    EngineMovePlayed(String),
    GameEnded(Outcome),
}

#[derive(Debug, Error)]
pub enum MoveError {
    #[error(transparent)]
    Invalid(#[from] PositionError),
    #[error("not the human's turn")]
    NotYourTurn,
}

pub struct GameSession<E: MoveEngine + 'static> {
    position: Position,
    phase: Phase,
    engine: Arc<E>,
    human: Color,
    pending: Option<mpsc::Receiver<Result<String, EngineError>>>,
}

impl<E: MoveEngine + 'static> GameSession<E> {
    pub fn new(engine: E, human: Color) -> Self {
        Self::with_position(engine, human, Position::startpos())
    }

    pub fn with_position(engine: E, human: Color, position: Position) -> Self {
        Self {
            position,
            phase: Phase::AwaitingHumanMove,
            engine: Arc::new(engine),
            human,
            pending: None,
        }
    }

    pub fn position(&self) -> &Position {
        &self.position
    }

    pub fn phase(&self) -> &Phase {
        &self.phase
    }

    pub fn outcome(&self) -> Option<&Outcome> {
        match &self.phase {
            Phase::GameOver(outcome) => Some(outcome),
            _ => None,
        }
    }

    pub fn input_enabled(&self) -> bool {
        matches!(self.phase, Phase::AwaitingHumanMove)
    }

    /// Starts the session: if the engine's side opens, its first move is
    /// requested right away.
    pub fn begin(&mut self) -> Vec<SessionEvent> {
        if self.pending.is_some() || !matches!(self.phase, Phase::AwaitingHumanMove) {
            return Vec::new();
        }
        let mut events = vec![SessionEvent::BoardChanged];
        if self.position.side_to_move() == self.human {
            self.check_terminal(&mut events);
        } else {
            self.enter_engine_phase(&mut events);
        }
        events
    }

    /// Validates and plays a human move, then hands the turn to the engine.
    /// Rejections leave the position and phase untouched.
    pub fn submit_move(&mut self, text: &str) -> Result<Vec<SessionEvent>, MoveError> {
        if !matches!(self.phase, Phase::AwaitingHumanMove) {
            return Err(MoveError::NotYourTurn);
        }
        let mv = self.position.apply_uci(text.trim())?;
        info!("human plays {mv}");
        let mut events = vec![SessionEvent::BoardChanged];
        self.enter_engine_phase(&mut events);
        Ok(events)
    }

    /// Non-blocking check for the engine's reply; empty if none is due yet.
    pub fn poll_engine(&mut self) -> Vec<SessionEvent> {
        let reply = match &self.pending {
            None => return Vec::new(),
            Some(rx) => match rx.try_recv() {
                Err(mpsc::TryRecvError::Empty) => return Vec::new(),
                Ok(reply) => Some(reply),
                Err(mpsc::TryRecvError::Disconnected) => None,
            },
        };
        self.pending = None;
        let mut events = Vec::new();
        match reply {
            Some(reply) => self.reconcile(reply, &mut events),
            None => self.finish(Outcome::EngineUnavailable, &mut events),
        }
        events
    }

    /// Blocks until the pending engine reply arrives and applies it.
    pub fn wait_engine(&mut self) -> Vec<SessionEvent> {
        let rx = match self.pending.take() {
            Some(rx) => rx,
            None => return Vec::new(),
        };
        let mut events = Vec::new();
        match rx.recv() {
            Ok(reply) => self.reconcile(reply, &mut events),
            Err(_) => self.finish(Outcome::EngineUnavailable, &mut events),
        }
        events
    }

    /// Tears the engine down. A request still in flight is unblocked by the
    /// process exit; its reply is discarded.
    pub fn shutdown(&mut self) {
        self.engine.shutdown();
    }

    fn enter_engine_phase(&mut self, events: &mut Vec<SessionEvent>) {
        if self.check_terminal(events) {
            return;
        }
        self.phase = Phase::AwaitingEngineMove;
        events.push(SessionEvent::InputEnabled(false));
        // one request per ply; the previous one must have been reconciled
        debug_assert!(self.pending.is_none());
        let (tx, rx) = mpsc::channel();
        let engine = Arc::clone(&self.engine);
        let fen = self.position.fen();
        thread::spawn(move || {
            let _ = tx.send(engine.request_move(&fen));
        });
        self.pending = Some(rx);
    }

    fn reconcile(&mut self, reply: Result<String, EngineError>, events: &mut Vec<SessionEvent>) {
        match reply {
            Ok(text) => match self.position.apply_uci(&text) {
                Ok(mv) => {
                    info!("engine plays {mv}");
                    events.push(SessionEvent::EngineMovePlayed(text));
                    events.push(SessionEvent::BoardChanged);
                    if !self.check_terminal(events) {
                        self.phase = Phase::AwaitingHumanMove;
                        events.push(SessionEvent::InputEnabled(true));
                    }
                }
                Err(e) => {
                    warn!("engine reply rejected: {e}");
                    self.finish(Outcome::EngineProtocol { reply: text }, events);
                }
            },
            Err(EngineError::Protocol(reply)) => {
                self.finish(Outcome::EngineProtocol { reply }, events);
            }
            Err(e) => {
                warn!("engine request failed: {e}");
                self.finish(Outcome::EngineUnavailable, events);
            }
        }
    }

    fn check_terminal(&mut self, events: &mut Vec<SessionEvent>) -> bool {
        let outcome = match self.position.termination() {
            Termination::Ongoing => return false,
            Termination::Checkmate { winner } => Outcome::Checkmate { winner },
            Termination::Stalemate => Outcome::Stalemate,
            Termination::InsufficientMaterial => Outcome::InsufficientMaterial,
            Termination::FiftyMoveRule => Outcome::FiftyMoveRule,
        };
        self.finish(outcome, events);
        true
    }

    fn finish(&mut self, outcome: Outcome, events: &mut Vec<SessionEvent>) {
        info!("game over: {outcome:?}");
        self.phase = Phase::GameOver(outcome.clone());
        events.push(SessionEvent::InputEnabled(false));
        events.push(SessionEvent::GameEnded(outcome));
    }
}

impl<E: MoveEngine + 'static> Drop for GameSession<E> {
    fn drop(&mut self) {
        self.engine.shutdown();
    }
}
