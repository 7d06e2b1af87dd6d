//! Cross-thread commands
//!
//! UI and lifecycle callbacks run on other threads. They post [`Command`]s
//! through an [`EngineHandle`]; the engine drains the queue at the start of
//! each frame, in order, so simulation state is only touched by the frame
//! loop.

use std::sync::Arc;
use std::sync::mpsc::{self, Receiver, Sender, TryRecvError};

use parking_lot::Mutex;
use thiserror::Error;

use crate::hud::HudLayout;

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// Begin a session unless one is running
    StartGame,
    /// Begin a fresh session even if one is running
    Reset,
    /// New pixel rectangles for the HUD widgets
    SetHudLayout(HudLayout),
    /// Tear the engine down; nothing queued after this is applied
    Destroy,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CommandError {
    #[error("engine has been destroyed")]
    Closed,
}

/// Cloneable sender side of the command queue
///
/// All clones share one sender slot. Sending `Destroy` empties it under the
/// same lock, so no command can be accepted behind it.
#[derive(Debug, Clone)]
pub struct EngineHandle {
    tx: Arc<Mutex<Option<Sender<Command>>>>,
}

impl EngineHandle {
    pub fn send(&self, command: Command) -> Result<(), CommandError> {
        let mut slot = self.tx.lock();
        let tx = slot.as_ref().ok_or(CommandError::Closed)?;
        let destroy = command == Command::Destroy;
        tx.send(command).map_err(|_| CommandError::Closed)?;
        if destroy {
            *slot = None;
        }
        Ok(())
    }

    pub fn start_game(&self) -> Result<(), CommandError> {
        self.send(Command::StartGame)
    }

    pub fn reset(&self) -> Result<(), CommandError> {
        self.send(Command::Reset)
    }

    pub fn set_hud_layout(&self, layout: HudLayout) -> Result<(), CommandError> {
        self.send(Command::SetHudLayout(layout))
    }

    pub fn destroy(&self) -> Result<(), CommandError> {
        self.send(Command::Destroy)
    }

    pub fn is_closed(&self) -> bool {
        self.tx.lock().is_none()
    }

    fn close(&self) {
        self.tx.lock().take();
    }
}

/// Receiver side, owned by the engine
#[derive(Debug)]
pub struct CommandQueue {
    rx: Receiver<Command>,
    handle: EngineHandle,
}

impl Default for CommandQueue {
    fn default() -> Self {
        Self::new()
    }
}

impl CommandQueue {
    pub fn new() -> Self {
        let (tx, rx) = mpsc::channel();
        Self {
            rx,
            handle: EngineHandle {
                tx: Arc::new(Mutex::new(Some(tx))),
            },
        }
    }

    pub fn handle(&self) -> EngineHandle {
        self.handle.clone()
    }

    /// Next queued command, without blocking
    pub fn poll(&self) -> Option<Command> {
        match self.rx.try_recv() {
            Ok(command) => Some(command),
            Err(TryRecvError::Empty | TryRecvError::Disconnected) => None,
        }
    }

    /// Reject further sends and discard anything still queued
    pub fn close(&self) {
        self.handle.close();
        let dropped = self.rx.try_iter().count();
        if dropped > 0 {
            log::debug!("Discarded {} commands queued after teardown", dropped);
        }
    }

    pub fn is_closed(&self) -> bool {
        self.handle.is_closed()
    }
}
