//! # Game Events
//!
//! Gameplay code announces what happened; the driver drains the bus once per
//! tick and decides what to do about it (play a sound, log, end the run).
//!
//! ```text
//! ┌────────────┐   send (never blocks)   ┌─────────┐   drain   ┌────────┐
//! │  gameplay  │────────────────────────>│ channel │──────────>│ driver │
//! └────────────┘                          └─────────┘           └────────┘
//! ```

use crossbeam_channel::{bounded, Receiver, Sender, TrySendError};
use swarm_core::EntityHandle;
use swarm_shared::Vec2;
use tracing::warn;

/// Something gameplay wants the outside world to know about.
#[derive(Clone, Debug, PartialEq)]
pub enum GameEvent {
    /// The player fired.
    Shot {
        /// Projectile that was spawned.
        projectile: EntityHandle,
        /// Where it started.
        origin: Vec2,
    },

    /// An enemy reached the player.
    PlayerHit {
        /// Player health after the hit.
        health: f32,
    },

    /// A projectile destroyed an enemy.
    EnemyKilled {
        /// Where the enemy was.
        position: Vec2,
        /// Score after the kill.
        score: u32,
    },

    /// Player health reached zero.
    GameOver {
        /// Enemies killed.
        score: u32,
        /// Seconds survived.
        survived: f32,
    },
}

/// Bounded event channel.
///
/// Pre-allocates its buffer so sending never allocates in the tick.
pub struct EventBus {
    sender: Sender<GameEvent>,
    receiver: Receiver<GameEvent>,
}

impl EventBus {
    /// Creates a bus that holds at most `capacity` undrained events.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let (sender, receiver) = bounded(capacity);
        Self { sender, receiver }
    }

    /// Creates a sender handle.
    #[must_use]
    pub fn sender(&self) -> EventSender {
        EventSender {
            sender: self.sender.clone(),
        }
    }

    /// Creates a receiver handle.
    #[must_use]
    pub fn receiver(&self) -> EventReceiver {
        EventReceiver {
            receiver: self.receiver.clone(),
        }
    }
}

/// Handle for sending events.
#[derive(Clone)]
pub struct EventSender {
    sender: Sender<GameEvent>,
}

impl EventSender {
    /// Sends an event without blocking.
    ///
    /// Returns `false` if the event was dropped because nobody drained the bus.
    #[inline]
    pub fn send(&self, event: GameEvent) -> bool {
        match self.sender.try_send(event) {
            Ok(()) => true,
            Err(TrySendError::Full(event)) => {
                warn!(?event, "event bus full, dropping event");
                false
            }
            Err(TrySendError::Disconnected(_)) => false,
        }
    }
}

/// Handle for receiving events.
#[derive(Clone)]
pub struct EventReceiver {
    receiver: Receiver<GameEvent>,
}

impl EventReceiver {
    /// Receives all pending events without blocking.
    #[must_use]
    pub fn drain(&self) -> Vec<GameEvent> {
        self.receiver.try_iter().collect()
    }

    /// Receives one event, if any.
    #[must_use]
    pub fn try_recv(&self) -> Option<GameEvent> {
        self.receiver.try_recv().ok()
    }

    /// Returns the number of pending events.
    #[must_use]
    pub fn pending_count(&self) -> usize {
        self.receiver.len()
    }
}
