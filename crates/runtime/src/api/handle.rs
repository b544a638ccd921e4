//! Cloneable façade for issuing commands to a running battle.
//!
//! [`BattleHandle`] hides channel plumbing and offers async helpers for the
//! player commands and for streaming events from specific topics.
use tokio::sync::{broadcast, mpsc, oneshot};

use battle_core::{
    AbilityId, ActorId, BatchOutcome, BattleSnapshot, ParryInput, SelectOutcome, Stance, Verdict,
};

use super::errors::{Result, RuntimeError};
use crate::events::{Event, EventBus, Topic};
use crate::workers::Command;

/// Client-facing handle to interact with a battle.
///
/// Commands the session refuses come back as [`RuntimeError::Rejected`] and
/// leave the battle untouched; callers that mirror a UI can ignore them.
#[derive(Clone)]
pub struct BattleHandle {
    command_tx: mpsc::Sender<Command>,
    event_bus: EventBus,
}

impl BattleHandle {
    pub(crate) fn new(command_tx: mpsc::Sender<Command>, event_bus: EventBus) -> Self {
        Self {
            command_tx,
            event_bus,
        }
    }

    async fn request<T>(&self, build: impl FnOnce(oneshot::Sender<T>) -> Command) -> Result<T> {
        let (reply_tx, reply_rx) = oneshot::channel();

        self.command_tx
            .send(build(reply_tx))
            .await
            .map_err(|_| RuntimeError::CommandChannelClosed)?;

        reply_rx.await.map_err(RuntimeError::ReplyChannelClosed)
    }

    /// Arm an ability, or plan it if it is already armed.
    pub async fn select(&self, actor: ActorId, ability: impl Into<AbilityId>) -> Result<SelectOutcome> {
        let ability = ability.into();
        self.request(|reply| Command::Select {
            actor,
            ability,
            reply,
        })
        .await?
    }

    pub async fn undo_last(&self) -> Result<()> {
        self.request(|reply| Command::UndoLast { reply }).await?
    }

    pub async fn toggle_stance(&self) -> Result<Stance> {
        self.request(|reply| Command::ToggleStance { reply }).await?
    }

    /// Resolve the planned batch. An empty plan passes the turn.
    pub async fn commit(&self) -> Result<BatchOutcome> {
        self.request(|reply| Command::Commit { reply }).await?
    }

    pub async fn submit_parry_input(&self, input: ParryInput) -> Result<Option<Verdict>> {
        self.request(|reply| Command::Parry { input, reply }).await?
    }

    /// Acknowledge a finished battle. The worker shuts down afterwards.
    pub async fn acknowledge(&self) -> Result<()> {
        self.request(|reply| Command::Acknowledge { reply }).await?
    }

    /// Current battle view, with time advanced to the clock's `now`.
    pub async fn snapshot(&self) -> Result<BattleSnapshot> {
        self.request(|reply| Command::Snapshot { reply }).await
    }

    /// Subscribe to events from a specific topic
    ///
    /// # Topics
    ///
    /// - `Topic::Phase` - phase changes, turn starts, battle end
    /// - `Topic::Combat` - planning and batch resolution
    /// - `Topic::Reaction` - enemy strikes and parry outcomes
    /// - `Topic::Raid` - authoritative HP corrections and damage reports
    /// - `Topic::Snapshot` - a fresh [`BattleSnapshot`] whenever state changed
    pub fn subscribe(&self, topic: Topic) -> broadcast::Receiver<Event> {
        self.event_bus.subscribe(topic)
    }

    pub fn subscribe_multiple(
        &self,
        topics: &[Topic],
    ) -> std::collections::HashMap<Topic, broadcast::Receiver<Event>> {
        self.event_bus.subscribe_multiple(topics)
    }

    pub fn event_bus(&self) -> &EventBus {
        &self.event_bus
    }

    pub(crate) async fn shutdown(&self) {
        // A closed channel means the worker already stopped.
        let _ = self.command_tx.send(Command::Shutdown).await;
    }
}
