//! Topic-based event bus implementation.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::broadcast;

use battle_core::{BattleSnapshot, SessionEvent};

use super::types::RaidEvent;

/// Topics for event routing
#[derive(Debug, Clone, Copy, Hash, Eq, PartialEq, Serialize, Deserialize, strum::Display)]
pub enum Topic {
    /// Phase changes, turn starts and the end of the battle
    Phase,
    /// Planning commands and batch resolution
    Combat,
    /// Enemy strikes and the reaction minigame
    Reaction,
    /// Authoritative HP corrections and damage reports
    Raid,
    /// Full view refreshes
    Snapshot,
}

/// Event wrapper that carries the topic and typed event
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Event {
    Session(SessionEvent),
    Raid(RaidEvent),
    Snapshot(Box<BattleSnapshot>),
}

impl Event {
    pub fn topic(&self) -> Topic {
        match self {
            Event::Session(event) => match event {
                SessionEvent::PhaseChanged { .. }
                | SessionEvent::TurnStarted { .. }
                | SessionEvent::VictoryProvisional
                | SessionEvent::BattleEnded { .. } => Topic::Phase,
                SessionEvent::AbilityArmed { .. }
                | SessionEvent::AbilityPlanned { .. }
                | SessionEvent::PlanUndone { .. }
                | SessionEvent::StanceChanged { .. }
                | SessionEvent::BatchResolved { .. } => Topic::Combat,
                SessionEvent::StrikeTelegraphed { .. }
                | SessionEvent::ReactionStarted { .. }
                | SessionEvent::ReactionResolved { .. } => Topic::Reaction,
                SessionEvent::EnemyHpCorrected { .. } => Topic::Raid,
            },
            Event::Raid(_) => Topic::Raid,
            Event::Snapshot(_) => Topic::Snapshot,
        }
    }
}

#[derive(Debug)]
struct Channels {
    phase: broadcast::Sender<Event>,
    combat: broadcast::Sender<Event>,
    reaction: broadcast::Sender<Event>,
    raid: broadcast::Sender<Event>,
    snapshot: broadcast::Sender<Event>,
}

impl Channels {
    fn get(&self, topic: Topic) -> &broadcast::Sender<Event> {
        match topic {
            Topic::Phase => &self.phase,
            Topic::Combat => &self.combat,
            Topic::Reaction => &self.reaction,
            Topic::Raid => &self.raid,
            Topic::Snapshot => &self.snapshot,
        }
    }
}

/// Topic-based event bus
///
/// Every topic gets its own broadcast channel at construction, so publishing
/// and subscribing never fail. Slow subscribers observe `Lagged` and skip
/// ahead; events are best-effort.
#[derive(Debug, Clone)]
pub struct EventBus {
    channels: Arc<Channels>,
}

impl EventBus {
    /// Creates a new event bus with default capacity for each topic
    pub fn new() -> Self {
        Self::with_capacity(100)
    }

    /// Creates a new event bus with specified capacity per topic
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        let channel = || broadcast::channel(capacity).0;

        Self {
            channels: Arc::new(Channels {
                phase: channel(),
                combat: channel(),
                reaction: channel(),
                raid: channel(),
                snapshot: channel(),
            }),
        }
    }

    /// Publish an event to its corresponding topic
    pub fn publish(&self, event: Event) {
        let topic = event.topic();
        if self.channels.get(topic).send(event).is_err() {
            // No subscribers for this topic - this is normal, not an error
            tracing::trace!("No subscribers for topic {:?}", topic);
        }
    }

    /// Subscribe to a specific topic
    ///
    /// Returns a receiver that will only receive events for that topic.
    pub fn subscribe(&self, topic: Topic) -> broadcast::Receiver<Event> {
        self.channels.get(topic).subscribe()
    }

    /// Subscribe to multiple topics
    pub fn subscribe_multiple(
        &self,
        topics: &[Topic],
    ) -> HashMap<Topic, broadcast::Receiver<Event>> {
        topics
            .iter()
            .map(|&topic| (topic, self.subscribe(topic)))
            .collect()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}
