//! Topic-based event bus for runtime events.
//!
//! Session events are routed to topics so a UI can listen to, say, only the
//! reaction minigame or only snapshot refreshes.

mod bus;
mod types;

pub use bus::{Event, EventBus, Topic};
pub use types::RaidEvent;
