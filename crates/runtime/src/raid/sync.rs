use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::{debug, warn};

use crate::api::{RaidChannel, RaidError};
use crate::events::{Event, EventBus, RaidEvent};

/// Per-session link to the shared raid ledger.
///
/// Reports run as detached tasks so a slow ledger never stalls the battle.
/// A failed report is logged and published as [`RaidEvent::ReportFailed`];
/// it is not retried and does not affect the local session.
pub struct RaidSyncAdapter {
    channel: Arc<dyn RaidChannel>,
    raid_id: String,
    user_id: String,
    event_bus: EventBus,
}

impl RaidSyncAdapter {
    /// Subscribes to authoritative HP for `raid_id`.
    ///
    /// Returns the adapter together with the HP stream the session worker
    /// should apply. Dropping the stream unsubscribes.
    pub async fn connect(
        channel: Arc<dyn RaidChannel>,
        raid_id: impl Into<String>,
        user_id: impl Into<String>,
        event_bus: EventBus,
    ) -> Result<(Self, mpsc::Receiver<u32>), RaidError> {
        let raid_id = raid_id.into();
        let hp_rx = channel.subscribe_hp(&raid_id).await?;
        debug!(target: "runtime::raid", raid = %raid_id, "subscribed to raid hp");

        Ok((
            Self {
                channel,
                raid_id,
                user_id: user_id.into(),
                event_bus,
            },
            hp_rx,
        ))
    }

    pub fn raid_id(&self) -> &str {
        &self.raid_id
    }

    /// Forwards damage dealt by this player. Zero damage is not reported.
    pub fn report(&self, amount: u32) {
        if amount == 0 {
            return;
        }

        let channel = Arc::clone(&self.channel);
        let raid_id = self.raid_id.clone();
        let user_id = self.user_id.clone();
        let event_bus = self.event_bus.clone();

        tokio::spawn(async move {
            let event = match channel.report_damage(&raid_id, &user_id, amount).await {
                Ok(()) => {
                    debug!(target: "runtime::raid", raid = %raid_id, amount, "damage reported");
                    RaidEvent::DamageReported { amount }
                }
                Err(err) => {
                    warn!(
                        target: "runtime::raid",
                        raid = %raid_id,
                        amount,
                        error = %err,
                        "failed to report raid damage"
                    );
                    RaidEvent::ReportFailed {
                        amount,
                        error: err.to_string(),
                    }
                }
            };
            event_bus.publish(Event::Raid(event));
        });
    }
}
