use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use tokio::sync::{Mutex, mpsc};

use crate::api::{RaidChannel, RaidError};

const SUBSCRIBER_BUFFER: usize = 16;

/// A damage report accepted by the ledger.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DamageReport {
    pub raid_id: String,
    pub user_id: String,
    pub amount: u32,
}

#[derive(Debug)]
struct RaidEntry {
    hp: u32,
    subscribers: Vec<mpsc::Sender<u32>>,
}

impl RaidEntry {
    fn broadcast(&mut self) {
        let hp = self.hp;
        // Closed subscribers are dropped. A full one misses this value and
        // catches up on the next push.
        self.subscribers.retain(|tx| match tx.try_send(hp) {
            Ok(()) => true,
            Err(mpsc::error::TrySendError::Full(_)) => true,
            Err(mpsc::error::TrySendError::Closed(_)) => false,
        });
    }
}

#[derive(Debug, Default)]
struct LedgerState {
    raids: HashMap<String, RaidEntry>,
    reports: Vec<DamageReport>,
}

/// In-process raid ledger.
///
/// Holds the shared HP of every open raid, subtracts reported damage, and
/// pushes the new value to every subscriber. New subscribers immediately
/// receive the current HP.
#[derive(Debug, Default)]
pub struct LocalRaidLedger {
    state: Mutex<LedgerState>,
    failing: AtomicBool,
}

impl LocalRaidLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn open_raid(&self, raid_id: impl Into<String>, hp: u32) {
        let mut state = self.state.lock().await;
        state.raids.insert(
            raid_id.into(),
            RaidEntry {
                hp,
                subscribers: Vec::new(),
            },
        );
    }

    /// Overwrites the shared HP, e.g. to simulate other raiders' damage.
    pub async fn set_hp(&self, raid_id: &str, hp: u32) -> Result<(), RaidError> {
        let mut state = self.state.lock().await;
        let entry = state
            .raids
            .get_mut(raid_id)
            .ok_or_else(|| RaidError::UnknownRaid(raid_id.to_owned()))?;
        entry.hp = hp;
        entry.broadcast();
        Ok(())
    }

    pub async fn hp(&self, raid_id: &str) -> Option<u32> {
        self.state.lock().await.raids.get(raid_id).map(|entry| entry.hp)
    }

    pub async fn reports(&self) -> Vec<DamageReport> {
        self.state.lock().await.reports.clone()
    }

    /// While set, every report is refused with [`RaidError::Unavailable`].
    pub fn fail_reports(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }
}

#[async_trait]
impl RaidChannel for LocalRaidLedger {
    async fn report_damage(
        &self,
        raid_id: &str,
        user_id: &str,
        amount: u32,
    ) -> Result<(), RaidError> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(RaidError::Unavailable("ledger refused the report".into()));
        }

        let mut state = self.state.lock().await;
        let entry = state
            .raids
            .get_mut(raid_id)
            .ok_or_else(|| RaidError::UnknownRaid(raid_id.to_owned()))?;
        entry.hp = entry.hp.saturating_sub(amount);
        entry.broadcast();

        state.reports.push(DamageReport {
            raid_id: raid_id.to_owned(),
            user_id: user_id.to_owned(),
            amount,
        });
        Ok(())
    }

    async fn subscribe_hp(&self, raid_id: &str) -> Result<mpsc::Receiver<u32>, RaidError> {
        let mut state = self.state.lock().await;
        let entry = state
            .raids
            .get_mut(raid_id)
            .ok_or_else(|| RaidError::UnknownRaid(raid_id.to_owned()))?;

        let (tx, rx) = mpsc::channel(SUBSCRIBER_BUFFER);
        // Fresh channel with spare capacity; cannot fail.
        let _ = tx.try_send(entry.hp);
        entry.subscribers.push(tx);
        Ok(rx)
    }
}
