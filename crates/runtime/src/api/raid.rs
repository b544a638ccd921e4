//! Shared raid ledger boundary.
use async_trait::async_trait;
use tokio::sync::mpsc;

use super::errors::RaidError;

/// Connection to the service that owns a raid boss's authoritative HP.
#[async_trait]
pub trait RaidChannel: Send + Sync {
    /// Records damage dealt by `user_id`. Fire-and-forget from the session's
    /// point of view; failures are logged, never retried.
    async fn report_damage(&self, raid_id: &str, user_id: &str, amount: u32)
    -> Result<(), RaidError>;

    /// Stream of authoritative HP values for `raid_id`.
    async fn subscribe_hp(&self, raid_id: &str) -> Result<mpsc::Receiver<u32>, RaidError>;
}
