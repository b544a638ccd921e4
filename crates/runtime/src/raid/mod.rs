//! Raid synchronization.
//!
//! [`RaidSyncAdapter`] bridges one session to a [`crate::RaidChannel`]:
//! damage goes out, authoritative HP comes back. [`LocalRaidLedger`] is an
//! in-process channel for offline raids and tests.

mod ledger;
mod sync;

pub use ledger::{DamageReport, LocalRaidLedger};
pub use sync::RaidSyncAdapter;
