//! Background workers run by the runtime.

mod session;

pub use session::{Command, RaidLink, SessionWorker};
