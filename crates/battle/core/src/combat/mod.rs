//! Combat resolution.
//!
//! Pure functions that turn a planned batch (or a resolved enemy strike) into
//! HP and status changes. Nothing here reads the clock or the RNG; stance and
//! charge level are passed in by the session.
//!
//! # Core Functions
//!
//! - `resolve_batch`: applies a planned batch in order
//! - `calculate_damage` / `calculate_heal`: the numeric formulas
//! - `apply_strike`: enemy strike outcome on its target

mod formula;
mod resolver;
mod result;

pub use formula::{calculate_damage, calculate_heal, chain_multiplier, DamageModifiers};
pub use resolver::{apply_strike, resolve_batch, ResolveContext, ResolveError};
pub use result::{ActionOutcome, BatchOutcome, EffectOutcome};
