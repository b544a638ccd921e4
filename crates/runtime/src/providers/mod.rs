//! Built-in [`crate::EncounterProvider`] implementations.

mod content;

pub use content::ContentProvider;
