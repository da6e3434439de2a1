//! Common test utilities for marksflow tests

pub mod interaction;
pub mod mock_repository;

// Re-exports for convenience - not all test binaries use all exports
#[allow(unused_imports)]
pub use interaction::ScriptedInteraction;
#[allow(unused_imports)]
pub use mock_repository::{Call, MockMarksRepository};
