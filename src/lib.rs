//! Embed composer for game-asset deal announcements.
//!
//! The core is the reconciliation engine: category defaults, the bulk
//! payload merge rules, per-field normalization and the multi-embed list
//! lifecycle. Around it sit the store listing scrapers and the backend
//! delivery client.

pub mod backend;
pub mod composer;
pub mod defaults;
pub mod error;
pub mod form;
pub mod list;
pub mod merge;
pub mod models;
pub mod normalize;
pub mod scrapers;
pub mod traits;

pub use composer::Composer;
pub use error::ComposeError;
