//! Core business logic - framework-agnostic operations on users, games and
//! ownership.
//!
//! Nothing in this module knows about Discord. The bot layer calls into these
//! functions and turns their outcomes into replies.

/// Steam and custom game catalog
pub mod catalog;
/// Fuzzy title resolution
pub mod matching;
/// Who owns what
pub mod ownership;
/// Steam-driven synchronisation of the catalog and libraries
pub mod sync;
/// Discord-to-Steam account links
pub mod user;
