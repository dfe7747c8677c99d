//! Discord interaction handlers
//!
//! This module provides handlers for Discord interactions that are not slash
//! commands themselves: autocomplete suggestions and select menu prompts.

/// Autocomplete handlers for game titles
pub mod autocomplete;
/// Select menu used to disambiguate fuzzy title matches
pub mod select;
