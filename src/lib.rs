//! Revenue split allocation engine.
//!
//! Creators define splits: a creator share plus member shares that must
//! add up to exactly 100%. New splits are staged in a [`SplitForm`] and
//! committed into a [`SplitService`], which also runs the in-place edit
//! session and derives the aggregates shown to users.
//!
//! [`SplitForm`]: application::services::SplitForm
//! [`SplitService`]: application::services::SplitService

pub mod application;
pub mod cli;
pub mod config;
pub mod domain;
pub mod exitcode;
pub mod infrastructure;
pub mod util;
