//! # CLI Module
//!
//! User-facing command implementations for spofix.
//!
//! ## Commands
//!
//! - [`fix`] - Logs in, lists the user's playlists, asks which ones to fix and
//!   rebuilds each of them in reverse order
//!
//! ## Flow
//!
//! ```text
//! login (callback server + one-shot hand-off)
//!     ↓
//! list playlists → table → selection prompt
//!     ↓
//! for each selection: fetch → reverse → create → append one by one
//!     ↓
//! Done
//! ```
//!
//! Fatal errors (login, listing, unreadable or invalid selection) are returned
//! as [`FixError`](crate::errors::FixError); the binary prints them through
//! `error!` and exits with status 1. Failures while rebuilding a single
//! playlist or track are reported with `warning!` and the run goes on.

mod fix;

pub use fix::fix;
pub use fix::fix_playlists;
pub use fix::playlist_table;
pub use fix::run_selection;
