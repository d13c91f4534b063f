//! Core types for the showcase site.
//!
//! This crate provides the pieces shared by the server and the CLI:
//! - `fingerprint` and `voting` for one-vote-per-device proposal voting
//! - `sweep` and `schedule` for removing expired proposals on a timer
//! - `event` and `ics` for community events and their calendar exports
//! - `store` and `auth` for the document store and sign-in collaborators

pub mod auth;
pub mod config;
pub mod constants;
pub mod error;
pub mod event;
pub mod fingerprint;
pub mod ics;
pub mod notify;
pub mod proposal;
pub mod schedule;
pub mod store;
pub mod sweep;
pub mod voting;

pub use error::{ShowcaseError, ShowcaseResult};
