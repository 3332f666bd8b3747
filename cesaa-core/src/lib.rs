//! # cesaa-core
//!
//! Shared vocabulary for the chat-history adapter: the [`PlatformTarget`] send-target union,
//! platform scopes and scene types used by the recorder, parse errors, and tracing initialization.
//! No I/O; used by storage, cesaa and cesaa-cli.

pub mod error;
pub mod logger;
pub mod scope;
pub mod target;

pub use error::{Result, TargetError};
pub use logger::init_tracing;
pub use scope::{SceneType, SessionLevel, SupportScope};
pub use target::{DetailType, PlatformTarget};
