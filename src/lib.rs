// Library root
// -----------
// This crate exposes a small library surface for the `eero` binary.
// The binary (`main.rs`) parses arguments, builds the client and hands
// it to the command handlers in `ui`.
//
// Module responsibilities:
// - `models`: the `{meta, data}` response envelope and the account,
//   network and device payloads.
// - `session`: the session credential and where it is persisted.
// - `api`: HTTP interactions with the eero cloud API and the login state.
// - `config` / `cli`: defaults, environment overrides, argument parsing.
// - `ui`: terminal flows for each subcommand.
pub mod api;
pub mod cli;
pub mod config;
pub mod error;
pub mod models;
pub mod session;
pub mod ui;

pub use api::{ApiClient, AuthState, DeviceSweep, LoginAttempt};
pub use config::ClientConfig;
pub use error::{Error, Result};
pub use session::{Credential, FileStore, MemoryStore, SessionStore};
