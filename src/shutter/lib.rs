//! # Shutter CLI Architecture
//!
//! `shutter` is the command line entry point for visual snapshot testing. The
//! binary itself is a dispatcher: it picks one command, prepares its
//! configuration and hands over. The rendering work happens elsewhere.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  CLI Layer (cli/, wired by main.rs)                         │
//! │  - Parses arguments, renders help/version/messages          │
//! │  - The ONLY place that knows about stdout/stderr/exit codes │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Dispatch (dispatch.rs)                                     │
//! │  - Pure resolution of input → what to do                    │
//! │  - Loads config, resolves the API endpoint, calls handler   │
//! └─────────────────────────────────────────────────────────────┘
//!                  │                            │
//!                  ▼                            ▼
//! ┌────────────────────────────┐  ┌─────────────────────────────┐
//! │  Config (config.rs)        │  │  Handlers (handlers/)       │
//! │  - `.shutterrc` discovery  │  │  - authenticate (built in)  │
//! │  - JSON load / save        │  │  - shutter-<command> bins   │
//! └────────────────────────────┘  └─────────────────────────────┘
//! ```
//!
//! ## Key Principle: Explicit State
//!
//! The API endpoint may come from `SHUTTER_API` or from `serviceHost` in the
//! config, or be left unset so collaborators use their own default. It is
//! computed once per run and passed to the handler in a
//! [`dispatch::CommandContext`]. The process environment is read at startup and
//! never written.
//!
//! ## Testing Strategy
//!
//! - `resolve` is a pure function and is tested as a decision table.
//! - `Dispatcher` is tested with stub loaders and recording handlers.
//! - Config and handlers are tested against temp directories.
//! - The binary is exercised end to end in `tests/`.
//!
//! ## Module Overview
//!
//! - [`dispatch`]: Input resolution and the dispatcher
//! - [`commands`]: The command registry
//! - [`config`]: `.shutterrc` loading and saving
//! - [`handlers`]: Command implementations
//! - [`error`]: Error types

pub mod commands;
pub mod config;
pub mod dispatch;
pub mod error;
pub mod handlers;
