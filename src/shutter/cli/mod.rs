//! # CLI Behavior
//!
//! The CLI is the only place that knows about terminal I/O, exit codes, and output formatting.
//! For the overall architecture, see the crate-level documentation of the `shutter` library.
//!
//! ## Flags
//!
//! Flags may appear anywhere on the line, before or after the command:
//! `shutter --local snapshot home index.html` and `shutter snapshot home index.html --local`
//! are the same invocation. `--help` and `--version` are handled by the dispatcher rather
//! than by clap so that their precedence over commands is fixed in one place.
//! Repeating a flag is harmless and unknown `--name` flags are ignored, so
//! `shutter --bogus` still prints the usage. Single-dash tokens such as `-1` are
//! arguments, not flags (`-h` is the one exception).
//!
//! ## Exit Codes
//!
//! - `0`: usage, version, command help, or the command succeeded
//! - `1`: unknown command, missing arguments, unreadable (non UTF-8) arguments, config or
//!   command failure
//!
//! ## Module Structure
//!
//! - `commands`: Wires the dispatcher and turns its outcome into output
//! - `render`: Output formatting (help, messages, errors)
//! - `setup`: Argument parsing via clap, version and usage text

mod commands;
mod render;
pub mod setup;

pub use commands::run;
pub use render::report_error;
