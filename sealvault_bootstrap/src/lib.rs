// /////////////////////////////////////////////////////////////////////////////
// sealvault
// SPDX-License-Identifier: BSD-3-Clause
// /////////////////////////////////////////////////////////////////////////////

//! # Bootstrap Module
//!
//! Sits outside the domain/application layers and provides everything a
//! process entry point needs that those layers must not touch directly:
//!
//! - **Platform abstraction** — the OS-account identifier that feeds
//!   composite-key source #3 (§4.1), nothing more.
//! - **Shutdown coordination** — a cancellation token long-running
//!   operations can poll, plus a grace period.
//! - **CLI** — a thin argument surface for the demonstration binary; CLI
//!   parsing itself is an out-of-scope external collaborator.
//! - **Bootstrap logging** — console output before the application layer's
//!   `tracing` subscriber is installed.
//! - **Exit codes** — maps `VaultError` to a POSIX-ish process exit status.
//!
//! The domain crate never depends on this one; this crate and the
//! application crate both depend on the domain crate, and the application
//! crate's binary depends on this one for entry-point plumbing.

pub mod cli;
pub mod exit_code;
pub mod logger;
pub mod platform;
pub mod shutdown;

pub use cli::{parse_cli, Cli, Command, MergePolicyArg};
pub use exit_code::{map_error_to_exit_code, result_to_exit_code, ExitCode};
pub use logger::{BootstrapLogger, ConsoleLogger, NoOpLogger};
pub use platform::{create_platform, Platform};
pub use shutdown::{CancellationToken, ShutdownCoordinator};
