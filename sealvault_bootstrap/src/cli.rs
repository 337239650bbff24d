// /////////////////////////////////////////////////////////////////////////////
// sealvault
// SPDX-License-Identifier: BSD-3-Clause
// /////////////////////////////////////////////////////////////////////////////

//! # Command-Line Interface
//!
//! CLI argument parsing is an out-of-scope external collaborator (§1) — this
//! is deliberately thin, just enough to open, create, and save a vault from
//! a terminal so the library can be exercised end-to-end. No foreign-format
//! import/export, auto-type, or plugin surface lives here.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(name = "sealvault", version, about = "Open, create, and merge encrypted vault files")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Emit verbose (debug-level) logging.
    #[arg(long, global = true)]
    pub verbose: bool,

    /// Path to a TOML settings file overriding the built-in defaults.
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Create a new, empty vault file.
    New {
        /// Destination path for the new vault.
        path: PathBuf,

        /// Passphrase source; read from the terminal if omitted.
        #[arg(long)]
        passphrase: Option<String>,

        /// Optional key-file to combine with the passphrase.
        #[arg(long)]
        key_file: Option<PathBuf>,

        /// Key-derivation round count (§4.1).
        #[arg(long, default_value_t = 60_000)]
        rounds: u64,
    },

    /// Open a vault and print a summary of its contents.
    Open {
        path: PathBuf,

        #[arg(long)]
        passphrase: Option<String>,

        #[arg(long)]
        key_file: Option<PathBuf>,
    },

    /// Merge a source vault into a local vault, saving the result.
    Merge {
        local: PathBuf,
        source: PathBuf,

        #[arg(long)]
        passphrase: Option<String>,

        #[arg(long, value_enum, default_value_t = MergePolicyArg::Synchronize)]
        policy: MergePolicyArg,
    },

    /// Search entries by substring over a field mask.
    Search {
        path: PathBuf,
        query: String,

        #[arg(long)]
        passphrase: Option<String>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum MergePolicyArg {
    OverwriteExisting,
    OverwriteIfNewer,
    KeepExisting,
    CreateNewUuids,
    Synchronize,
}

pub fn parse_cli() -> Cli {
    Cli::parse()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_command_accepts_a_bare_path() {
        let cli = Cli::parse_from(["sealvault", "new", "vault.kdbx"]);
        match cli.command {
            Command::New { path, rounds, .. } => {
                assert_eq!(path, PathBuf::from("vault.kdbx"));
                assert_eq!(rounds, 60_000);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn merge_command_defaults_to_synchronize() {
        let cli = Cli::parse_from(["sealvault", "merge", "local.kdbx", "source.kdbx"]);
        match cli.command {
            Command::Merge { policy, .. } => assert_eq!(policy, MergePolicyArg::Synchronize),
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn verbose_flag_is_global() {
        let cli = Cli::parse_from(["sealvault", "--verbose", "open", "vault.kdbx"]);
        assert!(cli.verbose);
    }
}
