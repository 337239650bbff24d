// /////////////////////////////////////////////////////////////////////////////
// sealvault
// SPDX-License-Identifier: BSD-3-Clause
// /////////////////////////////////////////////////////////////////////////////

//! Demonstration CLI binary (§1 "CLI parsing is an out-of-scope external
//! collaborator"): just enough of a front end to create, open, merge, and
//! search a vault from a terminal and exercise the library end to end.

use std::io::{self, Write};
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{anyhow, Result};
use tracing::{info, Level};

use sealvault::application::use_cases::{MergeDatabasesUseCase, OpenDatabaseUseCase, SaveDatabaseUseCase, SearchEntriesUseCase};
use sealvault::infrastructure::config::VaultSettings;
use sealvault::infrastructure::io::LocalFileAdapter;
use sealvault::infrastructure::observability::ObservabilityService;
use sealvault_bootstrap::{create_platform, parse_cli, result_to_exit_code, Command, MergePolicyArg};
use sealvault_domain::entities::Database;
use sealvault_domain::repositories::IoAdapter;
use sealvault_domain::repositories::IoLocation;
use sealvault_domain::services::crypto::fill_random;
use sealvault_domain::services::{derive_composite_key, MergePolicy, SearchOptions};
use sealvault_domain::value_objects::KeySource;

#[tokio::main]
async fn main() -> std::process::ExitCode {
    let cli = parse_cli();

    tracing_subscriber::fmt()
        .with_max_level(if cli.verbose { Level::DEBUG } else { Level::INFO })
        .init();

    let settings = match VaultSettings::load(cli.config.as_deref()) {
        Ok(settings) => settings,
        Err(err) => return result_to_exit_code::<()>(Err(err)),
    };

    let adapter: Arc<dyn IoAdapter> = Arc::new(LocalFileAdapter::new());
    let observability = ObservabilityService::new(Default::default());

    let outcome = run(cli.command, adapter, observability, &settings).await;
    result_to_exit_code(outcome.map_err(|err| {
        tracing::error!("{err}");
        sealvault_domain::VaultError::IoFailure(err.to_string())
    }))
}

async fn run(
    command: Command,
    adapter: Arc<dyn IoAdapter>,
    observability: ObservabilityService,
    settings: &VaultSettings,
) -> Result<()> {
    match command {
        Command::New { path, passphrase, key_file, rounds } => {
            let sources = collect_sources(passphrase, key_file)?;

            let mut transform_seed = [0u8; 32];
            let mut master_seed = [0u8; 32];
            fill_random(&mut transform_seed);
            fill_random(&mut master_seed);
            let master_key = derive_composite_key(&sources, &transform_seed, rounds, &master_seed, None)?;

            let mut db = Database::new(master_key, rounds);
            db.compression = if settings.compression.default_gzip {
                sealvault_domain::entities::Compression::GZip
            } else {
                sealvault_domain::entities::Compression::None
            };
            db.history_max_items = settings.history.max_items;
            db.history_max_size = settings.history.max_size_bytes;
            db.maintenance_history_days = settings.history.maintenance_days;

            let save_use_case = SaveDatabaseUseCase::new(adapter, observability, settings.lock_file.enabled);
            save_use_case.execute_as(db, IoLocation::local(&path), true, sources, None).await?;
            info!("created new vault at {}", path.display());
            println!("Created new vault: {}", path.display());
            Ok(())
        }

        Command::Open { path, passphrase, key_file } => {
            let sources = collect_sources(passphrase, key_file)?;
            let open_use_case = OpenDatabaseUseCase::new(adapter, observability);
            let db = open_use_case.execute(IoLocation::local(&path), sources, None).await?;

            println!("Vault:       {}", if db.name.is_empty() { "(untitled)" } else { &db.name });
            println!("Entries:     {}", db.root.entry_count());
            println!("Rounds:      {}", db.key_transform_rounds);
            println!("Compression: {:?}", db.compression);
            Ok(())
        }

        Command::Merge { local, source, passphrase, policy } => {
            let sources = collect_sources(passphrase, None)?;

            let open_use_case = OpenDatabaseUseCase::new(Arc::clone(&adapter), observability.clone());
            let local_db = open_use_case.execute(IoLocation::local(&local), sources.clone(), None).await?;
            let source_db = open_use_case.execute(IoLocation::local(&source), sources.clone(), None).await?;

            let merge_use_case = MergeDatabasesUseCase::new(Arc::clone(&adapter), observability.clone());
            let merged = merge_use_case.execute(local_db, source_db, map_policy(policy)).await?;

            let save_use_case = SaveDatabaseUseCase::new(adapter, observability, true);
            save_use_case.execute(merged, sources, None).await?;
            println!("Merged {} into {} under {:?}", source.display(), local.display(), policy);
            Ok(())
        }

        Command::Search { path, query, passphrase } => {
            let sources = collect_sources(passphrase, None)?;
            let open_use_case = OpenDatabaseUseCase::new(Arc::clone(&adapter), observability.clone());
            let db = open_use_case.execute(IoLocation::local(&path), sources, None).await?;

            let search_use_case = SearchEntriesUseCase::new(observability);
            let results = search_use_case.execute(&db, &query, &SearchOptions::default()).await.map_err(|err| anyhow!("invalid search query: {err}"))?;
            if results.is_empty() {
                println!("No matches for {query:?}");
            } else {
                for entry in results {
                    let title = entry.get_string("Title").map(|s| s.read()).unwrap_or_default();
                    println!("{}  {}", entry.uuid, title);
                }
            }
            Ok(())
        }
    }
}

fn map_policy(policy: MergePolicyArg) -> MergePolicy {
    match policy {
        MergePolicyArg::OverwriteExisting => MergePolicy::OverwriteExisting,
        MergePolicyArg::OverwriteIfNewer => MergePolicy::OverwriteIfNewer,
        MergePolicyArg::KeepExisting => MergePolicy::KeepExisting,
        MergePolicyArg::CreateNewUuids => MergePolicy::CreateNewUuids,
        MergePolicyArg::Synchronize => MergePolicy::Synchronize,
    }
}

/// Assembles composite-key sources from CLI input: a passphrase (prompted
/// on stdin if not passed via `--passphrase`), an optional key-file, and
/// always the OS-account token (§4.1 source #3).
fn collect_sources(passphrase: Option<String>, key_file: Option<PathBuf>) -> Result<Vec<KeySource>> {
    let mut sources = Vec::new();

    let passphrase = match passphrase {
        Some(p) => p,
        None => prompt_passphrase()?,
    };
    if !passphrase.is_empty() {
        sources.push(KeySource::Passphrase(passphrase.into_bytes()));
    }

    if let Some(path) = key_file {
        let bytes = std::fs::read(&path).map_err(|err| anyhow!("failed to read key file {}: {err}", path.display()))?;
        sources.push(KeySource::KeyFile(bytes));
    }

    let platform = create_platform();
    sources.push(KeySource::OsAccountToken {
        user: platform.user_identifier(),
        machine: platform.machine_identifier(),
    });

    if sources.is_empty() {
        return Err(anyhow!("at least one composite key source is required"));
    }
    Ok(sources)
}

fn prompt_passphrase() -> Result<String> {
    print!("Passphrase: ");
    io::stdout().flush().ok();
    let mut line = String::new();
    io::stdin().read_line(&mut line)?;
    Ok(line.trim_end_matches(['\n', '\r']).to_string())
}
