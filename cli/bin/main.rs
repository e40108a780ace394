// Smoldot
// Copyright (C) 2019-2022  Parity Technologies (UK) Ltd.
// SPDX-License-Identifier: GPL-3.0-or-later WITH Classpath-exception-2.0

// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.

// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU General Public License for more details.

// You should have received a copy of the GNU General Public License
// along with this program.  If not, see <http://www.gnu.org/licenses/>.

#![deny(rustdoc::broken_intra_doc_links)]

use light_certifier::{
    certifiers::{self, file, Provider as _},
    checkpoint::ValidateBasicError,
    log::{LogCallback, LogLevel},
    tx,
};
use std::{
    fs, io,
    path::{Path, PathBuf},
    process,
    sync::Arc,
    time::{SystemTime, UNIX_EPOCH},
};

mod cli;

fn main() {
    let cli_options = <cli::CliOptions as clap::Parser>::parse();
    let log_callback = build_log_callback(&cli_options);

    let result = match cli_options.command {
        cli::CliOptionsCommand::Latest(opt) => latest(opt, &log_callback),
        cli::CliOptionsCommand::Get(opt) => get(opt, &log_callback),
        cli::CliOptionsCommand::List(opt) => list(opt),
        cli::CliOptionsCommand::Import(opt) => import(opt, &log_callback),
        cli::CliOptionsCommand::Signers(opt) => signers(opt),
    };

    if let Err(err) = result {
        log_callback.log(LogLevel::Error, format!("command-failed; error={err}"));
        eprintln!("Error: {err}");
        process::exit(1);
    }
}

/// Error that makes a command fail.
#[derive(Debug, derive_more::Display, derive_more::Error)]
enum CommandError {
    #[display("Failed to open {}: {error}", path.display())]
    Open {
        path: PathBuf,
        error: certifiers::StorageError,
    },
    #[display("Failed to read {}: {error}", path.display())]
    Read { path: PathBuf, error: io::Error },
    #[display("Failed to load seed {}: {error}", path.display())]
    LoadSeed {
        path: PathBuf,
        error: certifiers::ProviderError,
    },
    #[display("Invalid seed {}: {error}", path.display())]
    InvalidSeed {
        path: PathBuf,
        error: ValidateBasicError,
    },
    #[display("{_0}")]
    Provider(certifiers::ProviderError),
    #[display("{_0}")]
    Signature(tx::SignatureError),
}

fn latest(
    options: cli::CliOptionsLatest,
    log_callback: &Arc<dyn LogCallback + Send + Sync>,
) -> Result<(), CommandError> {
    let chain = open_chain(&options.path, log_callback)?;
    let seed = certifiers::latest_seed(&chain).map_err(CommandError::Provider)?;
    print_seed(&seed);
    Ok(())
}

fn get(
    options: cli::CliOptionsGet,
    log_callback: &Arc<dyn LogCallback + Send + Sync>,
) -> Result<(), CommandError> {
    let chain = open_chain(&options.path, log_callback)?;
    let seed = match (options.height, options.hash) {
        (Some(height), _) => chain.get_by_height(height),
        (None, Some(hash)) => chain.get_by_hash(&hash.0),
        // Enforced by `clap`.
        (None, None) => unreachable!(),
    }
    .map_err(CommandError::Provider)?;
    print_seed(&seed);
    Ok(())
}

fn list(options: cli::CliOptionsList) -> Result<(), CommandError> {
    let provider = open_directory(&options.path)?;
    for seed in provider.seeds().map_err(CommandError::Provider)? {
        print_seed(&seed);
    }
    Ok(())
}

fn import(
    options: cli::CliOptionsImport,
    log_callback: &Arc<dyn LogCallback + Send + Sync>,
) -> Result<(), CommandError> {
    let mut provider = open_directory(&options.path)?;

    // All the seeds are verified before anything is stored.
    let mut seeds = Vec::with_capacity(options.files.len());
    for path in options.files {
        let seed = certifiers::Seed::load(&path).map_err(|error| CommandError::LoadSeed {
            path: path.clone(),
            error,
        })?;
        if let Err(error) = seed.validate_basic(&options.chain_id) {
            return Err(CommandError::InvalidSeed { path, error });
        }
        seeds.push(seed);
    }

    for seed in &seeds {
        provider.store_seed(seed).map_err(CommandError::Provider)?;
        log_callback.log(
            LogLevel::Info,
            format!(
                "seed-imported; height={}; hash=0x{}",
                seed.height(),
                hex::encode(seed.hash())
            ),
        );
    }

    Ok(())
}

fn signers(options: cli::CliOptionsSigners) -> Result<(), CommandError> {
    let encoded = fs::read(&options.file).map_err(|error| CommandError::Read {
        path: options.file.clone(),
        error,
    })?;
    let multisig = tx::MultiSig::load(&encoded).map_err(CommandError::Signature)?;
    for public_key in multisig.signers().map_err(CommandError::Signature)? {
        println!("0x{}", hex::encode(public_key));
    }
    Ok(())
}

fn open_directory(path: &Path) -> Result<file::FileProvider, CommandError> {
    file::open(file::Config { path }).map_err(|error| CommandError::Open {
        path: path.to_owned(),
        error,
    })
}

/// Opens all the given directories and chains them, closest first.
fn open_chain(
    paths: &[PathBuf],
    log_callback: &Arc<dyn LogCallback + Send + Sync>,
) -> Result<certifiers::CacheProvider, CommandError> {
    let mut chain = certifiers::CacheProvider::new(Vec::with_capacity(paths.len()))
        .with_log_callback(log_callback.clone());
    for path in paths {
        let provider = open_directory(path)?;
        log_callback.log(
            LogLevel::Debug,
            format!(
                "directory-opened; path={}; seeds={}",
                path.display(),
                provider.len()
            ),
        );
        chain.push(Box::new(provider));
    }
    Ok(chain)
}

fn print_seed(seed: &certifiers::Seed) {
    let chain_id = seed
        .checkpoint
        .header
        .as_ref()
        .map_or("?", |header| header.chain_id.as_str());
    println!(
        "#{} 0x{} chain={} validators={}",
        seed.height(),
        hex::encode(seed.hash()),
        chain_id,
        seed.validators.len()
    );
}

/// Turns the CLI options into the callback that prints logs.
fn build_log_callback(cli_options: &cli::CliOptions) -> Arc<dyn LogCallback + Send + Sync> {
    let log_level = cli_options
        .log_level
        .clone()
        .unwrap_or(cli::LogLevel::Warn);

    match cli_options.output {
        cli::Output::None => Arc::new(|_: LogLevel, _: String| {}),
        cli::Output::Auto | cli::Output::Logs => {
            let color_choice = cli_options.color.clone();
            Arc::new(move |level: LogLevel, message: String| {
                if !log_level.allows(level) {
                    return;
                }

                let when = humantime::format_rfc3339_millis(SystemTime::now());

                let level_str = match (level, &color_choice) {
                    (_, cli::ColorChoice::Never) => level.to_string(),
                    (LogLevel::Trace, cli::ColorChoice::Always) => "\x1b[36mtrace\x1b[0m".into(),
                    (LogLevel::Debug, cli::ColorChoice::Always) => "\x1b[34mdebug\x1b[0m".into(),
                    (LogLevel::Info, cli::ColorChoice::Always) => "\x1b[32minfo\x1b[0m".into(),
                    (LogLevel::Warn, cli::ColorChoice::Always) => "\x1b[33;1mwarn\x1b[0m".into(),
                    (LogLevel::Error, cli::ColorChoice::Always) => {
                        "\x1b[31;1merror\x1b[0m".into()
                    }
                };

                eprintln!("[{}] [{}] {}", when, level_str, message);
            })
        }
        cli::Output::LogsJson => Arc::new(move |level: LogLevel, message: String| {
            if !log_level.allows(level) {
                return;
            }

            #[derive(serde::Serialize)]
            struct Record {
                timestamp: u128,
                level: String,
                message: String,
            }

            let mut lock = io::stderr().lock();
            if serde_json::to_writer(
                &mut lock,
                &Record {
                    timestamp: SystemTime::now()
                        .duration_since(UNIX_EPOCH)
                        .map(|d| d.as_millis())
                        .unwrap_or(0),
                    level: level.to_string(),
                    message,
                },
            )
            .is_ok()
            {
                let _ = io::Write::write_all(&mut lock, b"\n");
            }
        }),
    }
}
