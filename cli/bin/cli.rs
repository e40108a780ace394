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

//! Provides the [`CliOptions`] struct that contains all the CLI options that can be passed to the
//! binary.
//!
//! See the documentation of the [`clap`] crate in order to learn more.

use std::{io, path::PathBuf};

// Note: the doc-comments applied to this struct and its field are visible when the binary is
// started with `--help`.

#[derive(Debug, clap::Parser)]
#[command(about, author, version, long_about = None)]
#[command(propagate_version = true)]
pub struct CliOptions {
    /// Output to stderr: auto, none, logs, logs-json.
    #[arg(long, global = true, default_value = "auto")]
    pub output: Output,
    /// Level of logging: off, error, warn, info, debug, trace.
    #[arg(long, global = true)]
    pub log_level: Option<LogLevel>,
    /// Coloring: auto, always, never
    #[arg(long, global = true, default_value = "auto")]
    pub color: ColorChoice,
    #[command(subcommand)]
    pub command: CliOptionsCommand,
}

#[derive(Debug, clap::Subcommand)]
pub enum CliOptionsCommand {
    /// Prints the most recent seed found in the given directories.
    #[command(name = "latest")]
    Latest(CliOptionsLatest),
    /// Prints the seed at or below a certain height, or with a certain hash.
    #[command(name = "get")]
    Get(CliOptionsGet),
    /// Prints all the seeds of a directory, by ascending height.
    #[command(name = "list")]
    List(CliOptionsList),
    /// Verifies seed files and copies them into a directory.
    #[command(name = "import")]
    Import(CliOptionsImport),
    /// Verifies the signatures of a multi-signed payload and prints the public keys of the signers.
    #[command(name = "signers")]
    Signers(CliOptionsSigners),
}

#[derive(Debug, clap::Parser)]
pub struct CliOptionsLatest {
    /// Directory containing seeds. Can be passed multiple times, closest directory first.
    #[arg(long, required = true)]
    pub path: Vec<PathBuf>,
}

#[derive(Debug, clap::Parser)]
pub struct CliOptionsGet {
    /// Directory containing seeds. Can be passed multiple times, closest directory first.
    #[arg(long, required = true)]
    pub path: Vec<PathBuf>,
    /// Height to search for. The seed with the greatest height inferior or equal is returned.
    #[arg(long, conflicts_with = "hash", required_unless_present = "hash")]
    pub height: Option<u64>,
    /// Hexadecimal hash of the validator set to search for.
    #[arg(long, value_parser = decode_hash)]
    pub hash: Option<Hash>,
}

#[derive(Debug, clap::Parser)]
pub struct CliOptionsList {
    /// Directory containing seeds.
    #[arg(long)]
    pub path: PathBuf,
}

#[derive(Debug, clap::Parser)]
pub struct CliOptionsImport {
    /// Directory where to store the seeds. Created if it doesn't exist.
    #[arg(long)]
    pub path: PathBuf,
    /// Identifier of the chain the seeds must belong to.
    #[arg(long)]
    pub chain_id: String,
    /// Files containing the seeds to import.
    #[arg(required = true)]
    pub files: Vec<PathBuf>,
}

#[derive(Debug, clap::Parser)]
pub struct CliOptionsSigners {
    /// File containing the multi-signed payload.
    pub file: PathBuf,
}

#[derive(Debug, Clone)]
pub enum ColorChoice {
    Always,
    Never,
}

impl core::str::FromStr for ColorChoice {
    type Err = ColorChoiceParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == "always" {
            Ok(ColorChoice::Always)
        } else if s == "auto" {
            if io::IsTerminal::is_terminal(&io::stderr()) {
                Ok(ColorChoice::Always)
            } else {
                Ok(ColorChoice::Never)
            }
        } else if s == "never" {
            Ok(ColorChoice::Never)
        } else {
            Err(ColorChoiceParseError)
        }
    }
}

#[derive(Debug, derive_more::Display, derive_more::Error)]
#[display("Color must be one of: always, auto, never")]
pub struct ColorChoiceParseError;

#[derive(Debug, Clone)]
pub enum LogLevel {
    Off,
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    /// Returns `true` if messages of the given level must be printed.
    pub fn allows(&self, level: light_certifier::log::LogLevel) -> bool {
        use light_certifier::log::LogLevel as L;

        let max = match self {
            LogLevel::Off => return false,
            LogLevel::Error => L::Error,
            LogLevel::Warn => L::Warn,
            LogLevel::Info => L::Info,
            LogLevel::Debug => L::Debug,
            LogLevel::Trace => L::Trace,
        };

        level <= max
    }
}

impl core::str::FromStr for LogLevel {
    type Err = LogLevelParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("off") {
            Ok(LogLevel::Off)
        } else if s.eq_ignore_ascii_case("error") {
            Ok(LogLevel::Error)
        } else if s.eq_ignore_ascii_case("warn") {
            Ok(LogLevel::Warn)
        } else if s.eq_ignore_ascii_case("info") {
            Ok(LogLevel::Info)
        } else if s.eq_ignore_ascii_case("debug") {
            Ok(LogLevel::Debug)
        } else if s.eq_ignore_ascii_case("trace") {
            Ok(LogLevel::Trace)
        } else {
            Err(LogLevelParseError)
        }
    }
}

#[derive(Debug, derive_more::Display, derive_more::Error)]
#[display("Log level must be one of: off, error, warn, info, debug, trace")]
pub struct LogLevelParseError;

#[derive(Debug, Clone, clap::ValueEnum)]
pub enum Output {
    Auto,
    None,
    Logs,
    LogsJson,
}

#[derive(Debug, Clone)]
pub struct Hash(pub Vec<u8>);

// `clap` requires error types to implement the `std::error::Error` trait.
// For this reason, we locally define some wrappers.
fn decode_hash(string: &str) -> Result<Hash, String> {
    let string = string.strip_prefix("0x").unwrap_or(string);
    hex::decode(string)
        .map(Hash)
        .map_err(|err| format!("Failed to decode hash: {err}"))
}
