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

//! Seeds stored in a directory of the file system.
//!
//! Each seed is stored in its own file, named after the height and the hash of the seed. At
//! initialization, the list of files is read in order to build an in-memory index of the seeds,
//! after which only the files of the seeds that are requested are read.
//!
//! Use [`open()`] to open a directory, which is created if it doesn't exist yet.
//!
//! Seeds never change once written. Multiple [`FileProvider`]s can be opened on the same
//! directory, but seeds stored by one aren't visible to the others until they are re-opened.
//!
//! # Example
//!
//! ```no_run
//! use light_certifier::certifiers::{file, latest_seed};
//! use std::path::Path;
//!
//! let provider = file::open(file::Config {
//!     path: Path::new("/tmp/seeds"),
//! })
//! .unwrap();
//!
//! match latest_seed(&provider) {
//!     Ok(seed) => println!("latest seed at #{}", seed.height()),
//!     Err(err) if err.is_seed_not_found() => println!("no seed yet"),
//!     Err(err) => panic!("{err}"),
//! }
//! ```

use super::{index::SeedIndex, Provider, ProviderError, Seed, Seeds, StorageError};

use std::path::{Path, PathBuf};

pub use open::{open, Config};

mod open;

/// Extension of the files containing seeds.
const EXTENSION: &str = "seed";

/// Provider that persists seeds in a directory.
///
/// See the [module-level documentation](self).
#[derive(Debug)]
pub struct FileProvider {
    /// Directory containing the seeds.
    directory: PathBuf,
    /// Height and hash of every seed found in the directory. Values are unused.
    index: SeedIndex<()>,
}

impl FileProvider {
    /// Returns the directory the seeds are stored in.
    pub fn path(&self) -> &Path {
        &self.directory
    }

    /// Returns the number of seeds in the directory.
    pub fn len(&self) -> usize {
        self.index.len()
    }

    /// Returns `true` if the directory doesn't contain any seed.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Loads all the seeds of the directory, by ascending height.
    pub fn seeds(&self) -> Result<Seeds, ProviderError> {
        let mut seeds = self
            .index
            .iter()
            .map(|(height, hash, _)| self.load(height, hash))
            .collect::<Result<Seeds, _>>()?;
        seeds.sort_by_height();
        Ok(seeds)
    }

    fn seed_path(&self, height: u64, hash: &[u8]) -> PathBuf {
        self.directory.join(file_name(height, hash))
    }

    /// Loads the seed indexed under the given height and hash.
    ///
    /// The content of the file must match its name.
    fn load(&self, height: u64, hash: &[u8]) -> Result<Seed, ProviderError> {
        let path = self.seed_path(height, hash);
        let seed = Seed::load(&path)?;
        if seed.height() != height || seed.hash() != hash {
            return Err(ProviderError::Storage(StorageError::new(
                SeedFileMismatchError { path },
            )));
        }
        Ok(seed)
    }
}

impl Provider for FileProvider {
    fn store_seed(&mut self, seed: &Seed) -> Result<(), ProviderError> {
        let (height, hash) = (seed.height(), seed.hash());
        seed.write(&self.seed_path(height, hash))?;
        let _ = self.index.insert(height, hash, ());
        Ok(())
    }

    fn get_by_height(&self, height: u64) -> Result<Seed, ProviderError> {
        let (height, hash, _) = self
            .index
            .at_or_below(height)
            .ok_or(ProviderError::SeedNotFound)?;
        self.load(height, hash)
    }

    fn get_by_hash(&self, hash: &[u8]) -> Result<Seed, ProviderError> {
        let (height, _) = self
            .index
            .highest_with_hash(hash)
            .ok_or(ProviderError::SeedNotFound)?;
        self.load(height, hash)
    }
}

/// File whose content is a seed other than the one its name designates.
#[derive(Debug, derive_more::Display, derive_more::Error)]
#[display("Seed in {} doesn't match the file name", path.display())]
pub struct SeedFileMismatchError {
    #[error(not(source))]
    path: PathBuf,
}

/// Returns the name of the file containing the seed with the given height and hash.
///
/// Heights are zero-padded so that the files sort by height.
fn file_name(height: u64, hash: &[u8]) -> String {
    format!("{height:020}-{}.{EXTENSION}", hex::encode(hash))
}

/// Opposite of [`file_name`]. Returns `None` if the file name wasn't generated by
/// [`file_name`].
fn parse_file_name(name: &str) -> Option<(u64, Vec<u8>)> {
    let (height, hash) = name
        .strip_suffix(EXTENSION)?
        .strip_suffix('.')?
        .split_once('-')?;

    if height.len() != 20 || !height.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }

    let height = height.parse::<u64>().ok()?;
    let hash = hex::decode(hash).ok()?;

    // Rejects for example upper-case hexadecimal.
    if file_name(height, &hash) != name {
        return None;
    }

    Some((height, hash))
}
