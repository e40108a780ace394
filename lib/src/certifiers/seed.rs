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

#[cfg(feature = "std")]
use super::ProviderError;
use crate::checkpoint::{self, Checkpoint, ValidateBasicError, Validator};

use alloc::vec::Vec;
use nom::Finish as _;

/// Height that is guaranteed to be above the height of any stored seed.
///
/// Pass this value to [`super::Provider::get_by_height`] in order to obtain the most recent seed.
/// See also [`super::latest_seed`].
pub const FUTURE_HEIGHT: u64 = u64::MAX - 5;

/// Checkpoint and the validator set in effect at the height of that checkpoint.
///
/// This is the information necessary to verify the blocks that follow the checkpoint, as long
/// as the validator set doesn't change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Seed {
    /// Finalized block that the seed is about.
    pub checkpoint: Checkpoint,
    /// Validators in effect at the height of [`Seed::checkpoint`]. Never interpreted by this
    /// library.
    pub validators: Vec<Validator>,
}

impl Seed {
    /// Returns the height of the checkpoint.
    pub fn height(&self) -> u64 {
        self.checkpoint.height()
    }

    /// Returns the hash of the validator set, as found in the header of the checkpoint.
    ///
    /// Returns an empty slice if the header is missing.
    ///
    /// Multiple seeds can have the same hash if the validator set didn't change between them.
    /// Two seeds at the same height with different hashes are variants of the validator set.
    pub fn hash(&self) -> &[u8] {
        match &self.checkpoint.header {
            Some(header) => &header.validators_hash[..],
            None => &[],
        }
    }

    /// Checks whether the checkpoint is structurally valid and belongs to the given chain.
    ///
    /// See [`Checkpoint::validate_basic`].
    pub fn validate_basic(&self, chain_id: &str) -> Result<(), ValidateBasicError> {
        self.checkpoint.validate_basic(chain_id)
    }

    /// Writes the seed to a file at the given path.
    ///
    /// Seeds never change once written. If a file already exists at this location, this function
    /// does nothing and returns `Ok`.
    ///
    /// > **Note**: If the process crashes in the middle of the write, the file might contain a
    /// >           truncated seed, in which case [`Seed::load`] later returns
    /// >           [`ProviderError::Serialization`].
    #[cfg(feature = "std")]
    pub fn write(&self, path: &std::path::Path) -> Result<(), ProviderError> {
        use std::io::Write as _;

        let mut file = match std::fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(path)
        {
            Ok(f) => f,
            Err(err) if err.kind() == std::io::ErrorKind::AlreadyExists => return Ok(()),
            Err(err) => return Err(ProviderError::Storage(err.into())),
        };

        if let Err(err) = file
            .write_all(&encode_seed(self))
            .and_then(|()| file.sync_data())
        {
            // Don't leave a half-written seed behind, as it would prevent any later write.
            drop(file);
            let _ = std::fs::remove_file(path);
            return Err(ProviderError::Storage(err.into()));
        }

        Ok(())
    }

    /// Loads a seed previously written with [`Seed::write`].
    ///
    /// Returns [`ProviderError::SeedNotFound`] if there is no file at this location.
    #[cfg(feature = "std")]
    pub fn load(path: &std::path::Path) -> Result<Seed, ProviderError> {
        let encoded = match std::fs::read(path) {
            Ok(encoded) => encoded,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                return Err(ProviderError::SeedNotFound)
            }
            Err(err) => return Err(ProviderError::Storage(err.into())),
        };

        decode_seed(&encoded).map_err(ProviderError::Serialization)
    }
}

/// List of seeds.
#[derive(Debug, Clone, Default, PartialEq, Eq, derive_more::Deref, derive_more::DerefMut)]
pub struct Seeds(Vec<Seed>);

impl Seeds {
    /// Sorts the seeds by ascending height.
    ///
    /// The sort is stable: seeds with the same height keep their relative order.
    pub fn sort_by_height(&mut self) {
        self.0.sort_by_key(|seed| seed.height());
    }

    /// Returns the underlying list.
    pub fn into_vec(self) -> Vec<Seed> {
        self.0
    }
}

impl From<Vec<Seed>> for Seeds {
    fn from(seeds: Vec<Seed>) -> Seeds {
        Seeds(seeds)
    }
}

impl FromIterator<Seed> for Seeds {
    fn from_iter<T: IntoIterator<Item = Seed>>(iter: T) -> Self {
        Seeds(iter.into_iter().collect())
    }
}

impl IntoIterator for Seeds {
    type Item = Seed;
    type IntoIter = alloc::vec::IntoIter<Seed>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a Seeds {
    type Item = &'a Seed;
    type IntoIter = core::slice::Iter<'a, Seed>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// Encodes a seed into bytes. Use [`decode_seed`] to turn it back into a [`Seed`].
///
/// The encoding is deterministic.
pub fn encode_seed(seed: &Seed) -> Vec<u8> {
    let mut out = Vec::new();
    checkpoint::encode_checkpoint_into(&seed.checkpoint, &mut out);
    checkpoint::encode_validators_into(&seed.validators, &mut out);
    out
}

/// Decodes a seed previously encoded with [`encode_seed`].
pub fn decode_seed(encoded: &[u8]) -> Result<Seed, SeedDecodeError> {
    match nom::Parser::parse(
        &mut nom::combinator::all_consuming::<_, nom::error::Error<&[u8]>, _>(
            nom::combinator::complete(seed_parser),
        ),
        encoded,
    )
    .finish()
    {
        Ok((_, seed)) => Ok(seed),
        Err(err) => Err(SeedDecodeError(err.code)),
    }
}

/// Error potentially returned by [`decode_seed`].
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
#[display("Failed to decode seed: {_0:?}")]
pub struct SeedDecodeError(#[error(not(source))] nom::error::ErrorKind);

fn seed_parser(bytes: &[u8]) -> nom::IResult<&[u8], Seed> {
    let (bytes, checkpoint) = checkpoint::checkpoint_parser(bytes)?;
    let (bytes, validators) = checkpoint::validators_parser(bytes)?;
    Ok((
        bytes,
        Seed {
            checkpoint,
            validators,
        },
    ))
}
