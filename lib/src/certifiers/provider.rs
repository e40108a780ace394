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

use super::{Seed, SeedDecodeError, FUTURE_HEIGHT};

use alloc::boxed::Box;

/// Store of seeds.
///
/// See the [module-level documentation](super) for the list of implementations.
pub trait Provider {
    /// Stores the given seed.
    ///
    /// Storing a seed that has already been stored succeeds and has no effect.
    fn store_seed(&mut self, seed: &Seed) -> Result<(), ProviderError>;

    /// Returns the seed with the greatest height inferior or equal to `height`.
    ///
    /// If a seed exists at exactly `height`, it is returned. Returns
    /// [`ProviderError::SeedNotFound`] if all the stored seeds are above `height`.
    ///
    /// If multiple seeds with different hashes have been stored at the same height, any of them
    /// can be returned.
    fn get_by_height(&self, height: u64) -> Result<Seed, ProviderError>;

    /// Returns a seed whose [`Seed::hash`] is exactly equal to `hash`.
    ///
    /// If multiple seeds share the same hash, any of them can be returned.
    fn get_by_hash(&self, hash: &[u8]) -> Result<Seed, ProviderError>;
}

impl<P: ?Sized + Provider> Provider for Box<P> {
    fn store_seed(&mut self, seed: &Seed) -> Result<(), ProviderError> {
        (**self).store_seed(seed)
    }

    fn get_by_height(&self, height: u64) -> Result<Seed, ProviderError> {
        (**self).get_by_height(height)
    }

    fn get_by_hash(&self, hash: &[u8]) -> Result<Seed, ProviderError> {
        (**self).get_by_hash(hash)
    }
}

impl<'a, P: ?Sized + Provider> Provider for &'a mut P {
    fn store_seed(&mut self, seed: &Seed) -> Result<(), ProviderError> {
        (**self).store_seed(seed)
    }

    fn get_by_height(&self, height: u64) -> Result<Seed, ProviderError> {
        (**self).get_by_height(height)
    }

    fn get_by_hash(&self, hash: &[u8]) -> Result<Seed, ProviderError> {
        (**self).get_by_hash(hash)
    }
}

/// Returns the most recent seed of the provider.
///
/// Equivalent to calling [`Provider::get_by_height`] with [`FUTURE_HEIGHT`].
pub fn latest_seed(provider: &(impl Provider + ?Sized)) -> Result<Seed, ProviderError> {
    provider.get_by_height(FUTURE_HEIGHT)
}

/// Error that can happen when accessing a [`Provider`].
#[derive(Debug, derive_more::Display, derive_more::Error)]
pub enum ProviderError {
    /// No seed matches the request.
    #[display("Seed not found")]
    SeedNotFound,
    /// Error in the underlying storage.
    #[display("Storage error: {_0}")]
    Storage(StorageError),
    /// Stored seed couldn't be decoded.
    #[display("{_0}")]
    Serialization(SeedDecodeError),
}

impl ProviderError {
    /// Returns `true` if this error is [`ProviderError::SeedNotFound`].
    ///
    /// This is the only situation that providers are expected to return during normal operations.
    pub fn is_seed_not_found(&self) -> bool {
        matches!(self, ProviderError::SeedNotFound)
    }
}

/// Failure of the storage behind a provider, such as an I/O error or an unreachable remote.
///
/// The cause is available through [`core::error::Error::source`].
#[derive(Debug, derive_more::Display)]
#[display("{_0}")]
pub struct StorageError(Box<dyn core::error::Error + Send + Sync>);

impl StorageError {
    /// Wraps the given error.
    pub fn new(cause: impl core::error::Error + Send + Sync + 'static) -> Self {
        StorageError(Box::new(cause))
    }
}

impl core::error::Error for StorageError {
    fn source(&self) -> Option<&(dyn core::error::Error + 'static)> {
        Some(&*self.0)
    }
}

#[cfg(feature = "std")]
impl From<std::io::Error> for StorageError {
    fn from(err: std::io::Error) -> StorageError {
        StorageError::new(err)
    }
}
