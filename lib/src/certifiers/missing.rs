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

use super::{Provider, ProviderError, Seed};

/// Provider that doesn't store anything and never finds anything.
///
/// Useful as the last element of a [`super::CacheProvider`], or in tests.
#[derive(Debug, Default, Copy, Clone)]
pub struct MissingProvider;

impl MissingProvider {
    /// Builds a new [`MissingProvider`].
    pub fn new() -> Self {
        MissingProvider
    }
}

impl Provider for MissingProvider {
    fn store_seed(&mut self, _: &Seed) -> Result<(), ProviderError> {
        Ok(())
    }

    fn get_by_height(&self, _: u64) -> Result<Seed, ProviderError> {
        Err(ProviderError::SeedNotFound)
    }

    fn get_by_hash(&self, _: &[u8]) -> Result<Seed, ProviderError> {
        Err(ProviderError::SeedNotFound)
    }
}
