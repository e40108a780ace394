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

use super::{index::SeedIndex, Provider, ProviderError, Seed, Seeds};

use core::fmt;

/// Provider that keeps seeds in memory.
///
/// Seeds are kept until the provider is dropped.
pub struct MemoryProvider {
    seeds: SeedIndex<Seed>,
}

impl MemoryProvider {
    /// Builds a new empty [`MemoryProvider`].
    pub fn new() -> Self {
        MemoryProvider {
            seeds: SeedIndex::new(),
        }
    }

    /// Returns the number of seeds that have been stored.
    pub fn len(&self) -> usize {
        self.seeds.len()
    }

    /// Returns `true` if no seed has been stored.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns a copy of all the seeds, by ascending height.
    pub fn seeds(&self) -> Seeds {
        self.seeds.iter().map(|(_, _, seed)| seed.clone()).collect()
    }
}

impl Default for MemoryProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for MemoryProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list()
            .entries(
                self.seeds
                    .iter()
                    .map(|(height, hash, _)| (height, hex::encode(hash))),
            )
            .finish()
    }
}

impl Provider for MemoryProvider {
    fn store_seed(&mut self, seed: &Seed) -> Result<(), ProviderError> {
        let _ = self.seeds.insert(seed.height(), seed.hash(), seed.clone());
        Ok(())
    }

    fn get_by_height(&self, height: u64) -> Result<Seed, ProviderError> {
        self.seeds
            .at_or_below(height)
            .map(|(_, _, seed)| seed.clone())
            .ok_or(ProviderError::SeedNotFound)
    }

    fn get_by_hash(&self, hash: &[u8]) -> Result<Seed, ProviderError> {
        self.seeds
            .highest_with_hash(hash)
            .map(|(_, seed)| seed.clone())
            .ok_or(ProviderError::SeedNotFound)
    }
}

#[cfg(test)]
mod tests {
    use super::MemoryProvider;
    use crate::{
        certifiers::{Provider as _, FUTURE_HEIGHT},
        test_utils::ValidatorKeys,
    };

    #[test]
    fn get_by_height_rounds_down() {
        let keys = ValidatorKeys::generate(3, 0);
        let validators = keys.to_validators(10);
        let mut provider = MemoryProvider::new();

        for height in (20..=110).step_by(10) {
            provider
                .store_seed(&keys.gen_seed("test-chain", height, &validators, b""))
                .unwrap();
        }
        assert_eq!(provider.len(), 10);

        assert_eq!(provider.get_by_height(20).unwrap().height(), 20);
        assert_eq!(provider.get_by_height(47).unwrap().height(), 40);
        assert_eq!(provider.get_by_height(5000).unwrap().height(), 110);
        assert_eq!(provider.get_by_height(FUTURE_HEIGHT).unwrap().height(), 110);
        assert!(provider.get_by_height(19).unwrap_err().is_seed_not_found());
    }

    #[test]
    fn height_zero_is_found() {
        let keys = ValidatorKeys::generate(1, 1);
        let seed = keys.gen_seed("test-chain", 0, &keys.to_validators(1), b"");
        let mut provider = MemoryProvider::new();
        provider.store_seed(&seed).unwrap();
        assert_eq!(provider.get_by_height(0).unwrap(), seed);
    }

    #[test]
    fn get_by_hash_returns_highest() {
        let keys = ValidatorKeys::generate(2, 2);
        let validators = keys.to_validators(10);
        let other_keys = ValidatorKeys::generate(2, 3);
        let other_validators = other_keys.to_validators(10);

        let mut provider = MemoryProvider::new();
        for height in [10, 30, 20] {
            provider
                .store_seed(&keys.gen_seed("test-chain", height, &validators, b""))
                .unwrap();
        }
        let other = other_keys.gen_seed("test-chain", 40, &other_validators, b"");
        provider.store_seed(&other).unwrap();

        let found = provider.get_by_hash(other.hash()).unwrap();
        assert_eq!(found, other);

        let seed = provider.get_by_height(30).unwrap();
        assert_eq!(provider.get_by_hash(seed.hash()).unwrap().height(), 30);

        assert!(provider
            .get_by_hash(&[0; 32])
            .unwrap_err()
            .is_seed_not_found());
    }

    #[test]
    fn store_is_idempotent() {
        let keys = ValidatorKeys::generate(2, 4);
        let seed = keys.gen_seed("test-chain", 10, &keys.to_validators(1), b"");
        let mut provider = MemoryProvider::new();

        provider.store_seed(&seed).unwrap();
        provider.store_seed(&seed).unwrap();
        assert_eq!(provider.len(), 1);
        assert_eq!(provider.seeds().into_vec(), vec![seed]);
    }

    #[test]
    fn same_height_different_hashes() {
        let keys_a = ValidatorKeys::generate(2, 5);
        let keys_b = ValidatorKeys::generate(2, 6);
        let a = keys_a.gen_seed("test-chain", 10, &keys_a.to_validators(1), b"");
        let b = keys_b.gen_seed("test-chain", 10, &keys_b.to_validators(1), b"");

        let mut provider = MemoryProvider::new();
        provider.store_seed(&a).unwrap();
        provider.store_seed(&b).unwrap();
        assert_eq!(provider.len(), 2);

        assert_eq!(provider.get_by_hash(a.hash()).unwrap(), a);
        assert_eq!(provider.get_by_hash(b.hash()).unwrap(), b);

        let expected = if a.hash() < b.hash() { &a } else { &b };
        assert_eq!(&provider.get_by_height(10).unwrap(), expected);
    }
}
