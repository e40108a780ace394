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

//! Height and hash index shared by the providers that keep track of seeds themselves.
//!
//! Entries are identified by their `(height, hash)` pair. The same hash can appear at multiple
//! heights if the validator set didn't change, and the same height can appear with multiple
//! hashes if multiple variants of the validator set exist at this height.

use alloc::{
    collections::{BTreeMap, BTreeSet},
    vec::Vec,
};

#[derive(Debug)]
pub(super) struct SeedIndex<T> {
    /// Entries sorted by height, then by hash.
    by_height: BTreeMap<u64, BTreeMap<Vec<u8>, T>>,
    /// For each hash, the heights where an entry with that hash exists.
    by_hash: hashbrown::HashMap<Vec<u8>, BTreeSet<u64>, fnv::FnvBuildHasher>,
}

impl<T> SeedIndex<T> {
    pub(super) fn new() -> Self {
        SeedIndex {
            by_height: BTreeMap::new(),
            by_hash: hashbrown::HashMap::with_hasher(Default::default()),
        }
    }

    /// Inserts a new entry.
    ///
    /// Returns `false` and leaves the index untouched if an entry with the same height and hash
    /// already exists.
    pub(super) fn insert(&mut self, height: u64, hash: &[u8], value: T) -> bool {
        let at_height = self.by_height.entry(height).or_default();
        if at_height.contains_key(hash) {
            return false;
        }

        at_height.insert(hash.to_vec(), value);
        self.by_hash.entry(hash.to_vec()).or_default().insert(height);
        true
    }

    /// Returns the entry with the greatest height inferior or equal to `height`.
    ///
    /// If multiple entries share this height, the one with the lowest hash is returned.
    pub(super) fn at_or_below(&self, height: u64) -> Option<(u64, &[u8], &T)> {
        let (height, entries) = self.by_height.range(..=height).next_back()?;
        let (hash, value) = entries.iter().next()?;
        Some((*height, &hash[..], value))
    }

    /// Returns the entry with the given hash and the greatest height.
    pub(super) fn highest_with_hash(&self, hash: &[u8]) -> Option<(u64, &T)> {
        let height = *self.by_hash.get(hash)?.last()?;
        let value = self.by_height.get(&height)?.get(hash)?;
        Some((height, value))
    }

    /// Returns all the entries, by ascending height.
    pub(super) fn iter(&self) -> impl Iterator<Item = (u64, &[u8], &T)> {
        self.by_height.iter().flat_map(|(height, entries)| {
            entries
                .iter()
                .map(move |(hash, value)| (*height, &hash[..], value))
        })
    }

    /// Returns the number of entries.
    pub(super) fn len(&self) -> usize {
        self.by_height.values().map(|entries| entries.len()).sum()
    }
}
