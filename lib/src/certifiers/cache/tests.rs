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

#![cfg(test)]

use super::CacheProvider;
use crate::{
    certifiers::{
        latest_seed, MemoryProvider, MissingProvider, Provider, ProviderError, Seed, StorageError,
    },
    log::LogLevel,
    test_utils::ValidatorKeys,
};

use alloc::sync::Arc;
use core::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

#[derive(Debug, derive_more::Display, derive_more::Error)]
#[display("remote unreachable")]
struct Unreachable;

/// Provider whose storage is always failing.
struct UnreachableProvider;

impl Provider for UnreachableProvider {
    fn store_seed(&mut self, _: &Seed) -> Result<(), ProviderError> {
        Err(ProviderError::Storage(StorageError::new(Unreachable)))
    }

    fn get_by_height(&self, _: u64) -> Result<Seed, ProviderError> {
        Err(ProviderError::Storage(StorageError::new(Unreachable)))
    }

    fn get_by_hash(&self, _: &[u8]) -> Result<Seed, ProviderError> {
        Err(ProviderError::Storage(StorageError::new(Unreachable)))
    }
}

/// Wraps around a provider and counts the number of times it is accessed.
struct Probe<P> {
    inner: P,
    accesses: Arc<AtomicUsize>,
}

impl<P> Probe<P> {
    fn new(inner: P) -> (Self, Arc<AtomicUsize>) {
        let accesses = Arc::new(AtomicUsize::new(0));
        let probe = Probe {
            inner,
            accesses: accesses.clone(),
        };
        (probe, accesses)
    }
}

impl<P: Provider> Provider for Probe<P> {
    fn store_seed(&mut self, seed: &Seed) -> Result<(), ProviderError> {
        self.accesses.fetch_add(1, Ordering::SeqCst);
        self.inner.store_seed(seed)
    }

    fn get_by_height(&self, height: u64) -> Result<Seed, ProviderError> {
        self.accesses.fetch_add(1, Ordering::SeqCst);
        self.inner.get_by_height(height)
    }

    fn get_by_hash(&self, hash: &[u8]) -> Result<Seed, ProviderError> {
        self.accesses.fetch_add(1, Ordering::SeqCst);
        self.inner.get_by_hash(hash)
    }
}

/// Provider that ignores the requested height and always returns the same seed.
struct BrokenProvider(Seed);

impl Provider for BrokenProvider {
    fn store_seed(&mut self, _: &Seed) -> Result<(), ProviderError> {
        Ok(())
    }

    fn get_by_height(&self, _: u64) -> Result<Seed, ProviderError> {
        Ok(self.0.clone())
    }

    fn get_by_hash(&self, _: &[u8]) -> Result<Seed, ProviderError> {
        Ok(self.0.clone())
    }
}

fn memory_with(seeds: &[&Seed]) -> MemoryProvider {
    let mut provider = MemoryProvider::new();
    for seed in seeds {
        provider.store_seed(seed).unwrap();
    }
    provider
}

#[test]
fn partial_match_not_hidden_by_later_provider() {
    let keys = ValidatorKeys::generate(3, 0);
    let validators = keys.to_validators(10);
    let seed20 = keys.gen_seed("test-chain", 20, &validators, b"");
    let seed30 = keys.gen_seed("test-chain", 30, &validators, b"");

    let cache = CacheProvider::new(vec![
        Box::new(memory_with(&[&seed20])),
        Box::new(memory_with(&[&seed30])),
    ]);
    assert_eq!(cache.get_by_height(25).unwrap(), seed20);
    assert_eq!(cache.get_by_height(30).unwrap(), seed30);
    assert_eq!(latest_seed(&cache).unwrap(), seed30);
    assert!(cache.get_by_height(19).unwrap_err().is_seed_not_found());

    let cache = CacheProvider::new(vec![
        Box::new(memory_with(&[&seed20])),
        Box::new(UnreachableProvider),
    ]);
    assert_eq!(cache.get_by_height(25).unwrap(), seed20);
}

#[test]
fn best_match_across_providers() {
    let keys = ValidatorKeys::generate(2, 1);
    let validators = keys.to_validators(10);
    let seed20 = keys.gen_seed("test-chain", 20, &validators, b"");
    let seed40 = keys.gen_seed("test-chain", 40, &validators, b"");
    let seed60 = keys.gen_seed("test-chain", 60, &validators, b"");

    let cache = CacheProvider::new(vec![
        Box::new(memory_with(&[&seed20, &seed60])),
        Box::new(UnreachableProvider),
        Box::new(memory_with(&[&seed40])),
    ]);
    assert_eq!(cache.get_by_height(45).unwrap(), seed40);
    assert_eq!(cache.get_by_height(59).unwrap(), seed40);
    assert_eq!(cache.get_by_height(1000).unwrap(), seed60);
}

#[test]
fn exact_match_stops_the_scan() {
    let keys = ValidatorKeys::generate(2, 2);
    let validators = keys.to_validators(10);
    let seed20 = keys.gen_seed("test-chain", 20, &validators, b"");
    let seed30 = keys.gen_seed("test-chain", 30, &validators, b"");

    let (probe, accesses) = Probe::new(memory_with(&[&seed30]));
    let cache = CacheProvider::new(vec![Box::new(memory_with(&[&seed20])), Box::new(probe)]);

    assert_eq!(cache.get_by_height(20).unwrap(), seed20);
    assert_eq!(accesses.load(Ordering::SeqCst), 0);

    assert_eq!(cache.get_by_height(25).unwrap(), seed20);
    assert_eq!(accesses.load(Ordering::SeqCst), 1);
}

#[test]
fn height_zero_is_a_match() {
    let keys = ValidatorKeys::generate(1, 3);
    let genesis = keys.gen_seed("test-chain", 0, &keys.to_validators(1), b"");

    let cache = CacheProvider::new(vec![
        Box::new(memory_with(&[&genesis])),
        Box::new(UnreachableProvider),
    ]);
    assert_eq!(cache.get_by_height(0).unwrap(), genesis);
    assert_eq!(latest_seed(&cache).unwrap(), genesis);
}

#[test]
fn last_error_surfaces_when_nothing_found() {
    let cache = CacheProvider::new(vec![
        Box::new(MemoryProvider::new()),
        Box::new(UnreachableProvider),
    ]);
    assert!(matches!(
        cache.get_by_height(10),
        Err(ProviderError::Storage(_))
    ));
    assert!(matches!(
        cache.get_by_hash(&[0; 32]),
        Err(ProviderError::Storage(_))
    ));

    let cache = CacheProvider::new(vec![
        Box::new(UnreachableProvider),
        Box::new(MissingProvider::new()),
    ]);
    assert!(cache.get_by_height(10).unwrap_err().is_seed_not_found());
    assert!(cache.get_by_hash(&[0; 32]).unwrap_err().is_seed_not_found());
}

#[test]
fn ignored_errors_are_logged() {
    let keys = ValidatorKeys::generate(1, 4);
    let seed = keys.gen_seed("test-chain", 20, &keys.to_validators(1), b"");

    let logs = Arc::new(Mutex::new(Vec::new()));
    let cache = CacheProvider::new(vec![
        Box::new(UnreachableProvider),
        Box::new(MissingProvider::new()),
        Box::new(memory_with(&[&seed])),
    ])
    .with_log_callback({
        let logs = logs.clone();
        Arc::new(move |level: LogLevel, message: String| {
            logs.lock().unwrap().push((level, message))
        })
    });

    assert_eq!(cache.get_by_height(25).unwrap(), seed);
    assert_eq!(cache.get_by_hash(seed.hash()).unwrap(), seed);

    let logs = logs.lock().unwrap();
    assert_eq!(logs.len(), 2);
    assert!(logs.iter().all(|(level, _)| *level == LogLevel::Debug));
    assert!(logs[0]
        .1
        .starts_with("cache-provider-error-ignored; operation=get-by-height; provider=0"));
    assert!(logs[1]
        .1
        .starts_with("cache-provider-error-ignored; operation=get-by-hash; provider=0"));
}

#[test]
fn store_stops_at_first_failure() {
    let keys = ValidatorKeys::generate(2, 5);
    let seed = keys.gen_seed("test-chain", 20, &keys.to_validators(1), b"");

    let (first, first_accesses) = Probe::new(MemoryProvider::new());
    let (last, last_accesses) = Probe::new(MemoryProvider::new());
    let mut cache = CacheProvider::new(vec![
        Box::new(first),
        Box::new(UnreachableProvider),
        Box::new(last),
    ]);

    assert!(matches!(
        cache.store_seed(&seed),
        Err(ProviderError::Storage(_))
    ));
    assert_eq!(first_accesses.load(Ordering::SeqCst), 1);
    assert_eq!(last_accesses.load(Ordering::SeqCst), 0);

    // The seed has reached the first provider anyway.
    assert_eq!(cache.get_by_height(20).unwrap(), seed);
}

#[test]
fn store_reaches_every_provider() {
    let keys = ValidatorKeys::generate(2, 6);
    let seed = keys.gen_seed("test-chain", 20, &keys.to_validators(1), b"");

    let (first, first_accesses) = Probe::new(MemoryProvider::new());
    let (last, last_accesses) = Probe::new(MemoryProvider::new());
    let mut cache = CacheProvider::new(vec![Box::new(first), Box::new(last)]);
    cache.store_seed(&seed).unwrap();
    cache.store_seed(&seed).unwrap();
    assert_eq!(first_accesses.load(Ordering::SeqCst), 2);
    assert_eq!(last_accesses.load(Ordering::SeqCst), 2);

    assert_eq!(cache.get_by_height(20).unwrap(), seed);
    assert_eq!(cache.get_by_hash(seed.hash()).unwrap(), seed);
}

#[test]
fn get_by_hash_first_success() {
    let keys_a = ValidatorKeys::generate(2, 7);
    let keys_b = ValidatorKeys::generate(2, 8);
    let a = keys_a.gen_seed("test-chain", 20, &keys_a.to_validators(1), b"");
    let b = keys_b.gen_seed("test-chain", 30, &keys_b.to_validators(1), b"");

    let (probe, accesses) = Probe::new(memory_with(&[&b]));
    let cache = CacheProvider::new(vec![Box::new(memory_with(&[&a])), Box::new(probe)]);

    assert_eq!(cache.get_by_hash(a.hash()).unwrap(), a);
    assert_eq!(accesses.load(Ordering::SeqCst), 0);

    assert_eq!(cache.get_by_hash(b.hash()).unwrap(), b);
    assert_eq!(accesses.load(Ordering::SeqCst), 1);

    assert!(cache.get_by_hash(&[0; 32]).unwrap_err().is_seed_not_found());
}

#[test]
fn empty_chain() {
    let keys = ValidatorKeys::generate(1, 9);
    let seed = keys.gen_seed("test-chain", 20, &keys.to_validators(1), b"");

    let mut cache = CacheProvider::new(Vec::new());
    assert!(cache.is_empty());
    cache.store_seed(&seed).unwrap();
    assert!(latest_seed(&cache).unwrap_err().is_seed_not_found());
    assert!(cache.get_by_hash(seed.hash()).unwrap_err().is_seed_not_found());

    cache.push(Box::new(MemoryProvider::new()));
    assert_eq!(cache.len(), 1);
    cache.store_seed(&seed).unwrap();
    assert_eq!(latest_seed(&cache).unwrap(), seed);
}

#[test]
fn seed_above_requested_height_ignored() {
    let keys = ValidatorKeys::generate(1, 10);
    let validators = keys.to_validators(1);
    let seed20 = keys.gen_seed("test-chain", 20, &validators, b"");
    let seed90 = keys.gen_seed("test-chain", 90, &validators, b"");

    let cache = CacheProvider::new(vec![
        Box::new(BrokenProvider(seed90)),
        Box::new(memory_with(&[&seed20])),
    ]);
    assert_eq!(cache.get_by_height(50).unwrap(), seed20);
    assert!(cache.get_by_height(10).unwrap_err().is_seed_not_found());
}
