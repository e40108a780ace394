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

//! Chain of providers.
//!
//! A [`CacheProvider`] holds an ordered list of providers, typically fast local stores first
//! and slow or remote sources last, and presents them as a single [`Provider`].
//!
//! # Reads
//!
//! [`Provider::get_by_height`] queries the providers one by one and keeps the seed with the
//! greatest height seen so far. The scan stops as soon as a provider returns a seed at exactly
//! the requested height. If any provider has returned a usable seed, this seed is returned and
//! the errors returned by the other providers are ignored, so that a degraded remote source
//! never hides a seed that is available locally. If no provider has returned anything, the
//! error of the last provider is returned.
//!
//! [`Provider::get_by_hash`] returns the first seed found. Hashes match exactly, and as such
//! the results of multiple providers are never merged.
//!
//! Errors that are ignored are reported through the optional [`LogCallback`] at the
//! [`LogLevel::Debug`] level.
//!
//! # Writes
//!
//! [`Provider::store_seed`] stores the seed in each provider in order, and stops at the first
//! failure. The providers that come after the failing one are never attempted.

use super::{Provider, ProviderError, Seed};
use crate::log::{LogCallback, LogLevel};

use alloc::{boxed::Box, format, sync::Arc, vec::Vec};
use core::fmt;

mod tests;

/// Provider that combines multiple other providers.
///
/// See the [module-level documentation](self).
pub struct CacheProvider {
    /// List of providers, from the closest to the furthest.
    providers: Vec<Box<dyn Provider + Send>>,
    /// Where to report the errors that are ignored.
    log_callback: Option<Arc<dyn LogCallback + Send + Sync>>,
}

impl CacheProvider {
    /// Builds a new [`CacheProvider`] from the given list of providers, from the closest to the
    /// furthest.
    ///
    /// The list can be empty, in which case nothing is ever found.
    pub fn new(providers: Vec<Box<dyn Provider + Send>>) -> Self {
        CacheProvider {
            providers,
            log_callback: None,
        }
    }

    /// Sets the callback where ignored errors are reported.
    pub fn with_log_callback(mut self, log_callback: Arc<dyn LogCallback + Send + Sync>) -> Self {
        self.log_callback = Some(log_callback);
        self
    }

    /// Adds a provider at the end of the list.
    pub fn push(&mut self, provider: Box<dyn Provider + Send>) {
        self.providers.push(provider);
    }

    /// Returns the number of providers in the chain.
    pub fn len(&self) -> usize {
        self.providers.len()
    }

    /// Returns `true` if the chain doesn't contain any provider.
    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }

    fn log_ignored(&self, operation: &str, ignored: &[(usize, ProviderError)]) {
        let Some(log_callback) = &self.log_callback else {
            return;
        };

        for (index, error) in ignored {
            if error.is_seed_not_found() {
                continue;
            }

            log_callback.log(
                LogLevel::Debug,
                format!("cache-provider-error-ignored; operation={operation}; provider={index}; error={error}"),
            );
        }
    }
}

impl fmt::Debug for CacheProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CacheProvider")
            .field("providers", &self.providers.len())
            .finish_non_exhaustive()
    }
}

impl Provider for CacheProvider {
    fn store_seed(&mut self, seed: &Seed) -> Result<(), ProviderError> {
        for provider in &mut self.providers {
            provider.store_seed(seed)?;
        }

        Ok(())
    }

    fn get_by_height(&self, height: u64) -> Result<Seed, ProviderError> {
        let mut best: Option<Seed> = None;
        let mut errors = Vec::new();

        for (index, provider) in self.providers.iter().enumerate() {
            let seed = match provider.get_by_height(height) {
                Ok(seed) => seed,
                Err(err) => {
                    errors.push((index, err));
                    continue;
                }
            };

            // A provider that returns a seed above the requested height is broken. Its answer
            // can't be trusted.
            if seed.height() > height {
                if let Some(log_callback) = &self.log_callback {
                    log_callback.log(
                        LogLevel::Warn,
                        format!(
                            "cache-provider-seed-above-height; provider={index}; requested={height}; returned={}",
                            seed.height()
                        ),
                    );
                }
                continue;
            }

            let exact_match = seed.height() == height;
            if best.as_ref().is_none_or(|best| seed.height() > best.height()) {
                best = Some(seed);
            }
            if exact_match {
                break;
            }
        }

        match best {
            Some(seed) => {
                self.log_ignored("get-by-height", &errors);
                Ok(seed)
            }
            None => Err(errors
                .pop()
                .map_or(ProviderError::SeedNotFound, |(_, err)| err)),
        }
    }

    fn get_by_hash(&self, hash: &[u8]) -> Result<Seed, ProviderError> {
        let mut errors = Vec::new();

        for (index, provider) in self.providers.iter().enumerate() {
            match provider.get_by_hash(hash) {
                Ok(seed) => {
                    self.log_ignored("get-by-hash", &errors);
                    return Ok(seed);
                }
                Err(err) => errors.push((index, err)),
            }
        }

        Err(errors
            .pop()
            .map_or(ProviderError::SeedNotFound, |(_, err)| err))
    }
}
