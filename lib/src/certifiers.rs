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
//! Storage of trusted checkpoints.
//!
//! A light client that wants to verify a block at a certain height needs to know the validator
//! set in effect at that height. It obtains this validator set by starting from a [`Seed`] it
//! already trusts, below that height, and rolling forward.
//!
//! Seeds are stored in and retrieved from a [`Provider`]. Several implementations are available:
//!
//! - [`MissingProvider`] doesn't store anything and never finds anything.
//! - [`MemoryProvider`] keeps seeds in memory.
//! - [`FileProvider`] persists seeds in a directory of the file system (requires the `std`
//!   feature).
//! - [`CacheProvider`] chains multiple other providers. It is typically used to put a fast local
//!   store in front of a slower remote source.
//!
//! # Safety of the providers
//!
//! A provider doesn't verify anything. Seeds must be validated before being passed to
//! [`Provider::store_seed`]. In return, providers guarantee that they never return a seed that
//! wasn't stored, and that [`Provider::get_by_height`] never returns a seed above the requested
//! height.

pub use cache::CacheProvider;
#[cfg(feature = "std")]
pub use file::FileProvider;
pub use memory::MemoryProvider;
pub use missing::MissingProvider;
pub use provider::{latest_seed, Provider, ProviderError, StorageError};
pub use seed::{decode_seed, encode_seed, Seed, SeedDecodeError, Seeds, FUTURE_HEIGHT};

pub mod cache;
#[cfg(feature = "std")]
pub mod file;

mod index;
mod memory;
mod missing;
mod provider;
mod seed;
