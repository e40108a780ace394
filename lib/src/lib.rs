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

//! Trusted checkpoint storage and multi-signature collection for light clients.
//!
//! A light client doesn't replay the history of the chain. Instead, it starts from a checkpoint
//! that it trusts, called a *seed*, and rolls this trust forward as the validator set of the
//! chain rotates. A seed is a finalized block header and its commit, plus the validator set that
//! is in effect at the height of that header.
//!
//! # Overview
//!
//! - The [`checkpoint`] module contains the block header, commit, and validator definitions.
//! - The [`certifiers`] module contains the [`certifiers::Seed`] type and the
//!   [`certifiers::Provider`] trait, which abstracts over a store of seeds. Several providers are
//!   available: a null object, an in-memory store, a filesystem-backed store (requires the `std`
//!   feature), and a provider that chains multiple other providers together.
//! - The [`tx`] module contains [`tx::MultiSig`], a payload co-signed by multiple keys whose
//!   signatures are verified only when the list of signers is requested.
//!
//! # Example
//!
//! ```
//! use light_certifier::certifiers::{self, Provider as _};
//!
//! let mut chain = certifiers::CacheProvider::new(vec![
//!     Box::new(certifiers::MemoryProvider::new()),
//!     Box::new(certifiers::MissingProvider::new()),
//! ]);
//!
//! // Nothing has been stored yet.
//! let err = certifiers::latest_seed(&chain).unwrap_err();
//! assert!(err.is_seed_not_found());
//! # let _ = &mut chain;
//! ```
//!
//! # About errors handling
//!
//! Nothing in this library panics on invalid input. All failures are reported through the
//! `Result` returned by each function, and the "not found" situation can be detected with
//! [`certifiers::ProviderError::is_seed_not_found`] without matching on the error.
//!
//! # About logging
//!
//! This library never prints anything. Components that have something to report accept a
//! [`log::LogCallback`].

#![cfg_attr(not(any(test, feature = "std")), no_std)]
#![forbid(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]
// TODO: the `unused_crate_dependencies` lint is disabled because of dev-dependencies, see <https://github.com/rust-lang/rust/issues/95513>
// #![deny(unused_crate_dependencies)]

extern crate alloc;

pub mod certifiers;
pub mod checkpoint;
pub mod log;
pub mod tx;

mod util;

#[cfg(test)]
mod test_utils;
