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

//! Helpers shared by the tests of this crate.

#![cfg(test)]

use crate::{
    certifiers::Seed,
    checkpoint::{self, Checkpoint, Commit, CommitSignature, Header, Validator},
};

use rand::{RngCore as _, SeedableRng as _};

/// Deterministic list of validator keys.
pub(crate) struct ValidatorKeys(pub(crate) Vec<ed25519_zebra::SigningKey>);

impl ValidatorKeys {
    /// Generates `num` keys. The same `seed` always produces the same keys.
    pub(crate) fn generate(num: usize, seed: u64) -> Self {
        let mut rng = rand_chacha::ChaCha20Rng::seed_from_u64(seed);
        ValidatorKeys(
            (0..num)
                .map(|_| {
                    let mut secret = [0; 32];
                    rng.fill_bytes(&mut secret);
                    ed25519_zebra::SigningKey::from(secret)
                })
                .collect(),
        )
    }

    /// Returns the public key of the given signing key.
    pub(crate) fn public_key(key: &ed25519_zebra::SigningKey) -> [u8; 32] {
        <[u8; 32]>::from(ed25519_zebra::VerificationKey::from(key))
    }

    /// Turns the keys into a validator set where everyone has the same voting power.
    pub(crate) fn to_validators(&self, voting_power: u64) -> Vec<Validator> {
        self.0
            .iter()
            .map(|key| Validator {
                public_key: Self::public_key(key),
                voting_power,
            })
            .collect()
    }

    /// Builds a valid checkpoint at the given height, signed by all the keys.
    pub(crate) fn gen_checkpoint(
        &self,
        chain_id: &str,
        height: u64,
        validators: &[Validator],
        app_hash: &[u8],
    ) -> Checkpoint {
        let header = Header {
            chain_id: chain_id.into(),
            height,
            app_hash: app_hash.to_vec(),
            validators_hash: checkpoint::validators_hash(validators),
        };

        let block_hash = header.hash();
        let signatures = self
            .0
            .iter()
            .map(|key| CommitSignature {
                public_key: Self::public_key(key),
                signature: key.sign(&block_hash).to_bytes(),
            })
            .collect();

        Checkpoint {
            header: Some(header),
            commit: Commit {
                height,
                block_hash,
                signatures,
            },
        }
    }

    /// Builds a valid seed at the given height, signed by all the keys.
    pub(crate) fn gen_seed(
        &self,
        chain_id: &str,
        height: u64,
        validators: &[Validator],
        app_hash: &[u8],
    ) -> Seed {
        Seed {
            checkpoint: self.gen_checkpoint(chain_id, height, validators, app_hash),
            validators: validators.to_vec(),
        }
    }
}
