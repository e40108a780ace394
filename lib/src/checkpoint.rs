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

//! Block headers, commits, and validators.
//!
//! A [`Checkpoint`] is a block header together with the commit that proves the finality of this
//! block. Checkpoints are produced and verified outside of this library: the only verification
//! available here is [`Checkpoint::validate_basic`], which checks that a checkpoint is
//! structurally sound and belongs to the expected chain. Whether enough voting power has signed
//! the commit is out of scope.
//!
//! All the types of this module have a canonical binary encoding, used to calculate hashes and
//! to persist seeds. See the [`crate::certifiers`] module.

use crate::util;

use alloc::{string::String, vec::Vec};
use core::fmt;

/// Header of a block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Header {
    /// Identifier of the chain the block belongs to.
    pub chain_id: String,
    /// Height of the block.
    pub height: u64,
    /// Opaque hash of the application state after the block.
    pub app_hash: Vec<u8>,
    /// Hash of the list of validators that must sign this header. See [`validators_hash`].
    pub validators_hash: [u8; 32],
}

impl Header {
    /// Returns the hash of the header, which is the hash of the block.
    pub fn hash(&self) -> [u8; 32] {
        let mut encoded = Vec::new();
        encode_header_into(self, &mut encoded);
        util::blake2_256([&encoded[..]])
    }
}

/// Signature of a validator in a [`Commit`].
#[derive(Clone, PartialEq, Eq)]
pub struct CommitSignature {
    /// Ed25519 public key of the validator.
    pub public_key: [u8; 32],
    /// Ed25519 signature of the block hash.
    pub signature: [u8; 64],
}

impl fmt::Debug for CommitSignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CommitSignature")
            .field("public_key", &hex::encode(self.public_key))
            .finish_non_exhaustive()
    }
}

/// Proof that a block has been finalized.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Commit {
    /// Height of the finalized block.
    pub height: u64,
    /// Hash of the finalized block. See [`Header::hash`].
    pub block_hash: [u8; 32],
    /// Signatures of the validators that have voted for the block.
    pub signatures: Vec<CommitSignature>,
}

/// Finalized block header and its finality proof.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Checkpoint {
    /// Header of the block. Can be `None` if the header is unknown, in which case the checkpoint
    /// is never valid.
    pub header: Option<Header>,
    /// Finality proof of the block.
    pub commit: Commit,
}

impl Checkpoint {
    /// Returns the height of the finalized block.
    pub fn height(&self) -> u64 {
        self.commit.height
    }

    /// Checks whether the checkpoint is structurally valid and belongs to the given chain.
    ///
    /// > **Note**: This doesn't verify the signatures of the commit, nor whether the validators
    /// >           that have signed hold enough voting power.
    pub fn validate_basic(&self, chain_id: &str) -> Result<(), ValidateBasicError> {
        let Some(header) = &self.header else {
            return Err(ValidateBasicError::MissingHeader);
        };

        if header.chain_id != chain_id {
            return Err(ValidateBasicError::WrongChain {
                expected: chain_id.into(),
                actual: header.chain_id.clone(),
            });
        }

        if header.height != self.commit.height {
            return Err(ValidateBasicError::HeightMismatch {
                header: header.height,
                commit: self.commit.height,
            });
        }

        if header.hash() != self.commit.block_hash {
            return Err(ValidateBasicError::BlockHashMismatch);
        }

        if self.commit.signatures.is_empty() {
            return Err(ValidateBasicError::EmptyCommit);
        }

        let mut unique = hashbrown::HashSet::with_capacity_and_hasher(
            self.commit.signatures.len(),
            fnv::FnvBuildHasher::default(),
        );
        if let Some(duplicate) = self
            .commit
            .signatures
            .iter()
            .find(|sig| !unique.insert(sig.public_key))
        {
            return Err(ValidateBasicError::DuplicateSignature(duplicate.public_key));
        }

        Ok(())
    }
}

/// Error potentially returned by [`Checkpoint::validate_basic`].
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum ValidateBasicError {
    /// Checkpoint doesn't contain any header.
    #[display("Checkpoint doesn't contain a header")]
    MissingHeader,
    /// Header belongs to a different chain.
    #[display("Checkpoint belongs to chain {actual:?} instead of {expected:?}")]
    WrongChain {
        expected: String,
        actual: String,
    },
    /// Header and commit are about different heights.
    #[display("Header height {header} doesn't match commit height {commit}")]
    HeightMismatch { header: u64, commit: u64 },
    /// Commit is about a different block than the header.
    #[display("Commit doesn't match the header hash")]
    BlockHashMismatch,
    /// Commit doesn't contain any signature.
    #[display("Commit doesn't contain any signature")]
    EmptyCommit,
    /// Same validator has signed twice.
    #[display("Validator 0x{} has signed twice", hex::encode(_0))]
    DuplicateSignature(#[error(not(source))] [u8; 32]),
}

/// Validator of the chain.
#[derive(Clone, PartialEq, Eq)]
pub struct Validator {
    /// Ed25519 public key of the validator.
    pub public_key: [u8; 32],
    /// Weight of the validator when voting.
    pub voting_power: u64,
}

impl fmt::Debug for Validator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Validator")
            .field("public_key", &hex::encode(self.public_key))
            .field("voting_power", &self.voting_power)
            .finish()
    }
}

/// Returns the hash of the given list of validators, as found in [`Header::validators_hash`].
///
/// The order of the validators matters.
pub fn validators_hash(validators: &[Validator]) -> [u8; 32] {
    let mut encoded = Vec::new();
    encode_validators_into(validators, &mut encoded);
    util::blake2_256([&encoded[..]])
}

pub(crate) fn encode_header_into(header: &Header, out: &mut Vec<u8>) {
    util::encode_bytes_into(header.chain_id.as_bytes(), out);
    out.extend_from_slice(&header.height.to_le_bytes());
    util::encode_bytes_into(&header.app_hash, out);
    out.extend_from_slice(&header.validators_hash);
}

pub(crate) fn encode_checkpoint_into(checkpoint: &Checkpoint, out: &mut Vec<u8>) {
    match &checkpoint.header {
        Some(header) => {
            out.push(1);
            encode_header_into(header, out);
        }
        None => out.push(0),
    }

    out.extend_from_slice(&checkpoint.commit.height.to_le_bytes());
    out.extend_from_slice(&checkpoint.commit.block_hash);
    out.extend_from_slice(
        util::encode_scale_compact_usize(checkpoint.commit.signatures.len()).as_ref(),
    );
    for signature in &checkpoint.commit.signatures {
        out.extend_from_slice(&signature.public_key);
        out.extend_from_slice(&signature.signature);
    }
}

pub(crate) fn encode_validators_into(validators: &[Validator], out: &mut Vec<u8>) {
    out.extend_from_slice(util::encode_scale_compact_usize(validators.len()).as_ref());
    for validator in validators {
        out.extend_from_slice(&validator.public_key);
        out.extend_from_slice(&validator.voting_power.to_le_bytes());
    }
}

// Nom parsers

pub(crate) fn checkpoint_parser(bytes: &[u8]) -> nom::IResult<&[u8], Checkpoint> {
    let (bytes, header_tag) = nom::number::streaming::u8(bytes)?;
    let (bytes, header) = match header_tag {
        0 => (bytes, None),
        1 => {
            let (bytes, header) = header_parser(bytes)?;
            (bytes, Some(header))
        }
        _ => return util::nom_verify_error(bytes),
    };

    let (bytes, height) = nom::number::streaming::le_u64(bytes)?;
    let (bytes, block_hash) = util::nom_array::<32>(bytes)?;
    let (bytes, signatures) = util::nom_list(commit_signature_parser)(bytes)?;

    Ok((
        bytes,
        Checkpoint {
            header,
            commit: Commit {
                height,
                block_hash,
                signatures,
            },
        },
    ))
}

fn header_parser(bytes: &[u8]) -> nom::IResult<&[u8], Header> {
    let (rest, chain_id) = util::nom_bytes(bytes)?;
    let Ok(chain_id) = core::str::from_utf8(chain_id) else {
        return util::nom_verify_error(bytes);
    };
    let (rest, height) = nom::number::streaming::le_u64(rest)?;
    let (rest, app_hash) = util::nom_bytes(rest)?;
    let (rest, validators_hash) = util::nom_array::<32>(rest)?;

    Ok((
        rest,
        Header {
            chain_id: chain_id.into(),
            height,
            app_hash: app_hash.to_vec(),
            validators_hash,
        },
    ))
}

fn commit_signature_parser(bytes: &[u8]) -> nom::IResult<&[u8], CommitSignature> {
    let (bytes, public_key) = util::nom_array::<32>(bytes)?;
    let (bytes, signature) = util::nom_array::<64>(bytes)?;
    Ok((
        bytes,
        CommitSignature {
            public_key,
            signature,
        },
    ))
}

pub(crate) fn validators_parser(bytes: &[u8]) -> nom::IResult<&[u8], Vec<Validator>> {
    util::nom_list(|bytes| {
        let (bytes, public_key) = util::nom_array::<32>(bytes)?;
        let (bytes, voting_power) = nom::number::streaming::le_u64(bytes)?;
        Ok((
            bytes,
            Validator {
                public_key,
                voting_power,
            },
        ))
    })(bytes)
}
