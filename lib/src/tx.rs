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

//! Payloads signed by one or more keys before being submitted to the chain.
//!
//! A [`Signable`] wraps around an immutable payload. The owners of the keys sign
//! [`Signable::bytes`] by whatever means they want, then attach the signature with
//! [`Signable::sign`]. Once enough signatures have been attached, [`Signable::signed`] returns
//! the bytes to send to the chain.
//!
//! Signatures aren't verified when they are attached, but only when the list of signers is
//! requested, with [`MultiSig::signers`] or [`OneSig::signers`].
//!
//! Only Ed25519 keys are supported.
//!
//! # Example
//!
//! ```
//! use light_certifier::tx::{MultiSig, Signable as _};
//!
//! let key = ed25519_zebra::SigningKey::from([7; 32]);
//! let public_key = <[u8; 32]>::from(ed25519_zebra::VerificationKey::from(&key));
//!
//! let mut tx = MultiSig::new(b"transfer 10 tokens".to_vec());
//! let signature = key.sign(tx.bytes()).to_bytes();
//! tx.sign(&public_key, &signature).unwrap();
//!
//! assert_eq!(tx.signers().unwrap(), vec![public_key]);
//!
//! // The signed transaction can be sent and decoded on the other side.
//! let encoded = tx.signed().unwrap();
//! assert_eq!(MultiSig::load(&encoded).unwrap().signers().unwrap(), vec![public_key]);
//! ```

use crate::util;

use alloc::vec::Vec;

pub use multisig::MultiSig;
pub use onesig::OneSig;

mod multisig;
mod onesig;

/// Payload that can be signed and then sent to the chain.
pub trait Signable {
    /// Returns the payload, which is what must be signed.
    fn bytes(&self) -> &[u8];

    /// Attaches a signature of [`Signable::bytes`] by the given public key.
    ///
    /// The signature isn't verified. An error is returned only if the public key or signature
    /// is malformed, or if the payload doesn't accept any more signature.
    fn sign(&mut self, public_key: &[u8], signature: &[u8]) -> Result<(), SignatureError>;

    /// Returns the bytes ready to be sent to the chain.
    ///
    /// Returns an error if [`Signable::sign`] has never been called.
    fn signed(&self) -> Result<Vec<u8>, SignatureError>;
}

/// Error that can happen when signing a payload or verifying its signatures.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum SignatureError {
    /// Public key or signature passed to [`Signable::sign`] is malformed.
    #[display("Invalid input: {_0}")]
    InvalidInput(InvalidInputError),
    /// Payload only accepts one signature and has already been signed.
    #[display("Already signed")]
    AlreadySigned,
    /// Payload has never been signed.
    #[display("Never signed")]
    NoSignatures,
    /// Signature doesn't match the payload and the public key it has been attached with.
    #[display("Signature {index} doesn't match (key: 0x{})", hex::encode(public_key))]
    SignatureMismatch {
        /// Index of the signature, in the order [`Signable::sign`] has been called.
        index: usize,
        /// Public key attached to the signature.
        public_key: [u8; 32],
    },
    /// Failed to decode a signed payload.
    #[display("{_0}")]
    Decode(DecodeError),
}

/// Malformed public key or signature.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum InvalidInputError {
    /// Public key is empty.
    #[display("Public key is missing")]
    MissingPublicKey,
    /// Signature is empty.
    #[display("Signature is missing")]
    MissingSignature,
    /// Public key isn't 32 bytes.
    #[display("Public key has a length of {_0} instead of 32")]
    PublicKeyLength(#[error(not(source))] usize),
    /// Signature isn't 64 bytes.
    #[display("Signature has a length of {_0} instead of 64")]
    SignatureLength(#[error(not(source))] usize),
}

/// Failed to decode a signed payload.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
#[display("Failed to decode signed payload: {_0:?}")]
pub struct DecodeError(#[error(not(source))] nom::error::ErrorKind);

/// Public key and signature attached to a payload.
#[derive(Clone, PartialEq, Eq)]
struct Signature {
    public_key: [u8; 32],
    signature: [u8; 64],
}

impl core::fmt::Debug for Signature {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_tuple("Signature")
            .field(&hex::encode(self.public_key))
            .finish()
    }
}

impl Signature {
    /// Builds a [`Signature`] from what has been passed to [`Signable::sign`].
    fn from_input(public_key: &[u8], signature: &[u8]) -> Result<Self, InvalidInputError> {
        if public_key.is_empty() {
            return Err(InvalidInputError::MissingPublicKey);
        }
        if signature.is_empty() {
            return Err(InvalidInputError::MissingSignature);
        }

        Ok(Signature {
            public_key: <[u8; 32]>::try_from(public_key)
                .map_err(|_| InvalidInputError::PublicKeyLength(public_key.len()))?,
            signature: <[u8; 64]>::try_from(signature)
                .map_err(|_| InvalidInputError::SignatureLength(signature.len()))?,
        })
    }

    /// Returns `true` if the signature is valid for the given message.
    fn verify(&self, message: &[u8]) -> bool {
        let Ok(public_key) = ed25519_zebra::VerificationKey::try_from(self.public_key) else {
            return false;
        };

        public_key
            .verify(&ed25519_zebra::Signature::from(self.signature), message)
            .is_ok()
    }
}

/// Verifies all the signatures in order, and returns the list of public keys.
fn verify_all(message: &[u8], signatures: &[Signature]) -> Result<Vec<[u8; 32]>, SignatureError> {
    if signatures.is_empty() {
        return Err(SignatureError::NoSignatures);
    }

    signatures
        .iter()
        .enumerate()
        .map(|(index, signature)| {
            if signature.verify(message) {
                Ok(signature.public_key)
            } else {
                Err(SignatureError::SignatureMismatch {
                    index,
                    public_key: signature.public_key,
                })
            }
        })
        .collect()
}

/// Type of the signed payload, found in the first byte of the encoding.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
enum PayloadTy {
    MultiSig = 1,
    OneSig = 2,
}

/// Type of the keys, found in front of each signature.
const KEY_TY_ED25519: u8 = 1;

fn encode_signature_into(signature: &Signature, out: &mut Vec<u8>) {
    out.push(KEY_TY_ED25519);
    out.extend_from_slice(&signature.public_key);
    out.extend_from_slice(&signature.signature);
}

fn signature_parser(bytes: &[u8]) -> nom::IResult<&[u8], Signature> {
    let (bytes, key_ty) = nom::number::streaming::u8(bytes)?;
    if key_ty != KEY_TY_ED25519 {
        return util::nom_verify_error(bytes);
    }

    let (bytes, public_key) = util::nom_array::<32>(bytes)?;
    let (bytes, signature) = util::nom_array::<64>(bytes)?;
    Ok((
        bytes,
        Signature {
            public_key,
            signature,
        },
    ))
}

/// Decodes the type of payload and the payload itself.
fn payload_parser(expected_ty: PayloadTy, bytes: &[u8]) -> nom::IResult<&[u8], &[u8]> {
    let (bytes, ty) = nom::number::streaming::u8(bytes)?;
    if ty != expected_ty as u8 {
        return util::nom_verify_error(bytes);
    }
    util::nom_bytes(bytes)
}

/// Decodes a signed payload with the given parser, which must consume the entire input.
fn decode<'a, T>(
    bytes: &'a [u8],
    parser: impl FnMut(&'a [u8]) -> nom::IResult<&'a [u8], T>,
) -> Result<T, DecodeError> {
    use nom::Finish as _;

    match nom::Parser::parse(
        &mut nom::combinator::all_consuming::<_, nom::error::Error<&[u8]>, _>(
            nom::combinator::complete(parser),
        ),
        bytes,
    )
    .finish()
    {
        Ok((_, decoded)) => Ok(decoded),
        Err(err) => Err(DecodeError(err.code)),
    }
}

#[cfg(test)]
mod tests {
    use super::{InvalidInputError, Signature};

    #[test]
    fn input_checks() {
        assert_eq!(
            Signature::from_input(&[], &[1; 64]),
            Err(InvalidInputError::MissingPublicKey)
        );
        assert_eq!(
            Signature::from_input(&[1; 32], &[]),
            Err(InvalidInputError::MissingSignature)
        );
        assert_eq!(
            Signature::from_input(&[1; 33], &[1; 64]),
            Err(InvalidInputError::PublicKeyLength(33))
        );
        assert_eq!(
            Signature::from_input(&[1; 32], &[1; 63]),
            Err(InvalidInputError::SignatureLength(63))
        );
        assert!(Signature::from_input(&[1; 32], &[1; 64]).is_ok());
    }

    #[test]
    fn verify_checks_message() {
        let key = ed25519_zebra::SigningKey::from([3; 32]);
        let signature = Signature {
            public_key: <[u8; 32]>::from(ed25519_zebra::VerificationKey::from(&key)),
            signature: key.sign(b"hello").to_bytes(),
        };
        assert!(signature.verify(b"hello"));
        assert!(!signature.verify(b"hellO"));
    }
}
