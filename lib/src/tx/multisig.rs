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

use super::{PayloadTy, Signable, Signature, SignatureError};
use crate::util;

use alloc::vec::Vec;

/// Payload signed by any number of keys.
///
/// Signatures can be attached at any time, even after [`Signable::signed`] has been called.
/// They are verified only by [`MultiSig::signers`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MultiSig {
    data: Vec<u8>,
    /// List of signatures, in the order they have been attached.
    signatures: Vec<Signature>,
}

impl MultiSig {
    /// Wraps around the given payload. The payload can't be modified afterwards.
    pub fn new(data: Vec<u8>) -> Self {
        MultiSig {
            data,
            signatures: Vec::new(),
        }
    }

    /// Decodes a payload previously encoded with [`Signable::signed`].
    ///
    /// The signatures aren't verified. Use [`MultiSig::signers`] to verify them.
    pub fn load(encoded: &[u8]) -> Result<Self, SignatureError> {
        super::decode(encoded, multisig_parser).map_err(SignatureError::Decode)
    }

    /// Returns the payload. Identical to [`Signable::bytes`].
    pub fn bytes(&self) -> &[u8] {
        &self.data
    }

    /// Returns the number of signatures that have been attached, valid or not.
    pub fn num_signatures(&self) -> usize {
        self.signatures.len()
    }

    /// Verifies all the signatures, in the order they have been attached, and returns the list
    /// of public keys that have signed.
    ///
    /// Keys are returned in the order of the calls to [`Signable::sign`]. If the same key has
    /// signed multiple times, it is returned multiple times.
    ///
    /// Returns [`SignatureError::NoSignatures`] if no signature has been attached, and
    /// [`SignatureError::SignatureMismatch`] with the first signature that is invalid.
    pub fn signers(&self) -> Result<Vec<[u8; 32]>, SignatureError> {
        super::verify_all(&self.data, &self.signatures)
    }

    /// Encodes the payload and its signatures. Identical to [`Signable::signed`].
    pub fn sign_bytes(&self) -> Result<Vec<u8>, SignatureError> {
        if self.signatures.is_empty() {
            return Err(SignatureError::NoSignatures);
        }

        let mut out = Vec::with_capacity(self.data.len() + 16 + self.signatures.len() * 97);
        out.push(PayloadTy::MultiSig as u8);
        util::encode_bytes_into(&self.data, &mut out);
        out.extend_from_slice(util::encode_scale_compact_usize(self.signatures.len()).as_ref());
        for signature in &self.signatures {
            super::encode_signature_into(signature, &mut out);
        }
        Ok(out)
    }
}

impl Signable for MultiSig {
    fn bytes(&self) -> &[u8] {
        &self.data
    }

    fn sign(&mut self, public_key: &[u8], signature: &[u8]) -> Result<(), SignatureError> {
        let signature =
            Signature::from_input(public_key, signature).map_err(SignatureError::InvalidInput)?;
        self.signatures.push(signature);
        Ok(())
    }

    fn signed(&self) -> Result<Vec<u8>, SignatureError> {
        self.sign_bytes()
    }
}

fn multisig_parser(bytes: &[u8]) -> nom::IResult<&[u8], MultiSig> {
    let (bytes, data) = super::payload_parser(PayloadTy::MultiSig, bytes)?;
    let (bytes, signatures) = util::nom_list(super::signature_parser)(bytes)?;
    Ok((
        bytes,
        MultiSig {
            data: data.to_vec(),
            signatures,
        },
    ))
}
