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

/// Payload signed by exactly one key.
///
/// Similar to [`super::MultiSig`], except that [`Signable::sign`] can only be called once.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OneSig {
    data: Vec<u8>,
    signature: Option<Signature>,
}

impl OneSig {
    /// Wraps around the given payload. The payload can't be modified afterwards.
    pub fn new(data: Vec<u8>) -> Self {
        OneSig {
            data,
            signature: None,
        }
    }

    /// Decodes a payload previously encoded with [`Signable::signed`].
    ///
    /// The signature isn't verified. Use [`OneSig::signers`] to verify it.
    pub fn load(encoded: &[u8]) -> Result<Self, SignatureError> {
        super::decode(encoded, onesig_parser).map_err(SignatureError::Decode)
    }

    /// Verifies the signature, and returns the public key that has signed in a list of one
    /// element.
    pub fn signers(&self) -> Result<Vec<[u8; 32]>, SignatureError> {
        super::verify_all(&self.data, self.signature.as_slice())
    }
}

impl Signable for OneSig {
    fn bytes(&self) -> &[u8] {
        &self.data
    }

    fn sign(&mut self, public_key: &[u8], signature: &[u8]) -> Result<(), SignatureError> {
        let signature =
            Signature::from_input(public_key, signature).map_err(SignatureError::InvalidInput)?;
        if self.signature.is_some() {
            return Err(SignatureError::AlreadySigned);
        }
        self.signature = Some(signature);
        Ok(())
    }

    fn signed(&self) -> Result<Vec<u8>, SignatureError> {
        let signature = self
            .signature
            .as_ref()
            .ok_or(SignatureError::NoSignatures)?;

        let mut out = Vec::with_capacity(self.data.len() + 106);
        out.push(PayloadTy::OneSig as u8);
        util::encode_bytes_into(&self.data, &mut out);
        super::encode_signature_into(signature, &mut out);
        Ok(out)
    }
}

fn onesig_parser(bytes: &[u8]) -> nom::IResult<&[u8], OneSig> {
    let (bytes, data) = super::payload_parser(PayloadTy::OneSig, bytes)?;
    let (bytes, signature) = super::signature_parser(bytes)?;
    Ok((
        bytes,
        OneSig {
            data: data.to_vec(),
            signature: Some(signature),
        },
    ))
}
