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

//! Miscellaneous helpers used by the encoding code of the crate.

use alloc::vec::Vec;

mod scale;

pub(crate) use scale::{encode_scale_compact_usize, nom_scale_compact_usize};

/// Returns the 256 bits BLAKE2b hash of the concatenation of the given slices.
pub(crate) fn blake2_256<'a>(data: impl IntoIterator<Item = &'a [u8]>) -> [u8; 32] {
    let mut hasher = blake2_rfc::blake2b::Blake2b::new(32);
    for chunk in data {
        hasher.update(chunk);
    }
    *<&[u8; 32]>::try_from(hasher.finalize().as_bytes()).unwrap_or_else(|_| unreachable!())
}

/// Appends to `out` the given bytes prefixed with their SCALE-compact length.
pub(crate) fn encode_bytes_into(bytes: &[u8], out: &mut Vec<u8>) {
    out.extend_from_slice(encode_scale_compact_usize(bytes.len()).as_ref());
    out.extend_from_slice(bytes);
}

/// Decodes a fixed-size array of bytes.
pub(crate) fn nom_array<const N: usize>(bytes: &[u8]) -> nom::IResult<&[u8], [u8; N]> {
    let (rest, slice) = nom::bytes::streaming::take(N)(bytes)?;
    Ok((
        rest,
        <[u8; N]>::try_from(slice).unwrap_or_else(|_| unreachable!()),
    ))
}

/// Decodes bytes prefixed with their SCALE-compact length. Counterpart of [`encode_bytes_into`].
pub(crate) fn nom_bytes(bytes: &[u8]) -> nom::IResult<&[u8], &[u8]> {
    let (rest, len) = nom_scale_compact_usize(bytes)?;
    nom::bytes::streaming::take(len)(rest)
}

/// Decodes a list whose number of elements is SCALE-compact-encoded, then each element using
/// `element`.
pub(crate) fn nom_list<'a, T>(
    mut element: impl FnMut(&'a [u8]) -> nom::IResult<&'a [u8], T>,
) -> impl FnMut(&'a [u8]) -> nom::IResult<&'a [u8], Vec<T>> {
    move |bytes| {
        let (mut bytes, num_elems) = nom_scale_compact_usize(bytes)?;

        // The number of elements comes from untrusted input. Don't pre-allocate more than what
        // the input could possibly contain.
        let mut out = Vec::with_capacity(core::cmp::min(num_elems, bytes.len()));
        for _ in 0..num_elems {
            let (rest, elem) = element(bytes)?;
            bytes = rest;
            out.push(elem);
        }

        Ok((bytes, out))
    }
}

/// Returns the error to report when some decoded value is invalid.
pub(crate) fn nom_verify_error<T>(bytes: &[u8]) -> nom::IResult<&[u8], T> {
    Err(nom::Err::Failure(nom::error::make_error(
        bytes,
        nom::error::ErrorKind::Verify,
    )))
}
