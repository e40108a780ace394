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

//! SCALE compact integers.
//!
//! The length of every variable-sized item in the encoding of seeds and signatures is prefixed
//! with its compact encoding. Small values take a single byte, while values that don't fit in
//! 30 bits use a prefix byte followed with the minimal number of little endian bytes.
//!
//! Only the canonical (shortest) encoding of a value is accepted when decoding, which guarantees
//! that decoding then re-encoding produces the same bytes.
//!
//! See <https://docs.substrate.io/reference/scale-codec/>.

/// Returns the SCALE-compact encoding of the given number.
pub(crate) fn encode_scale_compact_u64(value: u64) -> arrayvec::ArrayVec<u8, 9> {
    let mut out = arrayvec::ArrayVec::new();

    if value < (1 << 6) {
        out.push(u8::try_from(value << 2).unwrap_or_else(|_| unreachable!()));
    } else if value < (1 << 14) {
        let encoded = u16::try_from(value << 2 | 0b01).unwrap_or_else(|_| unreachable!());
        out.extend(encoded.to_le_bytes());
    } else if value < (1 << 30) {
        let encoded = u32::try_from(value << 2 | 0b10).unwrap_or_else(|_| unreachable!());
        out.extend(encoded.to_le_bytes());
    } else {
        // Values in this range always have at least 4 significant bytes.
        let num_bytes = 8 - usize::try_from(value.leading_zeros() / 8).unwrap();
        debug_assert!((4..=8).contains(&num_bytes));
        out.push(u8::try_from((num_bytes - 4) << 2).unwrap() | 0b11);
        out.extend(value.to_le_bytes().into_iter().take(num_bytes));
    }

    out
}

/// Returns the SCALE-compact encoding of the given `usize`.
///
/// See also [`encode_scale_compact_u64`].
pub(crate) fn encode_scale_compact_usize(value: usize) -> arrayvec::ArrayVec<u8, 9> {
    #[cfg(not(any(
        target_pointer_width = "16",
        target_pointer_width = "32",
        target_pointer_width = "64"
    )))]
    compile_error!("usize must be <= u64");
    encode_scale_compact_u64(u64::try_from(value).unwrap())
}

/// Decodes a SCALE-compact-encoded `usize`.
///
/// > **Note**: When using this function outside of a `nom` "context", you might have to explicit
/// >           the type of `E`. Use `nom::error::Error<&[u8]>`.
pub(crate) fn nom_scale_compact_usize<'a, E: nom::error::ParseError<&'a [u8]>>(
    bytes: &'a [u8],
) -> nom::IResult<&'a [u8], usize, E> {
    let (rest, value) = nom_scale_compact_u64(bytes)?;

    let value = match usize::try_from(value) {
        Ok(v) => v,
        Err(_) => {
            return Err(nom::Err::Error(nom::error::make_error(
                bytes,
                nom::error::ErrorKind::LengthValue,
            )));
        }
    };

    Ok((rest, value))
}

/// Decodes a SCALE-compact-encoded `u64`.
///
/// > **Note**: When using this function outside of a `nom` "context", you might have to explicit
/// >           the type of `E`. Use `nom::error::Error<&[u8]>`.
pub(crate) fn nom_scale_compact_u64<'a, E: nom::error::ParseError<&'a [u8]>>(
    bytes: &'a [u8],
) -> nom::IResult<&'a [u8], u64, E> {
    let Some(&first_byte) = bytes.first() else {
        return Err(nom::Err::Incomplete(nom::Needed::new(1)));
    };

    let (num_bytes, value, minimum) = match first_byte & 0b11 {
        0b00 => return Ok((&bytes[1..], u64::from(first_byte >> 2))),
        0b01 => {
            let Some(encoded) = bytes.get(..2) else {
                return Err(nom::Err::Incomplete(nom::Needed::new(2 - bytes.len())));
            };
            let value = u16::from_le_bytes([encoded[0], encoded[1]]) >> 2;
            (2, u64::from(value), 1 << 6)
        }
        0b10 => {
            let Some(encoded) = bytes.get(..4) else {
                return Err(nom::Err::Incomplete(nom::Needed::new(4 - bytes.len())));
            };
            let value = u32::from_le_bytes([encoded[0], encoded[1], encoded[2], encoded[3]]) >> 2;
            (4, u64::from(value), 1 << 14)
        }
        _ => {
            let num_value_bytes = usize::from(first_byte >> 2) + 4;
            if num_value_bytes > 8 {
                return Err(nom::Err::Error(nom::error::make_error(
                    bytes,
                    nom::error::ErrorKind::LengthValue,
                )));
            }

            let Some(encoded) = bytes.get(1..1 + num_value_bytes) else {
                return Err(nom::Err::Incomplete(nom::Needed::new(
                    1 + num_value_bytes - bytes.len(),
                )));
            };

            // The most significant byte being 0 means that a shorter encoding exists.
            if encoded[num_value_bytes - 1] == 0 {
                return Err(nom::Err::Error(nom::error::make_error(
                    bytes,
                    nom::error::ErrorKind::Verify,
                )));
            }

            let mut value = [0; 8];
            value[..num_value_bytes].copy_from_slice(encoded);
            (1 + num_value_bytes, u64::from_le_bytes(value), 1 << 30)
        }
    };

    if value < minimum {
        return Err(nom::Err::Error(nom::error::make_error(
            bytes,
            nom::error::ErrorKind::Verify,
        )));
    }

    Ok((&bytes[num_bytes..], value))
}

#[cfg(test)]
mod tests {
    fn decode(bytes: &[u8]) -> Result<u64, ()> {
        match super::nom_scale_compact_u64::<nom::error::Error<&[u8]>>(bytes) {
            Ok((rest, value)) if rest.is_empty() => Ok(value),
            _ => Err(()),
        }
    }

    #[test]
    fn known_encodings() {
        for (value, expected) in [
            (0u64, &[0x00][..]),
            (1, &[0x04]),
            (63, &[0xfc]),
            (64, &[0x01, 0x01]),
            (16383, &[0xfd, 0xff]),
            (16384, &[0x02, 0x00, 0x01, 0x00]),
            ((1 << 30) - 1, &[0xfe, 0xff, 0xff, 0xff]),
            (1 << 30, &[0x03, 0x00, 0x00, 0x00, 0x40]),
            (
                u64::MAX,
                &[0x13, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff],
            ),
        ] {
            assert_eq!(&super::encode_scale_compact_u64(value)[..], expected);
            assert_eq!(decode(expected), Ok(value));
        }
    }

    #[test]
    fn random_values_decode_to_themselves() {
        for _ in 0..1024 {
            let value = rand::random::<u64>() >> (rand::random::<u32>() % 64);
            let encoded = super::encode_scale_compact_u64(value);
            assert_eq!(decode(&encoded), Ok(value));
        }
    }

    #[test]
    fn non_canonical_rejected() {
        // Zero encoded in the two-bytes mode.
        assert!(decode(&[0x01, 0x00]).is_err());
        // 64 encoded in the four-bytes mode.
        assert!(decode(&[0x02, 0x01, 0x00, 0x00]).is_err());
        // Big-integer mode with a trailing zero byte.
        assert!(decode(&[0x07, 0x00, 0x00, 0x00, 0x40, 0x00]).is_err());
    }

    #[test]
    fn truncated_is_incomplete() {
        assert!(matches!(
            super::nom_scale_compact_u64::<nom::error::Error<&[u8]>>(&[0x02, 0x00]),
            Err(nom::Err::Incomplete(_))
        ));
        assert!(matches!(
            super::nom_scale_compact_u64::<nom::error::Error<&[u8]>>(&[]),
            Err(nom::Err::Incomplete(_))
        ));
    }
}
