//! BER length-field syntax (short, long, and indefinite forms)

use bertlv_core::{TlvError, TlvResult};

/// Maximum number of subsequent length bytes accepted in long form
///
/// Four bytes bound declared lengths to 32 bits, which is far beyond any
/// `max_len` a caller would reasonably configure.
pub const MAX_LENGTH_BYTES: usize = 4;

/// Classification of a length field from its first byte
///
/// The first length byte alone determines which of the three syntactic
/// forms follows, and therefore how many more bytes the reader must pull
/// before it knows the record's extent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LengthStart {
    /// Short form: the byte value is the payload length (0-127)
    Short(u8),
    /// Indefinite form: payload runs until a `0x00 0x00` end marker
    Indefinite,
    /// Long form: this many big-endian length bytes follow
    Long(usize),
}

/// A resolved BER length field
///
/// # Encoding Format
///
/// Short form:
/// ```text
/// Byte: 0 L L L L L L L
/// ```
/// Long form:
/// ```text
/// First byte:  1 N N N N N N N  (N = number of length bytes)
/// Following bytes: big-endian length value
/// ```
/// Indefinite form is the long-form first byte with N = 0 (`0x80`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LengthField {
    /// Length known up front
    Definite(usize),
    /// Length resolved only by the `0x00 0x00` terminator
    Indefinite,
}

impl LengthField {
    /// Classify a length field from its first byte
    pub fn classify(first_byte: u8) -> LengthStart {
        if first_byte & 0x80 == 0 {
            LengthStart::Short(first_byte)
        } else if first_byte == 0x80 {
            LengthStart::Indefinite
        } else {
            LengthStart::Long((first_byte & 0x7F) as usize)
        }
    }

    /// Decode the subsequent bytes of a long-form length field
    ///
    /// # Arguments
    /// * `bytes` - Exactly the announced length bytes (1 to `MAX_LENGTH_BYTES`)
    ///
    /// # Error Handling
    /// Returns `InvalidEncoding` for non-canonical encodings:
    /// - a leading `0x00` byte (zero-padded), or
    /// - a value of 127 or less (must have used short form).
    pub fn decode_long(bytes: &[u8]) -> TlvResult<usize> {
        if bytes.is_empty() || bytes.len() > MAX_LENGTH_BYTES {
            return Err(TlvError::InvalidEncoding(format!(
                "Long form length must be 1-{} bytes, got {}",
                MAX_LENGTH_BYTES,
                bytes.len()
            )));
        }

        if bytes[0] == 0x00 {
            return Err(TlvError::InvalidEncoding(
                "Long form length has leading zero byte".to_string(),
            ));
        }

        // Big-endian
        let mut length = 0usize;
        for &byte in bytes {
            length = (length << 8) | (byte as usize);
        }

        if length < 128 {
            return Err(TlvError::InvalidEncoding(format!(
                "Length {} encoded in long form but fits short form",
                length
            )));
        }

        Ok(length)
    }

    /// Encode the length field to bytes
    ///
    /// Definite lengths use short form below 128 and minimal long form
    /// otherwise; the indefinite form is the single byte `0x80`.
    pub fn encode(&self) -> Vec<u8> {
        match self {
            LengthField::Definite(length) if *length < 128 => {
                vec![*length as u8]
            }
            LengthField::Definite(length) => {
                let mut num_bytes = 0;
                let mut temp = *length;
                while temp > 0 {
                    num_bytes += 1;
                    temp >>= 8;
                }

                let mut result = vec![0x80 | (num_bytes as u8)];
                for i in (0..num_bytes).rev() {
                    result.push(((*length >> (i * 8)) & 0xFF) as u8);
                }
                result
            }
            LengthField::Indefinite => vec![0x80],
        }
    }
}
