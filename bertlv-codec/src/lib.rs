//! Streaming BER/DER TLV envelope reader
//!
//! This crate reconstructs one complete, self-delimited TLV record from a
//! byte-oriented source without knowing the record's total length up front.
//! Each record is `[tag][length-field][payload]` where the length field uses
//! one of the three BER syntactic forms:
//!
//! - **Short form** (1 byte): lengths 0-127, bit 7 clear.
//! - **Long form** (2-5 bytes): bit 7 set, bits 6-0 give the count of
//!   big-endian length bytes that follow. Non-minimal encodings (leading
//!   zero byte, or a value that fits short form) are rejected.
//! - **Indefinite form** (`0x80`): the payload runs until a two-byte
//!   `0x00 0x00` end marker in the stream.
//!
//! Only the envelope is decoded; tag bytes are carried through raw, with no
//! ASN.1 type interpretation. A caller-supplied ceiling bounds the total
//! bytes one read may consume, so worst-case memory is O(max_len) even
//! against hostile input.

pub mod length;
pub mod record;
pub mod reader;

pub use bertlv_core::{TlvError, TlvResult};
pub use length::{LengthField, LengthStart, MAX_LENGTH_BYTES};
pub use record::Record;
pub use reader::TlvReader;
