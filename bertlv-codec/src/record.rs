//! Complete TLV record as returned to the caller

use bytes::Bytes;

/// One complete, self-delimited TLV record
///
/// Holds the full encoding (tag byte, length field, payload, and for
/// indefinite-length records the `0x00 0x00` terminator). The tag is
/// carried through raw; interpreting it is the caller's concern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    bytes: Bytes,
}

impl Record {
    pub(crate) fn new(bytes: Bytes) -> Self {
        Self { bytes }
    }

    /// The record's tag byte
    pub fn tag(&self) -> u8 {
        self.bytes[0]
    }

    /// Total encoded length in bytes, header included
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// A complete record always holds at least a tag and a length byte
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// View the complete encoding
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Consume the record, handing back the encoding
    pub fn into_bytes(self) -> Bytes {
        self.bytes
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accessors() {
        let record = Record::new(Bytes::from_static(&[0x30, 0x02, 0x01, 0x02]));
        assert_eq!(record.tag(), 0x30);
        assert_eq!(record.len(), 4);
        assert_eq!(record.as_bytes(), &[0x30, 0x02, 0x01, 0x02]);
        assert_eq!(record.into_bytes(), Bytes::from_static(&[0x30, 0x02, 0x01, 0x02]));
    }
}
