//! Streaming TLV record reader
//!
//! Reads exactly one self-delimited record from a `ByteSource`, pulling
//! bytes in bounded increments and growing the record buffer as they
//! arrive. The caller-supplied `max_len` caps total consumption, so memory
//! use is bounded no matter how the source behaves.

use crate::length::{LengthField, LengthStart, MAX_LENGTH_BYTES};
use crate::record::Record;
use bertlv_core::{RecordBuffer, TlvError, TlvResult};
use bertlv_transport::ByteSource;
use bytes::Bytes;

/// Tag byte plus first length byte
const HEADER_LEN: usize = 2;

/// Increment size for payload reads
const READ_CHUNK: usize = 1024;

/// Streaming TLV record reader
///
/// # Error Handling
///
/// Any failure aborts the read and discards all buffered bytes; there is
/// no partial-success return. Bytes already pulled from the source stay
/// consumed (this is a consuming reader, not a peeking one).
///
/// - `Truncated`: the source ended before a complete record was assembled.
///   Retryable if the source can produce more data later.
/// - `InvalidEncoding`: non-canonical or malformed length field. Fatal;
///   the input is untrustworthy.
/// - `TooLarge`: the record would exceed `max_len`. Fatal; this is the
///   resource-exhaustion defense.
pub struct TlvReader;

impl TlvReader {
    /// Read one complete TLV record from the source
    ///
    /// # Arguments
    /// * `source` - Byte source to consume from
    /// * `max_len` - Ceiling on total bytes consumed for this record
    ///
    /// # Returns
    /// The complete record, header and payload included, with ownership of
    /// the assembled bytes transferred to the caller.
    pub async fn read_record<S: ByteSource>(
        source: &mut S,
        max_len: usize,
    ) -> TlvResult<Record> {
        // Even an empty record needs a tag byte and a length byte
        if max_len < HEADER_LEN {
            return Err(TlvError::TooLarge {
                total: HEADER_LEN,
                max_len,
            });
        }

        let mut buffer = RecordBuffer::new();
        let mut header = [0u8; HEADER_LEN];
        Self::read_full(source, &mut header, "record header").await?;
        buffer.append(&header)?;

        match LengthField::classify(header[1]) {
            LengthStart::Short(length) => {
                Self::read_definite(source, &mut buffer, length as usize, max_len).await?;
            }
            LengthStart::Long(num_bytes) => {
                if num_bytes > MAX_LENGTH_BYTES {
                    return Err(TlvError::InvalidEncoding(format!(
                        "Length field announces {} bytes (max {})",
                        num_bytes, MAX_LENGTH_BYTES
                    )));
                }
                // Consumption must stay within max_len before the length
                // bytes are pulled
                if HEADER_LEN + num_bytes > max_len {
                    return Err(TlvError::TooLarge {
                        total: HEADER_LEN + num_bytes,
                        max_len,
                    });
                }
                let mut length_bytes = [0u8; MAX_LENGTH_BYTES];
                Self::read_full(source, &mut length_bytes[..num_bytes], "long form length")
                    .await?;
                buffer.append(&length_bytes[..num_bytes])?;

                let declared = LengthField::decode_long(&length_bytes[..num_bytes])?;
                Self::read_definite(source, &mut buffer, declared, max_len).await?;
            }
            LengthStart::Indefinite => {
                Self::read_indefinite(source, &mut buffer, max_len).await?;
            }
        }

        log::trace!(
            "assembled record: tag 0x{:02X}, {} bytes total",
            header[0],
            buffer.len()
        );
        Ok(Record::new(Bytes::from(buffer.take())))
    }

    /// Fill `buf` completely, failing `Truncated` on early end-of-source
    async fn read_full<S: ByteSource>(
        source: &mut S,
        mut buf: &mut [u8],
        what: &str,
    ) -> TlvResult<()> {
        while !buf.is_empty() {
            let n = source.read(buf).await?;
            if n == 0 {
                return Err(TlvError::Truncated(format!(
                    "Source ended while reading {}",
                    what
                )));
            }
            buf = &mut buf[n..];
        }
        Ok(())
    }

    /// Read a declared-length payload into the buffer
    ///
    /// The total record length is checked against `max_len` before any
    /// payload byte is pulled, so an oversized declaration fails without
    /// allocating for its payload.
    async fn read_definite<S: ByteSource>(
        source: &mut S,
        buffer: &mut RecordBuffer,
        declared: usize,
        max_len: usize,
    ) -> TlvResult<()> {
        let total = buffer
            .len()
            .checked_add(declared)
            .ok_or(TlvError::TooLarge {
                total: usize::MAX,
                max_len,
            })?;
        if total > max_len {
            return Err(TlvError::TooLarge { total, max_len });
        }

        let mut chunk = [0u8; READ_CHUNK];
        let mut remaining = declared;
        while remaining > 0 {
            let want = READ_CHUNK.min(remaining);
            let n = source.read(&mut chunk[..want]).await?;
            if n == 0 {
                return Err(TlvError::Truncated(format!(
                    "Source ended with {} payload bytes missing",
                    remaining
                )));
            }
            buffer.append(&chunk[..n])?;
            remaining -= n;
        }
        Ok(())
    }

    /// Read an indefinite-length payload up to and including the first
    /// top-level `0x00 0x00` terminator
    ///
    /// Bytes are pulled in bounded chunks, each request capped by the
    /// remaining `max_len` budget. Each chunk is scanned before it is
    /// appended, terminator pairs spanning a chunk boundary included, and
    /// only bytes through the terminator reach the buffer. Terminators of
    /// nested indefinite-length elements are not matched separately; the
    /// first occurrence wins.
    async fn read_indefinite<S: ByteSource>(
        source: &mut S,
        buffer: &mut RecordBuffer,
        max_len: usize,
    ) -> TlvResult<()> {
        let mut chunk = [0u8; READ_CHUNK];
        let mut consumed = buffer.len();

        loop {
            let want = READ_CHUNK.min(max_len - consumed);
            if want == 0 {
                // Terminator not found within budget; the record is at
                // least one byte longer than max_len allows
                return Err(TlvError::TooLarge {
                    total: consumed + 1,
                    max_len,
                });
            }

            let n = source.read(&mut chunk[..want]).await?;
            if n == 0 {
                return Err(TlvError::Truncated(
                    "Source ended before indefinite-length terminator".to_string(),
                ));
            }
            consumed += n;

            // Terminator spanning the previous chunk boundary
            let payload_ends_in_zero =
                buffer.len() > HEADER_LEN && buffer.as_slice().last() == Some(&0x00);
            if payload_ends_in_zero && chunk[0] == 0x00 {
                buffer.append(&chunk[..1])?;
                return Ok(());
            }

            if let Some(pos) = chunk[..n].windows(2).position(|pair| pair == [0x00, 0x00]) {
                buffer.append(&chunk[..pos + 2])?;
                return Ok(());
            }

            buffer.append(&chunk[..n])?;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bertlv_transport::{MemorySource, TcpSettings, TcpSource};
    use tokio::io::AsyncWriteExt;

    async fn read_from_memory(data: &[u8], max_len: usize) -> TlvResult<Record> {
        let mut source = MemorySource::new(data.to_vec());
        TlvReader::read_record(&mut source, max_len).await
    }

    #[tokio::test]
    async fn test_short_form_stops_at_declared_length() {
        let data = [0x30, 0x02, 0x01, 0x02, 0x00, 0x00];
        let record = read_from_memory(&data, 100).await.unwrap();
        assert_eq!(record.len(), 4);
        assert_eq!(record.as_bytes(), &[0x30, 0x02, 0x01, 0x02]);
        assert_eq!(record.tag(), 0x30);
    }

    #[tokio::test]
    async fn test_zero_length_payload() {
        let record = read_from_memory(&[0x30, 0x00], 100).await.unwrap();
        assert_eq!(record.len(), 2);
        assert_eq!(record.as_bytes(), &[0x30, 0x00]);
    }

    #[tokio::test]
    async fn test_truncated_payload() {
        // Declares 3 payload bytes, only 2 present
        let err = read_from_memory(&[0x30, 0x03, 0x01, 0x02], 100)
            .await
            .unwrap_err();
        assert!(matches!(err, TlvError::Truncated(_)));
    }

    #[tokio::test]
    async fn test_truncated_header() {
        let err = read_from_memory(&[0x30], 100).await.unwrap_err();
        assert!(matches!(err, TlvError::Truncated(_)));

        let err = read_from_memory(&[], 100).await.unwrap_err();
        assert!(matches!(err, TlvError::Truncated(_)));
    }

    #[tokio::test]
    async fn test_truncated_length_bytes() {
        // Announces 2 length bytes, only 1 present
        let err = read_from_memory(&[0x30, 0x82, 0x01], 100).await.unwrap_err();
        assert!(matches!(err, TlvError::Truncated(_)));
    }

    #[tokio::test]
    async fn test_long_form_value_fitting_short_form_rejected() {
        let err = read_from_memory(&[0x30, 0x81, 0x01, 0x01], 100)
            .await
            .unwrap_err();
        assert!(matches!(err, TlvError::InvalidEncoding(_)));
    }

    #[tokio::test]
    async fn test_long_form_leading_zero_rejected() {
        let err = read_from_memory(&[0x30, 0x82, 0x00, 0x01, 0x01], 100)
            .await
            .unwrap_err();
        assert!(matches!(err, TlvError::InvalidEncoding(_)));
    }

    #[tokio::test]
    async fn test_length_field_wider_than_supported_rejected() {
        let err = read_from_memory(&[0x30, 0x85, 0x01, 0x02, 0x03, 0x04, 0x05], 100)
            .await
            .unwrap_err();
        assert!(matches!(err, TlvError::InvalidEncoding(_)));
    }

    fn large_record(payload_len: usize) -> Vec<u8> {
        let mut data = vec![0x30];
        data.extend_from_slice(&LengthField::Definite(payload_len).encode());
        data.resize(data.len() + payload_len, 0x00);
        data
    }

    #[tokio::test]
    async fn test_long_form_large_payload() {
        let data = large_record(8000);
        assert_eq!(data.len(), 8004);

        let record = read_from_memory(&data, 16001).await.unwrap();
        assert_eq!(record.len(), 8004);
        assert_eq!(record.as_bytes(), &data[..]);
    }

    #[tokio::test]
    async fn test_long_form_exceeding_max_len() {
        let data = large_record(8000);
        let err = read_from_memory(&data, 7999).await.unwrap_err();
        assert!(matches!(
            err,
            TlvError::TooLarge {
                total: 8004,
                max_len: 7999
            }
        ));
    }

    #[tokio::test]
    async fn test_max_len_below_header() {
        let err = read_from_memory(&[0x30, 0x02, 0x01, 0x02], 1)
            .await
            .unwrap_err();
        assert!(matches!(err, TlvError::TooLarge { .. }));
    }

    #[tokio::test]
    async fn test_indefinite_stops_at_first_terminator() {
        let data = [0x30, 0x80, 0x01, 0x02, 0x00, 0x00, 0xAA, 0xBB];
        let record = read_from_memory(&data, 100).await.unwrap();
        assert_eq!(record.len(), 6);
        assert_eq!(record.as_bytes(), &data[..6]);
    }

    #[tokio::test]
    async fn test_indefinite_terminator_immediately_after_header() {
        let record = read_from_memory(&[0x30, 0x80, 0x00, 0x00], 100)
            .await
            .unwrap();
        assert_eq!(record.len(), 4);
        assert_eq!(record.as_bytes(), &[0x30, 0x80, 0x00, 0x00]);
    }

    #[tokio::test]
    async fn test_indefinite_terminator_spanning_chunk_boundary() {
        // 1023 non-zero payload bytes put the first terminator byte at the
        // end of the reader's first chunk and the second at the start of
        // the next one
        let mut data = vec![0x30, 0x80];
        data.resize(data.len() + 1023, 0x01);
        data.extend_from_slice(&[0x00, 0x00]);
        let expected_len = data.len();
        data.extend_from_slice(&[0xDE, 0xAD]);

        let record = read_from_memory(&data, 4096).await.unwrap();
        assert_eq!(record.len(), expected_len);
        assert_eq!(record.as_bytes(), &data[..expected_len]);
    }

    #[tokio::test]
    async fn test_indefinite_odd_zero_run_before_terminator() {
        // A lone zero followed by a non-zero byte is payload; the
        // terminator is the first adjacent pair
        let data = [0x30, 0x80, 0x00, 0x01, 0x00, 0x00];
        let record = read_from_memory(&data, 100).await.unwrap();
        assert_eq!(record.len(), 6);
    }

    #[tokio::test]
    async fn test_indefinite_without_terminator_truncated() {
        let data = [0x30, 0x80, 0x01, 0x02, 0x03];
        let err = read_from_memory(&data, 100).await.unwrap_err();
        assert!(matches!(err, TlvError::Truncated(_)));
    }

    #[tokio::test]
    async fn test_indefinite_exceeding_max_len() {
        let mut data = vec![0x30, 0x80];
        data.resize(data.len() + 200, 0x01);
        data.extend_from_slice(&[0x00, 0x00]);

        let err = read_from_memory(&data, 64).await.unwrap_err();
        assert!(matches!(err, TlvError::TooLarge { max_len: 64, .. }));
    }

    #[tokio::test]
    async fn test_read_record_over_tcp() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        let server = tokio::spawn(async move {
            let (mut peer, _) = listener.accept().await.unwrap();
            // Two writes force the reader to assemble across arrivals
            peer.write_all(&[0x30, 0x03]).await.unwrap();
            peer.flush().await.unwrap();
            peer.write_all(&[0x0A, 0x0B, 0x0C]).await.unwrap();
        });

        let mut source = TcpSource::new(TcpSettings::new(addr));
        source.open().await.unwrap();

        let record = TlvReader::read_record(&mut source, 100).await.unwrap();
        assert_eq!(record.len(), 5);
        assert_eq!(record.as_bytes(), &[0x30, 0x03, 0x0A, 0x0B, 0x0C]);

        server.await.unwrap();
    }
}
