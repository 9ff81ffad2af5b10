//! bertlv - streaming BER/DER TLV envelope reader
//!
//! This library reconstructs complete, self-delimited TLV records from
//! byte-oriented sources without knowing record lengths in advance, while
//! enforcing a caller-supplied ceiling on per-record memory.
//!
//! # Architecture
//!
//! This library is organized as a workspace with multiple crates:
//!
//! - `bertlv-core`: Error handling and the growable record buffer
//! - `bertlv-transport`: Byte source abstraction (memory, TCP)
//! - `bertlv-codec`: Length-field syntax and the streaming reader
//!
//! # Usage Example
//!
//! ```rust,no_run
//! use bertlv::{MemorySource, TlvReader};
//!
//! # async fn example() -> bertlv::TlvResult<()> {
//! let mut source = MemorySource::new(vec![0x30, 0x02, 0x01, 0x02]);
//! let record = TlvReader::read_record(&mut source, 4096).await?;
//! assert_eq!(record.tag(), 0x30);
//! # Ok(())
//! # }
//! ```

pub use bertlv_core::{RecordBuffer, TlvError, TlvResult};
pub use bertlv_transport::{ByteSource, MemorySource, TcpSettings, TcpSource};
pub use bertlv_codec::{LengthField, LengthStart, Record, TlvReader, MAX_LENGTH_BYTES};
