use std::borrow::Cow;
use std::io::{self, ErrorKind, Read};

use log::trace;

use crate::error::{Result, TableError};
use crate::record::{RECORD_SIZE, UserRecord};

/// Trait for encoding types into byte representation
pub trait BytesEncode<'a> {
    type EItem: 'a + ?Sized;

    /// Encode an item into bytes
    fn bytes_encode(item: &'a Self::EItem) -> Cow<'a, [u8]>;
}

/// Trait for decoding types from byte representation
pub trait BytesDecode<'a> {
    type DItem: 'a;

    /// Decode bytes into an item
    fn bytes_decode(bytes: &'a [u8]) -> Result<Self::DItem>;
}

/// Fixed width codec for [`UserRecord`]: the in-memory layout is the wire layout.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Record;

impl<'a> BytesEncode<'a> for Record {
    type EItem = UserRecord;

    fn bytes_encode(item: &'a Self::EItem) -> Cow<'a, [u8]> {
        Cow::Borrowed(bytemuck::bytes_of(item))
    }
}

impl<'a> BytesDecode<'a> for Record {
    type DItem = UserRecord;

    fn bytes_decode(bytes: &'a [u8]) -> Result<Self::DItem> {
        if bytes.len() != RECORD_SIZE {
            return Err(format!(
                "Invalid byte length for {}: expected {}, got {}",
                std::any::type_name::<UserRecord>(),
                RECORD_SIZE,
                bytes.len()
            )
            .into());
        }
        // the input slice carries no alignment guarantee
        let record: UserRecord = bytemuck::pod_read_unaligned(bytes);
        Ok(record.normalized())
    }
}

pub fn encode_record(record: &UserRecord) -> [u8; RECORD_SIZE] {
    let mut out = [0u8; RECORD_SIZE];
    out.copy_from_slice(&Record::bytes_encode(record));
    out
}

pub fn decode_record(bytes: &[u8]) -> Result<UserRecord> {
    Record::bytes_decode(bytes)
}

/// Sequential reader over a flat stream of records.
///
/// Yields complete records only. Once fewer than [`RECORD_SIZE`] bytes are
/// left the iterator ends and the partial tail is discarded.
pub struct RecordReader<R> {
    inner: R,
    done: bool,
}

impl<R: Read> RecordReader<R> {
    pub fn new(inner: R) -> Self {
        Self { inner, done: false }
    }

    pub fn into_inner(self) -> R {
        self.inner
    }

    /// Reads until `buf` is full or the stream ends, returning the byte count.
    fn fill(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let mut filled = 0;
        while filled < buf.len() {
            match self.inner.read(&mut buf[filled..]) {
                Ok(0) => break,
                Ok(n) => filled += n,
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => return Err(e),
            }
        }
        Ok(filled)
    }
}

impl<R: Read> Iterator for RecordReader<R> {
    type Item = Result<UserRecord>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        let mut buf = [0u8; RECORD_SIZE];
        match self.fill(&mut buf) {
            Ok(n) if n == RECORD_SIZE => Some(decode_record(&buf)),
            Ok(n) => {
                if n > 0 {
                    trace!("ignoring {n} trailing bytes of a partial record");
                }
                self.done = true;
                None
            }
            Err(e) => {
                self.done = true;
                Some(Err(TableError::Io(e)))
            }
        }
    }
}
