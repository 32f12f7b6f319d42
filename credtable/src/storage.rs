use std::fs::File;
use std::io::{BufReader, BufWriter, ErrorKind, Read, Write};
use std::path::Path;

use log::{debug, warn};

use crate::codec::{BytesEncode, Record, RecordReader};
use crate::error::{Result, TableError};
use crate::ids::IdAllocator;
use crate::table::FixedHashTable;

/// What a load pass found in a record stream.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoadSummary {
    /// Complete records decoded
    pub read: usize,
    /// Records placed in the table
    pub inserted: usize,
    /// Records skipped because their username was already present
    pub duplicates: usize,
    /// Records that did not fit into the table
    pub dropped: usize,
    /// Largest id seen, 0 when nothing was read
    pub max_id: i32,
}

/// Loads the record file at `path` into `table` and reseeds `ids`.
///
/// A missing file is an empty dataset: the table is left as is and `ids`
/// starts over at 1.
pub fn load_all(
    table: &mut FixedHashTable,
    ids: &mut IdAllocator,
    path: &Path,
) -> Result<LoadSummary> {
    let file = match File::open(path) {
        Ok(file) => file,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            debug!("{} does not exist, starting empty", path.display());
            ids.reset();
            return Ok(LoadSummary::default());
        }
        Err(e) => return Err(e.into()),
    };

    let summary = read_all(table, ids, BufReader::new(file))?;
    debug!(
        "loaded {} of {} records from {}, next id {}",
        summary.inserted,
        summary.read,
        path.display(),
        ids.current()
    );
    Ok(summary)
}

/// Same as [`load_all`] over an arbitrary stream.
///
/// The first record for a username wins. Every decoded record counts
/// towards the id reseed, skipped ones included.
pub fn read_all<R: Read>(
    table: &mut FixedHashTable,
    ids: &mut IdAllocator,
    reader: R,
) -> Result<LoadSummary> {
    let mut summary = LoadSummary::default();

    for record in RecordReader::new(reader) {
        let record = record?;
        summary.read += 1;
        summary.max_id = summary.max_id.max(record.id());

        let username = record.username();
        if table.contains(username.as_bytes()) {
            summary.duplicates += 1;
            continue;
        }
        match table.insert(record.id(), username.as_bytes(), record.password().as_bytes()) {
            Ok(_) => summary.inserted += 1,
            Err(TableError::TableFull | TableError::InjectedFailure) => {
                warn!("dropping record {} ({username}): table rejected it", record.id());
                summary.dropped += 1;
            }
            Err(e) => return Err(e),
        }
    }

    ids.reseed(summary.max_id);
    Ok(summary)
}

/// Overwrites `path` with every record of `table` in slot order and
/// returns how many were written.
pub fn save_all(table: &FixedHashTable, path: &Path) -> Result<usize> {
    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);
    let written = write_all(table, &mut writer)?;
    writer.into_inner().map_err(|e| e.into_error())?.sync_all()?;
    debug!("saved {written} records to {}", path.display());
    Ok(written)
}

/// Same as [`save_all`] over an arbitrary sink.
pub fn write_all<W: Write>(table: &FixedHashTable, mut writer: W) -> Result<usize> {
    let mut written = 0;
    for record in table.iter() {
        writer.write_all(&Record::bytes_encode(record))?;
        written += 1;
    }
    writer.flush()?;
    Ok(written)
}

/// Largest id in the record file at `path` plus one, without building a table.
pub fn scan_next_id(path: &Path) -> Result<i32> {
    let file = match File::open(path) {
        Ok(file) => file,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(IdAllocator::FIRST_ID),
        Err(e) => return Err(e.into()),
    };

    let mut max_id = 0;
    for record in RecordReader::new(BufReader::new(file)) {
        max_id = max_id.max(record?.id());
    }
    let mut ids = IdAllocator::new();
    ids.reseed(max_id);
    Ok(ids.current())
}
