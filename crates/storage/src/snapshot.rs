// SPDX-License-Identifier: MIT

//! Generic atomic snapshot read/write. Every entity collection in
//! [`crate::store::Storage`] is serialized as one JSON file written via
//! write-to-temp-then-rename, so a crash mid-write never corrupts the file
//! a concurrent reader sees (spec Non-goals: snapshotted, not journaled).

use crate::error::StorageError;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs::{self, File};
use std::io::{BufReader, BufWriter};
use std::path::Path;
use tracing::warn;

fn io_err(path: &Path, source: std::io::Error) -> StorageError {
    StorageError::Io {
        path: path.display().to_string(),
        source,
    }
}

/// Write `value` to `path` atomically: serialize to `path.tmp`, fsync, then
/// rename over the target.
pub fn write_atomic<T: Serialize>(path: &Path, value: &T) -> Result<(), StorageError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| io_err(path, e))?;
    }

    let tmp_path = path.with_extension("tmp");
    {
        let file = File::create(&tmp_path).map_err(|e| io_err(&tmp_path, e))?;
        let mut writer = BufWriter::new(file);
        serde_json::to_writer_pretty(&mut writer, value).map_err(|e| StorageError::Corrupt {
            path: tmp_path.display().to_string(),
            source: e,
        })?;
        let file = writer.into_inner().map_err(|e| io_err(&tmp_path, e.into_error()))?;
        file.sync_all().map_err(|e| io_err(&tmp_path, e))?;
    }
    fs::rename(&tmp_path, path).map_err(|e| io_err(path, e))?;
    Ok(())
}

/// Read `path` and deserialize it, falling back to `T::default()` when the
/// file does not exist yet. A corrupt file is moved aside to `.bak` so the
/// daemon starts clean instead of refusing to boot.
pub fn read_or_default<T: DeserializeOwned + Default>(path: &Path) -> Result<T, StorageError> {
    if !path.exists() {
        return Ok(T::default());
    }

    let file = File::open(path).map_err(|e| io_err(path, e))?;
    let reader = BufReader::new(file);
    match serde_json::from_reader(reader) {
        Ok(value) => Ok(value),
        Err(e) => {
            let bak_path = path.with_extension("bak");
            warn!(error = %e, path = %path.display(), bak = %bak_path.display(), "corrupt snapshot, moving aside and starting fresh");
            fs::rename(path, &bak_path).map_err(|e| io_err(path, e))?;
            Ok(T::default())
        }
    }
}
