//! WAL writer

use super::{DurabilityMode, WalEntry, FRAME_HEADER_LEN};
use byteorder::{LittleEndian, WriteBytesExt};
use niaga_core::{NiagaError, NiagaResult};
use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Appends framed entries to the WAL file
pub struct WalWriter {
    path: PathBuf,
    writer: BufWriter<File>,
    mode: DurabilityMode,
    size: u64,
}

impl WalWriter {
    /// Open (creating if needed) the WAL at `path` for appending
    pub fn open(path: impl AsRef<Path>, mode: DurabilityMode) -> NiagaResult<Self> {
        let path = path.as_ref().to_path_buf();
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .map_err(|e| NiagaError::storage(format!("open WAL {}", path.display()), e))?;
        let size = file
            .metadata()
            .map_err(|e| NiagaError::storage("stat WAL", e))?
            .len();
        Ok(Self {
            path,
            writer: BufWriter::new(file),
            mode,
            size,
        })
    }

    /// Encode one frame
    pub fn encode_frame(entry: &WalEntry) -> NiagaResult<Vec<u8>> {
        let payload = entry.encode()?;
        let len = u32::try_from(payload.len())
            .map_err(|_| NiagaError::internal("WAL entry larger than 4 GiB"))?;
        let mut frame = Vec::with_capacity(FRAME_HEADER_LEN + payload.len());
        frame.write_u32::<LittleEndian>(len)?;
        frame.write_u32::<LittleEndian>(crc32fast::hash(&payload))?;
        frame.extend_from_slice(&payload);
        Ok(frame)
    }

    /// Append an entry and make it durable per the mode
    ///
    /// Returns the frame size in bytes.
    pub fn append(&mut self, entry: &WalEntry) -> NiagaResult<usize> {
        let frame = Self::encode_frame(entry)?;
        self.writer
            .write_all(&frame)
            .map_err(|e| NiagaError::storage("append WAL frame", e))?;
        self.writer
            .flush()
            .map_err(|e| NiagaError::storage("flush WAL", e))?;
        if self.mode == DurabilityMode::Strict {
            self.writer
                .get_ref()
                .sync_data()
                .map_err(|e| NiagaError::storage("fsync WAL", e))?;
        }
        self.size += frame.len() as u64;
        debug!(version = entry.version, bytes = frame.len(), "WAL append");
        Ok(frame.len())
    }

    /// Flush and fsync
    pub fn sync(&mut self) -> NiagaResult<()> {
        self.writer
            .flush()
            .map_err(|e| NiagaError::storage("flush WAL", e))?;
        self.writer
            .get_ref()
            .sync_all()
            .map_err(|e| NiagaError::storage("fsync WAL", e))
    }

    /// Discard every frame (after a checkpoint)
    pub fn truncate(&mut self) -> NiagaResult<()> {
        self.writer
            .flush()
            .map_err(|e| NiagaError::storage("flush WAL", e))?;
        let file = self.writer.get_mut();
        file.set_len(0)
            .map_err(|e| NiagaError::storage("truncate WAL", e))?;
        file.seek(SeekFrom::Start(0))
            .map_err(|e| NiagaError::storage("rewind WAL", e))?;
        file.sync_all()
            .map_err(|e| NiagaError::storage("fsync WAL", e))?;
        self.size = 0;
        Ok(())
    }

    /// Current file size in bytes
    pub fn size(&self) -> u64 {
        self.size
    }

    /// Path of the WAL file
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl std::fmt::Debug for WalWriter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WalWriter")
            .field("path", &self.path)
            .field("mode", &self.mode)
            .field("size", &self.size)
            .finish()
    }
}
