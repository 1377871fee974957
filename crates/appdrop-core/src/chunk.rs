//! Sequential fixed-size chunk reader.
//!
//! The file is read strictly from offset 0. Each window is filled completely
//! unless the end of the file is reached; a short window is the last one.
//! When the file size is an exact multiple of the chunk size the zero-length
//! read that follows the final full window is not reported as a chunk, so a
//! file of `S` bytes always yields `ceil(S / C)` chunks.

use std::path::{Path, PathBuf};

use base64::{engine::general_purpose::STANDARD, Engine as _};
use tokio::io::AsyncReadExt;

use crate::error::IngestError;

/// One window of the file.
#[derive(Debug, Clone)]
pub struct Chunk {
    /// 1-based position within the file.
    pub sequence: u32,
    /// Byte offset of the first byte.
    pub offset: u64,
    pub data: Vec<u8>,
}

impl Chunk {
    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn encode(&self) -> String {
        STANDARD.encode(&self.data)
    }
}

/// Reads a file in fixed-size chunks. The handle is closed when the reader is
/// dropped, whichever way the transfer ends.
pub struct ChunkReader {
    file: tokio::fs::File,
    path: PathBuf,
    chunk_size: usize,
    file_size: u64,
    offset: u64,
    next_sequence: u32,
    finished: bool,
}

impl ChunkReader {
    pub async fn open(path: &Path, chunk_size: usize) -> Result<Self, IngestError> {
        if chunk_size == 0 {
            return Err(IngestError::Config("chunk size must be positive".into()));
        }
        let file = tokio::fs::File::open(path)
            .await
            .map_err(|source| IngestError::LocalFile {
                path: path.to_path_buf(),
                source,
            })?;
        let file_size = file
            .metadata()
            .await
            .map_err(|source| IngestError::LocalFile {
                path: path.to_path_buf(),
                source,
            })?
            .len();

        Ok(Self {
            file,
            path: path.to_path_buf(),
            chunk_size,
            file_size,
            offset: 0,
            next_sequence: 1,
            finished: false,
        })
    }

    /// Reads the next window. Returns `None` once the file is exhausted.
    pub async fn next_chunk(&mut self) -> Result<Option<Chunk>, IngestError> {
        if self.finished {
            return Ok(None);
        }

        let mut buf = vec![0u8; self.chunk_size];
        let mut filled = 0;
        while filled < self.chunk_size {
            let n = self
                .file
                .read(&mut buf[filled..])
                .await
                .map_err(|source| IngestError::LocalFile {
                    path: self.path.clone(),
                    source,
                })?;
            if n == 0 {
                break;
            }
            filled += n;
        }

        if filled < self.chunk_size {
            self.finished = true;
        }
        if filled == 0 {
            return Ok(None);
        }
        buf.truncate(filled);

        let chunk = Chunk {
            sequence: self.next_sequence,
            offset: self.offset,
            data: buf,
        };
        self.offset += filled as u64;
        self.next_sequence += 1;
        Ok(Some(chunk))
    }

    /// Size of the file when it was opened.
    pub fn file_size(&self) -> u64 {
        self.file_size
    }

    /// Number of chunks a file of `file_size` bytes is split into.
    pub fn expected_chunks(file_size: u64, chunk_size: usize) -> u64 {
        file_size.div_ceil(chunk_size as u64)
    }
}
