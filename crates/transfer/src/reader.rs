use std::path::{Path, PathBuf};
use std::sync::Arc;

use tokio::io::AsyncReadExt;

use crate::TransferError;
use crate::plan::ChunkPlan;

/// One contiguous slice of the source, ready to transmit.
#[derive(Debug, Clone)]
pub struct Chunk {
    /// Position of this chunk in the plan.
    pub index: u32,
    /// Byte offset within the source.
    pub offset: u64,
    /// Raw chunk data.
    pub data: Vec<u8>,
}

impl Chunk {
    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

/// A read-only media source with a known size.
#[derive(Debug, Clone)]
pub struct MediaSource {
    filename: String,
    size: u64,
    backing: Backing,
}

#[derive(Debug, Clone)]
enum Backing {
    Memory(Arc<[u8]>),
    File(PathBuf),
}

impl MediaSource {
    /// Wraps an in-memory buffer.
    pub fn from_bytes(filename: impl Into<String>, data: impl Into<Vec<u8>>) -> Self {
        let data: Arc<[u8]> = Arc::from(data.into());
        Self {
            filename: filename.into(),
            size: data.len() as u64,
            backing: Backing::Memory(data),
        }
    }

    /// Describes a file on disk. The size is captured now and becomes the
    /// size the upload is planned against.
    pub async fn from_path(path: &Path) -> Result<Self, TransferError> {
        let metadata = tokio::fs::metadata(path).await?;
        if !metadata.is_file() {
            return Err(TransferError::Io(std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                format!("not a regular file: {}", path.display()),
            )));
        }
        let filename = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.to_string_lossy().into_owned());
        Ok(Self {
            filename,
            size: metadata.len(),
            backing: Backing::File(path.to_path_buf()),
        })
    }

    /// Original file name, sent with every chunk and on finalize.
    pub fn filename(&self) -> &str {
        &self.filename
    }

    pub fn size(&self) -> u64 {
        self.size
    }

    pub fn is_empty(&self) -> bool {
        self.size == 0
    }

    /// Path on disk, if the source is file-backed.
    pub fn path(&self) -> Option<&Path> {
        match &self.backing {
            Backing::File(path) => Some(path),
            Backing::Memory(_) => None,
        }
    }

    /// Opens a sequential reader over the chunks of `plan`.
    pub async fn open(&self, plan: ChunkPlan) -> Result<ChunkReader, TransferError> {
        let inner = match &self.backing {
            Backing::Memory(data) => ReaderInner::Memory(Arc::clone(data)),
            Backing::File(path) => ReaderInner::File(tokio::fs::File::open(path).await?),
        };
        Ok(ChunkReader {
            inner,
            plan,
            next_index: 0,
        })
    }
}

enum ReaderInner {
    Memory(Arc<[u8]>),
    File(tokio::fs::File),
}

/// Reads a source chunk by chunk, in plan order.
///
/// Only the chunk being returned is held in memory.
pub struct ChunkReader {
    inner: ReaderInner,
    plan: ChunkPlan,
    next_index: u32,
}

impl ChunkReader {
    /// Reads the next chunk. Returns `None` once every planned chunk was read.
    pub async fn next_chunk(&mut self) -> Result<Option<Chunk>, TransferError> {
        let index = self.next_index;
        if index >= self.plan.total_chunks() {
            return Ok(None);
        }

        let range = self.plan.range(index)?;
        let expected = range.end - range.start;

        let data = match &mut self.inner {
            ReaderInner::Memory(data) => {
                let end = std::cmp::min(range.end, data.len() as u64);
                let start = std::cmp::min(range.start, end);
                data[start as usize..end as usize].to_vec()
            }
            ReaderInner::File(file) => {
                let mut buf = vec![0u8; expected as usize];
                let mut filled = 0;
                while filled < buf.len() {
                    let n = file.read(&mut buf[filled..]).await?;
                    if n == 0 {
                        break;
                    }
                    filled += n;
                }
                buf.truncate(filled);
                buf
            }
        };

        if data.len() as u64 != expected {
            return Err(TransferError::ShortRead {
                index,
                expected,
                got: data.len() as u64,
            });
        }

        self.next_index += 1;
        Ok(Some(Chunk {
            index,
            offset: range.start,
            data,
        }))
    }

    /// Index of the chunk the next call will return.
    pub fn next_index(&self) -> u32 {
        self.next_index
    }

    pub fn plan(&self) -> &ChunkPlan {
        &self.plan
    }
}
