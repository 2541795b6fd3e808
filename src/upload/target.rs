use crate::upload::plan::ChunkRange;
use bytes::Bytes;
use std::{
    io,
    io::SeekFrom,
    path::{Path, PathBuf},
};
use tokio::{
    fs::{self, File},
    io::{AsyncReadExt, AsyncSeekExt},
};

/// A local file about to be uploaded. The size is read once when the target is
/// opened and the file is expected not to change while the session runs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadTarget {
    path: PathBuf,
    name: String,
    size: u64,
}

/// Everything after the last `/`, `\` or `:`.
#[must_use]
pub fn file_name_from_path(path: &str) -> &str {
    path.rsplit(['/', '\\', ':']).next().unwrap_or(path)
}

impl UploadTarget {
    /// # Errors
    ///
    /// Will return `Err` if the path does not exist or is not a file
    pub async fn open(path: &Path) -> io::Result<Self> {
        let metadata = fs::metadata(path).await?;

        if !metadata.is_file() {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("not a file: {}", path.display()),
            ));
        }

        let name = file_name_from_path(&path.to_string_lossy()).to_string();

        Ok(Self {
            path: path.to_path_buf(),
            name,
            size: metadata.len(),
        })
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub const fn size(&self) -> u64 {
        self.size
    }

    /// Read exactly the bytes of `range`.
    ///
    /// # Errors
    ///
    /// Will return `Err` if the file can not be read or is shorter than the range
    pub async fn read_range(&self, range: &ChunkRange) -> io::Result<Bytes> {
        let length = usize::try_from(range.len())
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidInput, e))?;

        let mut buf = vec![0; length];

        if length > 0 {
            let mut file = File::open(&self.path).await?;
            file.seek(SeekFrom::Start(range.start)).await?;
            file.read_exact(&mut buf).await?;
        }

        Ok(Bytes::from(buf))
    }
}
