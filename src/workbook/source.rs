use sha2::{Digest, Sha256};
use std::fs;
use std::io::Cursor;
use std::path::Path;
use std::sync::Arc;

/// A readable workbook source: either a file on disk or an uploaded byte
/// buffer handed over by the Shell.
///
/// The full content is held in memory so that the same source can be opened
/// repeatedly and so its SHA-256 digest can serve as the cache identity of
/// the upload. Workbooks in this domain are one sheet per well and small.
#[derive(Clone, Debug)]
pub struct WorkbookSource {
    /// Display name, also used for format detection by extension
    name: String,
    /// Raw workbook bytes
    bytes: Arc<[u8]>,
    /// Hex-encoded SHA-256 of the bytes
    digest: String,
}

impl WorkbookSource {
    /// Reads a workbook from a local file path.
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the workbook file
    ///
    /// # Returns
    ///
    /// * `Result<WorkbookSource, std::io::Error>` - The buffered source or an I/O error
    pub fn from_path<P>(path: P) -> Result<WorkbookSource, std::io::Error>
    where
        P: AsRef<Path>,
    {
        let name = path.as_ref().to_string_lossy().to_string();
        let bytes = fs::read(path)?;
        Ok(Self::from_bytes(name, bytes))
    }

    /// Wraps an uploaded byte buffer.
    ///
    /// # Arguments
    ///
    /// * `name` - Upload file name, used for format detection and messages
    /// * `bytes` - Raw workbook content
    pub fn from_bytes(name: impl Into<String>, bytes: Vec<u8>) -> WorkbookSource {
        let bytes: Arc<[u8]> = bytes.into();
        let digest = hex_digest(&bytes);
        WorkbookSource {
            name: name.into(),
            bytes,
            digest,
        }
    }

    /// Display name of the source.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Lower-cased file extension, if the name carries one.
    pub fn extension(&self) -> Option<String> {
        Path::new(&self.name)
            .extension()
            .map(|extension| extension.to_string_lossy().to_ascii_lowercase())
    }

    /// Hex-encoded SHA-256 of the content. Two sources with equal digests
    /// are the same upload; distinct uploads never share a digest.
    pub fn digest(&self) -> &str {
        &self.digest
    }

    /// Opens a fresh seekable reader over the buffered content.
    pub fn reader(&self) -> Cursor<Arc<[u8]>> {
        Cursor::new(Arc::clone(&self.bytes))
    }
}

/// Hex-encodes the SHA-256 digest of a byte slice.
fn hex_digest(bytes: &[u8]) -> String {
    let digest = Sha256::digest(bytes);
    digest
        .iter()
        .map(|byte| format!("{:02x}", byte))
        .collect()
}
