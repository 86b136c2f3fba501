use crate::errors::ServerError;
use mime::Mime;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::warn;

/// Attachments below this size are noise (empty recordings, stray clicks)
/// and never reach the model or the disk.
pub const MIN_EVIDENCE_BYTES: usize = 1000;

/// An uploaded piece of evidence: site photo, audio memo, document scan.
#[derive(Debug, Clone)]
pub struct EvidenceAttachment {
    pub file_name: String,
    pub media_type: Mime,
    pub bytes: Vec<u8>,
}

impl EvidenceAttachment {
    /// Builds an attachment from an upload, trusting the declared content
    /// type when present and falling back to the file extension.
    pub fn from_upload(
        file_name: impl Into<String>,
        content_type: Option<&str>,
        bytes: Vec<u8>,
    ) -> Self {
        let file_name = file_name.into();
        let media_type = content_type
            .and_then(|ct| ct.parse().ok())
            .unwrap_or_else(|| media_type_for(&file_name));
        Self {
            file_name,
            media_type,
            bytes,
        }
    }

    pub fn is_substantial(&self) -> bool {
        self.bytes.len() >= MIN_EVIDENCE_BYTES
    }
}

/// Media type from a file extension; octet-stream when unknown.
pub fn media_type_for(file_name: &str) -> Mime {
    let ext = Path::new(file_name)
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase());

    match ext.as_deref() {
        Some("png") => mime::IMAGE_PNG,
        Some("jpg") | Some("jpeg") => mime::IMAGE_JPEG,
        Some("gif") => mime::IMAGE_GIF,
        Some("webp") => "image/webp".parse().unwrap_or(mime::APPLICATION_OCTET_STREAM),
        Some("wav") => "audio/wav".parse().unwrap_or(mime::APPLICATION_OCTET_STREAM),
        Some("mp3") => "audio/mpeg".parse().unwrap_or(mime::APPLICATION_OCTET_STREAM),
        Some("m4a") => "audio/mp4".parse().unwrap_or(mime::APPLICATION_OCTET_STREAM),
        Some("pdf") => mime::APPLICATION_PDF,
        _ => mime::APPLICATION_OCTET_STREAM,
    }
}

// Uploaded names double as disk names, so anything that could walk out of
// the property directory is refused outright.
fn is_safe_name(name: &str) -> bool {
    !name.is_empty() && !name.contains('/') && !name.contains('\\') && !name.contains("..")
}

/// On-disk home for saved evidence, one directory per property.
#[derive(Debug, Clone)]
pub struct EvidenceVault {
    root: PathBuf,
}

impl EvidenceVault {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn property_dir(&self, property_id: i64) -> PathBuf {
        self.root.join(property_id.to_string())
    }

    /// Writes an attachment under the property's directory. Same-named
    /// uploads overwrite the earlier file.
    pub fn store(
        &self,
        property_id: i64,
        attachment: &EvidenceAttachment,
    ) -> Result<PathBuf, ServerError> {
        if !is_safe_name(&attachment.file_name) {
            return Err(ServerError::BadRequest(format!(
                "unusable evidence file name: {:?}",
                attachment.file_name
            )));
        }

        let dir = self.property_dir(property_id);
        fs::create_dir_all(&dir).map_err(|e| ServerError::IoError(e.to_string()))?;

        let path = dir.join(&attachment.file_name);
        fs::write(&path, &attachment.bytes).map_err(|e| ServerError::IoError(e.to_string()))?;
        Ok(path)
    }

    /// Stored file names for a property, sorted. Missing directory reads as
    /// no evidence.
    pub fn list(&self, property_id: i64) -> Vec<String> {
        let dir = self.property_dir(property_id);
        let entries = match fs::read_dir(&dir) {
            Ok(entries) => entries,
            Err(_) => return Vec::new(),
        };

        let mut names: Vec<String> = entries
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.path().is_file())
            .filter_map(|entry| entry.file_name().into_string().ok())
            .collect();
        names.sort();
        names
    }

    /// Reads one stored file back, with its media type re-derived from the
    /// extension. Unknown or unsafe names read as absent.
    pub fn open(&self, property_id: i64, name: &str) -> Option<(Vec<u8>, Mime)> {
        if !is_safe_name(name) {
            return None;
        }
        let path = self.property_dir(property_id).join(name);
        match fs::read(&path) {
            Ok(bytes) => Some((bytes, media_type_for(name))),
            Err(e) => {
                if e.kind() != std::io::ErrorKind::NotFound {
                    warn!("evidence read failed for {}: {e}", path.display());
                }
                None
            }
        }
    }
}
