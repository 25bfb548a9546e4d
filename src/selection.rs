use std::{io::Cursor, path::Path};

use bytes::Bytes;
use image::{ImageFormat, ImageReader};

use crate::{
    constants::{DICOM_CONTENT_TYPE, FALLBACK_CONTENT_TYPE},
    error::LoadError,
};

/// A user-chosen image blob.
///
/// Any file is accepted as-is; the content type is only sniffed so the
/// multipart part can be labelled, never to reject input.
#[derive(Debug, Clone, PartialEq)]
pub struct SelectedImage {
    file_name: String,
    content_type: String,
    bytes: Bytes,
}

impl SelectedImage {
    pub fn new(
        file_name: impl Into<String>,
        content_type: Option<&str>,
        bytes: impl Into<Bytes>,
    ) -> Self {
        let file_name = file_name.into();
        let bytes = bytes.into();
        let content_type = match content_type {
            Some(declared) if !declared.trim().is_empty() => declared.trim().to_string(),
            _ => sniff_content_type(&file_name, &bytes).to_string(),
        };

        Self {
            file_name,
            content_type,
            bytes,
        }
    }

    pub fn from_path(path: impl AsRef<Path>, content_type: Option<&str>) -> Result<Self, LoadError> {
        let path = path.as_ref();
        let bytes = std::fs::read(path).map_err(|source| LoadError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());

        Ok(Self::new(file_name, content_type, bytes))
    }

    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    pub fn content_type(&self) -> &str {
        &self.content_type
    }

    pub fn bytes(&self) -> &Bytes {
        &self.bytes
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Pixel dimensions read from the image header, if it is a raster format
    /// the `image` crate understands.
    pub fn dimensions(&self) -> Option<(u32, u32)> {
        ImageReader::new(Cursor::new(self.bytes.as_ref()))
            .with_guessed_format()
            .ok()?
            .into_dimensions()
            .ok()
    }
}

fn sniff_content_type(file_name: &str, bytes: &[u8]) -> &'static str {
    if let Ok(format) = image::guess_format(bytes) {
        return format.to_mime_type();
    }
    if is_dicom(bytes) {
        return DICOM_CONTENT_TYPE;
    }

    let extension = Path::new(file_name)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase);
    match extension.as_deref() {
        Some("dcm" | "dicom") => DICOM_CONTENT_TYPE,
        Some(ext) => ImageFormat::from_extension(ext)
            .map(|f| f.to_mime_type())
            .unwrap_or(FALLBACK_CONTENT_TYPE),
        None => FALLBACK_CONTENT_TYPE,
    }
}

// DICOM part 10 files carry a 128-byte preamble followed by "DICM".
fn is_dicom(bytes: &[u8]) -> bool {
    bytes.get(128..132) == Some(b"DICM".as_slice())
}
