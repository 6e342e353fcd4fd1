//! Image loading and encoding: file on disk → [`SourceImage`] → base64.
//!
//! The bytes are read once and reused: the AI request attaches them as an
//! [`ImageData`] and the publisher uploads the same bytes, so the pin shows
//! exactly what the model read.
//! The format is sniffed from the content rather than the extension, so a
//! PNG saved as `.jpg` still gets the right MIME type on the AI request.

use crate::error::VersePinError;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use edgequake_llm::ImageData;
use image::{ImageFormat, ImageReader};
use serde::{Deserialize, Serialize};
use std::io::Cursor;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Basic facts about a loaded image.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageInfo {
    /// "JPEG" or "PNG".
    pub format: String,
    pub width: u32,
    pub height: u32,
    pub size_bytes: u64,
}

impl ImageInfo {
    /// File size for display, e.g. "512.0 KB" or "1.4 MB".
    pub fn formatted_size(&self) -> String {
        let kb = self.size_bytes as f64 / 1024.0;
        let mb = kb / 1024.0;
        if mb > 1.0 {
            format!("{mb:.1} MB")
        } else {
            format!("{kb:.1} KB")
        }
    }
}

/// An image read from disk and ready to send.
#[derive(Debug, Clone)]
pub struct SourceImage {
    pub path: PathBuf,
    pub bytes: Vec<u8>,
    pub mime_type: &'static str,
    pub info: ImageInfo,
}

impl SourceImage {
    /// Base64 attachment for the vision request.
    pub fn to_image_data(&self) -> ImageData {
        ImageData::new(encode_base64(&self.bytes), self.mime_type).with_detail("high")
    }
}

/// Read and sniff an image file.
///
/// Fails with [`VersePinError::ImageRead`] when the file is missing,
/// unreadable, empty, or not a JPEG/PNG.
pub async fn load_image(path: impl AsRef<Path>) -> Result<SourceImage, VersePinError> {
    let path = path.as_ref();
    let bytes = tokio::fs::read(path).await.map_err(|e| VersePinError::ImageRead {
        path: path.to_path_buf(),
        detail: match e.kind() {
            std::io::ErrorKind::NotFound => "Image file not found".into(),
            _ => e.to_string(),
        },
    })?;
    image_from_bytes(path, bytes)
}

/// Sniff bytes already in memory. `path` is kept for display only.
pub fn image_from_bytes(
    path: impl AsRef<Path>,
    bytes: Vec<u8>,
) -> Result<SourceImage, VersePinError> {
    let path = path.as_ref();
    let read_err = |detail: String| VersePinError::ImageRead {
        path: path.to_path_buf(),
        detail,
    };

    if bytes.is_empty() {
        return Err(read_err("file is empty".into()));
    }

    let (format, width, height) = sniff_dimensions(&bytes).map_err(read_err)?;
    let mime_type = match format {
        ImageFormat::Png => "image/png",
        _ => "image/jpeg",
    };

    let info = ImageInfo {
        format: format!("{format:?}").to_uppercase(),
        width,
        height,
        size_bytes: bytes.len() as u64,
    };
    debug!(
        "Loaded {} ({} {}x{}, {})",
        path.display(),
        info.format,
        width,
        height,
        info.formatted_size()
    );

    Ok(SourceImage {
        path: path.to_path_buf(),
        bytes,
        mime_type,
        info,
    })
}

/// Detect the format and read the dimensions without decoding pixels.
fn sniff_dimensions(bytes: &[u8]) -> Result<(ImageFormat, u32, u32), String> {
    let reader = ImageReader::new(Cursor::new(bytes))
        .with_guessed_format()
        .map_err(|e| e.to_string())?;
    let format = match reader.format() {
        Some(f @ (ImageFormat::Jpeg | ImageFormat::Png)) => f,
        Some(other) => return Err(format!("unsupported image format {other:?} (expected JPEG or PNG)")),
        None => return Err("not a recognised image".into()),
    };
    let (width, height) = reader.into_dimensions().map_err(|e| e.to_string())?;
    Ok((format, width, height))
}

/// Standard base64 of raw bytes.
pub fn encode_base64(bytes: &[u8]) -> String {
    let b64 = STANDARD.encode(bytes);
    debug!("Encoded image → {} bytes base64", b64.len());
    b64
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgb, RgbImage};

    fn write_png(dir: &Path, name: &str, w: u32, h: u32) -> PathBuf {
        let path = dir.join(name);
        RgbImage::from_pixel(w, h, Rgb([200, 30, 30]))
            .save_with_format(&path, ImageFormat::Png)
            .expect("write png");
        path
    }

    #[tokio::test]
    async fn load_png_sniffs_format_and_size() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_png(dir.path(), "verse.png", 12, 7);
        let img = load_image(&path).await.expect("load should succeed");
        assert_eq!(img.mime_type, "image/png");
        assert_eq!(img.info.format, "PNG");
        assert_eq!((img.info.width, img.info.height), (12, 7));
        assert_eq!(img.info.size_bytes, img.bytes.len() as u64);
    }

    #[tokio::test]
    async fn load_jpeg_named_by_content_not_extension() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("card.png");
        RgbImage::from_pixel(8, 8, Rgb([0, 0, 0]))
            .save_with_format(&path, ImageFormat::Jpeg)
            .unwrap();
        let img = load_image(&path).await.unwrap();
        assert_eq!(img.mime_type, "image/jpeg");
        assert_eq!(img.info.format, "JPEG");
    }

    #[tokio::test]
    async fn missing_file_is_image_read_error() {
        let err = load_image("/definitely/not/here.jpg").await.unwrap_err();
        assert!(matches!(err, VersePinError::ImageRead { .. }), "got: {err:?}");
        assert!(err.to_string().contains("not found"));
    }

    #[tokio::test]
    async fn non_image_bytes_are_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("notes.jpg");
        std::fs::write(&path, b"just some text, not pixels").unwrap();
        let err = load_image(&path).await.unwrap_err();
        assert!(matches!(err, VersePinError::ImageRead { .. }));
    }

    #[tokio::test]
    async fn empty_file_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("empty.jpg");
        std::fs::write(&path, b"").unwrap();
        let err = load_image(&path).await.unwrap_err();
        assert!(err.to_string().contains("empty"));
    }

    #[test]
    fn bytes_in_memory_need_no_file() {
        let mut bytes = Vec::new();
        RgbImage::from_pixel(3, 5, Rgb([1, 2, 3]))
            .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
            .unwrap();
        let img = image_from_bytes("/not/on/disk.png", bytes).unwrap();
        assert_eq!(img.mime_type, "image/png");
        assert_eq!((img.info.width, img.info.height), (3, 5));
        assert_eq!(img.path, PathBuf::from("/not/on/disk.png"));
    }

    #[test]
    fn base64_roundtrip() {
        let encoded = encode_base64(b"\xff\xd8\xff\xe0");
        assert_eq!(encoded, "/9j/4A==");
        assert_eq!(STANDARD.decode(&encoded).unwrap(), b"\xff\xd8\xff\xe0");
    }

    #[tokio::test]
    async fn image_data_carries_mime_type() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_png(dir.path(), "v.png", 4, 4);
        let data = load_image(&path).await.unwrap().to_image_data();
        assert_eq!(data.mime_type, "image/png");
        assert!(!data.data.is_empty());
    }

    #[test]
    fn formatted_size_switches_units() {
        let mut info = ImageInfo {
            format: "PNG".into(),
            width: 1,
            height: 1,
            size_bytes: 2048,
        };
        assert_eq!(info.formatted_size(), "2.0 KB");
        info.size_bytes = 3 * 1024 * 1024;
        assert_eq!(info.formatted_size(), "3.0 MB");
    }
}
