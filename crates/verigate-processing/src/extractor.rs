//! Type dispatch for metadata extraction

use verigate_core::models::NormalizedMetadata;

use crate::{image_reader, video_reader};

/// Dispatches raw files to format-specific readers by declared media type.
///
/// `extract` never fails: any file whose media type does not match `image/*`
/// or `video/*`, or whose contents cannot be read, yields a record with
/// `kind: unknown` and no other fields populated.
#[derive(Debug, Clone)]
pub struct MetadataExtractor {
    ffprobe_path: String,
}

impl MetadataExtractor {
    pub fn new(ffprobe_path: impl Into<String>) -> Self {
        Self {
            ffprobe_path: ffprobe_path.into(),
        }
    }

    #[tracing::instrument(skip(self, data), fields(size = data.len()))]
    pub async fn extract(
        &self,
        filename: &str,
        content_type: &str,
        data: &[u8],
    ) -> NormalizedMetadata {
        let content_type = content_type.to_ascii_lowercase();
        if content_type.starts_with("image/") {
            self.extract_image(data).await
        } else if content_type.starts_with("video/") {
            video_reader::read_video_metadata(&self.ffprobe_path, data)
                .await
                .unwrap_or_else(NormalizedMetadata::unknown)
        } else {
            tracing::debug!(content_type, "Unsupported media type");
            NormalizedMetadata::unknown()
        }
    }

    async fn extract_image(&self, data: &[u8]) -> NormalizedMetadata {
        // EXIF + pixel decode are CPU-bound; keep them off the async runtime.
        let owned = data.to_vec();
        match tokio::task::spawn_blocking(move || image_reader::read_image_metadata(&owned)).await
        {
            Ok(Some(meta)) => meta,
            Ok(None) => NormalizedMetadata::unknown(),
            Err(e) => {
                tracing::warn!(error = %e, "Image metadata task failed");
                NormalizedMetadata::unknown()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;
    use verigate_core::models::MediaKind;

    fn extractor() -> MetadataExtractor {
        MetadataExtractor::new("ffprobe")
    }

    #[tokio::test]
    async fn foreign_media_types_yield_unknown() {
        let meta = extractor().extract("notes.txt", "text/plain", b"hello").await;
        assert_eq!(meta.kind, MediaKind::Unknown);
        assert!(meta.resolution.is_none());
    }

    #[tokio::test]
    async fn unreadable_image_bytes_yield_unknown() {
        let meta = extractor()
            .extract("broken.jpg", "image/jpeg", b"\xff\xd8 nope")
            .await;
        assert_eq!(meta.kind, MediaKind::Unknown);
    }

    #[tokio::test]
    async fn decodable_image_is_classified() {
        let img = image::RgbaImage::new(3, 5);
        let mut out = Cursor::new(Vec::new());
        image::DynamicImage::ImageRgba8(img)
            .write_to(&mut out, image::ImageFormat::Png)
            .expect("encode png");

        let meta = extractor()
            .extract("tall.png", "image/png", out.get_ref())
            .await;
        assert_eq!(meta.kind, MediaKind::Image);
        assert_eq!(meta.resolution.map(|r| (r.width, r.height)), Some((3, 5)));
    }

    #[tokio::test]
    async fn content_type_matching_is_case_insensitive() {
        let meta = extractor().extract("clip.mp4", "VIDEO/mp4", b"junk").await;
        // junk bytes: probe fails, degrades to unknown rather than erroring
        assert_eq!(meta.kind, MediaKind::Unknown);
    }
}
