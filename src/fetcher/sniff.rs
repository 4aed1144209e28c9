//! Image format detection from payload bytes.

/// PNG file signature
const PNG_SIGNATURE: &[u8] = &[0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A];
/// JPEG start-of-image marker
const JPEG_SIGNATURE: &[u8] = &[0xFF, 0xD8];
/// GIF87a / GIF89a prefix
const GIF_SIGNATURE: &[u8] = b"GIF";
/// WEBP marker inside the RIFF container header
const WEBP_MARKER: &[u8] = b"WEBP";
/// Offset of [`WEBP_MARKER`] (after "RIFF" and the 4-byte chunk size)
const WEBP_MARKER_OFFSET: usize = 8;

/// Image formats recognised by their leading bytes
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ImageFormat {
    /// Portable Network Graphics
    Png,
    /// JPEG, also the fallback for unrecognised payloads
    Jpeg,
    /// Graphics Interchange Format
    Gif,
    /// WebP
    Webp,
}

impl ImageFormat {
    /// Detect the format of `content`; unknown payloads are treated as JPEG
    pub fn detect(content: &[u8]) -> Self {
        if content.starts_with(PNG_SIGNATURE) {
            ImageFormat::Png
        } else if content.starts_with(JPEG_SIGNATURE) {
            ImageFormat::Jpeg
        } else if content.starts_with(GIF_SIGNATURE) {
            ImageFormat::Gif
        } else if content
            .get(WEBP_MARKER_OFFSET..WEBP_MARKER_OFFSET + WEBP_MARKER.len())
            .is_some_and(|marker| marker == WEBP_MARKER)
        {
            ImageFormat::Webp
        } else {
            ImageFormat::Jpeg
        }
    }

    /// File extension, without the dot
    pub fn extension(&self) -> &'static str {
        match self {
            ImageFormat::Png => "png",
            ImageFormat::Jpeg => "jpg",
            ImageFormat::Gif => "gif",
            ImageFormat::Webp => "webp",
        }
    }
}

/// File extension for an image payload, ignoring whatever its URL claims
pub fn detect_image_extension(content: &[u8]) -> &'static str {
    ImageFormat::detect(content).extension()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detects_png() {
        let mut content = b"\x89PNG\r\n\x1A\n".to_vec();
        content.extend_from_slice(b"fake content");
        assert_eq!(detect_image_extension(&content), "png");
    }

    #[test]
    fn detects_jpg() {
        assert_eq!(detect_image_extension(b"\xFF\xD8fake content"), "jpg");
    }

    #[test]
    fn detects_gif() {
        assert_eq!(detect_image_extension(b"GIF89a"), "gif");
        assert_eq!(detect_image_extension(b"GIF87a..."), "gif");
    }

    #[test]
    fn detects_webp_marker_at_offset_eight() {
        assert_eq!(detect_image_extension(b"RIFF1234WEBP"), "webp");
        assert_eq!(detect_image_extension(b"RIFF\x00\x00\x00\x00WEBPVP8 "), "webp");
    }

    #[test]
    fn webp_marker_elsewhere_is_not_webp() {
        assert_eq!(detect_image_extension(b"WEBP1234RIFF"), "jpg");
        assert_eq!(detect_image_extension(b"RIFF123WEBP"), "jpg");
    }

    #[test]
    fn unknown_and_short_payloads_default_to_jpg() {
        assert_eq!(detect_image_extension(b"unknown format"), "jpg");
        assert_eq!(detect_image_extension(b""), "jpg");
        assert_eq!(detect_image_extension(b"\x89PNG"), "jpg", "truncated PNG signature");
        assert_eq!(detect_image_extension(b"\xFF"), "jpg");
    }

    #[test]
    fn partial_png_signature_does_not_match() {
        assert_eq!(ImageFormat::detect(b"\x89PNG\r\n\x1A\x00rest"), ImageFormat::Jpeg);
    }
}
