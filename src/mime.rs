//! Content-type sniffing for upload payloads.

/// Detect the MIME type from magic bytes, falling back to the file extension.
pub fn detect_image_mime(bytes: &[u8], extension: Option<&str>) -> &'static str {
    match bytes {
        [0xFF, 0xD8, 0xFF, ..] => "image/jpeg",
        [0x89, 0x50, 0x4E, 0x47, ..] => "image/png",
        [0x47, 0x49, 0x46, 0x38, ..] => "image/gif",
        [0x52, 0x49, 0x46, 0x46, _, _, _, _, 0x57, 0x45, 0x42, 0x50, ..] => "image/webp",
        _ => mime_from_extension(extension).unwrap_or_else(|| {
            tracing::warn!(
                "Unrecognized image format (first 4 bytes: {:02X?}), falling back to application/octet-stream",
                &bytes[..bytes.len().min(4)]
            );
            "application/octet-stream"
        }),
    }
}

fn mime_from_extension(extension: Option<&str>) -> Option<&'static str> {
    match extension?.to_ascii_lowercase().as_str() {
        "jpg" | "jpeg" => Some("image/jpeg"),
        "png" => Some("image/png"),
        "gif" => Some("image/gif"),
        "webp" => Some("image/webp"),
        "svg" => Some("image/svg+xml"),
        "avif" => Some("image/avif"),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detect_png() {
        assert_eq!(
            detect_image_mime(&[0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A], None),
            "image/png"
        );
    }

    #[test]
    fn test_detect_jpeg() {
        assert_eq!(
            detect_image_mime(&[0xFF, 0xD8, 0xFF, 0xE0], Some("png")),
            "image/jpeg"
        );
    }

    #[test]
    fn test_detect_webp() {
        assert_eq!(
            detect_image_mime(
                &[0x52, 0x49, 0x46, 0x46, 0x00, 0x00, 0x00, 0x00, 0x57, 0x45, 0x42, 0x50],
                None
            ),
            "image/webp"
        );
    }

    #[test]
    fn test_svg_falls_back_to_extension() {
        assert_eq!(detect_image_mime(b"<svg></svg>", Some("SVG")), "image/svg+xml");
    }

    #[test]
    fn test_unknown_falls_back_to_octet_stream() {
        assert_eq!(
            detect_image_mime(&[0x00, 0x01, 0x02, 0x03], Some("bin")),
            "application/octet-stream"
        );
        assert_eq!(detect_image_mime(&[], None), "application/octet-stream");
    }
}
