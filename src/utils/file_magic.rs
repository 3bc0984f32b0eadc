/// Checks that the magic bytes of an uploaded file match its extension.
///
/// Only the formats accepted for essay images are recognized; anything
/// else is rejected.
///
/// # Arguments
/// * `data` - the first bytes of the file content
/// * `extension` - file extension including the dot, e.g. ".png"
pub fn validate_magic_bytes(data: &[u8], extension: &str) -> bool {
    if data.is_empty() {
        return false;
    }

    match extension.to_lowercase().as_str() {
        ".png" => data.starts_with(&[0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A]),
        ".jpg" | ".jpeg" => data.starts_with(&[0xFF, 0xD8, 0xFF]),
        ".pdf" => data.starts_with(b"%PDF"),

        // Unknown formats are rejected outright
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_png_magic() {
        let png_header = [0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A];
        assert!(validate_magic_bytes(&png_header, ".png"));
        assert!(validate_magic_bytes(&png_header, ".PNG"));
        assert!(!validate_magic_bytes(&png_header, ".jpg"));
    }

    #[test]
    fn test_jpeg_magic() {
        let jpeg_header = [0xFF, 0xD8, 0xFF, 0xE0];
        assert!(validate_magic_bytes(&jpeg_header, ".jpg"));
        assert!(validate_magic_bytes(&jpeg_header, ".jpeg"));
        assert!(!validate_magic_bytes(&jpeg_header, ".png"));
    }

    #[test]
    fn test_pdf_magic() {
        let pdf_header = b"%PDF-1.4";
        assert!(validate_magic_bytes(pdf_header, ".pdf"));
        assert!(!validate_magic_bytes(pdf_header, ".png"));
    }

    #[test]
    fn test_empty_data() {
        assert!(!validate_magic_bytes(&[], ".png"));
        assert!(!validate_magic_bytes(&[], ".pdf"));
    }

    #[test]
    fn test_unknown_extension() {
        let data = [0x00, 0x01, 0x02, 0x03];
        assert!(!validate_magic_bytes(&data, ".exe"));
        assert!(!validate_magic_bytes(&data, ".gif"));
    }
}
