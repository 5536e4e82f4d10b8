//! Incoming file gate
//!
//! Accepts or rejects a file by name and declared MIME type. Size is enforced by the
//! transfer layer, which knows how many bytes actually arrived.

/// MIME types the marketing platform accepts for creative media
pub const ALLOWED_MIME_TYPES: [&str; 5] = [
    "image/png",
    "image/jpeg",
    "video/mp4",
    "video/quicktime",
    "video/H264",
];

/// Strip parameters (`; charset=...`) and surrounding whitespace from a content type.
pub fn normalize_mime_type(content_type: &str) -> &str {
    content_type
        .split(';')
        .next()
        .unwrap_or(content_type)
        .trim()
}

#[derive(Debug, Clone)]
pub struct FileValidator {
    allowed_mime_types: Vec<String>,
}

impl Default for FileValidator {
    fn default() -> Self {
        Self::new(ALLOWED_MIME_TYPES.iter().map(|s| s.to_string()).collect())
    }
}

impl FileValidator {
    pub fn new(allowed_mime_types: Vec<String>) -> Self {
        Self { allowed_mime_types }
    }

    /// True when `file_name` is non-empty and `mime_type` is on the allow-list.
    pub fn validate(&self, file_name: &str, mime_type: &str) -> bool {
        if file_name.trim().is_empty() {
            return false;
        }
        let mime_type = normalize_mime_type(mime_type);
        self.allowed_mime_types
            .iter()
            .any(|allowed| allowed.eq_ignore_ascii_case(mime_type))
    }

    pub fn allowed_mime_types(&self) -> &[String] {
        &self.allowed_mime_types
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_every_allowed_type() {
        let validator = FileValidator::default();
        for mime_type in ALLOWED_MIME_TYPES {
            assert!(
                validator.validate("creative.bin", mime_type),
                "{} should be accepted",
                mime_type
            );
        }
    }

    #[test]
    fn rejects_disallowed_types_regardless_of_name() {
        let validator = FileValidator::default();
        assert!(!validator.validate("report.pdf", "text/pdf"));
        assert!(!validator.validate("image.png", "text/pdf"));
        assert!(!validator.validate("clip.gif", "image/gif"));
    }

    #[test]
    fn rejects_empty_file_name() {
        let validator = FileValidator::default();
        assert!(!validator.validate("", "image/png"));
        assert!(!validator.validate("   ", "image/png"));
    }

    #[test]
    fn ignores_parameters_and_case() {
        let validator = FileValidator::default();
        assert!(validator.validate("clip.h264", "video/h264"));
        assert!(validator.validate("photo.jpg", "image/jpeg; charset=binary"));
    }
}
