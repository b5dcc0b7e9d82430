//! Resume upload checks.

use crate::core::error::{AppError, Result};
use crate::shared::constants::{MAX_RESUME_SIZE, RESUME_CONTENT_TYPE};

const PDF_MAGIC: &[u8] = b"%PDF-";

/// Accept a PDF of at most `MAX_RESUME_SIZE` bytes.
///
/// The declared type (content type or `.pdf` extension) must claim PDF and
/// the bytes must start with the PDF header.
pub fn validate_resume(
    file_name: Option<&str>,
    content_type: Option<&str>,
    data: &[u8],
) -> Result<()> {
    if data.is_empty() {
        return Err(AppError::BadRequest("The uploaded file is empty.".to_string()));
    }

    if data.len() > MAX_RESUME_SIZE {
        return Err(AppError::BadRequest(format!(
            "Resume must be at most {} MB.",
            MAX_RESUME_SIZE / (1024 * 1024)
        )));
    }

    let declared_pdf = content_type
        .map(|ct| ct.eq_ignore_ascii_case(RESUME_CONTENT_TYPE))
        .unwrap_or(false)
        || file_name
            .map(|name| name.to_ascii_lowercase().ends_with(".pdf"))
            .unwrap_or(false);

    if !declared_pdf || !data.starts_with(PDF_MAGIC) {
        return Err(AppError::BadRequest(
            "Only PDF resumes are accepted.".to_string(),
        ));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const PDF: &[u8] = b"%PDF-1.7\n%\xe2\xe3\xcf\xd3\n1 0 obj";

    #[test]
    fn test_pdf_by_content_type_or_extension() {
        assert!(validate_resume(None, Some("application/pdf"), PDF).is_ok());
        assert!(validate_resume(Some("CV.PDF"), Some("application/octet-stream"), PDF).is_ok());
    }

    #[test]
    fn test_non_pdf_is_rejected() {
        assert!(validate_resume(Some("cv.docx"), Some("application/msword"), PDF).is_err());
        assert!(validate_resume(Some("cv.pdf"), Some("application/pdf"), b"PK\x03\x04").is_err());
    }

    #[test]
    fn test_empty_and_oversized_files_are_rejected() {
        assert!(validate_resume(Some("cv.pdf"), None, b"").is_err());

        let mut big = PDF.to_vec();
        big.resize(MAX_RESUME_SIZE + 1, b' ');
        assert!(matches!(
            validate_resume(Some("cv.pdf"), None, &big),
            Err(AppError::BadRequest(_))
        ));
    }
}
