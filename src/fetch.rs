//! Byte source handed to the viewer on load

use std::fs;
use std::path::Path;

use crate::error::{Result, ViewerError};

/// HTTP-response-like fetch result carrying the document bytes
#[derive(Clone, Debug)]
pub struct FetchResponse {
    status: u16,
    body: Vec<u8>,
}

impl FetchResponse {
    pub fn new(status: u16, body: Vec<u8>) -> Self {
        Self { status, body }
    }

    /// Successful response with the given body
    pub fn ok(body: Vec<u8>) -> Self {
        Self::new(200, body)
    }

    /// Read a local file as if it had been fetched
    pub fn from_path(path: &Path) -> Result<Self> {
        let body = fs::read(path)?;
        Ok(Self::ok(body))
    }

    pub fn status(&self) -> u16 {
        self.status
    }

    pub fn is_ok(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Consume the body, failing on a non-success status
    pub fn into_bytes(self) -> Result<Vec<u8>> {
        if !self.is_ok() {
            return Err(ViewerError::HttpError {
                status: self.status,
            });
        }
        Ok(self.body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn non_success_status_is_rejected() {
        let err = FetchResponse::new(503, b"%PDF".to_vec())
            .into_bytes()
            .unwrap_err();
        assert!(matches!(err, ViewerError::HttpError { status: 503 }));
    }

    #[test]
    fn success_range_is_2xx() {
        assert!(FetchResponse::new(204, Vec::new()).is_ok());
        assert!(!FetchResponse::new(304, Vec::new()).is_ok());
    }

    #[test]
    fn reads_file_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("doc.pdf");
        fs::write(&path, b"%PDF-1.7").unwrap();

        let bytes = FetchResponse::from_path(&path).unwrap().into_bytes().unwrap();
        assert_eq!(bytes, b"%PDF-1.7");
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = FetchResponse::from_path(Path::new("/definitely/not/here.pdf")).unwrap_err();
        assert!(matches!(err, ViewerError::Io(_)));
    }
}
