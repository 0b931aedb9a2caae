//! Error types for the parsing and interpreter layers.
//!
//! [`BackendError`] is derived with [`thiserror`] and converts into the
//! core [`PdfError`].

use bingo_core::PdfError;
use thiserror::Error;

/// Error type for PDF parsing backend operations.
#[derive(Debug, Error)]
pub enum BackendError {
    /// Error from PDF parsing (structure, syntax, object resolution).
    #[error("PDF parse error: {0}")]
    Parse(String),

    /// Error reading PDF data.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Error resolving font or encoding information.
    #[error("font error: {0}")]
    Font(String),

    /// Error during content stream interpretation.
    #[error("interpreter error: {0}")]
    Interpreter(String),

    /// A core library error.
    #[error(transparent)]
    Core(#[from] PdfError),
}

impl From<BackendError> for PdfError {
    fn from(err: BackendError) -> Self {
        match err {
            BackendError::Parse(msg) => PdfError::ParseError(msg),
            BackendError::Io(e) => PdfError::IoError(e.to_string()),
            BackendError::Font(msg) => PdfError::FontError(msg),
            BackendError::Interpreter(msg) => PdfError::InterpreterError(msg),
            BackendError::Core(e) => e,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages() {
        let err = BackendError::Parse("invalid xref table".to_string());
        assert_eq!(err.to_string(), "PDF parse error: invalid xref table");
        let err = BackendError::Interpreter("bad operand".to_string());
        assert_eq!(err.to_string(), "interpreter error: bad operand");
    }

    #[test]
    fn io_errors_convert() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file missing");
        let err: BackendError = io_err.into();
        assert!(matches!(err, BackendError::Io(_)));
        let pdf: PdfError = err.into();
        assert!(matches!(pdf, PdfError::IoError(ref m) if m.contains("file missing")));
    }

    #[test]
    fn core_errors_pass_through() {
        let core = PdfError::PageOutOfRange { index: 3, count: 1 };
        let err: BackendError = core.clone().into();
        assert_eq!(err.to_string(), core.to_string());
        assert_eq!(PdfError::from(err), core);
    }

    #[test]
    fn variants_map_onto_pdf_error() {
        assert_eq!(
            PdfError::from(BackendError::Parse("x".into())),
            PdfError::ParseError("x".into())
        );
        assert_eq!(
            PdfError::from(BackendError::Font("y".into())),
            PdfError::FontError("y".into())
        );
    }
}
