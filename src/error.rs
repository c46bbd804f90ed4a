//! Error types for the schedule renderer.
//!
//! Most rendering degrades are deliberately *not* errors (missing fonts,
//! malformed theme colors, unmeasurable strings all fall back silently);
//! the variants here cover the failures that must reach the caller.

/// Result type alias for schedule rendering operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur while building or exporting a schedule.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Font loading or embedding error
    #[error("Font error: {0}")]
    Font(String),

    /// PDF construction error
    #[error("PDF error: {0}")]
    Pdf(String),

    /// Image decoding or encoding error
    #[error("Image error: {0}")]
    Image(String),

    /// A schedule editing rule rejected the operation
    #[error("Schedule error: {0}")]
    Schedule(String),

    /// A single raster backend failed (collected, not user-facing)
    #[error("Raster backend '{backend}' failed: {message}")]
    Raster {
        /// Backend identifier ("tiny-skia", "ghostscript", "pdftoppm")
        backend: String,
        /// Underlying failure
        message: String,
    },

    /// Every raster backend failed
    #[error(
        "PNG rendering failed.\n\
         Fix options:\n\
         \x20 1) build with the `rendering` feature for the in-process rasterizer\n\
         \x20 2) or install Ghostscript (`gs`) on the host\n\
         \x20 3) or install poppler-utils (`pdftoppm`)\n\
         Tip: dpi 350-450 is usually plenty; larger requests may be auto-capped.\n\
         Last error: {backend}: {message}"
    )]
    RasterExhausted {
        /// Backend that produced the last error
        backend: String,
        /// The last backend's error text
        message: String,
    },
}

impl Error {
    /// Backend name of a raster failure, if this is one.
    pub fn raster_backend(&self) -> Option<&str> {
        match self {
            Error::Raster { backend, .. } | Error::RasterExhausted { backend, .. } => {
                Some(backend.as_str())
            },
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_font_error() {
        let err = Error::Font("DejaVu Sans not found".to_string());
        let msg = format!("{}", err);
        assert!(msg.contains("Font error"));
        assert!(msg.contains("DejaVu Sans"));
    }

    #[test]
    fn test_schedule_error() {
        let err = Error::Schedule("This cell is blocked.".to_string());
        let msg = format!("{}", err);
        assert!(msg.contains("blocked"));
    }

    #[test]
    fn test_raster_backend_error() {
        let err = Error::Raster {
            backend: "ghostscript".to_string(),
            message: "exit status 1".to_string(),
        };
        let msg = format!("{}", err);
        assert!(msg.contains("ghostscript"));
        assert!(msg.contains("exit status 1"));
        assert_eq!(err.raster_backend(), Some("ghostscript"));
    }

    #[test]
    fn test_raster_exhausted_names_remedies() {
        let err = Error::RasterExhausted {
            backend: "pdftoppm".to_string(),
            message: "No such file or directory".to_string(),
        };
        let msg = format!("{}", err);
        assert!(msg.contains("rendering"));
        assert!(msg.contains("Ghostscript"));
        assert!(msg.contains("poppler-utils"));
        assert!(msg.contains("pdftoppm: No such file or directory"));
    }

    #[test]
    fn test_io_error_from() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        let err: Error = io.into();
        assert!(format!("{}", err).contains("IO error"));
    }

    #[test]
    fn test_error_is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Error>();
    }
}
