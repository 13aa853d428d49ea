//! File I/O error types used by the command-line front end.

/// Kinds of file errors.
#[derive(Debug, Clone, PartialEq, Eq, Hash, derive_more::Display)]
pub enum FileErrorKind {
    /// Failed to read an input file
    #[display("Failed to read {}: {}", path, reason)]
    Read {
        /// Path that was read
        path: String,
        /// Underlying I/O error
        reason: String,
    },
    /// Failed to write an output file
    #[display("Failed to write {}: {}", path, reason)]
    Write {
        /// Path that was written
        path: String,
        /// Underlying I/O error
        reason: String,
    },
}

/// File error with location tracking.
///
/// # Examples
///
/// ```
/// use fablewright_error::{FileError, FileErrorKind};
///
/// let err = FileError::new(FileErrorKind::Read {
///     path: "story.txt".into(),
///     reason: "No such file or directory".into(),
/// });
/// assert!(format!("{}", err).contains("Failed to read story.txt"));
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("File Error: {} at line {} in {}", kind, line, file)]
pub struct FileError {
    /// The kind of error that occurred
    pub kind: FileErrorKind,
    /// Line number where error was created
    pub line: u32,
    /// File where error was created
    pub file: &'static str,
}

impl FileError {
    /// Create a new file error with automatic location tracking.
    #[track_caller]
    pub fn new(kind: FileErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }
}
