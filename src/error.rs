//! Error handling for the parsort utility

use std::io;
use thiserror::Error;

/// Custom error type for sort operations
#[derive(Error, Debug)]
pub enum SortError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("Permission denied: {file}")]
    PermissionDenied { file: String },

    #[error("No such file or directory: {file}")]
    FileNotFound { file: String },

    #[error("Is a directory: {file}")]
    IsDirectory { file: String },

    #[error("Missing required argument: {name}")]
    MissingArgument { name: String },

    #[error("Invalid threshold: {value}")]
    InvalidThreshold { value: String },

    #[error("Invalid thread count: {message}")]
    InvalidThreadCount { message: String },

    #[error("Invalid merge strategy: {name}")]
    InvalidMergeStrategy { name: String },

    #[error("Thread pool error: {message}")]
    ThreadPoolError { message: String },

    #[error("Write error: {0}")]
    Output(#[source] io::Error),
}

impl SortError {
    /// Returns the appropriate exit code for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            SortError::FileNotFound { .. } => crate::FILE_NOT_FOUND,

            SortError::PermissionDenied { .. }
            | SortError::IsDirectory { .. }
            | SortError::Io(_) => crate::SOURCE_FILE_READ_ERROR,

            SortError::ThreadPoolError { .. } => crate::INTERNAL_FAILURE,

            SortError::Output(_) => crate::OUTPUT_WRITE_ERROR,

            SortError::MissingArgument { .. }
            | SortError::InvalidThreshold { .. }
            | SortError::InvalidThreadCount { .. }
            | SortError::InvalidMergeStrategy { .. } => crate::INSUFFICIENT_ARGUMENTS,
        }
    }

    /// Create a permission denied error
    pub fn permission_denied(file: &str) -> Self {
        SortError::PermissionDenied {
            file: file.to_string(),
        }
    }

    /// Create a file not found error
    pub fn file_not_found(file: &str) -> Self {
        SortError::FileNotFound {
            file: file.to_string(),
        }
    }

    /// Create an is directory error
    pub fn is_directory(file: &str) -> Self {
        SortError::IsDirectory {
            file: file.to_string(),
        }
    }

    pub fn missing_argument(name: &str) -> Self {
        SortError::MissingArgument {
            name: name.to_string(),
        }
    }

    pub fn invalid_threshold(value: &str) -> Self {
        SortError::InvalidThreshold {
            value: value.to_string(),
        }
    }

    pub fn invalid_thread_count(message: &str) -> Self {
        SortError::InvalidThreadCount {
            message: message.to_string(),
        }
    }

    pub fn invalid_merge_strategy(name: &str) -> Self {
        SortError::InvalidMergeStrategy {
            name: name.to_string(),
        }
    }

    /// Create a thread pool error
    pub fn thread_pool_error(message: &str) -> Self {
        SortError::ThreadPoolError {
            message: message.to_string(),
        }
    }

    /// Create an output error for a failed write of sorted values
    pub fn output(err: io::Error) -> Self {
        SortError::Output(err)
    }
}

/// Result type for sort operations
pub type SortResult<T> = Result<T, SortError>;

/// Context trait for attaching the source file to I/O failures
pub trait SortContext<T> {
    fn with_file_context(self, filename: &str) -> SortResult<T>;
}

impl<T> SortContext<T> for Result<T, io::Error> {
    fn with_file_context(self, filename: &str) -> SortResult<T> {
        self.map_err(|io_err| match io_err.kind() {
            io::ErrorKind::PermissionDenied => SortError::permission_denied(filename),
            io::ErrorKind::NotFound => SortError::file_not_found(filename),
            _ => SortError::Io(io::Error::new(
                io_err.kind(),
                format!("{}: {}", filename, io_err),
            )),
        })
    }
}
