//! Content generation error types.

/// Failure reported by a content generator for a single platform.
///
/// The message is recorded verbatim as the platform's result error, so
/// generators should keep it short and user-facing.
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Generation Error: {} at line {} in {}", message, line, file)]
pub struct GenerationError {
    /// The underlying error message
    pub message: String,
    /// Line number where the error occurred
    pub line: u32,
    /// File where the error occurred
    pub file: &'static str,
}

impl GenerationError {
    /// Create a new GenerationError with the given message at the current location.
    ///
    /// # Examples
    ///
    /// ```
    /// use repurpose_error::GenerationError;
    ///
    /// let err = GenerationError::new("quota exceeded");
    /// assert_eq!(err.message, "quota exceeded");
    /// ```
    #[track_caller]
    pub fn new(message: impl Into<String>) -> Self {
        let location = std::panic::Location::caller();
        Self {
            message: message.into(),
            line: location.line(),
            file: location.file(),
        }
    }
}
