//! Top-level error wrapper types.

use crate::{
    BackendError, BuilderError, ConfigError, GenerationError, JobError, JsonError, PromptError,
    StorageError,
};

/// This is the foundation error enum. Each repurpose crate contributes
/// its failures through one of these families.
///
/// # Examples
///
/// ```
/// use repurpose_error::{RepurposeError, GenerationError};
///
/// let gen_err = GenerationError::new("Model refused");
/// let err: RepurposeError = gen_err.into();
/// assert!(format!("{}", err).contains("Generation Error"));
/// ```
#[derive(Debug, derive_more::From, derive_more::Display, derive_more::Error)]
pub enum RepurposeErrorKind {
    /// JSON serialization/deserialization error
    #[from(JsonError)]
    Json(JsonError),
    /// Generic backend error
    #[from(BackendError)]
    Backend(BackendError),
    /// Configuration error
    #[from(ConfigError)]
    Config(ConfigError),
    /// Builder error
    #[from(BuilderError)]
    Builder(BuilderError),
    /// Storage error
    #[from(StorageError)]
    Storage(StorageError),
    /// Job lifecycle error
    #[from(JobError)]
    Job(JobError),
    /// Content generation error
    #[from(GenerationError)]
    Generation(GenerationError),
    /// Prompt store error
    #[from(PromptError)]
    Prompt(PromptError),
}

impl RepurposeErrorKind {
    /// The failure message without the source-location suffix.
    pub fn reason(&self) -> String {
        match self {
            Self::Json(e) => e.message.clone(),
            Self::Backend(e) => e.message.clone(),
            Self::Config(e) => e.message.clone(),
            Self::Builder(e) => e.kind().to_string(),
            Self::Storage(e) => e.kind.to_string(),
            Self::Job(e) => e.kind.to_string(),
            Self::Generation(e) => e.message.clone(),
            Self::Prompt(e) => e.message.clone(),
        }
    }
}

/// Repurpose error with kind discrimination.
///
/// # Examples
///
/// ```
/// use repurpose_error::{RepurposeResult, ConfigError};
///
/// fn might_fail() -> RepurposeResult<()> {
///     Err(ConfigError::new("Missing field"))?
/// }
///
/// let err = might_fail().unwrap_err();
/// assert_eq!(err.reason(), "Missing field");
/// ```
#[derive(Debug, derive_more::Display, derive_more::Error)]
#[display("Repurpose Error: {}", _0)]
pub struct RepurposeError(Box<RepurposeErrorKind>);

impl RepurposeError {
    /// Create a new error from a kind.
    pub fn new(kind: RepurposeErrorKind) -> Self {
        Self(Box::new(kind))
    }

    /// Get the error kind.
    pub fn kind(&self) -> &RepurposeErrorKind {
        &self.0
    }

    /// The failure message without the source-location suffix.
    ///
    /// This is what gets recorded on jobs and platform results.
    pub fn reason(&self) -> String {
        self.0.reason()
    }
}

// Generic From implementation for any type that converts to RepurposeErrorKind
impl<T> From<T> for RepurposeError
where
    T: Into<RepurposeErrorKind>,
{
    fn from(err: T) -> Self {
        Self::new(err.into())
    }
}

/// Result type for repurpose operations.
pub type RepurposeResult<T> = std::result::Result<T, RepurposeError>;
