//! Tagged outcome of a read that may fall back to a default.

/// A value read from a collaborator, or the default used in its place.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution<T> {
    /// The read succeeded
    Ok(T),
    /// The read failed; `value` is the fallback
    Degraded {
        /// Value used instead
        value: T,
        /// Why the read failed
        reason: String,
    },
}

impl<T> Resolution<T> {
    /// Consume into the value, whether read or fallen back to.
    pub fn into_value(self) -> T {
        match self {
            Resolution::Ok(value) | Resolution::Degraded { value, .. } => value,
        }
    }

    /// The failure reason, when degraded.
    pub fn reason(&self) -> Option<&str> {
        match self {
            Resolution::Ok(_) => None,
            Resolution::Degraded { reason, .. } => Some(reason.as_str()),
        }
    }
}
