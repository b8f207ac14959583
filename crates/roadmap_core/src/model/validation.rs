//! Input validation shared by project and roadmap item payloads.

use std::error::Error;
use std::fmt::{Display, Formatter};

/// Validation failure for user-supplied payloads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationError {
    /// Title is empty or whitespace-only.
    EmptyTitle,
}

impl Display for ValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyTitle => write!(f, "title must not be blank"),
        }
    }
}

impl Error for ValidationError {}

/// Rejects titles that are blank after trimming.
///
/// The stored title keeps its original spacing; only emptiness is checked.
pub fn validate_title(title: &str) -> Result<(), ValidationError> {
    if title.trim().is_empty() {
        return Err(ValidationError::EmptyTitle);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{validate_title, ValidationError};

    #[test]
    fn blank_titles_are_rejected() {
        assert_eq!(validate_title(""), Err(ValidationError::EmptyTitle));
        assert_eq!(validate_title(" \t\n"), Err(ValidationError::EmptyTitle));
    }

    #[test]
    fn padded_title_is_accepted() {
        assert_eq!(validate_title("  ship it  "), Ok(()));
    }
}
