//! Validation errors raised by model constructors and services.

use std::error::Error;
use std::fmt::{Display, Formatter};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModelValidationError {
    /// Id is empty or whitespace only.
    EmptyId(&'static str),
    /// A required text field is empty after trimming.
    EmptyField(&'static str),
}

impl Display for ModelValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyId(entity) => write!(f, "{entity} id must not be empty"),
            Self::EmptyField(field) => write!(f, "{field} must not be empty"),
        }
    }
}

impl Error for ModelValidationError {}
