use std::fmt;

use crate::foundation::error::{InkformError, InkformResult};

/// Logical name linking a declared field to a runtime value.
///
/// The name is trimmed on construction; equality and hashing use the trimmed form.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize, serde::Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct FieldBinding(String);

impl FieldBinding {
    /// Build a binding from `name`, failing when it is blank after trimming.
    pub fn new(name: impl AsRef<str>) -> InkformResult<Self> {
        let trimmed = name.as_ref().trim();
        if trimmed.is_empty() {
            return Err(InkformError::invalid_argument(
                "field binding name must not be blank",
            ));
        }
        Ok(Self(trimmed.to_string()))
    }

    /// Normalized binding name.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for FieldBinding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for FieldBinding {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for FieldBinding {
    type Error = InkformError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl TryFrom<&str> for FieldBinding {
    type Error = InkformError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<FieldBinding> for String {
    fn from(value: FieldBinding) -> Self {
        value.0
    }
}

#[cfg(test)]
#[path = "../../tests/unit/model/binding.rs"]
mod tests;
