use std::{collections::HashMap, fmt, sync::Arc};

use chrono::{NaiveDate, NaiveDateTime};

use crate::{model::binding::FieldBinding, signature::snapshot::SignatureSnapshot};

/// Calendar format used for date and date-time values.
pub const DATE_FORMAT: &str = "%m/%d/%Y";

/// Value bound to a text field.
#[derive(Clone, Debug, PartialEq)]
pub enum RuntimeValue {
    /// Free text, stored trimmed.
    Text(String),
    /// Checkbox state; renders as `X` when set.
    Bool(bool),
    /// Calendar date.
    Date(NaiveDate),
    /// Date and time; only the date part is displayed.
    DateTime(NaiveDateTime),
    /// Whole number.
    Integer(i64),
    /// Floating-point number.
    Number(f64),
}

impl RuntimeValue {
    /// String drawn for this value.
    pub fn display_string(&self) -> String {
        match self {
            Self::Text(s) => s.clone(),
            Self::Bool(true) => "X".to_owned(),
            Self::Bool(false) => String::new(),
            Self::Date(d) => d.format(DATE_FORMAT).to_string(),
            Self::DateTime(dt) => dt.format(DATE_FORMAT).to_string(),
            Self::Integer(n) => n.to_string(),
            Self::Number(n) => n.to_string(),
        }
    }
}

impl fmt::Display for RuntimeValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.display_string())
    }
}

impl From<String> for RuntimeValue {
    fn from(s: String) -> Self {
        Self::Text(s.trim().to_owned())
    }
}

impl From<&str> for RuntimeValue {
    fn from(s: &str) -> Self {
        Self::Text(s.trim().to_owned())
    }
}

impl From<bool> for RuntimeValue {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

impl From<NaiveDate> for RuntimeValue {
    fn from(d: NaiveDate) -> Self {
        Self::Date(d)
    }
}

impl From<NaiveDateTime> for RuntimeValue {
    fn from(dt: NaiveDateTime) -> Self {
        Self::DateTime(dt)
    }
}

impl From<i64> for RuntimeValue {
    fn from(n: i64) -> Self {
        Self::Integer(n)
    }
}

impl From<i32> for RuntimeValue {
    fn from(n: i32) -> Self {
        Self::Integer(i64::from(n))
    }
}

impl From<f64> for RuntimeValue {
    fn from(n: f64) -> Self {
        Self::Number(n)
    }
}

/// Display string for an optional value; `None` renders as empty.
pub fn display_string(value: Option<&RuntimeValue>) -> String {
    value.map(RuntimeValue::display_string).unwrap_or_default()
}

/// Mutable per-document store of runtime values and captured signatures, keyed by binding.
#[derive(Clone, Debug, Default)]
pub struct RuntimeValueStore {
    values: HashMap<FieldBinding, RuntimeValue>,
    signatures: HashMap<FieldBinding, Arc<SignatureSnapshot>>,
}

impl RuntimeValueStore {
    /// Empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set or remove (`None`) the value for `binding`.
    pub fn set_value<V: Into<RuntimeValue>>(&mut self, binding: &FieldBinding, value: Option<V>) {
        match value {
            Some(v) => {
                self.values.insert(binding.clone(), v.into());
            }
            None => {
                self.values.remove(binding);
            }
        }
    }

    /// Value bound to `binding`.
    pub fn value(&self, binding: &FieldBinding) -> Option<&RuntimeValue> {
        self.values.get(binding)
    }

    /// Store a signature; `None` or a snapshot without ink removes the entry.
    pub fn set_signature(&mut self, binding: &FieldBinding, snapshot: Option<SignatureSnapshot>) {
        match snapshot.filter(SignatureSnapshot::has_signature) {
            Some(s) => {
                self.signatures.insert(binding.clone(), Arc::new(s));
            }
            None => {
                self.signatures.remove(binding);
            }
        }
    }

    /// Signature captured for `binding`.
    pub fn signature(&self, binding: &FieldBinding) -> Option<&SignatureSnapshot> {
        self.signatures.get(binding).map(Arc::as_ref)
    }

    /// Shared handle to the signature captured for `binding`.
    pub fn signature_arc(&self, binding: &FieldBinding) -> Option<Arc<SignatureSnapshot>> {
        self.signatures.get(binding).cloned()
    }

    /// Number of bindings holding a value.
    pub fn value_count(&self) -> usize {
        self.values.len()
    }

    /// Number of bindings holding a signature.
    pub fn signature_count(&self) -> usize {
        self.signatures.len()
    }

    /// Remove all values and signatures.
    pub fn clear(&mut self) {
        self.values.clear();
        self.signatures.clear();
    }
}

#[cfg(test)]
#[path = "../../tests/unit/document/values.rs"]
mod tests;
