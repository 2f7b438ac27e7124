use crate::date::UnifiedDay;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Value of a categorical sample field
///
/// JSON `null` and absent fields are both `Missing`, which forms its own
/// group when counting.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Missing,
    Flag(bool),
    Int(i64),
    Text(String),
}

static MISSING: FieldValue = FieldValue::Missing;

impl FieldValue {
    pub fn text(value: impl Into<String>) -> Self {
        Self::Text(value.into())
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Text(value) => Some(value),
            _ => None,
        }
    }

    pub fn is_missing(&self) -> bool {
        matches!(self, Self::Missing)
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Missing => f.write_str("(missing)"),
            Self::Flag(value) => write!(f, "{value}"),
            Self::Int(value) => write!(f, "{value}"),
            Self::Text(value) => f.write_str(value),
        }
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<bool> for FieldValue {
    fn from(value: bool) -> Self {
        Self::Flag(value)
    }
}

/// Sample record as delivered by the data API
///
/// # Example JSON
/// ```json
/// {"date": "2021-03-01", "count": 12, "division": "Bern", "age": "20-29"}
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawMultiSample {
    pub date: String,
    pub count: u64,
    #[serde(flatten)]
    pub fields: BTreeMap<String, FieldValue>,
}

impl RawMultiSample {
    pub fn new(date: impl Into<String>, count: u64) -> Self {
        Self {
            date: date.into(),
            count,
            fields: BTreeMap::new(),
        }
    }

    pub fn with_field(mut self, name: impl Into<String>, value: impl Into<FieldValue>) -> Self {
        self.fields.insert(name.into(), value.into());
        self
    }
}

/// Sample record with its date resolved to a canonical day
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ParsedMultiSample {
    pub date: UnifiedDay,
    pub count: u64,
    pub fields: BTreeMap<String, FieldValue>,
}

impl ParsedMultiSample {
    /// Value of a categorical field, `Missing` if the record lacks it
    pub fn field(&self, name: &str) -> &FieldValue {
        self.fields.get(name).unwrap_or(&MISSING)
    }
}
