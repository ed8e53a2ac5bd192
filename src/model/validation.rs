use std::collections::BTreeMap;

use serde::Serialize;

use super::EntryId;

/// Editable field of a link entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, strum_macros::Display)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Field {
    Platform,
    Url,
}

/// Why a field failed validation. `Display` gives the user-facing message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, strum_macros::Display)]
#[serde(rename_all = "snake_case")]
pub enum FieldError {
    #[strum(serialize = "platform required")]
    PlatformRequired,
    #[strum(serialize = "url required")]
    UrlRequired,
    #[strum(serialize = "invalid url")]
    InvalidUrl,
}

/// Outcome of validating one field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "status", content = "error", rename_all = "lowercase")]
pub enum FieldStatus {
    Valid,
    /// The field is not editable yet and was not evaluated.
    Disabled,
    Invalid(FieldError),
}

impl FieldStatus {
    pub fn error(&self) -> Option<FieldError> {
        match self {
            FieldStatus::Invalid(err) => Some(*err),
            _ => None,
        }
    }
}

/// Field-level validation results for a whole collection.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationReport {
    pub(crate) fields: BTreeMap<(EntryId, Field), FieldStatus>,
}

impl ValidationReport {
    /// Status of one field, `None` if the entry is not part of the report.
    pub fn status(&self, id: EntryId, field: Field) -> Option<FieldStatus> {
        self.fields.get(&(id, field)).copied()
    }

    /// Error message for one field, if it is invalid.
    pub fn error(&self, id: EntryId, field: Field) -> Option<FieldError> {
        self.status(id, field).and_then(|s| s.error())
    }

    /// `true` when no field is invalid. An empty collection is valid.
    pub fn is_valid(&self) -> bool {
        self.fields
            .values()
            .all(|s| !matches!(s, FieldStatus::Invalid(_)))
    }

    /// All invalid fields in entry id order.
    pub fn errors(&self) -> impl Iterator<Item = (EntryId, Field, FieldError)> + '_ {
        self.fields
            .iter()
            .filter_map(|(&(id, field), status)| status.error().map(|err| (id, field, err)))
    }

    pub fn iter(&self) -> impl Iterator<Item = (EntryId, Field, FieldStatus)> + '_ {
        self.fields
            .iter()
            .map(|(&(id, field), &status)| (id, field, status))
    }
}
