//! Form definitions: the declarative schema tables, inputs and records are derived from.

use crate::storage::table::{ColumnSpec, ColumnType};
use serde::{Deserialize, Serialize};

pub mod catalog;
pub mod layout;
pub mod registry;

pub use registry::{ConfigurationError, FormRegistry};

pub const SUBMISSION_DATE_COLUMN: &str = "SubmissionDate";
pub const TRAINER_NAME_COLUMN: &str = "TrainerName";
pub const TRAINING_DATE_COLUMN: &str = "TrainingDate";

/// Columns every form table carries ahead of its declared fields (after the store's `ID`).
pub const IMPLICIT_COLUMNS: [&str; 3] = [
    SUBMISSION_DATE_COLUMN,
    TRAINER_NAME_COLUMN,
    TRAINING_DATE_COLUMN,
];

/// Value kind of a field. Choice options only exist on [`FieldKind::SingleChoice`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum FieldKind {
    #[serde(rename = "text")]
    ShortText,
    #[serde(rename = "textarea")]
    LongText,
    #[serde(rename = "number")]
    Numeric,
    #[serde(rename = "dropdown")]
    SingleChoice { options: Vec<String> },
    #[serde(rename = "date")]
    Date,
}

impl FieldKind {
    pub fn choice<I, S>(options: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        FieldKind::SingleChoice {
            options: options.into_iter().map(Into::into).collect(),
        }
    }

    /// Numeric fields are stored as floating point, everything else as text.
    pub fn column_type(&self) -> ColumnType {
        match self {
            FieldKind::Numeric => ColumnType::Real,
            _ => ColumnType::Text,
        }
    }
}

/// One declared field of a form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldSpec {
    /// Column name and input key.
    pub name: String,
    pub label: String,
    #[serde(flatten)]
    pub kind: FieldKind,
}

impl FieldSpec {
    pub fn new(name: impl Into<String>, label: impl Into<String>, kind: FieldKind) -> Self {
        Self {
            name: name.into(),
            label: label.into(),
            kind,
        }
    }
}

/// A form as written in configuration, before registry validation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FormConfig {
    pub name: String,
    /// Physical table name; derived from `name` when omitted.
    #[serde(default)]
    pub table_name: Option<String>,
    pub fields: Vec<FieldSpec>,
}

/// A validated record type. Immutable once the registry is built.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FormDefinition {
    name: String,
    table_name: String,
    slug: String,
    fields: Vec<FieldSpec>,
}

impl FormDefinition {
    pub(crate) fn new(name: String, table_name: String, fields: Vec<FieldSpec>) -> Self {
        let slug = slugify(&name);
        Self {
            name,
            table_name,
            slug,
            fields,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn table_name(&self) -> &str {
        &self.table_name
    }

    /// URL path segment for the form (`"EBT Modules Forms"` -> `EBT-Modules-Forms`).
    pub fn slug(&self) -> &str {
        &self.slug
    }

    /// Declared fields in order.
    pub fn fields(&self) -> &[FieldSpec] {
        &self.fields
    }

    pub fn field(&self, name: &str) -> Option<&FieldSpec> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Storage layout below the identifier column: implicit columns, then one per field.
    pub fn column_specs(&self) -> Vec<ColumnSpec> {
        IMPLICIT_COLUMNS
            .iter()
            .map(|c| ColumnSpec::new(*c, ColumnType::Text))
            .chain(
                self.fields
                    .iter()
                    .map(|f| ColumnSpec::new(f.name.clone(), f.kind.column_type())),
            )
            .collect()
    }
}

pub fn slugify(name: &str) -> String {
    name.replace(' ', "-")
}

/// PascalCases the alphanumeric words of a form name: `"Line Event Forms"` -> `LineEventForms`.
pub fn derive_table_name(form_name: &str) -> String {
    form_name
        .split(|c: char| !c.is_ascii_alphanumeric())
        .filter(|w| !w.is_empty())
        .map(|w| {
            let mut chars = w.chars();
            match chars.next() {
                Some(first) => {
                    first.to_ascii_uppercase().to_string() + &chars.as_str().to_ascii_lowercase()
                }
                None => String::new(),
            }
        })
        .collect()
}
