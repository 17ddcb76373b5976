//! FormRegistry: the immutable catalog of form definitions, built and validated once at startup.

use crate::domain::form::{
    catalog, derive_table_name, FieldKind, FormConfig, FormDefinition, IMPLICIT_COLUMNS,
};
use crate::storage::table::{validate_ident, ID_COLUMN};
use serde::Deserialize;
use std::collections::{HashMap, HashSet};
use std::path::Path;
use thiserror::Error;

/// Internal wiring inconsistency. Fatal at startup, never a per-request condition.
#[derive(Debug, Error)]
pub enum ConfigurationError {
    #[error("no forms configured")]
    Empty,
    #[error("form '{0}' is not registered")]
    UnknownForm(String),
    #[error("form '{0}' is declared more than once")]
    DuplicateForm(String),
    #[error("table '{table}' of form '{form}' is already used by another form")]
    DuplicateTable { form: String, table: String },
    #[error("invalid identifier '{ident}' in form '{form}'")]
    InvalidIdentifier { form: String, ident: String },
    #[error("field '{field}' is declared more than once in form '{form}'")]
    DuplicateField { form: String, field: String },
    #[error("field '{field}' in form '{form}' collides with an implicit column")]
    ReservedField { form: String, field: String },
    #[error("choice field '{field}' in form '{form}' has no options")]
    EmptyOptions { form: String, field: String },
    #[error("failed to read forms config {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed forms config: {0}")]
    Parse(#[from] serde_json::Error),
}

/// On-disk shape of a forms config file.
#[derive(Debug, Deserialize)]
struct FormsFile {
    forms: Vec<FormConfig>,
}

/// A registry that maps form names, slugs and table names to their definitions.
#[derive(Debug, Clone)]
pub struct FormRegistry {
    forms: Vec<FormDefinition>,
    by_name: HashMap<String, usize>,
    by_slug: HashMap<String, usize>,
    by_table: HashMap<String, usize>,
}

impl FormRegistry {
    /// Validates `configs` and builds the registry, keeping declaration order.
    pub fn new(configs: Vec<FormConfig>) -> Result<Self, ConfigurationError> {
        if configs.is_empty() {
            return Err(ConfigurationError::Empty);
        }

        let mut forms = Vec::with_capacity(configs.len());
        let mut by_name = HashMap::new();
        let mut by_slug = HashMap::new();
        let mut by_table = HashMap::new();

        for config in configs {
            let form = validate_form(config)?;
            let idx = forms.len();

            if by_name.insert(form.name().to_string(), idx).is_some()
                || by_slug.insert(form.slug().to_string(), idx).is_some()
            {
                return Err(ConfigurationError::DuplicateForm(form.name().to_string()));
            }
            // SQLite identifiers are case-insensitive.
            if by_table
                .insert(form.table_name().to_ascii_lowercase(), idx)
                .is_some()
            {
                return Err(ConfigurationError::DuplicateTable {
                    form: form.name().to_string(),
                    table: form.table_name().to_string(),
                });
            }
            forms.push(form);
        }

        Ok(Self {
            forms,
            by_name,
            by_slug,
            by_table,
        })
    }

    /// The pilot-training catalog shipped with the portal.
    pub fn builtin() -> Result<Self, ConfigurationError> {
        Self::new(catalog::pilot_training_forms())
    }

    pub fn from_json_str(json: &str) -> Result<Self, ConfigurationError> {
        let file: FormsFile = serde_json::from_str(json)?;
        Self::new(file.forms)
    }

    pub fn load_from_file(path: &Path) -> Result<Self, ConfigurationError> {
        let json = std::fs::read_to_string(path).map_err(|source| ConfigurationError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json_str(&json)
    }

    /// Forms in declaration order.
    pub fn forms(&self) -> &[FormDefinition] {
        &self.forms
    }

    pub fn get(&self, name: &str) -> Option<&FormDefinition> {
        self.by_name.get(name).map(|&i| &self.forms[i])
    }

    /// Like [`FormRegistry::get`], but an unknown name is a [`ConfigurationError`].
    pub fn resolve(&self, name: &str) -> Result<&FormDefinition, ConfigurationError> {
        self.get(name)
            .ok_or_else(|| ConfigurationError::UnknownForm(name.to_string()))
    }

    pub fn by_slug(&self, slug: &str) -> Option<&FormDefinition> {
        self.by_slug.get(slug).map(|&i| &self.forms[i])
    }

    pub fn by_table(&self, table_name: &str) -> Option<&FormDefinition> {
        self.by_table
            .get(&table_name.to_ascii_lowercase())
            .map(|&i| &self.forms[i])
    }

    pub fn len(&self) -> usize {
        self.forms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.forms.is_empty()
    }
}

fn validate_form(config: FormConfig) -> Result<FormDefinition, ConfigurationError> {
    let FormConfig {
        name,
        table_name,
        fields,
    } = config;

    let table_name = table_name.unwrap_or_else(|| derive_table_name(&name));
    if !validate_ident(&table_name) {
        return Err(ConfigurationError::InvalidIdentifier {
            form: name,
            ident: table_name,
        });
    }

    let mut seen = HashSet::new();
    for field in &fields {
        if !validate_ident(&field.name) {
            return Err(ConfigurationError::InvalidIdentifier {
                form: name,
                ident: field.name.clone(),
            });
        }
        let reserved = field.name.eq_ignore_ascii_case(ID_COLUMN)
            || IMPLICIT_COLUMNS
                .iter()
                .any(|c| field.name.eq_ignore_ascii_case(c));
        if reserved {
            return Err(ConfigurationError::ReservedField {
                form: name,
                field: field.name.clone(),
            });
        }
        if !seen.insert(field.name.to_ascii_lowercase()) {
            return Err(ConfigurationError::DuplicateField {
                form: name,
                field: field.name.clone(),
            });
        }
        if let FieldKind::SingleChoice { options } = &field.kind {
            if options.is_empty() {
                return Err(ConfigurationError::EmptyOptions {
                    form: name,
                    field: field.name.clone(),
                });
            }
        }
    }

    Ok(FormDefinition::new(name, table_name, fields))
}
