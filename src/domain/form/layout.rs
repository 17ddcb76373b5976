//! View models handed to the UI layer: form inputs, navigation and the browse selector.

use crate::domain::form::{FieldKind, FormDefinition, FormRegistry};
use chrono::NaiveDate;
use serde::Serialize;

pub const TRAINER_NAME_INPUT: &str = "trainer_name";
pub const TRAINING_DATE_INPUT: &str = "training_date";

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "widget", rename_all = "snake_case")]
pub enum Widget {
    Text,
    Number,
    Textarea { placeholder: String },
    Dropdown { options: Vec<String> },
    Date { default: String },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InputSpec {
    pub id: String,
    pub label: String,
    #[serde(flatten)]
    pub widget: Widget,
}

/// Everything needed to draw one data-entry page.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FormLayout {
    pub title: String,
    pub slug: String,
    pub table_name: String,
    pub submit_path: String,
    pub inputs: Vec<InputSpec>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NavEntry {
    pub name: String,
    pub slug: String,
    pub href: String,
}

/// Option of the browse page's table selector.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SelectorOption {
    pub label: String,
    pub value: String,
}

fn widget_for(kind: &FieldKind, today: NaiveDate) -> Widget {
    match kind {
        FieldKind::ShortText => Widget::Text,
        FieldKind::Numeric => Widget::Number,
        FieldKind::LongText => Widget::Textarea {
            placeholder: "Enter details...".to_string(),
        },
        FieldKind::SingleChoice { options } => Widget::Dropdown {
            options: options.clone(),
        },
        FieldKind::Date => Widget::Date {
            default: today.format("%Y-%m-%d").to_string(),
        },
    }
}

/// Trainer name and training date first, then one input per declared field.
pub fn form_layout(form: &FormDefinition, today: NaiveDate) -> FormLayout {
    let mut inputs = vec![
        InputSpec {
            id: TRAINER_NAME_INPUT.to_string(),
            label: "Name of Pilot Trainer".to_string(),
            widget: Widget::Text,
        },
        InputSpec {
            id: TRAINING_DATE_INPUT.to_string(),
            label: "Training Date".to_string(),
            widget: widget_for(&FieldKind::Date, today),
        },
    ];
    inputs.extend(form.fields().iter().map(|f| InputSpec {
        id: f.name.clone(),
        label: f.label.clone(),
        widget: widget_for(&f.kind, today),
    }));

    FormLayout {
        title: form.name().to_string(),
        slug: form.slug().to_string(),
        table_name: form.table_name().to_string(),
        submit_path: format!("/api/forms/{}/submit", form.slug()),
        inputs,
    }
}

pub fn navigation(registry: &FormRegistry) -> Vec<NavEntry> {
    registry
        .forms()
        .iter()
        .map(|f| NavEntry {
            name: f.name().to_string(),
            slug: f.slug().to_string(),
            href: format!("/form/{}", f.slug()),
        })
        .collect()
}

pub fn browse_options(registry: &FormRegistry) -> Vec<SelectorOption> {
    registry
        .forms()
        .iter()
        .map(|f| SelectorOption {
            label: f.name().to_string(),
            value: f.table_name().to_string(),
        })
        .collect()
}
