//! Form controls of the settings-style tabs

use crate::controller::DeviceId;
use crate::render::{RenderTarget, SelectOption};
use crate::variables::{Selection, VariableAccessor};
use std::collections::HashMap;

/// What a form control writes back on save
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ControlBinding {
    /// A gateway state variable
    Variable(String),
    /// A device attribute, written only when non-empty
    Attribute(String),
}

/// One editable control of a rendered panel
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormControl {
    /// Form field name the submitted value is keyed by
    pub field: String,
    /// Where the value goes
    pub binding: ControlBinding,
    /// Whether several values can be selected
    pub multiple: bool,
}

impl FormControl {
    /// Control bound to the state variable of the same name
    pub fn variable(name: &str) -> Self {
        Self {
            field: name.to_string(),
            binding: ControlBinding::Variable(name.to_string()),
            multiple: false,
        }
    }

    /// Multi-select bound to the state variable of the same name
    pub fn multi_variable(name: &str) -> Self {
        Self {
            multiple: true,
            ..Self::variable(name)
        }
    }

    /// Input `field` bound to device attribute `attribute`
    pub fn attribute(field: &str, attribute: &str) -> Self {
        Self {
            field: field.to_string(),
            binding: ControlBinding::Attribute(attribute.to_string()),
            multiple: false,
        }
    }
}

/// Values submitted from a rendered panel, keyed by field name
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormSelections {
    values: HashMap<String, Selection>,
}

impl FormSelections {
    /// Empty submission
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the value of `field`
    pub fn insert(&mut self, field: impl Into<String>, selection: impl Into<Selection>) {
        self.values.insert(field.into(), selection.into());
    }

    /// Builder-style [`FormSelections::insert`]
    pub fn with(mut self, field: impl Into<String>, selection: impl Into<Selection>) -> Self {
        self.insert(field, selection);
        self
    }

    /// Value of `field`; fields that were not submitted are [`Selection::NoSelection`]
    pub fn get(&self, field: &str) -> Selection {
        self.values
            .get(field)
            .cloned()
            .unwrap_or(Selection::NoSelection)
    }

    /// Number of submitted fields
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether nothing was submitted
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl<K: Into<String>, V: Into<Selection>> FromIterator<(K, V)> for FormSelections {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            values: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

/// A rendered settings-style tab
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Panel {
    /// Markup for the host
    pub html: String,
    /// Controls the save action reads back
    pub controls: Vec<FormControl>,
}

/// Accumulates the markup and controls of a settings-style tab
pub(crate) struct FormBuilder<'a> {
    target: &'a dyn RenderTarget,
    vars: &'a VariableAccessor,
    device: DeviceId,
    body: String,
    controls: Vec<FormControl>,
}

impl<'a> FormBuilder<'a> {
    pub(crate) fn new(target: &'a dyn RenderTarget, vars: &'a VariableAccessor, device: DeviceId) -> Self {
        Self {
            target,
            vars,
            device,
            body: String::new(),
            controls: Vec::new(),
        }
    }

    pub(crate) fn heading(&mut self, text: &str) {
        self.body.push_str(&self.target.heading(text));
    }

    pub(crate) fn note(&mut self, html: &str) {
        self.body.push_str(&self.target.note(html));
    }

    /// Pulldown preselecting the variable's current value
    pub(crate) async fn pulldown(&mut self, label: &str, variable: &str, options: &[SelectOption]) {
        let current = self.vars.get(self.device, variable).await;
        self.body.push_str(&self.target.pulldown(self.device, label, variable, options, &current));
        self.controls.push(FormControl::variable(variable));
    }

    /// Multi-select preselecting the variable's comma-separated values
    pub(crate) async fn multi_pulldown(&mut self, label: &str, variable: &str, options: &[SelectOption]) {
        let current = self.vars.get(self.device, variable).await;
        let selected: Vec<&str> = current
            .split(',')
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .collect();
        self.body
            .push_str(&self.target.multi_pulldown(self.device, label, variable, options, &selected));
        self.controls.push(FormControl::multi_variable(variable));
    }

    /// Text input for device attribute `attribute`, prefilled with `value`
    pub(crate) fn attribute_input(&mut self, label: &str, field: &str, attribute: &str, size: u8, value: &str) {
        self.body
            .push_str(&self.target.input(self.device, label, field, size, value));
        self.controls.push(FormControl::attribute(field, attribute));
    }

    pub(crate) fn finish(mut self, callback: &str) -> Panel {
        self.body
            .push_str(&self.target.save_button(self.device, "Save Changes", callback));
        Panel {
            html: self.target.settings_page(&self.body),
            controls: self.controls,
        }
    }
}
