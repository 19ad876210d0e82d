// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Flowstudio-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Flowstudio and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::geometry::Point;
use super::ids::NodeId;

/// The closed set of node types a workflow can contain.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, JsonSchema,
)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
    Application,
    Tool,
    Agent,
    Task,
    Memory,
    Reasoning,
    Input,
    Output,
}

impl NodeKind {
    pub const ALL: [NodeKind; 8] = [
        NodeKind::Application,
        NodeKind::Tool,
        NodeKind::Agent,
        NodeKind::Task,
        NodeKind::Memory,
        NodeKind::Reasoning,
        NodeKind::Input,
        NodeKind::Output,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Application => "application",
            Self::Tool => "tool",
            Self::Agent => "agent",
            Self::Task => "task",
            Self::Memory => "memory",
            Self::Reasoning => "reasoning",
            Self::Input => "input",
            Self::Output => "output",
        }
    }

    pub fn default_label(self) -> &'static str {
        match self {
            Self::Application => "Application",
            Self::Tool => "Tool",
            Self::Agent => "Agent",
            Self::Task => "Task",
            Self::Memory => "Memory",
            Self::Reasoning => "Reasoning",
            Self::Input => "Input",
            Self::Output => "Output",
        }
    }

    /// Input nodes only emit; nothing can connect into them.
    pub fn has_input_handle(self) -> bool {
        !matches!(self, Self::Input)
    }

    /// Output nodes only receive; nothing can connect out of them.
    pub fn has_output_handle(self) -> bool {
        !matches!(self, Self::Output)
    }

    pub fn default_style(self) -> Option<NodeStyle> {
        match self {
            Self::Input => Some(NodeStyle {
                background: "#ecfdf5".to_owned(),
                border: "#10b981".to_owned(),
            }),
            Self::Output => Some(NodeStyle {
                background: "#eff6ff".to_owned(),
                border: "#3b82f6".to_owned(),
            }),
            _ => None,
        }
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown node type {0:?}")]
pub struct UnknownNodeKind(pub String);

impl FromStr for NodeKind {
    type Err = UnknownNodeKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        NodeKind::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| UnknownNodeKind(s.to_owned()))
    }
}

/// Default visual metadata stamped onto `input`/`output` nodes when they are created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct NodeStyle {
    pub background: String,
    pub border: String,
}

/// A single attribute value.
///
/// Only `Text`, `Number` and `Bool` are editable. `Structured` values (arrays, objects, null)
/// are carried through untouched so a round-trip never loses data.
#[derive(Debug, Clone, PartialEq)]
pub enum AttrValue {
    Text(String),
    Number(f64),
    Bool(bool),
    Structured(Value),
}

impl AttrValue {
    pub fn from_json(value: Value) -> Self {
        match value {
            Value::String(text) => Self::Text(text),
            Value::Bool(flag) => Self::Bool(flag),
            Value::Number(number) => match number.as_f64() {
                Some(n) => Self::Number(n),
                None => Self::Structured(Value::Number(number)),
            },
            other => Self::Structured(other),
        }
    }

    pub fn to_json(&self) -> Value {
        match self {
            Self::Text(text) => Value::String(text.clone()),
            Self::Bool(flag) => Value::Bool(*flag),
            Self::Number(n) => serde_json::Number::from_f64(*n)
                .map(Value::Number)
                .unwrap_or(Value::Null),
            Self::Structured(value) => value.clone(),
        }
    }

    pub fn is_primitive(&self) -> bool {
        !matches!(self, Self::Structured(_))
    }

    /// Text shown in an input field for this value.
    pub fn display_text(&self) -> String {
        match self {
            Self::Text(text) => text.clone(),
            Self::Number(n) => format_number(*n),
            Self::Bool(flag) => flag.to_string(),
            Self::Structured(value) => value.to_string(),
        }
    }
}

pub fn format_number(n: f64) -> String {
    if n.is_finite() && n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        n.to_string()
    }
}

/// How a field is presented and edited.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueKind {
    Text,
    Multiline,
    Number,
    Bool,
}

/// Every well-known, kind-specific field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum DetailField {
    ApplicationId,
    ToolId,
    SpecUri,
    SpecFormat,
    SpecContent,
    Model,
    Temperature,
    SystemPrompt,
    Instructions,
    MaxRetries,
    MemoryStore,
    Persistent,
    Strategy,
    MaxSteps,
    InputSchema,
    OutputFormat,
}

impl DetailField {
    pub fn key(self) -> &'static str {
        match self {
            Self::ApplicationId => "application_id",
            Self::ToolId => "tool_id",
            Self::SpecUri => "spec_uri",
            Self::SpecFormat => "spec_format",
            Self::SpecContent => "spec_content",
            Self::Model => "model",
            Self::Temperature => "temperature",
            Self::SystemPrompt => "system_prompt",
            Self::Instructions => "instructions",
            Self::MaxRetries => "max_retries",
            Self::MemoryStore => "store",
            Self::Persistent => "persistent",
            Self::Strategy => "strategy",
            Self::MaxSteps => "max_steps",
            Self::InputSchema => "schema",
            Self::OutputFormat => "format",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::ApplicationId => "Application",
            Self::ToolId => "Tool",
            Self::SpecUri => "Spec URI",
            Self::SpecFormat => "Spec format",
            Self::SpecContent => "Spec",
            Self::Model => "Model",
            Self::Temperature => "Temperature",
            Self::SystemPrompt => "System prompt",
            Self::Instructions => "Instructions",
            Self::MaxRetries => "Max retries",
            Self::MemoryStore => "Store",
            Self::Persistent => "Persistent",
            Self::Strategy => "Strategy",
            Self::MaxSteps => "Max steps",
            Self::InputSchema => "Schema",
            Self::OutputFormat => "Format",
        }
    }

    pub fn value_kind(self) -> ValueKind {
        match self {
            Self::SpecContent | Self::SystemPrompt | Self::Instructions | Self::InputSchema => {
                ValueKind::Multiline
            }
            Self::Temperature | Self::MaxRetries | Self::MaxSteps => ValueKind::Number,
            Self::Persistent => ValueKind::Bool,
            Self::ApplicationId
            | Self::ToolId
            | Self::SpecUri
            | Self::SpecFormat
            | Self::Model
            | Self::MemoryStore
            | Self::Strategy
            | Self::OutputFormat => ValueKind::Text,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DetailError {
    #[error("field {field:?} does not exist on {kind} nodes")]
    NotApplicable { field: DetailField, kind: NodeKind },
    #[error("field {field:?} expects a {expected:?} value")]
    TypeMismatch {
        field: DetailField,
        expected: ValueKind,
    },
}

/// Kind-specific well-known fields, one variant per `NodeKind`.
#[derive(Debug, Clone, PartialEq)]
pub enum NodeDetails {
    Application {
        application_id: Option<String>,
    },
    Tool {
        tool_id: Option<String>,
        spec_uri: Option<String>,
        spec_format: Option<String>,
        spec_content: Option<String>,
    },
    Agent {
        model: Option<String>,
        temperature: Option<f64>,
        system_prompt: Option<String>,
    },
    Task {
        instructions: Option<String>,
        max_retries: Option<f64>,
    },
    Memory {
        store: Option<String>,
        persistent: bool,
    },
    Reasoning {
        strategy: Option<String>,
        max_steps: Option<f64>,
    },
    Input {
        schema: Option<String>,
    },
    Output {
        format: Option<String>,
    },
}

impl NodeDetails {
    pub fn empty(kind: NodeKind) -> Self {
        match kind {
            NodeKind::Application => Self::Application {
                application_id: None,
            },
            NodeKind::Tool => Self::Tool {
                tool_id: None,
                spec_uri: None,
                spec_format: None,
                spec_content: None,
            },
            NodeKind::Agent => Self::Agent {
                model: None,
                temperature: None,
                system_prompt: None,
            },
            NodeKind::Task => Self::Task {
                instructions: None,
                max_retries: None,
            },
            NodeKind::Memory => Self::Memory {
                store: None,
                persistent: false,
            },
            NodeKind::Reasoning => Self::Reasoning {
                strategy: None,
                max_steps: None,
            },
            NodeKind::Input => Self::Input { schema: None },
            NodeKind::Output => Self::Output { format: None },
        }
    }

    pub fn kind(&self) -> NodeKind {
        match self {
            Self::Application { .. } => NodeKind::Application,
            Self::Tool { .. } => NodeKind::Tool,
            Self::Agent { .. } => NodeKind::Agent,
            Self::Task { .. } => NodeKind::Task,
            Self::Memory { .. } => NodeKind::Memory,
            Self::Reasoning { .. } => NodeKind::Reasoning,
            Self::Input { .. } => NodeKind::Input,
            Self::Output { .. } => NodeKind::Output,
        }
    }

    pub fn fields(&self) -> &'static [DetailField] {
        match self {
            Self::Application { .. } => &[DetailField::ApplicationId],
            Self::Tool { .. } => &[
                DetailField::ToolId,
                DetailField::SpecUri,
                DetailField::SpecFormat,
                DetailField::SpecContent,
            ],
            Self::Agent { .. } => &[
                DetailField::Model,
                DetailField::Temperature,
                DetailField::SystemPrompt,
            ],
            Self::Task { .. } => &[DetailField::Instructions, DetailField::MaxRetries],
            Self::Memory { .. } => &[DetailField::MemoryStore, DetailField::Persistent],
            Self::Reasoning { .. } => &[DetailField::Strategy, DetailField::MaxSteps],
            Self::Input { .. } => &[DetailField::InputSchema],
            Self::Output { .. } => &[DetailField::OutputFormat],
        }
    }

    /// Current value of `field`; `None` when the field is unset or not part of this kind.
    pub fn get(&self, field: DetailField) -> Option<AttrValue> {
        let text = |value: &Option<String>| value.clone().map(AttrValue::Text);
        let number = |value: &Option<f64>| value.map(AttrValue::Number);

        match (self, field) {
            (Self::Application { application_id }, DetailField::ApplicationId) => {
                text(application_id)
            }
            (Self::Tool { tool_id, .. }, DetailField::ToolId) => text(tool_id),
            (Self::Tool { spec_uri, .. }, DetailField::SpecUri) => text(spec_uri),
            (Self::Tool { spec_format, .. }, DetailField::SpecFormat) => text(spec_format),
            (Self::Tool { spec_content, .. }, DetailField::SpecContent) => text(spec_content),
            (Self::Agent { model, .. }, DetailField::Model) => text(model),
            (Self::Agent { temperature, .. }, DetailField::Temperature) => number(temperature),
            (Self::Agent { system_prompt, .. }, DetailField::SystemPrompt) => text(system_prompt),
            (Self::Task { instructions, .. }, DetailField::Instructions) => text(instructions),
            (Self::Task { max_retries, .. }, DetailField::MaxRetries) => number(max_retries),
            (Self::Memory { store, .. }, DetailField::MemoryStore) => text(store),
            (Self::Memory { persistent, .. }, DetailField::Persistent) => {
                Some(AttrValue::Bool(*persistent))
            }
            (Self::Reasoning { strategy, .. }, DetailField::Strategy) => text(strategy),
            (Self::Reasoning { max_steps, .. }, DetailField::MaxSteps) => number(max_steps),
            (Self::Input { schema }, DetailField::InputSchema) => text(schema),
            (Self::Output { format }, DetailField::OutputFormat) => text(format),
            _ => None,
        }
    }

    /// Sets `field`. `None` (or an empty text) clears an optional field.
    pub fn set(&mut self, field: DetailField, value: Option<AttrValue>) -> Result<(), DetailError> {
        let kind = self.kind();
        if !self.fields().contains(&field) {
            return Err(DetailError::NotApplicable { field, kind });
        }

        let mismatch = DetailError::TypeMismatch {
            field,
            expected: field.value_kind(),
        };
        let as_text = |value: Option<AttrValue>| -> Result<Option<String>, DetailError> {
            match value {
                None => Ok(None),
                Some(AttrValue::Text(text)) if text.is_empty() => Ok(None),
                Some(AttrValue::Text(text)) => Ok(Some(text)),
                Some(_) => Err(mismatch.clone()),
            }
        };
        let as_number = |value: Option<AttrValue>| -> Result<Option<f64>, DetailError> {
            match value {
                None => Ok(None),
                Some(AttrValue::Number(n)) => Ok(Some(n)),
                Some(_) => Err(mismatch.clone()),
            }
        };

        match (self, field) {
            (Self::Application { application_id }, DetailField::ApplicationId) => {
                *application_id = as_text(value)?;
            }
            (Self::Tool { tool_id, .. }, DetailField::ToolId) => *tool_id = as_text(value)?,
            (Self::Tool { spec_uri, .. }, DetailField::SpecUri) => *spec_uri = as_text(value)?,
            (Self::Tool { spec_format, .. }, DetailField::SpecFormat) => {
                *spec_format = as_text(value)?;
            }
            (Self::Tool { spec_content, .. }, DetailField::SpecContent) => {
                *spec_content = as_text(value)?;
            }
            (Self::Agent { model, .. }, DetailField::Model) => *model = as_text(value)?,
            (Self::Agent { temperature, .. }, DetailField::Temperature) => {
                *temperature = as_number(value)?;
            }
            (Self::Agent { system_prompt, .. }, DetailField::SystemPrompt) => {
                *system_prompt = as_text(value)?;
            }
            (Self::Task { instructions, .. }, DetailField::Instructions) => {
                *instructions = as_text(value)?;
            }
            (Self::Task { max_retries, .. }, DetailField::MaxRetries) => {
                *max_retries = as_number(value)?;
            }
            (Self::Memory { store, .. }, DetailField::MemoryStore) => *store = as_text(value)?,
            (Self::Memory { persistent, .. }, DetailField::Persistent) => match value {
                Some(AttrValue::Bool(flag)) => *persistent = flag,
                None => *persistent = false,
                Some(_) => return Err(mismatch),
            },
            (Self::Reasoning { strategy, .. }, DetailField::Strategy) => {
                *strategy = as_text(value)?;
            }
            (Self::Reasoning { max_steps, .. }, DetailField::MaxSteps) => {
                *max_steps = as_number(value)?;
            }
            (Self::Input { schema }, DetailField::InputSchema) => *schema = as_text(value)?,
            (Self::Output { format }, DetailField::OutputFormat) => *format = as_text(value)?,
            _ => return Err(DetailError::NotApplicable { field, kind }),
        }
        Ok(())
    }

    fn write_wire(&self, map: &mut Map<String, Value>) {
        for field in self.fields() {
            if let Some(value) = self.get(*field) {
                map.insert(field.key().to_owned(), value.to_json());
            }
        }
    }

    /// Pulls this kind's well-known keys out of `attrs`. Values of the wrong shape stay in
    /// `attrs` and end up as extra attributes.
    fn read_wire(kind: NodeKind, attrs: &mut BTreeMap<String, AttrValue>) -> Self {
        let mut details = Self::empty(kind);
        for field in details.fields() {
            let Some(value) = attrs.get(field.key()) else {
                continue;
            };
            if details.set(*field, Some(value.clone())).is_ok() {
                attrs.remove(field.key());
            }
        }
        details
    }
}

/// Keys that are owned by the node envelope or by canvas bookkeeping and must never surface as
/// node attributes.
pub fn is_reserved_key(key: &str) -> bool {
    matches!(
        key,
        "id" | "type" | "position" | "selected" | "dragging" | "width" | "height"
    ) || key.starts_with("__")
}

const LABEL_KEY: &str = "label";
const DESCRIPTION_KEY: &str = "description";
const NOTE_KEY: &str = "note";

/// The editable payload of a node.
#[derive(Debug, Clone, PartialEq)]
pub struct NodeData {
    label: String,
    description: String,
    note: Option<String>,
    details: NodeDetails,
    extra: BTreeMap<String, AttrValue>,
}

impl NodeData {
    pub fn new(kind: NodeKind, label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            description: String::new(),
            note: None,
            details: NodeDetails::empty(kind),
            extra: BTreeMap::new(),
        }
    }

    pub fn kind(&self) -> NodeKind {
        self.details.kind()
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn set_label(&mut self, label: impl Into<String>) {
        self.label = label.into();
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn set_description(&mut self, description: impl Into<String>) {
        self.description = description.into();
    }

    pub fn note(&self) -> Option<&str> {
        self.note.as_deref()
    }

    pub fn set_note<T: Into<String>>(&mut self, note: Option<T>) {
        self.note = note.map(Into::into);
    }

    pub fn details(&self) -> &NodeDetails {
        &self.details
    }

    pub fn details_mut(&mut self) -> &mut NodeDetails {
        &mut self.details
    }

    pub fn extra(&self) -> &BTreeMap<String, AttrValue> {
        &self.extra
    }

    /// Inserts an extra attribute. Reserved keys and keys owned by the well-known fields are
    /// refused and `false` is returned.
    pub fn set_extra(&mut self, key: impl Into<String>, value: AttrValue) -> bool {
        let key = key.into();
        if is_reserved_key(&key) || self.is_well_known_key(&key) {
            return false;
        }
        self.extra.insert(key, value);
        true
    }

    /// Whether `key` is owned by a typed field of this payload rather than the extra map.
    pub fn is_well_known_key(&self, key: &str) -> bool {
        matches!(key, LABEL_KEY | DESCRIPTION_KEY | NOTE_KEY)
            || self.details.fields().iter().any(|field| field.key() == key)
    }

    /// Merges `patch` into this payload. Returns whether anything changed.
    ///
    /// A `details` value of a different kind is ignored: node types never change.
    pub fn apply_patch(&mut self, patch: NodeDataPatch) -> bool {
        let before = self.clone();
        let NodeDataPatch {
            label,
            description,
            note,
            details,
            extra,
        } = patch;

        if let Some(label) = label {
            self.label = label;
        }
        if let Some(description) = description {
            self.description = description;
        }
        if let Some(note) = note {
            self.note = note;
        }
        if let Some(details) = details.filter(|details| details.kind() == self.kind()) {
            self.details = details;
        }
        for (key, value) in extra {
            self.set_extra(key, value);
        }

        *self != before
    }

    pub fn to_wire(&self) -> Map<String, Value> {
        let mut map = Map::new();
        for (key, value) in &self.extra {
            map.insert(key.clone(), value.to_json());
        }
        self.details.write_wire(&mut map);
        map.insert(LABEL_KEY.to_owned(), Value::String(self.label.clone()));
        map.insert(
            DESCRIPTION_KEY.to_owned(),
            Value::String(self.description.clone()),
        );
        if let Some(note) = &self.note {
            map.insert(NOTE_KEY.to_owned(), Value::String(note.clone()));
        }
        map
    }

    /// Builds typed data from an open attribute bag. Reserved keys are dropped, a missing label
    /// falls back to the kind's default label.
    pub fn from_wire(kind: NodeKind, map: Map<String, Value>) -> Self {
        let mut attrs = map
            .into_iter()
            .filter(|(key, _)| !is_reserved_key(key))
            .map(|(key, value)| (key, AttrValue::from_json(value)))
            .collect::<BTreeMap<_, _>>();

        let label = match attrs.remove(LABEL_KEY) {
            Some(AttrValue::Text(label)) => label,
            Some(other) => other.display_text(),
            None => kind.default_label().to_owned(),
        };
        let description = match attrs.remove(DESCRIPTION_KEY) {
            Some(AttrValue::Text(description)) => description,
            Some(other) => other.display_text(),
            None => String::new(),
        };
        let note = match attrs.remove(NOTE_KEY) {
            Some(AttrValue::Text(note)) => Some(note),
            Some(AttrValue::Structured(Value::Null)) | None => None,
            Some(other) => Some(other.display_text()),
        };
        let details = NodeDetails::read_wire(kind, &mut attrs);

        Self {
            label,
            description,
            note,
            details,
            extra: attrs,
        }
    }
}

/// Partial update for `NodeData`: every `Some` overwrites, everything else is preserved.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NodeDataPatch {
    pub label: Option<String>,
    pub description: Option<String>,
    pub note: Option<Option<String>>,
    pub details: Option<NodeDetails>,
    pub extra: BTreeMap<String, AttrValue>,
}

impl NodeDataPatch {
    pub fn label(label: impl Into<String>) -> Self {
        Self {
            label: Some(label.into()),
            ..Self::default()
        }
    }

    pub fn description(description: impl Into<String>) -> Self {
        Self {
            description: Some(description.into()),
            ..Self::default()
        }
    }

    pub fn note(note: Option<String>) -> Self {
        Self {
            note: Some(note),
            ..Self::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.label.is_none()
            && self.description.is_none()
            && self.note.is_none()
            && self.details.is_none()
            && self.extra.is_empty()
    }
}

impl From<NodeData> for NodeDataPatch {
    fn from(data: NodeData) -> Self {
        Self {
            label: Some(data.label),
            description: Some(data.description),
            note: Some(data.note),
            details: Some(data.details),
            extra: data.extra,
        }
    }
}

/// A graph vertex. `id` and `kind` are fixed at construction.
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    id: NodeId,
    kind: NodeKind,
    position: Point,
    data: NodeData,
    style: Option<NodeStyle>,
}

impl Node {
    /// Builds a node with the kind's default style. `data` of another kind is replaced by an
    /// empty payload carrying the same label.
    pub fn new(id: NodeId, kind: NodeKind, position: Point, data: NodeData) -> Self {
        let data = if data.kind() == kind {
            data
        } else {
            NodeData::new(kind, data.label)
        };
        Self {
            id,
            kind,
            position,
            data,
            style: kind.default_style(),
        }
    }

    pub(crate) fn with_style(mut self, style: Option<NodeStyle>) -> Self {
        self.style = style;
        self
    }

    pub fn id(&self) -> &NodeId {
        &self.id
    }

    pub fn kind(&self) -> NodeKind {
        self.kind
    }

    pub fn position(&self) -> Point {
        self.position
    }

    pub(crate) fn set_position(&mut self, position: Point) {
        self.position = position;
    }

    pub fn data(&self) -> &NodeData {
        &self.data
    }

    pub(crate) fn data_mut(&mut self) -> &mut NodeData {
        &mut self.data
    }

    pub fn label(&self) -> &str {
        self.data.label()
    }

    pub fn style(&self) -> Option<&NodeStyle> {
        self.style.as_ref()
    }
}
