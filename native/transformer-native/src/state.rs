//! Extraction tables shared by every phase of one component compilation.

use indexmap::{IndexMap, IndexSet};
use oxc_span::Span;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum MemberKind {
    Method,
    Constructor,
    Getter,
    Setter,
    /// Field whose initializer is a function or arrow.
    Field,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MethodEntry {
    /// Declared in the class body. The span locates the member after renames.
    Defined { kind: MemberKind, span: Span },
    /// Generated handler; its body is appended to the class separately.
    Synthesized,
}

impl MethodEntry {
    pub fn span(&self) -> Option<Span> {
        match self {
            Self::Defined { span, .. } => Some(*span),
            Self::Synthesized => None,
        }
    }
}

/// Per-instance data a custom component needs inside an iteration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ComponentDataEntry {
    pub key: String,
    pub value: String,
}

#[derive(Debug, Default)]
pub struct ExtractionState {
    pub methods: IndexMap<String, MethodEntry>,
    pub render_method: Option<Span>,
    pub init_state: IndexSet<String>,
    pub jsx_referenced: IndexSet<String>,
    /// Prop names read inside view-tree expressions outside event attributes.
    pub used_state: IndexSet<String>,
    pub custom_components: IndexMap<String, String>,
    /// Derived prop path -> generated handler name.
    pub anonymous_methods: IndexMap<String, String>,
    /// Iteration call span -> generated loop-item variable name.
    pub loop_state_names: IndexMap<Span, String>,
    pub custom_component_data: Vec<ComponentDataEntry>,
    pub component_properties: IndexSet<String>,
}

impl ExtractionState {
    pub fn custom_component_names(&self) -> IndexSet<String> {
        self.custom_components.keys().cloned().collect()
    }

    pub fn snapshot(&self) -> Analysis {
        Analysis {
            methods: self
                .methods
                .iter()
                .map(|(name, entry)| MethodSummary {
                    name: name.clone(),
                    kind: match entry {
                        MethodEntry::Defined { kind, .. } => Some(*kind),
                        MethodEntry::Synthesized => None,
                    },
                })
                .collect(),
            init_state: self.init_state.iter().cloned().collect(),
            jsx_referenced: self.jsx_referenced.iter().cloned().collect(),
            used_state: self.used_state.iter().cloned().collect(),
            custom_components: self
                .custom_components
                .iter()
                .map(|(name, path)| (name.clone(), path.clone()))
                .collect(),
            anonymous_methods: self
                .anonymous_methods
                .iter()
                .map(|(prop, name)| (prop.clone(), name.clone()))
                .collect(),
            loop_state_names: self
                .loop_state_names
                .iter()
                .map(|(span, name)| LoopStateName {
                    start: span.start,
                    end: span.end,
                    name: name.clone(),
                })
                .collect(),
            custom_component_data: self.custom_component_data.clone(),
            component_properties: self.component_properties.iter().cloned().collect(),
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// SERIALIZABLE SNAPSHOT
// ═══════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MethodSummary {
    pub name: String,
    /// `None` for generated handlers.
    pub kind: Option<MemberKind>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoopStateName {
    pub start: u32,
    pub end: u32,
    pub name: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Analysis {
    pub methods: Vec<MethodSummary>,
    pub init_state: Vec<String>,
    pub jsx_referenced: Vec<String>,
    pub used_state: Vec<String>,
    pub custom_components: IndexMap<String, String>,
    pub anonymous_methods: IndexMap<String, String>,
    pub loop_state_names: Vec<LoopStateName>,
    pub custom_component_data: Vec<ComponentDataEntry>,
    pub component_properties: Vec<String>,
}
