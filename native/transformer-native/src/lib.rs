//! # Class Component Transformer
//!
//! Rewrites a React-style class component so it can run on a mini-program host and
//! extracts what the template generator needs.
//!
//! ## Pipeline (one class, one pass each)
//!
//! 1. **Traverse**: record members and initial state, collect prop reads, turn prop-bound
//!    event callbacks into generated handlers, forward prop callback calls to the runtime
//!    trigger and hoist complex view-tree expressions into named constants.
//! 2. **Project components**: custom components imported by the module, kebab-cased, with
//!    their resolved paths.
//! 3. **Normalize constructor**: synthesize one when missing; outside test builds rename it
//!    so the host runtime owns the real constructor.
//! 4. **Resolve lifecycle props**: props read through the first parameter of lifecycle hooks.
//! 5. **Render**: hand the extraction state to the render collaborator.
//!
//! Any error aborts the whole class. No partially rewritten class is ever returned.

#[cfg(feature = "napi")]
use napi_derive::napi;

mod codegen;
mod component;
mod constants;
mod constructor;
mod error;
mod handler;
mod hoist;
mod lifecycle;
mod naming;
mod options;
mod parse;
mod render;
mod scope;
mod state;
mod transform;
mod transformer;

#[cfg(test)]
mod transformer_tests;

pub use component::{resolve_component_path, ComponentRef};
pub use error::{Result, SourceContext, TransformError, TransformErrorKind};
pub use hoist::{AnonymousStateHoister, HoistRequest, Hoisted, Placement, StateHoister};
pub use naming::{NameGenerator, RandomLetters, SequentialNames};
pub use options::{BuildMode, TransformOptions};
pub use parse::compile_component;
pub use render::{RenderContext, RenderGenerator, TemplateRenderer};
pub use scope::ModuleBindings;
pub use state::{Analysis, ComponentDataEntry, LoopStateName, MethodSummary};
pub use transformer::{ClassTransformer, CompileOutput, TransformResult};

#[cfg(feature = "napi")]
#[napi]
pub fn transform_component_native(
    source: String,
    options_json: serde_json::Value,
) -> napi::Result<serde_json::Value> {
    let options: TransformOptions = serde_json::from_value(options_json)
        .map_err(|e| napi::Error::from_reason(TransformError::invalid_options(e.to_string()).to_json()))?;

    let output = compile_component(&source, &options)
        .map_err(|e| napi::Error::from_reason(e.to_json()))?;

    serde_json::to_value(&output)
        .map_err(|e| napi::Error::from_reason(format!("Serialization failed: {}", e)))
}
