//! Orchestrator for one component class.
//!
//! Phases run in a fixed order against the caller's class declaration:
//! traverse -> project components -> normalize constructor -> resolve lifecycle props ->
//! render. Any error aborts the compilation; the class may already have been rewritten
//! and must then be discarded.

use oxc_ast::ast::Class;
use oxc_ast::AstBuilder;
use serde::Serialize;
use tracing::debug;

use crate::component::{project_components, ComponentRef};
use crate::constructor::normalize_constructor;
use crate::error::{Result, SourceContext, TransformError, TransformErrorKind};
use crate::hoist::{AnonymousStateHoister, StateHoister};
use crate::lifecycle::{member_function, resolve_lifecycle_props};
use crate::naming::{generator_for, NameGenerator};
use crate::options::TransformOptions;
use crate::render::{RenderContext, RenderGenerator, TemplateRenderer};
use crate::scope::ModuleBindings;
use crate::state::{Analysis, ExtractionState};
use crate::transform::ClassTraverser;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TransformResult {
    pub template: String,
    pub components: Vec<ComponentRef>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CompileOutput {
    pub result: TransformResult,
    pub analysis: Analysis,
}

/// Compiles exactly one component class. `compile` consumes the transformer, so an
/// instance can never be shared between two declarations.
pub struct ClassTransformer<'c, 'a> {
    ast: AstBuilder<'a>,
    source: SourceContext<'c>,
    options: &'c TransformOptions,
    bindings: &'c ModuleBindings,
    names: Box<dyn NameGenerator>,
    hoister: Box<dyn StateHoister<'a>>,
    renderer: Box<dyn RenderGenerator>,
    state: ExtractionState,
}

impl<'c, 'a> ClassTransformer<'c, 'a> {
    pub fn new(
        ast: AstBuilder<'a>,
        source: SourceContext<'c>,
        options: &'c TransformOptions,
        bindings: &'c ModuleBindings,
    ) -> Self {
        Self {
            ast,
            source,
            options,
            bindings,
            names: generator_for(options),
            hoister: Box::new(AnonymousStateHoister::new()),
            renderer: Box::new(TemplateRenderer::new(options)),
            state: ExtractionState::default(),
        }
    }

    pub fn with_name_generator(mut self, names: Box<dyn NameGenerator>) -> Self {
        self.names = names;
        self
    }

    pub fn with_hoister(mut self, hoister: Box<dyn StateHoister<'a>>) -> Self {
        self.hoister = hoister;
        self
    }

    pub fn with_renderer(mut self, renderer: Box<dyn RenderGenerator>) -> Self {
        self.renderer = renderer;
        self
    }

    pub fn compile(mut self, class: &mut Class<'a>) -> Result<CompileOutput> {
        debug!(file = self.source.path, "traversing component class");
        ClassTraverser::new(
            self.ast,
            self.options,
            self.source,
            self.bindings,
            self.names.as_mut(),
            self.hoister.as_mut(),
            &mut self.state,
        )
        .run(class)?;
        debug!(
            methods = self.state.methods.len(),
            init_state = self.state.init_state.len(),
            handlers = self.state.anonymous_methods.len(),
            "extraction complete"
        );

        let components = project_components(&self.state.custom_components, &self.options.source_path);
        debug!(count = components.len(), "projected custom components");

        normalize_constructor(self.ast, class, &self.state, self.options);
        resolve_lifecycle_props(class, &mut self.state, &self.source)?;
        debug!(props = self.state.component_properties.len(), "resolved component properties");

        let render = self
            .state
            .render_method
            .and_then(|span| member_function(class, span))
            .and_then(|(_, body)| body);
        let Some(render) = render else {
            return Err(TransformError::at(
                TransformErrorKind::MissingRender,
                "component class does not define a render method",
                class.span,
                &self.source,
            ));
        };

        let state = &self.state;
        let ctx = RenderContext {
            render,
            source: self.source.text,
            methods: &state.methods,
            init_state: &state.init_state,
            jsx_referenced: &state.jsx_referenced,
            used_state: &state.used_state,
            loop_state_names: &state.loop_state_names,
            custom_component_names: state.custom_component_names(),
            custom_component_data: &state.custom_component_data,
            component_properties: &state.component_properties,
        };
        let template = self.renderer.generate(&ctx)?;
        debug!(bytes = template.len(), "rendered template");

        Ok(CompileOutput {
            result: TransformResult {
                template,
                components,
            },
            analysis: self.state.snapshot(),
        })
    }
}
