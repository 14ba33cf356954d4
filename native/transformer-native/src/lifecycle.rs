//! Props consumed only inside lifecycle hooks.
//!
//! `componentWillReceiveProps({ a, ...rest }) { use(rest.b) }` never touches `this.props`,
//! yet the component depends on `a` and `b`. The first parameter of each recognized hook is
//! inspected, and reads through the binding it introduces are traced in the hook body.

use indexmap::IndexSet;
use oxc_ast::ast::*;
use oxc_ast_visit::walk::{walk_expression, walk_variable_declarator};
use oxc_ast_visit::Visit;
use oxc_span::{GetSpan, Span};
use tracing::trace;

use crate::constants::PROPS_LIFECYCLES;
use crate::error::{Result, SourceContext, TransformError, TransformErrorKind};
use crate::state::ExtractionState;

pub fn resolve_lifecycle_props(
    class: &Class<'_>,
    state: &mut ExtractionState,
    source: &SourceContext<'_>,
) -> Result<()> {
    let hooks: Vec<(String, Span)> = state
        .methods
        .iter()
        .filter(|(name, _)| PROPS_LIFECYCLES.contains(name.as_str()))
        .filter_map(|(name, entry)| entry.span().map(|span| (name.clone(), span)))
        .collect();

    for (name, span) in hooks {
        let Some((params, body)) = member_function(class, span) else {
            continue;
        };
        let mut properties = IndexSet::new();
        let traced = match params.items.first() {
            Some(param) => props_param(param, &mut properties, source)?,
            None => match &params.rest {
                Some(rest) => {
                    return Err(unsupported_param(rest.span, source));
                }
                None => continue,
            },
        };
        if let (Some(binding), Some(body)) = (traced, body) {
            let mut reads = PropReads {
                binding: &binding,
                properties: &mut properties,
            };
            reads.visit_function_body(body);
        }
        trace!(hook = %name, count = properties.len(), "resolved lifecycle props");
        state.component_properties.extend(properties);
    }
    Ok(())
}

/// Parameters and body of the method, or function-valued field, declared at `span`.
pub(crate) fn member_function<'c, 'a>(
    class: &'c Class<'a>,
    span: Span,
) -> Option<(&'c FormalParameters<'a>, Option<&'c FunctionBody<'a>>)> {
    class.body.body.iter().find_map(|element| match element {
        ClassElement::MethodDefinition(m) if m.span == span => {
            Some((&*m.value.params, m.value.body.as_deref()))
        }
        ClassElement::PropertyDefinition(p) if p.span == span => match &p.value {
            Some(Expression::ArrowFunctionExpression(arrow)) => {
                Some((&*arrow.params, Some(&*arrow.body)))
            }
            Some(Expression::FunctionExpression(func)) => {
                Some((&*func.params, func.body.as_deref()))
            }
            _ => None,
        },
        _ => None,
    })
}

/// Records the fields an object-pattern parameter destructures and returns the binding
/// whose reads must be traced: the parameter itself, or the pattern's rest element.
fn props_param(
    param: &FormalParameter<'_>,
    properties: &mut IndexSet<String>,
    source: &SourceContext<'_>,
) -> Result<Option<String>> {
    if param.initializer.is_some() {
        return Err(unsupported_param(param.span, source));
    }
    match &param.pattern {
        BindingPattern::BindingIdentifier(id) => Ok(Some(id.name.to_string())),
        BindingPattern::ObjectPattern(pattern) => {
            for property in &pattern.properties {
                if let Some(name) = property.key.static_name() {
                    properties.insert(name.to_string());
                }
            }
            Ok(pattern.rest.as_ref().and_then(|rest| match &rest.argument {
                BindingPattern::BindingIdentifier(id) => Some(id.name.to_string()),
                _ => None,
            }))
        }
        other => Err(unsupported_param(other.span(), source)),
    }
}

fn unsupported_param(span: Span, source: &SourceContext<'_>) -> TransformError {
    TransformError::at(
        TransformErrorKind::UnsupportedLifecycleParam,
        "the first parameter of this lifecycle method must be an identifier or an object pattern",
        span,
        source,
    )
}

struct PropReads<'b> {
    binding: &'b str,
    properties: &'b mut IndexSet<String>,
}

impl<'a, 'b> Visit<'a> for PropReads<'b> {
    fn visit_expression(&mut self, expr: &Expression<'a>) {
        if let Expression::StaticMemberExpression(member) = expr {
            if member.object.is_specific_id(self.binding) {
                self.properties.insert(member.property.name.to_string());
            }
        }
        walk_expression(self, expr);
    }

    fn visit_variable_declarator(&mut self, it: &VariableDeclarator<'a>) {
        let from_binding = it
            .init
            .as_ref()
            .is_some_and(|init| init.is_specific_id(self.binding));
        if from_binding {
            if let BindingPattern::ObjectPattern(pattern) = &it.id {
                for property in &pattern.properties {
                    if let Some(name) = property.key.static_name() {
                        self.properties.insert(name.to_string());
                    }
                }
            }
        }
        walk_variable_declarator(self, it);
    }
}
