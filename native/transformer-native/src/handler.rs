//! Anonymous handler synthesis.
//!
//! `onTap={this.props.onTap}` cannot be forwarded by the host runtime, so the attribute is
//! pointed at a generated instance method that calls the runtime trigger with the prop
//! path: `func__abcde() { this.__triggerPropsFn("onTap", [...arguments]); }`.

use oxc_allocator::TakeIn;
use oxc_ast::ast::*;
use oxc_ast::{AstBuilder, NONE};
use oxc_span::{GetSpan, SPAN};
use tracing::trace;

use crate::codegen::print_expression;
use crate::constants::{fn_marker, PROPS_FIELD};
use crate::error::{Result, SourceContext, TransformError, TransformErrorKind};
use crate::naming::NameGenerator;
use crate::options::TransformOptions;
use crate::state::{ExtractionState, MethodEntry};

pub struct HandlerBuilder<'c, 'a> {
    pub ast: AstBuilder<'a>,
    pub options: &'c TransformOptions,
    pub source: SourceContext<'c>,
    pub names: &'c mut dyn NameGenerator,
    pub state: &'c mut ExtractionState,
}

impl<'c, 'a> HandlerBuilder<'c, 'a> {
    /// Rewrites `value` (the attribute's embedded expression) when it is rooted at
    /// `this.props`. Returns the class member to append when a new handler was allocated.
    pub fn build(
        &mut self,
        attr_name: &str,
        value: &mut Expression<'a>,
        is_bind: bool,
    ) -> Result<Option<ClassElement<'a>>> {
        let code = print_expression(value);
        if !code.starts_with("this.props") {
            return Ok(None);
        }

        let callback = if is_bind {
            match &*value {
                Expression::CallExpression(call) => call
                    .callee
                    .as_member_expression()
                    .map(|m| m.object()),
                _ => None,
            }
        } else {
            Some(&*value)
        };
        let method_name = callback.and_then(derive_method_name).ok_or_else(|| {
            TransformError::at(
                TransformErrorKind::UnsupportedEventValue,
                format!("cannot derive a callback name from `{}`", code),
                value.span(),
                &self.source,
            )
        })?;

        let existing = self.state.anonymous_methods.get(&method_name).cloned();
        let reused = existing.is_some();
        let func_name = existing.unwrap_or_else(|| self.names.next_name());
        self.state
            .anonymous_methods
            .insert(method_name.clone(), func_name.clone());

        let replacement = self.replacement(value, &func_name, is_bind);
        *value = replacement;
        self.state
            .methods
            .insert(func_name.clone(), MethodEntry::Synthesized);
        self.state.component_properties.insert(method_name.clone());

        if reused {
            trace!(handler = %func_name, prop = %method_name, "reused anonymous handler");
            return Ok(None);
        }
        if self.options.is_event_name(attr_name) {
            self.state.component_properties.insert(fn_marker(attr_name));
        }
        trace!(handler = %func_name, prop = %method_name, "synthesized anonymous handler");
        Ok(Some(self.trigger_method(&func_name, &method_name)))
    }

    fn this_member(&self, name: &str) -> Expression<'a> {
        Expression::from(self.ast.member_expression_static(
            SPAN,
            self.ast.expression_this(SPAN),
            self.ast.identifier_name(SPAN, self.ast.atom(name)),
            false,
        ))
    }

    /// `this.func__x` or `this.func__x.bind(<original bind arguments>)`.
    fn replacement(&self, value: &mut Expression<'a>, func_name: &str, is_bind: bool) -> Expression<'a> {
        let target = self.this_member(func_name);
        if !is_bind {
            return target;
        }
        let arguments = match value {
            Expression::CallExpression(call) => call.arguments.take_in(self.ast),
            _ => self.ast.vec(),
        };
        let bind = Expression::from(self.ast.member_expression_static(
            SPAN,
            target,
            self.ast.identifier_name(SPAN, "bind"),
            false,
        ));
        self.ast.expression_call(SPAN, bind, NONE, arguments, false)
    }

    /// `name() { this.<trigger>("<prop path>", [...arguments]); }`
    fn trigger_method(&self, func_name: &str, method_name: &str) -> ClassElement<'a> {
        let ast = self.ast;
        let args = ast.vec_from_array([
            Argument::from(ast.expression_string_literal(SPAN, ast.atom(method_name), None)),
            Argument::from(ast.expression_array(
                SPAN,
                ast.vec1(ast.array_expression_element_spread_element(
                    SPAN,
                    ast.expression_identifier(SPAN, "arguments"),
                )),
            )),
        ]);
        let call = ast.expression_call(
            SPAN,
            self.this_member(&self.options.trigger_method),
            NONE,
            args,
            false,
        );
        class_method(
            ast,
            func_name,
            MethodDefinitionKind::Method,
            ast.vec(),
            ast.vec1(ast.statement_expression(SPAN, call)),
        )
    }
}

/// Plain, non-static class method `name(params) { statements }`.
pub fn class_method<'a>(
    ast: AstBuilder<'a>,
    name: &str,
    kind: MethodDefinitionKind,
    params: oxc_allocator::Vec<'a, FormalParameter<'a>>,
    statements: oxc_allocator::Vec<'a, Statement<'a>>,
) -> ClassElement<'a> {
    let params = ast.formal_parameters(SPAN, FormalParameterKind::FormalParameter, params, NONE);
    let function = ast.alloc_function(
        SPAN,
        FunctionType::FunctionExpression,
        None,
        false,
        false,
        false,
        NONE,
        NONE,
        params,
        NONE,
        Some(ast.function_body(SPAN, ast.vec(), statements)),
    );
    ast.class_element_method_definition(
        SPAN,
        MethodDefinitionType::MethodDefinition,
        ast.vec(),
        ast.property_key_static_identifier(SPAN, ast.atom(name)),
        function,
        kind,
        false,
        false,
        false,
        false,
        None,
    )
}

/// Name a prop-rooted callback is deduplicated under: its [`prop_path`], or the final
/// property name for chains not rooted at the prop bag.
pub fn derive_method_name(expr: &Expression<'_>) -> Option<String> {
    let expr = expr.without_parentheses();
    if let Expression::Identifier(id) = expr {
        return Some(id.name.to_string());
    }
    let last = expr.as_member_expression()?.static_property_name()?;
    if has_props_root(expr) {
        return prop_path(expr);
    }
    Some(last.to_string())
}

/// Dotted path of a static member chain below `this.props`: `this.props.a.onTap` -> `a.onTap`.
pub fn prop_path(expr: &Expression<'_>) -> Option<String> {
    let mut segments = Vec::new();
    let mut current = expr.without_parentheses();
    while let Some(member) = current.as_member_expression() {
        if is_this_props(current) {
            segments.reverse();
            return (!segments.is_empty()).then(|| segments.join("."));
        }
        segments.push(member.static_property_name()?.to_string());
        current = member.object().without_parentheses();
    }
    None
}

fn has_props_root(expr: &Expression<'_>) -> bool {
    let mut current = expr.without_parentheses();
    while let Some(member) = current.as_member_expression() {
        if is_this_props(current) {
            return true;
        }
        current = member.object().without_parentheses();
    }
    false
}

/// `this.props`
pub fn is_this_props(expr: &Expression<'_>) -> bool {
    match expr.without_parentheses() {
        Expression::StaticMemberExpression(m) => {
            !m.optional
                && m.property.name == PROPS_FIELD
                && matches!(m.object.without_parentheses(), Expression::ThisExpression(_))
        }
        _ => false,
    }
}
