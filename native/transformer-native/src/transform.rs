//! Single-pass extraction over a component class.
//!
//! `ClassTraverser` walks the class declaration once, collecting the method table, the
//! initial state shape and every prop the component reads, while rewriting the view tree
//! in place: prop-bound event callbacks become generated handlers, forwarded prop calls
//! become runtime trigger calls and complex embedded expressions are hoisted into named
//! constants.

use oxc_allocator::{TakeIn, Vec as ArenaVec};
use oxc_ast::ast::*;
use oxc_ast::{AstBuilder, NONE};
use oxc_ast_visit::walk_mut::*;
use oxc_ast_visit::VisitMut;
use oxc_span::{Atom, GetSpan, Span, SPAN};
use oxc_syntax::scope::ScopeFlags;
use tracing::{trace, warn};

use crate::codegen::jsx_attribute_name;
use crate::constants::{
    fn_marker, CHILDREN_PROP, DEFAULT_COMPONENTS, RENDER_METHOD, SLOT_TAG, STATE_FIELD,
};
use crate::error::{Result, SourceContext, TransformError, TransformErrorKind};
use crate::handler::{is_this_props, prop_path, HandlerBuilder};
use crate::hoist::{
    contains_jsx, is_complex_expression, HoistRequest, Hoisted, Placement, StateHoister,
};
use crate::naming::NameGenerator;
use crate::options::TransformOptions;
use crate::scope::ModuleBindings;
use crate::state::{ExtractionState, MemberKind, MethodEntry};

pub struct ClassTraverser<'c, 'a> {
    ast: AstBuilder<'a>,
    options: &'c TransformOptions,
    source: SourceContext<'c>,
    bindings: &'c ModuleBindings,
    names: &'c mut dyn NameGenerator,
    hoister: &'c mut dyn StateHoister<'a>,
    state: &'c mut ExtractionState,

    class_depth: usize,
    in_constructor: bool,
    /// Names of the JSX attributes enclosing the current node, innermost last.
    attributes: Vec<String>,
    container_depth: usize,
    /// Declarations waiting to be inserted before the statement being visited, one
    /// frame per statement list.
    frames: Vec<Vec<Statement<'a>>>,
    /// Declarations of hoisted `if` tests, claimed by whoever owns the `if` statement.
    conditional: Vec<Statement<'a>>,
    /// Iteration calls being visited, with the frame depth at which they were entered.
    loops: Vec<(Span, usize)>,
    generated: Vec<ClassElement<'a>>,
    error: Option<TransformError>,
}

impl<'c, 'a> ClassTraverser<'c, 'a> {
    pub fn new(
        ast: AstBuilder<'a>,
        options: &'c TransformOptions,
        source: SourceContext<'c>,
        bindings: &'c ModuleBindings,
        names: &'c mut dyn NameGenerator,
        hoister: &'c mut dyn StateHoister<'a>,
        state: &'c mut ExtractionState,
    ) -> Self {
        Self {
            ast,
            options,
            source,
            bindings,
            names,
            hoister,
            state,
            class_depth: 0,
            in_constructor: false,
            attributes: Vec::new(),
            container_depth: 0,
            frames: Vec::new(),
            conditional: Vec::new(),
            loops: Vec::new(),
            generated: Vec::new(),
            error: None,
        }
    }

    /// Traverses `class` and appends the generated handler methods to its body.
    pub fn run(mut self, class: &mut Class<'a>) -> Result<()> {
        self.visit_class(class);
        if let Some(error) = self.error {
            return Err(error);
        }
        for member in self.generated {
            class.body.body.push(member);
        }
        Ok(())
    }

    fn fail(&mut self, kind: TransformErrorKind, message: String, span: Span) {
        if self.error.is_none() {
            self.error = Some(TransformError::at(kind, message, span, &self.source));
        }
    }

    // ═══════════════════════════════════════════════════════════════════════════
    // MEMBERS AND INITIAL STATE
    // ═══════════════════════════════════════════════════════════════════════════

    fn record_method(&mut self, name: &str, kind: MemberKind, span: Span) {
        trace!(method = name, ?kind, "recorded class member");
        self.state
            .methods
            .insert(name.to_string(), MethodEntry::Defined { kind, span });
        if name == RENDER_METHOD && self.state.render_method.is_none() {
            self.state.render_method = Some(span);
        }
    }

    fn collect_state_keys(&mut self, object: &ObjectExpression<'a>) {
        for property in &object.properties {
            if let ObjectPropertyKind::ObjectProperty(p) = property {
                if let PropertyKey::StaticIdentifier(key) = &p.key {
                    self.state.init_state.insert(key.name.to_string());
                }
            }
        }
    }

    // ═══════════════════════════════════════════════════════════════════════════
    // PROP READS
    // ═══════════════════════════════════════════════════════════════════════════

    fn in_event_attribute(&self) -> bool {
        self.attributes
            .last()
            .is_some_and(|name| self.options.is_event_name(name))
    }

    fn record_prop_read(&mut self, name: &str) {
        self.state.component_properties.insert(name.to_string());
        if self.container_depth > 0 && !self.in_event_attribute() {
            self.state.used_state.insert(name.to_string());
        }
        trace!(prop = name, "recorded prop read");
    }

    fn slot_element(&self) -> Expression<'a> {
        let opening = self.ast.jsx_opening_element(
            SPAN,
            self.ast.jsx_element_name_identifier(SPAN, SLOT_TAG),
            NONE,
            self.ast.vec(),
        );
        self.ast
            .expression_jsx_element(SPAN, opening, self.ast.vec(), NONE)
    }

    // ═══════════════════════════════════════════════════════════════════════════
    // FORWARDED CALLS
    // ═══════════════════════════════════════════════════════════════════════════

    /// `this.props.a.onSave(x)` / `this.props.onSave.call(this, x)` ->
    /// `this.__triggerPropsFn("a.onSave", [null].concat([x]))`.
    fn forward_call(&mut self, call: &mut CallExpression<'a>) -> Option<Expression<'a>> {
        let Expression::StaticMemberExpression(callee) = &call.callee else {
            return None;
        };
        if !callee.object.is_member_expression() {
            return None;
        }
        let property = callee.property.name.as_str();
        let chain = if self.options.is_event_name(property) {
            &call.callee
        } else if property == "call" || property == "apply" {
            &callee.object
        } else {
            return None;
        };
        self.state.component_properties.insert(fn_marker(property));
        let path = prop_path(chain)?;

        trace!(path = %path, "forwarded prop callback call");
        let arguments = call.arguments.take_in(self.ast);
        Some(self.trigger_call(call.span, &path, arguments))
    }

    fn trigger_call(
        &self,
        span: Span,
        path: &str,
        arguments: ArenaVec<'a, Argument<'a>>,
    ) -> Expression<'a> {
        let ast = self.ast;
        let forwarded = ast.expression_array(
            SPAN,
            ast.vec_from_iter(arguments.into_iter().map(ArrayExpressionElement::from)),
        );
        let concat = Expression::from(ast.member_expression_static(
            SPAN,
            ast.expression_array(
                SPAN,
                ast.vec1(ArrayExpressionElement::from(ast.expression_null_literal(SPAN))),
            ),
            ast.identifier_name(SPAN, "concat"),
            false,
        ));
        let slots = ast.expression_call(SPAN, concat, NONE, ast.vec1(Argument::from(forwarded)), false);
        let trigger = Expression::from(ast.member_expression_static(
            SPAN,
            ast.expression_this(SPAN),
            ast.identifier_name(SPAN, ast.atom(&self.options.trigger_method)),
            false,
        ));
        ast.expression_call(
            span,
            trigger,
            NONE,
            ast.vec_from_array([
                Argument::from(ast.expression_string_literal(SPAN, ast.atom(path), None)),
                Argument::from(slots),
            ]),
            false,
        )
    }

    // ═══════════════════════════════════════════════════════════════════════════
    // EVENT ATTRIBUTES
    // ═══════════════════════════════════════════════════════════════════════════

    fn bind_event_value(&mut self, name: &str, container: &mut JSXExpressionContainer<'a>) {
        let span = container.span;
        let Some(value) = container.expression.as_expression_mut() else {
            self.fail(
                TransformErrorKind::UnsupportedEventValue,
                format!("event attribute `{}` has no value", name),
                span,
            );
            return;
        };
        let is_bind = is_bind_call(value);
        if !is_bind && (is_complex_expression(value) || !value.is_member_expression()) {
            self.fail(
                TransformErrorKind::UnsupportedEventValue,
                format!(
                    "event attribute `{}` must reference a class method or prop callback, or use bind",
                    name
                ),
                value.span(),
            );
            return;
        }

        let mut builder = HandlerBuilder {
            ast: self.ast,
            options: self.options,
            source: self.source,
            names: &mut *self.names,
            state: &mut *self.state,
        };
        match builder.build(name, value, is_bind) {
            Ok(Some(member)) => self.generated.push(member),
            Ok(None) => {}
            Err(error) => {
                if self.error.is_none() {
                    self.error = Some(error);
                }
            }
        }
    }

    // ═══════════════════════════════════════════════════════════════════════════
    // HOISTING
    // ═══════════════════════════════════════════════════════════════════════════

    fn current_loop(&self) -> Option<Span> {
        self.loops
            .last()
            .filter(|(_, depth)| self.frames.len() > *depth)
            .map(|(span, _)| *span)
    }

    fn hoist(&mut self, expr: &mut Expression<'a>, is_logical: bool) {
        if self.error.is_some() {
            return;
        }
        if self.frames.is_empty() {
            warn!(span = ?expr.span(), "no enclosing statement list, complex expression left in place");
            return;
        }
        let request = HoistRequest {
            expression: expr.take_in(self.ast),
            is_logical,
            loop_call: self.current_loop(),
        };
        let Hoisted {
            replacement,
            declaration,
            placement,
            referenced,
            loop_state,
            component_data,
        } = self.hoister.hoist(self.ast, request);
        *expr = replacement;

        match placement {
            Placement::EnclosingStatement => {
                if let Some(frame) = self.frames.last_mut() {
                    frame.push(declaration);
                }
            }
            Placement::OwningConditional => self.conditional.push(declaration),
        }
        if let Some(name) = referenced {
            trace!(name = %name, "hoisted view-tree state");
            self.state.jsx_referenced.insert(name);
        }
        if let Some((call, name)) = loop_state {
            trace!(name = %name, "hoisted loop state");
            self.state.loop_state_names.insert(call, name);
        }
        self.state.custom_component_data.extend(component_data);
    }

    /// Visits the consequent or alternate of an `if`. Declarations hoisted out of the
    /// branch are wrapped into a block with it so they only run when the branch is taken.
    fn visit_branch(&mut self, branch: &mut Statement<'a>) {
        let outer = std::mem::take(&mut self.conditional);
        self.frames.push(Vec::new());
        self.visit_statement(branch);
        let mut declarations = self.frames.pop().unwrap_or_default();
        declarations.append(&mut self.conditional);
        self.conditional = outer;
        if declarations.is_empty() {
            return;
        }
        declarations.push(branch.take_in(self.ast));
        *branch = self
            .ast
            .statement_block(SPAN, self.ast.vec_from_iter(declarations));
    }
}

/// `<expr>.bind(...)`
fn is_bind_call(expr: &Expression<'_>) -> bool {
    match expr {
        Expression::CallExpression(call) => call
            .callee
            .as_member_expression()
            .and_then(|m| m.static_property_name())
            == Some("bind"),
        _ => false,
    }
}

/// `this.props.<name>`
fn props_member_name<'a>(expr: &Expression<'a>) -> Option<Atom<'a>> {
    match expr {
        Expression::StaticMemberExpression(m) if is_this_props(&m.object) => Some(m.property.name),
        _ => None,
    }
}

/// `list.map(item => ...)`
fn is_iteration_call(call: &CallExpression<'_>) -> bool {
    let is_map = call
        .callee
        .as_member_expression()
        .and_then(|m| m.static_property_name())
        == Some("map");
    is_map
        && matches!(
            call.arguments.first(),
            Some(Argument::ArrowFunctionExpression(_) | Argument::FunctionExpression(_))
        )
}

impl<'c, 'a> VisitMut<'a> for ClassTraverser<'c, 'a> {
    fn visit_statements(&mut self, it: &mut ArenaVec<'a, Statement<'a>>) {
        self.frames.push(Vec::new());
        let mut index = 0;
        while index < it.len() {
            self.visit_statement(&mut it[index]);
            let mut pending = self.frames.last_mut().map(std::mem::take).unwrap_or_default();
            pending.append(&mut self.conditional);
            let inserted = pending.len();
            for (offset, declaration) in pending.into_iter().enumerate() {
                it.insert(index + offset, declaration);
            }
            index += inserted + 1;
        }
        self.frames.pop();
    }

    fn visit_class(&mut self, it: &mut Class<'a>) {
        self.class_depth += 1;
        walk_class(self, it);
        self.class_depth -= 1;
    }

    fn visit_method_definition(&mut self, it: &mut MethodDefinition<'a>) {
        let top_level = self.class_depth == 1;
        if top_level && !it.computed {
            if let Some(name) = it.key.static_name() {
                let kind = match it.kind {
                    MethodDefinitionKind::Constructor => MemberKind::Constructor,
                    MethodDefinitionKind::Method => MemberKind::Method,
                    MethodDefinitionKind::Get => MemberKind::Getter,
                    MethodDefinitionKind::Set => MemberKind::Setter,
                };
                self.record_method(&name, kind, it.span);
            }
        }
        let is_constructor = top_level && it.kind == MethodDefinitionKind::Constructor;
        let outer = std::mem::replace(&mut self.in_constructor, is_constructor);
        walk_method_definition(self, it);
        self.in_constructor = outer;
    }

    fn visit_property_definition(&mut self, it: &mut PropertyDefinition<'a>) {
        if self.class_depth == 1 && !it.computed {
            if let Some(name) = it.key.static_name() {
                if matches!(
                    it.value,
                    Some(Expression::ArrowFunctionExpression(_) | Expression::FunctionExpression(_))
                ) {
                    self.record_method(&name, MemberKind::Field, it.span);
                }
                if name == STATE_FIELD {
                    if let Some(Expression::ObjectExpression(object)) = &it.value {
                        self.collect_state_keys(object);
                    }
                }
            }
        }
        walk_property_definition(self, it);
    }

    fn visit_assignment_expression(&mut self, it: &mut AssignmentExpression<'a>) {
        if self.in_constructor {
            if let (AssignmentTarget::StaticMemberExpression(target), Expression::ObjectExpression(object)) =
                (&it.left, &it.right)
            {
                if target.property.name == STATE_FIELD
                    && matches!(target.object, Expression::ThisExpression(_))
                {
                    self.collect_state_keys(object);
                }
            }
        }
        walk_assignment_expression(self, it);
    }

    fn visit_variable_declarator(&mut self, it: &mut VariableDeclarator<'a>) {
        if it.init.as_ref().is_some_and(|init| is_this_props(init)) {
            if let BindingPattern::ObjectPattern(pattern) = &it.id {
                if let Some(rest) = &pattern.rest {
                    self.fail(
                        TransformErrorKind::UnsupportedDestructuring,
                        "rest destructuring of this.props is not supported, list every prop".to_string(),
                        rest.span,
                    );
                    return;
                }
                for property in &pattern.properties {
                    if let Some(name) = property.key.static_name() {
                        self.state.component_properties.insert(name.to_string());
                    }
                }
            }
        }
        walk_variable_declarator(self, it);
    }

    fn visit_if_statement(&mut self, it: &mut IfStatement<'a>) {
        let hoist = contains_jsx(&it.consequent) && is_complex_expression(&it.test);
        self.visit_expression(&mut it.test);
        self.visit_branch(&mut it.consequent);
        if let Some(alternate) = &mut it.alternate {
            self.visit_branch(alternate);
        }
        if hoist {
            self.hoist(&mut it.test, true);
        }
    }

    fn visit_expression(&mut self, expr: &mut Expression<'a>) {
        if self.error.is_some() {
            return;
        }
        if let Some(name) = props_member_name(expr) {
            if name == CHILDREN_PROP {
                *expr = self.slot_element();
                return;
            }
            self.record_prop_read(name.as_str());
        }
        let forwarded = match expr {
            Expression::CallExpression(call) => self.forward_call(call),
            _ => None,
        };
        if let Some(replacement) = forwarded {
            *expr = replacement;
        }
        walk_expression(self, expr);
    }

    fn visit_call_expression(&mut self, it: &mut CallExpression<'a>) {
        if !is_iteration_call(it) {
            walk_call_expression(self, it);
            return;
        }
        self.loops.push((it.span, self.frames.len()));
        walk_call_expression(self, it);
        self.loops.pop();
    }

    fn visit_arrow_function_expression(&mut self, it: &mut ArrowFunctionExpression<'a>) {
        walk_arrow_function_expression(self, it);
        // A hoisted declaration turned the expression body into a statement list.
        if it.expression && it.body.statements.len() > 1 {
            it.expression = false;
            if let Some(last) = it.body.statements.last_mut() {
                if let Statement::ExpressionStatement(statement) = last {
                    let span = statement.span;
                    let argument = statement.expression.take_in(self.ast);
                    *last = self.ast.statement_return(span, Some(argument));
                }
            }
        }
    }

    fn visit_function(&mut self, it: &mut Function<'a>, flags: ScopeFlags) {
        if self.error.is_none() {
            walk_function(self, it, flags);
        }
    }

    // ═══════════════════════════════════════════════════════════════════════════
    // VIEW TREE
    // ═══════════════════════════════════════════════════════════════════════════

    fn visit_jsx_opening_element(&mut self, it: &mut JSXOpeningElement<'a>) {
        let bindings = self.bindings;
        let resolved = match &it.name {
            JSXElementName::IdentifierReference(id) if !DEFAULT_COMPONENTS.contains(id.name.as_str()) => {
                bindings.resolve_import(id).map(|path| (id.name.to_string(), path))
            }
            JSXElementName::Identifier(id) if !DEFAULT_COMPONENTS.contains(id.name.as_str()) => {
                bindings
                    .resolve_import_name(&id.name)
                    .map(|path| (id.name.to_string(), path))
            }
            _ => None,
        };
        if let Some((name, path)) = resolved {
            trace!(component = %name, path, "discovered custom component");
            self.state.custom_components.insert(name, path.to_string());
        }
        walk_jsx_opening_element(self, it);
    }

    fn visit_jsx_attribute(&mut self, it: &mut JSXAttribute<'a>) {
        let name = jsx_attribute_name(&it.name);
        if self.options.is_event_name(&name) && matches!(it.name, JSXAttributeName::Identifier(_)) {
            if let Some(JSXAttributeValue::ExpressionContainer(container)) = &mut it.value {
                self.bind_event_value(&name, container);
            }
        }
        self.attributes.push(name);
        walk_jsx_attribute(self, it);
        self.attributes.pop();
    }

    fn visit_jsx_expression_container(&mut self, it: &mut JSXExpressionContainer<'a>) {
        if self.error.is_some() {
            return;
        }
        let hoist = it
            .expression
            .as_expression()
            .is_some_and(|expr| is_complex_expression(expr) && !is_bind_call(expr));

        self.container_depth += 1;
        walk_jsx_expression_container(self, it);
        self.container_depth -= 1;

        if hoist {
            if let Some(expr) = it.expression.as_expression_mut() {
                self.hoist(expr, false);
            }
        }
    }
}
