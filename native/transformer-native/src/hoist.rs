//! State hoisting for complex view-tree expressions.
//!
//! A "complex" expression (calls, templates, object literals) inside the view tree cannot
//! be re-evaluated by the host template engine, so it is lifted into a named constant
//! declared before the enclosing statement. The traverser owns the tree; a hoister only
//! receives the detached expression and answers with a [`Hoisted`] describing every effect,
//! which the traverser then applies.

use oxc_ast::ast::*;
use oxc_ast::{AstBuilder, NONE};
use oxc_ast_visit::walk::{walk_array_expression, walk_call_expression};
use oxc_ast_visit::Visit;
use oxc_span::{Span, SPAN};
use std::collections::HashMap;

use crate::codegen::print_expression;
use crate::constants::{ANONYMOUS_STATE_PREFIX, LOOP_STATE_PREFIX};
use crate::state::ComponentDataEntry;

pub struct HoistRequest<'a> {
    pub expression: Expression<'a>,
    /// Test of a conditional statement rather than an embedded view-tree expression.
    pub is_logical: bool,
    /// Span of the enclosing iteration call when hoisting inside its callback.
    pub loop_call: Option<Span>,
}

/// Where the traverser inserts a hoisted declaration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placement {
    /// Before the statement enclosing the expression.
    EnclosingStatement,
    /// Directly before the `if` whose test was hoisted. An `if` in branch position is
    /// wrapped in a block together with the declaration.
    OwningConditional,
}

pub struct Hoisted<'a> {
    /// Takes the expression's place in the tree.
    pub replacement: Expression<'a>,
    pub declaration: Statement<'a>,
    pub placement: Placement,
    /// Identifier the render collaborator must treat as view-tree referenced.
    pub referenced: Option<String>,
    pub loop_state: Option<(Span, String)>,
    pub component_data: Vec<ComponentDataEntry>,
}

pub trait StateHoister<'a> {
    fn hoist(&mut self, ast: AstBuilder<'a>, request: HoistRequest<'a>) -> Hoisted<'a>;
}

/// Names hoisted values `anonymousState__temp`, `anonymousState__temp2`, ... and, inside
/// iteration callbacks, `loopState__temp`, `loopState__temp2`, ...
#[derive(Debug, Default)]
pub struct AnonymousStateHoister {
    counters: HashMap<&'static str, usize>,
}

impl AnonymousStateHoister {
    pub fn new() -> Self {
        Self::default()
    }

    fn next_name(&mut self, prefix: &'static str) -> String {
        let counter = self.counters.entry(prefix).or_insert(0);
        *counter += 1;
        if *counter == 1 {
            format!("{}_temp", prefix)
        } else {
            format!("{}_temp{}", prefix, counter)
        }
    }
}

impl<'a> StateHoister<'a> for AnonymousStateHoister {
    fn hoist(&mut self, ast: AstBuilder<'a>, request: HoistRequest<'a>) -> Hoisted<'a> {
        let prefix = if request.loop_call.is_some() {
            LOOP_STATE_PREFIX
        } else {
            ANONYMOUS_STATE_PREFIX
        };
        let name = self.next_name(prefix);
        let printed = print_expression(&request.expression);
        let declaration = const_declaration(ast, &name, request.expression);
        let replacement = ast.expression_identifier(SPAN, ast.atom(&name));
        let placement = if request.is_logical {
            Placement::OwningConditional
        } else {
            Placement::EnclosingStatement
        };

        match request.loop_call {
            Some(call) => Hoisted {
                replacement,
                declaration,
                placement,
                referenced: None,
                loop_state: Some((call, name.clone())),
                component_data: vec![ComponentDataEntry {
                    key: name,
                    value: printed,
                }],
            },
            None => Hoisted {
                replacement,
                declaration,
                placement,
                referenced: Some(name),
                loop_state: None,
                component_data: Vec::new(),
            },
        }
    }
}

pub fn const_declaration<'a>(ast: AstBuilder<'a>, name: &str, init: Expression<'a>) -> Statement<'a> {
    let id = ast.binding_pattern_binding_identifier(SPAN, ast.atom(name));
    let declarator = ast.variable_declarator(
        SPAN,
        VariableDeclarationKind::Const,
        id,
        NONE,
        Some(init),
        false,
    );
    Statement::VariableDeclaration(ast.alloc(ast.variable_declaration(
        SPAN,
        VariableDeclarationKind::Const,
        ast.vec1(declarator),
        false,
    )))
}

// ═══════════════════════════════════════════════════════════════════════════════
// COMPLEXITY
// ═══════════════════════════════════════════════════════════════════════════════

#[derive(Default)]
struct ComplexityScan {
    complex: bool,
    jsx: bool,
}

impl<'a> Visit<'a> for ComplexityScan {
    fn visit_call_expression(&mut self, it: &CallExpression<'a>) {
        self.complex = true;
        walk_call_expression(self, it);
    }

    fn visit_template_literal(&mut self, _it: &TemplateLiteral<'a>) {
        self.complex = true;
    }

    fn visit_object_expression(&mut self, _it: &ObjectExpression<'a>) {
        self.complex = true;
    }

    fn visit_array_expression(&mut self, it: &ArrayExpression<'a>) {
        if it
            .elements
            .iter()
            .any(|el| matches!(el, ArrayExpressionElement::ObjectExpression(_)))
        {
            self.complex = true;
        }
        walk_array_expression(self, it);
    }

    fn visit_jsx_element(&mut self, _it: &JSXElement<'a>) {
        self.jsx = true;
    }

    fn visit_jsx_fragment(&mut self, _it: &JSXFragment<'a>) {
        self.jsx = true;
    }
}

/// Contains a call, template literal, object literal or array-of-object literal, and no
/// view-tree element. Plain identifiers, literals and member reads are never complex.
pub fn is_complex_expression(expr: &Expression<'_>) -> bool {
    let mut scan = ComplexityScan::default();
    scan.visit_expression(expr);
    scan.complex && !scan.jsx
}

#[derive(Default)]
struct JsxScan {
    found: bool,
}

impl<'a> Visit<'a> for JsxScan {
    fn visit_jsx_element(&mut self, _it: &JSXElement<'a>) {
        self.found = true;
    }

    fn visit_jsx_fragment(&mut self, _it: &JSXFragment<'a>) {
        self.found = true;
    }
}

pub fn contains_jsx(stmt: &Statement<'_>) -> bool {
    let mut scan = JsxScan::default();
    scan.visit_statement(stmt);
    scan.found
}

#[cfg(test)]
mod tests {
    use super::*;
    use oxc_allocator::Allocator;
    use oxc_parser::Parser;
    use oxc_span::SourceType;
    use pretty_assertions::assert_eq;

    fn complex(code: &str) -> bool {
        let allocator = Allocator::default();
        let expr = Parser::new(&allocator, code, SourceType::tsx())
            .parse_expression()
            .unwrap();
        is_complex_expression(&expr)
    }

    #[test]
    fn test_simple_expressions_are_not_complex() {
        assert!(!complex("this.state.count"));
        assert!(!complex("a && b"));
        assert!(!complex("'text'"));
        assert!(!complex("[1, 2]"));
    }

    #[test]
    fn test_complex_expressions() {
        assert!(complex("this.format(x)"));
        assert!(complex("`${a}px`"));
        assert!(complex("{ color: 'red' }"));
        assert!(complex("[{ a: 1 }]"));
        assert!(complex("a > 1 && list.includes(a)"));
    }

    #[test]
    fn test_view_tree_disables_complexity() {
        assert!(!complex("list.map(i => <View>{i}</View>)"));
        assert!(!complex("show && <Text>{fmt(x)}</Text>"));
    }

    #[test]
    fn test_hoister_names_and_channels() {
        let allocator = Allocator::default();
        let ast = AstBuilder::new(&allocator);
        let source = "fmt(a)";
        let mut hoister = AnonymousStateHoister::new();

        let expr = Parser::new(&allocator, source, SourceType::tsx())
            .parse_expression()
            .unwrap();
        let first = hoister.hoist(
            ast,
            HoistRequest { expression: expr, is_logical: false, loop_call: None },
        );
        assert_eq!(first.referenced.as_deref(), Some("anonymousState__temp"));
        assert_eq!(first.placement, Placement::EnclosingStatement);
        assert_eq!(print_expression(&first.replacement), "anonymousState__temp");
        assert_eq!(
            crate::codegen::print_statement(&first.declaration),
            "const anonymousState__temp = fmt(a)"
        );

        let expr = Parser::new(&allocator, source, SourceType::tsx())
            .parse_expression()
            .unwrap();
        let looped = hoister.hoist(
            ast,
            HoistRequest {
                expression: expr,
                is_logical: false,
                loop_call: Some(Span::new(3, 9)),
            },
        );
        assert_eq!(looped.referenced, None);
        assert_eq!(looped.loop_state, Some((Span::new(3, 9), "loopState__temp".to_string())));
        assert_eq!(looped.component_data[0].value, "fmt(a)");

        let expr = ast.expression_identifier(SPAN, "x");
        let second = hoister.hoist(
            ast,
            HoistRequest { expression: expr, is_logical: true, loop_call: None },
        );
        assert_eq!(second.referenced.as_deref(), Some("anonymousState__temp2"));
        assert_eq!(second.placement, Placement::OwningConditional);
    }
}
