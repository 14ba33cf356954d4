//! Canonical source text.
//!
//! Nodes are cloned into a scratch program and printed with `oxc_codegen`. The output is
//! the key used to tell prop-rooted callbacks apart, the value recorded for loop-scoped
//! component data and the text the default renderer embeds in templates.

use lazy_static::lazy_static;
use oxc_allocator::{Allocator, CloneIn};
use oxc_ast::ast::*;
use oxc_ast::AstBuilder;
use oxc_codegen::Codegen;
use oxc_span::{SourceType, SPAN};
use regex::Regex;

lazy_static! {
    static ref WHITESPACE: Regex = Regex::new(r"\s+").unwrap();
}

pub fn print_expression(expr: &Expression<'_>) -> String {
    let allocator = Allocator::default();
    let ast = AstBuilder::new(&allocator);
    // Argument position keeps object and function literals unparenthesized.
    let statement = ast.statement_return(SPAN, Some(expr.clone_in(&allocator)));
    let code = print_program(ast, statement);
    match code.strip_prefix("return ") {
        Some(expression) => expression.to_string(),
        None => code,
    }
}

#[cfg(test)]
pub fn print_statement(stmt: &Statement<'_>) -> String {
    let allocator = Allocator::default();
    let ast = AstBuilder::new(&allocator);
    print_program(ast, stmt.clone_in(&allocator))
}

/// One class member on a single line, without its trailing semicolon.
#[cfg(test)]
pub fn print_class_element(element: &ClassElement<'_>) -> String {
    use oxc_ast::NONE;

    let allocator = Allocator::default();
    let ast = AstBuilder::new(&allocator);
    let body = ast.alloc_class_body(SPAN, ast.vec1(element.clone_in(&allocator)));
    let class = ast.alloc_class(
        SPAN,
        ClassType::ClassDeclaration,
        ast.vec(),
        Some(ast.binding_identifier(SPAN, "Member")),
        NONE,
        None,
        NONE,
        ast.vec(),
        body,
        false,
        false,
    );
    let code = squash(&print_program(ast, Statement::ClassDeclaration(class)));
    code.strip_prefix("class Member {")
        .and_then(|inner| inner.strip_suffix('}'))
        .map(|inner| inner.trim().trim_end_matches(';').to_string())
        .unwrap_or(code)
}

fn print_program<'a>(ast: AstBuilder<'a>, statement: Statement<'a>) -> String {
    let program = ast.program(
        SPAN,
        SourceType::tsx(),
        "",
        ast.vec(),
        None,
        ast.vec(),
        ast.vec1(statement),
    );
    let code = Codegen::new().build(&program).code;
    code.trim().trim_end_matches(';').to_string()
}

/// Collapses every whitespace run, line breaks and indentation included, to one space.
pub fn squash(code: &str) -> String {
    WHITESPACE.replace_all(code.trim(), " ").into_owned()
}

pub fn jsx_element_name(name: &JSXElementName<'_>) -> String {
    match name {
        JSXElementName::Identifier(id) => id.name.to_string(),
        JSXElementName::IdentifierReference(id) => id.name.to_string(),
        JSXElementName::NamespacedName(ns) => format!("{}:{}", ns.namespace.name, ns.name.name),
        JSXElementName::MemberExpression(m) => jsx_member_name(m),
        JSXElementName::ThisExpression(_) => "this".to_string(),
    }
}

fn jsx_member_name(member: &JSXMemberExpression<'_>) -> String {
    let object = match &member.object {
        JSXMemberExpressionObject::IdentifierReference(id) => id.name.to_string(),
        JSXMemberExpressionObject::MemberExpression(m) => jsx_member_name(m),
        JSXMemberExpressionObject::ThisExpression(_) => "this".to_string(),
    };
    format!("{}.{}", object, member.property.name)
}

pub fn jsx_attribute_name(name: &JSXAttributeName<'_>) -> String {
    match name {
        JSXAttributeName::Identifier(id) => id.name.to_string(),
        JSXAttributeName::NamespacedName(ns) => format!("{}:{}", ns.namespace.name, ns.name.name),
    }
}
