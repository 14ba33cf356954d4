use oxc_ast::ast::*;
use oxc_ast::AstBuilder;
use oxc_span::{GetSpan, SPAN};
use tracing::trace;

use crate::handler::class_method;
use crate::options::TransformOptions;
use crate::state::ExtractionState;

/// Guarantees a constructor and, outside test mode, renames every constructor to the
/// private alias so the host runtime's own constructor never collides with it.
///
/// Direct `super(...)` statements in a renamed body are retargeted to
/// `super.<alias>(...)`, keeping initialization order along the inheritance chain.
pub fn normalize_constructor<'a>(
    ast: AstBuilder<'a>,
    class: &mut Class<'a>,
    state: &ExtractionState,
    options: &TransformOptions,
) {
    if !state.methods.contains_key("constructor") {
        trace!("synthesized constructor");
        class.body.body.insert(0, default_constructor(ast));
    }
    if options.is_test() {
        return;
    }

    for element in class.body.body.iter_mut() {
        let ClassElement::MethodDefinition(method) = element else {
            continue;
        };
        if method.kind != MethodDefinitionKind::Constructor {
            continue;
        }
        method.kind = MethodDefinitionKind::Method;
        method.key = ast.property_key_static_identifier(SPAN, ast.atom(&options.constructor_alias));
        trace!(alias = %options.constructor_alias, "renamed constructor");

        let Some(body) = method.value.body.as_mut() else {
            continue;
        };
        for statement in body.statements.iter_mut() {
            let Statement::ExpressionStatement(statement) = statement else {
                continue;
            };
            let Expression::CallExpression(call) = &mut statement.expression else {
                continue;
            };
            if is_super_callee(&call.callee) {
                call.callee = Expression::from(ast.member_expression_static(
                    call.callee.span(),
                    ast.expression_super(SPAN),
                    ast.identifier_name(SPAN, ast.atom(&options.constructor_alias)),
                    false,
                ));
            }
        }
    }
}

/// `constructor(props) { super(props); }`
fn default_constructor<'a>(ast: AstBuilder<'a>) -> ClassElement<'a> {
    let props = ast.plain_formal_parameter(SPAN, ast.binding_pattern_binding_identifier(SPAN, "props"));
    let super_call = ast.expression_call(
        SPAN,
        ast.expression_super(SPAN),
        oxc_ast::NONE,
        ast.vec1(Argument::from(ast.expression_identifier(SPAN, "props"))),
        false,
    );
    class_method(
        ast,
        "constructor",
        MethodDefinitionKind::Constructor,
        ast.vec1(props),
        ast.vec1(ast.statement_expression(SPAN, super_call)),
    )
}

fn is_super_callee(callee: &Expression<'_>) -> bool {
    matches!(callee, Expression::Super(_)) || callee.is_specific_id("super")
}
