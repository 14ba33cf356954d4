//! Render-generation collaborator.
//!
//! The orchestrator hands the final extraction state to a [`RenderGenerator`]; the
//! default [`TemplateRenderer`] turns the view tree returned by `render` into
//! mini-program markup.

use indexmap::{IndexMap, IndexSet};
use lazy_static::lazy_static;
use oxc_ast::ast::*;
use oxc_span::Span;
use regex::Regex;

use crate::codegen::{jsx_attribute_name, jsx_element_name, print_expression, squash};
use crate::error::Result;
use crate::naming::kebab_case;
use crate::options::TransformOptions;
use crate::state::{ComponentDataEntry, MethodEntry};

lazy_static! {
    static ref INSTANCE_PREFIX: Regex = Regex::new(r"\bthis\.(?:state\.|props\.)?").unwrap();
}

/// Everything the render collaborator may consult, borrowed from one compilation.
pub struct RenderContext<'r, 'a> {
    pub render: &'r FunctionBody<'a>,
    pub source: &'r str,
    pub methods: &'r IndexMap<String, MethodEntry>,
    pub init_state: &'r IndexSet<String>,
    pub jsx_referenced: &'r IndexSet<String>,
    pub used_state: &'r IndexSet<String>,
    pub loop_state_names: &'r IndexMap<Span, String>,
    pub custom_component_names: IndexSet<String>,
    pub custom_component_data: &'r [ComponentDataEntry],
    pub component_properties: &'r IndexSet<String>,
}

pub trait RenderGenerator {
    fn generate(&mut self, ctx: &RenderContext<'_, '_>) -> Result<String>;
}

pub struct TemplateRenderer {
    event_prefix: String,
}

impl TemplateRenderer {
    pub fn new(options: &TransformOptions) -> Self {
        Self {
            event_prefix: options.event_prefix.clone(),
        }
    }
}

impl RenderGenerator for TemplateRenderer {
    fn generate(&mut self, ctx: &RenderContext<'_, '_>) -> Result<String> {
        let returned = match &ctx.render.statements[..] {
            // Expression-bodied arrow field.
            [Statement::ExpressionStatement(body)] => Some(&body.expression),
            statements => statements.iter().rev().find_map(|stmt| match stmt {
                Statement::ReturnStatement(ret) => ret.argument.as_ref(),
                _ => None,
            }),
        };
        let Some(returned) = returned else {
            return Ok(String::new());
        };
        let writer = TemplateWriter {
            event_prefix: &self.event_prefix,
        };
        Ok(writer.node(returned))
    }
}

struct TemplateWriter<'w> {
    event_prefix: &'w str,
}

impl<'w> TemplateWriter<'w> {
    fn binding(&self, expr: &Expression<'_>) -> String {
        let code = squash(&print_expression(expr));
        format!("{{{{{}}}}}", INSTANCE_PREFIX.replace_all(&code, ""))
    }

    fn node(&self, expr: &Expression<'_>) -> String {
        match expr.without_parentheses() {
            Expression::JSXElement(el) => self.element(el),
            Expression::JSXFragment(frag) => format!("<block>{}</block>", self.children(&frag.children)),
            Expression::NullLiteral(_) => String::new(),
            Expression::LogicalExpression(logical)
                if logical.operator == LogicalOperator::And && is_view(&logical.right) =>
            {
                format!(
                    "<block wx:if=\"{}\">{}</block>",
                    self.binding(&logical.left),
                    self.node(&logical.right)
                )
            }
            Expression::ConditionalExpression(cond)
                if is_view(&cond.consequent) || is_view(&cond.alternate) =>
            {
                format!(
                    "<block wx:if=\"{}\">{}</block><block wx:else>{}</block>",
                    self.binding(&cond.test),
                    self.node(&cond.consequent),
                    self.node(&cond.alternate)
                )
            }
            Expression::CallExpression(call) => match iteration(call) {
                Some((list, params, body)) => {
                    let mut attrs = format!("wx:for=\"{}\"", self.binding(list));
                    if let Some(item) = params.items.first().and_then(|p| p.pattern.get_identifier_name()) {
                        attrs.push_str(&format!(" wx:for-item=\"{}\"", item));
                    }
                    if let Some(index) = params.items.get(1).and_then(|p| p.pattern.get_identifier_name()) {
                        attrs.push_str(&format!(" wx:for-index=\"{}\"", index));
                    }
                    let inner = returned_expression(body).map(|e| self.node(e)).unwrap_or_default();
                    format!("<block {}>{}</block>", attrs, inner)
                }
                None => self.binding(expr),
            },
            other => self.binding(other),
        }
    }

    fn element(&self, el: &JSXElement<'_>) -> String {
        let tag = kebab_case(&jsx_element_name(&el.opening_element.name));
        let mut attrs = String::new();
        for item in &el.opening_element.attributes {
            let JSXAttributeItem::Attribute(attr) = item else {
                continue;
            };
            attrs.push(' ');
            attrs.push_str(&self.attribute(attr));
        }
        if el.children.is_empty() {
            format!("<{}{} />", tag, attrs)
        } else {
            format!("<{}{}>{}</{}>", tag, attrs, self.children(&el.children), tag)
        }
    }

    fn attribute(&self, attr: &JSXAttribute<'_>) -> String {
        let name = jsx_attribute_name(&attr.name);
        let name = if name == "className" { "class".to_string() } else { name };
        let Some(value) = &attr.value else {
            return name;
        };
        let expression = match value {
            JSXAttributeValue::StringLiteral(s) => return format!("{}=\"{}\"", name, s.value),
            JSXAttributeValue::ExpressionContainer(c) => match c.expression.as_expression() {
                Some(expr) => expr,
                None => return name,
            },
            JSXAttributeValue::Element(_) | JSXAttributeValue::Fragment(_) => return name,
        };

        match name.strip_prefix(self.event_prefix) {
            Some(event) if !event.is_empty() => {
                let handler = instance_method(expression)
                    .map(str::to_string)
                    .unwrap_or_else(|| self.binding(expression));
                format!("bind{}=\"{}\"", event.to_lowercase(), handler)
            }
            _ => format!("{}=\"{}\"", name, self.binding(expression)),
        }
    }

    fn children(&self, children: &[JSXChild<'_>]) -> String {
        children
            .iter()
            .map(|child| match child {
                JSXChild::Text(text) if text.value.contains('\n') => text.value.trim().to_string(),
                JSXChild::Text(text) => text.value.to_string(),
                JSXChild::Element(el) => self.element(el),
                JSXChild::Fragment(frag) => format!("<block>{}</block>", self.children(&frag.children)),
                JSXChild::ExpressionContainer(c) => c
                    .expression
                    .as_expression()
                    .map(|expr| self.node(expr))
                    .unwrap_or_default(),
                JSXChild::Spread(_) => String::new(),
            })
            .collect()
    }
}

fn is_view(expr: &Expression<'_>) -> bool {
    matches!(
        expr.without_parentheses(),
        Expression::JSXElement(_) | Expression::JSXFragment(_)
    )
}

/// `list.map((item, index) => <View />)` -> (`list`, params, body)
fn iteration<'r, 'a>(
    call: &'r CallExpression<'a>,
) -> Option<(&'r Expression<'a>, &'r FormalParameters<'a>, &'r FunctionBody<'a>)> {
    let callee = call.callee.as_member_expression()?;
    if callee.static_property_name()? != "map" {
        return None;
    }
    match call.arguments.first()? {
        Argument::ArrowFunctionExpression(arrow) => Some((callee.object(), &*arrow.params, &*arrow.body)),
        Argument::FunctionExpression(func) => {
            Some((callee.object(), &*func.params, func.body.as_deref()?))
        }
        _ => None,
    }
}

fn returned_expression<'r, 'a>(body: &'r FunctionBody<'a>) -> Option<&'r Expression<'a>> {
    body.statements.iter().rev().find_map(|stmt| match stmt {
        Statement::ExpressionStatement(s) => Some(&s.expression),
        Statement::ReturnStatement(r) => r.argument.as_ref(),
        _ => None,
    })
}

/// `this.name` or `this.name.bind(...)` -> `name`
fn instance_method<'r>(expr: &'r Expression<'_>) -> Option<&'r str> {
    let member = match expr.without_parentheses() {
        Expression::CallExpression(call) => {
            let callee = call.callee.as_member_expression()?;
            if callee.static_property_name()? != "bind" {
                return None;
            }
            callee.object().as_member_expression()?
        }
        other => other.as_member_expression()?,
    };
    if !matches!(member.object().without_parentheses(), Expression::ThisExpression(_)) {
        return None;
    }
    member.static_property_name()
}

#[cfg(test)]
mod tests {
    use super::*;
    use oxc_allocator::Allocator;
    use oxc_parser::Parser;
    use oxc_span::SourceType;
    use pretty_assertions::assert_eq;

    fn render(body: &str) -> String {
        let code = format!("function render() {{ {} }}", body);
        let allocator = Allocator::default();
        let program = Parser::new(&allocator, &code, SourceType::tsx()).parse().program;
        let Some(Statement::FunctionDeclaration(func)) = program.body.first() else {
            panic!("expected a function");
        };
        render_body(func.body.as_deref().unwrap(), &code)
    }

    fn render_body(body: &FunctionBody<'_>, code: &str) -> String {
        let empty_methods = IndexMap::new();
        let empty = IndexSet::new();
        let loops = IndexMap::new();
        let ctx = RenderContext {
            render: body,
            source: code,
            methods: &empty_methods,
            init_state: &empty,
            jsx_referenced: &empty,
            used_state: &empty,
            loop_state_names: &loops,
            custom_component_names: IndexSet::new(),
            custom_component_data: &[],
            component_properties: &empty,
        };
        TemplateRenderer::new(&TransformOptions::default())
            .generate(&ctx)
            .unwrap()
    }

    #[test]
    fn test_elements_and_attributes() {
        assert_eq!(
            render("return <View className='box' title={this.props.label}>Hi {this.state.name}</View>"),
            "<view class=\"box\" title=\"{{label}}\">Hi {{name}}</view>"
        );
        assert_eq!(render("return <ScrollView />"), "<scroll-view />");
    }

    #[test]
    fn test_event_bindings() {
        assert_eq!(
            render("return <Button onTap={this.func__1.bind(this, 1)} onLongPress={this.hold} />"),
            "<button bindtap=\"func__1\" bindlongpress=\"hold\" />"
        );
    }

    #[test]
    fn test_conditionals_and_loops() {
        assert_eq!(
            render("return <View>{this.state.show && <Text>on</Text>}</View>"),
            "<view><block wx:if=\"{{show}}\"><text>on</text></block></view>"
        );
        assert_eq!(
            render("return ok ? <A /> : <B />"),
            "<block wx:if=\"{{ok}}\"><a /></block><block wx:else><b /></block>"
        );
        assert_eq!(
            render("return <View>{this.state.list.map((item, i) => <Text>{item.name}</Text>)}</View>"),
            "<view><block wx:for=\"{{list}}\" wx:for-item=\"item\" wx:for-index=\"i\"><text>{{item.name}}</text></block></view>"
        );
    }

    #[test]
    fn test_expression_body_is_the_view_tree() {
        let code = "class A { render = () => <View title='x'>{this.state.n}</View> }";
        let allocator = Allocator::default();
        let program = Parser::new(&allocator, code, SourceType::tsx()).parse().program;
        let Some(Statement::ClassDeclaration(class)) = program.body.first() else {
            panic!("expected a class declaration");
        };
        let Some(ClassElement::PropertyDefinition(field)) = class.body.body.first() else {
            panic!("expected a field");
        };
        let Some(Expression::ArrowFunctionExpression(arrow)) = &field.value else {
            panic!("expected an arrow function");
        };
        assert_eq!(
            render_body(&arrow.body, code),
            "<view title=\"x\">{{n}}</view>"
        );
    }

    #[test]
    fn test_destructured_item_has_no_item_name() {
        assert_eq!(
            render("return <View>{list.map(({ id }) => <Text>{id}</Text>)}</View>"),
            "<view><block wx:for=\"{{list}}\"><text>{{id}}</text></block></view>"
        );
    }

    #[test]
    fn test_multiline_bindings_collapse() {
        assert_eq!(
            render("return <View data={{ a: 1, b: 2 }} />"),
            "<view data=\"{{{ a: 1, b: 2 }}}\" />"
        );
    }

    #[test]
    fn test_missing_return_renders_nothing() {
        assert_eq!(render("const a = 1;"), "");
    }
}
