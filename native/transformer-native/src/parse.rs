use oxc_allocator::Allocator;
use oxc_ast::ast::*;
use oxc_ast::AstBuilder;
use oxc_parser::Parser;
use oxc_semantic::SemanticBuilder;
use oxc_span::{SourceType, Span};
use tracing::debug;

use crate::constants::RENDER_METHOD;
use crate::error::{Result, SourceContext, TransformError, TransformErrorKind};
use crate::options::TransformOptions;
use crate::scope::ModuleBindings;
use crate::transformer::{ClassTransformer, CompileOutput};

/// Parses a component module and compiles its component class with the default
/// collaborators.
///
/// The component is the class of `export default class`, else the first class with a
/// `render` member, else the first class in the module.
pub fn compile_component(source: &str, options: &TransformOptions) -> Result<CompileOutput> {
    let allocator = Allocator::default();
    let context = SourceContext::new(&options.source_path, source);

    let ret = Parser::new(&allocator, source, SourceType::tsx()).parse();
    if let Some(first) = ret.errors.first() {
        let offset = first
            .labels
            .as_ref()
            .and_then(|labels| labels.first())
            .map(|label| label.offset() as u32)
            .unwrap_or(0);
        return Err(TransformError::at(
            TransformErrorKind::Parse,
            first.to_string(),
            Span::new(offset, offset),
            &context,
        ));
    }
    let mut program = ret.program;

    let scoping = SemanticBuilder::new().build(&program).semantic.into_scoping();
    let bindings = ModuleBindings::from_program(&program, Some(scoping));
    debug!(file = %options.source_path, imports = !bindings.is_empty(), "parsed component module");

    let Some(index) = component_index(&program.body) else {
        return Err(TransformError::new(
            TransformErrorKind::ComponentNotFound,
            "module does not declare a component class",
        )
        .with_hint(format!("file: {}", options.source_path)));
    };
    let Some(class) = program.body.get_mut(index).and_then(class_of_mut) else {
        return Err(TransformError::new(
            TransformErrorKind::ComponentNotFound,
            "module does not declare a component class",
        ));
    };

    let ast = AstBuilder::new(&allocator);
    ClassTransformer::new(ast, context, options, &bindings).compile(class)
}

fn component_index(body: &[Statement<'_>]) -> Option<usize> {
    let default_export = body.iter().position(|stmt| {
        matches!(
            stmt,
            Statement::ExportDefaultDeclaration(decl)
                if matches!(decl.declaration, ExportDefaultDeclarationKind::ClassDeclaration(_))
        )
    });
    default_export
        .or_else(|| {
            body.iter()
                .position(|stmt| class_of(stmt).is_some_and(has_render))
        })
        .or_else(|| body.iter().position(|stmt| class_of(stmt).is_some()))
}

fn has_render(class: &Class<'_>) -> bool {
    class.body.body.iter().any(|element| match element {
        ClassElement::MethodDefinition(m) => m.key.is_specific_static_name(RENDER_METHOD),
        ClassElement::PropertyDefinition(p) => p.key.is_specific_static_name(RENDER_METHOD),
        _ => false,
    })
}

fn class_of<'s, 'a>(stmt: &'s Statement<'a>) -> Option<&'s Class<'a>> {
    match stmt {
        Statement::ClassDeclaration(class) => Some(&**class),
        Statement::ExportDefaultDeclaration(decl) => match &decl.declaration {
            ExportDefaultDeclarationKind::ClassDeclaration(class) => Some(&**class),
            _ => None,
        },
        Statement::ExportNamedDeclaration(decl) => match &decl.declaration {
            Some(Declaration::ClassDeclaration(class)) => Some(&**class),
            _ => None,
        },
        _ => None,
    }
}

fn class_of_mut<'s, 'a>(stmt: &'s mut Statement<'a>) -> Option<&'s mut Class<'a>> {
    match stmt {
        Statement::ClassDeclaration(class) => Some(&mut **class),
        Statement::ExportDefaultDeclaration(decl) => match &mut decl.declaration {
            ExportDefaultDeclarationKind::ClassDeclaration(class) => Some(&mut **class),
            _ => None,
        },
        Statement::ExportNamedDeclaration(decl) => match &mut decl.declaration {
            Some(Declaration::ClassDeclaration(class)) => Some(&mut **class),
            _ => None,
        },
        _ => None,
    }
}
