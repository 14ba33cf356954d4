use oxc_ast::ast::*;
use oxc_semantic::Scoping;
use oxc_syntax::symbol::SymbolId;
use std::collections::HashMap;

/// Module-scope import bindings, used to decide whether a view-tree tag names an
/// imported custom component.
///
/// With semantic data, tags resolve through their reference to the bound symbol, so a
/// local declaration shadowing an import is seen. Without it (hand-built trees), tags
/// fall back to a lookup of the import's local name.
#[derive(Default)]
pub struct ModuleBindings {
    by_symbol: HashMap<SymbolId, String>,
    by_name: HashMap<String, String>,
    scoping: Option<Scoping>,
}

impl ModuleBindings {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_program(program: &Program<'_>, scoping: Option<Scoping>) -> Self {
        let mut bindings = Self {
            scoping,
            ..Self::default()
        };
        for stmt in &program.body {
            if let Statement::ImportDeclaration(decl) = stmt {
                bindings.add_import_declaration(decl);
            }
        }
        bindings
    }

    pub fn add_import_declaration(&mut self, decl: &ImportDeclaration<'_>) {
        let Some(specifiers) = &decl.specifiers else {
            return;
        };
        for specifier in specifiers {
            let local = specifier.local();
            self.add_import(&local.name, local.symbol_id.get(), &decl.source.value);
        }
    }

    pub fn add_import(&mut self, local: &str, symbol: Option<SymbolId>, source: &str) {
        if let Some(symbol) = symbol {
            self.by_symbol.insert(symbol, source.to_string());
        }
        self.by_name.insert(local.to_string(), source.to_string());
    }

    pub fn is_empty(&self) -> bool {
        self.by_name.is_empty()
    }

    /// Import source of the binding `ident` refers to, if that binding is a module import.
    pub fn resolve_import(&self, ident: &IdentifierReference<'_>) -> Option<&str> {
        if let (Some(scoping), Some(reference_id)) = (&self.scoping, ident.reference_id.get()) {
            return match scoping.get_reference(reference_id).symbol_id() {
                Some(symbol) => self.by_symbol.get(&symbol).map(String::as_str),
                // Unresolved reference: a global, never an import.
                None => None,
            };
        }
        self.by_name.get(ident.name.as_str()).map(String::as_str)
    }

    /// Like [`resolve_import`](Self::resolve_import) for tags that carry only a name.
    pub fn resolve_import_name(&self, name: &str) -> Option<&str> {
        self.by_name.get(name).map(String::as_str)
    }
}
