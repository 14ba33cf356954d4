use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::naming::kebab_case;

const SCRIPT_EXTENSIONS: [&str; 4] = ["js", "jsx", "ts", "tsx"];

/// Child component referenced by the compiled template.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComponentRef {
    /// Kebab-case tag name: `TabBar` -> `tab-bar`.
    pub name: String,
    pub path: String,
}

/// Projects the discovered custom components, in discovery order.
pub fn project_components(
    custom_components: &IndexMap<String, String>,
    source_path: &str,
) -> Vec<ComponentRef> {
    custom_components
        .iter()
        .map(|(name, import)| ComponentRef {
            name: kebab_case(name),
            path: resolve_component_path(import, source_path),
        })
        .collect()
}

/// Import source -> component path as the host runtime expects it.
///
/// Backslashes become `/` and a script extension is dropped. An extension-less import
/// naming a directory that holds an `index` script next to `source_path` resolves to that
/// index module.
pub fn resolve_component_path(import: &str, source_path: &str) -> String {
    let normalized = import.replace('\\', "/");
    if let Some((stem, extension)) = normalized.rsplit_once('.') {
        if SCRIPT_EXTENSIONS.contains(&extension) && !stem.ends_with('/') && !stem.is_empty() {
            return stem.to_string();
        }
    }

    let trimmed = normalized.trim_end_matches('/');
    let base = Path::new(source_path).parent().unwrap_or_else(|| Path::new(""));
    let directory = base.join(trimmed);
    let has_index = directory.is_dir()
        && SCRIPT_EXTENSIONS
            .iter()
            .any(|ext| directory.join(format!("index.{}", ext)).is_file());
    if !has_index {
        return normalized;
    }
    if trimmed.starts_with('.') || trimmed.starts_with('/') {
        format!("{}/index", trimmed)
    } else {
        format!("./{}/index", trimmed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::fs;

    #[test]
    fn test_strips_script_extensions() {
        assert_eq!(resolve_component_path("./tab-bar.tsx", "src/page.tsx"), "./tab-bar");
        assert_eq!(resolve_component_path("..\\card\\card.js", "src/page.tsx"), "../card/card");
        assert_eq!(resolve_component_path("./styles.css", "src/page.tsx"), "./styles.css");
    }

    #[test]
    fn test_keeps_unresolvable_imports() {
        assert_eq!(
            resolve_component_path("@scope/ui-kit", "src/page.tsx"),
            "@scope/ui-kit"
        );
        assert_eq!(
            resolve_component_path("../../missing", "src/page.tsx"),
            "../../missing"
        );
    }

    #[test]
    fn test_directory_with_index_resolves_to_index() {
        let root = std::env::temp_dir().join(format!("component-path-{}", std::process::id()));
        fs::create_dir_all(root.join("list")).unwrap();
        fs::write(root.join("list/index.tsx"), "export default 1").unwrap();
        let source = root.join("page.tsx");
        let source = source.to_str().unwrap();

        assert_eq!(resolve_component_path("./list", source), "./list/index");
        assert_eq!(resolve_component_path("list/", source), "./list/index");

        fs::remove_dir_all(&root).unwrap();
    }

    #[test]
    fn test_projection_order_and_names() {
        let mut custom = IndexMap::new();
        custom.insert("TabBar".to_string(), "./tab-bar.js".to_string());
        custom.insert("HTMLView".to_string(), "./html".to_string());
        let components = project_components(&custom, "src/page.tsx");
        assert_eq!(
            components,
            vec![
                ComponentRef { name: "tab-bar".to_string(), path: "./tab-bar".to_string() },
                ComponentRef { name: "html-view".to_string(), path: "./html".to_string() },
            ]
        );
    }
}
