#[cfg(test)]
pub(crate) mod support {
    use oxc_allocator::Allocator;
    use oxc_ast::ast::*;
    use oxc_ast::AstBuilder;
    use oxc_parser::Parser;
    use oxc_semantic::SemanticBuilder;
    use oxc_span::SourceType;

    use crate::codegen::print_class_element;
    use crate::error::{Result, SourceContext};
    use crate::options::{BuildMode, TransformOptions};
    use crate::scope::ModuleBindings;
    use crate::transformer::{ClassTransformer, CompileOutput};

    pub struct Compiled {
        pub output: Result<CompileOutput>,
        /// Every named class member after compilation, printed on one line.
        pub members: Vec<String>,
    }

    impl Compiled {
        pub fn ok(&self) -> &CompileOutput {
            match &self.output {
                Ok(output) => output,
                Err(err) => panic!("compilation failed: {}", err),
            }
        }

        pub fn member(&self, name: &str) -> &str {
            self.members
                .iter()
                .find(|m| m.starts_with(&format!("{}(", name)) || m.starts_with(&format!("{} = ", name)))
                .unwrap_or_else(|| panic!("no member `{}` in {:?}", name, self.members))
        }
    }

    pub fn compile(code: &str, mode: BuildMode) -> Compiled {
        let allocator = Allocator::default();
        let ret = Parser::new(&allocator, code, SourceType::tsx()).parse();
        assert!(ret.errors.is_empty(), "parse errors: {:?}", ret.errors);
        let mut program = ret.program;
        let scoping = SemanticBuilder::new().build(&program).semantic.into_scoping();
        let bindings = ModuleBindings::from_program(&program, Some(scoping));
        let options = TransformOptions::new("src/pages/index/index.tsx").with_mode(mode);

        let class = program
            .body
            .iter_mut()
            .find_map(|stmt| match stmt {
                Statement::ClassDeclaration(class) => Some(&mut **class),
                Statement::ExportDefaultDeclaration(decl) => match &mut decl.declaration {
                    ExportDefaultDeclarationKind::ClassDeclaration(class) => Some(&mut **class),
                    _ => None,
                },
                _ => None,
            })
            .expect("component class");

        let output = ClassTransformer::new(
            AstBuilder::new(&allocator),
            SourceContext::new(&options.source_path, code),
            &options,
            &bindings,
        )
        .compile(class);

        let members = class
            .body
            .body
            .iter()
            .filter(|element| element.static_name().is_some())
            .map(print_class_element)
            .collect();
        Compiled { output, members }
    }
}

#[cfg(test)]
mod tests {
    use super::support::compile;
    use crate::options::{BuildMode, TransformOptions};
    use crate::parse::compile_component;
    use pretty_assertions::assert_eq;

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_state_field_and_prop_label() {
        let compiled = compile(
            r#"
class Index extends Component {
  state = { count: 0 }
  render() {
    return <View title={this.props.label}>{this.state.count}</View>
  }
}
"#,
            BuildMode::Test,
        );
        let output = compiled.ok();
        assert_eq!(output.analysis.used_state, strings(&["label"]));
        assert_eq!(output.analysis.init_state, strings(&["count"]));
        assert!(output.analysis.component_properties.contains(&"label".to_string()));
        assert_eq!(
            output.result.template,
            "<view title=\"{{label}}\">{{count}}</view>"
        );
    }

    #[test]
    fn test_initial_state_unions_constructor_and_field() {
        let compiled = compile(
            r#"
class Index extends Component {
  constructor(props) {
    super(props)
    this.state = { loading: true, list: [] }
  }
  state = { list: [], page: 1 }
  render() { return <View /> }
}
"#,
            BuildMode::Test,
        );
        assert_eq!(
            compiled.ok().analysis.init_state,
            strings(&["loading", "list", "page"])
        );
    }

    #[test]
    fn test_method_table_records_members() {
        let compiled = compile(
            r#"
class Index extends Component {
  get total() { return 1 }
  handleTap = () => {}
  helper() {}
  render() { return <View /> }
}
"#,
            BuildMode::Test,
        );
        let names: Vec<&str> = compiled
            .ok()
            .analysis
            .methods
            .iter()
            .map(|m| m.name.as_str())
            .collect();
        assert_eq!(names, vec!["total", "handleTap", "helper", "render"]);
    }

    #[test]
    fn test_missing_render_is_fatal() {
        let options = TransformOptions::new("a.tsx").with_mode(BuildMode::Test);
        let err = compile_component("class A extends Component { helper() {} }", &options).unwrap_err();
        assert_eq!(err.code, "E-CLASS-004");
        assert_eq!(err.line, 1);
    }

    #[test]
    fn test_parse_errors_are_reported() {
        let options = TransformOptions::new("a.tsx");
        let err = compile_component("class A {\n  render() { return <View> }\n}", &options)
            .unwrap_err();
        assert_eq!(err.code, "E-PARSE-001");
        assert_eq!(err.file, "a.tsx");
        assert!(err.context.is_some());
    }

    #[test]
    fn test_module_without_class() {
        let options = TransformOptions::new("a.tsx");
        let err = compile_component("export const a = 1", &options).unwrap_err();
        assert_eq!(err.code, "E-PARSE-002");
    }

    #[test]
    fn test_default_export_is_the_component() {
        let options = TransformOptions::new("a.tsx").with_mode(BuildMode::Test);
        let output = compile_component(
            r#"
class Helper { render() { return <Text /> } }
export default class Page extends Component {
  render() { return <View /> }
}
"#,
            &options,
        )
        .unwrap();
        assert_eq!(output.result.template, "<view />");
    }

    #[test]
    fn test_custom_components_are_projected() {
        let compiled = compile(
            r#"
import TabBar from '../../components/tab-bar.js'
import { Card } from './card'
export default class Index extends Component {
  render() {
    return <View><TabBar /><Card /><Text>hi</Text></View>
  }
}
"#,
            BuildMode::Test,
        );
        let output = compiled.ok();
        let components: Vec<(&str, &str)> = output
            .result
            .components
            .iter()
            .map(|c| (c.name.as_str(), c.path.as_str()))
            .collect();
        assert_eq!(
            components,
            vec![("tab-bar", "../../components/tab-bar"), ("card", "./card")]
        );
        assert_eq!(
            output.result.template,
            "<view><tab-bar /><card /><text>hi</text></view>"
        );
    }

    #[test]
    fn test_shadowed_import_is_not_a_component() {
        let compiled = compile(
            r#"
import Card from './card'
class Index extends Component {
  render() {
    const Card = this.pick()
    return <View><Card /></View>
  }
}
"#,
            BuildMode::Test,
        );
        assert!(compiled.ok().result.components.is_empty());
    }

    #[test]
    fn test_children_become_slot() {
        let compiled = compile(
            r#"
class Index extends Component {
  render() { return <View>{this.props.children}</View> }
}
"#,
            BuildMode::Test,
        );
        let output = compiled.ok();
        assert_eq!(output.result.template, "<view><slot /></view>");
        assert!(!output.analysis.component_properties.contains(&"children".to_string()));
        assert_eq!(
            compiled.member("render"),
            "render() { return <View>{<slot />}</View>; }"
        );
    }

    #[test]
    fn test_complex_expressions_are_hoisted() {
        let compiled = compile(
            r#"
class Index extends Component {
  render() {
    return <View style={{ color: this.state.color }}>{this.format(this.state.n)}</View>
  }
}
"#,
            BuildMode::Test,
        );
        assert_eq!(
            compiled.member("render"),
            "render() { const anonymousState__temp = { color: this.state.color }; \
             const anonymousState__temp2 = this.format(this.state.n); \
             return <View style={anonymousState__temp}>{anonymousState__temp2}</View>; }"
        );
        let output = compiled.ok();
        assert_eq!(
            output.analysis.jsx_referenced,
            strings(&["anonymousState__temp", "anonymousState__temp2"])
        );
        assert_eq!(
            output.result.template,
            "<view style=\"{{anonymousState__temp}}\">{{anonymousState__temp2}}</view>"
        );
    }

    #[test]
    fn test_complex_if_test_is_hoisted() {
        let compiled = compile(
            r#"
class Index extends Component {
  render() {
    if (this.check(this.state.a)) {
      return <Text />
    }
    return <View />
  }
}
"#,
            BuildMode::Test,
        );
        assert_eq!(
            compiled.member("render"),
            "render() { const anonymousState__temp = this.check(this.state.a); \
             if (anonymousState__temp) { return <Text />; } return <View />; }"
        );
    }

    #[test]
    fn test_else_if_test_is_hoisted_inside_its_branch() {
        let compiled = compile(
            r#"
class Index extends Component {
  render() {
    if (this.state.a) {
      return <View />
    } else if (this.format(this.state.b)) {
      return <Text />
    }
    return null
  }
}
"#,
            BuildMode::Test,
        );
        assert_eq!(
            compiled.member("render"),
            "render() { if (this.state.a) { return <View />; } else { \
             const anonymousState__temp = this.format(this.state.b); \
             if (anonymousState__temp) { return <Text />; } } return null; }"
        );
        assert_eq!(
            compiled.ok().analysis.jsx_referenced,
            strings(&["anonymousState__temp"])
        );
    }

    #[test]
    fn test_hoisting_inside_iteration_uses_loop_state() {
        let compiled = compile(
            r#"
class Index extends Component {
  render() {
    return <View>{this.state.list.map(item => <Text>{this.format(item)}</Text>)}</View>
  }
}
"#,
            BuildMode::Test,
        );
        assert_eq!(
            compiled.member("render"),
            "render() { return <View>{this.state.list.map((item) => { \
             const loopState__temp = this.format(item); return <Text>{loopState__temp}</Text>; \
             })}</View>; }"
        );
        let output = compiled.ok();
        let loops: Vec<&str> = output
            .analysis
            .loop_state_names
            .iter()
            .map(|l| l.name.as_str())
            .collect();
        assert_eq!(loops, vec!["loopState__temp"]);
        assert_eq!(output.analysis.custom_component_data.len(), 1);
        assert_eq!(output.analysis.custom_component_data[0].key, "loopState__temp");
        assert_eq!(output.analysis.custom_component_data[0].value, "this.format(item)");
        assert!(output.analysis.jsx_referenced.is_empty());
        assert_eq!(
            output.result.template,
            "<view><block wx:for=\"{{list}}\" wx:for-item=\"item\"><text>{{loopState__temp}}</text></block></view>"
        );
    }

    #[test]
    fn test_arrow_field_render_is_rendered() {
        let compiled = compile(
            r#"
class Index extends Component {
  render = () => <View title="x">{this.state.count}</View>
}
"#,
            BuildMode::Test,
        );
        let output = compiled.ok();
        assert_eq!(output.result.template, "<view title=\"x\">{{count}}</view>");
        assert!(output.analysis.methods.iter().any(|m| m.name == "render"));
    }

    #[test]
    fn test_test_mode_synthesizes_constructor() {
        let compiled = compile(
            "class Index extends Component { render() { return <View /> } }",
            BuildMode::Test,
        );
        assert_eq!(compiled.members[0], "constructor(props) { super(props); }");
        assert!(compiled.ok().analysis.methods.iter().all(|m| m.name != "constructor"));
    }

    #[test]
    fn test_production_renames_constructor() {
        let compiled = compile(
            r#"
class Index extends Component {
  constructor(props) {
    super(props)
    this.state = { ready: false }
  }
  render() { return <View /> }
}
"#,
            BuildMode::Production,
        );
        assert_eq!(
            compiled.member("_constructor"),
            "_constructor(props) { super._constructor(props); this.state = { ready: false }; }"
        );
        assert!(compiled.members.iter().all(|m| !m.starts_with("constructor(")));
    }

    #[test]
    fn test_analysis_serializes_camel_case() {
        let compiled = compile(
            "class Index extends Component { state = { a: 1 }; render() { return <View /> } }",
            BuildMode::Test,
        );
        let json = serde_json::to_value(compiled.ok()).unwrap();
        assert_eq!(json["analysis"]["initState"][0], "a");
        assert_eq!(json["result"]["template"], "<view />");
    }
}
