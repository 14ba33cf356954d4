use oxc_span::Span;
use serde::Serialize;
use thiserror::Error;

// ═══════════════════════════════════════════════════════════════════════════════
// ERROR CODES
// ═══════════════════════════════════════════════════════════════════════════════

pub const E_UNSUPPORTED_DESTRUCTURING: &str = "E-CLASS-001";
pub const E_UNSUPPORTED_EVENT_VALUE: &str = "E-CLASS-002";
pub const E_UNSUPPORTED_LIFECYCLE_PARAM: &str = "E-CLASS-003";
pub const E_MISSING_RENDER: &str = "E-CLASS-004";
pub const E_PARSE: &str = "E-PARSE-001";
pub const E_COMPONENT_NOT_FOUND: &str = "E-PARSE-002";
pub const E_INVALID_OPTIONS: &str = "E-CONFIG-001";

pub type Result<T> = std::result::Result<T, TransformError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum TransformErrorKind {
    UnsupportedDestructuring,
    UnsupportedEventValue,
    UnsupportedLifecycleParam,
    MissingRender,
    Parse,
    ComponentNotFound,
    InvalidOptions,
}

impl TransformErrorKind {
    pub fn code(self) -> &'static str {
        match self {
            Self::UnsupportedDestructuring => E_UNSUPPORTED_DESTRUCTURING,
            Self::UnsupportedEventValue => E_UNSUPPORTED_EVENT_VALUE,
            Self::UnsupportedLifecycleParam => E_UNSUPPORTED_LIFECYCLE_PARAM,
            Self::MissingRender => E_MISSING_RENDER,
            Self::Parse => E_PARSE,
            Self::ComponentNotFound => E_COMPONENT_NOT_FOUND,
            Self::InvalidOptions => E_INVALID_OPTIONS,
        }
    }

    fn hint(self) -> Option<&'static str> {
        match self {
            Self::UnsupportedDestructuring => {
                Some("List every prop explicitly: `const { a, b } = this.props`.")
            }
            Self::UnsupportedEventValue => Some(
                "Pass a method reference (`this.handleTap`, `this.props.onTap`) or bind one: `this.props.onTap.bind(this, id)`.",
            ),
            Self::UnsupportedLifecycleParam => {
                Some("Use a plain identifier (`nextProps`) or an object pattern (`{ a, ...rest }`).")
            }
            Self::MissingRender => Some("Add a `render()` method returning the view tree."),
            _ => None,
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// TRANSFORM ERROR
// ═══════════════════════════════════════════════════════════════════════════════

/// Fatal diagnostic raised while compiling one component. No partial result survives it.
#[derive(Debug, Clone, Serialize, Error)]
#[serde(rename_all = "camelCase")]
#[error("[{code}] {message} ({file}:{line}:{column})")]
pub struct TransformError {
    pub code: String,
    pub kind: TransformErrorKind,
    pub message: String,
    pub file: String,
    pub line: u32,
    pub column: u32,
    pub context: Option<String>,
    pub hints: Vec<String>,
}

impl TransformError {
    pub fn new(kind: TransformErrorKind, message: impl Into<String>) -> Self {
        Self {
            code: kind.code().to_string(),
            kind,
            message: message.into(),
            file: String::new(),
            line: 0,
            column: 0,
            context: None,
            hints: kind.hint().map(str::to_string).into_iter().collect(),
        }
    }

    /// Locates `span` in `source` and attaches a code frame.
    pub fn at(
        kind: TransformErrorKind,
        message: impl Into<String>,
        span: Span,
        source: &SourceContext<'_>,
    ) -> Self {
        let (line, column) = source.locate(span.start);
        Self {
            file: source.path.to_string(),
            line,
            column,
            context: Some(source.code_frame(span.start)),
            ..Self::new(kind, message)
        }
    }

    pub fn invalid_options(message: impl Into<String>) -> Self {
        Self::new(TransformErrorKind::InvalidOptions, message)
    }

    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hints.push(hint.into());
        self
    }

    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| self.to_string())
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// SOURCE CONTEXT
// ═══════════════════════════════════════════════════════════════════════════════

const FRAME_CONTEXT_LINES: usize = 2;

/// The module text spans point into, plus the path diagnostics report.
#[derive(Debug, Clone, Copy)]
pub struct SourceContext<'s> {
    pub path: &'s str,
    pub text: &'s str,
}

impl<'s> SourceContext<'s> {
    pub fn new(path: &'s str, text: &'s str) -> Self {
        Self { path, text }
    }

    /// 1-based line and column of a byte offset.
    pub fn locate(&self, offset: u32) -> (u32, u32) {
        let offset = (offset as usize).min(self.text.len());
        let before = &self.text[..floor_char_boundary(self.text, offset)];
        let line = before.matches('\n').count() + 1;
        let line_start = before.rfind('\n').map_or(0, |i| i + 1);
        let column = before[line_start..].chars().count() + 1;
        (line as u32, column as u32)
    }

    pub fn code_frame(&self, offset: u32) -> String {
        let (line, column) = self.locate(offset);
        let target = line as usize;
        let first = target.saturating_sub(FRAME_CONTEXT_LINES).max(1);
        let last = target + FRAME_CONTEXT_LINES;
        let gutter = last.to_string().len();

        let mut frame = Vec::new();
        for (idx, text) in self.text.lines().enumerate() {
            let number = idx + 1;
            if number < first {
                continue;
            }
            if number > last {
                break;
            }
            let marker = if number == target { '>' } else { ' ' };
            frame.push(format!("{} {:>gutter$} | {}", marker, number, text));
            if number == target {
                frame.push(format!(
                    "  {:>gutter$} | {}^",
                    "",
                    " ".repeat(column.saturating_sub(1) as usize)
                ));
            }
        }
        frame.join("\n")
    }
}

fn floor_char_boundary(text: &str, mut offset: usize) -> usize {
    while offset > 0 && !text.is_char_boundary(offset) {
        offset -= 1;
    }
    offset
}
