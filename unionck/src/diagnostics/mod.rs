//! Diagnostics produced by the analyzer, and their rendering
//!
//! Three output forms:
//! - `render_text`: one line per diagnostic, with `note:`/`help:` lines
//! - `render_report`: an ariadne report over the source text
//! - `to_json`: machine-readable, for hosts that present diagnostics themselves

use std::fmt;

use serde::Serialize;

use crate::ast::Span;
use crate::fix::Fix;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum DiagnosticKind {
    /// A match over a union does not cover every variant
    MissingCases,
    /// A match arm can never be selected
    UnreachableArm,
}

impl DiagnosticKind {
    pub fn code(self) -> &'static str {
        match self {
            DiagnosticKind::MissingCases => "UC0001",
            DiagnosticKind::UnreachableArm => "UC0002",
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            DiagnosticKind::MissingCases => "missing-cases",
            DiagnosticKind::UnreachableArm => "unreachable-arm",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Warning,
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Warning => write!(f, "warning"),
            Severity::Error => write!(f, "error"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Diagnostic {
    pub kind: DiagnosticKind,
    pub code: &'static str,
    pub severity: Severity,
    pub message: String,
    pub span: Option<Span>,
    /// Arm the diagnostic is about, for arm-level diagnostics
    #[serde(skip_serializing_if = "Option::is_none")]
    pub arm: Option<usize>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub notes: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fix: Option<Fix>,
}

impl Diagnostic {
    pub fn new(kind: DiagnosticKind, severity: Severity, message: impl Into<String>) -> Self {
        Self {
            kind,
            code: kind.code(),
            severity,
            message: message.into(),
            span: None,
            arm: None,
            notes: Vec::new(),
            fix: None,
        }
    }

    pub fn with_span(mut self, span: Option<Span>) -> Self {
        self.span = span;
        self
    }

    pub fn with_arm(mut self, arm: usize) -> Self {
        self.arm = Some(arm);
        self
    }

    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.notes.push(note.into());
        self
    }

    pub fn with_fix(mut self, fix: Fix) -> Self {
        self.fix = Some(fix);
        self
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}[{}]: {}", self.severity, self.code, self.message)
    }
}

/// Whether any diagnostic is an error
pub fn has_errors(diagnostics: &[Diagnostic]) -> bool {
    diagnostics.iter().any(Diagnostic::is_error)
}

/// 1-based line and column of a byte offset. Offsets past the end clamp
/// to the end of the source.
pub fn line_col(source: &str, offset: usize) -> (usize, usize) {
    let mut offset = offset.min(source.len());
    while !source.is_char_boundary(offset) {
        offset -= 1;
    }
    let before = &source[..offset];
    let line = before.matches('\n').count() + 1;
    let line_start = before.rfind('\n').map_or(0, |i| i + 1);
    let col = before[line_start..].chars().count() + 1;
    (line, col)
}

/// Plain text rendering
///
/// Locations are `file:line:col` when the source is available and
/// `file@start..end` otherwise.
pub fn render_text(diagnostics: &[Diagnostic], filename: &str, source: Option<&str>) -> String {
    let mut out = String::new();
    for diagnostic in diagnostics {
        let location = match (diagnostic.span, source) {
            (Some(span), Some(source)) => {
                let (line, col) = line_col(source, span.start);
                format!("{filename}:{line}:{col}")
            }
            (Some(span), None) => format!("{filename}@{span}"),
            (None, _) => filename.to_string(),
        };
        out.push_str(&format!("{location}: {diagnostic}\n"));
        for note in &diagnostic.notes {
            out.push_str(&format!("  note: {note}\n"));
        }
        if let Some(fix) = &diagnostic.fix {
            out.push_str(&format!("  help: {}\n", fix.title));
        }
    }
    out
}

/// Render one diagnostic as an ariadne report
///
/// Diagnostics without a span that fits `source` are rendered by
/// `render_text` instead.
pub fn render_report(
    diagnostic: &Diagnostic,
    filename: &str,
    source: &str,
    color: bool,
) -> String {
    use ariadne::{Color, Config, Label, Report, ReportKind, Source};

    let Some(span) = diagnostic
        .span
        .filter(|span| span.validate(Some(source.len())).is_ok())
    else {
        return render_text(std::slice::from_ref(diagnostic), filename, Some(source));
    };

    let (kind, label_color) = match diagnostic.severity {
        Severity::Error => (ReportKind::Error, Color::Red),
        Severity::Warning => (ReportKind::Warning, Color::Yellow),
    };

    let mut builder = Report::build(kind, (filename, span.start..span.end))
        .with_code(diagnostic.code)
        .with_message(&diagnostic.message)
        .with_config(Config::default().with_color(color))
        .with_label(
            Label::new((filename, span.start..span.end))
                .with_message(diagnostic.kind.name())
                .with_color(label_color),
        );
    for note in &diagnostic.notes {
        builder = builder.with_note(note);
    }
    if let Some(fix) = &diagnostic.fix {
        builder = builder.with_help(&fix.title);
    }

    let mut out = Vec::new();
    match builder
        .finish()
        .write((filename, Source::from(source)), &mut out)
    {
        Ok(()) => String::from_utf8_lossy(&out).into_owned(),
        Err(_) => render_text(std::slice::from_ref(diagnostic), filename, Some(source)),
    }
}

pub fn to_json(diagnostics: &[Diagnostic]) -> serde_json::Result<String> {
    serde_json::to_string_pretty(diagnostics)
}
