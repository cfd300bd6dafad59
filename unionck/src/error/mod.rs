//! Error types and reporting
//!
//! These cover malformed input: unreadable files, bad JSON or TOML, and
//! snapshots that break the model's invariants. A well-formed match that
//! simply misses cases is not an error; it becomes a `Diagnostic`.

use crate::ast::Span;
use thiserror::Error;

/// Result type alias
pub type Result<T> = std::result::Result<T, CheckError>;

#[derive(Debug, Error)]
pub enum CheckError {
    #[error("IO error: {message}")]
    Io { message: String },

    #[error("invalid snapshot: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid configuration: {0}")]
    Config(#[from] toml::de::Error),

    #[error("type alias cycle: {}", .path.join(" -> "))]
    AliasCycle { path: Vec<String> },

    #[error("unknown union `{name}`{hint}")]
    UnknownUnion {
        name: String,
        hint: String,
        span: Option<Span>,
    },

    #[error("invalid union `{name}`: {message}")]
    InvalidUnion {
        name: String,
        message: String,
        span: Option<Span>,
    },

    #[error("malformed input: {message}")]
    Malformed { message: String, span: Option<Span> },
}

impl CheckError {
    pub fn io_error(message: impl Into<String>) -> Self {
        Self::Io {
            message: message.into(),
        }
    }

    pub fn invalid_union(name: &str, message: impl Into<String>, span: Option<Span>) -> Self {
        Self::InvalidUnion {
            name: name.to_string(),
            message: message.into(),
            span,
        }
    }

    pub fn malformed(message: impl Into<String>, span: Option<Span>) -> Self {
        Self::Malformed {
            message: message.into(),
            span,
        }
    }

    pub fn span(&self) -> Option<Span> {
        match self {
            Self::UnknownUnion { span, .. }
            | Self::InvalidUnion { span, .. }
            | Self::Malformed { span, .. } => *span,
            Self::Io { .. } | Self::Json(_) | Self::Config(_) | Self::AliasCycle { .. } => None,
        }
    }

    /// The error text without its category prefix
    pub fn message(&self) -> String {
        match self {
            Self::Io { message } | Self::Malformed { message, .. } => message.clone(),
            Self::Json(e) => e.to_string(),
            Self::Config(e) => e.to_string(),
            Self::AliasCycle { path } => path.join(" -> "),
            Self::UnknownUnion { name, hint, .. } => format!("`{name}`{hint}"),
            Self::InvalidUnion { name, message, .. } => format!("`{name}`: {message}"),
        }
    }

    /// Short category name used in reports
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Io { .. } => "IO",
            Self::Json(_) => "Snapshot",
            Self::Config(_) => "Config",
            Self::AliasCycle { .. } => "Alias",
            Self::UnknownUnion { .. } | Self::InvalidUnion { .. } => "Union",
            Self::Malformed { .. } => "Input",
        }
    }
}

impl From<std::io::Error> for CheckError {
    fn from(e: std::io::Error) -> Self {
        Self::io_error(e.to_string())
    }
}

/// Report error with ariadne
///
/// Errors whose span fits the source get a labelled report; everything
/// else is printed as a single line.
pub fn report_error(filename: &str, source: Option<&str>, error: &CheckError) {
    use ariadne::{Color, Label, Report, ReportKind, Source};

    let kind = error.kind();
    let located = error.span().zip(source).filter(|(span, source)| {
        span.validate(Some(source.len())).is_ok()
    });
    match located {
        Some((span, source)) => {
            let printed = Report::build(ReportKind::Error, (filename, span.start..span.end))
                .with_message(format!("{kind} error"))
                .with_label(
                    Label::new((filename, span.start..span.end))
                        .with_message(error.message())
                        .with_color(Color::Red),
                )
                .finish()
                .eprint((filename, Source::from(source)));
            if printed.is_err() {
                eprintln!("error: {error}");
            }
        }
        None => eprintln!("error: {error}"),
    }
}
