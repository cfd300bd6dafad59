//! Exhaustiveness checking for matches over closed union types
//!
//! A host adapter exports its match expressions as a snapshot (`ast::Document`);
//! the analyzer reports which union variants each match fails to cover and
//! which arms can never be reached, with fix suggestions.

pub mod analyzer;
pub mod ast;
pub mod config;
pub mod diagnostics;
pub mod error;
pub mod fix;
pub mod types;
pub mod util;

pub use analyzer::{analyze_document, Analyzer};
pub use ast::{Document, Span, TypeRef};
pub use config::Config;
pub use diagnostics::Diagnostic;
pub use error::{CheckError, Result};
pub use types::{check, CheckResult, PatternKind, TypeEquality};
