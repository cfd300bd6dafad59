//! Snapshot model
//!
//! A host adapter walks its own syntax tree and writes every match
//! expression over a union-like type into a `Document`, together with the
//! unions and type aliases it knows about. Everything downstream works on
//! this model only.

mod pattern;
mod span;
mod types;

pub use pattern::*;
pub use span::*;
pub use types::*;

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// A snapshot of one source file
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Document {
    /// Path of the source file, relative to the snapshot
    #[serde(default)]
    pub source: Option<String>,
    #[serde(default)]
    pub aliases: Vec<AliasDecl>,
    #[serde(default)]
    pub unions: Vec<UnionDecl>,
    #[serde(default)]
    pub matches: Vec<MatchExpr>,
}

/// A named union type, e.g. `class SaveResult : OneOfBase<Saved, Invalid>`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnionDecl {
    pub name: String,
    pub variants: Vec<TypeRef>,
    #[serde(default)]
    pub span: Option<Span>,
}

/// `name` is another spelling of `target`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AliasDecl {
    pub name: String,
    pub target: TypeRef,
}

impl Document {
    pub fn from_json(text: &str) -> serde_json::Result<Self> {
        serde_json::from_str(text)
    }

    /// Check every span in the snapshot, against `source` when it is known
    pub fn validate_spans(&self, source: Option<&str>) -> Result<()> {
        let source_len = source.map(str::len);
        let union_spans = self.unions.iter().filter_map(|decl| decl.span);
        let match_spans = self.matches.iter().flat_map(|expr| {
            expr.span
                .into_iter()
                .chain(expr.arms.iter().filter_map(|arm| arm.span))
        });
        for span in union_spans.chain(match_spans) {
            span.validate(source_len)?;
        }
        Ok(())
    }
}
