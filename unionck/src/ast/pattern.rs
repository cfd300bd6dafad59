//! Match expressions and their patterns

use std::fmt;

use serde::{Deserialize, Serialize};

use super::{Span, TypeRef};

/// A pattern in a match arm, already classified by the host
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Pattern {
    /// `_`: matches anything
    Discard,
    /// A constant such as `1` or `"ok"`, compared after implicit conversion
    /// to `ty`. `ty` is `None` when the host could not resolve it.
    Literal {
        value: LiteralValue,
        #[serde(default)]
        ty: Option<TypeRef>,
    },
    /// `T name` / `T`: matches any value assignable to `ty`
    TypeTest {
        #[serde(default)]
        ty: Option<TypeRef>,
        #[serde(default)]
        binding: Option<String>,
    },
}

impl Pattern {
    pub fn literal(value: LiteralValue, ty: TypeRef) -> Self {
        Pattern::Literal {
            value,
            ty: Some(ty),
        }
    }

    pub fn type_test(ty: TypeRef) -> Self {
        Pattern::TypeTest {
            ty: Some(ty),
            binding: None,
        }
    }

    pub fn is_discard(&self) -> bool {
        matches!(self, Pattern::Discard)
    }
}

/// Constant value of a literal pattern
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum LiteralValue {
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
    Null,
}

impl fmt::Display for LiteralValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LiteralValue::Bool(b) => write!(f, "{b}"),
            LiteralValue::Int(n) => write!(f, "{n}"),
            LiteralValue::Float(x) => write!(f, "{x:?}"),
            LiteralValue::Str(s) => write!(f, "{s:?}"),
            LiteralValue::Null => write!(f, "null"),
        }
    }
}

/// One arm of a match expression. The result expression is carried
/// for display only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchArm {
    pub pattern: Pattern,
    #[serde(default)]
    pub result: Option<String>,
    #[serde(default)]
    pub span: Option<Span>,
}

impl MatchArm {
    pub fn new(pattern: Pattern) -> Self {
        Self {
            pattern,
            result: None,
            span: None,
        }
    }

    pub fn with_span(mut self, span: Span) -> Self {
        self.span = Some(span);
        self
    }
}

/// A match expression over a value of type `scrutinee`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchExpr {
    pub scrutinee: TypeRef,
    /// Explicit name of a declared union, when the host already knows it
    #[serde(default)]
    pub union: Option<String>,
    pub arms: Vec<MatchArm>,
    #[serde(default)]
    pub span: Option<Span>,
}

impl MatchExpr {
    pub fn new(scrutinee: TypeRef, arms: Vec<MatchArm>) -> Self {
        Self {
            scrutinee,
            union: None,
            arms,
            span: None,
        }
    }

    /// Where an added arm goes: right after the last arm that has a span
    pub fn insertion_offset(&self) -> Option<usize> {
        self.arms.iter().filter_map(|arm| arm.span).map(|s| s.end).max()
    }
}
