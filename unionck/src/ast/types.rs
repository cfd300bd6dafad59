//! Type references as reported by the host

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A reference to a host type, e.g. `OneOf<Created, NotFound>` or `string?`
///
/// Equality here is structural over the spelling. Alias- and
/// nullability-insensitive comparison goes through `types::TypeEnv`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "TypeRefRepr")]
pub struct TypeRef {
    pub name: String,
    pub args: Vec<TypeRef>,
    pub nullable: bool,
}

/// Snapshots may spell a type either as a string or as a full object
#[derive(Deserialize)]
#[serde(untagged)]
enum TypeRefRepr {
    Text(String),
    Full {
        name: String,
        #[serde(default)]
        args: Vec<TypeRef>,
        #[serde(default)]
        nullable: bool,
    },
}

impl From<TypeRefRepr> for TypeRef {
    fn from(repr: TypeRefRepr) -> Self {
        match repr {
            // An unparsable string still names *something*; keep it verbatim
            // so it simply never matches a variant.
            TypeRefRepr::Text(text) => text.parse().unwrap_or_else(|_| TypeRef::named(text)),
            TypeRefRepr::Full {
                name,
                args,
                nullable,
            } => TypeRef {
                name,
                args,
                nullable,
            },
        }
    }
}

impl TypeRef {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            args: Vec::new(),
            nullable: false,
        }
    }

    pub fn generic(name: impl Into<String>, args: Vec<TypeRef>) -> Self {
        Self {
            name: name.into(),
            args,
            nullable: false,
        }
    }

    /// Last segment of a qualified name: `System.Int32` -> `Int32`
    pub fn simple_name(&self) -> &str {
        self.name.rsplit(['.', ':']).next().unwrap_or(&self.name)
    }
}

impl fmt::Display for TypeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)?;
        if !self.args.is_empty() {
            write!(f, "<")?;
            for (i, arg) in self.args.iter().enumerate() {
                if i > 0 {
                    write!(f, ", ")?;
                }
                write!(f, "{arg}")?;
            }
            write!(f, ">")?;
        }
        if self.nullable {
            write!(f, "?")?;
        }
        Ok(())
    }
}

/// Error from reading the textual type notation
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid type `{text}`: {reason}")]
pub struct ParseTypeError {
    pub text: String,
    pub reason: &'static str,
}

impl FromStr for TypeRef {
    type Err = ParseTypeError;

    /// Reads `Name`, `Name<A, B>` and a trailing `?` for nullable types
    fn from_str(text: &str) -> Result<Self, Self::Err> {
        let fail = |reason| ParseTypeError {
            text: text.to_string(),
            reason,
        };

        let mut reader = TypeReader { rest: text };
        let ty = reader.read_type().map_err(fail)?;
        if !reader.rest.trim().is_empty() {
            return Err(fail("unexpected trailing input"));
        }
        Ok(ty)
    }
}

struct TypeReader<'a> {
    rest: &'a str,
}

impl TypeReader<'_> {
    fn skip_ws(&mut self) {
        self.rest = self.rest.trim_start();
    }

    fn eat(&mut self, c: char) -> bool {
        self.skip_ws();
        match self.rest.strip_prefix(c) {
            Some(rest) => {
                self.rest = rest;
                true
            }
            None => false,
        }
    }

    fn read_type(&mut self) -> Result<TypeRef, &'static str> {
        self.skip_ws();
        let end = self
            .rest
            .find(|c: char| c.is_whitespace() || matches!(c, '<' | '>' | ',' | '?'))
            .unwrap_or(self.rest.len());
        if end == 0 {
            return Err("expected a type name");
        }
        let name = self.rest[..end].to_string();
        self.rest = &self.rest[end..];

        let mut args = Vec::new();
        if self.eat('<') {
            loop {
                args.push(self.read_type()?);
                if self.eat(',') {
                    continue;
                }
                if self.eat('>') {
                    break;
                }
                return Err("expected `,` or `>`");
            }
        }

        let nullable = self.eat('?');
        Ok(TypeRef {
            name,
            args,
            nullable,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_plain_name() {
        let ty: TypeRef = "Int32".parse().unwrap();
        assert_eq!(ty, TypeRef::named("Int32"));
    }

    #[test]
    fn test_parse_nested_generic_nullable() {
        let ty: TypeRef = "OneOf<List<string?>, Error>?".parse().unwrap();
        assert_eq!(ty.name, "OneOf");
        assert!(ty.nullable);
        assert_eq!(ty.args.len(), 2);
        assert!(ty.args[0].args[0].nullable);
        assert_eq!(ty.to_string(), "OneOf<List<string?>, Error>?");
    }

    #[test]
    fn test_parse_rejects_unbalanced() {
        assert!("OneOf<A, B".parse::<TypeRef>().is_err());
        assert!("A>".parse::<TypeRef>().is_err());
        assert!("".parse::<TypeRef>().is_err());
    }

    #[test]
    fn test_simple_name_strips_namespace() {
        assert_eq!(TypeRef::named("System.Int32").simple_name(), "Int32");
        assert_eq!(TypeRef::named("app::Error").simple_name(), "Error");
        assert_eq!(TypeRef::named("Error").simple_name(), "Error");
    }

    #[test]
    fn test_deserialize_string_and_object_forms() {
        let text: TypeRef = serde_json::from_str(r#""OneOf<A, B>""#).unwrap();
        let full: TypeRef = serde_json::from_str(
            r#"{"name": "OneOf", "args": [{"name": "A"}, "B"]}"#,
        )
        .unwrap();
        assert_eq!(text, full);
    }
}
