//! Union recognition
//!
//! Decides whether the scrutinee of a match is a closed union and, if so,
//! which variants it declares. Two shapes are recognised:
//! - an instantiation of a generic union constructor such as `OneOf<A, B>`
//! - a named union declared in the snapshot (a type wrapping such a constructor)

use std::collections::{HashMap, HashSet};

use crate::ast::{Span, TypeRef, UnionDecl};
use crate::error::{CheckError, Result};
use crate::util::{find_similar_name, format_suggestion_hint};

use super::TypeEnv;

/// A union as seen by one match expression
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnionType {
    /// The union type as written at the match
    pub ty: TypeRef,
    /// Variant types in declaration order
    pub variants: Vec<TypeRef>,
}

/// Known union constructors and named unions
#[derive(Debug, Clone, Default)]
pub struct UnionRegistry {
    generic: Vec<String>,
    declared: HashMap<String, UnionDecl>,
}

impl UnionRegistry {
    /// Register generic constructors and declared unions
    ///
    /// Declared unions must have at least one variant, distinct variants
    /// under `env`, and a unique name.
    pub fn new(generic: Vec<String>, decls: &[UnionDecl], env: &TypeEnv) -> Result<Self> {
        let mut declared = HashMap::new();

        for decl in decls {
            if decl.variants.is_empty() {
                return Err(CheckError::invalid_union(
                    &decl.name,
                    "declares no variants",
                    decl.span,
                ));
            }

            let mut seen = HashSet::new();
            for variant in &decl.variants {
                if !seen.insert(env.canonicalize(variant)) {
                    return Err(CheckError::invalid_union(
                        &decl.name,
                        format!("variant `{variant}` is listed more than once"),
                        decl.span,
                    ));
                }
            }

            if declared.insert(decl.name.clone(), decl.clone()).is_some() {
                return Err(CheckError::invalid_union(
                    &decl.name,
                    "declared more than once",
                    decl.span,
                ));
            }
        }

        Ok(Self { generic, declared })
    }

    /// Whether `name` is a generic union constructor. Qualified names match
    /// on their last segment.
    pub fn is_generic_union(&self, ty: &TypeRef) -> bool {
        self.generic
            .iter()
            .any(|g| *g == ty.name || g == ty.simple_name())
    }

    /// The union matched over by a scrutinee of type `scrutinee`, or `None`
    /// if it is not a union at all
    pub fn resolve(&self, scrutinee: &TypeRef, env: &TypeEnv) -> Option<UnionType> {
        let canonical = env.canonicalize(scrutinee);

        if canonical.args.is_empty() {
            return self.declared.get(&canonical.name).map(|decl| UnionType {
                ty: scrutinee.clone(),
                variants: decl.variants.clone(),
            });
        }

        if !self.is_generic_union(&canonical) {
            return None;
        }

        // Keep the arguments as spelled when the scrutinee was not an alias.
        let variants = if scrutinee.name == canonical.name {
            scrutinee.args.clone()
        } else {
            canonical.args
        };
        Some(UnionType {
            ty: scrutinee.clone(),
            variants,
        })
    }

    /// Look up a declared union by name
    pub fn lookup(&self, name: &str, span: Option<Span>) -> Result<&UnionDecl> {
        self.declared.get(name).ok_or_else(|| {
            let mut candidates: Vec<&str> = self.declared.keys().map(String::as_str).collect();
            candidates.sort_unstable();
            let suggestion = find_similar_name(name, &candidates, 2);
            CheckError::UnknownUnion {
                name: name.to_string(),
                hint: format_suggestion_hint(suggestion),
                span,
            }
        })
    }

    pub fn declared_count(&self) -> usize {
        self.declared.len()
    }
}
