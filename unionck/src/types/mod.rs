//! Type identity
//!
//! The host reports types as it spells them. `TypeEnv` folds those
//! spellings into a canonical `TypeRef`: aliases are resolved and, unless
//! configured otherwise, nullability annotations are dropped. The canonical
//! form is the key used by the exhaustiveness checker.

pub mod exhaustiveness;
pub mod union;

use std::collections::HashMap;

use crate::ast::TypeRef;
use crate::error::{CheckError, Result};

pub use exhaustiveness::{
    analyze_arms, check, CheckResult, ExhaustivenessReport, NominalEquality, PatternKind,
    TypeEquality,
};
pub use union::{UnionRegistry, UnionType};

/// Alias table plus comparison settings
#[derive(Debug, Clone)]
pub struct TypeEnv {
    aliases: HashMap<String, TypeRef>,
    ignore_nullability: bool,
}

impl Default for TypeEnv {
    fn default() -> Self {
        Self {
            aliases: HashMap::new(),
            ignore_nullability: true,
        }
    }
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Visit {
    InProgress,
    Done,
}

impl TypeEnv {
    /// Build an environment, rejecting alias cycles
    ///
    /// Later aliases with the same name replace earlier ones.
    pub fn new(
        aliases: impl IntoIterator<Item = (String, TypeRef)>,
        ignore_nullability: bool,
    ) -> Result<Self> {
        let env = Self {
            aliases: aliases.into_iter().collect(),
            ignore_nullability,
        };
        env.check_cycles()?;
        Ok(env)
    }

    /// Canonical form of `ty`
    ///
    /// Only argument-less references are looked up as aliases; `List<int>`
    /// keeps its head but has `int` resolved.
    pub fn canonicalize(&self, ty: &TypeRef) -> TypeRef {
        let mut canonical = match self.aliases.get(&ty.name) {
            Some(target) if ty.args.is_empty() => {
                let mut resolved = self.canonicalize(target);
                resolved.nullable |= ty.nullable;
                resolved
            }
            _ => TypeRef {
                name: ty.name.clone(),
                args: ty.args.iter().map(|arg| self.canonicalize(arg)).collect(),
                nullable: ty.nullable,
            },
        };

        if self.ignore_nullability {
            canonical.nullable = false;
        }
        canonical
    }

    fn check_cycles(&self) -> Result<()> {
        let mut state: HashMap<&str, Visit> = HashMap::new();
        let mut names: Vec<&str> = self.aliases.keys().map(String::as_str).collect();
        // Deterministic error paths
        names.sort_unstable();

        for name in names {
            let mut path = vec![];
            self.visit(name, &mut state, &mut path)?;
        }
        Ok(())
    }

    fn visit<'a>(
        &'a self,
        name: &'a str,
        state: &mut HashMap<&'a str, Visit>,
        path: &mut Vec<&'a str>,
    ) -> Result<()> {
        match state.get(name) {
            Some(Visit::Done) => return Ok(()),
            Some(Visit::InProgress) => {
                let start = path.iter().position(|n| *n == name).unwrap_or(0);
                let mut cycle: Vec<String> = path[start..].iter().map(|n| n.to_string()).collect();
                cycle.push(name.to_string());
                return Err(CheckError::AliasCycle { path: cycle });
            }
            None => {}
        }

        let Some(target) = self.aliases.get(name) else {
            return Ok(());
        };

        state.insert(name, Visit::InProgress);
        path.push(name);
        let mut referenced = vec![];
        collect_alias_refs(target, &mut referenced);
        for next in referenced {
            if self.aliases.contains_key(next) {
                self.visit(next, state, path)?;
            }
        }
        path.pop();
        state.insert(name, Visit::Done);
        Ok(())
    }
}

/// Names in `ty` that `canonicalize` would try to resolve as aliases
fn collect_alias_refs<'a>(ty: &'a TypeRef, out: &mut Vec<&'a str>) {
    if ty.args.is_empty() {
        out.push(&ty.name);
    }
    for arg in &ty.args {
        collect_alias_refs(arg, out);
    }
}

impl TypeEquality<TypeRef> for TypeEnv {
    type Key = TypeRef;

    fn key(&self, ty: &TypeRef) -> TypeRef {
        self.canonicalize(ty)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ty(text: &str) -> TypeRef {
        text.parse().unwrap()
    }

    fn same_type(env: &TypeEnv, a: &str, b: &str) -> bool {
        env.canonicalize(&ty(a)) == env.canonicalize(&ty(b))
    }

    fn env(aliases: &[(&str, &str)], ignore_nullability: bool) -> Result<TypeEnv> {
        TypeEnv::new(
            aliases.iter().map(|(name, target)| (name.to_string(), ty(target))),
            ignore_nullability,
        )
    }

    #[test]
    fn test_alias_resolution() {
        let env = env(&[("int", "Int32")], true).unwrap();
        assert_eq!(env.canonicalize(&ty("int")), ty("Int32"));
        assert!(same_type(&env, "int", "Int32"));
        assert!(!same_type(&env, "int", "Int64"));
    }

    #[test]
    fn test_alias_chain_and_generic_arguments() {
        let env = env(&[("Id", "int"), ("int", "Int32")], true).unwrap();
        assert_eq!(env.canonicalize(&ty("List<Id>")), ty("List<Int32>"));
    }

    #[test]
    fn test_alias_not_applied_to_generic_head() {
        let env = env(&[("List", "Array")], true).unwrap();
        assert_eq!(env.canonicalize(&ty("List<A>")), ty("List<A>"));
        assert_eq!(env.canonicalize(&ty("List")), ty("Array"));
    }

    #[test]
    fn test_nullability_ignored_by_default() {
        let env = TypeEnv::default();
        assert!(same_type(&env, "string?", "string"));
        assert!(same_type(&env, "List<A?>", "List<A>"));
    }

    #[test]
    fn test_nullability_respected_when_configured() {
        let env = env(&[("MaybeName", "string?")], false).unwrap();
        assert!(!same_type(&env, "string?", "string"));
        assert!(same_type(&env, "MaybeName", "string?"));
        assert!(same_type(&env, "MaybeName?", "string?"));
    }

    #[test]
    fn test_alias_cycle_rejected() {
        let err = env(&[("A", "B"), ("B", "A")], true).unwrap_err();
        match err {
            CheckError::AliasCycle { path } => assert_eq!(path, vec!["A", "B", "A"]),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_alias_cycle_through_arguments_rejected() {
        let err = env(&[("Tree", "List<Tree>")], true).unwrap_err();
        assert!(matches!(err, CheckError::AliasCycle { .. }));
    }

    #[test]
    fn test_self_alias_rejected() {
        assert!(env(&[("A", "A")], true).is_err());
    }

    #[test]
    fn test_shared_alias_target_is_not_a_cycle() {
        assert!(env(&[("A", "C"), ("B", "C"), ("C", "Int32")], true).is_ok());
    }

    #[test]
    fn test_env_as_equality_policy() {
        let env = env(&[("int", "Int32")], true).unwrap();
        let variants = [ty("Int32"), ty("string")];
        let int = ty("int");
        let string = ty("string?");
        let patterns = [PatternKind::TypeTest(Some(&int)), PatternKind::TypeTest(Some(&string))];
        assert!(check(&variants, &patterns, &env).is_exhaustive());
    }
}
