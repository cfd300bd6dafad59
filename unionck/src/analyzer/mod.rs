//! Match analysis over a snapshot
//!
//! For every match expression:
//! 1. find the union being matched over (explicit name, declared union or
//!    generic constructor); non-union scrutinees are skipped
//! 2. classify the arms and run the exhaustiveness checker
//! 3. turn the report into diagnostics at their configured severity

use crate::ast::{Document, MatchArm, MatchExpr, Pattern, TypeRef};
use crate::config::Config;
use crate::diagnostics::{Diagnostic, DiagnosticKind};
use crate::error::{CheckError, Result};
use crate::fix::suggest_fix;
use crate::types::exhaustiveness::{analyze_arms, format_missing, ExhaustivenessReport};
use crate::types::{PatternKind, TypeEnv, UnionRegistry, UnionType};

/// Classify an arm's pattern for the checker
pub fn pattern_kind(pattern: &Pattern) -> PatternKind<'_, TypeRef> {
    match pattern {
        Pattern::Discard => PatternKind::Discard,
        Pattern::Literal { ty, .. } => PatternKind::Literal(ty.as_ref()),
        Pattern::TypeTest { ty, .. } => PatternKind::TypeTest(ty.as_ref()),
    }
}

/// Analyzer for one document
pub struct Analyzer<'c> {
    config: &'c Config,
    env: TypeEnv,
    registry: UnionRegistry,
}

impl<'c> Analyzer<'c> {
    /// Build the type environment and union registry for `doc`
    ///
    /// Document aliases override config aliases of the same name. Spans are
    /// checked for shape only; bounds need the source text.
    pub fn new(config: &'c Config, doc: &Document) -> Result<Self> {
        doc.validate_spans(None)?;
        let aliases = config.aliases().chain(
            doc.aliases
                .iter()
                .map(|alias| (alias.name.clone(), alias.target.clone())),
        );
        let env = TypeEnv::new(aliases, config.types.ignore_nullability)?;
        let registry = UnionRegistry::new(config.unions.generic.clone(), &doc.unions, &env)?;
        Ok(Self {
            config,
            env,
            registry,
        })
    }

    pub fn registry(&self) -> &UnionRegistry {
        &self.registry
    }

    /// The union `expr` matches over, `None` if it is not a union match
    pub fn union_of(&self, expr: &MatchExpr) -> Result<Option<UnionType>> {
        if let Some(name) = &expr.union {
            let decl = self.registry.lookup(name, expr.span)?;
            return Ok(Some(UnionType {
                ty: expr.scrutinee.clone(),
                variants: decl.variants.clone(),
            }));
        }
        Ok(self.registry.resolve(&expr.scrutinee, &self.env))
    }

    /// Exhaustiveness report for `expr`, `None` if it is not a union match
    pub fn report(
        &self,
        expr: &MatchExpr,
    ) -> Result<Option<(UnionType, ExhaustivenessReport<TypeRef>)>> {
        if expr.arms.is_empty() {
            return Err(CheckError::malformed("match expression has no arms", expr.span));
        }

        let Some(union) = self.union_of(expr)? else {
            return Ok(None);
        };
        let patterns: Vec<PatternKind<'_, TypeRef>> =
            expr.arms.iter().map(|arm| pattern_kind(&arm.pattern)).collect();
        let report = analyze_arms(&union.variants, &patterns, &self.env);
        Ok(Some((union, report)))
    }

    /// Diagnostics for one match expression
    pub fn analyze_match(&self, expr: &MatchExpr) -> Result<Vec<Diagnostic>> {
        let Some((union, report)) = self.report(expr)? else {
            return Ok(vec![]);
        };

        let mut diagnostics = vec![];
        if let Some(severity) = self.config.diagnostics.missing_cases.severity() {
            let missing = report.result.missing();
            if !missing.is_empty() {
                let mut diagnostic = Diagnostic::new(
                    DiagnosticKind::MissingCases,
                    severity,
                    format!(
                        "non-exhaustive match on `{}`: {} not covered",
                        union.ty,
                        format_missing(missing)
                    ),
                )
                .with_span(expr.span);
                for ty in &report.literal_only {
                    diagnostic = diagnostic.with_note(format!(
                        "a literal pattern matches only one value of `{ty}`; add a type pattern for `{ty}`"
                    ));
                }
                diagnostics.push(diagnostic.with_fix(suggest_fix(expr, missing, &self.config.fix)));
            }
        }

        if let Some(severity) = self.config.diagnostics.unreachable_arm.severity() {
            let first_discard = expr.arms.iter().position(|arm| arm.pattern.is_discard());
            for &index in &report.unreachable_arms {
                let arm = &expr.arms[index];
                let diagnostic = Diagnostic::new(
                    DiagnosticKind::UnreachableArm,
                    severity,
                    "unreachable match arm: previous arms already cover this pattern",
                )
                .with_span(arm.span.or(expr.span))
                .with_arm(index)
                .with_note(unreachable_reason(arm, index, first_discard));
                diagnostics.push(diagnostic);
            }
        }

        Ok(diagnostics)
    }

    /// Diagnostics for every match in `doc`, in document order
    pub fn analyze(&self, doc: &Document) -> Result<Vec<Diagnostic>> {
        let mut diagnostics = vec![];
        for expr in &doc.matches {
            diagnostics.extend(self.analyze_match(expr)?);
        }
        Ok(diagnostics)
    }
}

fn unreachable_reason(arm: &MatchArm, index: usize, first_discard: Option<usize>) -> String {
    if first_discard.is_some_and(|discard| discard < index) {
        return "an earlier discard arm matches every value".to_string();
    }
    match &arm.pattern {
        Pattern::Literal {
            value,
            ty: Some(ty),
        } => format!("an earlier arm already matches every `{ty}`, including `{value}`"),
        Pattern::TypeTest { ty: Some(ty), .. } => {
            format!("an earlier arm already matches every `{ty}`")
        }
        _ => "an earlier arm already matches this pattern".to_string(),
    }
}

/// Analyze a whole document with `config`
pub fn analyze_document(config: &Config, doc: &Document) -> Result<Vec<Diagnostic>> {
    Analyzer::new(config, doc)?.analyze(doc)
}
