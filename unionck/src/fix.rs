//! Fix suggestions for non-exhaustive matches
//!
//! A fix is a list of arm texts plus the offset they go after. Arms are
//! rendered from the configured template; indentation is taken from the
//! source when the fix is applied.

use std::collections::HashSet;

use serde::Serialize;

use crate::ast::{MatchExpr, Pattern, TypeRef};
use crate::config::{FixConfig, FixPreference};
use crate::error::{CheckError, Result};
use crate::util::{is_identifier, is_reserved_word, to_lower_camel_case};

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", content = "variants", rename_all = "snake_case")]
pub enum FixKind {
    AddDiscardArm,
    AddVariantArms(Vec<TypeRef>),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Fix {
    pub kind: FixKind,
    pub title: String,
    pub arms: Vec<String>,
    /// Byte offset the arms are inserted after; `None` when the match has no
    /// located arms
    pub insert_at: Option<usize>,
}

/// An insertion into source text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextEdit {
    pub offset: usize,
    pub text: String,
}

/// Build the preferred fix for `missing` variants of `expr`
pub fn suggest_fix(expr: &MatchExpr, missing: &[TypeRef], config: &FixConfig) -> Fix {
    let insert_at = expr.insertion_offset();

    match config.prefer {
        FixPreference::Discard => Fix {
            kind: FixKind::AddDiscardArm,
            title: "add a discard arm `_` to handle remaining cases".to_string(),
            arms: vec![render_discard_arm(&config.arm_template)],
            insert_at,
        },
        FixPreference::Arms => {
            let mut taken = existing_bindings(expr);
            let arms = missing
                .iter()
                .map(|ty| {
                    let binding = binding_name(ty, &mut taken);
                    render_arm(&config.arm_template, ty, &binding)
                })
                .collect();
            let names: Vec<String> = missing.iter().map(|ty| format!("`{ty}`")).collect();
            Fix {
                kind: FixKind::AddVariantArms(missing.to_vec()),
                title: format!("add arms for {}", names.join(", ")),
                arms,
                insert_at,
            }
        }
    }
}

fn existing_bindings(expr: &MatchExpr) -> HashSet<String> {
    expr.arms
        .iter()
        .filter_map(|arm| match &arm.pattern {
            Pattern::TypeTest {
                binding: Some(binding),
                ..
            } => Some(binding.clone()),
            _ => None,
        })
        .collect()
}

/// A fresh binding name for a value of type `ty`
///
/// `NotFound` -> `notFound`. A taken name gets a numeric suffix. Keywords
/// and names that are not identifiers fall back to `value`.
pub fn binding_name(ty: &TypeRef, taken: &mut HashSet<String>) -> String {
    let base = to_lower_camel_case(ty.simple_name());
    let base = if is_identifier(&base) && !is_reserved_word(&base) {
        base
    } else {
        "value".to_string()
    };

    let mut name = base.clone();
    let mut suffix = 2;
    while taken.contains(&name) {
        name = format!("{base}{suffix}");
        suffix += 1;
    }
    taken.insert(name.clone());
    name
}

pub fn render_arm(template: &str, ty: &TypeRef, binding: &str) -> String {
    template
        .replace("{type}", &ty.to_string())
        .replace("{binding}", binding)
}

/// The template with its pattern replaced by `_`
pub fn render_discard_arm(template: &str) -> String {
    if template.contains("{type} {binding}") {
        template.replace("{type} {binding}", "_")
    } else {
        template.replace("{type}", "_").replace("{binding}", "")
    }
}

/// Turn a fix into an insertion, indenting new arms like the line that
/// holds the insertion point
pub fn fix_edit(fix: &Fix, source: &str) -> Option<TextEdit> {
    let offset = fix.insert_at?;
    let indent = line_indent(source, offset);
    let text = fix
        .arms
        .iter()
        .map(|arm| format!(",\n{indent}{arm}"))
        .collect();
    Some(TextEdit { offset, text })
}

fn line_indent(source: &str, offset: usize) -> &str {
    let Some(before) = source.get(..offset) else {
        return "";
    };
    let line_start = before.rfind('\n').map_or(0, |i| i + 1);
    let line = &source[line_start..];
    let width = line.len() - line.trim_start_matches([' ', '\t']).len();
    &line[..width]
}

/// Apply insertions to `source`
///
/// Edits at the same offset land in the order given.
pub fn apply_edits(source: &str, edits: &[TextEdit]) -> Result<String> {
    for edit in edits {
        if edit.offset > source.len() || !source.is_char_boundary(edit.offset) {
            return Err(CheckError::malformed(
                format!("edit offset {} is outside the source or inside a character", edit.offset),
                None,
            ));
        }
    }

    let mut ordered: Vec<&TextEdit> = edits.iter().collect();
    ordered.sort_by_key(|edit| edit.offset);

    let mut out = source.to_string();
    for edit in ordered.into_iter().rev() {
        out.insert_str(edit.offset, &edit.text);
    }
    Ok(out)
}
