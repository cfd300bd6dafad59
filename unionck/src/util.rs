//! Shared utility functions

// ============================================================================
// Name suggestions
// ============================================================================

/// Levenshtein edit distance between two strings, over chars.
/// Keeps a single row of the DP table.
pub fn levenshtein_distance(a: &str, b: &str) -> usize {
    let b_chars: Vec<char> = b.chars().collect();
    let mut row: Vec<usize> = (0..=b_chars.len()).collect();

    for (i, ca) in a.chars().enumerate() {
        let mut diagonal = row[0];
        row[0] = i + 1;
        for (j, &cb) in b_chars.iter().enumerate() {
            let above = row[j + 1];
            let substitution = diagonal + usize::from(ca != cb);
            row[j + 1] = substitution.min(above + 1).min(row[j] + 1);
            diagonal = above;
        }
    }

    row[b_chars.len()]
}

/// Closest candidate within `threshold` edits. Ties keep the earliest candidate.
pub fn find_similar_name<'a>(
    name: &str,
    candidates: &[&'a str],
    threshold: usize,
) -> Option<&'a str> {
    candidates
        .iter()
        .map(|&candidate| (levenshtein_distance(name, candidate), candidate))
        .filter(|&(distance, _)| distance <= threshold)
        .min_by_key(|&(distance, _)| distance)
        .map(|(_, candidate)| candidate)
}

/// Format a "did you mean" suffix for an unknown name.
pub fn format_suggestion_hint(suggestion: Option<&str>) -> String {
    match suggestion {
        Some(name) => format!(" (did you mean `{name}`?)"),
        None => String::new(),
    }
}

// ============================================================================
// Binding names
// ============================================================================

/// Convert a type name to lowerCamelCase for use as a binding.
/// `NotFound` -> `notFound`, `HTTPError` -> `httpError`, `Int32` -> `int32`
pub fn to_lower_camel_case(name: &str) -> String {
    let chars: Vec<char> = name.chars().collect();
    let leading_upper = chars.iter().take_while(|c| c.is_uppercase()).count();

    // In an acronym run followed by a lowercase word, the last capital
    // starts that word: `HTTPError` lowercases `HTTP`, keeps `E`.
    let lower_until = if leading_upper > 1
        && chars
            .get(leading_upper)
            .is_some_and(|c| c.is_lowercase())
    {
        leading_upper - 1
    } else {
        leading_upper
    };

    chars
        .iter()
        .enumerate()
        .flat_map(|(i, c)| {
            if i < lower_until {
                c.to_lowercase().collect::<Vec<_>>()
            } else {
                vec![*c]
            }
        })
        .collect()
}

/// Whether `name` can be used verbatim as an identifier
/// Keywords that cannot name a binding in a match arm
const RESERVED_WORDS: &[&str] = &[
    "abstract", "as", "base", "bool", "break", "byte", "case", "catch", "char", "checked",
    "class", "const", "continue", "decimal", "default", "delegate", "do", "double", "else",
    "enum", "event", "explicit", "extern", "false", "finally", "fixed", "float", "for",
    "foreach", "goto", "if", "implicit", "in", "int", "interface", "internal", "is", "lock",
    "long", "namespace", "new", "null", "object", "operator", "out", "override", "params",
    "private", "protected", "public", "readonly", "ref", "return", "sbyte", "sealed", "short",
    "sizeof", "stackalloc", "static", "string", "struct", "switch", "this", "throw", "true",
    "try", "typeof", "uint", "ulong", "unchecked", "unsafe", "ushort", "using", "virtual",
    "void", "volatile", "while",
];

pub fn is_reserved_word(name: &str) -> bool {
    RESERVED_WORDS.contains(&name)
}

pub fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_alphabetic() || c == '_' => {
            chars.all(|c| c.is_alphanumeric() || c == '_')
        }
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_levenshtein_identical() {
        assert_eq!(levenshtein_distance("OneOf", "OneOf"), 0);
    }

    #[test]
    fn test_levenshtein_edits() {
        assert_eq!(levenshtein_distance("kitten", "sitting"), 3);
        assert_eq!(levenshtein_distance("SaveResult", "SaveResul"), 1);
        assert_eq!(levenshtein_distance("Hello", "hello"), 1);
    }

    #[test]
    fn test_levenshtein_empty_strings() {
        assert_eq!(levenshtein_distance("", ""), 0);
        assert_eq!(levenshtein_distance("abc", ""), 3);
        assert_eq!(levenshtein_distance("", "abc"), 3);
    }

    #[test]
    fn test_find_similar_name() {
        let candidates = ["SaveResult", "LoadResult", "Error"];
        assert_eq!(find_similar_name("SaveResul", &candidates, 2), Some("SaveResult"));
        assert_eq!(find_similar_name("Unrelated", &candidates, 2), None);
    }

    #[test]
    fn test_find_similar_name_prefers_closest() {
        let candidates = ["Load", "Loads"];
        assert_eq!(find_similar_name("Loads", &candidates, 2), Some("Loads"));
    }

    #[test]
    fn test_format_suggestion_hint() {
        assert_eq!(
            format_suggestion_hint(Some("SaveResult")),
            " (did you mean `SaveResult`?)"
        );
        assert_eq!(format_suggestion_hint(None), "");
    }

    #[test]
    fn test_to_lower_camel_case() {
        assert_eq!(to_lower_camel_case("NotFound"), "notFound");
        assert_eq!(to_lower_camel_case("HTTPError"), "httpError");
        assert_eq!(to_lower_camel_case("Int32"), "int32");
        assert_eq!(to_lower_camel_case("IO"), "io");
        assert_eq!(to_lower_camel_case("string"), "string");
        assert_eq!(to_lower_camel_case(""), "");
    }

    #[test]
    fn test_is_identifier() {
        assert!(is_identifier("notFound"));
        assert!(is_identifier("_x1"));
        assert!(!is_identifier("1x"));
        assert!(!is_identifier("a-b"));
        assert!(!is_identifier(""));
    }

    #[test]
    fn test_is_reserved_word() {
        assert!(is_reserved_word("int"));
        assert!(is_reserved_word("string"));
        assert!(is_reserved_word("bool"));
        assert!(!is_reserved_word("int32"));
        assert!(!is_reserved_word("notFound"));
    }
}
