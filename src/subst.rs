//! Placeholder substitution for free-text SQL.
//!
//! A placeholder is a `:name` token. The name must be followed by a
//! non-alphanumeric character or end-of-text, so a substitution registered
//! for `var` never matches inside `:var1`. Unmatched placeholders are left
//! verbatim: callers may intentionally leave some for a later binding
//! phase.

use tracing::debug;

/// Replace every `:name` placeholder with the mapped replacement text.
///
/// Replacements are applied per mapping entry, in order. The boundary
/// check is zero-width: the character after the name is inspected but
/// never consumed, so adjacent placeholders (`:a:a`) each match.
pub fn bind_mods(sql: &str, mods: &[(&str, &str)]) -> String {
    let mut out = sql.to_string();
    for (name, replacement) in mods {
        let token = format!(":{name}");
        let mut result = String::with_capacity(out.len());
        let mut rest = out.as_str();
        while let Some(pos) = rest.find(&token) {
            let after = &rest[pos + token.len()..];
            let at_boundary = after
                .bytes()
                .next()
                .is_none_or(|b| !b.is_ascii_alphanumeric());
            result.push_str(&rest[..pos]);
            if at_boundary {
                result.push_str(replacement);
            } else {
                result.push_str(&token);
            }
            rest = after;
        }
        result.push_str(rest);
        debug!("replaced :{} by {}", name, replacement);
        out = result;
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_simple_substitution() {
        let sql = bind_mods("drop table :tbl", &[("tbl", "test2")]);
        assert_eq!(sql, "drop table test2");
    }

    #[test]
    fn test_multiple_occurrences() {
        let sql = bind_mods(
            "create table :dest as select * from :src where :col = 1",
            &[("dest", "t2"), ("src", "t1"), ("col", "col1")],
        );
        assert_eq!(sql, "create table t2 as select * from t1 where col1 = 1");
    }

    #[test]
    fn test_underscore_is_a_boundary() {
        // `_` is outside the alphanumeric class, so `:tbl` matches the
        // prefix of `:tbl_src`. Longer names must not embed shorter ones.
        let sql = bind_mods("select * from :tbl_src", &[("tbl", "t2")]);
        assert_eq!(sql, "select * from t2_src");
    }

    #[test]
    fn test_adjacent_placeholders_both_match() {
        // `:` is itself a boundary, and matching it must not consume it.
        let sql = bind_mods(":a:a", &[("a", "X")]);
        assert_eq!(sql, "XX");
    }

    #[test]
    fn test_adjacent_distinct_placeholders() {
        let sql = bind_mods(":a:b:a", &[("a", "X"), ("b", "Y")]);
        assert_eq!(sql, "XYX");
    }

    #[test]
    fn test_boundary_no_cross_matching() {
        // `var` must not be matched inside `:var1`.
        let sql = bind_mods(":var_:var1", &[("var", "A"), ("var1", "B")]);
        assert_eq!(sql, "A_B");
    }

    #[test]
    fn test_boundary_order_independent() {
        let sql = bind_mods(":var_:var1", &[("var1", "B"), ("var", "A")]);
        assert_eq!(sql, "A_B");
    }

    #[test]
    fn test_end_of_text_boundary() {
        let sql = bind_mods("select * from :tbl", &[("tbl", "test")]);
        assert_eq!(sql, "select * from test");
    }

    #[test]
    fn test_unmatched_placeholder_passes_through() {
        let sql = bind_mods("select :a, :b from t", &[("a", "x")]);
        assert_eq!(sql, "select x, :b from t");
    }

    #[test]
    fn test_line_break_is_a_boundary() {
        let sql = bind_mods("select :col\nfrom t", &[("col", "a")]);
        assert_eq!(sql, "select a\nfrom t");
    }
}
