use std::fmt::Display;

/// Escapes the value for use inside a single-quoted literal by doubling
/// every single quote. The result is not wrapped in quotes.
pub fn escape_literal(value: impl Display) -> String {
    value.to_string().replace('\'', "''")
}

/// Escapes the value and wraps it in single quotes
pub fn quote_literal(value: impl Display) -> String {
    format!("'{}'", escape_literal(value))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_literal_without_quotes_is_identity() {
        for s in ["", "abc", "east", "a b\tc", "\"double\"", "back\\slash", "ünïcødé"] {
            assert_eq!(escape_literal(s), s);
        }
    }

    #[test]
    fn test_escape_literal_doubles_quotes() {
        assert_eq!(escape_literal("b's"), "b''s");
        assert_eq!(escape_literal("'"), "''");
        assert_eq!(escape_literal("''"), "''''");
        assert_eq!(escape_literal("it's a 'test'"), "it''s a ''test''");
    }

    #[test]
    fn test_escape_literal_leaves_no_lone_quote() {
        for s in ["'", "a'b'c", "'''", "x'"] {
            let escaped = escape_literal(s);
            let stripped = escaped.replace("''", "");

            assert!(!stripped.contains('\''), "lone quote in {}", escaped);
            assert_eq!(
                escaped.matches('\'').count(),
                s.matches('\'').count() * 2
            );
        }
    }

    #[test]
    fn test_escape_literal_accepts_numbers() {
        assert_eq!(escape_literal(42), "42");
        assert_eq!(escape_literal(1.5), "1.5");
    }

    #[test]
    fn test_quote_literal_wraps_escaped() {
        for s in ["", "foo", "b's", "'"] {
            assert_eq!(quote_literal(s), format!("'{}'", escape_literal(s)));
        }

        assert_eq!(quote_literal("b's"), "'b''s'");
    }
}
