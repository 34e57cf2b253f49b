use edgepanel_core::query::{VariableFlags, VariableValue};
use itertools::Itertools;

use crate::{escape_literal, quote_literal};

/// Formats a variable value for substitution into query text.
///
/// Single-valued variables are escaped but left unquoted. Variables which
/// are multi-valued or offer "all" render as quoted literals, a list of
/// values becoming a comma separated sequence of literals without any
/// enclosing brackets. Numbers are always substituted as-is.
///
/// Values of any other shape are treated as a sequence of their items,
/// `null` being an empty sequence.
pub fn interpolate(value: &VariableValue, flags: VariableFlags) -> String {
    match value {
        VariableValue::Number(n) => n.to_string(),
        _ if !flags.is_multi_valued() => escape_literal(value),
        VariableValue::Text(s) => quote_literal(s),
        VariableValue::List(items) => items.iter().map(|i| quote_literal(i)).join(","),
        VariableValue::Other(v) => VariableValue::other_items(v)
            .iter()
            .map(|i| quote_literal(i))
            .join(","),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_interpolate_single_text_unquoted() {
        assert_eq!(
            interpolate(&"foo".into(), VariableFlags::single()),
            "foo"
        );
        assert_eq!(
            interpolate(&"b's".into(), VariableFlags::single()),
            "b''s"
        );
    }

    #[test]
    fn test_interpolate_multi_text_quoted() {
        assert_eq!(
            interpolate(&"foo".into(), VariableFlags::multi()),
            "'foo'"
        );
    }

    #[test]
    fn test_interpolate_include_all_text_quoted() {
        assert_eq!(
            interpolate(&"foo".into(), VariableFlags::new(false, true)),
            "'foo'"
        );
    }

    #[test]
    fn test_interpolate_multi_list() {
        assert_eq!(
            interpolate(&vec!["a", "b's"].into(), VariableFlags::multi()),
            "'a','b''s'"
        );
        assert_eq!(
            interpolate(&vec!["east", "west"].into(), VariableFlags::new(true, true)),
            "'east','west'"
        );
    }

    #[test]
    fn test_interpolate_empty_list() {
        assert_eq!(
            interpolate(&VariableValue::List(vec![]), VariableFlags::multi()),
            ""
        );
    }

    #[test]
    fn test_interpolate_single_list_is_escaped_and_joined() {
        assert_eq!(
            interpolate(&vec!["a", "b's"].into(), VariableFlags::single()),
            "a,b''s"
        );
    }

    #[test]
    fn test_interpolate_other_shapes() {
        let null = VariableValue::Other(serde_json::Value::Null);
        let flag = VariableValue::Other(serde_json::json!(true));
        let mixed = VariableValue::Other(serde_json::json!(["a's", 1, false]));

        assert_eq!(interpolate(&null, VariableFlags::single()), "");
        assert_eq!(interpolate(&null, VariableFlags::multi()), "");
        assert_eq!(interpolate(&flag, VariableFlags::single()), "true");
        assert_eq!(interpolate(&flag, VariableFlags::multi()), "'true'");
        assert_eq!(interpolate(&mixed, VariableFlags::single()), "a''s,1,false");
        assert_eq!(
            interpolate(&mixed, VariableFlags::new(true, true)),
            "'a''s','1','false'"
        );
    }

    #[test]
    fn test_interpolate_numbers_never_quoted() {
        for flags in [
            VariableFlags::single(),
            VariableFlags::multi(),
            VariableFlags::new(false, true),
            VariableFlags::new(true, true),
        ] {
            assert_eq!(interpolate(&42i64.into(), flags), "42");
        }

        let float = VariableValue::Number(serde_json::Number::from_f64(2.5).unwrap());
        assert_eq!(interpolate(&float, VariableFlags::multi()), "2.5");
    }
}
