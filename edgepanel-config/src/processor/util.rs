use edgepanel_core::err::{bail, Result};
use serde_yaml::Value;

use super::ConfigStringExpr as X;

/// Recursively walks the configuration nodes, replacing every string value
/// with the result of the callback. Mapping keys are left as-is.
pub(crate) fn process_strings(node: &mut Value, cb: &impl Fn(&str) -> Result<String>) -> Result<()> {
    match node {
        Value::String(str) => *str = cb(str)?,
        Value::Sequence(seq) => {
            for item in seq.iter_mut() {
                process_strings(item, cb)?;
            }
        }
        Value::Mapping(map) => {
            for (_, val) in map.iter_mut() {
                process_strings(val, cb)?;
            }
        }
        Value::Tagged(tagged) => process_strings(&mut tagged.value, cb)?,
        _ => {}
    }

    Ok(())
}

/// Parse strings into an expression AST
pub(crate) fn parse_expression(str: &str) -> Result<X> {
    let chars = str.chars().collect::<Vec<char>>();
    let mut pos = 0;

    let parts = parse_parts(&chars, &mut pos, false)?;

    if pos < chars.len() {
        bail!("Failed to parse expression \"{}\", unexpected '{}'", str, chars[pos]);
    }

    Ok(simplify(X::Concat(parts)))
}

/// Parses constants and nested interpolations until the end of input or,
/// when inside an interpolation, until an unescaped ':' or '}'
fn parse_parts(chars: &[char], pos: &mut usize, nested: bool) -> Result<Vec<X>> {
    let mut parts = vec![];
    let mut constant = String::new();

    while *pos < chars.len() {
        match (chars[*pos], chars.get(*pos + 1)) {
            ('\\', next) => {
                if let Some(c) = next {
                    constant.push(*c);
                }
                *pos += 2;
            }
            ('$', Some('{')) => {
                *pos += 2;
                if !constant.is_empty() {
                    parts.push(X::Constant(std::mem::take(&mut constant)));
                }
                parts.push(parse_interpolation(chars, pos)?);
            }
            (':' | '}', _) if nested => break,
            (c, _) => {
                constant.push(c);
                *pos += 1;
            }
        }
    }

    if !constant.is_empty() {
        parts.push(X::Constant(constant));
    }

    Ok(parts)
}

/// Parses the inside of a `${...}` expression, the opening `${` already consumed
fn parse_interpolation(chars: &[char], pos: &mut usize) -> Result<X> {
    let mut parts = vec![];

    loop {
        let part = parse_parts(chars, pos, true)?;
        parts.push(simplify(X::Concat(part)));

        match chars.get(*pos) {
            Some(':') => *pos += 1,
            Some('}') => {
                *pos += 1;
                break;
            }
            _ => bail!(
                "Failed to parse expression \"{}\", found unclosed ${{...}}",
                chars.iter().collect::<String>()
            ),
        }
    }

    // ${} has no parts at all
    if parts == [X::Constant(String::new())] {
        parts.clear();
    }

    Ok(X::Interpolation(parts))
}

/// Collapses empty and single-element concatenations
fn simplify(exp: X) -> X {
    match exp {
        X::Concat(parts) if parts.is_empty() => X::Constant(String::new()),
        X::Concat(mut parts) if parts.len() == 1 => simplify(parts.remove(0)),
        X::Concat(parts) => X::Concat(parts.into_iter().map(simplify).collect()),
        X::Interpolation(parts) => X::Interpolation(parts.into_iter().map(simplify).collect()),
        c @ X::Constant(_) => c,
    }
}

/// Resolves nested expressions first, then passes each interpolation
/// to the callback
pub(crate) fn process_expression(exp: X, cb: &impl Fn(X) -> Result<X>) -> Result<X> {
    Ok(match exp {
        c @ X::Constant(_) => c,
        X::Concat(parts) => simplify(X::Concat(
            parts
                .into_iter()
                .map(|p| process_expression(p, cb))
                .collect::<Result<Vec<_>>>()?,
        )),
        X::Interpolation(parts) => cb(X::Interpolation(
            parts
                .into_iter()
                .map(|p| process_expression(p, cb))
                .collect::<Result<Vec<_>>>()?,
        ))?,
    })
}

/// Converts the expression back to a string, unresolved interpolations
/// are written back in their `${...}` form
pub(crate) fn expression_to_string(exp: &X) -> String {
    match exp {
        X::Constant(s) => s.clone(),
        X::Concat(parts) => parts.iter().map(expression_to_string).collect(),
        X::Interpolation(parts) => format!(
            "${{{}}}",
            parts
                .iter()
                .map(expression_to_string)
                .collect::<Vec<_>>()
                .join(":")
        ),
    }
}

/// Returns the parts of the interpolation if it is fully resolved and its
/// first part matches one of the supplied prefixes
pub(crate) fn match_interpolation(exp: &X, prefixes: &[&str]) -> Option<Vec<String>> {
    let parts = match exp {
        X::Interpolation(parts) => parts,
        _ => return None,
    };

    let parts = parts
        .iter()
        .map(|p| match p {
            X::Constant(s) => Some(s.clone()),
            _ => None,
        })
        .collect::<Option<Vec<_>>>()?;

    match parts.first() {
        Some(first) if prefixes.iter().any(|p| p.eq_ignore_ascii_case(first)) => Some(parts),
        _ => None,
    }
}
