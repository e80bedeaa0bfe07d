//! Route pattern parsing.
//!
//! A route is literal text interspersed with bracketed expressions:
//!
//! ```text
//!  Syntax          Matcher
//!  {name}          parameter, up to the next '/' or the literal that follows it
//!  {name:*}        wildcard, the rest of the path (must be last)
//!  {name:regex}    the longest run at the current position matching regex
//!  {{ and }}       a literal '{' or '}'
//! ```
use crate::error::PatternError;
use crate::matcher::Matcher;

/// Splits a route into its tokens, left to right.
///
/// The whole route is validated before anything is returned, so a route that
/// fails to parse never reaches the tree.
pub(crate) fn parse(route: &str) -> Result<Vec<Matcher>, PatternError> {
    let mut tokens = Vec::new();
    let mut i = 0;

    while i < route.len() {
        let (literal, end) = literal(route, i, false)?;
        if !literal.is_empty() {
            tokens.push(Matcher::Literal(literal));
        }

        i = end;
        if i < route.len() {
            let (matcher, end) = expression(route, i)?;
            tokens.push(matcher);
            i = end;
        }
    }

    Ok(tokens)
}

// Reads literal text starting at `start`, unescaping '{{' and '}}'. Stops at
// the next unescaped '{', and at the next '/' if `segment` is set.
fn literal(route: &str, start: usize, segment: bool) -> Result<(String, usize), PatternError> {
    let bytes = route.as_bytes();
    let mut text = String::new();
    let mut run = start;
    let mut i = start;

    while let Some(&c) = bytes.get(i) {
        match c {
            b'/' if segment => break,
            b'{' | b'}' if bytes.get(i + 1) == Some(&c) => {
                text.push_str(&route[run..=i]);
                i += 2;
                run = i;
            }
            b'{' => break,
            b'}' => {
                return Err(PatternError::UnescapedBrace {
                    expr: route[i..].to_owned(),
                })
            }
            _ => i += 1,
        }
    }

    text.push_str(&route[run..i]);
    Ok((text, i))
}

// Parses the expression opening at `start`, returning the matcher and the
// offset right after everything it consumed.
fn expression(route: &str, start: usize) -> Result<(Matcher, usize), PatternError> {
    let bytes = route.as_bytes();
    let expr = || route[start..].to_owned();

    let mut colon = None;
    let mut depth = 0;
    let mut close = None;
    let mut i = start + 1;

    while let Some(&c) = bytes.get(i) {
        match c {
            b':' if colon.is_none() => colon = Some(i),
            b'{' if colon.is_none() => return Err(PatternError::BraceInName { expr: expr() }),
            b'\\' if colon.is_some() => i += 1,
            b'{' => depth += 1,
            b'}' if depth > 0 => depth -= 1,
            b'}' => {
                close = Some(i);
                break;
            }
            _ => {}
        }

        i += 1;
    }

    let close = close.ok_or_else(|| PatternError::Unterminated { expr: expr() })?;
    let name = &route[start + 1..colon.unwrap_or(close)];
    if name.is_empty() {
        return Err(PatternError::EmptyName { expr: expr() });
    }

    let end = close + 1;
    if bytes.get(end) == Some(&b'{') && bytes.get(end + 1) != Some(&b'{') {
        return Err(PatternError::Unseparated { expr: expr() });
    }

    let name = name.to_owned();
    match colon.map(|colon| &route[colon + 1..close]) {
        None => {
            let (terminator, end) = literal(route, end, true)?;
            Ok((Matcher::Param { name, terminator }, end))
        }
        Some("") => Err(PatternError::EmptyExpression { expr: expr() }),
        Some("*") => Ok((Matcher::Wildcard(name), end)),
        Some(regex) => {
            let matcher = Matcher::regex(name, regex.to_owned()).map_err(|err| {
                PatternError::InvalidRegex {
                    expr: expr(),
                    message: err.to_string(),
                }
            })?;

            Ok((matcher, end))
        }
    }
}

/// Expands every whole-segment `{name?}` into the concrete routes it stands
/// for.
///
/// Each optional segment contributes the route up to (but excluding) it, and
/// the route with every optional segment present is added last:
/// `/a/{b?}/c/{d?}` becomes `/a`, `/a/{b}/c` and `/a/{b}/c/{d}`. Routes
/// without optional segments are returned unchanged.
pub(crate) fn expand_optional(route: &str) -> Vec<String> {
    let mut routes = Vec::new();
    let mut current = String::with_capacity(route.len());

    for (i, segment) in route.split('/').enumerate() {
        if i > 0 {
            if let Some(name) = optional_name(segment) {
                let prefix = if current.is_empty() { "/" } else { current.as_str() };
                routes.push(prefix.to_owned());

                current.push_str("/{");
                current.push_str(name);
                current.push('}');
                continue;
            }

            current.push('/');
        }

        current.push_str(segment);
    }

    if routes.is_empty() {
        return vec![route.to_owned()];
    }

    routes.push(current);
    routes.dedup();
    routes
}

fn optional_name(segment: &str) -> Option<&str> {
    let name = segment.strip_prefix('{')?.strip_suffix("?}")?;

    if name.is_empty() || name.contains(['{', '}', ':']) {
        return None;
    }

    Some(name)
}
