use crate::params::Params;

use std::fmt;

use regex::Regex;

/// The four ways a tree node can consume part of a path.
///
/// Kinds are ordered by how specific they are, which decides both sibling
/// conflicts and the order in which lookup tries children.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub(crate) enum Kind {
    Literal,
    Param,
    Regex,
    Wildcard,
}

/// A parsed route token.
#[derive(Clone, Debug)]
pub(crate) enum Matcher {
    /// Matches exactly this text.
    Literal(String),
    /// Matches a non-empty run up to the next `/`, or up to the first
    /// occurrence of `terminator` within the segment.
    Param { name: String, terminator: String },
    /// Matches the longest run at the current position that `expr` matches
    /// in full.
    Regex {
        name: String,
        expr: String,
        // `expr` anchored at the start, to reject paths cheaply
        prefix: Regex,
        // `expr` anchored at both ends
        full: Regex,
    },
    /// Matches the remainder of the path, including nothing at all.
    Wildcard(String),
}

impl Matcher {
    pub(crate) fn kind(&self) -> Kind {
        match self {
            Matcher::Literal(_) => Kind::Literal,
            Matcher::Param { .. } => Kind::Param,
            Matcher::Regex { .. } => Kind::Regex,
            Matcher::Wildcard(_) => Kind::Wildcard,
        }
    }

    pub(crate) fn regex(name: String, expr: String) -> Result<Matcher, regex::Error> {
        let prefix = Regex::new(&format!("^(?:{})", expr))?;
        let full = Regex::new(&format!("^(?:{})$", expr))?;

        Ok(Matcher::Regex {
            name,
            expr,
            prefix,
            full,
        })
    }

    pub(crate) fn literal_text(&self) -> Option<&str> {
        match self {
            Matcher::Literal(text) => Some(text),
            _ => None,
        }
    }

    /// Attempts to match the start of `path`, returning the number of bytes
    /// consumed.
    ///
    /// Bindings are pushed onto `params` only when the match succeeds.
    pub(crate) fn matches<'k, 'v>(
        &'k self,
        path: &'v str,
        params: &mut Params<'k, 'v>,
    ) -> Option<usize> {
        match self {
            Matcher::Literal(text) => path.starts_with(text.as_str()).then_some(text.len()),
            Matcher::Param { name, terminator } => {
                let segment = path.find('/').unwrap_or(path.len());

                let (end, consumed) = if terminator.is_empty() {
                    (segment, segment)
                } else {
                    let end = path[..segment].find(terminator.as_str())?;
                    (end, end + terminator.len())
                };

                if end == 0 {
                    return None;
                }

                params.push(name, &path[..end]);
                Some(consumed)
            }
            Matcher::Regex {
                name, prefix, full, ..
            } => {
                if !prefix.is_match(path) {
                    return None;
                }

                // leftmost-first semantics would stop at the first alternative
                // or lazy repetition, so try every non-empty prefix, longest first
                let (end, captures) = path
                    .char_indices()
                    .map(|(i, c)| i + c.len_utf8())
                    .rev()
                    .find_map(|end| Some((end, full.captures(&path[..end])?)))?;

                params.push(name, &path[..end]);
                for (i, group) in full.capture_names().enumerate() {
                    if let (Some(group), Some(value)) = (group, captures.get(i)) {
                        params.push(group, value.as_str());
                    }
                }

                Some(end)
            }
            Matcher::Wildcard(name) => {
                params.push(name, path);
                Some(path.len())
            }
        }
    }
}

/// Structural equality: same kind and same parameters.
impl PartialEq for Matcher {
    fn eq(&self, other: &Matcher) -> bool {
        match (self, other) {
            (Matcher::Literal(a), Matcher::Literal(b)) => a == b,
            (
                Matcher::Param {
                    name: a,
                    terminator: ta,
                },
                Matcher::Param {
                    name: b,
                    terminator: tb,
                },
            ) => a == b && ta == tb,
            (
                Matcher::Regex {
                    name: a, expr: ea, ..
                },
                Matcher::Regex {
                    name: b, expr: eb, ..
                },
            ) => a == b && ea == eb,
            (Matcher::Wildcard(a), Matcher::Wildcard(b)) => a == b,
            _ => false,
        }
    }
}

impl Eq for Matcher {}

/// The canonical form, which parses back into an equal matcher.
impl fmt::Display for Matcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Matcher::Literal(text) => write_escaped(f, text),
            Matcher::Param { name, terminator } => {
                write!(f, "{{{}}}", name)?;
                write_escaped(f, terminator)
            }
            Matcher::Regex { name, expr, .. } => write!(f, "{{{}:{}}}", name, expr),
            Matcher::Wildcard(name) => write!(f, "{{{}:*}}", name),
        }
    }
}

fn write_escaped(f: &mut fmt::Formatter<'_>, text: &str) -> fmt::Result {
    for c in text.chars() {
        match c {
            '{' => f.write_str("{{")?,
            '}' => f.write_str("}}")?,
            c => fmt::Write::write_char(f, c)?,
        }
    }

    Ok(())
}
