use std::fmt;

/// Represents errors that can occur when inserting a new route.
#[non_exhaustive]
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub enum InsertError {
    /// The route is empty or does not begin with `/`.
    InvalidPath {
        /// The rejected route.
        route: String,
    },
    /// The route contains a malformed `{...}` expression.
    Syntax {
        /// The rejected route.
        route: String,
        /// What was wrong with the expression.
        error: PatternError,
    },
    /// Wildcards are only allowed as the final token of a route.
    WildcardNotAtEnd {
        /// The rejected route.
        route: String,
    },
    /// A parameter, regex or wildcard would become the sibling of an existing
    /// expression of the same kind.
    Conflict {
        /// The full route that was being inserted.
        route: String,
        /// The remaining part of the route at the conflicting position.
        path: String,
        /// The expression of the new route, in canonical form.
        conflicting: String,
        /// The already registered expression, in canonical form.
        existing: String,
    },
    /// A value is already registered for exactly this route.
    Duplicate {
        /// The route that was registered twice.
        route: String,
    },
}

impl fmt::Display for InsertError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidPath { route } => {
                write!(f, "path must begin with '/' in path '{}'", route)
            }
            Self::Syntax { route, error } => write!(f, "{} in path '{}'", error, route),
            Self::WildcardNotAtEnd { route } => write!(
                f,
                "wildcard routes are only allowed at the end of the path in path '{}'",
                route
            ),
            Self::Conflict {
                route,
                conflicting,
                existing,
                ..
            } => write!(
                f,
                "path '{}' conflicts with existing wildcard or param '{}' (new expression '{}')",
                route, existing, conflicting
            ),
            Self::Duplicate { route } => {
                write!(f, "a handler is already registered for path '{}'", route)
            }
        }
    }
}

impl std::error::Error for InsertError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Syntax { error, .. } => Some(error),
            _ => None,
        }
    }
}

impl InsertError {
    /// Returns the route that failed to insert.
    pub fn route(&self) -> &str {
        match self {
            Self::InvalidPath { route }
            | Self::Syntax { route, .. }
            | Self::WildcardNotAtEnd { route }
            | Self::Conflict { route, .. }
            | Self::Duplicate { route } => route,
        }
    }

    pub(crate) fn syntax(route: &str, error: PatternError) -> Self {
        InsertError::Syntax {
            route: route.to_owned(),
            error,
        }
    }
}

/// A malformed expression in a route pattern.
///
/// `expr` always holds the pattern text starting at the offending `{`.
#[non_exhaustive]
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub enum PatternError {
    /// `{}` or `{:...}`.
    EmptyName { expr: String },
    /// `{name:}`.
    EmptyExpression { expr: String },
    /// `{a}{b}`.
    Unseparated { expr: String },
    /// A `{` inside an expression name.
    BraceInName { expr: String },
    /// An expression without its closing `}`.
    Unterminated { expr: String },
    /// A lone `}` in literal text. Use `}}` for a literal brace.
    UnescapedBrace { expr: String },
    /// The expression after `:` is not a valid regular expression.
    InvalidRegex { expr: String, message: String },
}

impl fmt::Display for PatternError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyName { expr } => write!(
                f,
                "invalid expression '{}': wildcards must be named with a non-empty name",
                expr
            ),
            Self::EmptyExpression { expr } => write!(
                f,
                "invalid expression '{}': empty match expression not allowed",
                expr
            ),
            Self::Unseparated { expr } => write!(
                f,
                "invalid expression '{}': the expressions must be separated by at least 1 char",
                expr
            ),
            Self::BraceInName { expr } => write!(
                f,
                "invalid expression '{}': the char '{{' is not allowed in the param name",
                expr
            ),
            Self::Unterminated { expr } => {
                write!(f, "invalid expression '{}': missing closing '}}'", expr)
            }
            Self::UnescapedBrace { expr } => write!(
                f,
                "invalid expression '{}': unescaped '}}' in literal text",
                expr
            ),
            Self::InvalidRegex { expr, message } => {
                write!(f, "invalid expression '{}': {}", expr, message)
            }
        }
    }
}

impl std::error::Error for PatternError {}

/// A failed match attempt.
///
/// ```
/// use wildroute::{MatchError, Router};
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let mut router = Router::new();
/// router.insert("/home", "Welcome!")?;
/// router.insert("/blog/", "Our blog.")?;
///
/// // no routes match
/// if let Err(err) = router.at("/foobar") {
///     assert_eq!(err, MatchError::NotFound);
/// }
/// # Ok(())
/// # }
/// ```
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum MatchError {
    /// No matching route was found.
    NotFound,
    /// The path did not match, but the same path without its trailing slash does.
    ///
    /// Only reported under [`TrailingSlash::Redirect`](crate::TrailingSlash::Redirect).
    ExtraTrailingSlash,
    /// The path did not match, but the same path with a trailing slash does.
    ///
    /// Only reported under [`TrailingSlash::Redirect`](crate::TrailingSlash::Redirect).
    MissingTrailingSlash,
}

impl MatchError {
    /// Returns `true` if a trailing slash redirect is recommended.
    pub fn tsr(&self) -> bool {
        matches!(
            self,
            MatchError::ExtraTrailingSlash | MatchError::MissingTrailingSlash
        )
    }
}

impl fmt::Display for MatchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let msg = match self {
            MatchError::NotFound => "matching route not found",
            MatchError::ExtraTrailingSlash => {
                "matching route not found, but one exists without a trailing slash"
            }
            MatchError::MissingTrailingSlash => {
                "matching route not found, but one exists with a trailing slash"
            }
        };

        f.write_str(msg)
    }
}

impl std::error::Error for MatchError {}

/// Errors collected while merging two routers.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct MergeError(pub(crate) Vec<InsertError>);

impl MergeError {
    /// Returns a list of the individual insertion errors.
    pub fn into_errors(self) -> Vec<InsertError> {
        self.0
    }

    /// Returns a slice of the individual insertion errors.
    pub fn errors(&self) -> &[InsertError] {
        &self.0
    }
}

impl fmt::Display for MergeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for error in self.0.iter() {
            writeln!(f, "{}", error)?;
        }

        Ok(())
    }
}

impl std::error::Error for MergeError {}
