//! A path router built on a radix tree, with parameter, regex and wildcard
//! segments.
//!
//! ```rust
//! use wildroute::Router;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let mut router = Router::new();
//! router.insert("/home", "Welcome!")?;
//! router.insert("/users/{id}", "A User")?;
//!
//! let matched = router.at("/users/978")?;
//! assert_eq!(matched.params.get("id"), Some("978"));
//! assert_eq!(*matched.value, "A User");
//! # Ok(())
//! # }
//! ```
//!
//! # Routing
//!
//! Routes are literal text interspersed with bracketed expressions:
//!
//! ```text
//!  Syntax          Type
//!  {name}          parameter
//!  {name:*}        wildcard
//!  {name:regex}    regex
//! ```
//!
//! Parameters match a non-empty run of text up to the next `/`. When literal
//! text follows the closing bracket in the same segment, the parameter stops at
//! the first occurrence of that text instead:
//!
//! ```text
//!  Route: /user_{name}.json
//!
//!  /user_rust.json      match: name="rust"
//!  /user_rust           no match
//!  /user_.json          no match
//! ```
//!
//! Wildcards match anything until the end of the path, including nothing at
//! all, and must be the last token of a route:
//!
//! ```text
//!  Route: /src/{filepath:*}
//!
//!  /src/                  match: filepath=""
//!  /src/some/file.png     match: filepath="some/file.png"
//! ```
//!
//! Regex expressions match the longest run at the current position that the
//! whole expression accepts. Named capture groups inside the expression produce
//! additional bindings:
//!
//! ```text
//!  Route: /regex/{c2:(?<named>extra)_alt}/{rest:*}
//!
//!  /regex/extra_alt/hello    match: c2="extra_alt", named="extra", rest="hello"
//! ```
//!
//! Literal `{` and `}` characters are written `{{` and `}}`.
//!
//! # Priority
//!
//! Several routes may match the same path. Literal text is tried first, then
//! parameters, then regexes, then wildcards; if a branch fails further down, the
//! router backtracks and tries the next candidate. The first route found this
//! way wins:
//!
//! ```rust
//! # use wildroute::Router;
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let mut router = Router::new();
//! router.insert("/sub/test", "literal")?;
//! router.insert("/sub/{a}", "param")?;
//! router.insert("/{anything:*}", "wildcard")?;
//!
//! assert_eq!(router.lookup("/sub/test"), Some(&"literal"));
//! assert_eq!(router.lookup("/sub/other"), Some(&"param"));
//! assert_eq!(router.lookup("/sub/other/more"), Some(&"wildcard"));
//! assert_eq!(router.lookup("/"), Some(&"wildcard"));
//! # Ok(())
//! # }
//! ```
//!
//! Two different expressions of the same kind can not share a position, and a
//! route can only be registered once. Both are reported as an [`InsertError`]
//! and leave the router unchanged.
#![deny(clippy::all)]
#![forbid(unsafe_code)]

#[macro_use]
extern crate log;

mod config;
mod error;
mod matcher;
mod params;
mod pattern;
mod router;
mod tree;

pub use config::{Config, TrailingSlash};
pub use error::{InsertError, MatchError, MergeError, PatternError};
pub use params::{Params, ParamsIter};
pub use router::{Match, Router};
