use crate::config::{Config, TrailingSlash};
use crate::error::{InsertError, MatchError, MergeError};
use crate::params::Params;
use crate::pattern;
use crate::tree::Node;

use std::collections::HashMap;

/// A path router.
///
/// Routes are registered during a build phase through `&mut self` and looked
/// up afterwards through `&self`, so a built router can be shared between
/// threads (for example behind an `Arc`) and queried concurrently.
#[derive(Clone, Debug)]
pub struct Router<T> {
    root: Node<T>,
    config: Config,
}

impl<T> Default for Router<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Router<T> {
    /// Construct a new router with the default configuration.
    pub fn new() -> Self {
        Self::with_config(Config::default())
    }

    /// Construct a new router with the given configuration.
    pub fn with_config(config: Config) -> Self {
        Self {
            root: Node::new(),
            config,
        }
    }

    /// Returns the configuration of this router.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Insert a route into the router.
    ///
    /// ```rust
    /// # use wildroute::Router;
    /// # fn main() -> Result<(), Box<dyn std::error::Error>> {
    /// let mut router = Router::new();
    /// router.insert("/home", "Welcome!")?;
    /// router.insert("/users/{id}", "A User")?;
    /// router.insert("/files/{name}.{ext}", "A File")?;
    /// router.insert("/static/{path:*}", "Static")?;
    /// router.insert("/posts/{year:[0-9]{4}}", "Posts")?;
    /// # Ok(())
    /// # }
    /// ```
    ///
    /// A failed insertion leaves the router unchanged.
    pub fn insert(&mut self, route: impl Into<String>, value: T) -> Result<(), InsertError> {
        let route = route.into();

        match self.root.insert(&route, value) {
            Ok(()) => {
                trace!("registered route '{}'", route);
                Ok(())
            }
            Err(err) => {
                debug!("rejected route '{}': {}", route, err);
                Err(err)
            }
        }
    }

    /// Alias of [`Router::insert`].
    pub fn register(&mut self, route: impl Into<String>, value: T) -> Result<(), InsertError> {
        self.insert(route, value)
    }

    /// Tries to find a value in the router matching the given path.
    ///
    /// ```rust
    /// # use wildroute::Router;
    /// # fn main() -> Result<(), Box<dyn std::error::Error>> {
    /// let mut router = Router::new();
    /// router.insert("/home", "Welcome!")?;
    ///
    /// let matched = router.at("/home").unwrap();
    /// assert_eq!(*matched.value, "Welcome!");
    /// # Ok(())
    /// # }
    /// ```
    pub fn at<'path>(&self, path: &'path str) -> Result<Match<'_, 'path, &T>, MatchError> {
        if !path.starts_with('/') {
            return Err(MatchError::NotFound);
        }

        let path = match self.config.trailing_slash {
            TrailingSlash::Strip if path.len() > 1 && path.ends_with('/') => {
                trace!("stripping trailing slash from '{}'", path);
                &path[..path.len() - 1]
            }
            _ => path,
        };

        match self.root.at(path) {
            Some((value, params)) => Ok(Match { value, params }),
            None if self.config.trailing_slash == TrailingSlash::Redirect => {
                Err(self.redirect(path))
            }
            None => Err(MatchError::NotFound),
        }
    }

    // Checks whether the path with a trailing slash added or removed matches.
    fn redirect(&self, path: &str) -> MatchError {
        if path.len() > 1 && path.ends_with('/') {
            if self.root.at(&path[..path.len() - 1]).is_some() {
                return MatchError::ExtraTrailingSlash;
            }
        } else if self.root.at(&format!("{}/", path)).is_some() {
            return MatchError::MissingTrailingSlash;
        }

        MatchError::NotFound
    }

    /// Returns the value matching the given path, discarding its bindings.
    pub fn lookup(&self, path: &str) -> Option<&T> {
        self.at(path).ok().map(|matched| matched.value)
    }

    /// Returns the value matching the given path and copies every binding of
    /// the match into `bindings`.
    ///
    /// `bindings` is left untouched when nothing matches.
    ///
    /// ```rust
    /// # use std::collections::HashMap;
    /// # use wildroute::Router;
    /// # fn main() -> Result<(), Box<dyn std::error::Error>> {
    /// let mut router = Router::new();
    /// router.insert("/", 1)?;
    /// router.insert("/{a}", 2)?;
    ///
    /// let mut bindings = HashMap::new();
    /// assert_eq!(router.lookup_with_bindings("/test", &mut bindings), Some(&2));
    /// assert_eq!(bindings["a"], "test");
    /// # Ok(())
    /// # }
    /// ```
    pub fn lookup_with_bindings(
        &self,
        path: &str,
        bindings: &mut HashMap<String, String>,
    ) -> Option<&T> {
        let matched = self.at(path).ok()?;
        matched.params.extend_map(bindings);
        Some(matched.value)
    }

    /// Returns the canonical form of every registered route, in tree order.
    ///
    /// Routes are rebuilt from the tree, so they parse into the same tokens as
    /// the registered ones, though escaped braces may be written differently.
    pub fn routes(&self) -> Vec<String> {
        let mut routes = Vec::new();
        self.root.for_each(&mut |route, _| routes.push(route.to_owned()));
        routes
    }

    /// Merge a given router into the current one.
    ///
    /// Every route of `other` is inserted into `self`. Routes that fail to
    /// insert are skipped and their errors collected.
    ///
    /// ```rust
    /// # use wildroute::Router;
    /// # fn main() -> Result<(), Box<dyn std::error::Error>> {
    /// let mut root = Router::new();
    /// root.insert("/home", "Welcome!")?;
    ///
    /// let mut child = Router::new();
    /// child.insert("/users/{id}", "A User")?;
    ///
    /// root.merge(child)?;
    /// assert!(root.at("/users/1").is_ok());
    /// # Ok(())
    /// # }
    /// ```
    pub fn merge(&mut self, other: Self) -> Result<(), MergeError> {
        let mut errors = Vec::new();

        for (route, value) in other.root.into_routes() {
            if let Err(err) = self.insert(route, value) {
                errors.push(err);
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(MergeError(errors))
        }
    }
}

impl<T: Clone> Router<T> {
    /// Insert a route that may contain optional segments.
    ///
    /// A segment written `{name?}` may be omitted: the route is registered once
    /// without each optional segment (and everything after it), and once with
    /// all of them present.
    ///
    /// ```rust
    /// # use wildroute::Router;
    /// # fn main() -> Result<(), Box<dyn std::error::Error>> {
    /// let mut router = Router::new();
    /// router.insert_optional("/show/{name?}", "Show")?;
    ///
    /// assert_eq!(router.lookup("/show"), Some(&"Show"));
    /// assert_eq!(router.lookup("/show/alice"), Some(&"Show"));
    /// # Ok(())
    /// # }
    /// ```
    ///
    /// Every expanded route is checked before any of them is inserted, so a
    /// failure leaves the router unchanged.
    pub fn insert_optional(
        &mut self,
        route: impl Into<String>,
        value: T,
    ) -> Result<(), InsertError> {
        let route = route.into();
        let expanded = pattern::expand_optional(&route);

        let prepared = expanded
            .iter()
            .map(|route| self.root.prepare(route))
            .collect::<Result<Vec<_>, _>>()
            .inspect_err(|err| debug!("rejected route '{}': {}", route, err))?;

        for tokens in &prepared {
            self.root.insert_tokens(tokens, value.clone());
        }

        trace!("registered route '{}' as {:?}", route, expanded);
        Ok(())
    }
}

/// A successful match consisting of the registered value
/// and the bindings extracted from the path.
#[derive(Debug)]
pub struct Match<'k, 'v, V> {
    /// The value stored under the matched node.
    pub value: V,
    /// The bindings extracted along the matched route.
    pub params: Params<'k, 'v>,
}
