/// How a [`Router`](crate::Router) treats a trailing `/` in a looked up path.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum TrailingSlash {
    /// Strip exactly one trailing slash from paths longer than `/` before
    /// matching, so `/users/` resolves like `/users`.
    #[default]
    Strip,
    /// Match the path as given. If that fails but the path with a trailing slash
    /// added or removed would match, report
    /// [`MatchError::MissingTrailingSlash`](crate::MatchError::MissingTrailingSlash) or
    /// [`MatchError::ExtraTrailingSlash`](crate::MatchError::ExtraTrailingSlash)
    /// so the caller can redirect.
    Redirect,
    /// Match the path as given.
    Strict,
}

/// Router configuration.
///
/// ```rust
/// use wildroute::{Config, Router, TrailingSlash};
///
/// let router: Router<()> = Router::with_config(Config {
///     trailing_slash: TrailingSlash::Redirect,
/// });
/// assert_eq!(router.config().trailing_slash, TrailingSlash::Redirect);
///
/// let config = Config::default().trailing_slash(TrailingSlash::Strict);
/// assert_eq!(config.trailing_slash, TrailingSlash::Strict);
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Config {
    /// The trailing slash policy applied by lookups. Defaults to
    /// [`TrailingSlash::Strip`].
    pub trailing_slash: TrailingSlash,
}

impl Config {
    /// Sets the trailing slash policy.
    pub fn trailing_slash(mut self, policy: TrailingSlash) -> Self {
        self.trailing_slash = policy;
        self
    }
}
