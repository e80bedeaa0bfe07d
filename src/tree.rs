use crate::error::InsertError;
use crate::matcher::{Kind, Matcher};
use crate::params::Params;
use crate::pattern;

use std::cmp::Reverse;
use std::mem;

/// A node in the route tree.
///
/// A node owns one matcher and its children, kept in priority order (see
/// [`Node::sort`]). A node with a value is a terminal: a route was registered
/// ending exactly here. Nodes without one only exist because they are shared
/// by longer routes or were produced by a split.
#[derive(Clone, Debug)]
pub(crate) struct Node<T> {
    matcher: Matcher,
    children: Vec<Node<T>>,
    value: Option<T>,
}

impl<T> Node<T> {
    /// Creates an empty root, which matches the empty string.
    pub(crate) fn new() -> Self {
        Node::with_matcher(Matcher::Literal(String::new()))
    }

    fn with_matcher(matcher: Matcher) -> Self {
        Node {
            matcher,
            children: Vec::new(),
            value: None,
        }
    }

    /// Tokenizes `route` and checks it can be inserted without conflicts.
    ///
    /// Nothing is modified. A successful result can be passed to
    /// [`Node::insert_tokens`].
    pub(crate) fn prepare(&self, route: &str) -> Result<Vec<Matcher>, InsertError> {
        if !route.starts_with('/') {
            return Err(InsertError::InvalidPath {
                route: route.to_owned(),
            });
        }

        let tokens = pattern::parse(route).map_err(|err| InsertError::syntax(route, err))?;

        let wildcard = tokens.iter().position(|t| t.kind() == Kind::Wildcard);
        if matches!(wildcard, Some(i) if i + 1 != tokens.len()) {
            return Err(InsertError::WildcardNotAtEnd {
                route: route.to_owned(),
            });
        }

        self.check(route, &tokens)?;
        Ok(tokens)
    }

    /// Inserts a route into the tree.
    ///
    /// On error the tree is left untouched.
    pub(crate) fn insert(&mut self, route: &str, value: T) -> Result<(), InsertError> {
        let tokens = self.prepare(route)?;
        self.insert_tokens(&tokens, value);
        Ok(())
    }

    // Walks the tree the way `insert_tokens` would, without modifying it.
    //
    // Only the existing part of the tree can reject a route. Once the walk
    // reaches a point where `insert_tokens` would split a node or append a
    // child, everything below is new and the route is known to fit.
    fn check(&self, route: &str, tokens: &[Matcher]) -> Result<(), InsertError> {
        let mut current = self;
        let mut cursor = Cursor::new(tokens);

        while let Some(token) = cursor.peek() {
            if let Some(child) = current.children.iter().find(|c| token.is(&c.matcher)) {
                current = child;
                cursor.next_token();
                continue;
            }

            match token {
                Token::Literal(text) => match current.common_prefix(text) {
                    Some((i, common)) => {
                        let child = &current.children[i];
                        if child.matcher.literal_text().map_or(0, str::len) > common {
                            return Ok(());
                        }

                        current = child;
                        cursor.advance(common);
                    }
                    None => return Ok(()),
                },
                Token::Expr(matcher) => {
                    let existing = current
                        .children
                        .iter()
                        .find(|c| c.matcher.kind() == matcher.kind());

                    return match existing {
                        Some(existing) => Err(InsertError::Conflict {
                            route: route.to_owned(),
                            path: cursor.remaining(),
                            conflicting: matcher.to_string(),
                            existing: existing.matcher.to_string(),
                        }),
                        None => Ok(()),
                    };
                }
            }
        }

        if current.value.is_some() {
            return Err(InsertError::Duplicate {
                route: route.to_owned(),
            });
        }

        Ok(())
    }

    /// Inserts already checked tokens, then restores the priority order.
    pub(crate) fn insert_tokens(&mut self, tokens: &[Matcher], value: T) {
        let current = self.walk_mut(tokens);
        debug_assert!(current.value.is_none());
        current.value = Some(value);

        self.sort();
    }

    // Creates every node `tokens` needs and returns the terminal.
    fn walk_mut(&mut self, tokens: &[Matcher]) -> &mut Node<T> {
        let mut current = self;
        let mut cursor = Cursor::new(tokens);

        while let Some(token) = cursor.peek() {
            // an identical child, shared with another route
            if let Some(i) = current.children.iter().position(|c| token.is(&c.matcher)) {
                current = &mut current.children[i];
                cursor.next_token();
                continue;
            }

            // a literal child sharing a prefix with the token
            if let Token::Literal(text) = token {
                if let Some((i, common)) = current.common_prefix(text) {
                    current.children[i].split(common);
                    current = &mut current.children[i];
                    cursor.advance(common);
                    continue;
                }
            }

            current.children.push(Node::with_matcher(token.to_matcher()));
            let last = current.children.len() - 1;
            current = &mut current.children[last];
            cursor.next_token();
        }

        current
    }

    // Returns the literal child sharing a prefix with `text`, and the length
    // of that prefix. Literal siblings never share a first character, so there
    // is at most one.
    fn common_prefix(&self, text: &str) -> Option<(usize, usize)> {
        self.children.iter().enumerate().find_map(|(i, child)| {
            let literal = child.matcher.literal_text()?;
            let common = lcp(literal, text);
            (common > 0).then_some((i, common))
        })
    }

    // Shortens this literal node to its first `at` bytes. The rest of the
    // literal moves to a new child, which inherits the children and value.
    fn split(&mut self, at: usize) {
        let Matcher::Literal(text) = &mut self.matcher else {
            return;
        };

        if at >= text.len() {
            return;
        }

        let child = Node {
            matcher: Matcher::Literal(text.split_off(at)),
            children: mem::take(&mut self.children),
            value: self.value.take(),
        };

        self.children = vec![child];
    }

    /// Orders children so that lookup tries the most specific branch first:
    /// by matcher kind, then by number of children (more first), then by
    /// literal length (longer first).
    ///
    /// Literals of equal rank are ordered by their text. Siblings of any other
    /// kind never tie, since each kind appears at most once per node, so the
    /// order does not depend on insertion order.
    pub(crate) fn sort(&mut self) {
        for child in &mut self.children {
            child.sort();
        }

        self.children.sort_by(|a, b| {
            a.priority()
                .cmp(&b.priority())
                .then_with(|| a.matcher.literal_text().cmp(&b.matcher.literal_text()))
        });
    }

    fn priority(&self) -> (Kind, Reverse<usize>, Reverse<usize>) {
        (
            self.matcher.kind(),
            Reverse(self.children.len()),
            Reverse(self.matcher.literal_text().map_or(0, str::len)),
        )
    }

    /// Resolves `path` to the value of the best matching route.
    pub(crate) fn at<'k, 'v>(&'k self, path: &'v str) -> Option<(&'k T, Params<'k, 'v>)> {
        if !path.starts_with('/') {
            return None;
        }

        let mut params = Params::new();
        let node = self.search(path, &mut params)?;
        let value = node.value.as_ref()?;

        Some((value, params))
    }

    // Depth-first search over the sorted children, backtracking to the next
    // sibling whenever a branch fails to reach a terminal. Bindings of an
    // abandoned branch are truncated before the next sibling is tried.
    fn search<'k, 'v>(
        &'k self,
        path: &'v str,
        params: &mut Params<'k, 'v>,
    ) -> Option<&'k Node<T>> {
        for child in &self.children {
            if let Matcher::Literal(text) = &child.matcher {
                match (text.as_bytes().first(), path.as_bytes().first()) {
                    (Some(a), Some(b)) if a != b => continue,
                    _ => {}
                }
            }

            let mark = params.len();
            let Some(end) = child.matcher.matches(path, params) else {
                continue;
            };

            if let Some(found) = child.search(&path[end..], params) {
                return Some(found);
            }

            if end == path.len() && child.value.is_some() {
                return Some(child);
            }

            params.truncate(mark);
        }

        None
    }

    /// Calls `f` with the canonical route and value of every terminal.
    pub(crate) fn for_each(&self, f: &mut impl FnMut(&str, &T)) {
        let mut route = String::new();
        self.visit(&mut route, f);
    }

    fn visit(&self, route: &mut String, f: &mut impl FnMut(&str, &T)) {
        let len = route.len();
        route.push_str(&self.matcher.to_string());

        if let Some(value) = &self.value {
            f(route, value);
        }

        for child in &self.children {
            child.visit(route, f);
        }

        route.truncate(len);
    }

    /// Consumes the tree, returning every canonical route with its value.
    pub(crate) fn into_routes(self) -> Vec<(String, T)> {
        let mut routes = Vec::new();
        self.drain_into(String::new(), &mut routes);
        routes
    }

    fn drain_into(self, mut route: String, routes: &mut Vec<(String, T)>) {
        route.push_str(&self.matcher.to_string());

        if let Some(value) = self.value {
            routes.push((route.clone(), value));
        }

        for child in self.children {
            child.drain_into(route.clone(), routes);
        }
    }
}

impl<T> Default for Node<T> {
    fn default() -> Self {
        Self::new()
    }
}

// A position within a list of tokens. A literal token may be partially
// consumed after a split.
#[derive(Clone, Copy)]
struct Cursor<'t> {
    tokens: &'t [Matcher],
    offset: usize,
}

#[derive(Clone, Copy)]
enum Token<'t> {
    Literal(&'t str),
    Expr(&'t Matcher),
}

impl<'t> Cursor<'t> {
    fn new(tokens: &'t [Matcher]) -> Self {
        Cursor { tokens, offset: 0 }
    }

    fn peek(&self) -> Option<Token<'t>> {
        match self.tokens.first()? {
            Matcher::Literal(text) => Some(Token::Literal(&text[self.offset..])),
            matcher => Some(Token::Expr(matcher)),
        }
    }

    fn next_token(&mut self) {
        if let Some((_, rest)) = self.tokens.split_first() {
            self.tokens = rest;
        }
        self.offset = 0;
    }

    // Consumes `n` bytes of the current literal token.
    fn advance(&mut self, n: usize) {
        self.offset += n;

        if let Some(Matcher::Literal(text)) = self.tokens.first() {
            if self.offset >= text.len() {
                self.next_token();
            }
        }
    }

    // The unconsumed part of the route, in canonical form.
    fn remaining(&self) -> String {
        let mut remaining = String::new();

        for (i, token) in self.tokens.iter().enumerate() {
            match token {
                Matcher::Literal(text) if i == 0 => {
                    remaining.push_str(&Matcher::Literal(text[self.offset..].to_owned()).to_string())
                }
                token => remaining.push_str(&token.to_string()),
            }
        }

        remaining
    }
}

impl<'t> Token<'t> {
    fn is(&self, matcher: &Matcher) -> bool {
        match (self, matcher) {
            (Token::Literal(text), Matcher::Literal(other)) => text == other,
            (Token::Expr(expr), matcher) => *expr == matcher,
            _ => false,
        }
    }

    fn to_matcher(self) -> Matcher {
        match self {
            Token::Literal(text) => Matcher::Literal(text.to_owned()),
            Token::Expr(matcher) => matcher.clone(),
        }
    }
}

// Length in bytes of the longest common prefix, never splitting a character.
fn lcp(a: &str, b: &str) -> usize {
    a.char_indices()
        .zip(b.chars())
        .find(|((_, x), y)| x != y)
        .map_or_else(|| a.len().min(b.len()), |((i, _), _)| i)
}
