//! Lexical scopes of blocks, held in an arena addressed by index.
use std::fmt;

/// Handle to a scope in a `Scopes` arena
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ScopeId(usize);

impl ScopeId {
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for ScopeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// All scopes known for a tree.
///
/// Scope 0 is the root (the script's top level). Every other scope
/// has a parent, which is the scope of the block in which it was
/// opened.
pub struct Scopes {
    parents: Vec<Option<ScopeId>>,
}

impl Default for Scopes {
    fn default() -> Self {
        Scopes {
            parents: vec![None],
        }
    }
}

impl Scopes {
    pub fn new() -> Self {
        Scopes::default()
    }

    /// The top level scope
    pub fn root(&self) -> ScopeId {
        ScopeId(0)
    }

    /// Open a new scope nested inside `parent`
    pub fn child(&mut self, parent: ScopeId) -> ScopeId {
        let id = ScopeId(self.parents.len());
        self.parents.push(Some(parent));
        id
    }

    /// The enclosing scope, `None` for the root or unknown scopes
    pub fn parent(&self, scope: ScopeId) -> Option<ScopeId> {
        self.parents.get(scope.0).copied().flatten()
    }

    /// Iterate from `scope` outwards to the root
    pub fn chain(&self, scope: ScopeId) -> impl Iterator<Item = ScopeId> + '_ {
        std::iter::successors(Some(scope), move |s| self.parent(*s))
    }

    /// True if `inner` is `outer` or nested (at any depth) within it
    pub fn is_within(&self, inner: ScopeId, outer: ScopeId) -> bool {
        self.chain(inner).any(|s| s == outer)
    }

    pub fn len(&self) -> usize {
        self.parents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.parents.is_empty()
    }
}

#[cfg(test)]
pub mod tests {
    use super::*;

    #[test]
    pub fn test_chain_to_root() {
        let mut scopes = Scopes::new();
        let root = scopes.root();
        let a = scopes.child(root);
        let b = scopes.child(a);
        let c = scopes.child(root);

        assert_eq!(scopes.chain(b).collect::<Vec<_>>(), vec![b, a, root]);
        assert!(scopes.is_within(b, a));
        assert!(!scopes.is_within(c, a));
        assert_eq!(scopes.parent(root), None);
        assert_eq!(scopes.len(), 4);
    }
}
