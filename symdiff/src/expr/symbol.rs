use std::{borrow::Borrow, fmt, sync::Arc};

/// The identity of a variable, such as `x` or `theta`.
///
/// Cloning a [`Symbol`] is cheap; the name is shared between clones. A [`Symbol`] borrows as a
/// [`str`], so maps keyed by [`Symbol`] can be queried with a plain name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Symbol(Arc<str>);

impl Symbol {
    /// Creates a symbol with the given name.
    pub fn new(name: impl AsRef<str>) -> Self {
        Self(Arc::from(name.as_ref()))
    }

    /// Returns the name of the symbol.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for Symbol {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for Symbol {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<&str> for Symbol {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl From<String> for Symbol {
    fn from(name: String) -> Self {
        Self(Arc::from(name))
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use super::*;

    #[test]
    fn lookup_by_name() {
        let map = HashMap::from([(Symbol::new("x"), 2.0)]);
        assert_eq!(map.get("x"), Some(&2.0));
        assert_eq!(map.get("y"), None);
    }
}
