use crate::expr::Symbol;
use levenshtein::levenshtein;
use std::collections::HashMap;

/// A context to use when evaluating an expression, containing the values bound to variables.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Ctxt {
    /// The variables in the context.
    vars: HashMap<Symbol, f64>,
}

impl Ctxt {
    /// Creates a new empty context.
    pub fn new() -> Ctxt {
        Ctxt::default()
    }

    /// Add a variable to the context.
    pub fn add_var(&mut self, name: &str, value: f64) {
        self.vars.insert(Symbol::new(name), value);
    }

    /// Add a variable to the context, returning the context.
    pub fn with_var(mut self, name: &str, value: f64) -> Self {
        self.add_var(name, value);
        self
    }

    /// Get the value of a variable in the context.
    pub fn get_var(&self, name: &str) -> Option<f64> {
        self.vars.get(name).copied()
    }

    /// Returns the variables in the context.
    pub fn get_vars(&self) -> &HashMap<Symbol, f64> {
        &self.vars
    }

    /// Returns all variables in the context with a name similar to the given name.
    pub fn get_similar_vars(&self, name: &str) -> Vec<&str> {
        let mut similar = self.vars
            .keys()
            .map(Symbol::as_str)
            .filter(|n| levenshtein(n, name) < 2)
            .collect::<Vec<_>>();
        similar.sort_unstable();
        similar
    }
}
