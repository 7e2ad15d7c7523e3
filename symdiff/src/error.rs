//! Error kinds raised by the expression engine.
//!
//! Both kinds are contract violations on the caller's side, so neither is ever retried or
//! replaced with a default value; they are returned to the caller as-is inside a
//! [`symdiff_error::Error`].

use ariadne::Fmt;
use symdiff_attrs::ErrorKind;
use symdiff_error::{ErrorKind, EXPR};

/// The value of an expression was read, but the expression is not constant.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    message = "cannot read the value of a non-constant expression",
    labels = ["this expression depends on a variable"],
    help = format!("check {} before reading the value, or evaluate the expression in a context", "is_constant()".fg(EXPR)),
)]
pub struct InvalidState {
    /// The rendering of the expression whose value was read.
    pub expr: String,
}

/// A variable was not bound in the context an expression was evaluated in.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    message = format!("`{}` is not bound in this context", self.name),
    labels = ["this variable"],
    help = if suggestions.is_empty() {
        format!("to bind it, call: {}", format!("ctxt.add_var(\"{}\", <value>)", name).fg(EXPR))
    } else if suggestions.len() == 1 {
        format!("did you mean the `{}` variable?", (&*suggestions[0]).fg(EXPR))
    } else {
        format!(
            "did you mean one of these variables? {}",
            suggestions
                .iter()
                .map(|s| format!("`{}`", s.fg(EXPR)))
                .collect::<Vec<_>>()
                .join(", ")
        )
    }
)]
pub struct UnboundVariable {
    /// The name of the variable.
    pub name: String,

    /// Bound variables with a similar name, if any.
    pub suggestions: Vec<String>,
}
