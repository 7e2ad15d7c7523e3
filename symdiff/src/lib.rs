//! A symbolic expression engine.
//!
//! Expressions are immutable trees of [`Expr`] nodes. They can be differentiated symbolically
//! with the chain rule, evaluated numerically given the values of their variables, and have
//! variables substituted with other expressions.
//!
//! ```
//! use symdiff::{Ctxt, Expr};
//!
//! let x = Expr::variable("x");
//!
//! // d/dx 1/x = -(x^-2)
//! let derivative = x.invert().derivative("x");
//! assert_eq!(derivative.to_string(), "(-(x^-2))");
//!
//! let ctxt = Ctxt::new().with_var("x", 2.0);
//! assert_eq!(derivative.evaluate(&ctxt).unwrap(), -0.25);
//! ```
//!
//! # Constant folding
//!
//! Subtrees without variables are folded as they are built, so their value is available
//! immediately and never recomputed:
//!
//! ```
//! use symdiff::Expr;
//!
//! let tan = Expr::constant(0.0).tan();
//! assert!(tan.is_constant());
//! assert_eq!(tan.value().unwrap(), 0.0);
//! ```
//!
//! Reading the value of an expression that is not constant is an error, see
//! [`error::InvalidState`].
//!
//! # Function nodes
//!
//! Unary functions are applied through smart constructors such as [`Expr::exp`] and
//! [`Expr::log`], which cancel inverse pairs instead of nesting them. See the
//! [`mod@function`] module.

pub mod ctxt;
pub mod derivative;
pub mod error;
pub mod expr;
pub mod function;

pub use ctxt::Ctxt;
pub use derivative::derivative;
pub use expr::{Expr, ExprKind, Symbol};
pub use function::{Function, FunctionKind};
pub use symdiff_error::Error;
