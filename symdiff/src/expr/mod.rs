//! Immutable, structurally shared expression trees.
//!
//! An [`Expr`] is a cheap handle to a node of an expression tree. Nodes are never mutated once
//! they are built: every operation that "changes" an expression, such as substitution or
//! differentiation, builds new nodes and shares the untouched subtrees with the original tree.
//! This makes it safe to hand the same tree to any number of readers, on any number of threads.
//!
//! # Cached attributes
//!
//! Every node computes a handful of attributes exactly once, when it is built:
//!
//! - whether the node is **constant**, i.e. contains no variables;
//! - its **value**, if it is constant (constant subtrees are folded as they are built);
//! - its **height**, **size** (number of nodes) and **complexity**;
//! - its **structural hash**.
//!
//! Reading the value of a non-constant node is a contract violation and is reported with the
//! [`InvalidState`] error kind.
//!
//! # Strict equality
//!
//! The [`PartialEq`] and [`Eq`] implementations for [`Expr`] implement **strict** (structural)
//! equality: two expressions are equal if they are the same kind of node with strictly equal
//! children. `x + y` and `y + x` are **not** strictly equal, nor are `sin(x)` and `cos(x)` even
//! though both wrap the same argument.
//!
//! Strict equality never reports false positives; if two expressions are strictly equal, they
//! are semantically equal. It is also cheap: the cached structural hashes are compared first, so
//! most unequal trees are rejected without walking them.

mod iter;
mod symbol;

pub use iter::ExprIter;
pub use symbol::Symbol;

use crate::{
    ctxt::Ctxt,
    error::{InvalidState, UnboundVariable},
    function::Function,
};
use once_cell::sync::Lazy;
use rustc_hash::FxHasher;
use std::{
    collections::{BTreeSet, HashMap},
    fmt,
    hash::{Hash, Hasher},
    ops::{Add, Div, Mul, Neg, Sub},
    sync::Arc,
};
use symdiff_error::Error;

/// Stored as the value of non-constant nodes. It is never read.
const PLACEHOLDER: f64 = 0.0;

static ZERO: Lazy<Expr> = Lazy::new(|| Expr::constant(0.0));
static ONE: Lazy<Expr> = Lazy::new(|| Expr::constant(1.0));

/// The kind of a node in an expression tree.
#[derive(Debug, Clone)]
pub enum ExprKind {
    /// A number, such as `2` or `0.5`.
    Constant(f64),

    /// A variable, such as `x` or `y`.
    Variable(Symbol),

    /// Two expressions added together.
    Add(Expr, Expr),

    /// Two expressions multiplied together.
    Mul(Expr, Expr),

    /// An expression raised to a power.
    Pow(Expr, Expr),

    /// A unary function applied to an expression, such as `sin(x)`.
    Function(Function),
}

/// Returns the bits used to compare and hash constants. `-0.0` is folded into `0.0`, and every
/// `NaN` into the same `NaN`, so that strict equality stays reflexive.
fn canonical_bits(value: f64) -> u64 {
    if value == 0.0 {
        0
    } else if value.is_nan() {
        f64::NAN.to_bits()
    } else {
        value.to_bits()
    }
}

/// Checks if two [`ExprKind`]s are **strictly** equal. See the [module-level
/// documentation](self).
impl PartialEq for ExprKind {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Constant(lhs), Self::Constant(rhs)) => canonical_bits(*lhs) == canonical_bits(*rhs),
            (Self::Variable(lhs), Self::Variable(rhs)) => lhs == rhs,
            (Self::Add(lhs_a, lhs_b), Self::Add(rhs_a, rhs_b))
                | (Self::Mul(lhs_a, lhs_b), Self::Mul(rhs_a, rhs_b))
                | (Self::Pow(lhs_a, lhs_b), Self::Pow(rhs_a, rhs_b)) => {
                lhs_a == rhs_a && lhs_b == rhs_b
            },
            (Self::Function(lhs), Self::Function(rhs)) => lhs == rhs,
            _ => false,
        }
    }
}

impl Eq for ExprKind {}

/// Attributes derived from a node's children when the node is built.
#[derive(Debug, Clone, Copy)]
struct Attrs {
    is_constant: bool,
    value: f64,
    height: usize,
    size: usize,
    complexity: usize,
    hash: u64,
}

impl Attrs {
    /// Derives the attributes of a node of the given kind.
    fn of(kind: &ExprKind) -> Self {
        let hash = structural_hash(kind);
        match kind {
            ExprKind::Constant(value) => Self {
                is_constant: true,
                value: *value,
                height: 0,
                size: 1,
                complexity: 1,
                hash,
            },
            ExprKind::Variable(_) => Self {
                is_constant: false,
                value: PLACEHOLDER,
                height: 0,
                size: 1,
                complexity: 1,
                hash,
            },
            ExprKind::Add(lhs, rhs) => Self::binary(lhs, rhs, |a, b| a + b, hash),
            ExprKind::Mul(lhs, rhs) => Self::binary(lhs, rhs, |a, b| a * b, hash),
            ExprKind::Pow(lhs, rhs) => Self::binary(lhs, rhs, f64::powf, hash),
            ExprKind::Function(func) => {
                let arg = func.argument();
                Self {
                    is_constant: arg.is_constant(),
                    value: func.fold().unwrap_or(PLACEHOLDER),
                    height: arg.height() + 1,
                    size: arg.size() + 1,
                    complexity: arg.complexity() + func.kind().complexity_cost(),
                    hash,
                }
            },
        }
    }

    fn binary(lhs: &Expr, rhs: &Expr, op: impl Fn(f64, f64) -> f64, hash: u64) -> Self {
        let value = match (lhs.folded(), rhs.folded()) {
            (Some(lhs), Some(rhs)) => Some(op(lhs, rhs)),
            _ => None,
        };
        Self {
            is_constant: value.is_some(),
            value: value.unwrap_or(PLACEHOLDER),
            height: lhs.height().max(rhs.height()) + 1,
            size: lhs.size() + rhs.size() + 1,
            complexity: lhs.complexity() + rhs.complexity() + 1,
            hash,
        }
    }
}

/// Combines a seed identifying the kind of node with the cached hashes of its children.
fn structural_hash(kind: &ExprKind) -> u64 {
    let mut state = FxHasher::default();
    match kind {
        ExprKind::Constant(value) => {
            0u8.hash(&mut state);
            canonical_bits(*value).hash(&mut state);
        },
        ExprKind::Variable(sym) => {
            1u8.hash(&mut state);
            sym.hash(&mut state);
        },
        ExprKind::Add(lhs, rhs) => {
            2u8.hash(&mut state);
            lhs.hash(&mut state);
            rhs.hash(&mut state);
        },
        ExprKind::Mul(lhs, rhs) => {
            3u8.hash(&mut state);
            lhs.hash(&mut state);
            rhs.hash(&mut state);
        },
        ExprKind::Pow(lhs, rhs) => {
            4u8.hash(&mut state);
            lhs.hash(&mut state);
            rhs.hash(&mut state);
        },
        ExprKind::Function(func) => {
            5u8.hash(&mut state);
            func.hash(&mut state);
        },
    }
    state.finish()
}

#[derive(Debug)]
struct Node {
    kind: ExprKind,
    attrs: Attrs,
}

/// A handle to an immutable node of an expression tree.
///
/// Cloning an [`Expr`] clones the handle, not the tree. For more information about this type,
/// see the [module-level documentation](self).
#[derive(Clone)]
pub struct Expr(Arc<Node>);

impl Expr {
    /// Builds a node of the given kind, deriving all of its cached attributes.
    ///
    /// This is the only place nodes are created. Function nodes should reach it through the
    /// smart constructors ([`Expr::negate`], [`Expr::exp`], ...) so that inverse pairs cancel.
    pub(crate) fn from_kind(kind: ExprKind) -> Self {
        let attrs = Attrs::of(&kind);
        Self(Arc::new(Node { kind, attrs }))
    }

    /// Creates a constant.
    pub fn constant(value: f64) -> Self {
        Self::from_kind(ExprKind::Constant(value))
    }

    /// Creates a variable.
    pub fn variable(name: impl Into<Symbol>) -> Self {
        Self::from_kind(ExprKind::Variable(name.into()))
    }

    /// Adds two expressions. No simplification is done.
    pub fn sum(lhs: Expr, rhs: Expr) -> Self {
        Self::from_kind(ExprKind::Add(lhs, rhs))
    }

    /// Multiplies two expressions. No simplification is done.
    pub fn product(lhs: Expr, rhs: Expr) -> Self {
        Self::from_kind(ExprKind::Mul(lhs, rhs))
    }

    /// Raises `base` to the power of `exponent`. No simplification is done.
    pub fn power(base: Expr, exponent: Expr) -> Self {
        Self::from_kind(ExprKind::Pow(base, exponent))
    }

    /// The constant `0`.
    pub fn zero() -> Self {
        ZERO.clone()
    }

    /// The constant `1`.
    pub fn one() -> Self {
        ONE.clone()
    }

    /// Returns the kind of this node.
    pub fn kind(&self) -> &ExprKind {
        &self.0.kind
    }

    /// Returns true if the expression contains no variables.
    pub fn is_constant(&self) -> bool {
        self.0.attrs.is_constant
    }

    /// Returns the value of a constant expression.
    ///
    /// Returns an [`InvalidState`] error if the expression is not constant.
    pub fn value(&self) -> Result<f64, Error> {
        self.folded().ok_or_else(|| {
            let rendered = self.to_string();
            Error::spanning(rendered.clone(), InvalidState { expr: rendered })
        })
    }

    /// Returns the value of the expression if it is constant, or [`None`] otherwise.
    pub fn folded(&self) -> Option<f64> {
        let attrs = &self.0.attrs;
        attrs.is_constant.then_some(attrs.value)
    }

    /// Returns the length of the longest path from this node to a leaf.
    pub fn height(&self) -> usize {
        self.0.attrs.height
    }

    /// Returns the number of nodes in the expression.
    pub fn size(&self) -> usize {
        self.0.attrs.size
    }

    /// Returns the complexity score of the expression.
    ///
    /// This is the number of nodes in the expression, except that negations are free.
    pub fn complexity(&self) -> usize {
        self.0.attrs.complexity
    }

    /// Returns the structural hash cached in this node.
    pub fn structural_hash(&self) -> u64 {
        self.0.attrs.hash
    }

    /// Returns true if both handles point to the same node.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }

    /// If the expression is a [`ExprKind::Constant`], returns the contained number.
    pub fn as_constant(&self) -> Option<f64> {
        match self.kind() {
            ExprKind::Constant(value) => Some(*value),
            _ => None,
        }
    }

    /// If the expression is a [`ExprKind::Variable`], returns a reference to the contained symbol.
    pub fn as_symbol(&self) -> Option<&Symbol> {
        match self.kind() {
            ExprKind::Variable(sym) => Some(sym),
            _ => None,
        }
    }

    /// If the expression is a [`ExprKind::Function`], returns a reference to the function node.
    pub fn as_function(&self) -> Option<&Function> {
        match self.kind() {
            ExprKind::Function(func) => Some(func),
            _ => None,
        }
    }

    /// Replaces every variable in `mapping` with the expression it maps to. Variables that are
    /// not in `mapping` are left intact.
    ///
    /// This builds a new tree; `self` is left untouched.
    pub fn substitute(&self, mapping: &HashMap<Symbol, Expr>) -> Expr {
        match self.kind() {
            ExprKind::Constant(_) => self.clone(),
            ExprKind::Variable(sym) => mapping.get(sym).cloned().unwrap_or_else(|| self.clone()),
            ExprKind::Add(lhs, rhs) => Self::sum(lhs.substitute(mapping), rhs.substitute(mapping)),
            ExprKind::Mul(lhs, rhs) => Self::product(lhs.substitute(mapping), rhs.substitute(mapping)),
            ExprKind::Pow(lhs, rhs) => Self::power(lhs.substitute(mapping), rhs.substitute(mapping)),
            ExprKind::Function(func) => func.substitute(mapping),
        }
    }

    /// Evaluates the expression with the variables bound in the given context.
    ///
    /// Constant subtrees are not walked; their folded value is used directly. Returns an
    /// [`UnboundVariable`] error if a variable in the expression is not bound in the context.
    pub fn evaluate(&self, ctxt: &Ctxt) -> Result<f64, Error> {
        if let Some(value) = self.folded() {
            return Ok(value);
        }

        match self.kind() {
            ExprKind::Constant(value) => Ok(*value),
            ExprKind::Variable(sym) => ctxt.get_var(sym.as_str()).ok_or_else(|| {
                Error::spanning(sym.as_str(), UnboundVariable {
                    name: sym.to_string(),
                    suggestions: ctxt.get_similar_vars(sym.as_str())
                        .into_iter()
                        .map(String::from)
                        .collect(),
                })
            }),
            ExprKind::Add(lhs, rhs) => Ok(lhs.evaluate(ctxt)? + rhs.evaluate(ctxt)?),
            ExprKind::Mul(lhs, rhs) => Ok(lhs.evaluate(ctxt)? * rhs.evaluate(ctxt)?),
            ExprKind::Pow(lhs, rhs) => Ok(lhs.evaluate(ctxt)?.powf(rhs.evaluate(ctxt)?)),
            ExprKind::Function(func) => func.evaluate(ctxt),
        }
    }

    /// Returns the set of variables that appear in the expression.
    pub fn variables(&self) -> BTreeSet<Symbol> {
        self.post_order_iter()
            .filter_map(Expr::as_symbol)
            .cloned()
            .collect()
    }

    /// Returns an iterator that traverses the tree of expressions in left-to-right post-order
    /// (i.e. depth-first).
    pub fn post_order_iter(&self) -> ExprIter {
        ExprIter::new(self)
    }
}

/// Checks if two expressions are **strictly** equal.
///
/// For more information about strict equality, see the [module-level documentation](self).
impl PartialEq for Expr {
    fn eq(&self, other: &Self) -> bool {
        if self.ptr_eq(other) {
            return true;
        }
        self.structural_hash() == other.structural_hash() && self.kind() == other.kind()
    }
}

impl Eq for Expr {}

/// Equal expressions have equal structural hashes, so the cached hash is all that needs to be
/// fed to the hasher.
impl Hash for Expr {
    fn hash<H: Hasher>(&self, state: &mut H) {
        state.write_u64(self.structural_hash());
    }
}

impl fmt::Debug for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self.kind(), f)
    }
}

/// A diagnostic rendering of the expression. It is fully parenthesized and not meant to be
/// parsed back.
impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind() {
            ExprKind::Constant(value) => write!(f, "{}", value),
            ExprKind::Variable(sym) => write!(f, "{}", sym),
            ExprKind::Add(lhs, rhs) => write!(f, "({} + {})", lhs, rhs),
            ExprKind::Mul(lhs, rhs) => write!(f, "({} * {})", lhs, rhs),
            ExprKind::Pow(lhs, rhs) => write!(f, "({}^{})", lhs, rhs),
            ExprKind::Function(func) => write!(f, "{}", func),
        }
    }
}

impl From<f64> for Expr {
    fn from(value: f64) -> Self {
        Self::constant(value)
    }
}

impl From<Symbol> for Expr {
    fn from(sym: Symbol) -> Self {
        Self::variable(sym)
    }
}

impl From<Function> for Expr {
    fn from(func: Function) -> Self {
        Self::from_kind(ExprKind::Function(func))
    }
}

/// Adds two [`Expr`]s together. No simplification is done.
impl Add for Expr {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Self::sum(self, rhs)
    }
}

/// Subtracts `rhs` from `self` by adding its negation, `self + -rhs`.
impl Sub for Expr {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self::Output {
        Self::sum(self, rhs.negate())
    }
}

/// Multiplies two [`Expr`]s together. No simplification is done.
impl Mul for Expr {
    type Output = Self;

    fn mul(self, rhs: Self) -> Self::Output {
        Self::product(self, rhs)
    }
}

/// Divides `self` by `rhs` by multiplying with its reciprocal, `self * (1/rhs)`.
impl Div for Expr {
    type Output = Self;

    fn div(self, rhs: Self) -> Self::Output {
        Self::product(self, rhs.invert())
    }
}

/// Negates the expression through [`Expr::negate`], so double negations cancel.
impl Neg for Expr {
    type Output = Self;

    fn neg(self) -> Self::Output {
        self.negate()
    }
}
