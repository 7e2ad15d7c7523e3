//! Symbolic differentiation.
//!
//! [`derivative`] walks an expression and builds its derivative with respect to one variable,
//! using the sum, product, power and chain rules. The result is lightly cleaned up while it is
//! being built: constant subtrees differentiate to the literal `0`, factors equal to `1` are
//! dropped, products with a zero factor collapse to `0`, and zero terms are dropped from sums.
//! Nothing else is simplified.
//!
//! ```
//! use symdiff::{Ctxt, Expr};
//!
//! let x = Expr::variable("x");
//! let derivative = x.sin().derivative("x");
//! assert_eq!(derivative, x.cos());
//! assert_eq!(derivative.evaluate(&Ctxt::new().with_var("x", 0.0)).unwrap(), 1.0);
//! ```

use crate::expr::{Expr, ExprKind};
use log::trace;

mod function;

/// Returns `true` if the given [`Expr`] is constant and equal to zero.
fn is_trivially_zero(e: &Expr) -> bool {
    e.folded() == Some(0.0)
}

/// Returns `true` if the given [`Expr`] is constant and equal to one.
fn is_trivially_unity(e: &Expr) -> bool {
    e.folded() == Some(1.0)
}

/// Helper struct to build a product of expressions while applying basic simplification rules. If
/// any of the expressions are zero, the product is reduced to zero.
#[derive(Default)]
struct MultBuilder(Vec<Expr>);

impl From<MultBuilder> for Expr {
    fn from(value: MultBuilder) -> Self {
        value.0
            .into_iter()
            .reduce(Expr::product)
            .unwrap_or_else(Expr::one)
    }
}

impl MultBuilder {
    fn mult(&mut self, e: Expr) {
        if is_trivially_zero(&e) || self.0.first().is_some_and(is_trivially_zero) {
            self.0 = vec![Expr::zero()];
            return;
        }

        if !is_trivially_unity(&e) {
            self.0.push(e)
        }
    }
}

/// Helper struct to build a summation of expressions while applying basic simplification rules.
/// Only non-zero expressions are added to the sum.
#[derive(Default)]
struct SumBuilder(Vec<Expr>);

impl From<SumBuilder> for Expr {
    fn from(value: SumBuilder) -> Self {
        value.0
            .into_iter()
            .reduce(Expr::sum)
            .unwrap_or_else(Expr::zero)
    }
}

impl SumBuilder {
    fn add(&mut self, e: Expr) {
        if !is_trivially_zero(&e) {
            self.0.push(e)
        }
    }
}

/// `(f + g)' = f' + g'`
fn sum_rule(lhs: &Expr, rhs: &Expr, with: &str) -> Expr {
    let mut sum = SumBuilder::default();
    sum.add(derivative(lhs, with));
    sum.add(derivative(rhs, with));
    sum.into()
}

/// `(f * g)' = f' * g + f * g'`
fn product_rule(lhs: &Expr, rhs: &Expr, with: &str) -> Expr {
    let mut left = MultBuilder::default();
    left.mult(derivative(lhs, with));
    left.mult(rhs.clone());

    let mut right = MultBuilder::default();
    right.mult(lhs.clone());
    right.mult(derivative(rhs, with));

    let mut sum = SumBuilder::default();
    sum.add(left.into());
    sum.add(right.into());
    sum.into()
}

/// Differentiates `base^exponent`.
///
/// - `(f^n)' = n * f^(n - 1) * f'` when the exponent is constant,
/// - `(a^g)' = a^g * ln(a) * g'` when the base is constant,
/// - `(f^g)' = f^g * (g' * ln(f) + g * f' / f)` otherwise.
fn power_rule(expr: &Expr, base: &Expr, exponent: &Expr, with: &str) -> Expr {
    let mut mult_group = MultBuilder::default();

    if let Some(n) = exponent.folded() {
        mult_group.mult(Expr::constant(n));
        mult_group.mult(Expr::power(base.clone(), Expr::constant(n - 1.0)));
        mult_group.mult(derivative(base, with));
    } else if base.is_constant() {
        mult_group.mult(expr.clone());
        mult_group.mult(base.log());
        mult_group.mult(derivative(exponent, with));
    } else {
        let mut log_term = MultBuilder::default();
        log_term.mult(derivative(exponent, with));
        log_term.mult(base.log());

        let mut base_term = MultBuilder::default();
        base_term.mult(exponent.clone());
        base_term.mult(derivative(base, with));
        base_term.mult(base.invert());

        let mut sum = SumBuilder::default();
        sum.add(log_term.into());
        sum.add(base_term.into());

        mult_group.mult(expr.clone());
        mult_group.mult(sum.into());
    }

    mult_group.into()
}

/// Computes the derivative of the given expression with respect to the variable `with`.
pub fn derivative(f: &Expr, with: &str) -> Expr {
    if f.is_constant() {
        return Expr::zero();
    }

    match f.kind() {
        ExprKind::Constant(_) => Expr::zero(),
        ExprKind::Variable(sym) => {
            if sym.as_str() == with {
                Expr::one()
            } else {
                Expr::zero()
            }
        },
        ExprKind::Add(lhs, rhs) => sum_rule(lhs, rhs, with),
        ExprKind::Mul(lhs, rhs) => product_rule(lhs, rhs, with),
        ExprKind::Pow(base, exponent) => power_rule(f, base, exponent, with),
        ExprKind::Function(func) => function::function_derivative(f, func, with),
    }
}

impl Expr {
    /// Computes the derivative of this expression with respect to the variable `with`. See
    /// [`derivative`].
    pub fn derivative(&self, with: &str) -> Expr {
        trace!("differentiating {} with respect to {}", self, with);
        derivative(self, with)
    }
}
