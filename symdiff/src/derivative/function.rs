//! Symbolic derivatives of the unary functions in [`crate::function`].

use crate::expr::Expr;
use crate::function::{Function, FunctionKind};

use super::derivative;
use super::is_trivially_zero;
use super::MultBuilder;

/// Returns the derivative of the function with respect to its argument, `F'(a)`.
fn outer_derivative(this: &Expr, func: &Function) -> Expr {
    let arg = func.argument();
    match func.kind() {
        // `(-a)' = -1`; applied directly to `a'` below instead
        FunctionKind::Negative => Expr::constant(-1.0),
        FunctionKind::Invert => Expr::power(arg.clone(), Expr::constant(-2.0)).negate(),
        FunctionKind::Exponential => this.clone(),
        FunctionKind::Logarithm => arg.invert(),
        FunctionKind::Sine => arg.cos(),
        FunctionKind::Cosine => arg.sin().negate(),
        FunctionKind::Tangent => Expr::product(arg.cos(), arg.cos()).invert(),
    }
}

/// Computes the derivative of a function node and performs the chain rule,
/// `F(a)' = F'(a) * a'`.
///
/// `this` must be the expression holding `func`.
pub(super) fn function_derivative(this: &Expr, func: &Function, with: &str) -> Expr {
    let inner = derivative(func.argument(), with);
    if is_trivially_zero(&inner) {
        return Expr::zero();
    }

    // `-a'` instead of `-1 * a'`, so that the negation can cancel with one in `a'`
    if func.kind() == FunctionKind::Negative {
        return inner.negate();
    }

    let mut mult_group = MultBuilder::default();
    mult_group.mult(outer_derivative(this, func));
    mult_group.mult(inner);
    mult_group.into()
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rand::Rng;
    use crate::{ctxt::Ctxt, derivative::tests::check_against_finite_difference};
    use super::*;

    fn x() -> Expr {
        Expr::variable("x")
    }

    /// Inner expressions to compose every function with; all are well-defined and positive at
    /// the sample points so that every function is differentiable there.
    fn inner_expressions() -> Vec<Expr> {
        vec![
            x(),
            Expr::constant(2.0) * x() + Expr::constant(3.0),
            Expr::power(x(), Expr::constant(2.0)) + Expr::constant(1.0),
            x().exp(),
            x() * Expr::variable("y") + Expr::constant(2.0),
        ]
    }

    #[test]
    fn chain_rule_matches_finite_differences() {
        let mut rng = rand::thread_rng();
        let points = (0..8).map(|_| rng.gen_range(0.1..0.4)).collect::<Vec<f64>>();

        for inner in inner_expressions() {
            for kind in FunctionKind::ALL {
                check_against_finite_difference(&inner.apply(kind), points.iter().copied());
            }
        }
    }

    #[test]
    fn sine() {
        let derivative = x().sin().derivative("x");
        assert_eq!(derivative, x().cos());

        let ctxt = Ctxt::new().with_var("x", 0.0);
        assert_eq!(derivative.evaluate(&ctxt).unwrap(), 1.0);
    }

    #[test]
    fn cosine() {
        assert_eq!(x().cos().derivative("x"), x().sin().negate());
    }

    #[test]
    fn tangent() {
        assert_eq!(
            x().tan().derivative("x"),
            Expr::product(x().cos(), x().cos()).invert(),
        );
    }

    #[test]
    fn exponential_is_itself() {
        let exp = x().exp();
        assert!(exp.derivative("x").ptr_eq(&exp));
    }

    #[test]
    fn logarithm() {
        assert_eq!(x().log().derivative("x"), x().invert());

        // ln(3x): 3 * (1/(3x))
        let inner = Expr::constant(3.0) * x();
        assert_eq!(
            inner.log().derivative("x"),
            Expr::product(inner.invert(), Expr::constant(3.0)),
        );
    }

    #[test]
    fn invert() {
        let derivative = x().invert().derivative("x");
        assert_eq!(derivative, Expr::power(x(), Expr::constant(-2.0)).negate());

        let ctxt = Ctxt::new().with_var("x", 2.0);
        assert_eq!(derivative.evaluate(&ctxt).unwrap(), -0.25);
    }

    #[test]
    fn negative() {
        assert_eq!(x().negate().derivative("x"), Expr::one().negate());

        // the negation of the inner derivative cancels with the outer one
        let inner = x().cos();
        assert_eq!(inner.negate().derivative("x"), x().sin());
    }

    #[test]
    fn constant_argument() {
        for kind in FunctionKind::ALL {
            assert_eq!(Expr::constant(0.5).apply(kind).derivative("x"), Expr::zero());
        }
        assert_eq!(Expr::variable("y").sin().derivative("x"), Expr::zero());
    }

    #[test]
    fn derivative_does_not_touch_original() {
        let expr = (x() * x()).tan();
        let before = expr.to_string();
        let _ = expr.derivative("x");
        assert_eq!(expr.to_string(), before);
        assert_eq!(expr.size(), 4);
    }
}
