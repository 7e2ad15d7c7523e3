//! Unary function nodes and the smart constructors that build them.
//!
//! A [`Function`] node applies one of the seven [`FunctionKind`]s to exactly one argument. The
//! bookkeeping shared by every kind (cached attributes, strict equality, hashing, substitution)
//! lives on [`Function`]; each kind only contributes its numeric formula, its derivative (see
//! [`crate::derivative`]) and, for the kinds that have one, its inverse.
//!
//! # Smart constructors
//!
//! Function nodes are built through [`Expr::negate`], [`Expr::invert`], [`Expr::exp`],
//! [`Expr::log`], [`Expr::sin`], [`Expr::cos`] and [`Expr::tan`]. If the expression they are
//! called on is already the inverse function, the smart constructor returns that function's
//! argument instead of nesting another node:
//!
//! ```
//! use symdiff::Expr;
//!
//! let x = Expr::variable("x");
//! assert_eq!(x.log().exp(), x);
//! assert_eq!(x.exp().log(), x);
//! assert_eq!(x.invert().invert(), x);
//! assert_eq!(x.negate().negate(), x);
//! ```
//!
//! This is a single local rule applied at construction time, not a simplification pass. Nothing
//! else is rewritten; `(-x).invert()` is kept as `1/(-x)`, and `sin(x)` applied to `x` stays
//! `sin(x)` no matter what `x` is.

use crate::{ctxt::Ctxt, expr::{Expr, Symbol}};
use log::trace;
use std::{collections::HashMap, fmt};
use symdiff_error::Error;

/// The unary functions an expression can apply to its argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum FunctionKind {
    /// `-a`
    Negative,

    /// `1/a`
    Invert,

    /// `e^a`
    Exponential,

    /// `ln(a)`
    Logarithm,

    /// `sin(a)`
    Sine,

    /// `cos(a)`
    Cosine,

    /// `tan(a)`
    Tangent,
}

impl FunctionKind {
    /// Every function kind.
    pub const ALL: [FunctionKind; 7] = [
        Self::Negative,
        Self::Invert,
        Self::Exponential,
        Self::Logarithm,
        Self::Sine,
        Self::Cosine,
        Self::Tangent,
    ];

    /// Applies the function to a number.
    pub fn apply(self, value: f64) -> f64 {
        match self {
            Self::Negative => -value,
            Self::Invert => value.recip(),
            Self::Exponential => value.exp(),
            Self::Logarithm => value.ln(),
            Self::Sine => value.sin(),
            Self::Cosine => value.cos(),
            Self::Tangent => value.tan(),
        }
    }

    /// Returns the function that undoes this one, if it is one of the function kinds.
    ///
    /// Negation and inversion are their own inverses; the exponential and the logarithm are each
    /// other's.
    pub fn inverse(self) -> Option<FunctionKind> {
        match self {
            Self::Negative => Some(Self::Negative),
            Self::Invert => Some(Self::Invert),
            Self::Exponential => Some(Self::Logarithm),
            Self::Logarithm => Some(Self::Exponential),
            Self::Sine | Self::Cosine | Self::Tangent => None,
        }
    }

    /// Returns the name of the function.
    pub fn name(self) -> &'static str {
        match self {
            Self::Negative => "neg",
            Self::Invert => "recip",
            Self::Exponential => "exp",
            Self::Logarithm => "ln",
            Self::Sine => "sin",
            Self::Cosine => "cos",
            Self::Tangent => "tan",
        }
    }

    /// How much applying the function adds to the complexity of its argument. Sign flips are
    /// free.
    pub(crate) fn complexity_cost(self) -> usize {
        match self {
            Self::Negative => 0,
            _ => 1,
        }
    }
}

impl fmt::Display for FunctionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// A unary function applied to exactly one argument.
///
/// Two function nodes are strictly equal if they are the same [`FunctionKind`] and their
/// arguments are strictly equal; `sin(x)` and `cos(x)` are never equal.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Function {
    kind: FunctionKind,
    argument: Expr,
}

impl Function {
    /// Returns the kind of function.
    pub fn kind(&self) -> FunctionKind {
        self.kind
    }

    /// Returns the argument the function is applied to.
    pub fn argument(&self) -> &Expr {
        &self.argument
    }

    /// Builds a new node of the same kind of function, applied to the given argument.
    ///
    /// The node is rebuilt as-is; the smart constructors are not consulted.
    pub fn with(&self, argument: Expr) -> Expr {
        Function { kind: self.kind, argument }.into()
    }

    /// Replaces the variables in the argument, then rebuilds the function around it. See
    /// [`Expr::substitute`].
    pub fn substitute(&self, mapping: &HashMap<Symbol, Expr>) -> Expr {
        self.with(self.argument.substitute(mapping))
    }

    /// Evaluates the argument in the given context, then applies the function to it.
    pub fn evaluate(&self, ctxt: &Ctxt) -> Result<f64, Error> {
        Ok(self.kind.apply(self.argument.evaluate(ctxt)?))
    }

    /// Applies the function to the value of the argument, if the argument is constant.
    pub(crate) fn fold(&self) -> Option<f64> {
        self.argument.folded().map(|value| self.kind.apply(value))
    }
}

impl fmt::Display for Function {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let arg = &self.argument;
        match self.kind {
            FunctionKind::Negative => write!(f, "(-{})", arg),
            FunctionKind::Invert => write!(f, "(1/{})", arg),
            FunctionKind::Exponential => write!(f, "e^({})", arg),
            FunctionKind::Logarithm => write!(f, "ln({})", arg),
            FunctionKind::Sine => write!(f, "sin({})", arg),
            FunctionKind::Cosine => write!(f, "cos({})", arg),
            FunctionKind::Tangent => write!(f, "tan({})", arg),
        }
    }
}

impl Expr {
    /// Applies the given function to this expression.
    ///
    /// If this expression is the inverse of `kind`, the inverse's argument is returned instead,
    /// before any node is built or folded.
    pub fn apply(&self, kind: FunctionKind) -> Expr {
        if let Some(func) = self.as_function() {
            if kind.inverse() == Some(func.kind()) {
                trace!("{} cancels {}, unwrapping {}", kind, func.kind(), func.argument());
                return func.argument().clone();
            }
        }

        Function { kind, argument: self.clone() }.into()
    }

    /// Returns `-self`. A double negation cancels.
    pub fn negate(&self) -> Expr {
        self.apply(FunctionKind::Negative)
    }

    /// Returns `1/self`. A double reciprocal cancels.
    pub fn invert(&self) -> Expr {
        self.apply(FunctionKind::Invert)
    }

    /// Returns `e^self`. Cancels a logarithm.
    pub fn exp(&self) -> Expr {
        self.apply(FunctionKind::Exponential)
    }

    /// Returns `ln(self)`. Cancels an exponential.
    pub fn log(&self) -> Expr {
        self.apply(FunctionKind::Logarithm)
    }

    /// Returns `sin(self)`.
    pub fn sin(&self) -> Expr {
        self.apply(FunctionKind::Sine)
    }

    /// Returns `cos(self)`.
    pub fn cos(&self) -> Expr {
        self.apply(FunctionKind::Cosine)
    }

    /// Returns `tan(self)`.
    pub fn tan(&self) -> Expr {
        self.apply(FunctionKind::Tangent)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use std::{collections::hash_map::DefaultHasher, hash::{Hash, Hasher}};
    use crate::error::InvalidState;
    use super::*;

    fn x() -> Expr {
        Expr::variable("x")
    }

    fn hash_of(expr: &Expr) -> u64 {
        let mut state = DefaultHasher::new();
        expr.hash(&mut state);
        state.finish()
    }

    /// A few arguments of different shapes to apply every function to.
    fn arguments() -> Vec<Expr> {
        vec![
            x(),
            Expr::constant(0.5),
            x() * Expr::variable("y") + Expr::constant(1.0),
            x().sin().exp(),
        ]
    }

    #[test]
    fn structural_metrics() {
        for arg in arguments() {
            for kind in FunctionKind::ALL {
                let func: Expr = Function { kind, argument: arg.clone() }.into();
                assert_eq!(func.height(), arg.height() + 1, "{kind} height");
                assert_eq!(func.size(), arg.size() + 1, "{kind} size");
                assert_eq!(func.is_constant(), arg.is_constant(), "{kind} is_constant");

                let expected_complexity = match kind {
                    FunctionKind::Negative => arg.complexity(),
                    _ => arg.complexity() + 1,
                };
                assert_eq!(func.complexity(), expected_complexity, "{kind} complexity");
            }
        }
    }

    #[test]
    fn constant_folding() {
        let arg = Expr::constant(0.5);
        for kind in FunctionKind::ALL {
            let func = arg.apply(kind);
            assert!(func.is_constant());
            assert_eq!(func.value().unwrap(), kind.apply(0.5), "{kind}");
        }

        assert_eq!(Expr::constant(0.0).exp().value().unwrap(), 1.0);
        assert_eq!(Expr::constant(2.0).invert().value().unwrap(), 0.5);
        assert_eq!(Expr::constant(3.0).negate().value().unwrap(), -3.0);
    }

    #[test]
    fn tangent_of_zero() {
        let tan = Expr::constant(0.0).tan();
        assert!(tan.is_constant());
        assert_eq!(tan.value().unwrap(), 0.0);
    }

    #[test]
    fn folded_value_matches_evaluation() {
        let ctxt = Ctxt::new().with_var("x", 0.7);
        let mapping = HashMap::from([(Symbol::new("x"), Expr::constant(0.7))]);
        for kind in FunctionKind::ALL {
            let symbolic = x().apply(kind);
            let folded = symbolic.substitute(&mapping);
            assert!(folded.is_constant());
            assert_eq!(folded.value().unwrap(), symbolic.evaluate(&ctxt).unwrap(), "{kind}");
            assert_eq!(folded.value().unwrap(), folded.evaluate(&Ctxt::new()).unwrap(), "{kind}");
        }
    }

    #[test]
    fn non_constant_value_is_invalid_state() {
        for kind in FunctionKind::ALL {
            let err = x().apply(kind).value().unwrap_err();
            assert!(err.is::<InvalidState>(), "{kind}");
        }
    }

    #[test]
    fn inverse_cancellation() {
        for arg in arguments() {
            assert_eq!(arg.log().exp(), arg);
            assert_eq!(arg.exp().log(), arg);
            assert_eq!(arg.invert().invert(), arg);
            assert_eq!(arg.negate().negate(), arg);
            assert!(arg.negate().negate().ptr_eq(&arg));
        }
    }

    #[test]
    fn no_cancellation_across_unrelated_kinds() {
        let neg = x().negate();
        let recip = neg.invert();
        assert_eq!(recip.as_function().map(Function::kind), Some(FunctionKind::Invert));
        assert_eq!(recip.as_function().unwrap().argument(), &neg);

        // a function applied to itself is not cancelled unless it is its own inverse
        let exp = x().exp().exp();
        assert_eq!(exp.height(), 2);
        let sin = x().sin().sin();
        assert_eq!(sin.height(), 2);
        assert_eq!(x().exp().negate().negate(), x().exp());
    }

    #[test]
    fn cancelled_constant_keeps_inner_value() {
        let two = Expr::constant(2.0);
        let cancelled = two.log().exp();
        assert!(cancelled.ptr_eq(&two));
        assert_eq!(cancelled.value().unwrap(), 2.0);
    }

    #[test]
    fn strict_equality_and_hash() {
        let y = Expr::variable("y");
        assert_eq!(x().sin(), x().sin());
        assert_eq!(hash_of(&x().sin()), hash_of(&x().sin()));
        assert_ne!(x().sin(), y.sin());
        assert_ne!(x().sin(), x().cos());
        assert_ne!(x().exp(), x().log());
        assert_ne!(x().negate(), x().invert());

        for kind in FunctionKind::ALL {
            let a = (x() + Expr::constant(1.0)).apply(kind);
            let b = (x() + Expr::constant(1.0)).apply(kind);
            assert!(!a.ptr_eq(&b));
            assert_eq!(a, b);
            assert_eq!(hash_of(&a), hash_of(&b), "{kind}");
        }
    }

    #[test]
    fn with_rebuilds_same_kind() {
        let sin = x().sin();
        let func = sin.as_function().unwrap();
        let rebuilt = func.with(Expr::variable("y"));
        assert_eq!(rebuilt, Expr::variable("y").sin());

        // `with` does not consult the smart constructors
        let exp = x().exp();
        let rebuilt = exp.as_function().unwrap().with(x().log());
        assert_eq!(rebuilt.height(), 2);
    }

    #[test]
    fn substitute_is_pure() {
        let expr = x().cos().log();
        let mapping = HashMap::from([(Symbol::new("x"), Expr::constant(0.0))]);
        let substituted = expr.substitute(&mapping);

        assert!(substituted.is_constant());
        assert_eq!(substituted.value().unwrap(), 0.0);
        assert!(!expr.is_constant());
        assert_eq!(expr, x().cos().log());
        assert_eq!(expr.to_string(), "ln(cos(x))");
    }

    #[test]
    fn evaluate() {
        let ctxt = Ctxt::new().with_var("x", 2.0);
        assert_eq!(x().negate().evaluate(&ctxt).unwrap(), -2.0);
        assert_eq!(x().invert().evaluate(&ctxt).unwrap(), 0.5);
        assert_eq!(x().exp().evaluate(&ctxt).unwrap(), 2f64.exp());
        assert_eq!(x().log().evaluate(&ctxt).unwrap(), 2f64.ln());
        assert_eq!(x().sin().evaluate(&ctxt).unwrap(), 2f64.sin());
        assert_eq!(x().cos().evaluate(&ctxt).unwrap(), 2f64.cos());
        assert_eq!(x().tan().evaluate(&ctxt).unwrap(), 2f64.tan());
    }

    #[test]
    fn display() {
        let rendered = FunctionKind::ALL
            .into_iter()
            .map(|kind| x().apply(kind).to_string())
            .collect::<Vec<_>>();
        assert_eq!(rendered, vec![
            "(-x)",
            "(1/x)",
            "e^(x)",
            "ln(x)",
            "sin(x)",
            "cos(x)",
            "tan(x)",
        ]);
    }
}
