//! Operator overloading for specification combinators.
//!
//! `&`, `|` and `!` build [`And`], [`Or`] and [`Not`] from [`Spec`]-wrapped
//! rules:
//!
//! ```ignore
//! let guard = Spec(HasRole(ParticipantRole::Jury)) & Spec(InStage(StageKind::Evaluation));
//! ```

use async_trait::async_trait;
use std::ops::{BitAnd, BitOr, Not as StdNot};

use super::specification::{And, Not, Or, Specification};

/// Wrapper struct to enable operator overloading on specifications.
#[derive(Clone)]
pub struct Spec<S>(pub S);

impl<A, B> BitAnd<Spec<B>> for Spec<A> {
    type Output = Spec<And<A, B>>;

    fn bitand(self, rhs: Spec<B>) -> Self::Output {
        Spec(And(self.0, rhs.0))
    }
}

impl<A, B> BitOr<Spec<B>> for Spec<A> {
    type Output = Spec<Or<A, B>>;

    fn bitor(self, rhs: Spec<B>) -> Self::Output {
        Spec(Or(self.0, rhs.0))
    }
}

impl<A> StdNot for Spec<A> {
    type Output = Spec<Not<A>>;

    fn not(self) -> Self::Output {
        Spec(Not(self.0))
    }
}

#[async_trait]
impl<Ctx, S> Specification<Ctx> for Spec<S>
where
    Ctx: Send + Sync,
    S: Specification<Ctx>,
{
    async fn is_satisfied_by(&self, ctx: &Ctx) -> bool {
        self.0.is_satisfied_by(ctx).await
    }

    fn describe(&self) -> String {
        self.0.describe()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::specification::tests::Fixed;

    #[tokio::test]
    async fn test_and_operator() {
        let rule = Spec(Fixed(true, "a")) & Spec(Fixed(true, "b"));
        assert!(Specification::<()>::is_satisfied_by(&rule, &()).await);

        let rule = Spec(Fixed(true, "a")) & Spec(Fixed(false, "b"));
        assert!(!Specification::<()>::is_satisfied_by(&rule, &()).await);
    }

    #[tokio::test]
    async fn test_or_operator() {
        let rule = Spec(Fixed(false, "a")) | Spec(Fixed(true, "b"));
        assert!(Specification::<()>::is_satisfied_by(&rule, &()).await);

        let rule = Spec(Fixed(false, "a")) | Spec(Fixed(false, "b"));
        assert!(!Specification::<()>::is_satisfied_by(&rule, &()).await);
    }

    #[tokio::test]
    async fn test_not_operator() {
        let rule = !Spec(Fixed(true, "a"));
        assert!(!Specification::<()>::is_satisfied_by(&rule, &()).await);
    }

    #[tokio::test]
    async fn test_complex_expression() {
        // (true & !false) | false
        let rule = (Spec(Fixed(true, "a")) & !Spec(Fixed(false, "b"))) | Spec(Fixed(false, "c"));
        assert!(Specification::<()>::is_satisfied_by(&rule, &()).await);
        assert_eq!(
            Specification::<()>::describe(&rule),
            "a and not (b) or c"
        );
    }
}
