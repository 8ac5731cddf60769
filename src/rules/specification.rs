//! Core Specification trait and combinators.

use async_trait::async_trait;
use std::sync::Arc;

/// Composable async predicate over a context.
///
/// Rules are small, independently testable checks that combine into
/// endpoint guards with [`And`], [`Or`], [`Not`], [`AllOf`] and [`AnyOf`].
#[async_trait]
pub trait Specification<Ctx>: Send + Sync {
    /// Check if the specification is satisfied by the given context.
    async fn is_satisfied_by(&self, ctx: &Ctx) -> bool;

    /// Human-readable requirement, used in denial messages.
    fn describe(&self) -> String;

    /// Combine this specification with another using AND logic.
    fn and<S: Specification<Ctx>>(self, other: S) -> And<Self, S>
    where
        Self: Sized,
    {
        And(self, other)
    }

    /// Combine this specification with another using OR logic.
    fn or<S: Specification<Ctx>>(self, other: S) -> Or<Self, S>
    where
        Self: Sized,
    {
        Or(self, other)
    }

    /// Negate this specification.
    fn not(self) -> Not<Self>
    where
        Self: Sized,
    {
        Not(self)
    }
}

/// AND combinator for specifications.
#[derive(Clone)]
pub struct And<A, B>(pub A, pub B);

#[async_trait]
impl<Ctx, A, B> Specification<Ctx> for And<A, B>
where
    Ctx: Send + Sync,
    A: Specification<Ctx>,
    B: Specification<Ctx>,
{
    async fn is_satisfied_by(&self, ctx: &Ctx) -> bool {
        self.0.is_satisfied_by(ctx).await && self.1.is_satisfied_by(ctx).await
    }

    fn describe(&self) -> String {
        format!("{} and {}", self.0.describe(), self.1.describe())
    }
}

/// OR combinator for specifications.
#[derive(Clone)]
pub struct Or<A, B>(pub A, pub B);

#[async_trait]
impl<Ctx, A, B> Specification<Ctx> for Or<A, B>
where
    Ctx: Send + Sync,
    A: Specification<Ctx>,
    B: Specification<Ctx>,
{
    async fn is_satisfied_by(&self, ctx: &Ctx) -> bool {
        self.0.is_satisfied_by(ctx).await || self.1.is_satisfied_by(ctx).await
    }

    fn describe(&self) -> String {
        format!("{} or {}", self.0.describe(), self.1.describe())
    }
}

/// NOT combinator for specifications.
#[derive(Clone)]
pub struct Not<A>(pub A);

#[async_trait]
impl<Ctx, A> Specification<Ctx> for Not<A>
where
    Ctx: Send + Sync,
    A: Specification<Ctx>,
{
    async fn is_satisfied_by(&self, ctx: &Ctx) -> bool {
        !self.0.is_satisfied_by(ctx).await
    }

    fn describe(&self) -> String {
        format!("not ({})", self.0.describe())
    }
}

/// A boxed specification for dynamic dispatch.
pub type BoxedSpec<Ctx> = Arc<dyn Specification<Ctx>>;

#[async_trait]
impl<Ctx: Send + Sync> Specification<Ctx> for BoxedSpec<Ctx> {
    async fn is_satisfied_by(&self, ctx: &Ctx) -> bool {
        self.as_ref().is_satisfied_by(ctx).await
    }

    fn describe(&self) -> String {
        self.as_ref().describe()
    }
}

/// All specifications in the collection must be satisfied.
///
/// Evaluation stops at the first failing member.
pub struct AllOf<Ctx> {
    specs: Vec<BoxedSpec<Ctx>>,
}

impl<Ctx: Send + Sync> AllOf<Ctx> {
    pub fn new(specs: Vec<BoxedSpec<Ctx>>) -> Self {
        AllOf { specs }
    }

    /// The first member that is not satisfied, if any
    pub async fn first_unsatisfied(&self, ctx: &Ctx) -> Option<&BoxedSpec<Ctx>> {
        for spec in &self.specs {
            if !spec.is_satisfied_by(ctx).await {
                return Some(spec);
            }
        }
        None
    }
}

#[async_trait]
impl<Ctx: Send + Sync> Specification<Ctx> for AllOf<Ctx> {
    async fn is_satisfied_by(&self, ctx: &Ctx) -> bool {
        self.first_unsatisfied(ctx).await.is_none()
    }

    fn describe(&self) -> String {
        self.specs
            .iter()
            .map(|s| s.describe())
            .collect::<Vec<_>>()
            .join(" and ")
    }
}

/// Any specification in the collection must be satisfied.
pub struct AnyOf<Ctx> {
    specs: Vec<BoxedSpec<Ctx>>,
}

impl<Ctx> AnyOf<Ctx> {
    pub fn new(specs: Vec<BoxedSpec<Ctx>>) -> Self {
        AnyOf { specs }
    }
}

#[async_trait]
impl<Ctx: Send + Sync> Specification<Ctx> for AnyOf<Ctx> {
    async fn is_satisfied_by(&self, ctx: &Ctx) -> bool {
        for spec in &self.specs {
            if spec.is_satisfied_by(ctx).await {
                return true;
            }
        }
        false
    }

    fn describe(&self) -> String {
        self.specs
            .iter()
            .map(|s| s.describe())
            .collect::<Vec<_>>()
            .join(" or ")
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// Fixed outcome, for exercising combinators
    #[derive(Clone, Copy)]
    pub struct Fixed(pub bool, pub &'static str);

    #[async_trait]
    impl<Ctx: Send + Sync> Specification<Ctx> for Fixed {
        async fn is_satisfied_by(&self, _ctx: &Ctx) -> bool {
            self.0
        }

        fn describe(&self) -> String {
            self.1.to_string()
        }
    }

    #[tokio::test]
    async fn test_all_of_reports_first_failure() {
        let all = AllOf::<()>::new(vec![
            Arc::new(Fixed(true, "a")),
            Arc::new(Fixed(false, "b")),
            Arc::new(Fixed(false, "c")),
        ]);

        assert!(!all.is_satisfied_by(&()).await);
        let failed = all.first_unsatisfied(&()).await.map(|s| s.describe());
        assert_eq!(failed.as_deref(), Some("b"));
    }

    #[tokio::test]
    async fn test_any_of() {
        let any = AnyOf::<()>::new(vec![Arc::new(Fixed(false, "a")), Arc::new(Fixed(true, "b"))]);
        assert!(any.is_satisfied_by(&()).await);
        assert_eq!(Specification::<()>::describe(&any), "a or b");

        let none = AnyOf::<()>::new(vec![]);
        assert!(!none.is_satisfied_by(&()).await);
    }

    #[tokio::test]
    async fn test_struct_combinators() {
        let rule = And(Fixed(true, "a"), Not(Fixed(false, "b")));
        assert!(Specification::<()>::is_satisfied_by(&rule, &()).await);
        assert_eq!(Specification::<()>::describe(&rule), "a and not (b)");

        let rule = Or(Fixed(false, "a"), Fixed(false, "b"));
        assert!(!Specification::<()>::is_satisfied_by(&rule, &()).await);
    }
}
