//! Winner ranking service

use std::collections::BTreeMap;

use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    db::repositories::{WinnerRepository, WorkRateRepository},
    error::AppResult,
    handlers::winners::response::RecomputeResponse,
    models::{ApplicationTotal, Winner, WinnerStanding},
    utils::{Diff, diff_by_key},
};

/// (application id, sum of rates, place)
type Ranked = (Uuid, i64, i32);

/// Winner service for business logic
pub struct WinnerService;

impl WinnerService {
    /// Rebuild the winner rows of a contest from the current scores.
    ///
    /// Concurrent calls for the same contest run one after another.
    pub async fn recompute_winners(pool: &PgPool, contest_id: Uuid) -> AppResult<RecomputeResponse> {
        let mut tx = pool.begin().await?;

        WinnerRepository::lock_contest(&mut tx, contest_id).await?;

        let totals = WorkRateRepository::accepted_totals(&mut *tx, contest_id).await?;
        if totals.is_empty() {
            tracing::info!(contest_id = %contest_id, "No accepted applications, winners left unchanged");
            return Ok(RecomputeResponse::default());
        }

        let existing = WinnerRepository::list_for_contest(&mut *tx, contest_id).await?;
        let plan = plan_winners(&existing, &rank(&totals));

        let removed: Vec<Uuid> = plan.removed.iter().map(|(application_id, _, _)| *application_id).collect();
        let response = RecomputeResponse {
            removed: WinnerRepository::delete_many(&mut tx, contest_id, &removed).await?,
            created: WinnerRepository::insert_many(&mut tx, contest_id, &plan.added).await?,
            updated: WinnerRepository::update_many(&mut tx, contest_id, &plan.updated).await?,
        };

        tx.commit().await?;

        tracing::info!(
            contest_id = %contest_id,
            created = response.created,
            updated = response.updated,
            removed = response.removed,
            "Winners recomputed"
        );
        Ok(response)
    }

    /// Ranked rows ordered by group, then place
    pub async fn list_winners(pool: &PgPool, contest_id: Uuid) -> AppResult<Vec<WinnerStanding>> {
        WinnerRepository::standings(pool, contest_id).await
    }
}

/// Dense-rank totals within each (nomination, age category) group.
///
/// Higher sums rank first; equal sums share a place and the next
/// distinct sum takes the following place. Ties are ordered by id.
fn rank(totals: &[ApplicationTotal]) -> Vec<Ranked> {
    let mut groups: BTreeMap<(Uuid, &str), Vec<&ApplicationTotal>> = BTreeMap::new();
    for total in totals {
        groups
            .entry((total.nomination_id, total.age_category.as_str()))
            .or_default()
            .push(total);
    }

    let mut ranked = Vec::with_capacity(totals.len());
    for members in groups.values_mut() {
        members.sort_by(|a, b| {
            b.sum_rate
                .cmp(&a.sum_rate)
                .then_with(|| a.application_id.cmp(&b.application_id))
        });

        let mut place = 0;
        let mut previous = None;
        for total in members.iter() {
            if previous != Some(total.sum_rate) {
                place += 1;
                previous = Some(total.sum_rate);
            }
            ranked.push((total.application_id, total.sum_rate, place));
        }
    }

    ranked
}

/// Rows to create, rewrite and drop so that storage matches `ranked`
fn plan_winners(existing: &[Winner], ranked: &[Ranked]) -> Diff<Ranked> {
    let current: Vec<Ranked> = existing
        .iter()
        .map(|w| (w.application_id, w.sum_rate, w.place))
        .collect();

    diff_by_key(&current, ranked, |(application_id, _, _)| *application_id)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn total(nomination_id: Uuid, age_category: &str, sum_rate: i64) -> ApplicationTotal {
        ApplicationTotal {
            application_id: Uuid::new_v4(),
            name: format!("work {}", sum_rate),
            nomination_id,
            age_category: age_category.to_string(),
            sum_rate,
        }
    }

    fn places(ranked: &[Ranked]) -> Vec<(i64, i32)> {
        ranked.iter().map(|(_, sum, place)| (*sum, *place)).collect()
    }

    #[test]
    fn test_ties_share_a_dense_place() {
        let nomination = Uuid::new_v4();
        let totals = vec![
            total(nomination, "Teen", 80),
            total(nomination, "Teen", 100),
            total(nomination, "Teen", 90),
            total(nomination, "Teen", 100),
        ];

        let ranked = rank(&totals);
        assert_eq!(places(&ranked), vec![(100, 1), (100, 1), (90, 2), (80, 3)]);
    }

    #[test]
    fn test_tied_rows_ordered_by_application_id() {
        let nomination = Uuid::new_v4();
        let totals = vec![total(nomination, "Teen", 50), total(nomination, "Teen", 50)];

        let ranked = rank(&totals);
        assert!(ranked[0].0 < ranked[1].0);
    }

    #[test]
    fn test_groups_rank_independently() {
        let painting = Uuid::new_v4();
        let totals = vec![
            total(painting, "Kids", 10),
            total(painting, "Teen", 30),
            total(painting, "Teen", 40),
            total(painting, "Kids", 0),
        ];

        let ranked = rank(&totals);
        let kids: Vec<(i64, i32)> = ranked
            .iter()
            .filter(|(id, _, _)| totals.iter().any(|t| t.application_id == *id && t.age_category == "Kids"))
            .map(|(_, sum, place)| (*sum, *place))
            .collect();
        assert_eq!(kids, vec![(10, 1), (0, 2)]);
    }

    #[test]
    fn test_plan_is_empty_when_nothing_changed() {
        let nomination = Uuid::new_v4();
        let contest_id = Uuid::new_v4();
        let ranked = rank(&[total(nomination, "Teen", 70), total(nomination, "Teen", 60)]);

        let existing: Vec<Winner> = ranked
            .iter()
            .map(|(application_id, sum_rate, place)| Winner {
                id: Uuid::new_v4(),
                contest_id,
                application_id: *application_id,
                sum_rate: *sum_rate,
                place: *place,
            })
            .collect();

        assert!(plan_winners(&existing, &ranked).is_empty());
    }

    #[test]
    fn test_plan_creates_updates_and_removes() {
        let kept = Uuid::new_v4();
        let dropped = Uuid::new_v4();
        let fresh = Uuid::new_v4();
        let contest_id = Uuid::new_v4();

        let existing = vec![
            Winner { id: Uuid::new_v4(), contest_id, application_id: kept, sum_rate: 10, place: 1 },
            Winner { id: Uuid::new_v4(), contest_id, application_id: dropped, sum_rate: 5, place: 2 },
        ];
        let ranked = vec![(fresh, 20, 1), (kept, 10, 2)];

        let plan = plan_winners(&existing, &ranked);
        assert_eq!(plan.added, vec![(fresh, 20, 1)]);
        assert_eq!(plan.updated, vec![(kept, 10, 2)]);
        assert_eq!(plan.removed, vec![(dropped, 5, 2)]);
    }
}
