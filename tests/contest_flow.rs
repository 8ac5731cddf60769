//! End-to-end service tests against a real Postgres.
//!
//! Needs a Docker daemon: `cargo test -- --ignored`.

use std::{collections::HashMap, sync::Arc, time::Duration};

use chrono::{Datelike, NaiveDate, Utc};
use sqlx::{PgPool, postgres::PgPoolOptions};
use testcontainers::{
    ContainerAsync, GenericImage, ImageExt,
    core::{IntoContainerPort, WaitFor},
    runners::AsyncRunner,
};
use uuid::Uuid;

use contest_engine::{
    AppError,
    cache::NoopStageCache,
    db::{self, repositories::NominationRepository},
    handlers::{
        applications::request::CreateApplicationRequest,
        contests::request::{
            CreateContestRequest, CriterionInput, NominationInput, ReplaceCriteriaRequest,
            ReplaceNominationsRequest,
        },
        work_rates::request::RateInput,
    },
    models::{ApplicationStatus, ParticipantRole},
    services::{
        ApplicationService, ContestService, ParticipantService, PgStageWindows, PgUserDirectory,
        StageResolver, WinnerService, WorkRateService,
    },
};

async fn start_postgres() -> (ContainerAsync<GenericImage>, PgPool) {
    let container = GenericImage::new("postgres", "16-alpine")
        .with_exposed_port(5432.tcp())
        .with_wait_for(WaitFor::message_on_stderr("database system is ready to accept connections"))
        .with_env_var("POSTGRES_PASSWORD", "postgres")
        .with_env_var("POSTGRES_DB", "contests_test")
        .start()
        .await
        .expect("Failed to start PostgreSQL container");

    let host = container.get_host().await.unwrap();
    let port = container.get_host_port_ipv4(5432).await.unwrap();
    let url = format!("postgres://postgres:postgres@{}:{}/contests_test", host, port);

    // The server restarts once after init; retry until it accepts connections
    let mut attempts = 0;
    let pool = loop {
        match PgPoolOptions::new().max_connections(5).connect(&url).await {
            Ok(pool) => break pool,
            Err(e) if attempts < 30 => {
                attempts += 1;
                tracing::debug!(error = %e, attempts, "Waiting for PostgreSQL");
                tokio::time::sleep(Duration::from_millis(500)).await;
            }
            Err(e) => panic!("PostgreSQL never became ready: {e}"),
        }
    };

    db::run_migrations(&pool).await.expect("Failed to run migrations");
    (container, pool)
}

async fn insert_user(pool: &PgPool, email: &str, birth_date: NaiveDate) -> Uuid {
    sqlx::query_scalar(r#"INSERT INTO users (email, birth_date) VALUES ($1, $2) RETURNING id"#)
        .bind(email)
        .bind(birth_date)
        .fetch_one(pool)
        .await
        .unwrap()
}

struct Fixture {
    pool: PgPool,
    users: PgUserDirectory,
    contest_id: Uuid,
    nomination_id: Uuid,
    criteria: HashMap<String, Uuid>,
    jury: Uuid,
    applicants: [Uuid; 2],
    today: NaiveDate,
}

async fn fixture(pool: PgPool) -> Fixture {
    let today = Utc::now().date_naive();
    let teen_birth = NaiveDate::from_ymd_opt(today.year() - 15, 1, 1).unwrap();
    let adult_birth = NaiveDate::from_ymd_opt(today.year() - 40, 1, 1).unwrap();

    let owner = insert_user(&pool, "owner@example.com", adult_birth).await;
    let jury = insert_user(&pool, "jury@example.com", adult_birth).await;
    let first = insert_user(&pool, "first@example.com", teen_birth).await;
    let second = insert_user(&pool, "second@example.com", teen_birth).await;

    let age_category: Uuid = sqlx::query_scalar(
        r#"INSERT INTO age_categories (name, start_age, end_age) VALUES ('Teen', 10, 20) RETURNING id"#,
    )
    .fetch_one(&pool)
    .await
    .unwrap();

    let stages = StageResolver::new(Arc::new(PgStageWindows::new(pool.clone())), Arc::new(NoopStageCache));
    let contest = ContestService::create_contest(
        &pool,
        &stages,
        owner,
        CreateContestRequest {
            title: "Spring drawing".to_string(),
            description: None,
            avatar: None,
            link_to_rules: None,
            organizer: "City library".to_string(),
            prizes: None,
            contacts_for_participants: None,
            category: Some("Art".to_string()),
            region: None,
            age_category_ids: vec![age_category],
        },
        today,
    )
    .await
    .unwrap();
    let contest_id = contest.contest.id;

    ContestService::replace_nominations(
        &pool,
        contest_id,
        ReplaceNominationsRequest {
            nominations: vec![NominationInput {
                name: "Painting".to_string(),
                description: None,
            }],
        },
    )
    .await
    .unwrap();

    let criteria_input = ["Idea", "Craft", "Story"]
        .into_iter()
        .map(|name| CriterionInput {
            name: name.to_string(),
            description: None,
            min_points: 0,
            max_points: 10,
        })
        .collect();
    ContestService::replace_criteria(&pool, contest_id, ReplaceCriteriaRequest { criteria: criteria_input })
        .await
        .unwrap();

    let nomination_id = NominationRepository::list_for_contest(&pool, contest_id).await.unwrap()[0].nomination_id;
    let detail = ContestService::get_contest(&pool, &stages, contest_id, today).await.unwrap();
    let criteria = detail.criteria.iter().map(|c| (c.name.clone(), c.criteria_id)).collect();

    let users = PgUserDirectory::new(pool.clone());
    ParticipantService::set_roster(&pool, &users, contest_id, ParticipantRole::Jury, &[jury])
        .await
        .unwrap();

    Fixture {
        pool,
        users,
        contest_id,
        nomination_id,
        criteria,
        jury,
        applicants: [first, second],
        today,
    }
}

fn application(name: &str, nomination_id: Uuid) -> CreateApplicationRequest {
    CreateApplicationRequest {
        name: name.to_string(),
        annotation: "Gouache on paper".to_string(),
        link_to_work: None,
        nomination_id,
    }
}

fn rates(pairs: &[(Uuid, i32)]) -> Vec<RateInput> {
    pairs
        .iter()
        .map(|(criteria_id, rate)| RateInput {
            criteria_id: *criteria_id,
            rate: *rate,
        })
        .collect()
}

#[tokio::test]
#[ignore = "requires Docker"]
async fn test_contest_lifecycle() {
    let (_container, pool) = start_postgres().await;
    let f = fixture(pool).await;
    let [idea, craft, story] = ["Idea", "Craft", "Story"].map(|name| f.criteria[name]);

    // Duplicate submission by the same author in the same nomination
    let first = ApplicationService::create_application(
        &f.pool,
        &f.users,
        f.applicants[0],
        f.contest_id,
        application("Morning", f.nomination_id),
        f.today,
    )
    .await
    .unwrap();
    assert_eq!(first.age_category, "Teen");

    let duplicate = ApplicationService::create_application(
        &f.pool,
        &f.users,
        f.applicants[0],
        f.contest_id,
        application("Evening", f.nomination_id),
        f.today,
    )
    .await;
    assert!(matches!(duplicate, Err(AppError::Conflict(_))));

    let second = ApplicationService::create_application(
        &f.pool,
        &f.users,
        f.applicants[1],
        f.contest_id,
        application("Harbour", f.nomination_id),
        f.today,
    )
    .await
    .unwrap();

    let accepted = ApplicationService::approve(&f.pool, f.contest_id, &[first.id, second.id])
        .await
        .unwrap();
    assert_eq!(accepted.len(), 2);

    // One already-rated criterion rejects the whole batch
    WorkRateService::submit_scores(&f.pool, f.jury, f.contest_id, first.id, &rates(&[(idea, 10)]))
        .await
        .unwrap();
    let rejected = WorkRateService::submit_scores(
        &f.pool,
        f.jury,
        f.contest_id,
        first.id,
        &rates(&[(idea, 4), (craft, 5), (story, 6)]),
    )
    .await;
    assert!(matches!(rejected, Err(AppError::Conflict(_))));
    let stored = WorkRateService::jury_rates(&f.pool, f.jury, f.contest_id).await.unwrap();
    assert_eq!(stored.len(), 1);

    let rest = WorkRateService::submit_scores(
        &f.pool,
        f.jury,
        f.contest_id,
        first.id,
        &rates(&[(craft, 5), (story, 6)]),
    )
    .await
    .unwrap();
    assert!(rest.completeness.complete);

    WorkRateService::submit_scores(
        &f.pool,
        f.jury,
        f.contest_id,
        second.id,
        &rates(&[(idea, 10), (craft, 10), (story, 1)]),
    )
    .await
    .unwrap();

    // Both total 21 and share first place; a second run changes nothing
    let created = WinnerService::recompute_winners(&f.pool, f.contest_id).await.unwrap();
    assert_eq!(created.created, 2);

    let again = WinnerService::recompute_winners(&f.pool, f.contest_id).await.unwrap();
    assert_eq!((again.created, again.updated, again.removed), (0, 0, 0));

    let winners = WinnerService::list_winners(&f.pool, f.contest_id).await.unwrap();
    assert_eq!(winners.len(), 2);
    assert!(winners.iter().all(|w| w.place == 1 && w.sum_rate == 21));
}

#[tokio::test]
#[ignore = "requires Docker"]
async fn test_overlapping_windows_rejected_before_write() {
    use contest_engine::handlers::contests::request::{ReplaceStagesRequest, StageWindowInput};
    use contest_engine::models::StageKind;

    let (_container, pool) = start_postgres().await;
    let f = fixture(pool).await;
    let stages = StageResolver::new(Arc::new(PgStageWindows::new(f.pool.clone())), Arc::new(NoopStageCache));

    let d = |m, day| NaiveDate::from_ymd_opt(2030, m, day).unwrap();
    let result = ContestService::replace_stage_windows(
        &f.pool,
        &stages,
        f.contest_id,
        ReplaceStagesRequest {
            stages: vec![
                StageWindowInput {
                    stage: StageKind::Collection,
                    start_date: d(3, 1),
                    end_date: d(3, 10),
                },
                StageWindowInput {
                    stage: StageKind::Evaluation,
                    start_date: d(3, 5),
                    end_date: d(3, 20),
                },
            ],
        },
    )
    .await;
    assert!(matches!(result, Err(AppError::InvalidInput(_))));

    let windows = ContestService::get_contest(&f.pool, &stages, f.contest_id, f.today)
        .await
        .unwrap()
        .stages;
    assert!(windows.is_empty());
}

fn criteria(bounds: &[(&str, i32, i32)]) -> ReplaceCriteriaRequest {
    ReplaceCriteriaRequest {
        criteria: bounds
            .iter()
            .map(|(name, min_points, max_points)| CriterionInput {
                name: name.to_string(),
                description: None,
                min_points: *min_points,
                max_points: *max_points,
            })
            .collect(),
    }
}

#[tokio::test]
#[ignore = "requires Docker"]
async fn test_removed_criterion_no_longer_counts() {
    let (_container, pool) = start_postgres().await;
    let f = fixture(pool).await;
    let [idea, craft, story] = ["Idea", "Craft", "Story"].map(|name| f.criteria[name]);

    let entry = ApplicationService::create_application(
        &f.pool,
        &f.users,
        f.applicants[0],
        f.contest_id,
        application("Morning", f.nomination_id),
        f.today,
    )
    .await
    .unwrap();
    ApplicationService::approve(&f.pool, f.contest_id, &[entry.id]).await.unwrap();
    WorkRateService::submit_scores(
        &f.pool,
        f.jury,
        f.contest_id,
        entry.id,
        &rates(&[(idea, 1), (craft, 1), (story, 10)]),
    )
    .await
    .unwrap();

    // Raising Idea's minimum above the given rate would strand it
    let narrowed = ContestService::replace_criteria(
        &f.pool,
        f.contest_id,
        criteria(&[("Idea", 2, 10), ("Craft", 0, 10), ("Story", 0, 10)]),
    )
    .await;
    assert!(matches!(narrowed, Err(AppError::Conflict(ref m)) if m.contains("Idea")));

    ContestService::replace_criteria(&f.pool, f.contest_id, criteria(&[("Idea", 0, 10), ("Craft", 0, 10)]))
        .await
        .unwrap();

    let stored = WorkRateService::jury_rates(&f.pool, f.jury, f.contest_id).await.unwrap();
    assert_eq!(stored.len(), 2);
    assert!(stored.iter().all(|r| r.criteria_id != story));

    let totals = WorkRateService::application_totals(&f.pool, f.contest_id).await.unwrap();
    assert_eq!(totals.len(), 1);
    assert_eq!(totals[0].sum_rate, 2);

    WinnerService::recompute_winners(&f.pool, f.contest_id).await.unwrap();
    let winners = WinnerService::list_winners(&f.pool, f.contest_id).await.unwrap();
    assert_eq!(winners.len(), 1);
    assert_eq!(winners[0].sum_rate, 2);
}

#[tokio::test]
#[ignore = "requires Docker"]
async fn test_applicant_cannot_become_jury() {
    let (_container, pool) = start_postgres().await;
    let f = fixture(pool).await;
    let idea = f.criteria["Idea"];

    let entry = ApplicationService::create_application(
        &f.pool,
        &f.users,
        f.applicants[0],
        f.contest_id,
        application("Morning", f.nomination_id),
        f.today,
    )
    .await
    .unwrap();
    ApplicationService::approve(&f.pool, f.contest_id, &[entry.id]).await.unwrap();

    let promoted =
        ParticipantService::change_role(&f.pool, f.contest_id, f.applicants[0], ParticipantRole::Jury).await;
    assert!(matches!(promoted, Err(AppError::Conflict(_))));

    let members = ParticipantService::list(&f.pool, f.contest_id, Some(ParticipantRole::Member))
        .await
        .unwrap();
    assert!(members.iter().any(|p| p.user_id == f.applicants[0]));

    // Rows written before the check existed must still not allow self-rating
    sqlx::query(r#"UPDATE participants SET role = 'jury' WHERE user_id = $1 AND contest_id = $2"#)
        .bind(f.applicants[0])
        .bind(f.contest_id)
        .execute(&f.pool)
        .await
        .unwrap();

    let own = WorkRateService::submit_scores(&f.pool, f.applicants[0], f.contest_id, entry.id, &rates(&[(idea, 10)]))
        .await;
    assert!(matches!(own, Err(AppError::Forbidden(_))));
}

#[tokio::test]
#[ignore = "requires Docker"]
async fn test_pending_applicant_not_added_to_roster() {
    let (_container, pool) = start_postgres().await;
    let f = fixture(pool).await;

    let pending = ApplicationService::create_application(
        &f.pool,
        &f.users,
        f.applicants[1],
        f.contest_id,
        application("Harbour", f.nomination_id),
        f.today,
    )
    .await
    .unwrap();

    let roster = ParticipantService::set_roster(
        &f.pool,
        &f.users,
        f.contest_id,
        ParticipantRole::Jury,
        &[f.jury, f.applicants[1]],
    )
    .await;
    match roster {
        Err(AppError::Conflict(message)) => assert!(message.contains(&f.applicants[1].to_string())),
        other => panic!("expected Conflict, got {other:?}"),
    }

    let jury = ParticipantService::list(&f.pool, f.contest_id, Some(ParticipantRole::Jury))
        .await
        .unwrap();
    assert_eq!(jury.len(), 1);
    assert_eq!(jury[0].user_id, f.jury);

    // A staff row that appeared after submission blocks acceptance
    sqlx::query(r#"INSERT INTO participants (user_id, contest_id, role) VALUES ($1, $2, 'org_committee')"#)
        .bind(f.applicants[1])
        .bind(f.contest_id)
        .execute(&f.pool)
        .await
        .unwrap();

    let approved = ApplicationService::approve(&f.pool, f.contest_id, &[pending.id]).await;
    match approved {
        Err(AppError::Conflict(message)) => assert!(message.contains(&f.applicants[1].to_string())),
        other => panic!("expected Conflict, got {other:?}"),
    }

    let still_pending = ApplicationService::get_application(&f.pool, f.applicants[1], f.contest_id, pending.id)
        .await
        .unwrap();
    assert_eq!(still_pending.status, ApplicationStatus::Pending);
}

#[tokio::test]
#[ignore = "requires Docker"]
async fn test_file_constraints_are_merged() {
    use contest_engine::handlers::contests::request::ReplaceFileConstraintsRequest;

    let (_container, pool) = start_postgres().await;
    let f = fixture(pool).await;
    let stages = StageResolver::new(Arc::new(PgStageWindows::new(f.pool.clone())), Arc::new(NoopStageCache));

    let dictionary: HashMap<String, Uuid> = ContestService::list_file_constraints(&f.pool)
        .await
        .unwrap()
        .into_iter()
        .map(|c| (c.name, c.id))
        .collect();
    let [images, documents, video] = ["images", "documents", "video"].map(|name| dictionary[name]);

    let first = ContestService::replace_file_constraints(
        &f.pool,
        f.contest_id,
        ReplaceFileConstraintsRequest {
            file_constraint_ids: vec![images, documents, images],
        },
    )
    .await
    .unwrap();
    assert_eq!(first.added.len(), 2);
    assert!(first.removed.is_empty());

    let second = ContestService::replace_file_constraints(
        &f.pool,
        f.contest_id,
        ReplaceFileConstraintsRequest {
            file_constraint_ids: vec![images, video],
        },
    )
    .await
    .unwrap();
    assert_eq!(second.added, vec![video]);
    assert_eq!(second.removed, vec![documents]);

    let unknown = ContestService::replace_file_constraints(
        &f.pool,
        f.contest_id,
        ReplaceFileConstraintsRequest {
            file_constraint_ids: vec![Uuid::new_v4()],
        },
    )
    .await;
    assert!(matches!(unknown, Err(AppError::InvalidInput(_))));

    let detail = ContestService::get_contest(&f.pool, &stages, f.contest_id, f.today).await.unwrap();
    let mut attached: Vec<&str> = detail.file_constraints.iter().map(|c| c.name.as_str()).collect();
    attached.sort();
    assert_eq!(attached, vec!["images", "video"]);
}
