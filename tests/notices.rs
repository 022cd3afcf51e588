mod common;

use chrono::{Duration, NaiveDateTime, Utc};

use common::setup_db;
use school_records::entities::sea_orm_active_enums::{NoticePriority, TargetAudience};
use school_records::errors::AppError;
use school_records::services::notice_service::{
    NoticeChanges, NoticeInput, NoticeQuery, active_notices, create_notice, list_notices,
    notice_stats, notices_by_priority, toggle_notice, update_notice,
};

fn now() -> NaiveDateTime {
    Utc::now().naive_utc()
}

fn notice(title: &str, priority: &str) -> NoticeInput {
    NoticeInput {
        title: Some(title.into()),
        content: Some(format!("{title} details")),
        priority: Some(priority.into()),
        ..Default::default()
    }
}

fn expiring_in(input: NoticeInput, at: NaiveDateTime) -> NoticeInput {
    NoticeInput {
        expiry_date: Some(at.format("%Y-%m-%dT%H:%M:%S").to_string()),
        ..input
    }
}

#[tokio::test]
async fn test_create_notice_defaults() {
    let db = setup_db().await;
    let created = create_notice(
        &db,
        NoticeInput {
            title: Some("Holiday".into()),
            content: Some("School closed on Friday".into()),
            ..Default::default()
        },
        now(),
    )
    .await
    .expect("create");

    assert!(created.is_active);
    assert_eq!(created.priority, NoticePriority::Medium);
    assert_eq!(created.target_audience, TargetAudience::All);
    assert_eq!(created.created_by, "Admin");
    assert!(created.expiry_date.is_none());
}

#[tokio::test]
async fn test_create_notice_validation() {
    let db = setup_db().await;

    let err = create_notice(
        &db,
        NoticeInput {
            title: Some("x".repeat(201)),
            content: None,
            priority: Some("critical".into()),
            ..Default::default()
        },
        now(),
    )
    .await
    .expect_err("invalid");
    match err {
        AppError::ValidationFailure(errors) => {
            assert_eq!(
                errors,
                vec![
                    "Title cannot exceed 200 characters",
                    "Notice content is required",
                    "Priority must be one of: low, medium, high, urgent",
                ]
            );
        }
        other => panic!("expected ValidationFailure, got {other:?}"),
    }

    let past = now() - Duration::days(1);
    let err = create_notice(&db, expiring_in(notice("Late", "low"), past), now())
        .await
        .expect_err("past expiry");
    assert_eq!(err.to_string(), "Expiry date must be in the future");

    let mut garbled = notice("Garbled", "low");
    garbled.expiry_date = Some("next tuesday".into());
    let err = create_notice(&db, garbled, now()).await.expect_err("bad date");
    assert_eq!(err.to_string(), "Invalid expiry date format");
}

#[tokio::test]
async fn test_update_after_expiry_deactivates() {
    let db = setup_db().await;
    let t0 = now();
    let created = create_notice(
        &db,
        expiring_in(notice("Exam schedule", "high"), t0 + Duration::days(1)),
        t0,
    )
    .await
    .expect("create");
    assert!(created.is_active);

    let later = t0 + Duration::days(2);
    let updated = update_notice(
        &db,
        created.notice_id,
        NoticeChanges {
            content: Some("Revised schedule".into()),
            is_active: Some(true),
            ..Default::default()
        },
        later,
    )
    .await
    .expect("update");

    assert!(!updated.is_active);
    assert_eq!(updated.content, "Revised schedule");
    assert!(updated.is_expired_at(later));
}

#[tokio::test]
async fn test_clearing_expiry_keeps_notice_active() {
    let db = setup_db().await;
    let t0 = now();
    let created = create_notice(
        &db,
        expiring_in(notice("Sports day", "low"), t0 + Duration::days(3)),
        t0,
    )
    .await
    .expect("create");

    let updated = update_notice(
        &db,
        created.notice_id,
        NoticeChanges {
            expiry_date: Some(None),
            ..Default::default()
        },
        t0,
    )
    .await
    .expect("update");
    assert!(updated.expiry_date.is_none());
    assert!(updated.is_active);
}

#[tokio::test]
async fn test_toggle_cannot_activate_expired_notice() {
    let db = setup_db().await;
    let t0 = now();
    let created = create_notice(
        &db,
        expiring_in(notice("Fee deadline", "urgent"), t0 + Duration::hours(1)),
        t0,
    )
    .await
    .expect("create");

    let off = toggle_notice(&db, created.notice_id, t0).await.expect("toggle off");
    assert!(!off.is_active);

    let later = t0 + Duration::hours(2);
    let still_off = toggle_notice(&db, created.notice_id, later)
        .await
        .expect("toggle on");
    assert!(!still_off.is_active);
}

#[tokio::test]
async fn test_active_notices_sorted_by_priority() {
    let db = setup_db().await;
    let t0 = now();
    for (title, priority) in [("Low", "low"), ("Urgent", "urgent"), ("Medium", "medium")] {
        create_notice(&db, notice(title, priority), t0).await.expect("create");
    }
    create_notice(
        &db,
        expiring_in(notice("Soon gone", "high"), t0 + Duration::hours(1)),
        t0,
    )
    .await
    .expect("create");

    let later = t0 + Duration::hours(2);
    let active = active_notices(&db, None, None, later).await.expect("active");
    let titles: Vec<&str> = active.iter().map(|n| n.title.as_str()).collect();
    assert_eq!(titles, vec!["Urgent", "Medium", "Low"]);
}

#[tokio::test]
async fn test_list_paginates_and_hides_expired() {
    let db = setup_db().await;
    let t0 = now();
    for index in 0..5 {
        create_notice(&db, notice(&format!("Notice {index}"), "low"), t0)
            .await
            .expect("create");
    }
    create_notice(
        &db,
        expiring_in(notice("Expiring", "low"), t0 + Duration::hours(1)),
        t0,
    )
    .await
    .expect("create");

    let later = t0 + Duration::hours(2);
    let page = list_notices(
        &db,
        NoticeQuery {
            page: Some(2),
            limit: Some(2),
            ..Default::default()
        },
        later,
    )
    .await
    .expect("list");
    assert_eq!(page.total, 5);
    assert_eq!(page.pages, 3);
    assert_eq!(page.page, 2);
    assert_eq!(page.notices.len(), 2);

    let with_expired = list_notices(
        &db,
        NoticeQuery {
            include_expired: true,
            search: Some("expir".into()),
            ..Default::default()
        },
        later,
    )
    .await
    .expect("list");
    assert_eq!(with_expired.total, 1);
}

#[tokio::test]
async fn test_priority_listing_and_stats() {
    let db = setup_db().await;
    let t0 = now();
    create_notice(&db, notice("A", "high"), t0).await.expect("create");
    create_notice(&db, notice("B", "high"), t0).await.expect("create");
    create_notice(&db, notice("C", "low"), t0).await.expect("create");

    let high = notices_by_priority(&db, "HIGH", None, None)
        .await
        .expect("by priority");
    assert_eq!(high.len(), 2);

    let err = notices_by_priority(&db, "critical", None, None)
        .await
        .expect_err("unknown priority");
    assert!(matches!(err, AppError::ValidationFailure(_)));

    let stats = notice_stats(&db, t0).await.expect("stats");
    assert_eq!(stats.total_notices, 3);
    assert_eq!(stats.active_notices, 3);
    assert_eq!(stats.expired_notices, 0);
    assert_eq!(stats.recent_notices, 3);
    let high_count = stats
        .notices_by_priority
        .iter()
        .find(|p| p.priority == NoticePriority::High)
        .map(|p| p.count);
    assert_eq!(high_count, Some(2));
}
