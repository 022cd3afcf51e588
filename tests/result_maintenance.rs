mod common;

use common::{add_student, add_subject, result_input, seed, setup_db};
use school_records::entities::sea_orm_active_enums::{ExamType, Grade};
use school_records::errors::AppError;
use school_records::repositories::ResultFilter;
use school_records::services::result_service::{
    bulk_create_results, create_result, delete_all_results, delete_results, result_stats,
    student_summary, update_result,
};
use school_records::services::validation::{MSG_MARKS_EXCEED_MAX, ResultUpdate};

#[tokio::test]
async fn test_update_marks_recomputes_grade() {
    let db = setup_db().await;
    let fx = seed(&db).await;
    let result = create_result(&db, result_input(&fx.student, &fx.subject, 72.0, 100.0))
        .await
        .expect("create");

    let updated = update_result(
        &db,
        result.result_id,
        ResultUpdate {
            marks: Some(95.0_f64.into()),
            ..Default::default()
        },
    )
    .await
    .expect("update");

    assert_eq!(updated.marks, 95.0);
    assert_eq!(updated.percentage, 95.0);
    assert_eq!(updated.grade, Grade::APlus);
}

#[tokio::test]
async fn test_update_checks_single_side_against_stored_value() {
    let db = setup_db().await;
    let fx = seed(&db).await;
    let result = create_result(&db, result_input(&fx.student, &fx.subject, 72.0, 100.0))
        .await
        .expect("create");

    let err = update_result(
        &db,
        result.result_id,
        ResultUpdate {
            max_marks: Some(50.0_f64.into()),
            ..Default::default()
        },
    )
    .await
    .expect_err("72 exceeds 50");

    match err {
        AppError::ValidationFailure(errors) => {
            assert_eq!(errors, vec![MSG_MARKS_EXCEED_MAX.to_string()]);
        }
        other => panic!("expected ValidationFailure, got {other:?}"),
    }
}

#[tokio::test]
async fn test_update_rejects_identity_change() {
    let db = setup_db().await;
    let fx = seed(&db).await;
    let result = create_result(&db, result_input(&fx.student, &fx.subject, 72.0, 100.0))
        .await
        .expect("create");

    let err = update_result(
        &db,
        result.result_id,
        ResultUpdate {
            student_id: Some(uuid::Uuid::new_v4().to_string()),
            ..Default::default()
        },
    )
    .await
    .expect_err("identity is fixed");

    match err {
        AppError::ValidationFailure(errors) => {
            assert!(errors.contains(&"Student ID cannot be changed".to_string()));
        }
        other => panic!("expected ValidationFailure, got {other:?}"),
    }
}

#[tokio::test]
async fn test_update_into_taken_slot_is_duplicate() {
    let db = setup_db().await;
    let fx = seed(&db).await;
    create_result(&db, result_input(&fx.student, &fx.subject, 72.0, 100.0))
        .await
        .expect("final term");
    let mut mid_term = result_input(&fx.student, &fx.subject, 30.0, 50.0);
    mid_term.exam_type = Some("Mid Term".into());
    let mid_term = create_result(&db, mid_term).await.expect("mid term");

    let err = update_result(
        &db,
        mid_term.result_id,
        ResultUpdate {
            exam_type: Some("Final Term".into()),
            ..Default::default()
        },
    )
    .await
    .expect_err("slot taken");
    assert!(matches!(err, AppError::Duplicate { .. }), "{err:?}");
}

#[tokio::test]
async fn test_bulk_create_reports_failing_index() {
    let db = setup_db().await;
    let fx = seed(&db).await;
    let english = add_subject(&db, &fx.class, "English", "ENG101").await;
    let physics = add_subject(&db, &fx.class, "Physics", "PHY101").await;

    let mut missing_subject = result_input(&fx.student, &english, 60.0, 100.0);
    missing_subject.subject_id = None;

    let outcome = bulk_create_results(
        &db,
        vec![
            result_input(&fx.student, &fx.subject, 81.0, 100.0),
            missing_subject,
            result_input(&fx.student, &physics, 55.0, 100.0),
        ],
    )
    .await
    .expect("bulk create");

    assert_eq!(outcome.summary.total, 3);
    assert_eq!(outcome.summary.successful, 2);
    assert_eq!(outcome.summary.failed, 1);
    assert_eq!(outcome.created.len(), 2);
    assert_eq!(outcome.errors.len(), 1);
    assert_eq!(outcome.errors[0].index, 1);
    assert_eq!(outcome.errors[0].error, "Missing required fields: subjectId");
}

#[tokio::test]
async fn test_bulk_create_records_duplicates_per_item() {
    let db = setup_db().await;
    let fx = seed(&db).await;

    let outcome = bulk_create_results(
        &db,
        vec![
            result_input(&fx.student, &fx.subject, 81.0, 100.0),
            result_input(&fx.student, &fx.subject, 82.0, 100.0),
        ],
    )
    .await
    .expect("bulk create");

    assert_eq!(outcome.summary.successful, 1);
    assert_eq!(outcome.errors[0].index, 1);
    assert!(outcome.errors[0].error.contains("already exists"));
}

#[tokio::test]
async fn test_bulk_create_rejects_empty_batch() {
    let db = setup_db().await;
    let err = bulk_create_results(&db, Vec::new())
        .await
        .expect_err("empty batch");
    assert!(matches!(err, AppError::BadRequest(_)));
}

#[tokio::test]
async fn test_summary_groups_by_exam() {
    let db = setup_db().await;
    let fx = seed(&db).await;
    let english = add_subject(&db, &fx.class, "English", "ENG101").await;

    create_result(&db, result_input(&fx.student, &fx.subject, 80.0, 100.0))
        .await
        .expect("math");
    create_result(&db, result_input(&fx.student, &english, 60.0, 100.0))
        .await
        .expect("english");
    let mut monthly = result_input(&fx.student, &fx.subject, 20.0, 25.0);
    monthly.exam_type = Some("Monthly Test".into());
    create_result(&db, monthly).await.expect("monthly");

    let summary = student_summary(&db, fx.student.student_id, None)
        .await
        .expect("summary");

    assert_eq!(summary.total_results, 3);
    assert_eq!(summary.exams.len(), 2);
    let final_term = summary
        .exams
        .iter()
        .find(|exam| exam.exam_type == ExamType::FinalTerm)
        .expect("final term group");
    assert_eq!(final_term.subjects, 2);
    assert_eq!(final_term.total_marks, 140.0);
    assert_eq!(final_term.percentage, 70.0);
    assert_eq!(final_term.grade, Grade::BPlus);
}

#[tokio::test]
async fn test_stats_rank_top_performers() {
    let db = setup_db().await;
    let fx = seed(&db).await;
    let second = add_student(&db, &fx.class, "10A002", "Mina Thapa").await;

    create_result(&db, result_input(&fx.student, &fx.subject, 65.0, 100.0))
        .await
        .expect("first");
    create_result(&db, result_input(&second, &fx.subject, 92.0, 100.0))
        .await
        .expect("second");

    let stats = result_stats(&db, ResultFilter::default())
        .await
        .expect("stats");

    assert_eq!(stats.total_results, 2);
    assert_eq!(stats.top_performers[0].roll_id, "10A002");
    assert_eq!(stats.avg_by_subject.len(), 1);
    assert_eq!(stats.avg_by_subject[0].avg_marks, 78.5);
    assert_eq!(stats.grade_distribution[0].grade, Grade::APlus);
}

#[tokio::test]
async fn test_bulk_and_full_deletion() {
    let db = setup_db().await;
    let fx = seed(&db).await;
    let english = add_subject(&db, &fx.class, "English", "ENG101").await;

    let first = create_result(&db, result_input(&fx.student, &fx.subject, 80.0, 100.0))
        .await
        .expect("math");
    create_result(&db, result_input(&fx.student, &english, 60.0, 100.0))
        .await
        .expect("english");

    assert!(matches!(
        delete_results(&db, Vec::new()).await,
        Err(AppError::BadRequest(_))
    ));
    assert_eq!(
        delete_results(&db, vec![first.result_id]).await.expect("delete"),
        1
    );
    assert_eq!(delete_all_results(&db).await.expect("delete all"), 1);
}
