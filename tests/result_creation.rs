mod common;

use sea_orm::{EntityTrait, PaginatorTrait};
use serde_json::json;
use uuid::Uuid;

use common::{add_student, result_input, seed, setup_db};
use school_records::entities::exam_result;
use school_records::entities::sea_orm_active_enums::{ExamType, Grade};
use school_records::errors::AppError;
use school_records::repositories::{
    CombinationRepository, CombinationUpdate, NewResult, ResultRepository,
};
use school_records::services::grading::current_academic_year;
use school_records::services::result_service::create_result;
use school_records::services::student_service::toggle_student;
use school_records::services::class_service::create_class;
use school_records::services::subject_service::create_subject;
use school_records::services::validation::{MSG_MAX_MARKS_INVALID, MSG_MAX_MARKS_MIN};

async fn result_count(db: &sea_orm::DatabaseConnection) -> u64 {
    exam_result::Entity::find().count(db).await.expect("count results")
}

#[tokio::test]
async fn test_create_result_normalizes_and_derives() {
    let db = setup_db().await;
    let fx = seed(&db).await;

    let mut input = result_input(&fx.student, &fx.subject, 72.0, 100.0);
    input.roll_id = Some("10a001".into());

    let result = create_result(&db, input).await.expect("create result");
    assert_eq!(result.roll_id, "10A001");
    assert_eq!(result.percentage, 72.0);
    assert_eq!(result.grade, Grade::BPlus);
    assert_eq!(result.academic_year, current_academic_year());
    assert_eq!(result.subject_code, "MATH");
}

#[tokio::test]
async fn test_repeated_result_is_duplicate_with_existing_payload() {
    let db = setup_db().await;
    let fx = seed(&db).await;

    let first = create_result(&db, result_input(&fx.student, &fx.subject, 72.0, 100.0))
        .await
        .expect("first result");

    let err = create_result(&db, result_input(&fx.student, &fx.subject, 72.0, 100.0))
        .await
        .expect_err("second result must fail");
    match err {
        AppError::Duplicate { message, existing } => {
            assert!(message.contains("Mathematics"), "{message}");
            let existing = existing.expect("existing payload");
            assert_eq!(existing["marks"], json!(72.0));
            assert_eq!(existing["id"], json!(first.result_id));
        }
        other => panic!("expected Duplicate, got {other:?}"),
    }
    assert_eq!(result_count(&db).await, 1);
}

#[tokio::test]
async fn test_zero_max_marks_is_validation_failure() {
    let db = setup_db().await;
    let fx = seed(&db).await;

    let err = create_result(&db, result_input(&fx.student, &fx.subject, 10.0, 0.0))
        .await
        .expect_err("must fail");
    match err {
        AppError::ValidationFailure(errors) => {
            assert!(errors.iter().any(|e| e == MSG_MAX_MARKS_INVALID), "{errors:?}");
        }
        other => panic!("expected ValidationFailure, got {other:?}"),
    }
    assert_eq!(result_count(&db).await, 0);
}

#[tokio::test]
async fn test_marks_above_maximum_rejected() {
    let db = setup_db().await;
    let fx = seed(&db).await;

    let err = create_result(&db, result_input(&fx.student, &fx.subject, 120.0, 100.0))
        .await
        .expect_err("must fail");
    assert!(matches!(err, AppError::ValidationFailure(_)));
}

#[tokio::test]
async fn test_inactive_combination_is_invalid_state() {
    let db = setup_db().await;
    let fx = seed(&db).await;

    let repo = CombinationRepository::new(&db);
    let combination = repo
        .find_active(fx.class.class_id, fx.subject.subject_id)
        .await
        .expect("query")
        .expect("combination");
    repo.update(
        combination,
        CombinationUpdate {
            is_active: Some(false),
            ..Default::default()
        },
    )
    .await
    .expect("deactivate");

    let err = create_result(&db, result_input(&fx.student, &fx.subject, 72.0, 100.0))
        .await
        .expect_err("must fail");
    assert!(matches!(err, AppError::InvalidState(_)), "{err:?}");
    assert_eq!(result_count(&db).await, 0);
}

#[tokio::test]
async fn test_unassigned_subject_is_invalid_state() {
    let db = setup_db().await;
    let fx = seed(&db).await;
    let physics = create_subject(&db, Some("Physics".into()), Some("PHY101".into()))
        .await
        .expect("create subject");

    let err = create_result(&db, result_input(&fx.student, &physics, 50.0, 100.0))
        .await
        .expect_err("must fail");
    assert!(matches!(err, AppError::InvalidState(_)), "{err:?}");
    assert_eq!(result_count(&db).await, 0);
}

#[tokio::test]
async fn test_missing_student_is_not_found() {
    let db = setup_db().await;
    let fx = seed(&db).await;

    let mut input = result_input(&fx.student, &fx.subject, 72.0, 100.0);
    input.student_id = Some(Uuid::new_v4().to_string());

    let err = create_result(&db, input).await.expect_err("must fail");
    assert_eq!(err.to_string(), "Student not found");
}

#[tokio::test]
async fn test_inactive_student_is_invalid_state() {
    let db = setup_db().await;
    let fx = seed(&db).await;
    toggle_student(&db, fx.student.student_id)
        .await
        .expect("deactivate student");

    let err = create_result(&db, result_input(&fx.student, &fx.subject, 72.0, 100.0))
        .await
        .expect_err("must fail");
    assert!(matches!(err, AppError::InvalidState(_)), "{err:?}");
}

#[tokio::test]
async fn test_roll_id_mismatch_is_conflict() {
    let db = setup_db().await;
    let fx = seed(&db).await;
    let other = add_student(&db, &fx.class, "10A002", "Mina Thapa").await;

    let mut input = result_input(&fx.student, &fx.subject, 72.0, 100.0);
    input.roll_id = Some(other.roll_id);

    let err = create_result(&db, input).await.expect_err("must fail");
    assert!(matches!(err, AppError::Conflict(_)), "{err:?}");
}

#[tokio::test]
async fn test_store_level_duplicate_maps_to_duplicate() {
    let db = setup_db().await;
    let fx = seed(&db).await;
    let repo = ResultRepository::new(&db);

    let row = || NewResult {
        student_id: fx.student.student_id,
        roll_id: fx.student.roll_id.clone(),
        class_id: fx.class.class_id,
        subject_id: fx.subject.subject_id,
        subject_code: fx.subject.code.clone(),
        marks: 40.0,
        max_marks: 50.0,
        exam_type: ExamType::MidTerm,
        percentage: 80.0,
        grade: Grade::A,
        academic_year: "2024-2025".to_string(),
    };

    repo.create(row()).await.expect("first insert");
    let err = repo.create(row()).await.expect_err("unique index must reject");

    let mapped = AppError::from(err);
    assert!(matches!(mapped, AppError::Duplicate { .. }), "{mapped:?}");
    assert_eq!(result_count(&db).await, 1);
}

#[tokio::test]
async fn test_explicit_academic_year_is_kept() {
    let db = setup_db().await;
    let fx = seed(&db).await;

    let mut input = result_input(&fx.student, &fx.subject, 45.0, 50.0);
    input.academic_year = Some("2023-2024".into());
    let result = create_result(&db, input).await.expect("create result");

    assert_eq!(result.academic_year, "2023-2024");
    assert_eq!(result.percentage, 90.0);
    assert_eq!(result.grade, Grade::APlus);
}

#[tokio::test]
async fn test_maximum_below_one_is_validation_failure() {
    let db = setup_db().await;
    let fx = seed(&db).await;

    let err = create_result(&db, result_input(&fx.student, &fx.subject, 0.3, 0.5))
        .await
        .expect_err("must fail");
    match err {
        AppError::ValidationFailure(errors) => assert_eq!(errors, vec![MSG_MAX_MARKS_MIN]),
        other => panic!("expected ValidationFailure, got {other:?}"),
    }
    assert_eq!(result_count(&db).await, 0);
}

#[tokio::test]
async fn test_store_rejects_out_of_range_marks() {
    let db = setup_db().await;
    let fx = seed(&db).await;
    let repo = ResultRepository::new(&db);

    let row = |marks: f64, max_marks: f64| NewResult {
        student_id: fx.student.student_id,
        roll_id: fx.student.roll_id.clone(),
        class_id: fx.class.class_id,
        subject_id: fx.subject.subject_id,
        subject_code: fx.subject.code.clone(),
        marks,
        max_marks,
        exam_type: ExamType::MonthlyTest,
        percentage: 60.0,
        grade: Grade::B,
        academic_year: "2024-2025".to_string(),
    };

    repo.create(row(0.3, 0.5))
        .await
        .expect_err("maximum below 1 must be rejected");
    repo.create(row(-1.0, 10.0))
        .await
        .expect_err("negative marks must be rejected");
    assert_eq!(result_count(&db).await, 0);
}

#[tokio::test]
async fn test_missing_class_is_not_found() {
    let db = setup_db().await;
    let fx = seed(&db).await;

    let mut input = result_input(&fx.student, &fx.subject, 72.0, 100.0);
    input.class_id = Some(Uuid::new_v4().to_string());

    let err = create_result(&db, input).await.expect_err("must fail");
    assert!(matches!(err, AppError::NotFound(_)), "{err:?}");
    assert_eq!(err.to_string(), "Class not found");
}

#[tokio::test]
async fn test_missing_subject_is_not_found() {
    let db = setup_db().await;
    let fx = seed(&db).await;

    let mut input = result_input(&fx.student, &fx.subject, 72.0, 100.0);
    input.subject_id = Some(Uuid::new_v4().to_string());

    let err = create_result(&db, input).await.expect_err("must fail");
    assert!(matches!(err, AppError::NotFound(_)), "{err:?}");
    assert_eq!(err.to_string(), "Subject not found");
}

#[tokio::test]
async fn test_student_from_other_class_is_conflict() {
    let db = setup_db().await;
    let fx = seed(&db).await;
    let class_9 = create_class(&db, Some("Class 9".into()), Some("B".into()))
        .await
        .expect("create class");
    let outsider = add_student(&db, &class_9, "9B001", "Rohan Karki").await;

    let mut input = result_input(&outsider, &fx.subject, 60.0, 100.0);
    input.class_id = Some(fx.class.class_id.to_string());

    let err = create_result(&db, input).await.expect_err("must fail");
    assert!(matches!(err, AppError::Conflict(_)), "{err:?}");
    assert_eq!(err.to_string(), "Student does not belong to this class");
    assert_eq!(result_count(&db).await, 0);
}

#[tokio::test]
async fn test_earliest_failing_check_wins() {
    let db = setup_db().await;
    let fx = seed(&db).await;
    let physics = create_subject(&db, Some("Physics".into()), Some("PHY101".into()))
        .await
        .expect("create subject");
    let class_9 = create_class(&db, Some("Class 9".into()), Some("B".into()))
        .await
        .expect("create class");
    let outsider = add_student(&db, &class_9, "9B001", "Rohan Karki").await;

    // Missing class and unassigned subject.
    let mut input = result_input(&fx.student, &physics, 50.0, 100.0);
    input.class_id = Some(Uuid::new_v4().to_string());
    let err = create_result(&db, input).await.expect_err("must fail");
    assert_eq!(err.to_string(), "Class not found");

    // Missing subject and wrong class for the student.
    let mut input = result_input(&outsider, &fx.subject, 50.0, 100.0);
    input.class_id = Some(fx.class.class_id.to_string());
    input.subject_id = Some(Uuid::new_v4().to_string());
    let err = create_result(&db, input).await.expect_err("must fail");
    assert_eq!(err.to_string(), "Subject not found");

    // Wrong class and mismatched roll id.
    let mut input = result_input(&outsider, &fx.subject, 50.0, 100.0);
    input.class_id = Some(fx.class.class_id.to_string());
    input.roll_id = Some(fx.student.roll_id.clone());
    let err = create_result(&db, input).await.expect_err("must fail");
    assert_eq!(err.to_string(), "Student does not belong to this class");

    // Unassigned subject and mismatched roll id.
    let mut input = result_input(&fx.student, &physics, 50.0, 100.0);
    input.roll_id = Some(outsider.roll_id.clone());
    let err = create_result(&db, input).await.expect_err("must fail");
    assert_eq!(err.to_string(), "Subject is not assigned to this class");

    assert_eq!(result_count(&db).await, 0);
}
