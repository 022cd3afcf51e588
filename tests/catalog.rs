mod common;

use sea_orm::{ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter};

use common::{add_student, add_subject, result_input, seed, setup_db};
use school_records::entities::{combination, exam_result, subject};
use school_records::errors::AppError;
use school_records::repositories::ResultRepository;
use school_records::services::combination_service::{
    create_bulk_combinations, create_combination, toggle_combination,
};
use school_records::services::result_service::create_result;
use school_records::services::student_service::{
    StudentChanges, StudentInput, create_student, student_stats, update_student,
};
use school_records::services::{class_service, subject_service};

#[tokio::test]
async fn test_duplicate_class_name_and_section() {
    let db = setup_db().await;
    class_service::create_class(&db, Some("Class 9".into()), Some("B".into()))
        .await
        .expect("create");

    let err = class_service::create_class(&db, Some("Class 9".into()), Some("B".into()))
        .await
        .expect_err("duplicate");
    assert!(matches!(err, AppError::Duplicate { .. }));

    class_service::create_class(&db, Some("Class 9".into()), Some("C".into()))
        .await
        .expect("other section is fine");
}

#[tokio::test]
async fn test_class_requires_name_and_section() {
    let db = setup_db().await;
    let err = class_service::create_class(&db, Some("  ".into()), None)
        .await
        .expect_err("blank");
    match err {
        AppError::ValidationFailure(errors) => {
            assert_eq!(errors, vec!["Class name is required", "Section is required"]);
        }
        other => panic!("expected ValidationFailure, got {other:?}"),
    }
}

#[tokio::test]
async fn test_subject_code_is_uppercased_and_unique() {
    let db = setup_db().await;
    let subject = subject_service::create_subject(&db, Some("Biology".into()), Some("bio1".into()))
        .await
        .expect("create");
    assert_eq!(subject.code, "BIO1");

    let err = subject_service::create_subject(&db, Some("Botany".into()), Some("BIO1".into()))
        .await
        .expect_err("code taken");
    assert!(matches!(err, AppError::Duplicate { .. }));
}

#[tokio::test]
async fn test_delete_subject_cascades_by_code() {
    let db = setup_db().await;
    let fx = seed(&db).await;
    let english = add_subject(&db, &fx.class, "English", "ENG101").await;
    create_result(&db, result_input(&fx.student, &fx.subject, 72.0, 100.0))
        .await
        .expect("math result");
    create_result(&db, result_input(&fx.student, &english, 64.0, 100.0))
        .await
        .expect("english result");

    let deletion = subject_service::delete_subject(&db, fx.subject.subject_id)
        .await
        .expect("delete subject");

    assert_eq!(deletion.name, "Mathematics");
    assert_eq!(deletion.deleted.subject, 1);
    assert_eq!(deletion.deleted.combinations, 1);
    assert_eq!(deletion.deleted.results, 1);
    assert_eq!(deletion.deleted.total, 3);

    let code = fx.subject.code.as_str();
    let combinations = combination::Entity::find()
        .filter(combination::Column::SubjectCode.eq(code))
        .count(&db)
        .await
        .expect("count combinations");
    let results = ResultRepository::new(&db)
        .count_by_subject_code(code)
        .await
        .expect("count results");
    let subject = subject::Entity::find_by_id(fx.subject.subject_id)
        .one(&db)
        .await
        .expect("find subject");
    assert_eq!(combinations, 0);
    assert_eq!(results, 0);
    assert!(subject.is_none());

    let remaining = exam_result::Entity::find().count(&db).await.expect("count");
    assert_eq!(remaining, 1);
}

#[tokio::test]
async fn test_delete_missing_subject_is_not_found() {
    let db = setup_db().await;
    let err = subject_service::delete_subject(&db, uuid::Uuid::new_v4())
        .await
        .expect_err("missing");
    assert_eq!(err.to_string(), "Subject not found");
}

#[tokio::test]
async fn test_subject_code_change_propagates() {
    let db = setup_db().await;
    let fx = seed(&db).await;
    let result = create_result(&db, result_input(&fx.student, &fx.subject, 72.0, 100.0))
        .await
        .expect("result");

    subject_service::update_subject(&db, fx.subject.subject_id, None, Some("math9".into()))
        .await
        .expect("update code");

    let combo = combination::Entity::find()
        .filter(combination::Column::SubjectId.eq(fx.subject.subject_id))
        .one(&db)
        .await
        .expect("query")
        .expect("combination");
    let stored = exam_result::Entity::find_by_id(result.result_id)
        .one(&db)
        .await
        .expect("query")
        .expect("result");
    assert_eq!(combo.subject_code, "MATH9");
    assert_eq!(stored.subject_code, "MATH9");
}

#[tokio::test]
async fn test_roll_id_change_propagates_to_results() {
    let db = setup_db().await;
    let fx = seed(&db).await;
    let result = create_result(&db, result_input(&fx.student, &fx.subject, 72.0, 100.0))
        .await
        .expect("result");

    let student = update_student(
        &db,
        fx.student.student_id,
        StudentChanges {
            roll_id: Some("10a099".into()),
            ..Default::default()
        },
    )
    .await
    .expect("update student");
    assert_eq!(student.roll_id, "10A099");

    let stored = exam_result::Entity::find_by_id(result.result_id)
        .one(&db)
        .await
        .expect("query")
        .expect("result");
    assert_eq!(stored.roll_id, "10A099");
}

#[tokio::test]
async fn test_student_roll_id_is_unique_case_insensitively() {
    let db = setup_db().await;
    let fx = seed(&db).await;

    let err = create_student(
        &db,
        StudentInput {
            roll_id: Some("10a001".into()),
            name: Some("Someone Else".into()),
            father_name: Some("Father".into()),
            class_id: Some(fx.class.class_id),
            phone: Some("9811111111".into()),
            address: Some("Lalitpur".into()),
            academic_year: None,
        },
    )
    .await
    .expect_err("roll id taken");
    assert!(matches!(err, AppError::Duplicate { .. }));
}

#[tokio::test]
async fn test_student_requires_fields_in_order() {
    let db = setup_db().await;
    let err = create_student(&db, StudentInput::default())
        .await
        .expect_err("empty input");
    match err {
        AppError::ValidationFailure(errors) => {
            assert_eq!(errors.first().map(String::as_str), Some("Roll ID is required"));
            assert_eq!(errors.len(), 6);
        }
        other => panic!("expected ValidationFailure, got {other:?}"),
    }
}

#[tokio::test]
async fn test_student_stats_counts() {
    let db = setup_db().await;
    let fx = seed(&db).await;
    add_student(&db, &fx.class, "10A002", "Mina Thapa").await;
    school_records::services::student_service::toggle_student(&db, fx.student.student_id)
        .await
        .expect("toggle");

    let stats = student_stats(&db).await.expect("stats");
    assert_eq!(stats.total_students, 2);
    assert_eq!(stats.active_students, 1);
    assert_eq!(stats.inactive_students, 1);
    assert_eq!(stats.students_by_class.len(), 1);
    assert_eq!(stats.students_by_class[0].count, 2);
    assert_eq!(stats.students_by_year[0].count, 2);
}

#[tokio::test]
async fn test_combination_duplicate_and_toggle() {
    let db = setup_db().await;
    let fx = seed(&db).await;

    let err = create_combination(&db, fx.class.class_id, fx.subject.subject_id, None)
        .await
        .expect_err("already linked");
    assert!(matches!(err, AppError::Duplicate { .. }));

    let combo = combination::Entity::find()
        .one(&db)
        .await
        .expect("query")
        .expect("combination");
    assert!(combo.is_active);
    let toggled = toggle_combination(&db, combo.combination_id)
        .await
        .expect("toggle");
    assert!(!toggled.is_active);
}

#[tokio::test]
async fn test_bulk_combinations_skip_existing() {
    let db = setup_db().await;
    let fx = seed(&db).await;
    let english = subject_service::create_subject(&db, Some("English".into()), Some("ENG101".into()))
        .await
        .expect("english");
    let physics = subject_service::create_subject(&db, Some("Physics".into()), Some("PHY101".into()))
        .await
        .expect("physics");

    let outcome = create_bulk_combinations(
        &db,
        Some(fx.class.class_id),
        vec![fx.subject.subject_id, english.subject_id, physics.subject_id],
        None,
    )
    .await
    .expect("bulk");

    assert_eq!(outcome.created.len(), 2);
    assert_eq!(outcome.skipped, 1);
    assert_eq!(outcome.total, 3);
    assert!(outcome.created.iter().all(|c| c.is_active));

    let err = create_bulk_combinations(&db, Some(fx.class.class_id), vec![uuid::Uuid::new_v4()], None)
        .await
        .expect_err("unknown subject");
    assert_eq!(err.to_string(), "One or more subjects not found");

    let err = create_bulk_combinations(&db, None, vec![english.subject_id], None)
        .await
        .expect_err("no class");
    assert!(matches!(err, AppError::BadRequest(_)));
}
