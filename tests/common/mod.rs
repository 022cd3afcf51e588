#![allow(dead_code)]

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header},
};
use http_body_util::BodyExt;
use migration::{Migrator, MigratorTrait};
use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use serde_json::Value;
use tower::ServiceExt;

use school_records::app::create_app;
use school_records::entities::{admin, class, student, subject};
use school_records::repositories::AdminRepository;
use school_records::services::student_service::{self, StudentInput};
use school_records::services::validation::ResultInput;
use school_records::services::{class_service, combination_service, subject_service};
use school_records::state::{AppState, Settings};
use school_records::utils::jwt::JwtManager;

pub const ADMIN_USERNAME: &str = "admin@gmail.com";
pub const ADMIN_PASSWORD: &str = "admin123";

/// Fresh in-memory database with the full schema.
pub async fn setup_db() -> DatabaseConnection {
    let mut options = ConnectOptions::new("sqlite::memory:");
    options
        .max_connections(1)
        .min_connections(1)
        .sqlx_logging(false);
    let db = Database::connect(options).await.expect("connect sqlite");
    Migrator::up(&db, None).await.expect("run migrations");
    db
}

pub struct Fixture {
    pub class: class::Model,
    pub subject: subject::Model,
    pub student: student::Model,
}

/// Class 10-A offering Mathematics, with student 10A001 enrolled.
pub async fn seed(db: &DatabaseConnection) -> Fixture {
    let class = class_service::create_class(db, Some("Class 10".into()), Some("A".into()))
        .await
        .expect("create class");
    let subject = subject_service::create_subject(db, Some("Mathematics".into()), Some("math".into()))
        .await
        .expect("create subject");
    combination_service::create_combination(db, class.class_id, subject.subject_id, None)
        .await
        .expect("create combination");
    let student = add_student(db, &class, "10A001", "Aarav Sharma").await;

    Fixture {
        class,
        subject,
        student,
    }
}

pub async fn add_student(
    db: &DatabaseConnection,
    class: &class::Model,
    roll_id: &str,
    name: &str,
) -> student::Model {
    student_service::create_student(
        db,
        StudentInput {
            roll_id: Some(roll_id.into()),
            name: Some(name.into()),
            father_name: Some("Father".into()),
            class_id: Some(class.class_id),
            phone: Some("9800000000".into()),
            address: Some("Kathmandu".into()),
            academic_year: None,
        },
    )
    .await
    .expect("create student")
}

pub async fn add_subject(
    db: &DatabaseConnection,
    class: &class::Model,
    name: &str,
    code: &str,
) -> subject::Model {
    let subject = subject_service::create_subject(db, Some(name.into()), Some(code.into()))
        .await
        .expect("create subject");
    combination_service::create_combination(db, class.class_id, subject.subject_id, None)
        .await
        .expect("create combination");
    subject
}

pub fn result_input(
    student: &student::Model,
    subject: &subject::Model,
    marks: f64,
    max_marks: f64,
) -> ResultInput {
    ResultInput {
        student_id: Some(student.student_id.to_string()),
        roll_id: Some(student.roll_id.clone()),
        class_id: Some(student.class_id.to_string()),
        subject_id: Some(subject.subject_id.to_string()),
        marks: Some(marks.into()),
        max_marks: Some(max_marks.into()),
        exam_type: Some("Final Term".into()),
        academic_year: None,
    }
}

pub fn test_state(db: DatabaseConnection) -> AppState {
    AppState::new(db, JwtManager::new("test-secret", 1), Settings::default())
}

/// Inserts the administrator with a cheap hash.
pub async fn create_admin(db: &DatabaseConnection) -> admin::Model {
    let hash = bcrypt::hash(ADMIN_PASSWORD, 4).expect("hash password");
    AdminRepository::new(db)
        .create(ADMIN_USERNAME.to_string(), hash)
        .await
        .expect("create admin")
}

pub async fn admin_token(state: &AppState) -> String {
    let admin = create_admin(&state.db).await;
    state
        .jwt
        .create_jwt(admin.admin_id, &admin.username)
        .expect("create token")
}

pub fn router(state: AppState) -> Router {
    create_app(state)
}

pub async fn send(
    app: &Router,
    method: &str,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    let request = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string())),
        None => builder.body(Body::empty()),
    }
    .expect("build request");

    let response = app.clone().oneshot(request).await.expect("send request");
    let status = response.status();
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("read body")
        .to_bytes();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).expect("json body")
    };
    (status, value)
}
