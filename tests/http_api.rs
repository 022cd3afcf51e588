mod common;

use axum::http::StatusCode;
use serde_json::json;

use common::{
    ADMIN_PASSWORD, ADMIN_USERNAME, admin_token, create_admin, router, seed, send, setup_db,
    test_state,
};

#[tokio::test]
async fn test_health_check() {
    let app = router(test_state(setup_db().await));

    let (status, body) = send(&app, "GET", "/api/health", None, None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["message"], "Server is running");
    assert!(body["timestamp"].is_string());
}

#[tokio::test]
async fn test_unknown_route() {
    let app = router(test_state(setup_db().await));

    let (status, body) = send(&app, "GET", "/api/nowhere", None, None).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({ "success": false, "message": "Route not found" }));
}

#[tokio::test]
async fn test_login() {
    let db = setup_db().await;
    create_admin(&db).await;
    let app = router(test_state(db));

    let (status, body) = send(
        &app,
        "POST",
        "/api/auth/login",
        None,
        Some(json!({ "username": ADMIN_USERNAME, "password": ADMIN_PASSWORD })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["username"], ADMIN_USERNAME);
    assert!(body["data"]["token"].as_str().is_some_and(|t| !t.is_empty()));

    let (status, body) = send(
        &app,
        "POST",
        "/api/auth/login",
        None,
        Some(json!({ "username": ADMIN_USERNAME, "password": "wrong" })),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["message"], "Invalid username or password");

    let (status, body) = send(
        &app,
        "POST",
        "/api/auth/login",
        None,
        Some(json!({ "username": ADMIN_USERNAME })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Please provide username and password");
}

#[tokio::test]
async fn test_writes_require_token() {
    let app = router(test_state(setup_db().await));
    let payload = json!({ "name": "Class 9", "section": "B" });

    let (status, body) = send(&app, "POST", "/api/classes", None, Some(payload.clone())).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["message"], "Not authorized, no token");

    let (status, body) = send(&app, "POST", "/api/classes", Some("garbage"), Some(payload)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["message"], "Not authorized, token failed");
}

#[tokio::test]
async fn test_class_lifecycle_over_http() {
    let state = test_state(setup_db().await);
    let token = admin_token(&state).await;
    let app = router(state);

    let (status, body) = send(
        &app,
        "POST",
        "/api/classes",
        Some(&token),
        Some(json!({ "name": "Class 9", "section": "B" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["message"], "Class created successfully");
    let class_id = body["data"]["id"].as_str().expect("class id").to_string();

    let (status, body) = send(
        &app,
        "POST",
        "/api/classes",
        Some(&token),
        Some(json!({ "name": "Class 9", "section": "B" })),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["message"], "Class with this name and section already exists");

    let (status, body) = send(&app, "GET", "/api/classes", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["count"], 1);

    let (status, body) = send(
        &app,
        "DELETE",
        &format!("/api/classes/{class_id}"),
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Class deleted successfully");

    let (status, _) = send(&app, "GET", &format!("/api/classes/{class_id}"), None, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_malformed_id_is_bad_request() {
    let app = router(test_state(setup_db().await));

    let (status, body) = send(&app, "GET", "/api/classes/not-a-uuid", None, None).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Invalid ID format");
}

#[tokio::test]
async fn test_result_submission_over_http() {
    let state = test_state(setup_db().await);
    let fixture = seed(&state.db).await;
    let token = admin_token(&state).await;
    let app = router(state);

    let payload = json!({
        "studentId": fixture.student.student_id,
        "rollId": "10a001",
        "classId": fixture.class.class_id,
        "subjectId": fixture.subject.subject_id,
        "marks": 72,
        "maxMarks": 100,
        "examType": "Final Term",
    });

    let (status, body) = send(&app, "POST", "/api/results", Some(&token), Some(payload.clone())).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["message"], "Result added successfully");
    assert_eq!(body["data"]["grade"], "B+");

    let (status, body) = send(&app, "POST", "/api/results", Some(&token), Some(payload.clone())).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["success"], false);
    assert_eq!(body["existing"]["marks"].as_f64(), Some(72.0));

    let mut invalid = payload;
    invalid["marks"] = json!(120);
    invalid["examType"] = json!("Mid Term");
    let (status, body) = send(&app, "POST", "/api/results", Some(&token), Some(invalid)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Validation failed");
    assert_eq!(body["errors"], json!(["Marks cannot exceed maximum marks"]));

    let (status, body) = send(
        &app,
        "GET",
        &format!("/api/results/student/{}", fixture.student.student_id),
        None,
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["count"], 1);
}
