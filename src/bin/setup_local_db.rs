//! Seeds a local database with a small, consistent data set.

use chrono::Utc;
use school_records::bootstrap::initialize_admin_user;
use school_records::errors::AppError;
use school_records::services::notice_service::{self, NoticeInput};
use school_records::services::student_service::{self, StudentInput};
use school_records::services::validation::ResultInput;
use school_records::services::{
    class_service, combination_service, result_service, subject_service,
};
use school_records::{config::APP_CONFIG, db, utils::tracing::init_standard_tracing};

const SUBJECTS: [(&str, &str); 4] = [
    ("Mathematics", "MATH101"),
    ("English", "ENG101"),
    ("Physics", "PHY101"),
    ("Chemistry", "CHEM101"),
];

const STUDENTS: [(&str, &str, &str); 3] = [
    ("10A001", "Aarav Sharma", "Rakesh Sharma"),
    ("10A002", "Mina Thapa", "Bikash Thapa"),
    ("10A003", "Sita Karki", "Hari Karki"),
];

/// Seed data already present counts as success.
fn tolerate_existing<T>(outcome: Result<T, AppError>) -> anyhow::Result<Option<T>> {
    match outcome {
        Ok(value) => Ok(Some(value)),
        Err(AppError::Duplicate { message, .. }) => {
            tracing::info!("Skipping: {}", message);
            Ok(None)
        }
        Err(err) => Err(err.into()),
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    init_standard_tracing(env!("CARGO_CRATE_NAME"), &APP_CONFIG.log_level);

    let db = db::connect(&APP_CONFIG.database_url).await?;
    initialize_admin_user(&db, &APP_CONFIG.admin_username, &APP_CONFIG.admin_password).await?;

    let Some(class) = tolerate_existing(
        class_service::create_class(&db, Some("Class 10".into()), Some("A".into())).await,
    )?
    else {
        tracing::info!("Database already seeded");
        return Ok(());
    };

    let mut subject_ids = Vec::new();
    for (name, code) in SUBJECTS {
        if let Some(subject) = tolerate_existing(
            subject_service::create_subject(&db, Some(name.into()), Some(code.into())).await,
        )? {
            subject_ids.push(subject.subject_id);
        }
    }

    let outcome = combination_service::create_bulk_combinations(
        &db,
        Some(class.class_id),
        subject_ids.clone(),
        Some(true),
    )
    .await?;
    tracing::info!(created = outcome.created.len(), "Combinations seeded");

    let mut candidates = Vec::new();
    for (index, (roll_id, name, father_name)) in STUDENTS.into_iter().enumerate() {
        let Some(student) = tolerate_existing(
            student_service::create_student(
                &db,
                StudentInput {
                    roll_id: Some(roll_id.into()),
                    name: Some(name.into()),
                    father_name: Some(father_name.into()),
                    class_id: Some(class.class_id),
                    phone: Some(format!("98000000{index:02}")),
                    address: Some("Kathmandu".into()),
                    academic_year: None,
                },
            )
            .await,
        )?
        else {
            continue;
        };

        for (offset, subject_id) in subject_ids.iter().enumerate() {
            let marks = 55.0 + ((index * 7 + offset * 11) % 45) as f64;
            candidates.push(ResultInput {
                student_id: Some(student.student_id.to_string()),
                roll_id: Some(student.roll_id.clone()),
                class_id: Some(class.class_id.to_string()),
                subject_id: Some(subject_id.to_string()),
                marks: Some(marks.into()),
                max_marks: Some(100.0_f64.into()),
                exam_type: Some("Final Term".into()),
                academic_year: None,
            });
        }
    }

    if !candidates.is_empty() {
        let outcome = result_service::bulk_create_results(&db, candidates).await?;
        tracing::info!(
            successful = outcome.summary.successful,
            failed = outcome.summary.failed,
            "Results seeded"
        );
    }

    notice_service::create_notice(
        &db,
        NoticeInput {
            title: Some("Final term results published".into()),
            content: Some("Final term results are now available on the portal.".into()),
            priority: Some("high".into()),
            target_audience: Some("students".into()),
            ..Default::default()
        },
        Utc::now().naive_utc(),
    )
    .await?;

    tracing::info!("Local database seeded");
    Ok(())
}
