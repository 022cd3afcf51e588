use sea_orm::{ConnectionTrait, DatabaseConnection, TransactionTrait};
use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

use super::{required, trimmed};
use crate::entities::subject;
use crate::errors::{AppError, AppResult};
use crate::repositories::{
    CombinationRepository, ResultRepository, SubjectRepository, SubjectUpdate,
};

const DUPLICATE_NAME: &str = "Subject with this name already exists";
const DUPLICATE_CODE: &str = "Subject with this code already exists";

/// Rows removed by [`delete_subject`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
pub struct DeletedRecords {
    pub subject: u64,
    pub combinations: u64,
    pub results: u64,
    pub total: u64,
}

#[derive(Debug, Clone)]
pub struct SubjectDeletion {
    pub name: String,
    pub code: String,
    pub deleted: DeletedRecords,
}

fn normalize_code(code: Option<String>) -> Option<String> {
    trimmed(code).map(|code| code.to_uppercase())
}

pub async fn create_subject<C: ConnectionTrait>(
    db: &C,
    name: Option<String>,
    code: Option<String>,
) -> AppResult<subject::Model> {
    let mut errors = Vec::new();
    let name = required(name, "Subject name is required", &mut errors);
    let code = required(code, "Subject code is required", &mut errors).map(|c| c.to_uppercase());
    let (Some(name), Some(code)) = (name, code) else {
        return Err(AppError::ValidationFailure(errors));
    };

    let repo = SubjectRepository::new(db);
    if repo.find_by_name(&name, None).await?.is_some() {
        return Err(AppError::duplicate(DUPLICATE_NAME));
    }
    if repo.find_by_code(&code, None).await?.is_some() {
        return Err(AppError::duplicate(DUPLICATE_CODE));
    }

    repo.create(name, code)
        .await
        .map_err(|err| AppError::from_db(err, DUPLICATE_CODE))
}

/// Updates a subject. A code change is copied onto its combinations and
/// results in the same transaction.
pub async fn update_subject(
    db: &DatabaseConnection,
    subject_id: Uuid,
    name: Option<String>,
    code: Option<String>,
) -> AppResult<subject::Model> {
    let name = trimmed(name);
    let code = normalize_code(code);

    let txn = db.begin().await?;
    let repo = SubjectRepository::new(&txn);

    let existing = repo
        .find_by_id(subject_id)
        .await?
        .ok_or_else(|| AppError::not_found("Subject"))?;

    if let Some(name) = name.as_deref() {
        if repo.find_by_name(name, Some(subject_id)).await?.is_some() {
            return Err(AppError::duplicate(
                "Another subject with this name already exists",
            ));
        }
    }
    if let Some(code) = code.as_deref() {
        if repo.find_by_code(code, Some(subject_id)).await?.is_some() {
            return Err(AppError::duplicate(
                "Another subject with this code already exists",
            ));
        }
    }

    let previous_code = existing.code.clone();
    let updated = repo
        .update(existing, SubjectUpdate { name, code })
        .await
        .map_err(|err| AppError::from_db(err, DUPLICATE_CODE))?;

    if updated.code != previous_code {
        let combinations = CombinationRepository::new(&txn)
            .update_subject_code(subject_id, &updated.code)
            .await?;
        let results = ResultRepository::new(&txn)
            .update_subject_code(subject_id, &updated.code)
            .await?;
        tracing::info!(
            subject_id = %subject_id,
            from = %previous_code,
            to = %updated.code,
            combinations,
            results,
            "Subject code changed"
        );
    }

    txn.commit().await?;
    Ok(updated)
}

/// Deletes a subject together with every combination and result carrying its
/// code. All deletions commit together or not at all.
pub async fn delete_subject(
    db: &DatabaseConnection,
    subject_id: Uuid,
) -> AppResult<SubjectDeletion> {
    let txn = db.begin().await?;

    let subject = SubjectRepository::new(&txn)
        .find_by_id(subject_id)
        .await?
        .ok_or_else(|| AppError::not_found("Subject"))?;

    let code = subject.code.clone();
    let name = subject.name.clone();
    tracing::info!("Deleting subject: {} ({})", name, code);

    let combinations = CombinationRepository::new(&txn)
        .delete_by_subject_code(&code)
        .await?;
    let results = ResultRepository::new(&txn)
        .delete_by_subject_code(&code)
        .await?;
    SubjectRepository::new(&txn).delete(subject_id).await?;

    txn.commit().await?;

    let deleted = DeletedRecords {
        subject: 1,
        combinations,
        results,
        total: 1 + combinations + results,
    };
    tracing::info!(
        subject = %name,
        combinations,
        results,
        total = deleted.total,
        "Subject deleted with dependent records"
    );

    Ok(SubjectDeletion {
        name,
        code,
        deleted,
    })
}
