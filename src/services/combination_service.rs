use std::collections::{HashMap, HashSet};

use sea_orm::ConnectionTrait;
use uuid::Uuid;

use crate::entities::combination;
use crate::errors::{AppError, AppResult};
use crate::repositories::{
    ClassRepository, CombinationRepository, CombinationUpdate, NewCombination, SubjectRepository,
};

const DUPLICATE_COMBINATION: &str = "This class-subject combination already exists";

#[derive(Debug)]
pub struct BulkCombinationOutcome {
    pub created: Vec<combination::Model>,
    pub skipped: usize,
    pub total: usize,
}

/// Links a subject to a class, copying the subject code onto the link.
pub async fn create_combination<C: ConnectionTrait>(
    db: &C,
    class_id: Uuid,
    subject_id: Uuid,
    is_active: Option<bool>,
) -> AppResult<combination::Model> {
    if ClassRepository::new(db).find_by_id(class_id).await?.is_none() {
        return Err(AppError::not_found("Class"));
    }
    let subject = SubjectRepository::new(db)
        .find_by_id(subject_id)
        .await?
        .ok_or_else(|| AppError::not_found("Subject"))?;

    let repo = CombinationRepository::new(db);
    if repo
        .find_by_class_subject(class_id, subject_id, None)
        .await?
        .is_some()
    {
        return Err(AppError::duplicate(DUPLICATE_COMBINATION));
    }

    repo.create(NewCombination {
        class_id,
        subject_id,
        subject_code: subject.code,
        is_active: is_active.unwrap_or(true),
    })
    .await
    .map_err(|err| AppError::from_db(err, DUPLICATE_COMBINATION))
}

/// Links several subjects to one class, skipping links that already exist.
pub async fn create_bulk_combinations<C: ConnectionTrait>(
    db: &C,
    class_id: Option<Uuid>,
    subject_ids: Vec<Uuid>,
    is_active: Option<bool>,
) -> AppResult<BulkCombinationOutcome> {
    let Some(class_id) = class_id.filter(|_| !subject_ids.is_empty()) else {
        return Err(AppError::BadRequest(
            "Class ID and at least one subject ID are required".to_string(),
        ));
    };

    if ClassRepository::new(db).find_by_id(class_id).await?.is_none() {
        return Err(AppError::not_found("Class"));
    }

    let mut seen = HashSet::new();
    let requested: Vec<Uuid> = subject_ids
        .into_iter()
        .filter(|id| seen.insert(*id))
        .collect();
    let total = requested.len();

    let subjects: HashMap<Uuid, String> = SubjectRepository::new(db)
        .find_by_ids(requested.clone())
        .await?
        .into_iter()
        .map(|subject| (subject.subject_id, subject.code))
        .collect();
    if subjects.len() != total {
        return Err(AppError::NotFound(
            "One or more subjects not found".to_string(),
        ));
    }

    let repo = CombinationRepository::new(db);
    let existing: HashSet<Uuid> = repo
        .find_by_class_and_subjects(class_id, requested.clone())
        .await?
        .into_iter()
        .map(|combination| combination.subject_id)
        .collect();

    let is_active = is_active.unwrap_or(true);
    let rows: Vec<NewCombination> = requested
        .iter()
        .filter(|subject_id| !existing.contains(subject_id))
        .filter_map(|subject_id| {
            subjects.get(subject_id).map(|code| NewCombination {
                class_id,
                subject_id: *subject_id,
                subject_code: code.clone(),
                is_active,
            })
        })
        .collect();

    let ids = repo
        .insert_many(rows)
        .await
        .map_err(|err| AppError::from_db(err, DUPLICATE_COMBINATION))?;
    let created = repo.find_by_ids(ids).await?;

    tracing::info!(
        class_id = %class_id,
        created = created.len(),
        skipped = existing.len(),
        "Bulk combination request processed"
    );

    Ok(BulkCombinationOutcome {
        created,
        skipped: existing.len(),
        total,
    })
}

pub async fn update_combination<C: ConnectionTrait>(
    db: &C,
    combination_id: Uuid,
    class_id: Option<Uuid>,
    subject_id: Option<Uuid>,
    is_active: Option<bool>,
) -> AppResult<combination::Model> {
    let repo = CombinationRepository::new(db);
    let existing = repo
        .find_by_id(combination_id)
        .await?
        .ok_or_else(|| AppError::not_found("Combination"))?;

    if let Some(class_id) = class_id {
        if ClassRepository::new(db).find_by_id(class_id).await?.is_none() {
            return Err(AppError::not_found("Class"));
        }
    }

    let mut subject_code = None;
    if let Some(subject_id) = subject_id {
        let subject = SubjectRepository::new(db)
            .find_by_id(subject_id)
            .await?
            .ok_or_else(|| AppError::not_found("Subject"))?;
        subject_code = Some(subject.code);
    }

    let target_class = class_id.unwrap_or(existing.class_id);
    let target_subject = subject_id.unwrap_or(existing.subject_id);
    if repo
        .find_by_class_subject(target_class, target_subject, Some(combination_id))
        .await?
        .is_some()
    {
        return Err(AppError::duplicate(
            "Another combination with this class and subject already exists",
        ));
    }

    repo.update(
        existing,
        CombinationUpdate {
            class_id,
            subject_id,
            subject_code,
            is_active,
        },
    )
    .await
    .map_err(|err| AppError::from_db(err, DUPLICATE_COMBINATION))
}

pub async fn toggle_combination<C: ConnectionTrait>(
    db: &C,
    combination_id: Uuid,
) -> AppResult<combination::Model> {
    let repo = CombinationRepository::new(db);
    let existing = repo
        .find_by_id(combination_id)
        .await?
        .ok_or_else(|| AppError::not_found("Combination"))?;

    let is_active = !existing.is_active;
    let updated = repo
        .update(
            existing,
            CombinationUpdate {
                is_active: Some(is_active),
                ..Default::default()
            },
        )
        .await?;
    Ok(updated)
}

pub async fn delete_combination<C: ConnectionTrait>(
    db: &C,
    combination_id: Uuid,
) -> AppResult<()> {
    let repo = CombinationRepository::new(db);
    if repo.find_by_id(combination_id).await?.is_none() {
        return Err(AppError::not_found("Combination"));
    }
    repo.delete(combination_id).await?;
    Ok(())
}
