use sea_orm::ConnectionTrait;
use uuid::Uuid;

use super::{required, trimmed};
use crate::entities::class;
use crate::errors::{AppError, AppResult};
use crate::repositories::{ClassRepository, ClassUpdate};

const DUPLICATE_CLASS: &str = "Class with this name and section already exists";

pub async fn create_class<C: ConnectionTrait>(
    db: &C,
    name: Option<String>,
    section: Option<String>,
) -> AppResult<class::Model> {
    let mut errors = Vec::new();
    let name = required(name, "Class name is required", &mut errors);
    let section = required(section, "Section is required", &mut errors);
    let (Some(name), Some(section)) = (name, section) else {
        return Err(AppError::ValidationFailure(errors));
    };

    let repo = ClassRepository::new(db);
    if repo
        .find_by_name_section(&name, &section, None)
        .await?
        .is_some()
    {
        return Err(AppError::duplicate(DUPLICATE_CLASS));
    }

    repo.create(name, section)
        .await
        .map_err(|err| AppError::from_db(err, DUPLICATE_CLASS))
}

pub async fn update_class<C: ConnectionTrait>(
    db: &C,
    class_id: Uuid,
    name: Option<String>,
    section: Option<String>,
) -> AppResult<class::Model> {
    let repo = ClassRepository::new(db);
    let existing = repo
        .find_by_id(class_id)
        .await?
        .ok_or_else(|| AppError::not_found("Class"))?;

    let name = trimmed(name);
    let section = trimmed(section);
    let target_name = name.as_deref().unwrap_or(&existing.name);
    let target_section = section.as_deref().unwrap_or(&existing.section);

    if repo
        .find_by_name_section(target_name, target_section, Some(class_id))
        .await?
        .is_some()
    {
        return Err(AppError::duplicate(
            "Another class with this name and section already exists",
        ));
    }

    repo.update(existing, ClassUpdate { name, section })
        .await
        .map_err(|err| AppError::from_db(err, DUPLICATE_CLASS))
}

pub async fn delete_class<C: ConnectionTrait>(db: &C, class_id: Uuid) -> AppResult<()> {
    let repo = ClassRepository::new(db);
    if repo.find_by_id(class_id).await?.is_none() {
        return Err(AppError::not_found("Class"));
    }
    repo.delete(class_id).await?;
    Ok(())
}
