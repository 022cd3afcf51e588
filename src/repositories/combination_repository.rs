use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DbErr, EntityTrait, QueryFilter, QueryOrder,
    Set, sea_query::Expr,
};
use uuid::Uuid;

use crate::entities::combination;

pub struct CombinationRepository<'a, C> {
    db: &'a C,
}

#[derive(Debug, Default, Clone)]
pub struct CombinationFilter {
    pub class_id: Option<Uuid>,
    pub subject_id: Option<Uuid>,
}

pub struct NewCombination {
    pub class_id: Uuid,
    pub subject_id: Uuid,
    pub subject_code: String,
    pub is_active: bool,
}

impl<'a, C: ConnectionTrait> CombinationRepository<'a, C> {
    pub fn new(db: &'a C) -> Self {
        Self { db }
    }

    /// Newest first.
    pub async fn find_all(
        &self,
        filter: CombinationFilter,
    ) -> Result<Vec<combination::Model>, DbErr> {
        let mut query = combination::Entity::find();
        if let Some(class_id) = filter.class_id {
            query = query.filter(combination::Column::ClassId.eq(class_id));
        }
        if let Some(subject_id) = filter.subject_id {
            query = query.filter(combination::Column::SubjectId.eq(subject_id));
        }
        query
            .order_by_desc(combination::Column::CreatedAt)
            .all(self.db)
            .await
    }

    pub async fn find_by_id(
        &self,
        combination_id: Uuid,
    ) -> Result<Option<combination::Model>, DbErr> {
        combination::Entity::find_by_id(combination_id)
            .one(self.db)
            .await
    }

    pub async fn find_by_ids(
        &self,
        combination_ids: Vec<Uuid>,
    ) -> Result<Vec<combination::Model>, DbErr> {
        if combination_ids.is_empty() {
            return Ok(Vec::new());
        }
        combination::Entity::find()
            .filter(combination::Column::CombinationId.is_in(combination_ids))
            .order_by_desc(combination::Column::CreatedAt)
            .all(self.db)
            .await
    }

    /// Combination linking the class and subject, ignoring `exclude`.
    pub async fn find_by_class_subject(
        &self,
        class_id: Uuid,
        subject_id: Uuid,
        exclude: Option<Uuid>,
    ) -> Result<Option<combination::Model>, DbErr> {
        let mut query = combination::Entity::find()
            .filter(combination::Column::ClassId.eq(class_id))
            .filter(combination::Column::SubjectId.eq(subject_id));
        if let Some(combination_id) = exclude {
            query = query.filter(combination::Column::CombinationId.ne(combination_id));
        }
        query.one(self.db).await
    }

    pub async fn find_active(
        &self,
        class_id: Uuid,
        subject_id: Uuid,
    ) -> Result<Option<combination::Model>, DbErr> {
        combination::Entity::find()
            .filter(combination::Column::ClassId.eq(class_id))
            .filter(combination::Column::SubjectId.eq(subject_id))
            .filter(combination::Column::IsActive.eq(true))
            .one(self.db)
            .await
    }

    pub async fn find_by_class_and_subjects(
        &self,
        class_id: Uuid,
        subject_ids: Vec<Uuid>,
    ) -> Result<Vec<combination::Model>, DbErr> {
        combination::Entity::find()
            .filter(combination::Column::ClassId.eq(class_id))
            .filter(combination::Column::SubjectId.is_in(subject_ids))
            .all(self.db)
            .await
    }

    pub async fn create(&self, new: NewCombination) -> Result<combination::Model, DbErr> {
        Self::active_model(Uuid::new_v4(), new)
            .insert(self.db)
            .await
    }

    /// Inserts all rows in one statement and returns their ids.
    pub async fn insert_many(&self, rows: Vec<NewCombination>) -> Result<Vec<Uuid>, DbErr> {
        if rows.is_empty() {
            return Ok(Vec::new());
        }
        let ids: Vec<Uuid> = rows.iter().map(|_| Uuid::new_v4()).collect();
        let models: Vec<combination::ActiveModel> = ids
            .iter()
            .zip(rows)
            .map(|(combination_id, row)| Self::active_model(*combination_id, row))
            .collect();
        combination::Entity::insert_many(models)
            .exec_without_returning(self.db)
            .await?;
        Ok(ids)
    }

    fn active_model(combination_id: Uuid, new: NewCombination) -> combination::ActiveModel {
        let now = Utc::now().naive_utc();
        combination::ActiveModel {
            combination_id: Set(combination_id),
            class_id: Set(new.class_id),
            subject_id: Set(new.subject_id),
            subject_code: Set(new.subject_code),
            is_active: Set(new.is_active),
            created_at: Set(now),
            updated_at: Set(now),
        }
    }

    pub async fn update(
        &self,
        existing: combination::Model,
        updates: CombinationUpdate,
    ) -> Result<combination::Model, DbErr> {
        let mut active_model: combination::ActiveModel = existing.into();

        if let Some(class_id) = updates.class_id {
            active_model.class_id = Set(class_id);
        }
        if let Some(subject_id) = updates.subject_id {
            active_model.subject_id = Set(subject_id);
        }
        if let Some(subject_code) = updates.subject_code {
            active_model.subject_code = Set(subject_code);
        }
        if let Some(is_active) = updates.is_active {
            active_model.is_active = Set(is_active);
        }
        active_model.updated_at = Set(Utc::now().naive_utc());

        active_model.update(self.db).await
    }

    pub async fn delete(&self, combination_id: Uuid) -> Result<u64, DbErr> {
        let result = combination::Entity::delete_by_id(combination_id)
            .exec(self.db)
            .await?;
        Ok(result.rows_affected)
    }

    pub async fn delete_by_subject_code(&self, subject_code: &str) -> Result<u64, DbErr> {
        let result = combination::Entity::delete_many()
            .filter(combination::Column::SubjectCode.eq(subject_code))
            .exec(self.db)
            .await?;
        Ok(result.rows_affected)
    }

    /// Rewrites the copied subject code on every combination of the subject.
    pub async fn update_subject_code(
        &self,
        subject_id: Uuid,
        subject_code: &str,
    ) -> Result<u64, DbErr> {
        let result = combination::Entity::update_many()
            .col_expr(combination::Column::SubjectCode, Expr::value(subject_code))
            .col_expr(
                combination::Column::UpdatedAt,
                Expr::value(Utc::now().naive_utc()),
            )
            .filter(combination::Column::SubjectId.eq(subject_id))
            .exec(self.db)
            .await?;
        Ok(result.rows_affected)
    }
}

#[derive(Debug, Default)]
pub struct CombinationUpdate {
    pub class_id: Option<Uuid>,
    pub subject_id: Option<Uuid>,
    pub subject_code: Option<String>,
    pub is_active: Option<bool>,
}
