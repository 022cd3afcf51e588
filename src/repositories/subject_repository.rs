use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DbErr, EntityTrait, QueryFilter, QueryOrder,
    Set,
};
use uuid::Uuid;

use crate::entities::subject;

pub struct SubjectRepository<'a, C> {
    db: &'a C,
}

impl<'a, C: ConnectionTrait> SubjectRepository<'a, C> {
    pub fn new(db: &'a C) -> Self {
        Self { db }
    }

    pub async fn find_all(&self) -> Result<Vec<subject::Model>, DbErr> {
        subject::Entity::find()
            .order_by_desc(subject::Column::CreatedAt)
            .all(self.db)
            .await
    }

    pub async fn find_by_id(&self, subject_id: Uuid) -> Result<Option<subject::Model>, DbErr> {
        subject::Entity::find_by_id(subject_id).one(self.db).await
    }

    pub async fn find_by_ids(&self, subject_ids: Vec<Uuid>) -> Result<Vec<subject::Model>, DbErr> {
        if subject_ids.is_empty() {
            return Ok(Vec::new());
        }
        subject::Entity::find()
            .filter(subject::Column::SubjectId.is_in(subject_ids))
            .all(self.db)
            .await
    }

    pub async fn find_by_name(
        &self,
        name: &str,
        exclude: Option<Uuid>,
    ) -> Result<Option<subject::Model>, DbErr> {
        let mut query = subject::Entity::find().filter(subject::Column::Name.eq(name));
        if let Some(subject_id) = exclude {
            query = query.filter(subject::Column::SubjectId.ne(subject_id));
        }
        query.one(self.db).await
    }

    pub async fn find_by_code(
        &self,
        code: &str,
        exclude: Option<Uuid>,
    ) -> Result<Option<subject::Model>, DbErr> {
        let mut query = subject::Entity::find().filter(subject::Column::Code.eq(code));
        if let Some(subject_id) = exclude {
            query = query.filter(subject::Column::SubjectId.ne(subject_id));
        }
        query.one(self.db).await
    }

    pub async fn create(&self, name: String, code: String) -> Result<subject::Model, DbErr> {
        let now = Utc::now().naive_utc();
        subject::ActiveModel {
            subject_id: Set(Uuid::new_v4()),
            name: Set(name),
            code: Set(code),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(self.db)
        .await
    }

    pub async fn update(
        &self,
        existing: subject::Model,
        updates: SubjectUpdate,
    ) -> Result<subject::Model, DbErr> {
        let mut active_model: subject::ActiveModel = existing.into();

        if let Some(name) = updates.name {
            active_model.name = Set(name);
        }
        if let Some(code) = updates.code {
            active_model.code = Set(code);
        }
        active_model.updated_at = Set(Utc::now().naive_utc());

        active_model.update(self.db).await
    }

    pub async fn delete(&self, subject_id: Uuid) -> Result<u64, DbErr> {
        let result = subject::Entity::delete_by_id(subject_id)
            .exec(self.db)
            .await?;
        Ok(result.rows_affected)
    }
}

pub struct SubjectUpdate {
    pub name: Option<String>,
    pub code: Option<String>,
}
