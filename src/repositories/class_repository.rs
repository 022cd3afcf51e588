use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DbErr, EntityTrait, QueryFilter, QueryOrder,
    Set,
};
use uuid::Uuid;

use crate::entities::class;

pub struct ClassRepository<'a, C> {
    db: &'a C,
}

impl<'a, C: ConnectionTrait> ClassRepository<'a, C> {
    pub fn new(db: &'a C) -> Self {
        Self { db }
    }

    pub async fn find_all(&self) -> Result<Vec<class::Model>, DbErr> {
        class::Entity::find()
            .order_by_desc(class::Column::CreatedAt)
            .all(self.db)
            .await
    }

    pub async fn find_by_id(&self, class_id: Uuid) -> Result<Option<class::Model>, DbErr> {
        class::Entity::find_by_id(class_id).one(self.db).await
    }

    pub async fn find_by_ids(&self, class_ids: Vec<Uuid>) -> Result<Vec<class::Model>, DbErr> {
        if class_ids.is_empty() {
            return Ok(Vec::new());
        }
        class::Entity::find()
            .filter(class::Column::ClassId.is_in(class_ids))
            .all(self.db)
            .await
    }

    /// Class with the given name and section, ignoring `exclude`.
    pub async fn find_by_name_section(
        &self,
        name: &str,
        section: &str,
        exclude: Option<Uuid>,
    ) -> Result<Option<class::Model>, DbErr> {
        let mut query = class::Entity::find()
            .filter(class::Column::Name.eq(name))
            .filter(class::Column::Section.eq(section));
        if let Some(class_id) = exclude {
            query = query.filter(class::Column::ClassId.ne(class_id));
        }
        query.one(self.db).await
    }

    pub async fn create(&self, name: String, section: String) -> Result<class::Model, DbErr> {
        let now = Utc::now().naive_utc();
        class::ActiveModel {
            class_id: Set(Uuid::new_v4()),
            name: Set(name),
            section: Set(section),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(self.db)
        .await
    }

    pub async fn update(
        &self,
        existing: class::Model,
        updates: ClassUpdate,
    ) -> Result<class::Model, DbErr> {
        let mut active_model: class::ActiveModel = existing.into();

        if let Some(name) = updates.name {
            active_model.name = Set(name);
        }
        if let Some(section) = updates.section {
            active_model.section = Set(section);
        }
        active_model.updated_at = Set(Utc::now().naive_utc());

        active_model.update(self.db).await
    }

    pub async fn delete(&self, class_id: Uuid) -> Result<u64, DbErr> {
        let result = class::Entity::delete_by_id(class_id).exec(self.db).await?;
        Ok(result.rows_affected)
    }
}

pub struct ClassUpdate {
    pub name: Option<String>,
    pub section: Option<String>,
}
