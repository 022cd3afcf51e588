use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DbErr, EntityTrait, QueryFilter, Set,
};
use uuid::Uuid;

use crate::entities::admin;

pub struct AdminRepository<'a, C> {
    db: &'a C,
}

impl<'a, C: ConnectionTrait> AdminRepository<'a, C> {
    pub fn new(db: &'a C) -> Self {
        Self { db }
    }

    pub async fn find_by_id(&self, admin_id: Uuid) -> Result<Option<admin::Model>, DbErr> {
        admin::Entity::find_by_id(admin_id).one(self.db).await
    }

    pub async fn find_by_username(&self, username: &str) -> Result<Option<admin::Model>, DbErr> {
        admin::Entity::find()
            .filter(admin::Column::Username.eq(username))
            .one(self.db)
            .await
    }

    pub async fn create(
        &self,
        username: String,
        password_hash: String,
    ) -> Result<admin::Model, DbErr> {
        let now = Utc::now().naive_utc();
        admin::ActiveModel {
            admin_id: Set(Uuid::new_v4()),
            username: Set(username),
            password_hash: Set(password_hash),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(self.db)
        .await
    }

    pub async fn update_password(
        &self,
        existing: admin::Model,
        password_hash: String,
    ) -> Result<admin::Model, DbErr> {
        let mut active_model: admin::ActiveModel = existing.into();
        active_model.password_hash = Set(password_hash);
        active_model.updated_at = Set(Utc::now().naive_utc());
        active_model.update(self.db).await
    }
}
