//! `SeaORM` Entity for notices table

use sea_orm::entity::prelude::*;

use super::sea_orm_active_enums::{NoticePriority, TargetAudience};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "notices")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub notice_id: Uuid,
    pub title: String,
    #[sea_orm(column_type = "Text")]
    pub content: String,
    pub is_active: bool,
    pub priority: NoticePriority,
    pub expiry_date: Option<DateTime>,
    pub target_audience: TargetAudience,
    pub created_by: String,
    pub created_at: DateTime,
    pub updated_at: DateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn is_expired_at(&self, now: DateTime) -> bool {
        self.expiry_date.is_some_and(|expiry| now > expiry)
    }

    pub fn is_currently_active_at(&self, now: DateTime) -> bool {
        self.is_active && !self.is_expired_at(now)
    }
}
