//! `SeaORM` Entity for subjects table

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "subjects")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub subject_id: Uuid,
    #[sea_orm(unique)]
    pub name: String,
    /// Upper-cased; copied into combinations and results.
    #[sea_orm(unique)]
    pub code: String,
    pub created_at: DateTime,
    pub updated_at: DateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::combination::Entity")]
    Combinations,
}

impl Related<super::combination::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Combinations.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
