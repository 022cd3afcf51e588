//! `SeaORM` Entity for results table

use sea_orm::entity::prelude::*;

use super::sea_orm_active_enums::{ExamType, Grade};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "results")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub result_id: Uuid,
    pub student_id: Uuid,
    pub roll_id: String,
    pub class_id: Uuid,
    pub subject_id: Uuid,
    pub subject_code: String,
    #[sea_orm(column_type = "Double")]
    pub marks: f64,
    #[sea_orm(column_type = "Double")]
    pub max_marks: f64,
    pub exam_type: ExamType,
    #[sea_orm(column_type = "Double")]
    pub percentage: f64,
    pub grade: Grade,
    pub academic_year: String,
    pub created_at: DateTime,
    pub updated_at: DateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::student::Entity",
        from = "Column::StudentId",
        to = "super::student::Column::StudentId"
    )]
    Student,
    #[sea_orm(
        belongs_to = "super::class::Entity",
        from = "Column::ClassId",
        to = "super::class::Column::ClassId"
    )]
    Class,
    #[sea_orm(
        belongs_to = "super::subject::Entity",
        from = "Column::SubjectId",
        to = "super::subject::Column::SubjectId"
    )]
    Subject,
}

impl Related<super::student::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Student.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
