//! `SeaORM` entities for the school records schema

pub mod prelude;

pub mod admin;
pub mod class;
pub mod combination;
pub mod exam_result;
pub mod notice;
pub mod sea_orm_active_enums;
pub mod student;
pub mod subject;
