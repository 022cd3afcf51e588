pub mod admin_repository;
pub mod class_repository;
pub mod combination_repository;
pub mod notice_repository;
pub mod result_repository;
pub mod student_repository;
pub mod subject_repository;

pub use admin_repository::AdminRepository;
pub use class_repository::{ClassRepository, ClassUpdate};
pub use combination_repository::{
    CombinationFilter, CombinationRepository, CombinationUpdate, NewCombination,
};
pub use notice_repository::{NewNotice, NoticeFilter, NoticeRepository, NoticeUpdate};
pub use result_repository::{
    ExamResultUpdate, NewResult, ResultFilter, ResultOrder, ResultRepository,
};
pub use student_repository::{NewStudent, StudentFilter, StudentRepository, StudentUpdate};
pub use subject_repository::{SubjectRepository, SubjectUpdate};

use sea_orm::{
    ColumnTrait,
    sea_query::{Expr, Func, SimpleExpr},
};

/// Case-insensitive substring match that behaves the same on PostgreSQL and SQLite.
pub(crate) fn contains_insensitive<T>(column: T, needle: &str) -> SimpleExpr
where
    T: ColumnTrait,
{
    let pattern = format!("%{}%", needle.to_lowercase());
    Expr::expr(Func::lower(Expr::col(column))).like(pattern)
}
