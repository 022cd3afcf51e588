pub use super::admin::Entity as Admin;
pub use super::class::Entity as Class;
pub use super::combination::Entity as Combination;
pub use super::exam_result::Entity as ExamResult;
pub use super::notice::Entity as Notice;
pub use super::student::Entity as Student;
pub use super::subject::Entity as Subject;
