use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DbErr, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, Set, sea_query::Expr,
};
use uuid::Uuid;

use super::contains_insensitive;
use crate::entities::{
    exam_result,
    sea_orm_active_enums::{ExamType, Grade},
};

pub struct ResultRepository<'a, C> {
    db: &'a C,
}

#[derive(Debug, Default, Clone)]
pub struct ResultFilter {
    pub student_id: Option<Uuid>,
    pub class_id: Option<Uuid>,
    pub subject_id: Option<Uuid>,
    pub exam_type: Option<ExamType>,
    pub academic_year: Option<String>,
    /// Matched against the roll id.
    pub search: Option<String>,
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum ResultOrder {
    #[default]
    Newest,
    RollId,
    HighestMarks,
}

pub struct NewResult {
    pub student_id: Uuid,
    pub roll_id: String,
    pub class_id: Uuid,
    pub subject_id: Uuid,
    pub subject_code: String,
    pub marks: f64,
    pub max_marks: f64,
    pub exam_type: ExamType,
    pub percentage: f64,
    pub grade: Grade,
    pub academic_year: String,
}

impl<'a, C: ConnectionTrait> ResultRepository<'a, C> {
    pub fn new(db: &'a C) -> Self {
        Self { db }
    }

    pub async fn find_all(
        &self,
        filter: ResultFilter,
        order: ResultOrder,
    ) -> Result<Vec<exam_result::Model>, DbErr> {
        let mut query = exam_result::Entity::find();
        if let Some(student_id) = filter.student_id {
            query = query.filter(exam_result::Column::StudentId.eq(student_id));
        }
        if let Some(class_id) = filter.class_id {
            query = query.filter(exam_result::Column::ClassId.eq(class_id));
        }
        if let Some(subject_id) = filter.subject_id {
            query = query.filter(exam_result::Column::SubjectId.eq(subject_id));
        }
        if let Some(exam_type) = filter.exam_type {
            query = query.filter(exam_result::Column::ExamType.eq(exam_type));
        }
        if let Some(academic_year) = filter.academic_year {
            query = query.filter(exam_result::Column::AcademicYear.eq(academic_year));
        }
        if let Some(search) = filter.search {
            query = query.filter(contains_insensitive(exam_result::Column::RollId, &search));
        }

        query = match order {
            ResultOrder::Newest => query.order_by_desc(exam_result::Column::CreatedAt),
            ResultOrder::RollId => query
                .order_by_asc(exam_result::Column::RollId)
                .order_by_asc(exam_result::Column::CreatedAt),
            ResultOrder::HighestMarks => query
                .order_by_desc(exam_result::Column::Marks)
                .order_by_asc(exam_result::Column::RollId),
        };

        query.all(self.db).await
    }

    pub async fn find_by_id(&self, result_id: Uuid) -> Result<Option<exam_result::Model>, DbErr> {
        exam_result::Entity::find_by_id(result_id).one(self.db).await
    }

    /// Result occupying the (student, subject, exam type, academic year) slot,
    /// ignoring `exclude`.
    pub async fn find_duplicate(
        &self,
        student_id: Uuid,
        subject_id: Uuid,
        exam_type: ExamType,
        academic_year: &str,
        exclude: Option<Uuid>,
    ) -> Result<Option<exam_result::Model>, DbErr> {
        let mut query = exam_result::Entity::find()
            .filter(exam_result::Column::StudentId.eq(student_id))
            .filter(exam_result::Column::SubjectId.eq(subject_id))
            .filter(exam_result::Column::ExamType.eq(exam_type))
            .filter(exam_result::Column::AcademicYear.eq(academic_year));
        if let Some(result_id) = exclude {
            query = query.filter(exam_result::Column::ResultId.ne(result_id));
        }
        query.one(self.db).await
    }

    pub async fn count_by_subject_code(&self, subject_code: &str) -> Result<u64, DbErr> {
        exam_result::Entity::find()
            .filter(exam_result::Column::SubjectCode.eq(subject_code))
            .count(self.db)
            .await
    }

    pub async fn create(&self, new: NewResult) -> Result<exam_result::Model, DbErr> {
        let now = Utc::now().naive_utc();
        exam_result::ActiveModel {
            result_id: Set(Uuid::new_v4()),
            student_id: Set(new.student_id),
            roll_id: Set(new.roll_id),
            class_id: Set(new.class_id),
            subject_id: Set(new.subject_id),
            subject_code: Set(new.subject_code),
            marks: Set(new.marks),
            max_marks: Set(new.max_marks),
            exam_type: Set(new.exam_type),
            percentage: Set(new.percentage),
            grade: Set(new.grade),
            academic_year: Set(new.academic_year),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(self.db)
        .await
    }

    pub async fn update(
        &self,
        existing: exam_result::Model,
        updates: ExamResultUpdate,
    ) -> Result<exam_result::Model, DbErr> {
        let mut active_model: exam_result::ActiveModel = existing.into();

        if let Some(marks) = updates.marks {
            active_model.marks = Set(marks);
        }
        if let Some(max_marks) = updates.max_marks {
            active_model.max_marks = Set(max_marks);
        }
        if let Some(exam_type) = updates.exam_type {
            active_model.exam_type = Set(exam_type);
        }
        if let Some(academic_year) = updates.academic_year {
            active_model.academic_year = Set(academic_year);
        }
        if let Some(percentage) = updates.percentage {
            active_model.percentage = Set(percentage);
        }
        if let Some(grade) = updates.grade {
            active_model.grade = Set(grade);
        }
        active_model.updated_at = Set(Utc::now().naive_utc());

        active_model.update(self.db).await
    }

    pub async fn delete(&self, result_id: Uuid) -> Result<u64, DbErr> {
        let result = exam_result::Entity::delete_by_id(result_id)
            .exec(self.db)
            .await?;
        Ok(result.rows_affected)
    }

    pub async fn delete_many(&self, result_ids: Vec<Uuid>) -> Result<u64, DbErr> {
        if result_ids.is_empty() {
            return Ok(0);
        }
        let result = exam_result::Entity::delete_many()
            .filter(exam_result::Column::ResultId.is_in(result_ids))
            .exec(self.db)
            .await?;
        Ok(result.rows_affected)
    }

    pub async fn delete_all(&self) -> Result<u64, DbErr> {
        let result = exam_result::Entity::delete_many().exec(self.db).await?;
        Ok(result.rows_affected)
    }

    pub async fn delete_by_subject_code(&self, subject_code: &str) -> Result<u64, DbErr> {
        let result = exam_result::Entity::delete_many()
            .filter(exam_result::Column::SubjectCode.eq(subject_code))
            .exec(self.db)
            .await?;
        Ok(result.rows_affected)
    }

    pub async fn update_subject_code(
        &self,
        subject_id: Uuid,
        subject_code: &str,
    ) -> Result<u64, DbErr> {
        let result = exam_result::Entity::update_many()
            .col_expr(exam_result::Column::SubjectCode, Expr::value(subject_code))
            .col_expr(
                exam_result::Column::UpdatedAt,
                Expr::value(Utc::now().naive_utc()),
            )
            .filter(exam_result::Column::SubjectId.eq(subject_id))
            .exec(self.db)
            .await?;
        Ok(result.rows_affected)
    }

    pub async fn update_roll_id(&self, student_id: Uuid, roll_id: &str) -> Result<u64, DbErr> {
        let result = exam_result::Entity::update_many()
            .col_expr(exam_result::Column::RollId, Expr::value(roll_id))
            .col_expr(
                exam_result::Column::UpdatedAt,
                Expr::value(Utc::now().naive_utc()),
            )
            .filter(exam_result::Column::StudentId.eq(student_id))
            .exec(self.db)
            .await?;
        Ok(result.rows_affected)
    }
}

/// Columns a stored result may change. Derived fields are supplied by the
/// caller together with the marks they were computed from.
#[derive(Debug, Default)]
pub struct ExamResultUpdate {
    pub marks: Option<f64>,
    pub max_marks: Option<f64>,
    pub exam_type: Option<ExamType>,
    pub academic_year: Option<String>,
    pub percentage: Option<f64>,
    pub grade: Option<Grade>,
}
