use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Results::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Results::ResultId).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Results::StudentId).uuid().not_null())
                    .col(ColumnDef::new(Results::RollId).string().not_null())
                    .col(ColumnDef::new(Results::ClassId).uuid().not_null())
                    .col(ColumnDef::new(Results::SubjectId).uuid().not_null())
                    .col(ColumnDef::new(Results::SubjectCode).string().not_null())
                    .col(
                        ColumnDef::new(Results::Marks)
                            .double()
                            .not_null()
                            .check(Expr::col(Results::Marks).gte(0)),
                    )
                    .col(
                        ColumnDef::new(Results::MaxMarks)
                            .double()
                            .not_null()
                            .check(Expr::col(Results::MaxMarks).gte(1)),
                    )
                    .col(ColumnDef::new(Results::ExamType).string().not_null())
                    .col(ColumnDef::new(Results::Percentage).double().not_null())
                    .col(ColumnDef::new(Results::Grade).string().not_null())
                    .col(ColumnDef::new(Results::AcademicYear).string().not_null())
                    .col(ColumnDef::new(Results::CreatedAt).timestamp().not_null())
                    .col(ColumnDef::new(Results::UpdatedAt).timestamp().not_null())
                    .to_owned(),
            )
            .await?;

        // Source of truth for "one result per student, subject, exam and year".
        manager
            .create_index(
                Index::create()
                    .name("unique_result_student_subject_exam_year")
                    .table(Results::Table)
                    .col(Results::StudentId)
                    .col(Results::SubjectId)
                    .col(Results::ExamType)
                    .col(Results::AcademicYear)
                    .unique()
                    .to_owned(),
            )
            .await?;

        for (name, col) in [
            ("idx_results_class_id", Results::ClassId),
            ("idx_results_roll_id", Results::RollId),
            ("idx_results_subject_code", Results::SubjectCode),
            ("idx_results_academic_year", Results::AcademicYear),
        ] {
            manager
                .create_index(
                    Index::create()
                        .name(name)
                        .table(Results::Table)
                        .col(col)
                        .to_owned(),
                )
                .await?;
        }

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Results::Table).to_owned())
            .await?;

        Ok(())
    }
}

#[derive(DeriveIden)]
enum Results {
    Table,
    ResultId,
    StudentId,
    RollId,
    ClassId,
    SubjectId,
    SubjectCode,
    Marks,
    MaxMarks,
    ExamType,
    Percentage,
    Grade,
    AcademicYear,
    CreatedAt,
    UpdatedAt,
}
