use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Classes::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Classes::ClassId).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Classes::Name).string().not_null())
                    .col(ColumnDef::new(Classes::Section).string().not_null())
                    .col(ColumnDef::new(Classes::CreatedAt).timestamp().not_null())
                    .col(ColumnDef::new(Classes::UpdatedAt).timestamp().not_null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("unique_class_name_section")
                    .table(Classes::Table)
                    .col(Classes::Name)
                    .col(Classes::Section)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Subjects::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Subjects::SubjectId).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Subjects::Name).string().not_null())
                    .col(ColumnDef::new(Subjects::Code).string().not_null())
                    .col(ColumnDef::new(Subjects::CreatedAt).timestamp().not_null())
                    .col(ColumnDef::new(Subjects::UpdatedAt).timestamp().not_null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("unique_subject_name")
                    .table(Subjects::Table)
                    .col(Subjects::Name)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("unique_subject_code")
                    .table(Subjects::Table)
                    .col(Subjects::Code)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // Combination rows reference classes/subjects by id but also carry the
        // subject code, which is what the subject cascade deletes by.
        manager
            .create_table(
                Table::create()
                    .table(Combinations::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Combinations::CombinationId)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Combinations::ClassId).uuid().not_null())
                    .col(ColumnDef::new(Combinations::SubjectId).uuid().not_null())
                    .col(ColumnDef::new(Combinations::SubjectCode).string().not_null())
                    .col(
                        ColumnDef::new(Combinations::IsActive)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(ColumnDef::new(Combinations::CreatedAt).timestamp().not_null())
                    .col(ColumnDef::new(Combinations::UpdatedAt).timestamp().not_null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("unique_combination_class_subject")
                    .table(Combinations::Table)
                    .col(Combinations::ClassId)
                    .col(Combinations::SubjectId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_combinations_subject_code")
                    .table(Combinations::Table)
                    .col(Combinations::SubjectCode)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Students::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Students::StudentId).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Students::RollId).string().not_null())
                    .col(ColumnDef::new(Students::Name).string().not_null())
                    .col(ColumnDef::new(Students::FatherName).string().not_null())
                    .col(ColumnDef::new(Students::ClassId).uuid().not_null())
                    .col(ColumnDef::new(Students::Phone).string().not_null())
                    .col(ColumnDef::new(Students::Address).string().not_null())
                    .col(ColumnDef::new(Students::AcademicYear).string().not_null())
                    .col(
                        ColumnDef::new(Students::IsActive)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(ColumnDef::new(Students::CreatedAt).timestamp().not_null())
                    .col(ColumnDef::new(Students::UpdatedAt).timestamp().not_null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("unique_student_roll_id")
                    .table(Students::Table)
                    .col(Students::RollId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        for (name, col) in [
            ("idx_students_class_id", Students::ClassId),
            ("idx_students_academic_year", Students::AcademicYear),
            ("idx_students_name", Students::Name),
        ] {
            manager
                .create_index(
                    Index::create()
                        .name(name)
                        .table(Students::Table)
                        .col(col)
                        .to_owned(),
                )
                .await?;
        }

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Students::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Combinations::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Subjects::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Classes::Table).to_owned())
            .await?;

        Ok(())
    }
}

#[derive(DeriveIden)]
enum Classes {
    Table,
    ClassId,
    Name,
    Section,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Subjects {
    Table,
    SubjectId,
    Name,
    Code,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Combinations {
    Table,
    CombinationId,
    ClassId,
    SubjectId,
    SubjectCode,
    IsActive,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Students {
    Table,
    StudentId,
    RollId,
    Name,
    FatherName,
    ClassId,
    Phone,
    Address,
    AcademicYear,
    IsActive,
    CreatedAt,
    UpdatedAt,
}
