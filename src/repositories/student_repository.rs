use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, ConnectionTrait, DbErr, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder, Set,
};
use uuid::Uuid;

use super::contains_insensitive;
use crate::entities::student;

pub struct StudentRepository<'a, C> {
    db: &'a C,
}

#[derive(Debug, Default, Clone)]
pub struct StudentFilter {
    pub class_id: Option<Uuid>,
    pub academic_year: Option<String>,
    pub is_active: Option<bool>,
    /// Matched against name, roll id and father's name.
    pub search: Option<String>,
}

pub struct NewStudent {
    pub roll_id: String,
    pub name: String,
    pub father_name: String,
    pub class_id: Uuid,
    pub phone: String,
    pub address: String,
    pub academic_year: String,
}

impl<'a, C: ConnectionTrait> StudentRepository<'a, C> {
    pub fn new(db: &'a C) -> Self {
        Self { db }
    }

    pub async fn find_all(&self, filter: StudentFilter) -> Result<Vec<student::Model>, DbErr> {
        let mut query = student::Entity::find();
        if let Some(class_id) = filter.class_id {
            query = query.filter(student::Column::ClassId.eq(class_id));
        }
        if let Some(academic_year) = filter.academic_year {
            query = query.filter(student::Column::AcademicYear.eq(academic_year));
        }
        if let Some(is_active) = filter.is_active {
            query = query.filter(student::Column::IsActive.eq(is_active));
        }
        if let Some(search) = filter.search {
            query = query.filter(
                Condition::any()
                    .add(contains_insensitive(student::Column::Name, &search))
                    .add(contains_insensitive(student::Column::RollId, &search))
                    .add(contains_insensitive(student::Column::FatherName, &search)),
            );
        }
        query
            .order_by_desc(student::Column::CreatedAt)
            .all(self.db)
            .await
    }

    /// Students of a class ordered by roll id.
    pub async fn find_by_class(
        &self,
        class_id: Uuid,
        academic_year: Option<String>,
    ) -> Result<Vec<student::Model>, DbErr> {
        let mut query = student::Entity::find().filter(student::Column::ClassId.eq(class_id));
        if let Some(academic_year) = academic_year {
            query = query.filter(student::Column::AcademicYear.eq(academic_year));
        }
        query
            .order_by_asc(student::Column::RollId)
            .all(self.db)
            .await
    }

    pub async fn find_by_id(&self, student_id: Uuid) -> Result<Option<student::Model>, DbErr> {
        student::Entity::find_by_id(student_id).one(self.db).await
    }

    pub async fn find_by_ids(&self, student_ids: Vec<Uuid>) -> Result<Vec<student::Model>, DbErr> {
        if student_ids.is_empty() {
            return Ok(Vec::new());
        }
        student::Entity::find()
            .filter(student::Column::StudentId.is_in(student_ids))
            .all(self.db)
            .await
    }

    pub async fn find_by_roll_id(
        &self,
        roll_id: &str,
        exclude: Option<Uuid>,
    ) -> Result<Option<student::Model>, DbErr> {
        let mut query = student::Entity::find().filter(student::Column::RollId.eq(roll_id));
        if let Some(student_id) = exclude {
            query = query.filter(student::Column::StudentId.ne(student_id));
        }
        query.one(self.db).await
    }

    pub async fn count(&self, is_active: Option<bool>) -> Result<u64, DbErr> {
        let mut query = student::Entity::find();
        if let Some(is_active) = is_active {
            query = query.filter(student::Column::IsActive.eq(is_active));
        }
        query.count(self.db).await
    }

    pub async fn create(&self, new: NewStudent) -> Result<student::Model, DbErr> {
        let now = Utc::now().naive_utc();
        student::ActiveModel {
            student_id: Set(Uuid::new_v4()),
            roll_id: Set(new.roll_id),
            name: Set(new.name),
            father_name: Set(new.father_name),
            class_id: Set(new.class_id),
            phone: Set(new.phone),
            address: Set(new.address),
            academic_year: Set(new.academic_year),
            is_active: Set(true),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(self.db)
        .await
    }

    pub async fn update(
        &self,
        existing: student::Model,
        updates: StudentUpdate,
    ) -> Result<student::Model, DbErr> {
        let mut active_model: student::ActiveModel = existing.into();

        if let Some(roll_id) = updates.roll_id {
            active_model.roll_id = Set(roll_id);
        }
        if let Some(name) = updates.name {
            active_model.name = Set(name);
        }
        if let Some(father_name) = updates.father_name {
            active_model.father_name = Set(father_name);
        }
        if let Some(class_id) = updates.class_id {
            active_model.class_id = Set(class_id);
        }
        if let Some(phone) = updates.phone {
            active_model.phone = Set(phone);
        }
        if let Some(address) = updates.address {
            active_model.address = Set(address);
        }
        if let Some(academic_year) = updates.academic_year {
            active_model.academic_year = Set(academic_year);
        }
        if let Some(is_active) = updates.is_active {
            active_model.is_active = Set(is_active);
        }
        active_model.updated_at = Set(Utc::now().naive_utc());

        active_model.update(self.db).await
    }

    pub async fn delete(&self, student_id: Uuid) -> Result<u64, DbErr> {
        let result = student::Entity::delete_by_id(student_id)
            .exec(self.db)
            .await?;
        Ok(result.rows_affected)
    }
}

#[derive(Debug, Default)]
pub struct StudentUpdate {
    pub roll_id: Option<String>,
    pub name: Option<String>,
    pub father_name: Option<String>,
    pub class_id: Option<Uuid>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub academic_year: Option<String>,
    pub is_active: Option<bool>,
}
