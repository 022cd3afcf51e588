use chrono::{NaiveDateTime, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, ConnectionTrait, DbErr, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Select, Set,
};
use uuid::Uuid;

use super::contains_insensitive;
use crate::entities::{
    notice,
    sea_orm_active_enums::{NoticePriority, TargetAudience},
};

pub struct NoticeRepository<'a, C> {
    db: &'a C,
}

#[derive(Debug, Clone)]
pub struct NoticeFilter {
    pub is_active: Option<bool>,
    pub priority: Option<NoticePriority>,
    pub target_audience: Option<TargetAudience>,
    pub include_expired: bool,
    /// Matched against title and content.
    pub search: Option<String>,
    pub now: NaiveDateTime,
}

pub struct NewNotice {
    pub title: String,
    pub content: String,
    pub is_active: bool,
    pub priority: NoticePriority,
    pub expiry_date: Option<NaiveDateTime>,
    pub target_audience: TargetAudience,
    pub created_by: String,
}

fn not_expired(now: NaiveDateTime) -> Condition {
    Condition::any()
        .add(notice::Column::ExpiryDate.is_null())
        .add(notice::Column::ExpiryDate.gt(now))
}

fn apply_filter(mut query: Select<notice::Entity>, filter: NoticeFilter) -> Select<notice::Entity> {
    if let Some(is_active) = filter.is_active {
        query = query.filter(notice::Column::IsActive.eq(is_active));
    }
    if let Some(priority) = filter.priority {
        query = query.filter(notice::Column::Priority.eq(priority));
    }
    if let Some(target_audience) = filter.target_audience {
        query = query.filter(notice::Column::TargetAudience.eq(target_audience));
    }
    if !filter.include_expired {
        query = query.filter(not_expired(filter.now));
    }
    if let Some(search) = filter.search {
        query = query.filter(
            Condition::any()
                .add(contains_insensitive(notice::Column::Title, &search))
                .add(contains_insensitive(notice::Column::Content, &search)),
        );
    }
    query
}

impl<'a, C: ConnectionTrait> NoticeRepository<'a, C> {
    pub fn new(db: &'a C) -> Self {
        Self { db }
    }

    /// One page of matching notices, newest first, with the total match count.
    pub async fn find_page(
        &self,
        filter: NoticeFilter,
        page: u64,
        limit: u64,
    ) -> Result<(Vec<notice::Model>, u64), DbErr> {
        let query = apply_filter(notice::Entity::find(), filter);

        let total = query.clone().count(self.db).await?;

        let offset = page.saturating_sub(1) * limit;
        let notices = query
            .order_by_desc(notice::Column::CreatedAt)
            .limit(limit)
            .offset(offset)
            .all(self.db)
            .await?;

        Ok((notices, total))
    }

    /// Active, unexpired notices. Callers order them by priority rank.
    pub async fn find_active(
        &self,
        now: NaiveDateTime,
        target_audience: Option<TargetAudience>,
        priority: Option<NoticePriority>,
    ) -> Result<Vec<notice::Model>, DbErr> {
        let filter = NoticeFilter {
            is_active: Some(true),
            priority,
            target_audience,
            include_expired: false,
            search: None,
            now,
        };
        apply_filter(notice::Entity::find(), filter)
            .order_by_desc(notice::Column::CreatedAt)
            .all(self.db)
            .await
    }

    pub async fn find_by_priority(
        &self,
        priority: NoticePriority,
        is_active: Option<bool>,
        target_audience: Option<TargetAudience>,
    ) -> Result<Vec<notice::Model>, DbErr> {
        let mut query = notice::Entity::find().filter(notice::Column::Priority.eq(priority));
        if let Some(is_active) = is_active {
            query = query.filter(notice::Column::IsActive.eq(is_active));
        }
        if let Some(target_audience) = target_audience {
            query = query.filter(notice::Column::TargetAudience.eq(target_audience));
        }
        query
            .order_by_desc(notice::Column::CreatedAt)
            .all(self.db)
            .await
    }

    pub async fn find_all(&self) -> Result<Vec<notice::Model>, DbErr> {
        notice::Entity::find()
            .order_by_desc(notice::Column::CreatedAt)
            .all(self.db)
            .await
    }

    pub async fn find_by_id(&self, notice_id: Uuid) -> Result<Option<notice::Model>, DbErr> {
        notice::Entity::find_by_id(notice_id).one(self.db).await
    }

    pub async fn create(&self, new: NewNotice) -> Result<notice::Model, DbErr> {
        let now = Utc::now().naive_utc();
        notice::ActiveModel {
            notice_id: Set(Uuid::new_v4()),
            title: Set(new.title),
            content: Set(new.content),
            is_active: Set(new.is_active),
            priority: Set(new.priority),
            expiry_date: Set(new.expiry_date),
            target_audience: Set(new.target_audience),
            created_by: Set(new.created_by),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(self.db)
        .await
    }

    pub async fn update(
        &self,
        existing: notice::Model,
        updates: NoticeUpdate,
    ) -> Result<notice::Model, DbErr> {
        let mut active_model: notice::ActiveModel = existing.into();

        if let Some(title) = updates.title {
            active_model.title = Set(title);
        }
        if let Some(content) = updates.content {
            active_model.content = Set(content);
        }
        if let Some(is_active) = updates.is_active {
            active_model.is_active = Set(is_active);
        }
        if let Some(priority) = updates.priority {
            active_model.priority = Set(priority);
        }
        if let Some(expiry_date) = updates.expiry_date {
            active_model.expiry_date = Set(expiry_date);
        }
        if let Some(target_audience) = updates.target_audience {
            active_model.target_audience = Set(target_audience);
        }
        active_model.updated_at = Set(Utc::now().naive_utc());

        active_model.update(self.db).await
    }

    pub async fn delete(&self, notice_id: Uuid) -> Result<u64, DbErr> {
        let result = notice::Entity::delete_by_id(notice_id)
            .exec(self.db)
            .await?;
        Ok(result.rows_affected)
    }
}

#[derive(Debug, Default)]
pub struct NoticeUpdate {
    pub title: Option<String>,
    pub content: Option<String>,
    pub is_active: Option<bool>,
    pub priority: Option<NoticePriority>,
    /// `Some(None)` clears the expiry date.
    pub expiry_date: Option<Option<NaiveDateTime>>,
    pub target_audience: Option<TargetAudience>,
}
