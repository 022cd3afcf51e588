use std::collections::BTreeMap;

use chrono::{DateTime, Duration, NaiveDate, NaiveDateTime};
use sea_orm::ConnectionTrait;
use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

use super::trimmed;
use crate::entities::{
    notice,
    sea_orm_active_enums::{NoticePriority, TargetAudience},
};
use crate::errors::{AppError, AppResult};
use crate::repositories::{NewNotice, NoticeFilter, NoticeRepository, NoticeUpdate};

pub const MAX_TITLE_CHARS: usize = 200;
pub const MAX_CONTENT_CHARS: usize = 2000;
pub const DEFAULT_PAGE_SIZE: u64 = 50;
pub const RECENT_DAYS: i64 = 30;

const MSG_PRIORITY: &str = "Priority must be one of: low, medium, high, urgent";
const MSG_AUDIENCE: &str = "Target audience must be one of: all, students, teachers, parents";

#[derive(Debug, Default, Clone)]
pub struct NoticeInput {
    pub title: Option<String>,
    pub content: Option<String>,
    pub is_active: Option<bool>,
    pub priority: Option<String>,
    pub expiry_date: Option<String>,
    pub target_audience: Option<String>,
    pub created_by: Option<String>,
}

#[derive(Debug, Default, Clone)]
pub struct NoticeChanges {
    pub title: Option<String>,
    pub content: Option<String>,
    pub is_active: Option<bool>,
    pub priority: Option<String>,
    /// `Some(None)` clears the expiry date.
    pub expiry_date: Option<Option<String>>,
    pub target_audience: Option<String>,
}

#[derive(Debug, Default, Clone)]
pub struct NoticeQuery {
    pub is_active: Option<bool>,
    pub priority: Option<String>,
    pub target_audience: Option<String>,
    pub include_expired: bool,
    pub search: Option<String>,
    pub page: Option<u64>,
    pub limit: Option<u64>,
}

#[derive(Debug)]
pub struct NoticePage {
    pub notices: Vec<notice::Model>,
    pub total: u64,
    pub page: u64,
    pub pages: u64,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PriorityCount {
    pub priority: NoticePriority,
    pub count: u64,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AudienceCount {
    pub target_audience: TargetAudience,
    pub count: u64,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NoticeStats {
    pub total_notices: u64,
    pub active_notices: u64,
    pub expired_notices: u64,
    pub recent_notices: u64,
    pub notices_by_priority: Vec<PriorityCount>,
    pub notices_by_audience: Vec<AudienceCount>,
}

/// Accepts RFC 3339 timestamps, naive `YYYY-MM-DDTHH:MM:SS` values and plain
/// dates (midnight).
pub fn parse_expiry_date(raw: &str) -> AppResult<NaiveDateTime> {
    let raw = raw.trim();
    if let Ok(value) = DateTime::parse_from_rfc3339(raw) {
        return Ok(value.naive_utc());
    }
    if let Ok(value) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f") {
        return Ok(value);
    }
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        if let Some(value) = date.and_hms_opt(0, 0, 0) {
            return Ok(value);
        }
    }
    Err(AppError::BadRequest("Invalid expiry date format".to_string()))
}

fn future_expiry(raw: &str, now: NaiveDateTime) -> AppResult<NaiveDateTime> {
    let expiry = parse_expiry_date(raw)?;
    if expiry <= now {
        return Err(AppError::BadRequest(
            "Expiry date must be in the future".to_string(),
        ));
    }
    Ok(expiry)
}

fn parse_priority(value: Option<String>, errors: &mut Vec<String>) -> Option<NoticePriority> {
    let value = trimmed(value)?;
    let priority = NoticePriority::parse(&value.to_lowercase());
    if priority.is_none() {
        errors.push(MSG_PRIORITY.to_string());
    }
    priority
}

fn parse_audience(value: Option<String>, errors: &mut Vec<String>) -> Option<TargetAudience> {
    let value = trimmed(value)?;
    let audience = TargetAudience::parse(&value.to_lowercase());
    if audience.is_none() {
        errors.push(MSG_AUDIENCE.to_string());
    }
    audience
}

fn check_length(value: &str, max: usize, message: &str, errors: &mut Vec<String>) {
    if value.chars().count() > max {
        errors.push(message.to_string());
    }
}

fn expired_at(expiry: Option<NaiveDateTime>, now: NaiveDateTime) -> bool {
    expiry.is_some_and(|expiry| expiry <= now)
}

pub async fn create_notice<C: ConnectionTrait>(
    db: &C,
    input: NoticeInput,
    now: NaiveDateTime,
) -> AppResult<notice::Model> {
    let expiry_date = match trimmed(input.expiry_date) {
        Some(raw) => Some(future_expiry(&raw, now)?),
        None => None,
    };

    let mut errors = Vec::new();
    let title = trimmed(input.title);
    let content = trimmed(input.content);
    match title.as_deref() {
        None => errors.push("Notice title is required".to_string()),
        Some(title) => check_length(
            title,
            MAX_TITLE_CHARS,
            "Title cannot exceed 200 characters",
            &mut errors,
        ),
    }
    match content.as_deref() {
        None => errors.push("Notice content is required".to_string()),
        Some(content) => check_length(
            content,
            MAX_CONTENT_CHARS,
            "Content cannot exceed 2000 characters",
            &mut errors,
        ),
    }
    let priority = parse_priority(input.priority, &mut errors);
    let target_audience = parse_audience(input.target_audience, &mut errors);

    let (Some(title), Some(content)) = (title, content) else {
        return Err(AppError::ValidationFailure(errors));
    };
    if !errors.is_empty() {
        return Err(AppError::ValidationFailure(errors));
    }

    NoticeRepository::new(db)
        .create(NewNotice {
            title,
            content,
            is_active: input.is_active.unwrap_or(true) && !expired_at(expiry_date, now),
            priority: priority.unwrap_or(NoticePriority::Medium),
            expiry_date,
            target_audience: target_audience.unwrap_or(TargetAudience::All),
            created_by: trimmed(input.created_by).unwrap_or_else(|| "Admin".to_string()),
        })
        .await
        .map_err(AppError::from)
}

/// Partial update. A notice whose expiry has passed is saved inactive.
pub async fn update_notice<C: ConnectionTrait>(
    db: &C,
    notice_id: Uuid,
    changes: NoticeChanges,
    now: NaiveDateTime,
) -> AppResult<notice::Model> {
    let expiry_date = match changes.expiry_date {
        Some(Some(raw)) if !raw.trim().is_empty() => Some(Some(future_expiry(&raw, now)?)),
        Some(_) => Some(None),
        None => None,
    };

    let mut errors = Vec::new();
    let title = match changes.title {
        Some(raw) => {
            let title = trimmed(Some(raw));
            match title.as_deref() {
                None => errors.push("Notice title is required".to_string()),
                Some(title) => check_length(
                    title,
                    MAX_TITLE_CHARS,
                    "Title cannot exceed 200 characters",
                    &mut errors,
                ),
            }
            title
        }
        None => None,
    };
    let content = match changes.content {
        Some(raw) => {
            let content = trimmed(Some(raw));
            match content.as_deref() {
                None => errors.push("Notice content is required".to_string()),
                Some(content) => check_length(
                    content,
                    MAX_CONTENT_CHARS,
                    "Content cannot exceed 2000 characters",
                    &mut errors,
                ),
            }
            content
        }
        None => None,
    };
    let priority = parse_priority(changes.priority, &mut errors);
    let target_audience = parse_audience(changes.target_audience, &mut errors);
    if !errors.is_empty() {
        return Err(AppError::ValidationFailure(errors));
    }

    let repo = NoticeRepository::new(db);
    let existing = repo
        .find_by_id(notice_id)
        .await?
        .ok_or_else(|| AppError::not_found("Notice"))?;

    let effective_expiry = expiry_date.unwrap_or(existing.expiry_date);
    let is_active = if expired_at(effective_expiry, now) {
        Some(false)
    } else {
        changes.is_active
    };

    let updated = repo
        .update(
            existing,
            NoticeUpdate {
                title,
                content,
                is_active,
                priority,
                expiry_date,
                target_audience,
            },
        )
        .await?;
    Ok(updated)
}

pub async fn toggle_notice<C: ConnectionTrait>(
    db: &C,
    notice_id: Uuid,
    now: NaiveDateTime,
) -> AppResult<notice::Model> {
    let repo = NoticeRepository::new(db);
    let existing = repo
        .find_by_id(notice_id)
        .await?
        .ok_or_else(|| AppError::not_found("Notice"))?;

    let is_active = !existing.is_active && !expired_at(existing.expiry_date, now);
    let updated = repo
        .update(
            existing,
            NoticeUpdate {
                is_active: Some(is_active),
                ..Default::default()
            },
        )
        .await?;
    Ok(updated)
}

pub async fn delete_notice<C: ConnectionTrait>(db: &C, notice_id: Uuid) -> AppResult<()> {
    let repo = NoticeRepository::new(db);
    if repo.find_by_id(notice_id).await?.is_none() {
        return Err(AppError::not_found("Notice"));
    }
    repo.delete(notice_id).await?;
    Ok(())
}

fn query_filters(
    priority: Option<String>,
    target_audience: Option<String>,
) -> AppResult<(Option<NoticePriority>, Option<TargetAudience>)> {
    let mut errors = Vec::new();
    let priority = parse_priority(priority, &mut errors);
    let target_audience = parse_audience(target_audience, &mut errors);
    if !errors.is_empty() {
        return Err(AppError::ValidationFailure(errors));
    }
    Ok((priority, target_audience))
}

pub async fn list_notices<C: ConnectionTrait>(
    db: &C,
    query: NoticeQuery,
    now: NaiveDateTime,
) -> AppResult<NoticePage> {
    let (priority, target_audience) = query_filters(query.priority, query.target_audience)?;
    let page = query.page.filter(|page| *page > 0).unwrap_or(1);
    let limit = query
        .limit
        .filter(|limit| *limit > 0)
        .unwrap_or(DEFAULT_PAGE_SIZE);

    let filter = NoticeFilter {
        is_active: query.is_active,
        priority,
        target_audience,
        include_expired: query.include_expired,
        search: trimmed(query.search),
        now,
    };
    let (notices, total) = NoticeRepository::new(db)
        .find_page(filter, page, limit)
        .await?;

    Ok(NoticePage {
        notices,
        total,
        page,
        pages: total.div_ceil(limit),
    })
}

/// Active, unexpired notices: most important first, newest first within a
/// priority.
pub async fn active_notices<C: ConnectionTrait>(
    db: &C,
    target_audience: Option<String>,
    priority: Option<String>,
    now: NaiveDateTime,
) -> AppResult<Vec<notice::Model>> {
    let (priority, target_audience) = query_filters(priority, target_audience)?;
    let mut notices = NoticeRepository::new(db)
        .find_active(now, target_audience, priority)
        .await?;
    notices.sort_by(|a, b| {
        b.priority
            .rank()
            .cmp(&a.priority.rank())
            .then_with(|| b.created_at.cmp(&a.created_at))
    });
    Ok(notices)
}

pub async fn notices_by_priority<C: ConnectionTrait>(
    db: &C,
    priority: &str,
    is_active: Option<bool>,
    target_audience: Option<String>,
) -> AppResult<Vec<notice::Model>> {
    let priority = NoticePriority::parse(&priority.trim().to_lowercase())
        .ok_or_else(|| AppError::ValidationFailure(vec![MSG_PRIORITY.to_string()]))?;
    let (_, target_audience) = query_filters(None, target_audience)?;
    let notices = NoticeRepository::new(db)
        .find_by_priority(priority, is_active, target_audience)
        .await?;
    Ok(notices)
}

pub async fn notice_stats<C: ConnectionTrait>(
    db: &C,
    now: NaiveDateTime,
) -> AppResult<NoticeStats> {
    let notices = NoticeRepository::new(db).find_all().await?;
    let recent_since = now - Duration::days(RECENT_DAYS);

    let mut by_priority: BTreeMap<&'static str, (NoticePriority, u64)> = BTreeMap::new();
    let mut by_audience: BTreeMap<&'static str, (TargetAudience, u64)> = BTreeMap::new();
    for notice in &notices {
        by_priority
            .entry(notice.priority.as_str())
            .or_insert((notice.priority, 0))
            .1 += 1;
        by_audience
            .entry(notice.target_audience.as_str())
            .or_insert((notice.target_audience, 0))
            .1 += 1;
    }

    Ok(NoticeStats {
        total_notices: notices.len() as u64,
        active_notices: notices.iter().filter(|n| n.is_active).count() as u64,
        expired_notices: notices
            .iter()
            .filter(|n| expired_at(n.expiry_date, now))
            .count() as u64,
        recent_notices: notices
            .iter()
            .filter(|n| n.created_at >= recent_since)
            .count() as u64,
        notices_by_priority: by_priority
            .into_values()
            .map(|(priority, count)| PriorityCount { priority, count })
            .collect(),
        notices_by_audience: by_audience
            .into_values()
            .map(|(target_audience, count)| AudienceCount {
                target_audience,
                count,
            })
            .collect(),
    })
}
