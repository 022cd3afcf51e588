use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use crate::entities::{
    notice,
    sea_orm_active_enums::{NoticePriority, TargetAudience},
};
use crate::routes::common::{double_option, flag};
use crate::services::notice_service::{NoticeChanges, NoticeInput, NoticeQuery};

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NoticeRequest {
    pub title: Option<String>,
    pub content: Option<String>,
    pub is_active: Option<bool>,
    /// low, medium, high or urgent.
    #[schema(example = "medium")]
    pub priority: Option<String>,
    /// RFC 3339 timestamp or `YYYY-MM-DD`; `null` clears it on update.
    #[serde(default, deserialize_with = "double_option")]
    #[schema(value_type = Option<String>, example = "2026-12-31")]
    pub expiry_date: Option<Option<String>>,
    /// all, students, teachers or parents.
    #[schema(example = "all")]
    pub target_audience: Option<String>,
    pub created_by: Option<String>,
}

impl From<NoticeRequest> for NoticeInput {
    fn from(request: NoticeRequest) -> Self {
        Self {
            title: request.title,
            content: request.content,
            is_active: request.is_active,
            priority: request.priority,
            expiry_date: request.expiry_date.flatten(),
            target_audience: request.target_audience,
            created_by: request.created_by,
        }
    }
}

impl From<NoticeRequest> for NoticeChanges {
    fn from(request: NoticeRequest) -> Self {
        Self {
            title: request.title,
            content: request.content,
            is_active: request.is_active,
            priority: request.priority,
            expiry_date: request.expiry_date,
            target_audience: request.target_audience,
        }
    }
}

#[derive(Debug, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct NoticeListQuery {
    pub is_active: Option<String>,
    pub priority: Option<String>,
    pub target_audience: Option<String>,
    /// Expired notices are hidden unless this is `true`.
    pub include_expired: Option<String>,
    /// Matches title or content.
    pub search: Option<String>,
    pub page: Option<String>,
    pub limit: Option<String>,
}

fn number(value: &Option<String>) -> Option<u64> {
    value.as_deref().and_then(|v| v.trim().parse::<u64>().ok())
}

impl From<NoticeListQuery> for NoticeQuery {
    fn from(query: NoticeListQuery) -> Self {
        Self {
            is_active: flag(&query.is_active),
            include_expired: flag(&query.include_expired).unwrap_or(false),
            page: number(&query.page),
            limit: number(&query.limit),
            priority: query.priority,
            target_audience: query.target_audience,
            search: query.search,
        }
    }
}

#[derive(Debug, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct ActiveNoticeQuery {
    pub target_audience: Option<String>,
    pub priority: Option<String>,
}

#[derive(Debug, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct PriorityNoticeQuery {
    pub is_active: Option<String>,
    pub target_audience: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NoticeResponse {
    pub id: Uuid,
    pub title: String,
    pub content: String,
    pub is_active: bool,
    pub priority: NoticePriority,
    pub expiry_date: Option<NaiveDateTime>,
    pub target_audience: TargetAudience,
    pub created_by: String,
    pub is_expired: bool,
    pub is_currently_active: bool,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl NoticeResponse {
    pub fn at(notice: notice::Model, now: NaiveDateTime) -> Self {
        Self {
            is_expired: notice.is_expired_at(now),
            is_currently_active: notice.is_currently_active_at(now),
            id: notice.notice_id,
            title: notice.title,
            content: notice.content,
            is_active: notice.is_active,
            priority: notice.priority,
            expiry_date: notice.expiry_date,
            target_audience: notice.target_audience,
            created_by: notice.created_by,
            created_at: notice.created_at,
            updated_at: notice.updated_at,
        }
    }

    pub fn all_at(notices: Vec<notice::Model>, now: NaiveDateTime) -> Vec<Self> {
        notices.into_iter().map(|n| Self::at(n, now)).collect()
    }
}

/// One page of notices.
#[derive(Debug, Serialize, ToSchema)]
pub struct NoticeListResponse {
    pub success: bool,
    pub count: usize,
    pub total: u64,
    pub page: u64,
    pub pages: u64,
    pub data: Vec<NoticeResponse>,
}
