//! `SeaORM` string-backed enums shared by several entities

use sea_orm::entity::prelude::*;
use sea_orm::Iterable;
use serde::{Deserialize, Serialize};
use std::fmt;
use utoipa::ToSchema;

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize, ToSchema,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::None)")]
pub enum ExamType {
    #[sea_orm(string_value = "Final Term")]
    #[serde(rename = "Final Term")]
    FinalTerm,
    #[sea_orm(string_value = "Mid Term")]
    #[serde(rename = "Mid Term")]
    MidTerm,
    #[sea_orm(string_value = "Monthly Test")]
    #[serde(rename = "Monthly Test")]
    MonthlyTest,
}

impl ExamType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ExamType::FinalTerm => "Final Term",
            ExamType::MidTerm => "Mid Term",
            ExamType::MonthlyTest => "Monthly Test",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        Self::iter().find(|exam_type| exam_type.as_str() == value)
    }
}

impl fmt::Display for ExamType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Letter grade, ordered best first.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    EnumIter,
    DeriveActiveEnum,
    Serialize,
    Deserialize,
    ToSchema,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::None)")]
pub enum Grade {
    #[sea_orm(string_value = "A+")]
    #[serde(rename = "A+")]
    APlus,
    #[sea_orm(string_value = "A")]
    #[serde(rename = "A")]
    A,
    #[sea_orm(string_value = "B+")]
    #[serde(rename = "B+")]
    BPlus,
    #[sea_orm(string_value = "B")]
    #[serde(rename = "B")]
    B,
    #[sea_orm(string_value = "C")]
    #[serde(rename = "C")]
    C,
    #[sea_orm(string_value = "D")]
    #[serde(rename = "D")]
    D,
    #[sea_orm(string_value = "F")]
    #[serde(rename = "F")]
    F,
}

impl Grade {
    pub fn as_str(&self) -> &'static str {
        match self {
            Grade::APlus => "A+",
            Grade::A => "A",
            Grade::BPlus => "B+",
            Grade::B => "B",
            Grade::C => "C",
            Grade::D => "D",
            Grade::F => "F",
        }
    }
}

impl fmt::Display for Grade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize, ToSchema,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::None)")]
#[serde(rename_all = "lowercase")]
pub enum NoticePriority {
    #[sea_orm(string_value = "low")]
    Low,
    #[sea_orm(string_value = "medium")]
    Medium,
    #[sea_orm(string_value = "high")]
    High,
    #[sea_orm(string_value = "urgent")]
    Urgent,
}

impl NoticePriority {
    pub fn as_str(&self) -> &'static str {
        match self {
            NoticePriority::Low => "low",
            NoticePriority::Medium => "medium",
            NoticePriority::High => "high",
            NoticePriority::Urgent => "urgent",
        }
    }

    /// Higher is more important.
    pub fn rank(&self) -> u8 {
        match self {
            NoticePriority::Low => 0,
            NoticePriority::Medium => 1,
            NoticePriority::High => 2,
            NoticePriority::Urgent => 3,
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        Self::iter().find(|priority| priority.as_str() == value)
    }
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize, ToSchema,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::None)")]
#[serde(rename_all = "lowercase")]
pub enum TargetAudience {
    #[sea_orm(string_value = "all")]
    All,
    #[sea_orm(string_value = "students")]
    Students,
    #[sea_orm(string_value = "teachers")]
    Teachers,
    #[sea_orm(string_value = "parents")]
    Parents,
}

impl TargetAudience {
    pub fn as_str(&self) -> &'static str {
        match self {
            TargetAudience::All => "all",
            TargetAudience::Students => "students",
            TargetAudience::Teachers => "teachers",
            TargetAudience::Parents => "parents",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        Self::iter().find(|audience| audience.as_str() == value)
    }
}
