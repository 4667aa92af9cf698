// ==========================================
// 田径运动会分组编排系统 - 运动员与学校
// ==========================================
// 所有权: 名册协作方；分组引擎只读
// ==========================================

use crate::domain::types::{AgeCategory, Gender};
use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::{BTreeMap, BTreeSet};

// ==========================================
// School - 学校
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct School {
    pub id: String,
    pub name: String,
}

impl School {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }
}

// ==========================================
// Athlete - 运动员
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Athlete {
    pub id: String,
    pub name: String,
    #[serde(deserialize_with = "deserialize_gender")]
    pub gender: Gender,
    pub date_of_birth: NaiveDate,
    /// 报名表中的年龄组为自由文本（如 "Girls U13"），读取时宽松解析
    #[serde(deserialize_with = "deserialize_age_category")]
    pub age_category: AgeCategory,
    pub school_id: String,

    /// 报名项目名集合（顺序无意义）
    #[serde(default)]
    pub events: BTreeSet<String>,

    /// 个人最好成绩，按项目名索引（原样保存成绩文本）
    #[serde(default)]
    pub personal_bests: BTreeMap<String, String>,
}

impl Athlete {
    /// 是否报名了指定项目
    pub fn is_entered_in(&self, event_name: &str) -> bool {
        self.events.contains(event_name)
    }
}

fn deserialize_gender<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Gender, D::Error> {
    let raw = String::deserialize(deserializer)?;
    raw.parse().map_err(serde::de::Error::custom)
}

fn deserialize_age_category<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<AgeCategory, D::Error> {
    let raw = String::deserialize(deserializer)?;
    Ok(AgeCategory::parse_lenient(&raw))
}
