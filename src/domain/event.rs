// ==========================================
// 田径运动会分组编排系统 - 比赛项目
// ==========================================

use crate::domain::athlete::Athlete;
use crate::domain::types::{AgeCategory, EventType, Gender, HeatKind};
use serde::{Deserialize, Serialize};

// ==========================================
// TrackEvent - 比赛项目
// ==========================================
// 项目类型决定分组方式，性别+年龄组决定参赛资格
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackEvent {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub event_type: EventType,
    pub gender: Gender,
    pub age_group: AgeCategory,
}

impl TrackEvent {
    /// 按项目名推断类型创建项目（报名导入时自动建项目的规则）
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        gender: Gender,
        age_group: AgeCategory,
    ) -> Self {
        let name = name.into();
        Self {
            id: id.into(),
            event_type: EventType::infer_from_name(&name),
            name,
            gender,
            age_group,
        }
    }

    pub fn heat_kind(&self) -> HeatKind {
        HeatKind::from(self.event_type)
    }

    /// 参赛资格：报名了该项目，且性别、年龄组完全一致
    pub fn admits(&self, athlete: &Athlete) -> bool {
        athlete.is_entered_in(&self.name)
            && athlete.gender == self.gender
            && athlete.age_category == self.age_group
    }
}
