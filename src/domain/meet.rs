// ==========================================
// 田径运动会分组编排系统 - 运动会名册快照
// ==========================================
// 职责: 汇总名册/学校/项目三个只读集合，供分组引擎查询
// ==========================================

use crate::domain::athlete::{Athlete, School};
use crate::domain::event::TrackEvent;
use crate::domain::types::{AgeCategory, Gender};
use serde::{Deserialize, Serialize};

// ==========================================
// MeetRoster - 名册快照
// ==========================================
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MeetRoster {
    #[serde(default)]
    pub athletes: Vec<Athlete>,
    #[serde(default)]
    pub schools: Vec<School>,
    #[serde(default)]
    pub events: Vec<TrackEvent>,
}

/// 接力报名项：每个接力项目 × 每所学校
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RelayEntry {
    pub event_id: String,
    pub event_name: String,
    pub school_id: String,
    pub school_name: String,
    pub gender: Gender,
    pub age_group: AgeCategory,
}

impl MeetRoster {
    pub fn new(athletes: Vec<Athlete>, schools: Vec<School>, events: Vec<TrackEvent>) -> Self {
        Self {
            athletes,
            schools,
            events,
        }
    }

    pub fn find_event(&self, event_id: &str) -> Option<&TrackEvent> {
        self.events.iter().find(|e| e.id == event_id)
    }

    /// 符合项目参赛资格的运动员（保持名册顺序）
    pub fn eligible_athletes(&self, event: &TrackEvent) -> Vec<&Athlete> {
        self.athletes.iter().filter(|a| event.admits(a)).collect()
    }

    /// 所有接力报名项（接力项目按项目顺序，学校按名册顺序）
    pub fn relay_entries(&self) -> Vec<RelayEntry> {
        self.events
            .iter()
            .filter(|e| e.event_type.is_relay())
            .flat_map(|event| {
                self.schools.iter().map(move |school| RelayEntry {
                    event_id: event.id.clone(),
                    event_name: event.name.clone(),
                    school_id: school.id.clone(),
                    school_name: school.name.clone(),
                    gender: event.gender,
                    age_group: event.age_group,
                })
            })
            .collect()
    }
}
