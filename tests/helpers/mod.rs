// ==========================================
// 测试数据构建器 - 用于集成测试
// ==========================================

#![allow(dead_code)]

use chrono::NaiveDate;
use std::collections::{BTreeMap, BTreeSet};
use track_meet_heats::domain::{AgeCategory, Athlete, Gender, MeetRoster, School, TrackEvent};

/// 创建测试运动员
pub fn athlete(
    id: &str,
    school_id: &str,
    gender: Gender,
    age: AgeCategory,
    events: &[&str],
) -> Athlete {
    Athlete {
        id: id.to_string(),
        name: format!("Athlete {}", id),
        gender,
        date_of_birth: NaiveDate::from_ymd_opt(2013, 5, 1).unwrap(),
        age_category: age,
        school_id: school_id.to_string(),
        events: events.iter().map(|e| e.to_string()).collect::<BTreeSet<_>>(),
        personal_bests: BTreeMap::new(),
    }
}

/// 创建 n 所学校，ID 为 S1..Sn
pub fn schools(n: usize) -> Vec<School> {
    (1..=n)
        .map(|i| School::new(format!("S{}", i), format!("School {}", i)))
        .collect()
}

// ==========================================
// MeetRoster 构建器
// ==========================================

pub struct RosterBuilder {
    roster: MeetRoster,
}

impl RosterBuilder {
    pub fn new() -> Self {
        Self {
            roster: MeetRoster::default(),
        }
    }

    pub fn schools(mut self, n: usize) -> Self {
        self.roster.schools = schools(n);
        self
    }

    pub fn event(mut self, id: &str, name: &str, gender: Gender, age: AgeCategory) -> Self {
        self.roster
            .events
            .push(TrackEvent::new(id, name, gender, age));
        self
    }

    pub fn athlete(mut self, athlete: Athlete) -> Self {
        self.roster.athletes.push(athlete);
        self
    }

    /// 为项目批量报名：per_school[i] 为学校 S{i+1} 的报名人数
    ///
    /// 运动员ID形如 `{event}-S{i}-{k}`
    pub fn entries(
        mut self,
        event_name: &str,
        gender: Gender,
        age: AgeCategory,
        per_school: &[usize],
    ) -> Self {
        for (i, count) in per_school.iter().enumerate() {
            let school_id = format!("S{}", i + 1);
            for k in 1..=*count {
                let id = format!("{}-{}-{}", event_name, school_id, k);
                self.roster
                    .athletes
                    .push(athlete(&id, &school_id, gender, age, &[event_name]));
            }
        }
        self
    }

    pub fn build(self) -> MeetRoster {
        self.roster
    }
}

impl Default for RosterBuilder {
    fn default() -> Self {
        Self::new()
    }
}
