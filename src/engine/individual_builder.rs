// ==========================================
// 田径运动会分组编排系统 - 个人项目分组构建器
// ==========================================
// 职责: 按参赛资格筛选运动员并分组
// 规则:
//   - Open 组：所有合格运动员放入唯一一组，按名册顺序依次占道，
//     不限道次数、不做学校均衡、不随机
//   - 其余年龄组：每组容量 lane_capacity，
//     num_heats = ceil(合格人数 / lane_capacity)，交给学校均衡分配器
// ==========================================

use crate::domain::event::TrackEvent;
use crate::domain::heat::{Heat, Lane, LaneOccupant};
use crate::domain::meet::MeetRoster;
use crate::domain::types::HeatKind;
use crate::engine::school_balancer::{BalanceEntry, SchoolBalancer};
use crate::engine::shuffle::ShuffleSource;
use tracing::instrument;

/// 默认每组道次数
pub const DEFAULT_LANE_CAPACITY: usize = 8;

// ==========================================
// IndividualHeatBuilder - 个人项目分组构建器
// ==========================================
pub struct IndividualHeatBuilder {
    lane_capacity: usize,
    balancer: SchoolBalancer,
}

impl IndividualHeatBuilder {
    pub fn new(lane_capacity: usize) -> Self {
        Self {
            lane_capacity: lane_capacity.max(1),
            balancer: SchoolBalancer::new(),
        }
    }

    /// 构建个人项目分组；无合格运动员时返回空集合
    #[instrument(skip(self, roster, shuffle), fields(event_id = %event.id, age_group = %event.age_group))]
    pub fn build(
        &self,
        event: &TrackEvent,
        roster: &MeetRoster,
        shuffle: &mut dyn ShuffleSource,
    ) -> Vec<Heat> {
        let eligible = roster.eligible_athletes(event);
        if eligible.is_empty() {
            tracing::debug!("无合格运动员");
            return Vec::new();
        }

        if event.age_group.is_open() {
            let lanes: Vec<Lane> = eligible
                .iter()
                .zip(1u32..)
                .map(|(athlete, lane)| Lane::new(lane, LaneOccupant::Athlete(athlete.id.clone())))
                .collect();
            return vec![Heat::new_open(&event.id, lanes)];
        }

        let entries: Vec<BalanceEntry> = eligible
            .iter()
            .map(|a| BalanceEntry::new(a.id.clone(), a.school_id.clone()))
            .collect();
        let num_heats = entries.len().div_ceil(self.lane_capacity);

        let result = self
            .balancer
            .balance(&entries, self.lane_capacity, num_heats, shuffle);

        if !result.dropped.is_empty() {
            tracing::warn!(
                dropped_count = result.dropped.len(),
                "部分运动员未能分入分组"
            );
        }

        result
            .heats
            .into_iter()
            .zip(1u32..)
            .map(|(assignments, heat_number)| {
                let lanes = assignments
                    .into_iter()
                    .map(|a| Lane::new(a.lane, LaneOccupant::Athlete(a.entry_id)))
                    .collect();
                Heat::new(&event.id, heat_number, HeatKind::Individual, lanes)
            })
            .collect()
    }
}

impl Default for IndividualHeatBuilder {
    fn default() -> Self {
        Self::new(DEFAULT_LANE_CAPACITY)
    }
}
