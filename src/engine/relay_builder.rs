// ==========================================
// 田径运动会分组编排系统 - 接力分组构建器
// ==========================================
// 职责: 以学校为单位分组（接力按队计分）
// 规则:
//   num_heats = ceil(学校数 / 目标组容量)
//   base = floor(学校数 / num_heats), extra = 学校数 mod num_heats
//   前 extra 组各 base+1 所学校，其余各 base 所
//   学校整体洗牌一次，组内道次按洗牌顺序从 1 编号
// ==========================================

use crate::domain::athlete::School;
use crate::domain::heat::{Heat, Lane, LaneOccupant};
use crate::domain::types::HeatKind;
use crate::engine::shuffle::{shuffled, ShuffleSource};
use tracing::instrument;

/// 默认每组学校数
pub const DEFAULT_RELAY_TARGET_PER_HEAT: usize = 6;

// ==========================================
// RelayHeatBuilder - 接力分组构建器
// ==========================================
pub struct RelayHeatBuilder {
    target_per_heat: usize,
}

impl RelayHeatBuilder {
    pub fn new(target_per_heat: usize) -> Self {
        Self {
            target_per_heat: target_per_heat.max(1),
        }
    }

    /// 计算各组学校数
    pub fn heat_sizes(&self, total_schools: usize) -> Vec<usize> {
        if total_schools == 0 {
            return Vec::new();
        }
        let num_heats = total_schools.div_ceil(self.target_per_heat);
        let base = total_schools / num_heats;
        let extra = total_schools % num_heats;

        (0..num_heats)
            .map(|i| if i < extra { base + 1 } else { base })
            .collect()
    }

    /// 构建接力分组
    #[instrument(skip(self, schools, shuffle), fields(schools_count = schools.len()))]
    pub fn build(
        &self,
        event_id: &str,
        schools: &[School],
        shuffle: &mut dyn ShuffleSource,
    ) -> Vec<Heat> {
        let school_ids: Vec<String> = schools.iter().map(|s| s.id.clone()).collect();
        let mut order = shuffled(shuffle, school_ids).into_iter();

        let heats: Vec<Heat> = self
            .heat_sizes(schools.len())
            .into_iter()
            .map(|size| {
                order
                    .by_ref()
                    .take(size)
                    .zip(1u32..)
                    .map(|(school_id, lane)| Lane::new(lane, LaneOccupant::School(school_id)))
                    .collect::<Vec<Lane>>()
            })
            .filter(|lanes| !lanes.is_empty())
            .zip(1u32..)
            .map(|(lanes, heat_number)| Heat::new(event_id, heat_number, HeatKind::Relay, lanes))
            .collect();

        tracing::debug!(heats_count = heats.len(), "接力分组完成");
        heats
    }
}

impl Default for RelayHeatBuilder {
    fn default() -> Self {
        Self::new(DEFAULT_RELAY_TARGET_PER_HEAT)
    }
}
