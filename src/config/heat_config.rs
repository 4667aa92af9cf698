// ==========================================
// 田径运动会分组编排系统 - 分组参数
// ==========================================

use crate::engine::individual_builder::DEFAULT_LANE_CAPACITY;
use crate::engine::relay_builder::DEFAULT_RELAY_TARGET_PER_HEAT;
use serde::{Deserialize, Serialize};

/// 分组参数
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeatConfig {
    /// 个人项目每组道次数（也是数字键可录入的最大名次）
    pub lane_capacity: usize,
    /// 接力项目每组目标学校数
    pub relay_target_per_heat: usize,
}

impl HeatConfig {
    /// 数字键可录入的最大名次
    pub fn max_key_position(&self) -> u32 {
        u32::try_from(self.lane_capacity).unwrap_or(u32::MAX)
    }
}

impl Default for HeatConfig {
    fn default() -> Self {
        Self {
            lane_capacity: DEFAULT_LANE_CAPACITY,
            relay_target_per_heat: DEFAULT_RELAY_TARGET_PER_HEAT,
        }
    }
}
