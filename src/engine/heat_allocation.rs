// ==========================================
// 田径运动会分组编排系统 - 分组生成引擎（门面）
// ==========================================
// 职责: 按项目类型选择接力/个人分组构建器，
//       并整体替换该项目的旧分组
// 约束: 其他项目的分组保持不变；未知项目或无合格报名时
//       原样返回分组集合
// ==========================================

use crate::config::HeatConfig;
use crate::domain::heat::Heat;
use crate::domain::meet::MeetRoster;
use crate::domain::types::HeatKind;
use crate::engine::individual_builder::IndividualHeatBuilder;
use crate::engine::relay_builder::RelayHeatBuilder;
use crate::engine::shuffle::ShuffleSource;
use tracing::instrument;

// ==========================================
// HeatAllocationEngine - 分组生成引擎
// ==========================================
pub struct HeatAllocationEngine {
    relay_builder: RelayHeatBuilder,
    individual_builder: IndividualHeatBuilder,
    shuffle: Box<dyn ShuffleSource>,
}

impl HeatAllocationEngine {
    /// 创建引擎
    ///
    /// # 参数
    /// - `config`: 分组参数（道次容量、接力每组学校数）
    /// - `shuffle`: 随机源（测试注入固定种子）
    pub fn new(config: &HeatConfig, shuffle: Box<dyn ShuffleSource>) -> Self {
        Self {
            relay_builder: RelayHeatBuilder::new(config.relay_target_per_heat),
            individual_builder: IndividualHeatBuilder::new(config.lane_capacity),
            shuffle,
        }
    }

    /// 为单个项目构建新分组
    ///
    /// # 返回
    /// - `None`: 项目不存在
    /// - `Some(heats)`: 新分组（可能为空）
    pub fn build_for_event(&mut self, event_id: &str, roster: &MeetRoster) -> Option<Vec<Heat>> {
        let event = roster.find_event(event_id)?;

        let heats = match event.heat_kind() {
            HeatKind::Relay => {
                self.relay_builder
                    .build(&event.id, &roster.schools, self.shuffle.as_mut())
            }
            HeatKind::Individual => {
                self.individual_builder
                    .build(event, roster, self.shuffle.as_mut())
            }
        };

        Some(heats)
    }

    /// 生成分组并整体替换该项目旧分组
    ///
    /// # 参数
    /// - `event_id`: 项目ID
    /// - `roster`: 名册快照（只读）
    /// - `heats`: 当前全部分组
    ///
    /// # 返回
    /// 更新后的全部分组；未知项目或新分组为空时原样返回
    #[instrument(skip(self, roster, heats), fields(existing_heats = heats.len()))]
    pub fn generate_heats(
        &mut self,
        event_id: &str,
        roster: &MeetRoster,
        heats: Vec<Heat>,
    ) -> Vec<Heat> {
        let Some(new_heats) = self.build_for_event(event_id, roster) else {
            tracing::debug!("项目不存在，分组保持不变");
            return heats;
        };

        if new_heats.is_empty() {
            tracing::debug!("无可分组报名，分组保持不变");
            return heats;
        }

        tracing::info!(new_heats = new_heats.len(), "分组已生成");
        replace_event_heats(heats, event_id, new_heats)
    }
}

/// 用新分组整体替换指定项目的分组（其他项目保持原顺序，新分组追加在后）
pub fn replace_event_heats(heats: Vec<Heat>, event_id: &str, new_heats: Vec<Heat>) -> Vec<Heat> {
    heats
        .into_iter()
        .filter(|h| h.event_id != event_id)
        .chain(new_heats.into_iter().filter(|h| !h.is_empty()))
        .collect()
}
