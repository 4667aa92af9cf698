// ==========================================
// 田径运动会分组编排系统 - 分组领域模型
// ==========================================
// 生命周期: 由一次分组生成整体创建，整体替换同项目旧分组；
//          之后只由名次录入、增删道次原地修改
// 存储格式: Heat 数组的 JSON
// ==========================================

use crate::domain::types::{HeatKind, HeatStatus};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ==========================================
// LaneOccupant - 道次占用者
// ==========================================
// 个人项目为运动员ID，接力项目为学校ID
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "id", rename_all = "lowercase")]
pub enum LaneOccupant {
    Athlete(String),
    School(String),
}

impl LaneOccupant {
    /// 按分组类别构造占用者
    pub fn for_kind(kind: HeatKind, id: impl Into<String>) -> Self {
        match kind {
            HeatKind::Individual => LaneOccupant::Athlete(id.into()),
            HeatKind::Relay => LaneOccupant::School(id.into()),
        }
    }

    pub fn id(&self) -> &str {
        match self {
            LaneOccupant::Athlete(id) | LaneOccupant::School(id) => id,
        }
    }
}

// ==========================================
// Lane - 道次
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Lane {
    /// 道次号（组内唯一，正整数）
    pub lane: u32,
    pub occupant: LaneOccupant,
    /// 名次（未录入为 None；不保证组内唯一）
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<u32>,
}

impl Lane {
    pub fn new(lane: u32, occupant: LaneOccupant) -> Self {
        Self {
            lane,
            occupant,
            position: None,
        }
    }

    pub fn occupant_id(&self) -> &str {
        self.occupant.id()
    }
}

// ==========================================
// Heat - 分组
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Heat {
    pub id: String,
    pub event_id: String,
    /// 组号（同项目内从 1 连续编号）
    pub heat_number: u32,
    pub kind: HeatKind,
    pub lanes: Vec<Lane>,
    #[serde(default)]
    pub status: HeatStatus,
}

impl Heat {
    /// 创建分组，ID 形如 `{event_id}-heat-{n}-{uuid}`
    pub fn new(event_id: &str, heat_number: u32, kind: HeatKind, lanes: Vec<Lane>) -> Self {
        Self {
            id: format!("{}-heat-{}-{}", event_id, heat_number, Uuid::new_v4().simple()),
            event_id: event_id.to_string(),
            heat_number,
            kind,
            lanes,
            status: HeatStatus::Pending,
        }
    }

    /// 创建 Open 组的单一分组，ID 形如 `{event_id}-open-{uuid}`
    pub fn new_open(event_id: &str, lanes: Vec<Lane>) -> Self {
        Self {
            id: format!("{}-open-{}", event_id, Uuid::new_v4().simple()),
            event_id: event_id.to_string(),
            heat_number: 1,
            kind: HeatKind::Individual,
            lanes,
            status: HeatStatus::Pending,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.lanes.is_empty()
    }

    /// 按占用者ID查找道次下标
    pub fn lane_index_of(&self, occupant_id: &str) -> Option<usize> {
        self.lanes.iter().position(|l| l.occupant_id() == occupant_id)
    }

    pub fn contains_occupant(&self, occupant_id: &str) -> bool {
        self.lane_index_of(occupant_id).is_some()
    }

    /// 追加道次时使用的道次号：max(现有道次号, 0) + 1（不回填空缺）
    pub fn next_lane_number(&self) -> u32 {
        self.lanes.iter().map(|l| l.lane).max().unwrap_or(0) + 1
    }

    pub fn occupant_ids(&self) -> Vec<&str> {
        self.lanes.iter().map(Lane::occupant_id).collect()
    }

    /// 序列化分组集合为 JSON 数组（持久化协作方的存储格式）
    pub fn to_json_array(heats: &[Heat]) -> serde_json::Result<String> {
        serde_json::to_string(heats)
    }

    pub fn from_json_array(raw: &str) -> serde_json::Result<Vec<Heat>> {
        serde_json::from_str(raw)
    }
}
