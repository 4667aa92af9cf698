// ==========================================
// 田径运动会分组编排系统 - 引擎层
// ==========================================
// 职责: 分组生成与名次录入规则
// 红线: Engine 不拼 SQL，同步执行，无 I/O
// ==========================================

pub mod heat_allocation;
pub mod individual_builder;
pub mod position_tracker;
pub mod relay_builder;
pub mod school_balancer;
pub mod shuffle;

// 重导出核心引擎
pub use heat_allocation::{replace_event_heats, HeatAllocationEngine};
pub use individual_builder::{IndividualHeatBuilder, DEFAULT_LANE_CAPACITY};
pub use position_tracker::{
    sort_lanes_by_position, EditKey, KeyAction, PositionChange, PositionTracker,
};
pub use relay_builder::{RelayHeatBuilder, DEFAULT_RELAY_TARGET_PER_HEAT};
pub use school_balancer::{BalanceEntry, BalanceResult, LaneAssignment, SchoolBalancer};
pub use shuffle::{shuffled, IdentityShuffle, RandomShuffle, ShuffleSource};
