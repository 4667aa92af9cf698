// ==========================================
// 田径运动会分组编排系统 - 领域模型层
// ==========================================
// 职责: 定义领域实体、类型
// 红线: 不含数据访问逻辑,不含引擎逻辑
// ==========================================

pub mod athlete;
pub mod event;
pub mod heat;
pub mod meet;
pub mod types;

// 重导出核心类型
pub use athlete::{Athlete, School};
pub use event::TrackEvent;
pub use heat::{Heat, Lane, LaneOccupant};
pub use meet::{MeetRoster, RelayEntry};
pub use types::{AgeCategory, EventType, Gender, HeatKind, HeatStatus};
