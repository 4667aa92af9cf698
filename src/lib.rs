// ==========================================
// 田径运动会分组编排系统 - 核心库
// ==========================================
// 职责: 按学校均衡的分组编排、接力分组、名次录入
// 技术栈: Rust + SQLite
// ==========================================

// ==========================================
// 模块声明
// ==========================================

// 领域层 - 实体与类型
pub mod domain;

// 数据仓储层 - 数据访问
pub mod repository;

// 引擎层 - 分组与名次规则
pub mod engine;

// 配置层 - 分组参数
pub mod config;

// 数据库基础设施（连接初始化/PRAGMA 统一）
pub mod db;

// 日志系统
pub mod logging;

// API 层 - 业务接口
pub mod api;

// 应用层 - 组装
pub mod app;

// ==========================================
// 重导出核心类型
// ==========================================

// 领域类型
pub use domain::types::{AgeCategory, EventType, Gender, HeatKind, HeatStatus};

// 领域实体
pub use domain::{Athlete, Heat, Lane, LaneOccupant, MeetRoster, RelayEntry, School, TrackEvent};

// 引擎
pub use engine::{
    HeatAllocationEngine, IndividualHeatBuilder, KeyAction, PositionChange, PositionTracker,
    RandomShuffle, RelayHeatBuilder, SchoolBalancer, ShuffleSource,
};

// API
pub use api::{ApiError, ApiResult, HeatApi};

// ==========================================
// 常量定义
// ==========================================

// 系统版本
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// 系统名称
pub const APP_NAME: &str = "田径运动会分组编排系统";
