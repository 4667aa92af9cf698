// ==========================================
// 田径运动会分组编排系统 - 配置层
// ==========================================
// 职责: 分组参数及其覆写管理
// 存储: config_kv 表
// ==========================================

pub mod config_manager;
pub mod heat_config;

// 重导出核心配置
pub use config_manager::{config_keys, ConfigManager};
pub use heat_config::HeatConfig;
