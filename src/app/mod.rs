// ==========================================
// 田径运动会分组编排系统 - 应用层
// ==========================================
// 职责: 组装数据库、配置与 API 实例
// ==========================================

pub mod state;

// 重导出
pub use state::{get_default_db_path, load_roster_file, AppState};
