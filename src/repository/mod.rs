// ==========================================
// 田径运动会分组编排系统 - 数据仓储层
// ==========================================
// 红线: Repository 不含业务逻辑
// ==========================================
// 职责: 提供分组集合的存取接口,屏蔽存储细节
// 约束: 所有查询使用参数化,防止 SQL 注入
// ==========================================

pub mod error;
pub mod heat_repo;
pub mod heat_repo_impl;

// 重导出核心仓储
pub use error::{RepositoryError, RepositoryResult};
pub use heat_repo::{HeatRepository, InMemoryHeatRepository};
pub use heat_repo_impl::SqliteHeatRepository;
