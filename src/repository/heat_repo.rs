// ==========================================
// 田径运动会分组编排系统 - 分组 Repository Trait
// ==========================================
// 职责: 定义分组集合的数据访问接口
// 红线: Repository 不含业务规则，只做数据存取
// 约束: replace_for_event 整体替换，要么全部生效要么不生效
// ==========================================

use crate::domain::heat::Heat;
use crate::repository::error::{RepositoryError, RepositoryResult};
use std::sync::{Mutex, MutexGuard};

// ==========================================
// HeatRepository Trait
// ==========================================
// 实现者: InMemoryHeatRepository / SqliteHeatRepository
pub trait HeatRepository: Send + Sync {
    /// 读取全部分组（按写入顺序）
    fn load_all(&self) -> RepositoryResult<Vec<Heat>>;

    /// 整体替换指定项目的分组（新分组追加在末尾）
    fn replace_for_event(&self, event_id: &str, heats: &[Heat]) -> RepositoryResult<()>;

    /// 用给定集合覆盖全部分组
    fn save_all(&self, heats: &[Heat]) -> RepositoryResult<()>;

    /// 清空全部分组
    fn clear(&self) -> RepositoryResult<()>;

    /// 读取指定项目的分组（按组号升序）
    fn load(&self, event_id: &str) -> RepositoryResult<Vec<Heat>> {
        let mut heats: Vec<Heat> = self
            .load_all()?
            .into_iter()
            .filter(|h| h.event_id == event_id)
            .collect();
        heats.sort_by_key(|h| h.heat_number);
        Ok(heats)
    }

    /// 按分组ID查找
    fn find_heat(&self, heat_id: &str) -> RepositoryResult<Option<Heat>> {
        Ok(self.load_all()?.into_iter().find(|h| h.id == heat_id))
    }
}

// ==========================================
// InMemoryHeatRepository - 内存实现
// ==========================================
// 用途: 单元测试、无需落盘的场景
#[derive(Default)]
pub struct InMemoryHeatRepository {
    heats: Mutex<Vec<Heat>>,
}

impl InMemoryHeatRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// 以已有分组初始化
    pub fn with_heats(heats: Vec<Heat>) -> Self {
        Self {
            heats: Mutex::new(heats),
        }
    }

    fn guard(&self) -> RepositoryResult<MutexGuard<'_, Vec<Heat>>> {
        self.heats
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }
}

impl HeatRepository for InMemoryHeatRepository {
    fn load_all(&self) -> RepositoryResult<Vec<Heat>> {
        Ok(self.guard()?.clone())
    }

    fn replace_for_event(&self, event_id: &str, heats: &[Heat]) -> RepositoryResult<()> {
        let mut stored = self.guard()?;
        stored.retain(|h| h.event_id != event_id);
        stored.extend(heats.iter().cloned());
        Ok(())
    }

    fn save_all(&self, heats: &[Heat]) -> RepositoryResult<()> {
        *self.guard()? = heats.to_vec();
        Ok(())
    }

    fn clear(&self) -> RepositoryResult<()> {
        self.guard()?.clear();
        Ok(())
    }
}
