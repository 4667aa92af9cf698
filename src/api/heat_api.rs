// ==========================================
// 田径运动会分组编排系统 - 分组 API
// ==========================================
// 职责: 分组生成、名次录入、增删道次、键盘命令，
//       每次变更后落库
// 并发: 所有写操作在同一把锁内完成“读取-计算-写回”，
//       保证整体替换语义
// ==========================================

use std::sync::{Arc, Mutex, MutexGuard};

use crate::api::error::{ApiError, ApiResult};
use crate::config::HeatConfig;
use crate::domain::heat::Heat;
use crate::domain::meet::MeetRoster;
use crate::engine::heat_allocation::{replace_event_heats, HeatAllocationEngine};
use crate::engine::position_tracker::{KeyAction, PositionTracker};
use crate::engine::shuffle::ShuffleSource;
use crate::repository::heat_repo::HeatRepository;

// ==========================================
// HeatApi - 分组 API
// ==========================================

/// 分组API
///
/// 职责：
/// 1. 生成分组（整体替换项目旧分组）
/// 2. 名次录入 / 清除
/// 3. 增删道次
/// 4. 键盘命令解释与执行
pub struct HeatApi {
    heat_repo: Arc<dyn HeatRepository>,
    /// 分组引擎；此锁同时串行化所有写操作
    engine: Mutex<HeatAllocationEngine>,
    tracker: PositionTracker,
}

impl HeatApi {
    /// 创建新的HeatApi实例
    pub fn new(
        heat_repo: Arc<dyn HeatRepository>,
        config: HeatConfig,
        shuffle: Box<dyn ShuffleSource>,
    ) -> Self {
        Self {
            heat_repo,
            engine: Mutex::new(HeatAllocationEngine::new(&config, shuffle)),
            tracker: PositionTracker::new(config.max_key_position()),
        }
    }

    fn lock_engine(&self) -> ApiResult<MutexGuard<'_, HeatAllocationEngine>> {
        self.engine
            .lock()
            .map_err(|e| ApiError::InternalError(format!("分组引擎锁获取失败: {}", e)))
    }

    /// 生成项目分组
    ///
    /// # 返回
    /// - Ok(Vec<Heat>): 更新后的全部分组；项目不存在或无可分组报名时为原分组
    /// - Err(ApiError): 存储错误
    pub fn generate_heats(&self, event_id: &str, roster: &MeetRoster) -> ApiResult<Vec<Heat>> {
        let mut engine = self.lock_engine()?;
        let heats = self.heat_repo.load_all()?;

        let new_heats = match engine.build_for_event(event_id, roster) {
            Some(new_heats) if !new_heats.is_empty() => new_heats,
            _ => {
                tracing::debug!(event_id, "无需替换分组");
                return Ok(heats);
            }
        };

        self.heat_repo.replace_for_event(event_id, &new_heats)?;
        tracing::info!(event_id, heats_count = new_heats.len(), "分组已生成并保存");

        Ok(replace_event_heats(heats, event_id, new_heats))
    }

    /// 设置或清除名次
    pub fn set_position(
        &self,
        heat_id: &str,
        occupant_id: &str,
        position: Option<u32>,
    ) -> ApiResult<Vec<Heat>> {
        self.mutate(|heats| {
            self.tracker
                .set_position(heats, heat_id, occupant_id, position)
        })
    }

    /// 向分组追加运动员（接力组为学校）
    pub fn add_athlete(&self, heat_id: &str, occupant_id: &str) -> ApiResult<Vec<Heat>> {
        self.mutate(|heats| self.tracker.add_occupant(heats, heat_id, occupant_id))
    }

    /// 从分组移除运动员（接力组为学校）
    pub fn remove_athlete(&self, heat_id: &str, occupant_id: &str) -> ApiResult<Vec<Heat>> {
        self.mutate(|heats| self.tracker.remove_occupant(heats, heat_id, occupant_id))
    }

    /// 解释按键（只读）
    pub fn interpret_key_command(
        &self,
        key: &str,
        heat_id: &str,
        occupant_id: &str,
        focus_index: usize,
    ) -> ApiResult<KeyAction> {
        let heats = self.heat_repo.load_all()?;
        Ok(self
            .tracker
            .interpret_key_command(key, &heats, heat_id, occupant_id, focus_index))
    }

    /// 解释并执行按键，返回更新后的分组与按键结果
    pub fn handle_key(
        &self,
        key: &str,
        heat_id: &str,
        occupant_id: &str,
        focus_index: usize,
    ) -> ApiResult<(Vec<Heat>, KeyAction)> {
        let _engine = self.lock_engine()?;
        let heats = self.heat_repo.load_all()?;
        let original = heats.clone();

        let (heats, action) =
            self.tracker
                .apply_key_command(key, heats, heat_id, occupant_id, focus_index);
        if heats != original {
            self.heat_repo.save_all(&heats)?;
        }
        Ok((heats, action))
    }

    /// 查询全部分组
    pub fn list_heats(&self) -> ApiResult<Vec<Heat>> {
        Ok(self.heat_repo.load_all()?)
    }

    /// 查询项目分组（按组号升序）
    pub fn heats_for_event(&self, event_id: &str) -> ApiResult<Vec<Heat>> {
        Ok(self.heat_repo.load(event_id)?)
    }

    /// 清空全部分组
    pub fn clear_heats(&self) -> ApiResult<()> {
        let _engine = self.lock_engine()?;
        self.heat_repo.clear()?;
        Ok(())
    }

    /// 读取-修改-写回；无变化时不写库
    fn mutate<F>(&self, f: F) -> ApiResult<Vec<Heat>>
    where
        F: FnOnce(Vec<Heat>) -> Vec<Heat>,
    {
        let _engine = self.lock_engine()?;
        let heats = self.heat_repo.load_all()?;
        let original = heats.clone();

        let updated = f(heats);
        if updated != original {
            self.heat_repo.save_all(&updated)?;
        }
        Ok(updated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::athlete::School;
    use crate::domain::event::TrackEvent;
    use crate::domain::types::{AgeCategory, Gender};
    use crate::engine::shuffle::IdentityShuffle;
    use crate::repository::heat_repo::InMemoryHeatRepository;

    fn relay_roster() -> MeetRoster {
        MeetRoster::new(
            vec![],
            (1..=4)
                .map(|i| School::new(format!("S{}", i), format!("School {}", i)))
                .collect(),
            vec![TrackEvent::new(
                "R1",
                "4x100m Relay",
                Gender::Female,
                AgeCategory::U13,
            )],
        )
    }

    fn api() -> (Arc<InMemoryHeatRepository>, HeatApi) {
        let repo = Arc::new(InMemoryHeatRepository::new());
        let api = HeatApi::new(repo.clone(), HeatConfig::default(), Box::new(IdentityShuffle));
        (repo, api)
    }

    #[test]
    fn test_generate_persists_heats() {
        let (repo, api) = api();
        let heats = api.generate_heats("R1", &relay_roster()).unwrap();

        assert_eq!(heats.len(), 1);
        assert_eq!(repo.load_all().unwrap(), heats);
        assert_eq!(api.heats_for_event("R1").unwrap(), heats);
    }

    #[test]
    fn test_unknown_event_leaves_store_untouched() {
        let (repo, api) = api();
        api.generate_heats("R1", &relay_roster()).unwrap();
        let before = repo.load_all().unwrap();

        let after = api.generate_heats("nope", &relay_roster()).unwrap();
        assert_eq!(after, before);
    }

    #[test]
    fn test_position_edits_are_saved() {
        let (repo, api) = api();
        let heats = api.generate_heats("R1", &relay_roster()).unwrap();
        let heat_id = heats[0].id.clone();

        api.set_position(&heat_id, "S3", Some(1)).unwrap();
        let (heats, action) = api.handle_key("2", &heat_id, "S1", 1).unwrap();

        assert!(!action.is_ignored());
        let stored = repo.load_all().unwrap();
        assert_eq!(stored, heats);
        assert_eq!(stored[0].occupant_ids(), vec!["S3", "S1", "S2", "S4"]);
    }

    #[test]
    fn test_add_remove_and_clear() {
        let (repo, api) = api();
        let heats = api.generate_heats("R1", &relay_roster()).unwrap();
        let heat_id = heats[0].id.clone();

        api.remove_athlete(&heat_id, "S2").unwrap();
        let heats = api.add_athlete(&heat_id, "S9").unwrap();
        let lanes: Vec<u32> = heats[0].lanes.iter().map(|l| l.lane).collect();
        assert_eq!(lanes, vec![1, 3, 4, 5]);

        let focus = api.interpret_key_command("ArrowDown", &heat_id, "S1", 0).unwrap();
        assert_eq!(focus.new_focus_index, Some(1));

        api.clear_heats().unwrap();
        assert!(repo.load_all().unwrap().is_empty());
        assert!(api.list_heats().unwrap().is_empty());
    }
}
