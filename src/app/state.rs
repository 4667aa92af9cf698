// ==========================================
// 田径运动会分组编排系统 - 应用状态
// ==========================================
// 职责: 管理应用级别的共享状态和API实例
// ==========================================

use std::path::Path;
use std::sync::{Arc, Mutex};

use crate::api::{ApiError, ApiResult, HeatApi};
use crate::config::{ConfigManager, HeatConfig};
use crate::db::{init_schema, open_sqlite_connection, read_schema_version, CURRENT_SCHEMA_VERSION};
use crate::domain::meet::MeetRoster;
use crate::engine::shuffle::{RandomShuffle, ShuffleSource};
use crate::repository::SqliteHeatRepository;

/// 数据库路径环境变量
pub const DB_PATH_ENV: &str = "TRACK_MEET_HEATS_DB_PATH";

/// 应用状态
///
/// 所有组件共享同一个数据库连接
pub struct AppState {
    /// 数据库路径
    pub db_path: String,

    /// 数据库中记录的 schema 版本
    pub schema_version: i64,

    /// 生效的分组参数
    pub config: HeatConfig,

    /// 配置管理器
    pub config_manager: Arc<ConfigManager>,

    /// 分组API
    pub heat_api: Arc<HeatApi>,
}

impl AppState {
    /// 创建新的AppState实例（系统熵随机源）
    ///
    /// # 说明
    /// 该方法会：
    /// 1. 打开数据库并建表（幂等）
    /// 2. 从 config_kv 读取分组参数
    /// 3. 创建分组API
    pub fn new(db_path: String) -> ApiResult<Self> {
        Self::with_shuffle(db_path, Box::new(RandomShuffle::from_entropy()))
    }

    /// 使用指定随机源创建AppState（测试注入固定种子）
    pub fn with_shuffle(db_path: String, shuffle: Box<dyn ShuffleSource>) -> ApiResult<Self> {
        tracing::info!(db_path = %db_path, "初始化AppState");

        let conn = open_sqlite_connection(&db_path).map_err(|e| {
            ApiError::DatabaseConnectionError(format!("无法打开数据库 {}: {}", db_path, e))
        })?;
        init_schema(&conn).map_err(|e| ApiError::DatabaseError(format!("建表失败: {}", e)))?;
        let schema_version = read_schema_version(&conn)
            .map_err(|e| ApiError::DatabaseError(format!("读取 schema 版本失败: {}", e)))?
            .unwrap_or(CURRENT_SCHEMA_VERSION);
        if schema_version != CURRENT_SCHEMA_VERSION {
            tracing::warn!(
                schema_version,
                expected = CURRENT_SCHEMA_VERSION,
                "数据库 schema 版本与程序不一致"
            );
        }
        let conn = Arc::new(Mutex::new(conn));

        let config_manager = Arc::new(ConfigManager::from_connection(conn.clone())?);
        let config = config_manager.get_heat_config()?;
        tracing::info!(
            lane_capacity = config.lane_capacity,
            relay_target_per_heat = config.relay_target_per_heat,
            "分组参数已加载"
        );

        let heat_repo = Arc::new(SqliteHeatRepository::from_connection(conn));
        let heat_api = Arc::new(HeatApi::new(heat_repo, config, shuffle));

        Ok(Self {
            db_path,
            schema_version,
            config,
            config_manager,
            heat_api,
        })
    }
}

// ==========================================
// 辅助函数
// ==========================================

/// 获取默认数据库路径
///
/// # 返回
/// - 环境变量 TRACK_MEET_HEATS_DB_PATH（非空时）
/// - 用户数据目录/track-meet-heats/track_meet_heats.db
/// - 取不到用户数据目录时: ./track_meet_heats.db
pub fn get_default_db_path() -> String {
    if let Ok(path) = std::env::var(DB_PATH_ENV) {
        let trimmed = path.trim();
        if !trimmed.is_empty() {
            return trimmed.to_string();
        }
    }

    let Some(data_dir) = dirs::data_dir() else {
        return "./track_meet_heats.db".to_string();
    };

    let dir = data_dir.join("track-meet-heats");
    if let Err(e) = std::fs::create_dir_all(&dir) {
        tracing::warn!(dir = %dir.display(), error = %e, "数据目录创建失败，使用当前目录");
        return "./track_meet_heats.db".to_string();
    }

    dir.join("track_meet_heats.db").to_string_lossy().to_string()
}

/// 读取名册 JSON 文件
pub fn load_roster_file(path: impl AsRef<Path>) -> ApiResult<MeetRoster> {
    let path = path.as_ref();
    let raw = std::fs::read_to_string(path).map_err(|e| {
        ApiError::InvalidInput(format!("无法读取名册文件 {}: {}", path.display(), e))
    })?;

    let roster: MeetRoster = serde_json::from_str(&raw)?;
    tracing::debug!(
        athletes = roster.athletes.len(),
        schools = roster.schools.len(),
        events = roster.events.len(),
        "名册已加载"
    );
    Ok(roster)
}
