// ==========================================
// 田径运动会分组编排系统 - 命令行入口
// ==========================================
// 用法:
//   track-meet-heats <roster.json> [event_id ...]
// 未指定项目时为名册中全部项目生成分组，
// 结果写入数据库并以 JSON 数组输出到 stdout
// ==========================================

use anyhow::{bail, Context};
use track_meet_heats::app::{get_default_db_path, load_roster_file, AppState};
use track_meet_heats::{logging, Heat, APP_NAME, VERSION};

fn main() -> anyhow::Result<()> {
    logging::init();

    let mut args = std::env::args().skip(1);
    let Some(roster_path) = args.next() else {
        bail!("用法: track-meet-heats <roster.json> [event_id ...]");
    };
    let requested: Vec<String> = args
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect();

    tracing::info!("{} v{}", APP_NAME, VERSION);

    let db_path = get_default_db_path();
    tracing::info!(db_path = %db_path, "使用数据库");

    let state = AppState::new(db_path).context("无法初始化AppState")?;
    let roster = load_roster_file(&roster_path)
        .with_context(|| format!("无法加载名册: {}", roster_path))?;

    let event_ids: Vec<String> = if requested.is_empty() {
        roster.events.iter().map(|e| e.id.clone()).collect()
    } else {
        requested
    };

    for event_id in &event_ids {
        if roster.find_event(event_id).is_none() {
            tracing::warn!(event_id = %event_id, "名册中无此项目，跳过");
            continue;
        }
        state
            .heat_api
            .generate_heats(event_id, &roster)
            .with_context(|| format!("项目 {} 分组失败", event_id))?;
    }

    let mut output: Vec<Heat> = Vec::new();
    for event_id in &event_ids {
        output.extend(state.heat_api.heats_for_event(event_id)?);
    }

    println!("{}", Heat::to_json_array(&output)?);
    Ok(())
}
