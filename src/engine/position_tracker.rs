// ==========================================
// 田径运动会分组编排系统 - 名次录入
// ==========================================
// 职责: 录入/清除道次名次并重排、增删道次、
//       键盘命令解释（纯函数，便于脱离界面测试）
// 约束: 所有操作对未知分组/占用者为空操作，原样返回
// 说明: 不校验组内名次唯一（允许人工修正过程中出现重复名次）
// ==========================================

use crate::domain::heat::{Heat, Lane, LaneOccupant};
use std::cmp::Ordering;
use tracing::instrument;

// ==========================================
// 键盘命令
// ==========================================

/// 录入界面的按键
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditKey {
    Digit(u32),
    ArrowUp,
    ArrowDown,
    Delete,
    Backspace,
}

impl EditKey {
    /// 解析按键名（与浏览器 KeyboardEvent.key 一致）；无关按键返回 None
    pub fn parse(key: &str) -> Option<Self> {
        match key {
            "ArrowUp" => Some(EditKey::ArrowUp),
            "ArrowDown" => Some(EditKey::ArrowDown),
            "Delete" => Some(EditKey::Delete),
            "Backspace" => Some(EditKey::Backspace),
            _ => {
                let mut chars = key.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) => c.to_digit(10).map(EditKey::Digit),
                    _ => None,
                }
            }
        }
    }
}

/// 名次变更
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PositionChange {
    Set(u32),
    Clear,
}

impl PositionChange {
    pub fn as_position(&self) -> Option<u32> {
        match self {
            PositionChange::Set(p) => Some(*p),
            PositionChange::Clear => None,
        }
    }
}

/// 按键解释结果（两项都为空表示忽略该按键）
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct KeyAction {
    pub position_change: Option<PositionChange>,
    pub new_focus_index: Option<usize>,
}

impl KeyAction {
    pub fn is_ignored(&self) -> bool {
        self.position_change.is_none() && self.new_focus_index.is_none()
    }
}

// ==========================================
// PositionTracker - 名次录入
// ==========================================
pub struct PositionTracker {
    /// 数字键可录入的最大名次（= 每组道次数）
    max_key_position: u32,
}

impl PositionTracker {
    pub fn new(max_key_position: u32) -> Self {
        Self { max_key_position }
    }

    pub fn max_key_position(&self) -> u32 {
        self.max_key_position
    }

    /// 设置或清除名次，并按名次重排该组道次
    ///
    /// 排序规则：有名次在前且按名次升序；无名次在后并保持原相对顺序
    ///
    /// 名次上限为 max(数字键上限, 组内道次数)（Open 组可超过 8 道），
    /// 超出上限为空操作
    #[instrument(skip(self, heats))]
    pub fn set_position(
        &self,
        mut heats: Vec<Heat>,
        heat_id: &str,
        occupant_id: &str,
        position: Option<u32>,
    ) -> Vec<Heat> {
        if position == Some(0) {
            tracing::debug!("名次必须为正整数，忽略");
            return heats;
        }

        let Some(heat) = heats.iter_mut().find(|h| h.id == heat_id) else {
            tracing::debug!("分组不存在");
            return heats;
        };
        let Some(index) = heat.lane_index_of(occupant_id) else {
            tracing::debug!("占用者不在该分组");
            return heats;
        };
        if position.is_some_and(|p| p > self.position_limit(heat)) {
            tracing::debug!("名次超出上限，忽略");
            return heats;
        }

        heat.lanes[index].position = position;
        sort_lanes_by_position(&mut heat.lanes);
        heats
    }

    fn position_limit(&self, heat: &Heat) -> u32 {
        let lanes = u32::try_from(heat.lanes.len()).unwrap_or(u32::MAX);
        self.max_key_position.max(lanes)
    }

    /// 追加道次：道次号为 max(现有道次号, 0) + 1；已在组内则忽略
    #[instrument(skip(self, heats))]
    pub fn add_occupant(&self, mut heats: Vec<Heat>, heat_id: &str, occupant_id: &str) -> Vec<Heat> {
        let Some(heat) = heats.iter_mut().find(|h| h.id == heat_id) else {
            tracing::debug!("分组不存在");
            return heats;
        };
        if heat.contains_occupant(occupant_id) {
            tracing::debug!("占用者已在该分组");
            return heats;
        }

        let lane = heat.next_lane_number();
        heat.lanes
            .push(Lane::new(lane, LaneOccupant::for_kind(heat.kind, occupant_id)));
        heats
    }

    /// 删除道次（剩余道次不重新编号）
    #[instrument(skip(self, heats))]
    pub fn remove_occupant(
        &self,
        mut heats: Vec<Heat>,
        heat_id: &str,
        occupant_id: &str,
    ) -> Vec<Heat> {
        if let Some(heat) = heats.iter_mut().find(|h| h.id == heat_id) {
            heat.lanes.retain(|l| l.occupant_id() != occupant_id);
        }
        heats
    }

    /// 解释按键
    ///
    /// - 数字 1..=max_key_position：设置当前道次名次
    /// - ArrowUp / ArrowDown：焦点移到当前排序下的上一/下一道次
    /// - Delete / Backspace：清除当前道次名次
    /// - 其他按键、未知分组或占用者：忽略
    pub fn interpret_key_command(
        &self,
        key: &str,
        heats: &[Heat],
        heat_id: &str,
        occupant_id: &str,
        focus_index: usize,
    ) -> KeyAction {
        let Some(heat) = heats.iter().find(|h| h.id == heat_id) else {
            return KeyAction::default();
        };
        if !heat.contains_occupant(occupant_id) {
            return KeyAction::default();
        }

        match EditKey::parse(key) {
            Some(EditKey::Digit(d)) if (1..=self.max_key_position).contains(&d) => KeyAction {
                position_change: Some(PositionChange::Set(d)),
                new_focus_index: None,
            },
            Some(EditKey::ArrowUp) => KeyAction {
                position_change: None,
                new_focus_index: focus_index
                    .checked_sub(1)
                    .filter(|&i| i < heat.lanes.len()),
            },
            Some(EditKey::ArrowDown) => KeyAction {
                position_change: None,
                new_focus_index: focus_index
                    .checked_add(1)
                    .filter(|&i| i < heat.lanes.len()),
            },
            Some(EditKey::Delete) | Some(EditKey::Backspace) => KeyAction {
                position_change: Some(PositionChange::Clear),
                new_focus_index: None,
            },
            _ => KeyAction::default(),
        }
    }

    /// 解释并执行按键
    pub fn apply_key_command(
        &self,
        key: &str,
        heats: Vec<Heat>,
        heat_id: &str,
        occupant_id: &str,
        focus_index: usize,
    ) -> (Vec<Heat>, KeyAction) {
        let action = self.interpret_key_command(key, &heats, heat_id, occupant_id, focus_index);
        let heats = match action.position_change {
            Some(change) => self.set_position(heats, heat_id, occupant_id, change.as_position()),
            None => heats,
        };
        (heats, action)
    }
}

/// 按名次稳定排序道次
pub fn sort_lanes_by_position(lanes: &mut [Lane]) {
    lanes.sort_by(|a, b| match (a.position, b.position) {
        (Some(pa), Some(pb)) => pa.cmp(&pb),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    });
}

// ==========================================
// 测试模块
// ==========================================
#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::types::HeatKind;

    fn heat(id: &str, kind: HeatKind, occupants: &[&str]) -> Heat {
        let lanes = occupants
            .iter()
            .zip(1u32..)
            .map(|(o, lane)| Lane::new(lane, LaneOccupant::for_kind(kind, *o)))
            .collect();
        let mut heat = Heat::new("E1", 1, kind, lanes);
        heat.id = id.to_string();
        heat
    }

    fn order(heats: &[Heat], heat_id: &str) -> Vec<String> {
        heats
            .iter()
            .find(|h| h.id == heat_id)
            .unwrap()
            .lanes
            .iter()
            .map(|l| l.occupant_id().to_string())
            .collect()
    }

    #[test]
    fn test_set_position_sorts_set_before_unset() {
        let tracker = PositionTracker::new(8);
        let heats = vec![heat("H1", HeatKind::Individual, &["a", "b", "c", "d"])];

        let heats = tracker.set_position(heats, "H1", "c", Some(2));
        let heats = tracker.set_position(heats, "H1", "d", Some(1));

        assert_eq!(order(&heats, "H1"), vec!["d", "c", "a", "b"]);
        assert_eq!(heats[0].lanes[0].lane, 4);
    }

    #[test]
    fn test_clear_position_moves_lane_after_set_ones() {
        let tracker = PositionTracker::new(8);
        let heats = vec![heat("H1", HeatKind::Individual, &["a", "b", "c"])];

        let heats = tracker.set_position(heats, "H1", "a", Some(1));
        let heats = tracker.set_position(heats, "H1", "b", Some(2));
        let heats = tracker.set_position(heats, "H1", "a", None);

        assert_eq!(order(&heats, "H1"), vec!["b", "a", "c"]);
    }

    #[test]
    fn test_duplicate_positions_are_allowed() {
        let tracker = PositionTracker::new(8);
        let heats = vec![heat("H1", HeatKind::Individual, &["a", "b"])];

        let heats = tracker.set_position(heats, "H1", "a", Some(1));
        let heats = tracker.set_position(heats, "H1", "b", Some(1));

        assert!(heats[0].lanes.iter().all(|l| l.position == Some(1)));
    }

    #[test]
    fn test_unknown_ids_and_zero_are_noops() {
        let tracker = PositionTracker::new(8);
        let heats = vec![heat("H1", HeatKind::Individual, &["a", "b"])];

        assert_eq!(tracker.set_position(heats.clone(), "H9", "a", Some(1)), heats);
        assert_eq!(tracker.set_position(heats.clone(), "H1", "z", Some(1)), heats);
        assert_eq!(tracker.set_position(heats.clone(), "H1", "a", Some(0)), heats);
        assert_eq!(tracker.remove_occupant(heats.clone(), "H9", "a"), heats);
        assert_eq!(tracker.add_occupant(heats.clone(), "H9", "c"), heats);
    }

    #[test]
    fn test_add_appends_after_max_lane() {
        let tracker = PositionTracker::new(8);
        let heats = vec![heat("H1", HeatKind::Relay, &["S1", "S2", "S3"])];

        let heats = tracker.remove_occupant(heats, "H1", "S2");
        let heats = tracker.add_occupant(heats, "H1", "S4");

        let lanes: Vec<u32> = heats[0].lanes.iter().map(|l| l.lane).collect();
        assert_eq!(lanes, vec![1, 3, 4]);
        assert_eq!(heats[0].lanes[2].occupant, LaneOccupant::School("S4".to_string()));

        let again = tracker.add_occupant(heats.clone(), "H1", "S4");
        assert_eq!(again, heats);
    }

    #[test]
    fn test_add_to_empty_heat_starts_at_one() {
        let tracker = PositionTracker::new(8);
        let heats = vec![heat("H1", HeatKind::Individual, &[])];
        let heats = tracker.add_occupant(heats, "H1", "a");
        assert_eq!(heats[0].lanes[0].lane, 1);
    }

    #[test]
    fn test_parse_edit_keys() {
        assert_eq!(EditKey::parse("3"), Some(EditKey::Digit(3)));
        assert_eq!(EditKey::parse("ArrowDown"), Some(EditKey::ArrowDown));
        assert_eq!(EditKey::parse("Backspace"), Some(EditKey::Backspace));
        assert_eq!(EditKey::parse("Enter"), None);
        assert_eq!(EditKey::parse(""), None);
        assert_eq!(EditKey::parse("-1"), None);
        assert_eq!(EditKey::parse("08"), None);
        assert_eq!(EditKey::parse("12"), None);
    }

    #[test]
    fn test_arrow_down_at_max_focus_is_ignored() {
        let tracker = PositionTracker::new(8);
        let heats = vec![heat("H1", HeatKind::Individual, &["a", "b"])];

        let action = tracker.interpret_key_command("ArrowDown", &heats, "H1", "a", usize::MAX);
        assert!(action.is_ignored());

        let (after, action) =
            tracker.apply_key_command("ArrowDown", heats.clone(), "H1", "a", usize::MAX);
        assert!(action.is_ignored());
        assert_eq!(after, heats);
    }

    #[test]
    fn test_position_above_limit_is_noop() {
        let tracker = PositionTracker::new(8);
        let heats = vec![heat("H1", HeatKind::Individual, &["a", "b", "c"])];

        assert_eq!(tracker.set_position(heats.clone(), "H1", "a", Some(99)), heats);
        assert_eq!(tracker.set_position(heats.clone(), "H1", "a", Some(9)), heats);

        let heats = tracker.set_position(heats, "H1", "c", Some(8));
        assert_eq!(heats[0].lanes[0].position, Some(8));
    }

    #[test]
    fn test_large_heat_accepts_positions_up_to_lane_count() {
        let tracker = PositionTracker::new(8);
        let occupants: Vec<String> = (1..=12).map(|i| format!("a{}", i)).collect();
        let refs: Vec<&str> = occupants.iter().map(String::as_str).collect();
        let heats = vec![heat("H1", HeatKind::Individual, &refs)];

        let heats = tracker.set_position(heats, "H1", "a3", Some(12));
        assert_eq!(heats[0].lanes[0].occupant_id(), "a3");
        assert_eq!(tracker.set_position(heats.clone(), "H1", "a4", Some(13)), heats);
    }

    #[test]
    fn test_interpret_digit_keys() {
        let tracker = PositionTracker::new(8);
        let heats = vec![heat("H1", HeatKind::Individual, &["a", "b"])];

        let action = tracker.interpret_key_command("5", &heats, "H1", "a", 0);
        assert_eq!(action.position_change, Some(PositionChange::Set(5)));
        assert_eq!(action.new_focus_index, None);

        assert!(tracker.interpret_key_command("9", &heats, "H1", "a", 0).is_ignored());
        assert!(tracker.interpret_key_command("0", &heats, "H1", "a", 0).is_ignored());
        assert!(tracker.interpret_key_command("x", &heats, "H1", "a", 0).is_ignored());
        assert!(tracker.interpret_key_command("5", &heats, "H2", "a", 0).is_ignored());
    }

    #[test]
    fn test_interpret_arrow_keys_bounds() {
        let tracker = PositionTracker::new(8);
        let heats = vec![heat("H1", HeatKind::Individual, &["a", "b", "c"])];

        let up = tracker.interpret_key_command("ArrowUp", &heats, "H1", "b", 1);
        assert_eq!(up.new_focus_index, Some(0));
        assert_eq!(up.position_change, None);

        assert!(tracker.interpret_key_command("ArrowUp", &heats, "H1", "a", 0).is_ignored());

        let down = tracker.interpret_key_command("ArrowDown", &heats, "H1", "b", 1);
        assert_eq!(down.new_focus_index, Some(2));

        assert!(tracker.interpret_key_command("ArrowDown", &heats, "H1", "c", 2).is_ignored());
    }

    #[test]
    fn test_apply_delete_clears_position() {
        let tracker = PositionTracker::new(8);
        let heats = vec![heat("H1", HeatKind::Individual, &["a", "b"])];

        let (heats, _) = tracker.apply_key_command("2", heats, "H1", "b", 1);
        assert_eq!(order(&heats, "H1"), vec!["b", "a"]);

        let (heats, action) = tracker.apply_key_command("Delete", heats, "H1", "b", 0);
        assert_eq!(action.position_change, Some(PositionChange::Clear));
        assert!(heats[0].lanes.iter().all(|l| l.position.is_none()));
    }
}
