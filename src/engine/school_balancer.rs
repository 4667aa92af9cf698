// ==========================================
// 田径运动会分组编排系统 - 学校均衡分配器
// ==========================================
// 职责: 把带学校标签的报名项分配到固定数量的分组中，
//       尽量避免同校运动员同组
// 输入: 报名项列表 + 每组道次容量 + 分组数 + 随机源
// 输出: 非空分组的道次分配（按道次号升序）+ 被丢弃的报名项
// ==========================================
// 说明: 贪心算法，不保证全局最优；同校人数超过分组数时
//       允许同校同组
// ==========================================

use crate::engine::shuffle::{shuffled, ShuffleSource};
use std::collections::{HashMap, HashSet, VecDeque};
use tracing::instrument;

/// 待分配的报名项
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BalanceEntry {
    pub id: String,
    pub school_id: String,
}

impl BalanceEntry {
    pub fn new(id: impl Into<String>, school_id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            school_id: school_id.into(),
        }
    }
}

/// 单个道次分配
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LaneAssignment {
    pub lane: u32,
    pub entry_id: String,
    pub school_id: String,
}

/// 分配结果
#[derive(Debug, Clone, Default)]
pub struct BalanceResult {
    /// 非空分组，按原相对顺序排列（下标 + 1 即组号）
    pub heats: Vec<Vec<LaneAssignment>>,
    /// 所有分组都满员时被丢弃的报名项
    pub dropped: Vec<BalanceEntry>,
}

/// 同校报名项队列（保持到达顺序）
struct SchoolQueue {
    school_id: String,
    remaining: VecDeque<BalanceEntry>,
}

// ==========================================
// SchoolBalancer - 学校均衡分配器
// ==========================================
pub struct SchoolBalancer {
    // 无状态，随机源由调用方注入
}

impl SchoolBalancer {
    pub fn new() -> Self {
        Self {}
    }

    /// 执行分配
    ///
    /// 步骤：
    /// 1) 按学校分组（保持到达顺序）
    /// 2) 轮转填充：逐组逐道次，随机挑选一所尚未出现在当前组的学校
    /// 3) 剩余分配：乱序遍历剩余报名项，放入该校人数最少的未满分组的最小空道次
    /// 4) 组内按道次号排序，剔除空组
    #[instrument(skip(self, entries, shuffle), fields(entries_count = entries.len()))]
    pub fn balance(
        &self,
        entries: &[BalanceEntry],
        capacity: usize,
        num_heats: usize,
        shuffle: &mut dyn ShuffleSource,
    ) -> BalanceResult {
        if entries.is_empty() || capacity == 0 || num_heats == 0 {
            return BalanceResult {
                heats: Vec::new(),
                dropped: entries.to_vec(),
            };
        }

        let capacity_lanes = u32::try_from(capacity).unwrap_or(u32::MAX);
        let mut queues = group_by_school(entries);
        let mut heats: Vec<Vec<LaneAssignment>> = vec![Vec::new(); num_heats];

        self.round_robin_fill(&mut heats, &mut queues, capacity_lanes, shuffle);

        let leftovers: Vec<BalanceEntry> = queues
            .into_iter()
            .flat_map(|q| q.remaining)
            .collect();
        let dropped = self.place_leftovers(&mut heats, leftovers, capacity_lanes, shuffle);

        for heat in heats.iter_mut() {
            heat.sort_by_key(|l| l.lane);
        }
        heats.retain(|h| !h.is_empty());

        tracing::debug!(
            heats_count = heats.len(),
            dropped_count = dropped.len(),
            "学校均衡分配完成"
        );

        BalanceResult { heats, dropped }
    }

    // ==========================================
    // 轮转填充
    // ==========================================

    /// 轮转填充：当前组号循环推进，回到第 0 组时道次号 +1，道次号超过容量即停止
    fn round_robin_fill(
        &self,
        heats: &mut [Vec<LaneAssignment>],
        queues: &mut [SchoolQueue],
        capacity_lanes: u32,
        shuffle: &mut dyn ShuffleSource,
    ) {
        let num_heats = heats.len();
        let mut schools_in_heat: Vec<HashSet<String>> = vec![HashSet::new(); num_heats];
        let mut heat_index = 0usize;
        let mut lane = 1u32;

        while lane <= capacity_lanes && queues.iter().any(|q| !q.remaining.is_empty()) {
            let available: Vec<usize> = queues
                .iter()
                .enumerate()
                .filter(|(_, q)| {
                    !q.remaining.is_empty() && !schools_in_heat[heat_index].contains(&q.school_id)
                })
                .map(|(i, _)| i)
                .collect();

            if !available.is_empty() {
                let picked = shuffle.pick(available.len()).min(available.len() - 1);
                let queue = &mut queues[available[picked]];
                if let Some(entry) = queue.remaining.pop_front() {
                    schools_in_heat[heat_index].insert(queue.school_id.clone());
                    heats[heat_index].push(LaneAssignment {
                        lane,
                        entry_id: entry.id,
                        school_id: entry.school_id,
                    });
                }
            }

            heat_index = (heat_index + 1) % num_heats;
            if heat_index == 0 {
                lane += 1;
            }
        }
    }

    // ==========================================
    // 剩余分配
    // ==========================================

    /// 剩余分配：返回放不下而被丢弃的报名项
    ///
    /// 只在仍有空道次的分组间挑选，因此仅当所有分组都满员时才会丢弃
    fn place_leftovers(
        &self,
        heats: &mut [Vec<LaneAssignment>],
        leftovers: Vec<BalanceEntry>,
        capacity_lanes: u32,
        shuffle: &mut dyn ShuffleSource,
    ) -> Vec<BalanceEntry> {
        let mut dropped = Vec::new();

        for entry in shuffled(shuffle, leftovers) {
            // 仍有空道次的分组中，同校人数最少者；并列取下标最小者
            let target = (0..heats.len())
                .filter(|&i| heats[i].len() < capacity_lanes as usize)
                .min_by_key(|&i| {
                    heats[i]
                        .iter()
                        .filter(|l| l.school_id == entry.school_id)
                        .count()
                });

            let Some(target) = target else {
                tracing::warn!(
                    entry_id = %entry.id,
                    school_id = %entry.school_id,
                    "所有分组已满，报名项被丢弃"
                );
                dropped.push(entry);
                continue;
            };

            let used: HashSet<u32> = heats[target].iter().map(|l| l.lane).collect();
            match (1..=capacity_lanes).find(|lane| !used.contains(lane)) {
                Some(lane) => heats[target].push(LaneAssignment {
                    lane,
                    entry_id: entry.id,
                    school_id: entry.school_id,
                }),
                None => dropped.push(entry),
            }
        }

        dropped
    }
}

impl Default for SchoolBalancer {
    fn default() -> Self {
        Self::new()
    }
}

/// 按学校分组，学校顺序取首次出现顺序
fn group_by_school(entries: &[BalanceEntry]) -> Vec<SchoolQueue> {
    let mut index_by_school: HashMap<&str, usize> = HashMap::new();
    let mut queues: Vec<SchoolQueue> = Vec::new();

    for entry in entries {
        let idx = *index_by_school
            .entry(entry.school_id.as_str())
            .or_insert_with(|| {
                queues.push(SchoolQueue {
                    school_id: entry.school_id.clone(),
                    remaining: VecDeque::new(),
                });
                queues.len() - 1
            });
        queues[idx].remaining.push_back(entry.clone());
    }

    queues
}
