// ==========================================
// 田径运动会分组编排系统 - 随机源
// ==========================================
// 职责: 生成随机排列、随机选择，供分组引擎注入
// 约束: 测试注入固定种子或恒等随机源以获得确定结果；
//       生产环境以系统熵播种
// ==========================================

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

// ==========================================
// Trait: ShuffleSource
// ==========================================
pub trait ShuffleSource: Send {
    /// 返回 0..len 的一个排列
    fn permutation(&mut self, len: usize) -> Vec<usize>;

    /// 在 0..len 中选择一个下标（len > 0）
    fn pick(&mut self, len: usize) -> usize;
}

/// 按随机源给出的排列重排元素
///
/// 随机源返回的不是合法排列时保持原顺序
pub fn shuffled<T>(source: &mut dyn ShuffleSource, items: Vec<T>) -> Vec<T> {
    let order = source.permutation(items.len());
    if !is_permutation(&order, items.len()) {
        tracing::warn!(
            expected_len = items.len(),
            actual_len = order.len(),
            "随机源返回非法排列，保持原顺序"
        );
        return items;
    }

    let mut slots: Vec<Option<T>> = items.into_iter().map(Some).collect();
    order.into_iter().filter_map(|i| slots[i].take()).collect()
}

fn is_permutation(order: &[usize], len: usize) -> bool {
    if order.len() != len {
        return false;
    }
    let mut seen = vec![false; len];
    for &i in order {
        if i >= len || seen[i] {
            return false;
        }
        seen[i] = true;
    }
    true
}

// ==========================================
// RandomShuffle - 伪随机源
// ==========================================
pub struct RandomShuffle {
    rng: StdRng,
}

impl RandomShuffle {
    /// 以系统熵播种
    pub fn from_entropy() -> Self {
        Self::seeded(rand::random())
    }

    /// 固定种子，结果可复现
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl Default for RandomShuffle {
    fn default() -> Self {
        Self::from_entropy()
    }
}

impl ShuffleSource for RandomShuffle {
    fn permutation(&mut self, len: usize) -> Vec<usize> {
        let mut order: Vec<usize> = (0..len).collect();
        order.shuffle(&mut self.rng);
        order
    }

    fn pick(&mut self, len: usize) -> usize {
        if len == 0 {
            return 0;
        }
        self.rng.random_range(0..len)
    }
}

// ==========================================
// IdentityShuffle - 恒等随机源
// ==========================================
// 不打乱顺序，总是选择第一个候选
#[derive(Debug, Clone, Copy, Default)]
pub struct IdentityShuffle;

impl ShuffleSource for IdentityShuffle {
    fn permutation(&mut self, len: usize) -> Vec<usize> {
        (0..len).collect()
    }

    fn pick(&mut self, _len: usize) -> usize {
        0
    }
}
