//! 置换表
//!
//! 缓存一次搜索调用中已经算过的局面。表的生命周期就是一次顶层搜索，
//! 不在并发的搜索之间共享。

use std::collections::HashMap;

use rules::Position;

/// 置换表条目类型
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryType {
    /// 精确值
    Exact,
    /// 下界（真实值 >= value）
    LowerBound,
    /// 上界（真实值 <= value）
    UpperBound,
}

/// 置换表条目
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TTEntry {
    /// 局面分值
    pub value: f64,
    /// 剩余搜索深度
    pub depth: u8,
    pub entry_type: EntryType,
    /// 该局面下的最佳吃子
    pub best: Option<Position>,
}

impl TTEntry {
    /// 在当前窗口下是否可以直接使用
    pub fn usable(&self, alpha: f64, beta: f64) -> bool {
        match self.entry_type {
            EntryType::Exact => true,
            EntryType::LowerBound => self.value >= beta,
            EntryType::UpperBound => self.value <= alpha,
        }
    }
}

/// 置换表
#[derive(Debug, Default)]
pub struct TranspositionTable {
    entries: HashMap<u64, TTEntry>,
    probes: u64,
    hits: u64,
    stored: u64,
}

impl TranspositionTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// 查询条目
    ///
    /// 只在剩余深度相同且条目的界在当前窗口内可用时命中
    pub fn probe(&mut self, hash: u64, depth: u8, alpha: f64, beta: f64) -> Option<TTEntry> {
        self.probes += 1;

        let entry = self.entries.get(&hash)?;
        if entry.depth == depth && entry.usable(alpha, beta) {
            self.hits += 1;
            Some(*entry)
        } else {
            None
        }
    }

    /// 存储条目（同一局面后写覆盖先写）
    pub fn store(
        &mut self,
        hash: u64,
        value: f64,
        depth: u8,
        entry_type: EntryType,
        best: Option<Position>,
    ) {
        self.stored += 1;
        self.entries.insert(
            hash,
            TTEntry {
                value,
                depth,
                entry_type,
                best,
            },
        );
    }

    /// 清空表与统计
    pub fn clear(&mut self) {
        self.entries.clear();
        self.probes = 0;
        self.hits = 0;
        self.stored = 0;
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// 获取统计信息
    pub fn stats(&self) -> TTStats {
        TTStats {
            entries: self.entries.len(),
            probes: self.probes,
            hits: self.hits,
            stored: self.stored,
        }
    }
}

/// 置换表统计信息
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TTStats {
    pub entries: usize,
    pub probes: u64,
    pub hits: u64,
    pub stored: u64,
}

impl TTStats {
    pub fn hit_rate(&self) -> f64 {
        if self.probes == 0 {
            0.0
        } else {
            self.hits as f64 / self.probes as f64
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tt_store_and_probe() {
        let mut tt = TranspositionTable::new();
        let hash = 0x1234567890ABCDEF_u64;
        let best = Position::from_index(14);
        tt.store(hash, 12.5, 3, EntryType::Exact, best);

        let entry = tt.probe(hash, 3, f64::NEG_INFINITY, f64::INFINITY).unwrap();
        assert_eq!(entry.value, 12.5);
        assert_eq!(entry.best, best);
        assert_eq!(tt.stats().hits, 1);
    }

    #[test]
    fn test_tt_miss() {
        let mut tt = TranspositionTable::new();
        assert!(tt.probe(42, 1, f64::NEG_INFINITY, f64::INFINITY).is_none());
        assert_eq!(tt.stats().probes, 1);
        assert_eq!(tt.stats().hit_rate(), 0.0);
    }

    #[test]
    fn test_tt_depth_must_match() {
        let mut tt = TranspositionTable::new();
        tt.store(7, 1.0, 2, EntryType::Exact, None);
        assert!(tt.probe(7, 3, f64::NEG_INFINITY, f64::INFINITY).is_none());
        assert!(tt.probe(7, 1, f64::NEG_INFINITY, f64::INFINITY).is_none());
        assert!(tt.probe(7, 2, f64::NEG_INFINITY, f64::INFINITY).is_some());
    }

    #[test]
    fn test_tt_bounds() {
        let mut tt = TranspositionTable::new();
        tt.store(1, 10.0, 1, EntryType::LowerBound, None);
        tt.store(2, -10.0, 1, EntryType::UpperBound, None);

        // 下界只在 value >= beta 时可用
        assert!(tt.probe(1, 1, 0.0, 5.0).is_some());
        assert!(tt.probe(1, 1, 0.0, 20.0).is_none());

        // 上界只在 value <= alpha 时可用
        assert!(tt.probe(2, 1, -5.0, 5.0).is_some());
        assert!(tt.probe(2, 1, -20.0, 5.0).is_none());
    }

    #[test]
    fn test_tt_clear() {
        let mut tt = TranspositionTable::new();
        tt.store(1, 0.0, 0, EntryType::Exact, None);
        assert_eq!(tt.len(), 1);

        tt.clear();
        assert!(tt.is_empty());
        assert_eq!(tt.stats(), TTStats::default());
    }
}
