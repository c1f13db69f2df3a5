//! Hand of the King AI 引擎
//!
//! 包含:
//! - 局面评估函数
//! - Minimax + Alpha-Beta 搜索
//! - Zobrist 哈希
//! - 置换表
//! - 随从动作规划

mod evaluate;
mod planner;
mod search;
mod transposition;
mod zobrist;

pub use evaluate::{EvalWeights, Evaluator, TERMINAL_SCORE};
pub use planner::CompanionPlanner;
pub use search::{AiConfig, AiEngine, Difficulty, SearchResult};
pub use transposition::{EntryType, TTEntry, TTStats, TranspositionTable};
pub use zobrist::ZobristTable;
