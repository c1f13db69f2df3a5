//! 搜索引擎
//!
//! 实现 Minimax + Alpha-Beta 剪枝 + 置换表

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;

use rules::{
    Action, BannerArbiter, Board, CompanionMove, CompanionPool, GameState, MoveGenerator, Player,
    Position,
};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::evaluate::{EvalWeights, Evaluator};
use crate::planner::CompanionPlanner;
use crate::transposition::{EntryType, TTStats, TranspositionTable};
use crate::zobrist::ZobristTable;

/// AI 难度
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Difficulty {
    Easy,
    #[default]
    Medium,
    Hard,
}

/// AI 配置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AiConfig {
    pub difficulty: Difficulty,
    pub max_depth: u8,
    pub use_transposition: bool,
    pub alpha_beta_pruning: bool,
    #[serde(default)]
    pub weights: EvalWeights,
}

impl AiConfig {
    pub fn from_difficulty(difficulty: Difficulty) -> Self {
        let max_depth = match difficulty {
            Difficulty::Easy => 1,
            Difficulty::Medium => 3,
            Difficulty::Hard => 5,
        };
        Self {
            difficulty,
            max_depth,
            use_transposition: true,
            alpha_beta_pruning: true,
            weights: EvalWeights::default(),
        }
    }

    /// 指定搜索深度
    pub fn with_depth(mut self, max_depth: u8) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// 指定评估权重
    pub fn with_weights(mut self, weights: EvalWeights) -> Self {
        self.weights = weights;
        self
    }
}

impl Default for AiConfig {
    fn default() -> Self {
        Self::from_difficulty(Difficulty::Medium)
    }
}

/// 一次搜索的结果
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SearchResult {
    /// 最佳吃子位置；无合法动作或深度为 0 时为 None
    pub action: Option<Position>,
    /// 根行动方视角的分值
    pub value: f64,
}

/// 节点类型：根行动方为极大方
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Side {
    Max,
    Min,
}

impl Side {
    fn flip(self) -> Side {
        match self {
            Side::Max => Side::Min,
            Side::Min => Side::Max,
        }
    }
}

/// AI 引擎
pub struct AiEngine {
    config: AiConfig,
    evaluator: Evaluator,
    zobrist: ZobristTable,
    tt: TranspositionTable,
    nodes_searched: u64,
    /// 外部停止信号；置位后搜索尽快返回，结果不再可信
    stop: Option<Arc<AtomicBool>>,
}

impl AiEngine {
    /// 创建新的 AI 引擎
    pub fn new(config: AiConfig) -> Self {
        let evaluator = Evaluator::new(config.weights);
        Self {
            config,
            evaluator,
            zobrist: ZobristTable::new(),
            tt: TranspositionTable::new(),
            nodes_searched: 0,
            stop: None,
        }
    }

    /// 绑定停止信号（调用方超时后置位）
    pub fn with_stop_flag(mut self, stop: Arc<AtomicBool>) -> Self {
        self.stop = Some(stop);
        self
    }

    fn is_stopped(&self) -> bool {
        self.stop
            .as_ref()
            .is_some_and(|stop| stop.load(Ordering::Relaxed))
    }

    /// 从难度创建
    pub fn from_difficulty(difficulty: Difficulty) -> Self {
        Self::new(AiConfig::from_difficulty(difficulty))
    }

    pub fn config(&self) -> &AiConfig {
        &self.config
    }

    pub fn evaluator(&self) -> &Evaluator {
        &self.evaluator
    }

    /// 为当前行动方选择动作
    ///
    /// 等待随从动作时走随从规划，否则按配置深度搜索吃子
    pub fn decide(&mut self, state: &GameState) -> Option<Action> {
        let mover = state.player(state.current_turn);
        let opponent = state.player(state.current_turn.opponent());

        if state.companion_due() {
            self.choose_companion(&state.board, mover, opponent, &state.companions)
                .map(Action::Companion)
        } else {
            self.choose_action(&state.board, mover, opponent, self.config.max_depth)
        }
    }

    /// 选择吃子动作（无合法动作时为 None，本回合放弃）
    pub fn choose_action(
        &mut self,
        board: &Board,
        mover: &Player,
        opponent: &Player,
        depth: u8,
    ) -> Option<Action> {
        self.search(board, mover, opponent, depth)
            .action
            .map(Action::Capture)
    }

    /// 选择随从动作（一层启发式，不进入 minimax 递归）
    pub fn choose_companion(
        &self,
        board: &Board,
        mover: &Player,
        opponent: &Player,
        pool: &CompanionPool,
    ) -> Option<CompanionMove> {
        CompanionPlanner::new(&self.evaluator).plan(board, mover, opponent, pool)
    }

    /// 搜索最佳吃子
    ///
    /// 每次调用都清空置换表；搜索过程中不会修改传入的状态
    pub fn search(
        &mut self,
        board: &Board,
        mover: &Player,
        opponent: &Player,
        depth: u8,
    ) -> SearchResult {
        self.nodes_searched = 0;
        self.tt.clear();
        let start = Instant::now();

        let (action, value) = self.alpha_beta(
            board,
            mover,
            opponent,
            depth,
            f64::NEG_INFINITY,
            f64::INFINITY,
            Side::Max,
        );

        let stats = self.tt_stats();
        debug!(
            depth,
            stopped = self.is_stopped(),
            nodes = self.nodes_searched,
            tt_hits = stats.hits,
            tt_entries = stats.entries,
            elapsed_ms = start.elapsed().as_millis() as u64,
            "search finished: {:?} = {}",
            action,
            value
        );

        SearchResult { action, value }
    }

    /// Alpha-Beta 搜索
    ///
    /// `p1` 始终是根行动方（极大方），`p2` 是对手（极小方）
    #[allow(clippy::too_many_arguments)]
    fn alpha_beta(
        &mut self,
        board: &Board,
        p1: &Player,
        p2: &Player,
        depth: u8,
        mut alpha: f64,
        mut beta: f64,
        side: Side,
    ) -> (Option<Position>, f64) {
        self.nodes_searched += 1;
        if self.is_stopped() {
            return (None, self.leaf_score(board, p1, p2, side));
        }
        let (alpha_in, beta_in) = (alpha, beta);

        let hash = if self.config.use_transposition {
            let to_move = match side {
                Side::Max => p1.seat(),
                Side::Min => p2.seat(),
            };
            Some(self.zobrist.hash(board, p1, p2, to_move))
        } else {
            None
        };

        if let Some(hash) = hash {
            if let Some(entry) = self.tt.probe(hash, depth, alpha, beta) {
                return (entry.best, entry.value);
            }
        }

        let captures = MoveGenerator::generate_captures(board);
        if depth == 0 || captures.is_empty() {
            let value = self.leaf_score(board, p1, p2, side);
            if let Some(hash) = hash {
                self.tt.store(hash, value, depth, EntryType::Exact, None);
            }
            return (None, value);
        }

        let mut best = None;
        for capture in &captures {
            let mut board = board.clone();
            let mut p1 = p1.clone();
            let mut p2 = p2.clone();
            {
                let (actor, other) = match side {
                    Side::Max => (&mut p1, &mut p2),
                    Side::Min => (&mut p2, &mut p1),
                };
                let outcome = MoveGenerator::execute(&mut board, capture, actor);
                let seat = actor.seat();
                BannerArbiter::arbitrate(actor, other, outcome.house, seat);
            }

            let (_, value) =
                self.alpha_beta(&board, &p1, &p2, depth - 1, alpha, beta, side.flip());

            match side {
                Side::Max => {
                    if value > alpha {
                        alpha = value;
                        best = Some(capture.to);
                    }
                }
                Side::Min => {
                    if value < beta {
                        beta = value;
                        best = Some(capture.to);
                    }
                }
            }

            if self.config.alpha_beta_pruning && alpha >= beta {
                break;
            }
            if self.is_stopped() {
                break;
            }
        }

        let value = match side {
            Side::Max => alpha,
            Side::Min => beta,
        };

        // 被打断的子树不是完整结果，不写入置换表
        if let Some(hash) = hash.filter(|_| !self.is_stopped()) {
            let entry_type = if value >= beta_in {
                EntryType::LowerBound
            } else if value <= alpha_in {
                EntryType::UpperBound
            } else {
                EntryType::Exact
            };
            self.tt.store(hash, value, depth, entry_type, best);
        }

        (best, value)
    }

    /// 叶子分值（始终为 p1 视角）
    fn leaf_score(&self, board: &Board, p1: &Player, p2: &Player, side: Side) -> f64 {
        match side {
            Side::Max => self.evaluator.evaluate(board, p1, p2),
            Side::Min => -self.evaluator.evaluate(board, p2, p1),
        }
    }

    /// 获取搜索的节点数
    pub fn nodes_searched(&self) -> u64 {
        self.nodes_searched
    }

    /// 最近一次搜索的置换表统计
    pub fn tt_stats(&self) -> TTStats {
        self.tt.stats()
    }
}

impl Default for AiEngine {
    fn default() -> Self {
        Self::new(AiConfig::default())
    }
}
