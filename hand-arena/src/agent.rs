//! 对局代理
//!
//! 代理只读取对局状态的副本，返回想走的动作；合法性由对局控制检查。
//! 对局控制在超时后置位停止信号，代理应尽快返回。

use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex};

use hand_ai::{AiConfig, AiEngine};
use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use rules::{Action, CompanionMove, GameState, MoveGenerator};
use tracing::debug;

/// 单次请求的停止信号
pub type StopFlag = Arc<AtomicBool>;

/// 对局代理
pub trait Agent: Send + Sync {
    /// 显示名
    fn name(&self) -> String;

    /// 选择吃子动作（None 表示放弃本回合）
    fn choose_action(&self, state: &GameState, stop: &StopFlag) -> Option<Action>;

    /// 选择随从动作（None 表示放弃随从动作）
    fn choose_companion(&self, state: &GameState, stop: &StopFlag) -> Option<CompanionMove>;
}

/// Minimax 代理
///
/// 每次调用都创建新的引擎，置换表不跨回合保留
pub struct MinimaxAgent {
    config: AiConfig,
}

impl MinimaxAgent {
    pub fn new(config: AiConfig) -> Self {
        Self { config }
    }
}

impl Agent for MinimaxAgent {
    fn name(&self) -> String {
        format!("minimax(depth {})", self.config.max_depth)
    }

    fn choose_action(&self, state: &GameState, stop: &StopFlag) -> Option<Action> {
        let mut engine = AiEngine::new(self.config.clone()).with_stop_flag(Arc::clone(stop));
        let mover = state.player(state.current_turn);
        let opponent = state.player(state.current_turn.opponent());
        let action = engine.choose_action(&state.board, mover, opponent, self.config.max_depth);

        let stats = engine.tt_stats();
        debug!(
            nodes = engine.nodes_searched(),
            tt_hit_rate = stats.hit_rate(),
            "{} chose {:?}",
            self.name(),
            action
        );
        action
    }

    // 随从规划只看一层，不检查停止信号
    fn choose_companion(&self, state: &GameState, _stop: &StopFlag) -> Option<CompanionMove> {
        let engine = AiEngine::new(self.config.clone());
        let mover = state.player(state.current_turn);
        let opponent = state.player(state.current_turn.opponent());
        engine.choose_companion(&state.board, mover, opponent, &state.companions)
    }
}

/// 随机代理：均匀选择合法动作
pub struct RandomAgent {
    rng: Mutex<ChaCha8Rng>,
}

impl RandomAgent {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: Mutex::new(ChaCha8Rng::seed_from_u64(seed)),
        }
    }

    fn pick<T: Clone>(&self, options: &[T]) -> Option<T> {
        let mut rng = self.rng.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        options.choose(&mut *rng).cloned()
    }
}

impl Agent for RandomAgent {
    fn name(&self) -> String {
        "random".to_string()
    }

    fn choose_action(&self, state: &GameState, _stop: &StopFlag) -> Option<Action> {
        self.pick(&MoveGenerator::legal_targets(&state.board))
            .map(Action::Capture)
    }

    fn choose_companion(&self, state: &GameState, _stop: &StopFlag) -> Option<CompanionMove> {
        self.pick(&state.companion_moves())
    }
}
