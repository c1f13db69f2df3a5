//! 错误类型定义

use rules::{GameError, Seat};
use thiserror::Error;

/// 对局平台错误
#[derive(Error, Debug)]
pub enum ArenaError {
    /// 代理没有在时间预算内返回
    #[error("{seat} exceeded the search budget of {budget_ms} ms")]
    SearchBudgetExceeded { seat: Seat, budget_ms: u64 },

    /// 代理计算过程中崩溃
    #[error("agent for {seat} panicked")]
    AgentPanicked { seat: Seat },

    /// 规则错误
    #[error("Game error: {0}")]
    Game(#[from] GameError),
}
