//! 错误类型定义

use thiserror::Error;

/// 规则错误
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GameError {
    /// 不在合法动作集合中的吃子
    #[error("Invalid action: location {location} is not a legal target")]
    InvalidAction { location: usize },

    /// 随从动作与目录条目不符
    #[error("Invalid companion action for {companion}: {reason}")]
    InvalidCompanion { companion: String, reason: String },

    /// 棋盘存档与名册不一致
    #[error("Malformed roster: {reason}")]
    MalformedRoster { reason: String },
}

/// 存档与读写错误类型
#[derive(Error, Debug)]
pub enum RecordError {
    /// IO 错误
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON 序列化错误
    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    /// 规则错误
    #[error("Game error: {0}")]
    Game(#[from] GameError),
}

/// 存档操作结果类型
pub type Result<T> = std::result::Result<T, RecordError>;
