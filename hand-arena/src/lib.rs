//! 对局平台
//!
//! 代理、回合循环与时间预算、牌局存储以及供调参使用的适应度接口

pub mod agent;
pub mod config;
pub mod error;
pub mod fitness;
pub mod game;
pub mod storage;

pub use agent::{Agent, MinimaxAgent, RandomAgent, StopFlag};
pub use config::{AgentKind, ArenaConfig, TimeoutPolicy, DEFAULT_MAX_TURNS, DEFAULT_TIME_LIMIT_MS};
pub use error::ArenaError;
pub use fitness::fitness;
pub use game::{Match, MatchOutcome};
pub use storage::{BoardStorage, SavedBoardInfo};
