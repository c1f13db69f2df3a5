//! Hand of the King 规则库
//!
//! 包含:
//! - 家族、人物卡、棋盘、位置等核心数据结构
//! - 合法动作生成与吃子结算
//! - 旗帜仲裁与胜负判定
//! - 随从卡目录
//! - 棋盘存档格式 (JSON)

mod banner;
mod board;
mod companion;
mod constants;
mod error;
mod game;
mod moves;
mod piece;
mod player;
mod record;
pub mod roster;

pub use banner::BannerArbiter;
pub use board::Board;
pub use companion::{
    apply_companion, Arity, Companion, CompanionMove, CompanionPool, CompanionSpec,
    TargetDomain, CATALOG,
};
pub use constants::*;
pub use error::{GameError, RecordError, Result};
pub use game::{Action, GameState, TurnReport};
pub use moves::{Capture, CaptureOutcome, MoveGenerator};
pub use piece::{Card, House, Piece, Position, Seat};
pub use player::{CardsStatus, HouseStatus, Player};
pub use record::CardRecord;
