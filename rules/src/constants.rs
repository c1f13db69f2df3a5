//! 规则常量定义

/// 棋盘边长（行数 = 列数）
pub const BOARD_SIZE: usize = 6;

/// 棋盘格子总数
pub const BOARD_CELLS: usize = BOARD_SIZE * BOARD_SIZE;

/// 家族数量
pub const HOUSE_COUNT: usize = 7;

/// 人物卡总数（不含 Varys）
pub const CARD_COUNT: usize = 35;

/// 移动棋子（Varys）的名字，存档中也用作其家族名
pub const VARYS_NAME: &str = "Varys";
