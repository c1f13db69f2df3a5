//! 棋盘状态

use rand::seq::SliceRandom;
use rand::Rng;

use crate::constants::{BOARD_CELLS, BOARD_SIZE};
use crate::piece::{Card, House, Piece, Position};
use crate::roster::ROSTER;

/// 棋盘
///
/// 6x6 格子，索引为 `y * 6 + x`。棋子只会被移除、不会新增，
/// Varys 的位置单独缓存以便快速生成合法动作。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    squares: Vec<Option<Piece>>,
    varys: Option<Position>,
}

impl Board {
    /// 创建空棋盘
    pub fn empty() -> Self {
        Self {
            squares: vec![None; BOARD_CELLS],
            varys: None,
        }
    }

    /// 随机发牌：名册中的 35 张人物卡和 Varys 铺满 36 个格子
    pub fn deal<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let mut pieces: Vec<Piece> = ROSTER.iter().copied().map(Piece::Card).collect();
        pieces.push(Piece::Varys);
        pieces.shuffle(rng);

        let mut board = Self::empty();
        for (index, piece) in pieces.into_iter().enumerate() {
            board.set(Position::new_unchecked((index % BOARD_SIZE) as u8, (index / BOARD_SIZE) as u8), Some(piece));
        }
        board
    }

    /// 获取指定位置的棋子
    pub fn get(&self, pos: Position) -> Option<Piece> {
        if pos.is_valid() {
            self.squares[pos.to_index()]
        } else {
            None
        }
    }

    /// 获取指定位置的人物卡
    pub fn card_at(&self, pos: Position) -> Option<Card> {
        self.get(pos).and_then(|piece| piece.card())
    }

    /// 设置指定位置的棋子（不检查规则）
    pub fn set(&mut self, pos: Position, piece: Option<Piece>) {
        if !pos.is_valid() {
            return;
        }
        if self.varys == Some(pos) {
            self.varys = None;
        }
        if piece == Some(Piece::Varys) {
            self.varys = Some(pos);
        }
        self.squares[pos.to_index()] = piece;
    }

    /// 移除指定位置的棋子
    pub fn remove(&mut self, pos: Position) -> Option<Piece> {
        let piece = self.get(pos);
        self.set(pos, None);
        piece
    }

    /// 把 Varys 移动到目标格（目标格原有棋子被覆盖）
    pub fn move_varys(&mut self, to: Position) {
        if let Some(from) = self.varys {
            self.set(from, None);
        }
        self.set(to, Some(Piece::Varys));
    }

    /// 交换两个格子上的棋子
    pub fn swap(&mut self, a: Position, b: Position) {
        let piece_a = self.get(a);
        let piece_b = self.get(b);
        self.set(a, piece_b);
        self.set(b, piece_a);
    }

    /// Varys 当前所在位置
    pub fn varys(&self) -> Option<Position> {
        self.varys
    }

    /// 所有棋子（按位置索引升序）
    pub fn all_pieces(&self) -> impl Iterator<Item = (Position, Piece)> + '_ {
        self.squares.iter().enumerate().filter_map(|(index, square)| {
            square.map(|piece| {
                (
                    Position::new_unchecked((index % BOARD_SIZE) as u8, (index / BOARD_SIZE) as u8),
                    piece,
                )
            })
        })
    }

    /// 所有人物卡（按位置索引升序，不含 Varys）
    pub fn cards(&self) -> impl Iterator<Item = (Position, Card)> + '_ {
        self.all_pieces()
            .filter_map(|(pos, piece)| piece.card().map(|card| (pos, card)))
    }

    /// 棋盘上人物卡数量
    pub fn card_count(&self) -> usize {
        self.cards().count()
    }

    /// 指定家族在棋盘上剩余的人物卡数量
    pub fn house_remaining(&self, house: House) -> usize {
        self.cards().filter(|(_, card)| card.house == house).count()
    }

    /// 棋盘上是否已没有任何人物卡
    pub fn is_empty(&self) -> bool {
        self.cards().next().is_none()
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::empty()
    }
}
