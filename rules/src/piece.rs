//! 棋子定义

use serde::{Deserialize, Serialize};

use crate::constants::{BOARD_CELLS, BOARD_SIZE, HOUSE_COUNT, VARYS_NAME};

/// 家族
///
/// 变体顺序即终局平票时的裁决顺序（Stark 最优先）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum House {
    Stark,
    Greyjoy,
    Lannister,
    Targaryen,
    Baratheon,
    Tyrell,
    Tully,
}

impl House {
    /// 全部家族（按裁决顺序）
    pub const ALL: [House; HOUSE_COUNT] = [
        House::Stark,
        House::Greyjoy,
        House::Lannister,
        House::Targaryen,
        House::Baratheon,
        House::Tyrell,
        House::Tully,
    ];

    /// 转换为数组索引
    #[inline]
    pub fn index(self) -> usize {
        match self {
            House::Stark => 0,
            House::Greyjoy => 1,
            House::Lannister => 2,
            House::Targaryen => 3,
            House::Baratheon => 4,
            House::Tyrell => 5,
            House::Tully => 6,
        }
    }

    /// 家族成员总数（多数/锁定计算的分母）
    pub fn member_count(self) -> usize {
        match self {
            House::Stark => 8,
            House::Greyjoy => 7,
            House::Lannister => 6,
            House::Targaryen => 5,
            House::Baratheon => 4,
            House::Tyrell => 3,
            House::Tully => 2,
        }
    }

    /// 严格多数门槛：`floor(n/2) + 1`
    ///
    /// 收集数达到该值后，对手无论如何都无法再夺走该家族的旗帜
    pub fn majority(self) -> usize {
        self.member_count() / 2 + 1
    }

    /// 家族名
    pub fn name(self) -> &'static str {
        match self {
            House::Stark => "Stark",
            House::Greyjoy => "Greyjoy",
            House::Lannister => "Lannister",
            House::Targaryen => "Targaryen",
            House::Baratheon => "Baratheon",
            House::Tyrell => "Tyrell",
            House::Tully => "Tully",
        }
    }

    /// 从家族名解析
    pub fn from_name(name: &str) -> Option<House> {
        House::ALL.into_iter().find(|house| house.name() == name)
    }
}

impl std::fmt::Display for House {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// 人物卡（非移动棋子）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Card {
    pub house: House,
    /// 名册中的唯一名字
    pub name: &'static str,
}

impl Card {
    /// 创建新人物卡
    pub const fn new(house: House, name: &'static str) -> Self {
        Self { house, name }
    }
}

/// 棋盘上的棋子
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Piece {
    /// 移动棋子，其位置决定每回合的合法动作
    Varys,
    /// 可被收集的人物卡
    Card(Card),
}

impl Piece {
    /// 获取人物卡（Varys 返回 None）
    pub fn card(&self) -> Option<Card> {
        match self {
            Piece::Varys => None,
            Piece::Card(card) => Some(*card),
        }
    }

    /// 是否为 Varys
    pub fn is_varys(&self) -> bool {
        matches!(self, Piece::Varys)
    }

    /// 显示用名字
    pub fn name(&self) -> &'static str {
        match self {
            Piece::Varys => VARYS_NAME,
            Piece::Card(card) => card.name,
        }
    }
}

/// 棋盘位置
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Position {
    /// 列 (0-5)
    pub x: u8,
    /// 行 (0-5)
    pub y: u8,
}

impl Position {
    /// 创建新位置
    pub fn new(x: u8, y: u8) -> Option<Self> {
        if (x as usize) < BOARD_SIZE && (y as usize) < BOARD_SIZE {
            Some(Self { x, y })
        } else {
            None
        }
    }

    /// 创建新位置（不检查边界，内部使用）
    pub const fn new_unchecked(x: u8, y: u8) -> Self {
        Self { x, y }
    }

    /// 检查位置是否在棋盘内
    pub fn is_valid(&self) -> bool {
        (self.x as usize) < BOARD_SIZE && (self.y as usize) < BOARD_SIZE
    }

    /// 转换为格子索引（`y * 6 + x`）
    pub fn to_index(&self) -> usize {
        self.y as usize * BOARD_SIZE + self.x as usize
    }

    /// 从格子索引转换
    pub fn from_index(index: usize) -> Option<Self> {
        if index < BOARD_CELLS {
            Some(Position {
                x: (index % BOARD_SIZE) as u8,
                y: (index / BOARD_SIZE) as u8,
            })
        } else {
            None
        }
    }

    /// 是否与另一位置同行或同列（不含自身）
    pub fn same_line(&self, other: Position) -> bool {
        *self != other && (self.x == other.x || self.y == other.y)
    }

    /// 是否严格位于 `a` 与 `b` 之间的直线上
    ///
    /// `a` 与 `b` 不共线时恒为 false
    pub fn strictly_between(&self, a: Position, b: Position) -> bool {
        if a.y == b.y && a.x != b.x {
            let (lo, hi) = (a.x.min(b.x), a.x.max(b.x));
            self.y == a.y && lo < self.x && self.x < hi
        } else if a.x == b.x && a.y != b.y {
            let (lo, hi) = (a.y.min(b.y), a.y.max(b.y));
            self.x == a.x && lo < self.y && self.y < hi
        } else {
            false
        }
    }
}

impl std::fmt::Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_index())
    }
}

/// 玩家席位
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Seat {
    /// 先手
    One,
    /// 后手
    Two,
}

impl Seat {
    /// 获取对方席位
    pub fn opponent(&self) -> Seat {
        match self {
            Seat::One => Seat::Two,
            Seat::Two => Seat::One,
        }
    }

    /// 转换为数组索引
    #[inline]
    pub fn index(&self) -> usize {
        match self {
            Seat::One => 0,
            Seat::Two => 1,
        }
    }
}

impl std::fmt::Display for Seat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Seat::One => f.write_str("player 1"),
            Seat::Two => f.write_str("player 2"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_house_member_counts() {
        let total: usize = House::ALL.iter().map(|h| h.member_count()).sum();
        assert_eq!(total, 35);
        assert_eq!(House::Stark.member_count(), 8);
        assert_eq!(House::Tully.member_count(), 2);
    }

    #[test]
    fn test_house_majority() {
        assert_eq!(House::Stark.majority(), 5);
        assert_eq!(House::Greyjoy.majority(), 4);
        assert_eq!(House::Tyrell.majority(), 2);
        assert_eq!(House::Tully.majority(), 2);
    }

    #[test]
    fn test_house_name_roundtrip() {
        for house in House::ALL {
            assert_eq!(House::from_name(house.name()), Some(house));
        }
        assert_eq!(House::from_name("Varys"), None);
    }

    #[test]
    fn test_position_index() {
        assert_eq!(Position::new_unchecked(0, 0).to_index(), 0);
        assert_eq!(Position::new_unchecked(5, 5).to_index(), 35);
        assert_eq!(Position::from_index(14), Some(Position::new_unchecked(2, 2)));
        assert_eq!(Position::from_index(36), None);
        assert!(Position::new(6, 0).is_none());
    }

    #[test]
    fn test_position_between() {
        let a = Position::new_unchecked(0, 0);
        let b = Position::new_unchecked(4, 0);
        assert!(Position::new_unchecked(2, 0).strictly_between(a, b));
        assert!(Position::new_unchecked(2, 0).strictly_between(b, a));
        assert!(!Position::new_unchecked(4, 0).strictly_between(a, b));
        assert!(!Position::new_unchecked(2, 1).strictly_between(a, b));

        let c = Position::new_unchecked(3, 5);
        assert!(!Position::new_unchecked(1, 2).strictly_between(a, c));
    }

    #[test]
    fn test_seat_opponent() {
        assert_eq!(Seat::One.opponent(), Seat::Two);
        assert_eq!(Seat::Two.opponent(), Seat::One);
    }
}
