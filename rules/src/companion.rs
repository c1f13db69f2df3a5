//! 随从卡目录
//!
//! 每个随从是目录中的一行：参数个数、目标范围和效果函数。
//! 随从动作的生成、校验和执行都由这张表驱动，不按名字分支。

use serde::{Deserialize, Serialize};

use crate::board::Board;
use crate::error::GameError;
use crate::piece::{House, Position};
use crate::player::Player;

/// 随从
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Companion {
    Jon,
    Sandor,
    Ramsay,
    Jaqen,
}

impl Companion {
    /// 全部随从（目录顺序）
    pub const ALL: [Companion; 4] = [
        Companion::Jon,
        Companion::Sandor,
        Companion::Ramsay,
        Companion::Jaqen,
    ];

    /// 目录中的条目
    pub fn spec(self) -> &'static CompanionSpec {
        match self {
            Companion::Jon => &CATALOG[0],
            Companion::Sandor => &CATALOG[1],
            Companion::Ramsay => &CATALOG[2],
            Companion::Jaqen => &CATALOG[3],
        }
    }

    /// 显示名
    pub fn name(self) -> &'static str {
        self.spec().name
    }

    /// 从显示名解析
    pub fn from_name(name: &str) -> Option<Companion> {
        Companion::ALL.into_iter().find(|c| c.name() == name)
    }
}

impl std::fmt::Display for Companion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// 随从动作需要的参数形态
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Arity {
    /// 一个位置
    One,
    /// 两个不同位置
    Two,
    /// 两个不同位置 + 一张要弃置的随从卡
    TwoWithCard,
}

impl Arity {
    /// 需要的位置数量
    pub fn locations(self) -> usize {
        match self {
            Arity::One => 1,
            Arity::Two | Arity::TwoWithCard => 2,
        }
    }
}

/// 随从动作可选的目标范围
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TargetDomain {
    /// 只能选人物卡
    Cards,
    /// 任意棋子（含 Varys）
    AnyPiece,
}

type Effect = fn(&mut Board, &mut Player, &[Position]) -> Option<House>;

/// 目录条目
pub struct CompanionSpec {
    pub companion: Companion,
    pub name: &'static str,
    pub arity: Arity,
    pub domain: TargetDomain,
    /// 效果；返回被收集卡的家族（需要旗帜仲裁时）
    effect: Effect,
}

/// 随从目录
pub const CATALOG: [CompanionSpec; 4] = [
    CompanionSpec {
        companion: Companion::Jon,
        name: "Jon Snow",
        arity: Arity::One,
        domain: TargetDomain::Cards,
        effect: recruit,
    },
    CompanionSpec {
        companion: Companion::Sandor,
        name: "Sandor Clegane",
        arity: Arity::One,
        domain: TargetDomain::Cards,
        effect: slay,
    },
    CompanionSpec {
        companion: Companion::Ramsay,
        name: "Ramsay Bolton",
        arity: Arity::Two,
        domain: TargetDomain::AnyPiece,
        effect: swap,
    },
    CompanionSpec {
        companion: Companion::Jaqen,
        name: "Jaqen H'ghar",
        arity: Arity::TwoWithCard,
        domain: TargetDomain::Cards,
        effect: slay,
    },
];

/// 目标人物卡直接进入行动方的收集
fn recruit(board: &mut Board, player: &mut Player, targets: &[Position]) -> Option<House> {
    let card = board.card_at(targets[0])?;
    board.remove(targets[0]);
    player.add_card(card);
    Some(card.house)
}

/// 目标人物卡移出游戏，不归任何人
fn slay(board: &mut Board, _player: &mut Player, targets: &[Position]) -> Option<House> {
    for pos in targets {
        board.remove(*pos);
    }
    None
}

/// 交换两个棋子的位置
fn swap(board: &mut Board, _player: &mut Player, targets: &[Position]) -> Option<House> {
    board.swap(targets[0], targets[1]);
    None
}

/// 随从动作：`[随从, 位置..., 弃置随从?]`
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CompanionMove {
    pub companion: Companion,
    pub targets: Vec<Position>,
    pub discard: Option<Companion>,
}

impl std::fmt::Display for CompanionMove {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.companion)?;
        for pos in &self.targets {
            write!(f, " {}", pos)?;
        }
        if let Some(discard) = self.discard {
            write!(f, " discard {}", discard)?;
        }
        Ok(())
    }
}

/// 剩余可用的随从卡（保持目录顺序）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompanionPool {
    remaining: Vec<Companion>,
}

impl CompanionPool {
    /// 完整的随从池
    pub fn full() -> Self {
        Self {
            remaining: Companion::ALL.to_vec(),
        }
    }

    /// 空随从池
    pub fn empty() -> Self {
        Self { remaining: Vec::new() }
    }

    pub fn contains(&self, companion: Companion) -> bool {
        self.remaining.contains(&companion)
    }

    pub fn is_empty(&self) -> bool {
        self.remaining.is_empty()
    }

    pub fn len(&self) -> usize {
        self.remaining.len()
    }

    /// 按目录顺序遍历
    pub fn iter(&self) -> impl Iterator<Item = Companion> + '_ {
        self.remaining.iter().copied()
    }

    /// 移除一张随从卡
    pub fn remove(&mut self, companion: Companion) {
        self.remaining.retain(|&c| c != companion);
    }
}

impl Default for CompanionPool {
    fn default() -> Self {
        Self::full()
    }
}

impl CompanionSpec {
    /// 当前棋盘上可选的目标（按位置索引升序）
    fn candidates(&self, board: &Board) -> Vec<Position> {
        match self.domain {
            TargetDomain::Cards => board.cards().map(|(pos, _)| pos).collect(),
            TargetDomain::AnyPiece => board.all_pieces().map(|(pos, _)| pos).collect(),
        }
    }

    /// 可弃置的其他随从
    fn discards(&self, pool: &CompanionPool) -> Vec<Option<Companion>> {
        match self.arity {
            Arity::TwoWithCard => {
                let others: Vec<Option<Companion>> = pool
                    .iter()
                    .filter(|&c| c != self.companion)
                    .map(Some)
                    .collect();
                if others.is_empty() {
                    vec![None]
                } else {
                    others
                }
            }
            Arity::One | Arity::Two => vec![None],
        }
    }

    /// 枚举该条目的全部合法补全
    ///
    /// 顺序：位置索引升序（两个位置时按字典序），再按随从池顺序选择弃置卡
    pub fn completions(&self, board: &Board, pool: &CompanionPool) -> Vec<CompanionMove> {
        let candidates = self.candidates(board);
        let discards = self.discards(pool);

        let target_sets: Vec<Vec<Position>> = match self.arity.locations() {
            1 => candidates.iter().map(|&p| vec![p]).collect(),
            _ => {
                let mut sets = Vec::new();
                for (i, &a) in candidates.iter().enumerate() {
                    for &b in &candidates[i + 1..] {
                        sets.push(vec![a, b]);
                    }
                }
                sets
            }
        };

        let mut moves = Vec::with_capacity(target_sets.len() * discards.len());
        for targets in target_sets {
            for &discard in &discards {
                moves.push(CompanionMove {
                    companion: self.companion,
                    targets: targets.clone(),
                    discard,
                });
            }
        }
        moves
    }

    /// 校验随从动作是否符合条目定义
    pub fn validate(
        &self,
        board: &Board,
        pool: &CompanionPool,
        mv: &CompanionMove,
    ) -> Result<(), GameError> {
        let invalid = |reason: String| GameError::InvalidCompanion {
            companion: self.name.to_string(),
            reason,
        };

        if !pool.contains(self.companion) {
            return Err(invalid("companion is not in the pool".to_string()));
        }
        if mv.targets.len() != self.arity.locations() {
            return Err(invalid(format!(
                "expected {} location(s), got {}",
                self.arity.locations(),
                mv.targets.len()
            )));
        }
        if mv.targets.len() == 2 && mv.targets[0] == mv.targets[1] {
            return Err(invalid("locations must be distinct".to_string()));
        }
        for &pos in &mv.targets {
            let ok = match self.domain {
                TargetDomain::Cards => board.card_at(pos).is_some(),
                TargetDomain::AnyPiece => board.get(pos).is_some(),
            };
            if !ok {
                return Err(invalid(format!("location {} is not a valid target", pos)));
            }
        }
        if !self.discards(pool).contains(&mv.discard) {
            return Err(invalid(format!("invalid discard choice {:?}", mv.discard)));
        }
        Ok(())
    }
}

/// 校验并执行随从动作
///
/// 成功后随从（以及被弃置的随从）离开随从池；返回被收集卡的家族
pub fn apply_companion(
    board: &mut Board,
    pool: &mut CompanionPool,
    player: &mut Player,
    mv: &CompanionMove,
) -> Result<Option<House>, GameError> {
    let spec = mv.companion.spec();
    spec.validate(board, pool, mv)?;

    let house = (spec.effect)(board, player, &mv.targets);

    pool.remove(mv.companion);
    if let Some(discard) = mv.discard {
        pool.remove(discard);
    }
    Ok(house)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::piece::{Card, Piece, Seat};

    fn sample_board() -> Board {
        let mut board = Board::empty();
        board.set(Position::new_unchecked(0, 0), Some(Piece::Varys));
        board.set(Position::new_unchecked(1, 0), Some(Piece::Card(Card::new(House::Stark, "Arya"))));
        board.set(Position::new_unchecked(2, 3), Some(Piece::Card(Card::new(House::Tully, "Edmure"))));
        board.set(Position::new_unchecked(5, 5), Some(Piece::Card(Card::new(House::Tyrell, "Loras"))));
        board
    }

    #[test]
    fn test_catalog_rows_match_companions() {
        for companion in Companion::ALL {
            assert_eq!(companion.spec().companion, companion);
            assert_eq!(Companion::from_name(companion.name()), Some(companion));
        }
    }

    #[test]
    fn test_jon_recruits_card() {
        let mut board = sample_board();
        let mut pool = CompanionPool::full();
        let mut player = Player::new(Seat::One);
        let mv = CompanionMove {
            companion: Companion::Jon,
            targets: vec![Position::new_unchecked(2, 3)],
            discard: None,
        };

        let house = apply_companion(&mut board, &mut pool, &mut player, &mv).unwrap();

        assert_eq!(house, Some(House::Tully));
        assert_eq!(player.captured_count(House::Tully), 1);
        assert!(board.get(Position::new_unchecked(2, 3)).is_none());
        assert!(!pool.contains(Companion::Jon));
    }

    #[test]
    fn test_sandor_cannot_target_varys() {
        let mut board = sample_board();
        let mut pool = CompanionPool::full();
        let mut player = Player::new(Seat::One);
        let mv = CompanionMove {
            companion: Companion::Sandor,
            targets: vec![Position::new_unchecked(0, 0)],
            discard: None,
        };

        let err = apply_companion(&mut board, &mut pool, &mut player, &mv);
        assert!(matches!(err, Err(GameError::InvalidCompanion { .. })));
        assert!(pool.contains(Companion::Sandor));
    }

    #[test]
    fn test_ramsay_swaps_varys() {
        let mut board = sample_board();
        let mut pool = CompanionPool::full();
        let mut player = Player::new(Seat::Two);
        let mv = CompanionMove {
            companion: Companion::Ramsay,
            targets: vec![Position::new_unchecked(0, 0), Position::new_unchecked(5, 5)],
            discard: None,
        };

        let house = apply_companion(&mut board, &mut pool, &mut player, &mv).unwrap();

        assert_eq!(house, None);
        assert_eq!(board.varys(), Some(Position::new_unchecked(5, 5)));
        assert_eq!(board.card_at(Position::new_unchecked(0, 0)).unwrap().name, "Loras");
    }

    #[test]
    fn test_jaqen_removes_two_and_discards() {
        let mut board = sample_board();
        let mut pool = CompanionPool::full();
        let mut player = Player::new(Seat::One);
        let mv = CompanionMove {
            companion: Companion::Jaqen,
            targets: vec![Position::new_unchecked(1, 0), Position::new_unchecked(5, 5)],
            discard: Some(Companion::Ramsay),
        };

        apply_companion(&mut board, &mut pool, &mut player, &mv).unwrap();

        assert_eq!(board.card_count(), 1);
        assert_eq!(player.total_captured(), 0);
        assert_eq!(pool.iter().collect::<Vec<_>>(), vec![Companion::Jon, Companion::Sandor]);
    }

    #[test]
    fn test_jaqen_requires_discard_when_available() {
        let board = sample_board();
        let pool = CompanionPool::full();
        let mv = CompanionMove {
            companion: Companion::Jaqen,
            targets: vec![Position::new_unchecked(1, 0), Position::new_unchecked(5, 5)],
            discard: None,
        };
        assert!(Companion::Jaqen.spec().validate(&board, &pool, &mv).is_err());

        let mut alone = CompanionPool::full();
        for c in [Companion::Jon, Companion::Sandor, Companion::Ramsay] {
            alone.remove(c);
        }
        assert!(Companion::Jaqen.spec().validate(&board, &alone, &mv).is_ok());
    }

    #[test]
    fn test_arity_mismatch_rejected() {
        let board = sample_board();
        let pool = CompanionPool::full();
        let mv = CompanionMove {
            companion: Companion::Ramsay,
            targets: vec![Position::new_unchecked(1, 0)],
            discard: None,
        };
        assert!(Companion::Ramsay.spec().validate(&board, &pool, &mv).is_err());

        let dup = CompanionMove {
            companion: Companion::Ramsay,
            targets: vec![Position::new_unchecked(1, 0), Position::new_unchecked(1, 0)],
            discard: None,
        };
        assert!(Companion::Ramsay.spec().validate(&board, &pool, &dup).is_err());
    }

    #[test]
    fn test_completion_counts() {
        let board = sample_board();
        let pool = CompanionPool::full();

        // 3 张人物卡
        assert_eq!(Companion::Jon.spec().completions(&board, &pool).len(), 3);
        // 4 个棋子两两组合
        assert_eq!(Companion::Ramsay.spec().completions(&board, &pool).len(), 6);
        // 3 组卡 x 3 张可弃置随从
        let jaqen = Companion::Jaqen.spec().completions(&board, &pool);
        assert_eq!(jaqen.len(), 9);
        assert_eq!(jaqen[0].discard, Some(Companion::Jon));

        for mv in jaqen {
            assert!(Companion::Jaqen.spec().validate(&board, &pool, &mv).is_ok());
        }
    }
}
