//! 合法动作生成与吃子结算

use crate::board::Board;
use crate::error::GameError;
use crate::piece::{Card, House, Position};
use crate::player::Player;

/// 吃子动作
///
/// 由 `MoveGenerator::generate_captures` 生成，`to` 上必定是与 Varys 共线的人物卡
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Capture {
    /// Varys 起始位置
    pub from: Position,
    /// 目标位置
    pub to: Position,
    /// 目标人物卡
    pub card: Card,
}

impl std::fmt::Display for Capture {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} -> {} ({})", self.from, self.to, self.card.name)
    }
}

/// 吃子结算结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaptureOutcome {
    /// 目标人物卡的家族（交给旗帜仲裁）
    pub house: House,
    /// 被收集的全部人物卡（目标 + 路径上同家族的卡）
    pub collected: Vec<(Position, Card)>,
}

/// 走法生成器
pub struct MoveGenerator;

impl MoveGenerator {
    /// 生成所有合法吃子（按目标位置索引升序）
    ///
    /// 目标为与 Varys 同行或同列的任意人物卡；结果为空即终局
    pub fn generate_captures(board: &Board) -> Vec<Capture> {
        let Some(from) = board.varys() else {
            return Vec::new();
        };

        board
            .cards()
            .filter(|(pos, _)| pos.same_line(from))
            .map(|(to, card)| Capture { from, to, card })
            .collect()
    }

    /// 所有合法目标位置（按位置索引升序）
    pub fn legal_targets(board: &Board) -> Vec<Position> {
        Self::generate_captures(board)
            .into_iter()
            .map(|capture| capture.to)
            .collect()
    }

    /// 是否存在合法动作
    pub fn has_legal_action(board: &Board) -> bool {
        let Some(from) = board.varys() else {
            return false;
        };
        board.cards().any(|(pos, _)| pos.same_line(from))
    }

    /// 校验并执行吃子
    ///
    /// 目标不在合法动作集合中时返回 `InvalidAction`，棋盘与玩家保持不变
    pub fn apply_action(
        board: &mut Board,
        target: Position,
        player: &mut Player,
    ) -> Result<House, GameError> {
        let capture = Self::generate_captures(board)
            .into_iter()
            .find(|capture| capture.to == target)
            .ok_or(GameError::InvalidAction {
                location: target.to_index(),
            })?;

        Ok(Self::execute(board, &capture, player).house)
    }

    /// 执行已生成的吃子（不重新校验合法性）
    ///
    /// 收集目标卡以及 Varys 与目标之间直线上所有同家族的卡，
    /// 其他家族的卡留在原地；最后 Varys 移动到目标位置。
    pub fn execute(board: &mut Board, capture: &Capture, player: &mut Player) -> CaptureOutcome {
        let house = capture.card.house;

        let mut collected: Vec<(Position, Card)> = board
            .cards()
            .filter(|(pos, card)| {
                card.house == house && pos.strictly_between(capture.from, capture.to)
            })
            .collect();
        collected.push((capture.to, capture.card));

        for (pos, card) in &collected {
            player.add_card(*card);
            board.remove(*pos);
        }
        board.move_varys(capture.to);

        CaptureOutcome { house, collected }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::piece::{Piece, Seat};

    fn place(board: &mut Board, index: usize, house: House, name: &'static str) {
        let pos = Position::from_index(index).unwrap();
        board.set(pos, Some(Piece::Card(Card::new(house, name))));
    }

    fn place_varys(board: &mut Board, index: usize) {
        board.set(Position::from_index(index).unwrap(), Some(Piece::Varys));
    }

    fn pos(index: usize) -> Position {
        Position::from_index(index).unwrap()
    }

    #[test]
    fn test_legal_targets_row_and_column() {
        let mut board = Board::empty();
        place_varys(&mut board, 14); // (2, 2)
        place(&mut board, 12, House::Stark, "Arya"); // 同行
        place(&mut board, 2, House::Stark, "Bran"); // 同列
        place(&mut board, 35, House::Stark, "Robb"); // 不共线
        place(&mut board, 32, House::Tully, "Edmure"); // 同列

        let targets: Vec<usize> = MoveGenerator::legal_targets(&board)
            .iter()
            .map(Position::to_index)
            .collect();
        assert_eq!(targets, vec![2, 12, 32]);
    }

    #[test]
    fn test_single_remaining_piece() {
        let mut board = Board::empty();
        place_varys(&mut board, 0);
        place(&mut board, 30, House::Greyjoy, "Theon");

        assert_eq!(MoveGenerator::legal_targets(&board), vec![pos(30)]);
    }

    #[test]
    fn test_no_aligned_piece_is_terminal() {
        let mut board = Board::empty();
        place_varys(&mut board, 0);
        place(&mut board, 7, House::Greyjoy, "Theon");

        assert!(MoveGenerator::legal_targets(&board).is_empty());
        assert!(!MoveGenerator::has_legal_action(&board));
    }

    #[test]
    fn test_empty_board_has_no_actions() {
        let board = Board::empty();
        assert!(MoveGenerator::legal_targets(&board).is_empty());
    }

    #[test]
    fn test_simple_capture_removes_only_target() {
        let mut board = Board::empty();
        place_varys(&mut board, 0);
        place(&mut board, 2, House::Lannister, "Tyrion");
        place(&mut board, 4, House::Stark, "Arya");
        place(&mut board, 24, House::Tully, "Edmure");
        let mut player = Player::new(Seat::One);

        let before = board.card_count();
        let house = MoveGenerator::apply_action(&mut board, pos(4), &mut player).unwrap();

        assert_eq!(house, House::Stark);
        assert_eq!(board.card_count(), before - 1);
        assert_eq!(board.varys(), Some(pos(4)));
        assert_eq!(board.get(pos(0)), None);
        // 路径上的其他家族卡保留
        assert!(board.card_at(pos(2)).is_some());
        assert_eq!(player.captured_count(House::Stark), 1);

        let targets = MoveGenerator::legal_targets(&board);
        assert!(!targets.contains(&pos(4)));
        assert!(!targets.contains(&pos(0)));
    }

    #[test]
    fn test_chain_capture() {
        let mut board = Board::empty();
        place_varys(&mut board, 0);
        place(&mut board, 2, House::Stark, "Arya");
        place(&mut board, 4, House::Stark, "Bran");
        let mut player = Player::new(Seat::Two);

        MoveGenerator::apply_action(&mut board, pos(4), &mut player).unwrap();

        assert_eq!(board.get(pos(2)), None);
        assert_eq!(board.get(pos(4)), Some(Piece::Varys));
        assert_eq!(player.captured_count(House::Stark), 2);
    }

    #[test]
    fn test_chain_capture_skips_other_houses_on_column() {
        let mut board = Board::empty();
        place_varys(&mut board, 33); // (3, 5)
        place(&mut board, 27, House::Targaryen, "Aegon"); // (3, 4)
        place(&mut board, 21, House::Tyrell, "Loras"); // (3, 3)
        place(&mut board, 15, House::Targaryen, "Aerys"); // (3, 2)
        place(&mut board, 3, House::Targaryen, "Rhaegar"); // (3, 0)，在目标之外
        let mut player = Player::new(Seat::One);

        let outcome = MoveGenerator::execute(
            &mut board,
            &Capture {
                from: pos(33),
                to: pos(15),
                card: Card::new(House::Targaryen, "Aerys"),
            },
            &mut player,
        );

        assert_eq!(outcome.collected.len(), 2);
        assert_eq!(player.captured_count(House::Targaryen), 2);
        assert!(board.card_at(pos(21)).is_some());
        assert!(board.card_at(pos(3)).is_some());
        assert_eq!(board.varys(), Some(pos(15)));
    }

    #[test]
    fn test_invalid_action_rejected() {
        let mut board = Board::empty();
        place_varys(&mut board, 0);
        place(&mut board, 7, House::Stark, "Arya");
        place(&mut board, 1, House::Stark, "Bran");
        let snapshot = board.clone();
        let mut player = Player::new(Seat::One);

        let err = MoveGenerator::apply_action(&mut board, pos(7), &mut player).unwrap_err();
        assert_eq!(err, GameError::InvalidAction { location: 7 });
        // Varys 自身所在格也不是合法目标
        assert!(MoveGenerator::apply_action(&mut board, pos(0), &mut player).is_err());
        assert_eq!(board, snapshot);
        assert_eq!(player.total_captured(), 0);
    }
}
