//! 对局状态
//!
//! 把棋盘、双方玩家、随从池和回合信息放在一起，
//! 按规则推进一回合（吃子 -> 旗帜仲裁 -> 可选的随从动作 -> 换手）。

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::banner::BannerArbiter;
use crate::board::Board;
use crate::companion::{self, Companion, CompanionMove, CompanionPool};
use crate::error::GameError;
use crate::moves::MoveGenerator;
use crate::piece::{House, Position, Seat};
use crate::player::Player;

/// 玩家动作
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Action {
    /// 用 Varys 收集目标位置上的人物卡
    Capture(Position),
    /// 使用随从卡
    Companion(CompanionMove),
}

impl std::fmt::Display for Action {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Action::Capture(pos) => write!(f, "capture {}", pos),
            Action::Companion(mv) => write!(f, "companion {}", mv),
        }
    }
}

/// 一次吃子的结算摘要
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TurnReport {
    pub house: House,
    /// 行动方是否获得随从动作（吃光某家族且随从池非空）
    pub companion_due: bool,
}

/// 对局状态
#[derive(Debug, Clone)]
pub struct GameState {
    pub board: Board,
    /// `[player1, player2]`
    pub players: [Player; 2],
    /// 当前行动方
    pub current_turn: Seat,
    /// 剩余随从卡
    pub companions: CompanionPool,
    /// 已完成的回合数
    pub turns: u32,
    companion_due: bool,
}

impl GameState {
    /// 从棋盘创建对局（player1 先手，随从池完整）
    pub fn from_board(board: Board) -> Self {
        Self {
            board,
            players: [Player::new(Seat::One), Player::new(Seat::Two)],
            current_turn: Seat::One,
            companions: CompanionPool::full(),
            turns: 0,
            companion_due: false,
        }
    }

    /// 随机发牌开局
    pub fn deal<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self::from_board(Board::deal(rng))
    }

    pub fn player(&self, seat: Seat) -> &Player {
        &self.players[seat.index()]
    }

    /// 行动方是否正等待随从动作
    pub fn companion_due(&self) -> bool {
        self.companion_due
    }

    /// 当前所有可用的随从动作（按随从池顺序）
    pub fn companion_moves(&self) -> Vec<CompanionMove> {
        self.companions
            .iter()
            .flat_map(|c: Companion| c.spec().completions(&self.board, &self.companions))
            .collect()
    }

    /// 执行一个动作
    pub fn apply_action(&mut self, action: &Action) -> Result<(), GameError> {
        match action {
            Action::Capture(target) => self.apply_capture(*target).map(|_| ()),
            Action::Companion(mv) => self.apply_companion(mv),
        }
    }

    /// 当前行动方吃子
    ///
    /// 吃光某家族且随从池非空时保持行动方不变，等待随从动作；否则换手
    pub fn apply_capture(&mut self, target: Position) -> Result<TurnReport, GameError> {
        if self.companion_due {
            return Err(GameError::InvalidAction {
                location: target.to_index(),
            });
        }

        let seat = self.current_turn;
        let house = MoveGenerator::apply_action(
            &mut self.board,
            target,
            &mut self.players[seat.index()],
        )?;
        self.arbitrate(house, seat);

        self.companion_due = self.board.house_remaining(house) == 0 && !self.companions.is_empty();
        if self.companion_due {
            tracing::debug!("{} exhausted {}, companion action pending", seat, house);
        } else {
            self.finish_turn();
        }

        Ok(TurnReport {
            house,
            companion_due: self.companion_due,
        })
    }

    /// 当前行动方使用随从
    pub fn apply_companion(&mut self, mv: &CompanionMove) -> Result<(), GameError> {
        if !self.companion_due {
            return Err(GameError::InvalidCompanion {
                companion: mv.companion.to_string(),
                reason: "no companion action pending".to_string(),
            });
        }

        let seat = self.current_turn;
        let recruited = companion::apply_companion(
            &mut self.board,
            &mut self.companions,
            &mut self.players[seat.index()],
            mv,
        )?;
        if let Some(house) = recruited {
            self.arbitrate(house, seat);
        }

        self.companion_due = false;
        self.finish_turn();
        Ok(())
    }

    /// 放弃本回合（包括待定的随从动作）并换手
    pub fn pass_turn(&mut self) {
        self.companion_due = false;
        self.finish_turn();
    }

    /// 当前行动方是否没有任何动作可做
    pub fn is_over(&self) -> bool {
        !self.companion_due && !MoveGenerator::has_legal_action(&self.board)
    }

    /// 胜者（未分胜负时为 None）
    pub fn winner(&self) -> Option<Seat> {
        let [p1, p2] = &self.players;
        BannerArbiter::calculate_winner(p1, p2)
    }

    fn arbitrate(&mut self, house: House, seat: Seat) {
        let [p1, p2] = &mut self.players;
        BannerArbiter::update_banners(p1, p2, house, seat);
    }

    fn finish_turn(&mut self) {
        self.current_turn = self.current_turn.opponent();
        self.turns += 1;
    }
}
