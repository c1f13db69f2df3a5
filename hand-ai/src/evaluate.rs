//! 局面评估函数
//!
//! 所有项都对 (行动方, 对手) 反对称，因此
//! `evaluate(board, a, b) == -evaluate(board, b, a)`。

use rules::{BannerArbiter, Board, House, MoveGenerator, Player, Position, HOUSE_COUNT};
use serde::{Deserialize, Serialize};

/// 终局分值（压过所有启发式项）
pub const TERMINAL_SCORE: f64 = 1e10;

/// 评估权重
///
/// 字段名与调参器使用的权重向量一致
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EvalWeights {
    /// 再收集一张即可锁定旗帜时的奖励
    pub capture_banner_bonus: f64,
    /// 同行/同列同家族相邻卡（连吃潜力）的奖励
    pub row_col_priority: f64,
    /// 多数差额二次项
    pub general_banner_weight: f64,
    /// 剩余卡聚集程度的惩罚
    pub house_variance_weight: f64,
    /// 锁定家族数量差
    pub who_has_more: f64,
    /// 旗帜数量差
    pub banner_difference_score: f64,
    /// 启发式项的整体缩放
    pub heuristic: f64,
    /// 已锁定家族继续收集的惩罚
    pub overcapture_penalty: f64,
}

impl Default for EvalWeights {
    fn default() -> Self {
        Self {
            capture_banner_bonus: 40.0,
            row_col_priority: 3.0,
            general_banner_weight: 2.0,
            house_variance_weight: 1.5,
            who_has_more: 50.0,
            banner_difference_score: 15.0,
            heuristic: 1.0,
            overcapture_penalty: 30.0,
        }
    }
}

/// 评估器
#[derive(Debug, Clone, Default)]
pub struct Evaluator {
    weights: EvalWeights,
}

impl Evaluator {
    pub fn new(weights: EvalWeights) -> Self {
        Self { weights }
    }

    pub fn weights(&self) -> &EvalWeights {
        &self.weights
    }

    /// 评估局面（`mover` 视角，正值对 `mover` 有利）
    pub fn evaluate(&self, board: &Board, mover: &Player, opponent: &Player) -> f64 {
        if !MoveGenerator::has_legal_action(board) {
            return Self::terminal(mover, opponent);
        }

        let w = &self.weights;
        let banners = w.banner_difference_score * diff(mover.banner_count(), opponent.banner_count());
        let locked = w.who_has_more * diff(mover.locked_count(), opponent.locked_count());

        let heuristic = self.security(board, mover, opponent)
            + self.alignment(board, mover, opponent)
            + self.margin(mover, opponent)
            + self.clustering(board, mover, opponent);

        banners + locked + w.heuristic * heuristic
    }

    /// 终局分值：胜 `+TERMINAL_SCORE`，负 `-TERMINAL_SCORE`，无人持旗为 0
    pub fn terminal(mover: &Player, opponent: &Player) -> f64 {
        match BannerArbiter::winner_of(mover, opponent) {
            Some(seat) if seat == mover.seat() => TERMINAL_SCORE,
            Some(_) => -TERMINAL_SCORE,
            None => 0.0,
        }
    }

    /// 旗帜安全项
    ///
    /// 对棋盘上每张人物卡：收集它就能锁定旗帜时加分，
    /// 家族已锁定后继续收集则扣分
    fn security(&self, board: &Board, mover: &Player, opponent: &Player) -> f64 {
        board
            .cards()
            .map(|(_, card)| {
                self.card_security(mover, opponent, card.house)
                    - self.card_security(opponent, mover, card.house)
            })
            .sum()
    }

    fn card_security(&self, player: &Player, other: &Player, house: House) -> f64 {
        let count = player.captured_count(house);
        let threshold = house.majority();

        if count >= threshold {
            -self.weights.overcapture_penalty * (count + 1 - threshold) as f64
        } else if count + 1 >= threshold && other.captured_count(house) < threshold {
            self.weights.capture_banner_bonus
        } else {
            0.0
        }
    }

    /// 连吃潜力项
    ///
    /// 同行/同列的同家族卡对，记给尚未持有该家族旗帜的一方
    fn alignment(&self, board: &Board, mover: &Player, opponent: &Player) -> f64 {
        let mut pairs = [0usize; HOUSE_COUNT];
        let cards: Vec<_> = board.cards().collect();
        for (i, (a, card_a)) in cards.iter().enumerate() {
            for (b, card_b) in &cards[i + 1..] {
                if card_a.house == card_b.house && a.same_line(*b) {
                    pairs[card_a.house.index()] += 1;
                }
            }
        }

        House::ALL
            .into_iter()
            .filter(|&house| pairs[house.index()] > 0 && is_open(house, mover, opponent))
            .map(|house| {
                let need = diff(!mover.banner(house) as usize, !opponent.banner(house) as usize);
                pairs[house.index()] as f64 * self.weights.row_col_priority * need
            })
            .sum()
    }

    /// 多数差额项：`sign(d) * d^2 / n^2`，已锁定的家族不计
    fn margin(&self, mover: &Player, opponent: &Player) -> f64 {
        House::ALL
            .into_iter()
            .filter(|&house| is_open(house, mover, opponent))
            .map(|house| {
                let d = diff(mover.captured_count(house), opponent.captured_count(house));
                let n = house.member_count() as f64;
                self.weights.general_banner_weight * d * d.abs() / (n * n)
            })
            .sum()
    }

    /// 聚集惩罚项
    ///
    /// 未锁定家族剩余的卡越集中，对手越容易连吃，记给该家族旗帜的持有者
    fn clustering(&self, board: &Board, mover: &Player, opponent: &Player) -> f64 {
        if self.weights.house_variance_weight == 0.0 {
            return 0.0;
        }

        House::ALL
            .into_iter()
            .filter(|&house| is_open(house, mover, opponent))
            .filter_map(|house| {
                let positions: Vec<Position> = board
                    .cards()
                    .filter(|(_, card)| card.house == house)
                    .map(|(pos, _)| pos)
                    .collect();
                if positions.len() < 2 {
                    return None;
                }
                let cluster = 1.0 / (1.0 + variance(&positions));
                let holds = diff(opponent.banner(house) as usize, mover.banner(house) as usize);
                Some(self.weights.house_variance_weight * cluster * holds)
            })
            .sum()
    }
}

/// 双方都未锁定
fn is_open(house: House, a: &Player, b: &Player) -> bool {
    !a.has_locked(house) && !b.has_locked(house)
}

#[inline]
fn diff(a: usize, b: usize) -> f64 {
    a as f64 - b as f64
}

/// 两个坐标轴上的总体方差之和
fn variance(positions: &[Position]) -> f64 {
    let n = positions.len() as f64;
    let mean_x = positions.iter().map(|p| p.x as f64).sum::<f64>() / n;
    let mean_y = positions.iter().map(|p| p.y as f64).sum::<f64>() / n;
    let var_x = positions.iter().map(|p| (p.x as f64 - mean_x).powi(2)).sum::<f64>() / n;
    let var_y = positions.iter().map(|p| (p.y as f64 - mean_y).powi(2)).sum::<f64>() / n;
    var_x + var_y
}
