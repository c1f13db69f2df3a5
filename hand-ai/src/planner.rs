//! 随从动作规划
//!
//! 枚举随从池中每个条目的全部补全，在假想局面上用评估函数打分，
//! 取第一个严格最优的补全。只看一层，不进入 minimax 递归。

use rules::{apply_companion, BannerArbiter, Board, CompanionMove, CompanionPool, Player};

use crate::evaluate::Evaluator;

/// 随从动作规划器
pub struct CompanionPlanner<'a> {
    evaluator: &'a Evaluator,
}

impl<'a> CompanionPlanner<'a> {
    pub fn new(evaluator: &'a Evaluator) -> Self {
        Self { evaluator }
    }

    /// 选出最佳随从动作（随从池为空或没有可用补全时为 None）
    ///
    /// 枚举顺序：随从池顺序，再按位置索引升序，最后按弃置卡的随从池顺序
    pub fn plan(
        &self,
        board: &Board,
        mover: &Player,
        opponent: &Player,
        pool: &CompanionPool,
    ) -> Option<CompanionMove> {
        let mut best: Option<(CompanionMove, f64)> = None;

        for companion in pool.iter() {
            for mv in companion.spec().completions(board, pool) {
                let Some(score) = self.score(board, mover, opponent, pool, &mv) else {
                    continue;
                };
                if best.as_ref().map_or(true, |(_, best_score)| score > *best_score) {
                    best = Some((mv, score));
                }
            }
        }

        best.map(|(mv, _)| mv)
    }

    /// 假想执行随从动作后的分值（行动方视角）
    fn score(
        &self,
        board: &Board,
        mover: &Player,
        opponent: &Player,
        pool: &CompanionPool,
        mv: &CompanionMove,
    ) -> Option<f64> {
        let mut board = board.clone();
        let mut pool = pool.clone();
        let mut mover = mover.clone();
        let mut opponent = opponent.clone();

        let recruited = apply_companion(&mut board, &mut pool, &mut mover, mv).ok()?;
        if let Some(house) = recruited {
            let seat = mover.seat();
            BannerArbiter::arbitrate(&mut mover, &mut opponent, house, seat);
        }

        Some(self.evaluator.evaluate(&board, &mover, &opponent))
    }
}
