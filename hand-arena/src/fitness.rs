//! 权重适应度
//!
//! 供外部调参程序使用的黑盒目标函数：给定评估权重，与固定对手轮换先后手
//! 对局若干盘，返回胜率。每盘都用新的引擎，不保留跨局状态。

use hand_ai::{Difficulty, EvalWeights};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use rules::{GameState, Seat};
use tracing::info;

use crate::config::{AgentKind, ArenaConfig};
use crate::game::Match;

/// 计算一组权重的胜率
///
/// 第 i 盘用 `seed + i` 发牌，偶数盘候选方先手，奇数盘后手
pub async fn fitness(weights: EvalWeights, opponent: &AgentKind, games: u32, seed: u64) -> f64 {
    if games == 0 {
        return 0.0;
    }

    let candidate = AgentKind::Minimax {
        difficulty: Difficulty::default(),
        depth: None,
        weights,
    };

    let mut wins = 0u32;
    for game in 0..games {
        let game_seed = seed.wrapping_add(u64::from(game));
        let seat = if game % 2 == 0 { Seat::One } else { Seat::Two };

        let (player1, player2) = match seat {
            Seat::One => (candidate.clone(), opponent.clone()),
            Seat::Two => (opponent.clone(), candidate.clone()),
        };
        let config = ArenaConfig {
            player1,
            player2,
            seed: Some(game_seed),
            ..ArenaConfig::default()
        };

        let state = GameState::deal(&mut ChaCha8Rng::seed_from_u64(game_seed));
        let agents = [
            config.player1.build(game_seed),
            config.player2.build(game_seed.wrapping_add(1)),
        ];
        let outcome = Match::new(state, agents, &config).play().await;

        if outcome.winner == Some(seat) {
            wins += 1;
        }
    }

    let rate = f64::from(wins) / f64::from(games);
    info!("适应度: {}/{} 胜, 胜率 {:.3}", wins, games, rate);
    rate
}
