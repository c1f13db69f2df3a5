//! 对局控制
//!
//! 轮流向两个代理请求动作，每次请求都放到阻塞线程池中执行并受时间预算约束。
//! 代理超时按配置的策略处理，返回非法动作则本回合作废。

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use rules::{Action, GameState, Seat};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::agent::{Agent, RandomAgent, StopFlag};
use crate::config::{ArenaConfig, TimeoutPolicy};
use crate::error::ArenaError;

/// 对局结果
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchOutcome {
    /// 胜者；双方都没有旗帜时为 None
    pub winner: Option<Seat>,
    /// 双方旗帜数 `[player1, player2]`
    pub banners: [usize; 2],
    /// 双方收集的人物卡数
    pub captured: [usize; 2],
    /// 总回合数
    pub turns: u32,
    /// 双方放弃的回合数（超时、非法动作、无动作）
    pub forfeits: [u32; 2],
    /// 双方超时次数
    pub timeouts: [u32; 2],
}

/// 单局对局
pub struct Match {
    state: GameState,
    agents: [Arc<dyn Agent>; 2],
    time_limit: Duration,
    timeout_policy: TimeoutPolicy,
    max_turns: u32,
    /// 超时后的随机兜底
    fallback: RandomAgent,
    forfeits: [u32; 2],
    timeouts: [u32; 2],
}

impl Match {
    /// 创建对局
    pub fn new(state: GameState, agents: [Arc<dyn Agent>; 2], config: &ArenaConfig) -> Self {
        Self {
            state,
            agents,
            time_limit: Duration::from_millis(config.time_limit_ms),
            timeout_policy: config.timeout_policy,
            max_turns: config.max_turns,
            fallback: RandomAgent::new(config.seed.unwrap_or_default()),
            forfeits: [0; 2],
            timeouts: [0; 2],
        }
    }

    /// 当前对局状态
    pub fn state(&self) -> &GameState {
        &self.state
    }

    /// 进行对局直到终局或达到回合上限
    pub async fn play(mut self) -> MatchOutcome {
        info!(
            "对局开始: {} vs {}",
            self.agents[0].name(),
            self.agents[1].name()
        );

        while !self.state.is_over() {
            if self.state.turns >= self.max_turns {
                warn!("达到回合上限 {}，提前结束对局", self.max_turns);
                break;
            }
            self.play_turn().await;
        }

        let outcome = self.outcome();
        info!(
            "对局结束: winner={:?} banners={:?} turns={}",
            outcome.winner, outcome.banners, outcome.turns
        );
        outcome
    }

    /// 进行一个回合（吃子或待定的随从动作）
    async fn play_turn(&mut self) {
        let seat = self.state.current_turn;
        let companion = self.state.companion_due();
        let started = Instant::now();

        let action = match self.request(seat, companion).await {
            Ok(action) => action,
            Err(ArenaError::SearchBudgetExceeded { seat, budget_ms }) => {
                self.timeouts[seat.index()] += 1;
                warn!(
                    "{} 超出时间预算 {}ms，按 {:?} 处理",
                    seat, budget_ms, self.timeout_policy
                );
                match self.timeout_policy {
                    TimeoutPolicy::Forfeit => None,
                    TimeoutPolicy::RandomAction => self.fallback_action(companion),
                }
            }
            Err(e) => {
                warn!("{} 的代理出错: {}", seat, e);
                None
            }
        };

        let Some(action) = action else {
            self.forfeit(seat, "no action");
            return;
        };

        match self.apply(&action) {
            Ok(()) => info!(
                turn = self.state.turns,
                elapsed_ms = started.elapsed().as_millis() as u64,
                "{}: {}",
                seat,
                action
            ),
            Err(e) => {
                warn!("{} 给出非法动作 {}: {}", seat, action, e);
                self.forfeit(seat, "illegal action");
            }
        }
    }

    /// 在阻塞线程池中向代理请求动作，受时间预算约束
    ///
    /// 超时后置位停止信号，代理的后台计算尽快结束，结果被丢弃
    async fn request(&self, seat: Seat, companion: bool) -> Result<Option<Action>, ArenaError> {
        let agent = Arc::clone(&self.agents[seat.index()]);
        let state = self.state.clone();
        let stop: StopFlag = Arc::new(AtomicBool::new(false));
        let task_stop = Arc::clone(&stop);

        let task = tokio::task::spawn_blocking(move || {
            request_action(agent.as_ref(), &state, companion, &task_stop)
        });

        match tokio::time::timeout(self.time_limit, task).await {
            Ok(Ok(action)) => Ok(action),
            Ok(Err(_)) => Err(ArenaError::AgentPanicked { seat }),
            Err(_) => {
                stop.store(true, Ordering::Relaxed);
                Err(ArenaError::SearchBudgetExceeded {
                    seat,
                    budget_ms: self.time_limit.as_millis() as u64,
                })
            }
        }
    }

    fn fallback_action(&self, companion: bool) -> Option<Action> {
        let stop: StopFlag = Arc::new(AtomicBool::new(false));
        request_action(&self.fallback, &self.state, companion, &stop)
    }

    fn apply(&mut self, action: &Action) -> Result<(), ArenaError> {
        self.state.apply_action(action)?;
        Ok(())
    }

    fn forfeit(&mut self, seat: Seat, reason: &str) {
        warn!("{} 放弃本回合 ({})", seat, reason);
        self.forfeits[seat.index()] += 1;
        self.state.pass_turn();
    }

    fn outcome(&self) -> MatchOutcome {
        let [p1, p2] = &self.state.players;
        MatchOutcome {
            winner: self.state.winner(),
            banners: [p1.banner_count(), p2.banner_count()],
            captured: [p1.total_captured(), p2.total_captured()],
            turns: self.state.turns,
            forfeits: self.forfeits,
            timeouts: self.timeouts,
        }
    }
}

/// 按是否等待随从动作向代理请求对应的动作
fn request_action(
    agent: &dyn Agent,
    state: &GameState,
    companion: bool,
    stop: &StopFlag,
) -> Option<Action> {
    if companion {
        agent.choose_companion(state, stop).map(Action::Companion)
    } else {
        agent.choose_action(state, stop)
    }
}
