//! 对局配置
//!
//! JSON 格式；文件缺失或格式错误时回退到默认配置

use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use hand_ai::{AiConfig, Difficulty, EvalWeights};
use rules::Seat;
use serde::{Deserialize, Serialize};

use crate::agent::{Agent, MinimaxAgent, RandomAgent};

/// 默认单步时间预算（毫秒）
pub const DEFAULT_TIME_LIMIT_MS: u64 = 10_000;

/// 默认回合上限
pub const DEFAULT_MAX_TURNS: u32 = 200;

/// 代理类型
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AgentKind {
    /// Minimax 搜索
    Minimax {
        #[serde(default)]
        difficulty: Difficulty,
        /// 覆盖难度对应的搜索深度
        #[serde(default)]
        depth: Option<u8>,
        #[serde(default)]
        weights: EvalWeights,
    },
    /// 均匀随机选择合法动作
    Random,
}

impl AgentKind {
    /// 指定深度的 Minimax 代理
    pub fn minimax(depth: u8) -> Self {
        AgentKind::Minimax {
            difficulty: Difficulty::default(),
            depth: Some(depth),
            weights: EvalWeights::default(),
        }
    }

    /// 对应的搜索配置（随机代理为 None）
    pub fn ai_config(&self) -> Option<AiConfig> {
        match self {
            AgentKind::Minimax {
                difficulty,
                depth,
                weights,
            } => {
                let config = AiConfig::from_difficulty(*difficulty).with_weights(*weights);
                Some(match depth {
                    Some(depth) => config.with_depth(*depth),
                    None => config,
                })
            }
            AgentKind::Random => None,
        }
    }

    /// 创建代理
    pub fn build(&self, seed: u64) -> Arc<dyn Agent> {
        match self.ai_config() {
            Some(config) => Arc::new(MinimaxAgent::new(config)),
            None => Arc::new(RandomAgent::new(seed)),
        }
    }
}

/// 超时处理策略
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimeoutPolicy {
    /// 放弃本回合
    Forfeit,
    /// 改用随机合法动作
    #[default]
    RandomAction,
}

/// 对局配置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ArenaConfig {
    pub player1: AgentKind,
    pub player2: AgentKind,
    /// 单步时间预算（毫秒）
    pub time_limit_ms: u64,
    pub timeout_policy: TimeoutPolicy,
    /// 发牌与随机代理的种子；None 时每次运行随机
    pub seed: Option<u64>,
    /// 回合上限（防止代理反复放弃导致死循环）
    pub max_turns: u32,
}

impl Default for ArenaConfig {
    fn default() -> Self {
        Self {
            player1: AgentKind::Minimax {
                difficulty: Difficulty::Medium,
                depth: None,
                weights: EvalWeights::default(),
            },
            player2: AgentKind::Random,
            time_limit_ms: DEFAULT_TIME_LIMIT_MS,
            timeout_policy: TimeoutPolicy::default(),
            seed: None,
            max_turns: DEFAULT_MAX_TURNS,
        }
    }
}

impl ArenaConfig {
    /// 指定席位的代理类型
    pub fn agent(&self, seat: Seat) -> &AgentKind {
        match seat {
            Seat::One => &self.player1,
            Seat::Two => &self.player2,
        }
    }

    /// 从文件加载配置
    pub fn load(path: &Path) -> Self {
        if !path.exists() {
            tracing::info!("配置文件不存在: {:?}，使用默认配置", path);
            return Self::default();
        }

        match std::fs::read_to_string(path) {
            Ok(content) => match serde_json::from_str(&content) {
                Ok(config) => {
                    tracing::info!("已加载配置: {:?}", path);
                    config
                }
                Err(e) => {
                    tracing::warn!("配置文件格式无效: {}，使用默认配置", e);
                    Self::default()
                }
            },
            Err(e) => {
                tracing::warn!("无法读取配置文件: {}，使用默认配置", e);
                Self::default()
            }
        }
    }

    /// 保存配置到文件
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("无法创建配置目录: {:?}", parent))?;
        }

        let content = serde_json::to_string_pretty(self).context("序列化配置失败")?;
        std::fs::write(path, content).with_context(|| format!("写入配置文件失败: {:?}", path))?;

        tracing::info!("配置已保存: {:?}", path);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_save_and_load() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("arena.json");

        let config = ArenaConfig {
            player2: AgentKind::minimax(2),
            time_limit_ms: 500,
            timeout_policy: TimeoutPolicy::Forfeit,
            seed: Some(99),
            ..ArenaConfig::default()
        };
        config.save(&path).unwrap();

        assert_eq!(ArenaConfig::load(&path), config);
    }

    #[test]
    fn test_missing_file_falls_back() {
        let dir = TempDir::new().unwrap();
        let config = ArenaConfig::load(&dir.path().join("missing.json"));
        assert_eq!(config, ArenaConfig::default());
    }

    #[test]
    fn test_invalid_file_falls_back() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("broken.json");
        std::fs::write(&path, "{ not json").unwrap();
        assert_eq!(ArenaConfig::load(&path), ArenaConfig::default());
    }

    #[test]
    fn test_partial_config() {
        let config: ArenaConfig = serde_json::from_str(
            r#"{"player1": {"kind": "minimax", "difficulty": "Hard"}, "time_limit_ms": 250}"#,
        )
        .unwrap();

        assert_eq!(config.time_limit_ms, 250);
        assert_eq!(config.player2, AgentKind::Random);
        assert_eq!(config.max_turns, DEFAULT_MAX_TURNS);
        assert_eq!(config.player1.ai_config().unwrap().max_depth, 5);
    }

    #[test]
    fn test_depth_overrides_difficulty() {
        let kind = AgentKind::Minimax {
            difficulty: Difficulty::Hard,
            depth: Some(2),
            weights: EvalWeights::default(),
        };
        assert_eq!(kind.ai_config().unwrap().max_depth, 2);
        assert!(AgentKind::Random.ai_config().is_none());
    }
}
