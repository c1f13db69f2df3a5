use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use hand_arena::{AgentKind, ArenaConfig, BoardStorage, Match, MatchOutcome};
use hand_ai::{Difficulty, EvalWeights};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use rules::{Board, GameState, Seat};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// 代理类型（命令行）
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum AgentChoice {
    Minimax,
    Random,
}

/// Hand of the King 对局平台
#[derive(Debug, Parser)]
#[command(name = "hand-arena", version, about = "Pit two Hand of the King agents against each other")]
struct Cli {
    /// 先手代理
    #[arg(long, value_enum)]
    player1: Option<AgentChoice>,

    /// 后手代理
    #[arg(long, value_enum)]
    player2: Option<AgentChoice>,

    /// Minimax 搜索深度
    #[arg(long)]
    depth: Option<u8>,

    /// 初始牌面（文件路径或已保存的牌局 ID）
    #[arg(long, value_name = "BOARD")]
    load: Option<String>,

    /// 保存初始牌面
    #[arg(long, value_name = "BOARD")]
    save: Option<String>,

    /// 配置文件
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// 随机种子
    #[arg(long)]
    seed: Option<u64>,

    /// 对局盘数
    #[arg(long, default_value_t = 1)]
    games: u32,

    /// 单步时间预算（毫秒）
    #[arg(long)]
    time_limit_ms: Option<u64>,
}

impl Cli {
    /// 命令行参数覆盖配置文件
    fn merge_into(&self, mut config: ArenaConfig) -> ArenaConfig {
        if let Some(choice) = self.player1 {
            config.player1 = agent_kind(choice, &config.player1);
        }
        if let Some(choice) = self.player2 {
            config.player2 = agent_kind(choice, &config.player2);
        }
        if let Some(depth) = self.depth {
            for kind in [&mut config.player1, &mut config.player2] {
                if let AgentKind::Minimax { depth: d, .. } = kind {
                    *d = Some(depth);
                }
            }
        }
        if let Some(seed) = self.seed {
            config.seed = Some(seed);
        }
        if let Some(time_limit_ms) = self.time_limit_ms {
            config.time_limit_ms = time_limit_ms;
        }
        config
    }
}

/// 保留配置文件中已有的 Minimax 参数
fn agent_kind(choice: AgentChoice, current: &AgentKind) -> AgentKind {
    match (choice, current) {
        (AgentChoice::Minimax, AgentKind::Minimax { .. }) => current.clone(),
        (AgentChoice::Minimax, AgentKind::Random) => AgentKind::Minimax {
            difficulty: Difficulty::default(),
            depth: None,
            weights: EvalWeights::default(),
        },
        (AgentChoice::Random, _) => AgentKind::Random,
    }
}

/// 加载牌面：先按文件路径，再按已保存的牌局 ID
fn load_board(source: &str) -> Result<Board> {
    let path = Path::new(source);
    if path.is_file() {
        let content =
            std::fs::read_to_string(path).with_context(|| format!("读取文件失败: {:?}", path))?;
        return Board::from_json(&content).context("解析牌局文件失败");
    }

    BoardStorage::new()?.load_board(source)
}

#[tokio::main]
async fn main() -> Result<()> {
    // 初始化日志
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("hand_arena=info")),
        )
        .init();

    let cli = Cli::parse();

    let base = match &cli.config {
        Some(path) => ArenaConfig::load(path),
        None => ArenaConfig::default(),
    };
    let config = cli.merge_into(base);
    let seed = config.seed.unwrap_or_else(rand::random);
    info!("对局平台启动: {} 盘, 种子 {}", cli.games, seed);

    let loaded = cli.load.as_deref().map(load_board).transpose()?;

    let mut outcomes: Vec<MatchOutcome> = Vec::with_capacity(cli.games as usize);
    for game in 0..cli.games {
        let game_seed = seed.wrapping_add(u64::from(game));
        let board = match &loaded {
            Some(board) => board.clone(),
            None => Board::deal(&mut ChaCha8Rng::seed_from_u64(game_seed)),
        };

        if game == 0 {
            if let Some(name) = &cli.save {
                let storage = BoardStorage::new()?;
                let board_id = storage.save_board(&board, Some(name))?;
                info!(
                    "初始牌面已保存为 {} ({:?})",
                    board_id,
                    storage.boards_directory()
                );
            }
        }

        let agents = [
            config.agent(Seat::One).build(game_seed),
            config.agent(Seat::Two).build(game_seed.wrapping_add(1)),
        ];
        let game_config = ArenaConfig {
            seed: Some(game_seed),
            ..config.clone()
        };
        let outcome = Match::new(GameState::from_board(board), agents, &game_config)
            .play()
            .await;
        outcomes.push(outcome);
    }

    let wins = |seat: Seat| outcomes.iter().filter(|o| o.winner == Some(seat)).count();
    info!(
        "全部对局结束: player1 {} 胜, player2 {} 胜",
        wins(Seat::One),
        wins(Seat::Two)
    );

    println!(
        "{}",
        serde_json::to_string_pretty(&outcomes).context("序列化对局结果失败")?
    );
    Ok(())
}
