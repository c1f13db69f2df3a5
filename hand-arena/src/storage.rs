//! 牌局存储
//!
//! 把初始牌面保存为 JSON 文件，便于复现对局

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use rules::Board;

/// 牌局存储管理器
pub struct BoardStorage {
    boards_dir: PathBuf,
}

impl BoardStorage {
    /// 使用系统数据目录创建存储管理器
    pub fn new() -> Result<Self> {
        Self::with_dir(get_boards_directory()?)
    }

    /// 使用指定目录创建存储管理器
    pub fn with_dir(boards_dir: PathBuf) -> Result<Self> {
        if !boards_dir.exists() {
            fs::create_dir_all(&boards_dir)
                .with_context(|| format!("无法创建存储目录: {:?}", boards_dir))?;
        }

        Ok(Self { boards_dir })
    }

    /// 保存牌面，返回牌局 ID（文件名）
    ///
    /// 未指定名称时以保存时间命名
    pub fn save_board(&self, board: &Board, name: Option<&str>) -> Result<String> {
        let filename = match name {
            Some(name) => format!("{}.json", sanitize_filename(name)),
            None => generate_filename(&Utc::now()),
        };
        let filepath = self.boards_dir.join(&filename);

        let json_content = board.to_json().context("序列化牌面失败")?;
        fs::write(&filepath, json_content)
            .with_context(|| format!("写入文件失败: {:?}", filepath))?;

        tracing::info!("牌面已保存: {}", filename);
        Ok(filename)
    }

    /// 加载牌面
    pub fn load_board(&self, board_id: &str) -> Result<Board> {
        let filepath = self.resolve(board_id);

        if !filepath.exists() {
            anyhow::bail!("牌局文件不存在: {}", board_id);
        }

        let content = fs::read_to_string(&filepath)
            .with_context(|| format!("读取文件失败: {:?}", filepath))?;

        Board::from_json(&content).context("解析牌局文件失败")
    }

    /// 列出所有保存的牌局，按保存时间倒序
    pub fn list_boards(&self) -> Result<Vec<SavedBoardInfo>> {
        let mut boards = Vec::new();

        if !self.boards_dir.exists() {
            return Ok(boards);
        }

        let entries = fs::read_dir(&self.boards_dir)
            .with_context(|| format!("读取存储目录失败: {:?}", self.boards_dir))?;

        for entry in entries {
            let entry = entry.context("读取目录项失败")?;
            let path = entry.path();

            if path.extension().and_then(|s| s.to_str()) != Some("json") {
                continue;
            }
            let Some(filename) = path.file_name().and_then(|s| s.to_str()) else {
                continue;
            };

            // 跳过损坏的文件
            let Ok(board) = self.load_board(filename) else {
                tracing::debug!("跳过无法解析的牌局文件: {}", filename);
                continue;
            };

            let saved_at = entry
                .metadata()
                .and_then(|m| m.modified())
                .map(DateTime::from)
                .unwrap_or_else(|_| Utc::now());

            boards.push(SavedBoardInfo {
                board_id: filename.to_string(),
                saved_at,
                cards: board.card_count(),
            });
        }

        boards.sort_by(|a, b| b.saved_at.cmp(&a.saved_at));
        Ok(boards)
    }

    /// 删除保存的牌局
    pub fn delete_board(&self, board_id: &str) -> Result<()> {
        let filepath = self.resolve(board_id);

        if filepath.exists() {
            fs::remove_file(&filepath)
                .with_context(|| format!("删除文件失败: {:?}", filepath))?;
        }

        Ok(())
    }

    /// 获取存储目录路径
    pub fn boards_directory(&self) -> &Path {
        &self.boards_dir
    }

    /// 牌局 ID 可省略 `.json` 后缀
    fn resolve(&self, board_id: &str) -> PathBuf {
        if board_id.ends_with(".json") {
            self.boards_dir.join(board_id)
        } else {
            self.boards_dir.join(format!("{}.json", board_id))
        }
    }
}

/// 保存的牌局信息
#[derive(Debug, Clone)]
pub struct SavedBoardInfo {
    /// 牌局 ID（文件名）
    pub board_id: String,
    /// 保存时间
    pub saved_at: DateTime<Utc>,
    /// 牌面上的人物卡数
    pub cards: usize,
}

/// 获取跨平台存储目录
fn get_boards_directory() -> Result<PathBuf> {
    let app_data_dir = dirs::data_dir().context("无法获取应用数据目录")?;

    Ok(app_data_dir.join("hand-of-the-king").join("boards"))
}

/// 生成文件名
fn generate_filename(timestamp: &DateTime<Utc>) -> String {
    format!("board_{}.json", timestamp.format("%Y%m%d_%H%M%S%3f"))
}

/// 清理文件名中的特殊字符
fn sanitize_filename(name: &str) -> String {
    name.chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect::<String>()
        .trim()
        .to_string()
}
