//! 棋盘存档格式
//!
//! 棋盘保存为 `{house, name, location}` 记录列表（JSON），
//! Varys 的家族名与名字都记为 `"Varys"`。

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::board::Board;
use crate::constants::VARYS_NAME;
use crate::error::{GameError, Result};
use crate::piece::{House, Piece, Position};
use crate::roster;

/// 单个棋子的存档记录
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardRecord {
    pub house: String,
    pub name: String,
    /// 位置索引 `y * 6 + x`，读入时按任意整数解析，越界由 `from_records` 拒绝
    pub location: i64,
}

impl CardRecord {
    /// 从棋盘上的棋子创建记录
    pub fn new(pos: Position, piece: Piece) -> Self {
        let house = match piece {
            Piece::Varys => VARYS_NAME,
            Piece::Card(card) => card.house.name(),
        };
        Self {
            house: house.to_string(),
            name: piece.name().to_string(),
            location: pos.to_index() as i64,
        }
    }

    /// 解析为棋子（名册中不存在时报错）
    pub fn piece(&self) -> std::result::Result<Piece, GameError> {
        if self.house == VARYS_NAME {
            return if self.name == VARYS_NAME {
                Ok(Piece::Varys)
            } else {
                Err(malformed(format!("unknown Varys entry {:?}", self.name)))
            };
        }

        House::from_name(&self.house)
            .and_then(|house| roster::lookup(house, &self.name))
            .map(Piece::Card)
            .ok_or_else(|| malformed(format!("unknown card {}/{}", self.house, self.name)))
    }
}

fn malformed(reason: String) -> GameError {
    GameError::MalformedRoster { reason }
}

impl Board {
    /// 从存档记录恢复棋盘
    ///
    /// 拒绝名册外的卡、重复的卡、重复或越界的位置，以及缺失或重复的 Varys
    pub fn from_records(records: &[CardRecord]) -> std::result::Result<Board, GameError> {
        let mut board = Board::empty();
        let mut seen = HashSet::new();
        let mut varys_count = 0;

        for record in records {
            let piece = record.piece()?;
            let pos = usize::try_from(record.location)
                .ok()
                .and_then(Position::from_index)
                .ok_or_else(|| malformed(format!("location {} is off the board", record.location)))?;

            if board.get(pos).is_some() {
                return Err(malformed(format!("location {} is used twice", record.location)));
            }
            if !seen.insert((record.house.as_str(), record.name.as_str())) {
                return Err(malformed(format!("{} appears twice", record.name)));
            }
            if piece.is_varys() {
                varys_count += 1;
            }

            board.set(pos, Some(piece));
        }

        if varys_count != 1 {
            return Err(malformed(format!("expected exactly one Varys, found {}", varys_count)));
        }
        Ok(board)
    }

    /// 导出为存档记录（按位置索引升序）
    pub fn to_records(&self) -> Vec<CardRecord> {
        self.all_pieces()
            .map(|(pos, piece)| CardRecord::new(pos, piece))
            .collect()
    }

    /// 导出为 JSON
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(&self.to_records())?)
    }

    /// 从 JSON 恢复
    pub fn from_json(json: &str) -> Result<Board> {
        let records: Vec<CardRecord> = serde_json::from_str(json)?;
        Ok(Board::from_records(&records)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::RecordError;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn record(house: &str, name: &str, location: i64) -> CardRecord {
        CardRecord {
            house: house.to_string(),
            name: name.to_string(),
            location,
        }
    }

    #[test]
    fn test_dealt_board_survives_json() {
        let board = Board::deal(&mut ChaCha8Rng::seed_from_u64(9));
        let json = board.to_json().unwrap();
        let restored = Board::from_json(&json).unwrap();
        assert_eq!(board, restored);
    }

    #[test]
    fn test_varys_record_format() {
        let mut board = Board::empty();
        board.set(Position::new_unchecked(2, 1), Some(Piece::Varys));
        let records = board.to_records();
        assert_eq!(records, vec![record("Varys", "Varys", 8)]);
    }

    #[test]
    fn test_partial_board_loads() {
        let records = vec![
            record("Varys", "Varys", 0),
            record("Stark", "Arya", 5),
            record("Tully", "Edmure", 30),
        ];
        let board = Board::from_records(&records).unwrap();
        assert_eq!(board.card_count(), 2);
        assert_eq!(board.varys(), Some(Position::new_unchecked(0, 0)));
    }

    #[test]
    fn test_unknown_card_rejected() {
        let records = vec![record("Varys", "Varys", 0), record("Stark", "Tyrion", 1)];
        assert!(matches!(
            Board::from_records(&records),
            Err(GameError::MalformedRoster { .. })
        ));
    }

    #[test]
    fn test_duplicates_rejected() {
        let same_card = vec![
            record("Varys", "Varys", 0),
            record("Stark", "Arya", 1),
            record("Stark", "Arya", 2),
        ];
        assert!(Board::from_records(&same_card).is_err());

        let same_location = vec![
            record("Varys", "Varys", 0),
            record("Stark", "Arya", 1),
            record("Stark", "Bran", 1),
        ];
        assert!(Board::from_records(&same_location).is_err());
    }

    #[test]
    fn test_varys_count_and_bounds() {
        let missing = vec![record("Stark", "Arya", 1)];
        assert!(Board::from_records(&missing).is_err());

        let two = vec![record("Varys", "Varys", 0), record("Varys", "Varys", 3)];
        assert!(Board::from_records(&two).is_err());

        let off_board = vec![record("Varys", "Varys", 36)];
        assert!(Board::from_records(&off_board).is_err());
    }

    #[test]
    fn test_out_of_range_location_is_malformed() {
        for json in [
            r#"[{"house":"Varys","name":"Varys","location":300}]"#,
            r#"[{"house":"Varys","name":"Varys","location":-1}]"#,
            r#"[{"house":"Varys","name":"Varys","location":36}]"#,
        ] {
            assert!(
                matches!(
                    Board::from_json(json),
                    Err(RecordError::Game(GameError::MalformedRoster { .. }))
                ),
                "{json}"
            );
        }
    }

    #[test]
    fn test_bad_json() {
        assert!(matches!(Board::from_json("not json"), Err(RecordError::Json(_))));
    }
}
