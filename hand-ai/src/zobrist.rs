//! Zobrist 哈希
//!
//! 局面键覆盖棋子位置、双方各家族收集数与旗帜、以及行动方，
//! 同一局面无论经由哪条路径到达都得到相同的键

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use rules::{Board, House, Piece, Player, Seat, BOARD_CELLS, HOUSE_COUNT};

/// 单个家族收集数的上限（Stark 8 张）
const MAX_COUNT: usize = 8;

/// Zobrist 哈希表
pub struct ZobristTable {
    /// 人物卡哈希值 [house][position]
    cards: [[u64; BOARD_CELLS]; HOUSE_COUNT],
    /// Varys 哈希值 [position]
    varys: [u64; BOARD_CELLS],
    /// 收集数哈希值 [seat][house][count]
    captured: [[[u64; MAX_COUNT + 1]; HOUSE_COUNT]; 2],
    /// 旗帜哈希值 [seat][house]
    banners: [[u64; HOUSE_COUNT]; 2],
    /// 二号席位行动时的哈希值
    side_to_move: u64,
}

impl ZobristTable {
    /// 创建新的 Zobrist 表（使用固定种子保证确定性）
    pub fn new() -> Self {
        let mut rng = ChaCha8Rng::seed_from_u64(0x4841_4E44_4B49_4E47);

        let mut cards = [[0u64; BOARD_CELLS]; HOUSE_COUNT];
        for house in cards.iter_mut() {
            for key in house.iter_mut() {
                *key = rng.gen();
            }
        }

        let mut varys = [0u64; BOARD_CELLS];
        for key in varys.iter_mut() {
            *key = rng.gen();
        }

        let mut captured = [[[0u64; MAX_COUNT + 1]; HOUSE_COUNT]; 2];
        let mut banners = [[0u64; HOUSE_COUNT]; 2];
        for seat in 0..2 {
            for house in 0..HOUSE_COUNT {
                for key in captured[seat][house].iter_mut() {
                    *key = rng.gen();
                }
                banners[seat][house] = rng.gen();
            }
        }

        Self {
            cards,
            varys,
            captured,
            banners,
            side_to_move: rng.gen(),
        }
    }

    /// 计算完整局面的哈希值
    pub fn hash(&self, board: &Board, a: &Player, b: &Player, to_move: Seat) -> u64 {
        let mut hash = 0u64;

        for (pos, piece) in board.all_pieces() {
            hash ^= match piece {
                Piece::Varys => self.varys[pos.to_index()],
                Piece::Card(card) => self.cards[card.house.index()][pos.to_index()],
            };
        }

        for player in [a, b] {
            hash ^= self.player_hash(player);
        }

        if to_move == Seat::Two {
            hash ^= self.side_to_move;
        }

        hash
    }

    /// 单个玩家的收集数与旗帜哈希值
    fn player_hash(&self, player: &Player) -> u64 {
        let seat = player.seat().index();
        House::ALL.into_iter().fold(0u64, |hash, house| {
            let count = player.captured_count(house).min(MAX_COUNT);
            let mut hash = hash ^ self.captured[seat][house.index()][count];
            if player.banner(house) {
                hash ^= self.banners[seat][house.index()];
            }
            hash
        })
    }
}

impl Default for ZobristTable {
    fn default() -> Self {
        Self::new()
    }
}
