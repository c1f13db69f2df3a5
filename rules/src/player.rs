//! 玩家状态：收集的人物卡与持有的家族旗帜

use serde::{Deserialize, Serialize};

use crate::constants::HOUSE_COUNT;
use crate::piece::{Card, House, Seat};

/// 玩家
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Player {
    seat: Seat,
    /// 按家族分组的已收集人物卡
    captured: [Vec<Card>; HOUSE_COUNT],
    /// 各家族旗帜是否由该玩家持有
    banners: [bool; HOUSE_COUNT],
}

impl Player {
    /// 创建新玩家
    pub fn new(seat: Seat) -> Self {
        Self {
            seat,
            captured: Default::default(),
            banners: [false; HOUSE_COUNT],
        }
    }

    /// 玩家席位
    pub fn seat(&self) -> Seat {
        self.seat
    }

    /// 收集一张人物卡
    pub fn add_card(&mut self, card: Card) {
        self.captured[card.house.index()].push(card);
    }

    /// 指定家族已收集的数量
    pub fn captured_count(&self, house: House) -> usize {
        self.captured[house.index()].len()
    }

    /// 已收集的人物卡总数
    pub fn total_captured(&self) -> usize {
        self.captured.iter().map(Vec::len).sum()
    }

    /// 是否持有指定家族的旗帜
    pub fn banner(&self, house: House) -> bool {
        self.banners[house.index()]
    }

    /// 设置旗帜归属（由旗帜仲裁调用）
    pub fn set_banner(&mut self, house: House, held: bool) {
        self.banners[house.index()] = held;
    }

    /// 持有的旗帜数量
    pub fn banner_count(&self) -> usize {
        self.banners.iter().filter(|&&held| held).count()
    }

    /// 是否已锁定该家族（收集数达到严格多数）
    pub fn has_locked(&self, house: House) -> bool {
        self.captured_count(house) >= house.majority()
    }

    /// 已锁定的家族数量
    pub fn locked_count(&self) -> usize {
        House::ALL.iter().filter(|&&house| self.has_locked(house)).count()
    }

    /// 只读状态快照（供显示层使用）
    pub fn status(&self) -> CardsStatus {
        let mut status = [HouseStatus::default(); HOUSE_COUNT];
        for house in House::ALL {
            status[house.index()] = HouseStatus {
                count: self.captured_count(house),
                banner: self.banner(house),
            };
        }
        status
    }
}

/// 单个家族的显示状态
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HouseStatus {
    /// 已收集数量
    pub count: usize,
    /// 是否持有旗帜
    pub banner: bool,
}

/// 一名玩家全部家族的显示状态（按 `House::ALL` 顺序）
pub type CardsStatus = [HouseStatus; HOUSE_COUNT];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_card_groups_by_house() {
        let mut player = Player::new(Seat::One);
        player.add_card(Card::new(House::Stark, "Arya"));
        player.add_card(Card::new(House::Stark, "Bran"));
        player.add_card(Card::new(House::Tully, "Edmure"));

        assert_eq!(player.captured_count(House::Stark), 2);
        assert_eq!(player.captured_count(House::Tully), 1);
        assert_eq!(player.captured_count(House::Lannister), 0);
        assert_eq!(player.total_captured(), 3);
    }

    #[test]
    fn test_banners() {
        let mut player = Player::new(Seat::Two);
        assert_eq!(player.banner_count(), 0);

        player.set_banner(House::Greyjoy, true);
        player.set_banner(House::Tyrell, true);
        player.set_banner(House::Tyrell, false);

        assert!(player.banner(House::Greyjoy));
        assert!(!player.banner(House::Tyrell));
        assert_eq!(player.banner_count(), 1);
    }

    #[test]
    fn test_locked() {
        let mut player = Player::new(Seat::One);
        player.add_card(Card::new(House::Tully, "Edmure"));
        assert!(!player.has_locked(House::Tully));

        player.add_card(Card::new(House::Tully, "Brynden"));
        assert!(player.has_locked(House::Tully));
        assert_eq!(player.locked_count(), 1);
    }

    #[test]
    fn test_status_snapshot() {
        let mut player = Player::new(Seat::One);
        player.add_card(Card::new(House::Baratheon, "Renly"));
        player.set_banner(House::Baratheon, true);

        let status = player.status();
        assert_eq!(status[House::Baratheon.index()], HouseStatus { count: 1, banner: true });
        assert_eq!(status[House::Stark.index()], HouseStatus::default());
    }
}
