//! 旗帜仲裁与胜负判定

use std::cmp::Ordering;

use crate::piece::{House, Seat};
use crate::player::{CardsStatus, Player};

/// 旗帜仲裁器
pub struct BannerArbiter;

impl BannerArbiter {
    /// 一次收集之后重新计算所有家族的旗帜归属
    ///
    /// - 收集数严格更多的一方持有旗帜
    /// - 数量相等时，刚被收集的家族归本次收集者；
    ///   其他家族维持原持有者（没有新的收集就不易主）
    /// - 双方均为零且从未争夺过的家族无人持有
    ///
    /// `player1` 必须是一号席位。返回双方的显示状态 `(player1, player2)`
    pub fn update_banners(
        player1: &mut Player,
        player2: &mut Player,
        captured_house: House,
        capturing: Seat,
    ) -> (CardsStatus, CardsStatus) {
        for house in House::ALL {
            let holder = match player1
                .captured_count(house)
                .cmp(&player2.captured_count(house))
            {
                Ordering::Greater => Some(Seat::One),
                Ordering::Less => Some(Seat::Two),
                Ordering::Equal if house == captured_house => Some(capturing),
                Ordering::Equal => Self::holder(player1, player2, house),
            };

            player1.set_banner(house, holder == Some(Seat::One));
            player2.set_banner(house, holder == Some(Seat::Two));
        }

        (player1.status(), player2.status())
    }

    /// 不要求参数顺序的 `update_banners`：按席位排好双方后再仲裁
    ///
    /// 搜索中双方以 (行动方, 对手) 的顺序出现，用这个入口即可
    pub fn arbitrate(a: &mut Player, b: &mut Player, captured_house: House, capturing: Seat) {
        if a.seat() == Seat::One {
            Self::update_banners(a, b, captured_house, capturing);
        } else {
            Self::update_banners(b, a, captured_house, capturing);
        }
    }

    /// 不要求参数顺序的 `calculate_winner`
    pub fn winner_of(a: &Player, b: &Player) -> Option<Seat> {
        if a.seat() == Seat::One {
            Self::calculate_winner(a, b)
        } else {
            Self::calculate_winner(b, a)
        }
    }

    /// 当前持有指定家族旗帜的席位
    pub fn holder(player1: &Player, player2: &Player, house: House) -> Option<Seat> {
        if player1.banner(house) {
            Some(Seat::One)
        } else if player2.banner(house) {
            Some(Seat::Two)
        } else {
            None
        }
    }

    /// 判定胜者
    ///
    /// 旗帜总数多者胜；平局时按 Stark > Greyjoy > Lannister > Targaryen >
    /// Baratheon > Tyrell > Tully 的顺序，由先持有该家族旗帜的一方获胜。
    /// 双方都没有任何旗帜时返回 None。
    pub fn calculate_winner(player1: &Player, player2: &Player) -> Option<Seat> {
        match player1.banner_count().cmp(&player2.banner_count()) {
            Ordering::Greater => Some(Seat::One),
            Ordering::Less => Some(Seat::Two),
            Ordering::Equal => House::ALL
                .into_iter()
                .find_map(|house| Self::holder(player1, player2, house)),
        }
    }
}
