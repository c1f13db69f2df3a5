//! 静态人物名册
//!
//! 每局发牌都使用同一份名册：35 张人物卡加上 Varys

use crate::constants::CARD_COUNT;
use crate::piece::{Card, House};

/// 名册（按家族分组，家族顺序同 `House::ALL`）
pub const ROSTER: [Card; CARD_COUNT] = [
    Card::new(House::Stark, "Eddard"),
    Card::new(House::Stark, "Catelyn"),
    Card::new(House::Stark, "Robb"),
    Card::new(House::Stark, "Sansa"),
    Card::new(House::Stark, "Arya"),
    Card::new(House::Stark, "Bran"),
    Card::new(House::Stark, "Rickon"),
    Card::new(House::Stark, "Lyanna"),
    Card::new(House::Greyjoy, "Balon"),
    Card::new(House::Greyjoy, "Euron"),
    Card::new(House::Greyjoy, "Theon"),
    Card::new(House::Greyjoy, "Yara"),
    Card::new(House::Greyjoy, "Victarion"),
    Card::new(House::Greyjoy, "Aeron"),
    Card::new(House::Greyjoy, "Alannys"),
    Card::new(House::Lannister, "Tywin"),
    Card::new(House::Lannister, "Cersei"),
    Card::new(House::Lannister, "Jaime"),
    Card::new(House::Lannister, "Tyrion"),
    Card::new(House::Lannister, "Joffrey"),
    Card::new(House::Lannister, "Kevan"),
    Card::new(House::Targaryen, "Daenerys"),
    Card::new(House::Targaryen, "Viserys"),
    Card::new(House::Targaryen, "Rhaegar"),
    Card::new(House::Targaryen, "Aerys"),
    Card::new(House::Targaryen, "Aegon"),
    Card::new(House::Baratheon, "Robert"),
    Card::new(House::Baratheon, "Stannis"),
    Card::new(House::Baratheon, "Renly"),
    Card::new(House::Baratheon, "Shireen"),
    Card::new(House::Tyrell, "Olenna"),
    Card::new(House::Tyrell, "Margaery"),
    Card::new(House::Tyrell, "Loras"),
    Card::new(House::Tully, "Edmure"),
    Card::new(House::Tully, "Brynden"),
];

/// 按 (家族, 名字) 在名册中查找人物卡
pub fn lookup(house: House, name: &str) -> Option<Card> {
    ROSTER
        .iter()
        .find(|card| card.house == house && card.name == name)
        .copied()
}

/// 指定家族的全部人物卡
pub fn members(house: House) -> impl Iterator<Item = Card> {
    ROSTER.into_iter().filter(move |card| card.house == house)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_roster_matches_member_counts() {
        for house in House::ALL {
            assert_eq!(members(house).count(), house.member_count(), "{house}");
        }
    }

    #[test]
    fn test_roster_names_unique() {
        let names: HashSet<_> = ROSTER.iter().map(|c| c.name).collect();
        assert_eq!(names.len(), CARD_COUNT);
    }

    #[test]
    fn test_lookup() {
        assert_eq!(lookup(House::Stark, "Arya"), Some(Card::new(House::Stark, "Arya")));
        // 名字存在但家族不对
        assert_eq!(lookup(House::Lannister, "Arya"), None);
        assert_eq!(lookup(House::Tully, "Hodor"), None);
    }
}
