//! End-of-game scoring.

use crate::game::{Game, Player};
use crate::CARD_TYPES;

/// Points for one set of `distinct` different card types. A complete set of
/// all types is worth 10.
pub fn set_value(distinct: usize) -> i64 {
    if distinct == CARD_TYPES {
        10
    } else {
        2 * distinct as i64 - 1
    }
}

/// Card bonus for a hand: peel off the largest set of distinct types while
/// at least two types remain, then count leftover cards one point each.
pub fn card_bonus(cards: &[u32; CARD_TYPES]) -> i64 {
    let mut remaining = *cards;
    let mut bonus = 0;

    loop {
        let distinct = remaining.iter().filter(|&&count| count > 0).count();
        if distinct < 2 {
            return bonus + remaining.iter().map(|&count| i64::from(count)).sum::<i64>();
        }
        bonus += set_value(distinct);
        for count in remaining.iter_mut().filter(|count| **count > 0) {
            *count -= 1;
        }
    }
}

impl Player {
    /// Points plus scenic visits plus the card bonus.
    pub fn final_score(&self) -> i64 {
        self.points + i64::from(self.v1_visits) + i64::from(self.v2_visits) + card_bonus(&self.cards)
    }
}

impl Game {
    /// Final score of every player, in id order.
    pub fn final_scores(&self) -> Vec<i64> {
        self.players.iter().map(Player::final_score).collect()
    }
}
