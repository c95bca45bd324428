//! What landing on each kind of site earns a player.

use crate::deck::Deck;
use shared::{Game, PlayerId, SiteKind, Transition};

/// Money gained on a `Mo` site.
pub const MONEY_SITE_BONUS: i64 = 3;

/// Builds the state-update for `player` landing on `site`. The move itself
/// must already have been checked.
pub fn resolve(game: &Game, deck: &Deck, player: PlayerId, site: usize) -> Transition {
    let money = game.player(player).map_or(0, |p| p.money);
    let mut transition = Transition {
        player,
        site,
        points: 0,
        money: 0,
        card: None,
    };

    match game.path().site(site).map(|s| s.kind()) {
        Some(SiteKind::Money) => transition.money = MONEY_SITE_BONUS,
        Some(SiteKind::Discard) => {
            // Negative balances convert to nothing
            transition.points = (money / 2).max(0);
            transition.money = -money;
        }
        Some(SiteKind::Draw) => transition.card = deck.card_at(game.cards_drawn()),
        _ => {}
    }
    transition
}
