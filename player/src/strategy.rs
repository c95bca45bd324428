//! Move selection.
//!
//! A strategy only ever reads the game; every site it picks is a legal move
//! for the player it plays for, or it returns `None` when there is none.

use shared::{Game, PlayerId, SiteKind};

pub trait Strategy {
    /// Picks the site `me` should move to next.
    fn choose(&self, game: &Game, me: PlayerId) -> Option<usize>;
}

/// Player type A: spends money as soon as it can, otherwise picks up money
/// next door or heads for scenery.
#[derive(Debug, Default, Clone, Copy)]
pub struct Spender;

impl Strategy for Spender {
    fn choose(&self, game: &Game, me: PlayerId) -> Option<usize> {
        let player = game.player(me)?;
        let next = player.site + 1;

        if player.money > 0 {
            if let Some(site) = game.first_site_of_kind(me, SiteKind::Discard) {
                return Some(site);
            }
        }

        let next_is_money = game.path().site(next).map(|s| s.kind()) == Some(SiteKind::Money);
        if next_is_money && game.can_move(me, next) {
            return Some(next);
        }

        reachable(game, me).find(|&site| {
            matches!(
                game.path().site(site).map(|s| s.kind()),
                Some(SiteKind::Scenic1 | SiteKind::Scenic2 | SiteKind::Barrier)
            )
        })
    }
}

/// Player type B: hangs back while everyone else is ahead, evens out its
/// money, collects cards while it leads in them, and otherwise favours `V2`.
#[derive(Debug, Default, Clone, Copy)]
pub struct Collector;

impl Strategy for Collector {
    fn choose(&self, game: &Game, me: PlayerId) -> Option<usize> {
        let player = game.player(me)?;
        let next = player.site + 1;

        let everyone_ahead = game
            .players()
            .iter()
            .filter(|other| other.id != me)
            .all(|other| other.site > player.site);
        if everyone_ahead && game.can_move(me, next) {
            return Some(next);
        }

        if player.money % 2 != 0 {
            if let Some(site) = game.first_site_of_kind(me, SiteKind::Money) {
                return Some(site);
            }
        }

        if holds_most_cards(game, me) {
            if let Some(site) = game.first_site_of_kind(me, SiteKind::Draw) {
                return Some(site);
            }
        }

        game.first_site_of_kind(me, SiteKind::Scenic2)
            .or_else(|| reachable(game, me).next())
    }
}

/// Legal destinations for `me`, nearest first.
fn reachable(game: &Game, me: PlayerId) -> impl Iterator<Item = usize> + '_ {
    let from = game.player(me).map_or(game.path().len(), |p| p.site + 1);
    (from..game.path().len()).filter(move |&site| game.can_move(me, site))
}

/// True when `me` holds strictly more cards than anyone else, or when nobody
/// holds any cards at all.
fn holds_most_cards(game: &Game, me: PlayerId) -> bool {
    let Some(mine) = game.player(me).map(|p| p.total_cards()) else {
        return false;
    };
    let best_other = game
        .players()
        .iter()
        .filter(|p| p.id != me)
        .map(|p| p.total_cards())
        .max()
        .unwrap_or(0);

    if mine == 0 {
        best_other == 0
    } else {
        best_other < mine
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::StateUpdate;

    fn hap(game: &mut Game, player: usize, site: usize, money: i64, card: i64) {
        let update = StateUpdate {
            player: player as i64,
            site: site as i64,
            points: 0,
            money,
            card,
        };
        let transition = game.validate_update(&update).unwrap();
        game.apply(&transition);
    }

    #[test]
    fn test_spender_heads_for_discard_when_it_has_money() {
        let game = Game::new("7;::-Mo1V11Do1::-V11::-", 2).unwrap();
        assert_eq!(Spender.choose(&game, 0), Some(3));
    }

    #[test]
    fn test_spender_without_money_looks_for_scenery() {
        let mut game = Game::new("7;::-Mo1V11Do1::-V11::-", 2).unwrap();
        hap(&mut game, 0, 1, -7, 0);
        assert_eq!(Spender.choose(&game, 0), Some(2));

        // V1 taken, Do is skipped, so the barrier
        hap(&mut game, 1, 2, 0, 0);
        assert_eq!(Spender.choose(&game, 0), Some(4));
    }

    #[test]
    fn test_spender_takes_money_next_door() {
        let mut game = Game::new("5;::-V11Mo1Do1::-", 1).unwrap();
        hap(&mut game, 0, 1, -7, 0);
        assert_eq!(Spender.choose(&game, 0), Some(2));
    }

    #[test]
    fn test_spender_stops_at_barrier() {
        let game = Game::new("5;::-Ri1::-V11::-", 1).unwrap();
        assert_eq!(Spender.choose(&game, 0), Some(2));
    }

    #[test]
    fn test_collector_follows_when_everyone_is_ahead() {
        let mut game = Game::new("5;::-Mo2V12Ri2::-", 3).unwrap();
        hap(&mut game, 0, 2, 0, 0);
        hap(&mut game, 1, 1, 0, 0);
        assert_eq!(Collector.choose(&game, 2), Some(1));
    }

    #[test]
    fn test_collector_evens_out_odd_money() {
        let mut game = Game::new("6;::-V11Mo1Ri1V21::-", 2).unwrap();
        assert_eq!(Collector.choose(&game, 0), Some(2));

        hap(&mut game, 0, 2, 3, 0);
        // Even money and nobody has cards yet
        assert_eq!(Collector.choose(&game, 0), Some(3));
    }

    #[test]
    fn test_collector_draws_only_while_leading() {
        let mut game = Game::new("8;::-Ri2Ri2V11Ri1V21::-::-", 2).unwrap();
        hap(&mut game, 0, 1, 1, 1);
        hap(&mut game, 1, 1, 1, 2);
        // One card each is a tie
        assert_eq!(Collector.choose(&game, 0), Some(5));

        hap(&mut game, 0, 2, 0, 3);
        assert_eq!(Collector.choose(&game, 0), Some(4));
    }

    #[test]
    fn test_collector_falls_back_to_first_free_site() {
        let mut game = Game::new("4;::-Mo1Do1::-", 2).unwrap();
        hap(&mut game, 1, 1, 1, 0);
        assert_eq!(Collector.choose(&game, 0), Some(2));
    }

    #[test]
    fn test_no_move_once_finished() {
        let mut game = Game::new("3;::-Mo1::-", 1).unwrap();
        hap(&mut game, 0, 2, 0, 0);
        assert_eq!(Spender.choose(&game, 0), None);
        assert_eq!(Collector.choose(&game, 0), None);
    }

    #[test]
    fn test_holds_most_cards() {
        let mut game = Game::new("5;::-Ri3Ri3Ri3::-", 3).unwrap();
        assert!(holds_most_cards(&game, 0));
        hap(&mut game, 1, 1, 0, 1);
        assert!(!holds_most_cards(&game, 0));
        assert!(holds_most_cards(&game, 1));
        hap(&mut game, 2, 1, 0, 2);
        assert!(!holds_most_cards(&game, 1));
        assert!(!holds_most_cards(&game, 2));
    }
}
