//! Turn rules: who moves next, which moves are legal, and how a validated
//! state-update changes the game.

use crate::game::{Card, Game};
use crate::path::SiteKind;
use crate::protocol::StateUpdate;
use crate::PlayerId;
use log::debug;
use thiserror::Error;

/// Why a destination site is not a legal move.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MoveError {
    #[error("no player {0}")]
    UnknownPlayer(i64),
    #[error("site {site} is not ahead of site {current}")]
    NotAhead { current: usize, site: i64 },
    #[error("site {0} is outside the path")]
    OutOfBounds(i64),
    #[error("site {0} is full")]
    Full(usize),
    #[error("moving from site {from} to site {to} skips the barrier at site {barrier}")]
    SkipsBarrier {
        from: usize,
        to: usize,
        barrier: usize,
    },
}

/// Why a state-update cannot be applied.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UpdateError {
    #[error(transparent)]
    Move(#[from] MoveError),
    #[error("points change {0} is negative")]
    NegativePoints(i64),
    #[error("card {0} does not exist")]
    UnknownCard(i64),
}

/// A checked state-update, ready for [`Game::apply`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition {
    pub player: PlayerId,
    pub site: usize,
    pub points: i64,
    pub money: i64,
    pub card: Option<Card>,
}

impl From<&Transition> for StateUpdate {
    fn from(transition: &Transition) -> Self {
        StateUpdate {
            player: transition.player as i64,
            site: transition.site as i64,
            points: transition.points,
            money: transition.money,
            card: transition.card.map_or(0, Card::wire),
        }
    }
}

impl Game {
    /// The player owed the next move: at the rearmost occupied site, the one
    /// that arrived there last.
    pub fn whose_turn(&self) -> Option<PlayerId> {
        self.path
            .sites()
            .iter()
            .find_map(|site| site.slots().iter().rev().find_map(|slot| *slot))
    }

    /// True once every player stands on the closing barrier.
    pub fn is_over(&self) -> bool {
        let last = self.path.last_index();
        self.players.iter().all(|player| player.site == last)
    }

    /// Capacity check against where players actually are, independent of the
    /// slot lists.
    pub fn is_full(&self, site: usize) -> bool {
        let Some(capacity) = self.path.site(site).map(|s| s.capacity()) else {
            return true;
        };
        self.occupancy(site) >= capacity
    }

    /// Players currently standing on `site`.
    pub fn occupancy(&self, site: usize) -> usize {
        self.players.iter().filter(|p| p.site == site).count()
    }

    /// True when moving `player` to `site` would pass a barrier.
    pub fn skips_barrier(&self, player: PlayerId, site: usize) -> bool {
        self.players
            .get(player)
            .is_some_and(|p| self.path.barrier_between(p.site, site).is_some())
    }

    /// Validates a move of `player` to `site` and returns the destination.
    pub fn check_move(&self, player: PlayerId, site: i64) -> Result<usize, MoveError> {
        let current = self
            .players
            .get(player)
            .ok_or(MoveError::UnknownPlayer(player as i64))?
            .site;

        if site <= current as i64 {
            return Err(MoveError::NotAhead { current, site });
        }
        let target = usize::try_from(site)
            .ok()
            .filter(|&target| target < self.path.len())
            .ok_or(MoveError::OutOfBounds(site))?;
        if self.is_full(target) {
            return Err(MoveError::Full(target));
        }
        if let Some(barrier) = self.path.barrier_between(current, target) {
            return Err(MoveError::SkipsBarrier {
                from: current,
                to: target,
                barrier,
            });
        }
        Ok(target)
    }

    pub fn can_move(&self, player: PlayerId, site: usize) -> bool {
        i64::try_from(site)
            .map(|site| self.check_move(player, site).is_ok())
            .unwrap_or(false)
    }

    /// First legal destination of `kind` ahead of `player`.
    pub fn first_site_of_kind(&self, player: PlayerId, kind: SiteKind) -> Option<usize> {
        let current = self.players.get(player)?.site;
        (current + 1..self.path.len()).find(|&site| {
            self.path.site(site).map(|s| s.kind()) == Some(kind) && self.can_move(player, site)
        })
    }

    /// Checks a received state-update against the current game.
    pub fn validate_update(&self, update: &StateUpdate) -> Result<Transition, UpdateError> {
        let player = usize::try_from(update.player)
            .ok()
            .filter(|&player| player < self.players.len())
            .ok_or(MoveError::UnknownPlayer(update.player))?;
        let site = self.check_move(player, update.site)?;
        if update.points < 0 {
            return Err(UpdateError::NegativePoints(update.points));
        }
        let card = Card::from_wire(update.card).ok_or(UpdateError::UnknownCard(update.card))?;

        Ok(Transition {
            player,
            site,
            points: update.points,
            money: update.money,
            card,
        })
    }

    /// Applies a validated transition. The player's `site` and both sites'
    /// slot lists change together here and nowhere else.
    pub fn apply(&mut self, transition: &Transition) {
        let Some(player) = self.players.get_mut(transition.player) else {
            return;
        };
        let from = player.site;
        player.site = transition.site;

        match self.path.site(transition.site).map(|s| s.kind()) {
            Some(SiteKind::Scenic1) => player.v1_visits += 1,
            Some(SiteKind::Scenic2) => player.v2_visits += 1,
            _ => {}
        }
        player.points = player.points.saturating_add(transition.points);
        player.money = player.money.saturating_add(transition.money);
        if let Some(card) = transition.card {
            player.cards[card.index()] += 1;
        }

        if let Some(site) = self.path.site_mut(from) {
            site.remove(transition.player);
        }
        let seated = self
            .path
            .site_mut(transition.site)
            .is_some_and(|site| site.insert(transition.player));
        debug_assert!(seated, "validated move must find a free slot");

        debug!(
            "player {} moved {} -> {}",
            transition.player, from, transition.site
        );
    }
}
