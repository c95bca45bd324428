//! Path parsing and per-site occupancy bookkeeping.
//!
//! A path is transmitted as `<N>;` followed by `N` three-character records:
//! a two-letter site type and a capacity digit, or `-` for a barrier. For
//! example `4;::-Mo1V22::-` is a barrier, a money site holding one player, a
//! scenic site holding two players and a closing barrier.

use crate::{PlayerId, MIN_SITES, SITE_WIDTH};
use serde::Serialize;
use std::fmt;
use thiserror::Error;

/// The six kinds of site a path can contain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum SiteKind {
    /// `Mo`: gain money.
    Money,
    /// `V1`: scenic site of the first kind.
    Scenic1,
    /// `V2`: scenic site of the second kind.
    Scenic2,
    /// `Do`: convert money into points.
    Discard,
    /// `Ri`: draw a card.
    Draw,
    /// `::`: may never be moved past without stopping on it.
    Barrier,
}

impl SiteKind {
    pub const ALL: [SiteKind; 6] = [
        SiteKind::Money,
        SiteKind::Scenic1,
        SiteKind::Scenic2,
        SiteKind::Discard,
        SiteKind::Draw,
        SiteKind::Barrier,
    ];

    pub fn from_code(code: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.code() == code)
    }

    pub fn code(self) -> &'static str {
        match self {
            SiteKind::Money => "Mo",
            SiteKind::Scenic1 => "V1",
            SiteKind::Scenic2 => "V2",
            SiteKind::Discard => "Do",
            SiteKind::Draw => "Ri",
            SiteKind::Barrier => "::",
        }
    }

    pub fn is_barrier(self) -> bool {
        self == SiteKind::Barrier
    }
}

impl fmt::Display for SiteKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// A single malformed site record.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SiteError {
    #[error("unknown site type {0:?}")]
    UnknownKind(String),
    #[error("barrier capacity must be '-', found {0:?}")]
    BarrierCapacity(char),
    #[error("site capacity must be a digit from 1 to 9, found {0:?}")]
    Capacity(char),
}

/// Reasons a path text is rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PathError {
    #[error("path is empty")]
    Empty,
    #[error("path must contain exactly one ';' and no whitespace")]
    Separator,
    #[error("invalid site count {0:?}")]
    SiteCount(String),
    #[error("path must start and end with a barrier")]
    Unbounded,
    #[error("path declares {declared} sites but its records are {actual} characters long")]
    Length { declared: usize, actual: usize },
    #[error("site {index}: {source}")]
    Site {
        index: usize,
        #[source]
        source: SiteError,
    },
}

/// One position on the path.
///
/// `slots` has one entry per unit of capacity. Players are inserted into the
/// first empty slot, so for the players at a site, a lower slot index means
/// an earlier arrival.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Site {
    kind: SiteKind,
    capacity: usize,
    slots: Vec<Option<PlayerId>>,
}

impl Site {
    fn new(kind: SiteKind, capacity: usize) -> Self {
        Self {
            kind,
            capacity,
            slots: vec![None; capacity],
        }
    }

    pub fn kind(&self) -> SiteKind {
        self.kind
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn slots(&self) -> &[Option<PlayerId>] {
        &self.slots
    }

    /// Number of players currently holding a slot here.
    pub fn occupants(&self) -> usize {
        self.slots.iter().flatten().count()
    }

    /// The three-character record this site was parsed from.
    pub fn record(&self) -> String {
        if self.kind.is_barrier() {
            format!("{}-", self.kind)
        } else {
            format!("{}{}", self.kind, self.capacity)
        }
    }

    pub(crate) fn remove(&mut self, player: PlayerId) {
        for slot in self.slots.iter_mut() {
            if *slot == Some(player) {
                *slot = None;
            }
        }
    }

    /// Places `player` in the first empty slot. Returns false when the site
    /// has no empty slot left.
    pub(crate) fn insert(&mut self, player: PlayerId) -> bool {
        match self.slots.iter_mut().find(|slot| slot.is_none()) {
            Some(slot) => {
                *slot = Some(player);
                true
            }
            None => false,
        }
    }
}

/// A validated path together with the exact text it was parsed from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Path {
    raw: String,
    sites: Vec<Site>,
}

impl Path {
    /// Parses path text for a game of `player_count` players. Barriers get a
    /// capacity of `player_count` so they never limit movement.
    pub fn parse(text: &str, player_count: usize) -> Result<Self, PathError> {
        if text.is_empty() {
            return Err(PathError::Empty);
        }
        if text.matches(';').count() != 1 || text.contains([' ', '\t']) {
            return Err(PathError::Separator);
        }
        let (count, records) = text.split_once(';').ok_or(PathError::Separator)?;

        if count.is_empty() || !count.bytes().all(|b| b.is_ascii_digit()) {
            return Err(PathError::SiteCount(count.to_string()));
        }
        let declared: usize = count
            .parse()
            .map_err(|_| PathError::SiteCount(count.to_string()))?;
        if declared < MIN_SITES {
            return Err(PathError::SiteCount(count.to_string()));
        }

        let barrier = Site::new(SiteKind::Barrier, 0).record();
        if !records.starts_with(&barrier) || !records.ends_with(&barrier) {
            return Err(PathError::Unbounded);
        }
        if Some(records.len()) != declared.checked_mul(SITE_WIDTH) {
            return Err(PathError::Length {
                declared,
                actual: records.len(),
            });
        }

        let sites = records
            .as_bytes()
            .chunks(SITE_WIDTH)
            .enumerate()
            .map(|(index, record)| {
                parse_site(record, player_count).map_err(|source| PathError::Site { index, source })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            raw: text.to_string(),
            sites,
        })
    }

    /// The validated text, exactly as received.
    pub fn raw(&self) -> &str {
        &self.raw
    }

    pub fn sites(&self) -> &[Site] {
        &self.sites
    }

    pub fn site(&self, index: usize) -> Option<&Site> {
        self.sites.get(index)
    }

    pub(crate) fn site_mut(&mut self, index: usize) -> Option<&mut Site> {
        self.sites.get_mut(index)
    }

    pub fn len(&self) -> usize {
        self.sites.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sites.is_empty()
    }

    /// Index of the closing barrier.
    pub fn last_index(&self) -> usize {
        self.sites.len().saturating_sub(1)
    }

    /// First barrier strictly between `from` and `to`, if any.
    pub fn barrier_between(&self, from: usize, to: usize) -> Option<usize> {
        (from + 1..to).find(|&index| {
            self.sites
                .get(index)
                .is_some_and(|site| site.kind.is_barrier())
        })
    }

    /// All site records concatenated, i.e. the text after the `;`.
    pub fn records(&self) -> String {
        self.sites.iter().map(Site::record).collect()
    }
}

fn parse_site(record: &[u8], player_count: usize) -> Result<Site, SiteError> {
    let code = String::from_utf8_lossy(&record[..2]);
    let kind = SiteKind::from_code(&code).ok_or_else(|| SiteError::UnknownKind(code.to_string()))?;
    let capacity = char::from(record[2]);

    if kind.is_barrier() {
        return match capacity {
            '-' => Ok(Site::new(kind, player_count)),
            other => Err(SiteError::BarrierCapacity(other)),
        };
    }
    match capacity.to_digit(10) {
        Some(limit) if limit > 0 => Ok(Site::new(kind, limit as usize)),
        _ => Err(SiteError::Capacity(capacity)),
    }
}
