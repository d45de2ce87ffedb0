//! Deterministic record addresses
//!
//! Every logical record lives at an address derived from a namespace tag and
//! canonical seed bytes. The program feeds the same tags and seeds to its PDA
//! constraints, so an [`Address`] and a program-derived address always name
//! the same entity.

use core::fmt;
use serde::{Deserialize, Serialize};
use crate::Team;

/// Namespace tags, shared with the program's `seeds = [...]` constraints
pub mod seeds {
    pub const CONFIG: &[u8] = b"config";
    pub const WINNER: &[u8] = b"winner";
    pub const SEASON: &[u8] = b"season";
    pub const MEME_TEAM: &[u8] = b"meme_team";
    pub const CHAIN_TEAM: &[u8] = b"chain_team";
    pub const USER: &[u8] = b"user";
    pub const USER_SEASON: &[u8] = b"user_season";
    pub const GAME: &[u8] = b"game";
}

/// 32-byte public identifier (wallet or mint)
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
pub struct Key(pub [u8; 32]);

impl Key {
    pub const fn new(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }
}

impl fmt::Debug for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Key(")?;
        for b in &self.0[..4] {
            write!(f, "{:02x}", b)?;
        }
        write!(f, "..)")
    }
}

impl From<[u8; 32]> for Key {
    fn from(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }
}

/// Season ids are encoded as fixed-width little-endian u32
pub fn season_seed(season_id: u32) -> [u8; 4] {
    season_id.to_le_bytes()
}

/// Team record namespace for a team
pub fn team_seed(team: Team) -> &'static [u8] {
    match team {
        Team::Meme => seeds::MEME_TEAM,
        Team::Chain => seeds::CHAIN_TEAM,
    }
}

/// Injective encoding of (namespace, seeds): every part is length-prefixed
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Address(Vec<u8>);

impl Address {
    /// Derive the address for `namespace` + `parts`.
    ///
    /// Parts longer than 255 bytes are not used by any namespace; they are
    /// rejected in debug builds.
    pub fn derive(namespace: &[u8], parts: &[&[u8]]) -> Self {
        debug_assert!(namespace.len() <= u8::MAX as usize);
        let parts_len: usize = parts.iter().map(|p| p.len() + 1).sum();
        let mut bytes = Vec::with_capacity(1 + namespace.len() + parts_len);
        bytes.push(namespace.len() as u8);
        bytes.extend_from_slice(namespace);
        for part in parts {
            debug_assert!(part.len() <= u8::MAX as usize);
            bytes.push(part.len() as u8);
            bytes.extend_from_slice(part);
        }
        Self(bytes)
    }

    pub fn config() -> Self {
        Self::derive(seeds::CONFIG, &[])
    }

    pub fn winner() -> Self {
        Self::derive(seeds::WINNER, &[])
    }

    pub fn season(season_id: u32) -> Self {
        Self::derive(seeds::SEASON, &[&season_seed(season_id)])
    }

    pub fn team(team: Team) -> Self {
        Self::derive(team_seed(team), &[])
    }

    pub fn user(user: &Key) -> Self {
        Self::derive(seeds::USER, &[user.as_bytes()])
    }

    pub fn user_season(user: &Key, season_id: u32) -> Self {
        Self::derive(seeds::USER_SEASON, &[user.as_bytes(), &season_seed(season_id)])
    }

    pub fn game(ticket: &Key) -> Self {
        Self::derive(seeds::GAME, &[ticket.as_bytes()])
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Namespace tag this address was derived under
    pub fn namespace(&self) -> &[u8] {
        let len = self.0.first().copied().unwrap_or(0) as usize;
        self.0.get(1..1 + len).unwrap_or(&[])
    }
}

impl fmt::Debug for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Address({}", String::from_utf8_lossy(self.namespace()))?;
        let rest = self.0.len().saturating_sub(1 + self.namespace().len());
        if rest > 0 {
            write!(f, "+{}b", rest)?;
        }
        write!(f, ")")
    }
}
