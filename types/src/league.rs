use serde::{Deserialize, Serialize};

use crate::Error;

/// A player and the number of games they have won.
///
/// Field names are serialized as `Name` and `Wins` so existing ledgers can be
/// read and written unchanged.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    #[serde(rename = "Name")]
    pub name: String,
    #[serde(rename = "Wins")]
    pub wins: u64,
}

impl Player {
    pub fn new(name: impl Into<String>, wins: u64) -> Self {
        Self {
            name: name.into(),
            wins,
        }
    }
}

/// Ledger of every player that has won at least one game.
///
/// Players are kept in insertion order; [League::sorted] produces the ranking
/// view.
#[derive(Clone, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct League {
    pub players: Vec<Player>,
}

impl League {
    pub fn new(players: Vec<Player>) -> Self {
        Self { players }
    }

    /// Decode a ledger from its JSON representation.
    ///
    /// Blank input is an empty ledger.
    pub fn from_slice(bytes: &[u8]) -> Result<Self, Error> {
        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(Self::default());
        }
        Ok(serde_json::from_slice(bytes)?)
    }

    /// Encode the ledger as a JSON array.
    pub fn to_vec(&self) -> Result<Vec<u8>, Error> {
        Ok(serde_json::to_vec(self)?)
    }

    pub fn find(&self, name: &str) -> Option<&Player> {
        self.players.iter().find(|p| p.name == name)
    }

    pub fn find_mut(&mut self, name: &str) -> Option<&mut Player> {
        self.players.iter_mut().find(|p| p.name == name)
    }

    /// Add a win for `name`, appending the player if absent. Returns the new
    /// win count.
    pub fn record_win(&mut self, name: &str) -> u64 {
        if let Some(player) = self.find_mut(name) {
            player.wins += 1;
            return player.wins;
        }
        self.players.push(Player::new(name, 1));
        1
    }

    /// Ranking view: players by descending wins, ties in insertion order.
    pub fn sorted(&self) -> League {
        let mut players = self.players.clone();
        players.sort_by(|a, b| b.wins.cmp(&a.wins));
        League { players }
    }

    pub fn len(&self) -> usize {
        self.players.len()
    }

    pub fn is_empty(&self) -> bool {
        self.players.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Player> {
        self.players.iter()
    }
}
