use serde::{Deserialize, Serialize};

use crate::error::{DraftError, Result};

pub type Owner = String;

/// One row of the player pool.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Player {
    pub name: String,
    pub position: String,
    pub bye: Option<u32>,
    pub projection: f64,
    /// Listed auction value; only present in Salary Cap pools
    pub salary: Option<f64>,
}

/// Undrafted players, kept in the ranking order they were loaded in.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PlayerPool {
    players: Vec<Player>,
}

impl PlayerPool {
    pub fn new(players: Vec<Player>) -> Self {
        Self { players }
    }

    pub fn lookup(&self, name: &str) -> Result<&Player> {
        self.players
            .iter()
            .find(|p| p.name == name)
            .ok_or_else(|| DraftError::PlayerNotFound(name.to_string()))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.players.iter().any(|p| p.name == name)
    }

    /// Removes a player for good; the ranking of everyone else is untouched.
    pub fn remove(&mut self, name: &str) -> Result<Player> {
        let idx = self
            .players
            .iter()
            .position(|p| p.name == name)
            .ok_or_else(|| DraftError::PlayerNotFound(name.to_string()))?;
        Ok(self.players.remove(idx))
    }

    pub fn top_n(&self, n: usize) -> &[Player] {
        &self.players[..n.min(self.players.len())]
    }

    pub fn top(&self) -> Option<&Player> {
        self.players.first()
    }

    pub fn len(&self) -> usize {
        self.players.len()
    }

    pub fn is_empty(&self) -> bool {
        self.players.is_empty()
    }
}

#[cfg(test)]
pub(crate) fn test_player(name: &str, position: &str) -> Player {
    Player {
        name: name.to_string(),
        position: position.to_string(),
        bye: Some(9),
        projection: 200.0,
        salary: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pool() -> PlayerPool {
        PlayerPool::new(vec![
            test_player("Alpha", "RB"),
            test_player("Bravo", "WR"),
            test_player("Charlie", "QB"),
        ])
    }

    #[test]
    fn top_n_keeps_ranking_order_and_clamps() {
        let pool = pool();
        let names: Vec<&str> = pool.top_n(2).iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["Alpha", "Bravo"]);
        assert_eq!(pool.top_n(50).len(), 3);
    }

    #[test]
    fn removed_player_is_gone_for_good() {
        let mut pool = pool();
        let removed = pool.remove("Bravo").unwrap();
        assert_eq!(removed.position, "WR");
        assert!(!pool.contains("Bravo"));
        assert!(matches!(pool.lookup("Bravo"), Err(DraftError::PlayerNotFound(_))));
        assert!(matches!(pool.remove("Bravo"), Err(DraftError::PlayerNotFound(_))));
        assert_eq!(pool.top().map(|p| p.name.as_str()), Some("Alpha"));
        assert_eq!(pool.top_n(2)[1].name, "Charlie");
    }
}
