// src/domain/reconciliation/policy.rs
//
// Reconciliation Policy - the tunable surface of the episode reconciler.
//
// CRITICAL RULES:
// - Built once, immutable afterwards, injected into the reconciler
// - Player names are open-ended strings from the catalog API, never enums
// - Lookups are exact string matches; aliases are separate keys

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

// ============================================================================
// TITLE ID
// ============================================================================

/// Catalog title identifier.
///
/// The API is inconsistent about numeric vs string ids, so ids are compared
/// by their textual form: `TitleId::from(1512) == TitleId::from("1512")`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TitleId(String);

impl TitleId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<u64> for TitleId {
    fn from(id: u64) -> Self {
        Self(id.to_string())
    }
}

impl From<&str> for TitleId {
    fn from(id: &str) -> Self {
        Self(id.trim().to_string())
    }
}

impl From<String> for TitleId {
    fn from(id: String) -> Self {
        Self::from(id.as_str())
    }
}

impl fmt::Display for TitleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// ============================================================================
// PRIORITY TABLE
// ============================================================================

/// Player name → priority (higher is better). Unknown players score 0.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PriorityTable {
    priorities: HashMap<String, i32>,
}

impl PriorityTable {
    /// A table where every player scores 0
    pub fn empty() -> Self {
        Self {
            priorities: HashMap::new(),
        }
    }

    /// Register one logical player under all of its display names.
    pub fn with_player<I, S>(mut self, aliases: I, priority: i32) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for alias in aliases {
            self.priorities.insert(alias.into(), priority);
        }
        self
    }

    pub fn priority(&self, player: &str) -> i32 {
        self.priorities.get(player).copied().unwrap_or(0)
    }

    pub fn len(&self) -> usize {
        self.priorities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.priorities.is_empty()
    }
}

impl Default for PriorityTable {
    /// Localized and English labels of the players the catalog serves.
    /// CVH is deliberately absent (scores 0).
    fn default() -> Self {
        Self::empty()
            .with_player(["Плеер Alloha", "Alloha"], 5)
            .with_player(["Плеер Aksor", "Aksor"], 4)
            .with_player(["Плеер Kodik", "Kodik"], 3)
    }
}

// ============================================================================
// TITLE OVERRIDES
// ============================================================================

/// Pin a title to a specific player whenever that player has entries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TitleOverride {
    pub title_id: TitleId,

    /// Accepted player names (exact match)
    pub players: Vec<String>,
}

impl TitleOverride {
    pub fn new<I, S>(title_id: impl Into<TitleId>, players: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            title_id: title_id.into(),
            players: players.into_iter().map(Into::into).collect(),
        }
    }

    pub fn accepts(&self, player: &str) -> bool {
        self.players.iter().any(|p| p == player)
    }
}

// ============================================================================
// POLICY
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReconciliationPolicy {
    pub priorities: PriorityTable,
    pub overrides: Vec<TitleOverride>,
}

impl ReconciliationPolicy {
    /// Policy with the given table and no title overrides
    pub fn new(priorities: PriorityTable) -> Self {
        Self {
            priorities,
            overrides: Vec::new(),
        }
    }

    pub fn with_override(mut self, title_override: TitleOverride) -> Self {
        self.overrides.push(title_override);
        self
    }

    pub fn override_for(&self, title_id: &TitleId) -> Option<&TitleOverride> {
        self.overrides.iter().find(|o| &o.title_id == title_id)
    }
}

impl Default for ReconciliationPolicy {
    /// Default table plus the One Piece (1512) pin to Kodik.
    fn default() -> Self {
        Self::new(PriorityTable::default())
            .with_override(TitleOverride::new(1512u64, ["Плеер Kodik", "Kodik"]))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_priorities() {
        let table = PriorityTable::default();

        assert_eq!(table.priority("Плеер Alloha"), 5);
        assert_eq!(table.priority("Alloha"), 5);
        assert_eq!(table.priority("Плеер Aksor"), 4);
        assert_eq!(table.priority("Aksor"), 4);
        assert_eq!(table.priority("Плеер Kodik"), 3);
        assert_eq!(table.priority("Kodik"), 3);
        assert_eq!(table.len(), 6);
    }

    #[test]
    fn test_unknown_and_cvh_score_zero() {
        let table = PriorityTable::default();

        assert_eq!(table.priority("Плеер CVH"), 0);
        assert_eq!(table.priority("CVH"), 0);
        assert_eq!(table.priority("Unknown"), 0);
        // Exact match only
        assert_eq!(table.priority("kodik"), 0);
    }

    #[test]
    fn test_table_is_extensible() {
        let table = PriorityTable::default().with_player(["Плеер CVH", "CVH"], 9);

        assert_eq!(table.priority("CVH"), 9);
        assert_eq!(table.priority("Alloha"), 5);
    }

    #[test]
    fn test_title_id_textual_equality() {
        assert_eq!(TitleId::from(1512u64), TitleId::from("1512"));
        assert_eq!(TitleId::from(" 1512 "), TitleId::from(1512u64));
        assert_ne!(TitleId::from(1512u64), TitleId::from(151u64));
    }

    #[test]
    fn test_default_override_pins_one_piece_to_kodik() {
        let policy = ReconciliationPolicy::default();

        let pinned = policy.override_for(&TitleId::from("1512")).unwrap();
        assert!(pinned.accepts("Kodik"));
        assert!(pinned.accepts("Плеер Kodik"));
        assert!(!pinned.accepts("Alloha"));

        assert!(policy.override_for(&TitleId::from(1u64)).is_none());
    }
}
