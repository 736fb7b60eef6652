// src/services/reconciliation_service.rs
//
// Episode Reconciliation - best-player selection and per-episode dedup.
//
// The catalog serves the same title through several redundant players, each
// with its own (often partial) episode coverage and several dubbing tracks.
// This service turns that noisy list into one playable sequence.
//
// CRITICAL RULES:
// - Pure and synchronous: no I/O, no shared mutable state
// - Deterministic: same input → same output
// - All entries of the result come from a single player
// - Never more than one entry per episode number
// - Grouping always reconciles the raw input itself

use std::collections::btree_map::Entry;
use std::collections::{BTreeMap, BTreeSet, HashMap};

use crate::domain::reconciliation::{DubbingGroups, PlayerGroup, ReconciliationPolicy, TitleId};
use crate::domain::video::VideoEntry;

// ============================================================================
// EPISODE RECONCILER
// ============================================================================

#[derive(Debug, Clone, Default)]
pub struct EpisodeReconciler {
    policy: ReconciliationPolicy,
}

impl EpisodeReconciler {
    pub fn new(policy: ReconciliationPolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> &ReconciliationPolicy {
        &self.policy
    }

    /// One video per episode number, all from the best player, ascending.
    pub fn reconcile(&self, videos: &[VideoEntry], title: Option<&TitleId>) -> Vec<VideoEntry> {
        match self.select_player(videos, title) {
            Some(best) => dedup_by_episode(&best.videos),
            None => Vec::new(),
        }
    }

    /// Reconciled videos partitioned by dubbing track (first-seen order).
    ///
    /// Takes the RAW list: passing an already reconciled list would reconcile
    /// twice and may diverge from `reconcile` on the same input.
    pub fn group_by_dubbing(&self, videos: &[VideoEntry], title: Option<&TitleId>) -> DubbingGroups {
        let mut groups = DubbingGroups::new();
        for video in self.reconcile(videos, title) {
            groups.push(video);
        }

        // Already ordered by the reconciler, but keep the guarantee local
        groups.sort_episodes();
        groups
    }

    /// Pick the player whose entries will be played.
    ///
    /// Complete players are preferred over incomplete ones; among the
    /// candidates, higher priority wins, then more entries, then the player
    /// seen first.
    pub fn select_player<'a>(
        &self,
        videos: &'a [VideoEntry],
        title: Option<&TitleId>,
    ) -> Option<PlayerGroup<'a>> {
        let working_set = self.scope_to_title(videos, title);
        let groups = self.partition_by_player(working_set);

        let total_players = groups.len();
        let any_complete = groups.iter().any(|g| g.is_complete);

        let mut candidates: Vec<PlayerGroup<'a>> = if any_complete {
            groups.into_iter().filter(|g| g.is_complete).collect()
        } else {
            groups
        };

        // Stable: equal scores keep first-seen order
        candidates.sort_by(|a, b| {
            b.priority
                .cmp(&a.priority)
                .then_with(|| b.episode_count().cmp(&a.episode_count()))
        });

        let best = candidates.into_iter().next()?;

        log::debug!(
            "Selected player '{}' (priority {}, {} entries, complete: {}) among {} players",
            best.player,
            best.priority,
            best.episode_count(),
            best.is_complete,
            total_players
        );

        Some(best)
    }

    // ========================================================================
    // INTERNAL SELECTION STEPS
    // ========================================================================

    /// Restrict to the pinned player of a title override, unless that leaves nothing.
    fn scope_to_title<'a>(
        &self,
        videos: &'a [VideoEntry],
        title: Option<&TitleId>,
    ) -> Vec<&'a VideoEntry> {
        let Some(pinned) = title.and_then(|id| self.policy.override_for(id)) else {
            return videos.iter().collect();
        };

        let scoped: Vec<&VideoEntry> = videos.iter().filter(|v| pinned.accepts(v.player())).collect();

        if scoped.is_empty() {
            log::debug!(
                "Title {} is pinned to {:?} but none of its {} videos match; using all players",
                pinned.title_id,
                pinned.players,
                videos.len()
            );
            return videos.iter().collect();
        }

        scoped
    }

    /// Group by exact player name in first-seen order and score each group.
    fn partition_by_player<'a>(&self, videos: Vec<&'a VideoEntry>) -> Vec<PlayerGroup<'a>> {
        let mut index: HashMap<&'a str, usize> = HashMap::new();
        let mut buckets: Vec<(&'a str, Vec<&'a VideoEntry>)> = Vec::new();

        for video in videos {
            let player = video.player();
            match index.get(player) {
                Some(&slot) => buckets[slot].1.push(video),
                None => {
                    index.insert(player, buckets.len());
                    buckets.push((player, vec![video]));
                }
            }
        }

        buckets
            .into_iter()
            .map(|(player, videos)| PlayerGroup {
                player,
                is_complete: has_complete_episode_list(&videos),
                priority: self.policy.priorities.priority(player),
                videos,
            })
            .collect()
    }
}

// ============================================================================
// SELECTION RULES
// ============================================================================

/// Whether a player's episode numbers leave no gaps.
///
/// - no entries: never complete
/// - exactly one distinct positive number: complete
/// - two or more positive numbers: complete iff they are consecutive
/// - no positive numbers at all: complete iff every entry has the same
///   number (in practice, all of them are episode 0)
///
/// Episode 0 is ignored when checking for gaps.
pub fn has_complete_episode_list(videos: &[&VideoEntry]) -> bool {
    if videos.is_empty() {
        return false;
    }

    let numbers: BTreeSet<u32> = videos.iter().map(|v| v.episode_number()).collect();
    let positive: Vec<u32> = numbers.iter().copied().filter(|&n| n > 0).collect();

    match positive.len() {
        0 => numbers.len() == 1,
        1 => true,
        _ => positive.windows(2).all(|pair| pair[1] - pair[0] == 1),
    }
}

/// Keep the most viewed entry per episode number, ascending by number.
/// Equal views keep the entry seen first.
fn dedup_by_episode(videos: &[&VideoEntry]) -> Vec<VideoEntry> {
    let mut by_episode: BTreeMap<u32, &VideoEntry> = BTreeMap::new();

    for &video in videos {
        match by_episode.entry(video.episode_number()) {
            Entry::Vacant(slot) => {
                slot.insert(video);
            }
            Entry::Occupied(mut slot) => {
                if video.views() > slot.get().views() {
                    slot.insert(video);
                }
            }
        }
    }

    // BTreeMap iterates in ascending key order
    by_episode.into_values().cloned().collect()
}

// ============================================================================
// TESTS
// ============================================================================
