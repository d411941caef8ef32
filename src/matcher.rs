use chrono::{DateTime, Local};
use serde::Serialize;
use std::collections::HashSet;
use strsim::levenshtein;
use tracing::{debug, info};

use crate::error::{AppError, Result};
use crate::track::Track;

/// Edit distance tolerated between normalized titles.
pub const DEFAULT_THRESHOLD: usize = 3;

const NOISE_TOKENS: [&str; 2] = ["remastered", "remaster"];

/// Canonical comparison key for a track title. Never shown to the user.
pub fn normalize(title: &str) -> String {
    let mut key = title.to_lowercase();
    for token in NOISE_TOKENS {
        key = key.replace(token, "");
    }

    key.trim().chars().filter(|c| c.is_alphanumeric()).collect()
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct TrackPair {
    pub left: Track,
    pub right: Track,
}

/// Partition of two playlists into matched pairs and leftovers.
///
/// Every input track sits in exactly one place: a left track is either a pair's
/// `left` or in `only_left`, a right track is either a pair's `right` or in
/// `only_right`. [`MatchResult::link`] is the only mutation and keeps that true.
#[derive(Debug, Clone, Serialize)]
pub struct MatchResult {
    pub left_name: String,
    pub right_name: String,
    pub created_at: DateTime<Local>,
    found: Vec<TrackPair>,
    only_left: Vec<Track>,
    only_right: Vec<Track>,
}

impl MatchResult {
    pub fn new(left_name: impl Into<String>, right_name: impl Into<String>) -> Self {
        Self {
            left_name: left_name.into(),
            right_name: right_name.into(),
            created_at: Local::now(),
            found: Vec::new(),
            only_left: Vec::new(),
            only_right: Vec::new(),
        }
    }

    /// Matched pairs in the order they were committed.
    pub fn found(&self) -> &[TrackPair] {
        &self.found
    }

    pub fn only_left(&self) -> &[Track] {
        &self.only_left
    }

    pub fn only_right(&self) -> &[Track] {
        &self.only_right
    }

    /// The right-side counterpart of `left`, if it was matched.
    pub fn matched(&self, left: &Track) -> Option<&Track> {
        self.found
            .iter()
            .find(|pair| &pair.left == left)
            .map(|pair| &pair.right)
    }

    pub fn label(&self) -> String {
        format!(
            "{} <-> {} ({})",
            self.left_name,
            self.right_name,
            self.created_at.format("%Y-%m-%d %H:%M:%S")
        )
    }

    /// Pair a pending left track with a pending right track by hand.
    ///
    /// Both tracks are checked before anything is touched, so a failed call leaves
    /// the result unchanged.
    pub fn link(&mut self, left: &Track, right: &Track) -> Result<()> {
        let left_idx = self
            .only_left
            .iter()
            .position(|t| t == left)
            .ok_or_else(|| {
                AppError::Precondition(format!(
                    "\"{}\" is not among the unmatched {} tracks",
                    left.brief(),
                    self.left_name
                ))
            })?;
        let right_idx = self
            .only_right
            .iter()
            .position(|t| t == right)
            .ok_or_else(|| {
                AppError::Precondition(format!(
                    "\"{}\" is not among the unmatched {} tracks",
                    right.brief(),
                    self.right_name
                ))
            })?;

        let left = self.only_left.remove(left_idx);
        let right = self.only_right.remove(right_idx);
        info!("Linked by hand: {} -> {}", left.brief(), right.brief());
        self.found.push(TrackPair { left, right });

        Ok(())
    }
}

/// Greedy nearest-neighbour matcher over normalized titles.
///
/// Left tracks are taken in order and each one claims the closest remaining right
/// track. A committed pair is never revisited, so the assignment is not globally
/// optimal. On equal distances the earliest candidate in the pool wins.
#[derive(Debug, Clone, Copy)]
pub struct TrackMatcher {
    threshold: usize,
}

impl Default for TrackMatcher {
    fn default() -> Self {
        Self::new(DEFAULT_THRESHOLD)
    }
}

impl TrackMatcher {
    pub fn new(threshold: usize) -> Self {
        Self { threshold }
    }

    pub fn threshold(&self) -> usize {
        self.threshold
    }

    pub fn match_tracks(&self, left: &[Track], right: &[Track]) -> MatchResult {
        self.match_named("left", left, "right", right)
    }

    /// Match two playlists. The caller's slices are never modified: the right side
    /// is copied into a private pool that shrinks as pairs are committed.
    pub fn match_named(
        &self,
        left_name: &str,
        left: &[Track],
        right_name: &str,
        right: &[Track],
    ) -> MatchResult {
        let mut result = MatchResult::new(left_name, right_name);
        let left = unique(left);

        let mut pool: Vec<(String, Track)> = unique(right)
            .into_iter()
            .map(|t| (normalize(&t.title), t))
            .collect();

        for (i, t1) in left.iter().enumerate() {
            if pool.is_empty() {
                result.only_left.extend(left[i..].iter().cloned());
                break;
            }

            let key = normalize(&t1.title);
            let mut best: Option<(usize, usize)> = None;
            for (idx, (candidate, _)) in pool.iter().enumerate() {
                let distance = levenshtein(&key, candidate);
                if best.is_none_or(|(_, best_distance)| distance < best_distance) {
                    best = Some((idx, distance));
                }
            }

            match best {
                Some((idx, distance)) if distance <= self.threshold => {
                    let (_, t2) = pool.remove(idx);
                    debug!("Matched {:?} -> {:?} (distance {})", t1.title, t2.title, distance);
                    result.found.push(TrackPair {
                        left: t1.clone(),
                        right: t2,
                    });
                }
                _ => result.only_left.push(t1.clone()),
            }
        }

        result.only_right = pool.into_iter().map(|(_, t)| t).collect();

        info!(
            "Matched {} vs {}: {} pairs, {} only in {}, {} only in {}",
            left_name,
            right_name,
            result.found.len(),
            result.only_left.len(),
            left_name,
            result.only_right.len(),
            right_name
        );

        result
    }
}

/// First occurrence of every track identity, in input order.
pub fn unique(tracks: &[Track]) -> Vec<Track> {
    let mut seen = HashSet::new();
    tracks
        .iter()
        .filter(|t| seen.insert(*t))
        .cloned()
        .collect()
}
