use std::collections::VecDeque;

use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::core::DataRect;

pub const DEFAULT_HISTORY_LIMIT: usize = 64;

/// Operation that produced a history entry or a rectangle change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum NavigationKind {
    #[default]
    None,
    Zoom,
    Magnify,
    Pan,
}

impl NavigationKind {
    /// Continuous gestures collapse into one undo step.
    #[must_use]
    pub const fn coalesces(self) -> bool {
        matches!(self, Self::Magnify | Self::Pan)
    }
}

/// Bounded undo stack for one navigation domain. Most recent entry last.
#[derive(Debug, Clone, PartialEq)]
pub struct History {
    entries: VecDeque<DataRect>,
    last_kind: NavigationKind,
    limit: usize,
}

impl Default for History {
    fn default() -> Self {
        Self::with_limit(DEFAULT_HISTORY_LIMIT)
    }
}

impl History {
    /// A limit of zero is treated as one entry.
    #[must_use]
    pub fn with_limit(limit: usize) -> Self {
        Self {
            entries: VecDeque::new(),
            last_kind: NavigationKind::None,
            limit: limit.max(1),
        }
    }

    /// Records `rect`. A Magnify or Pan following an entry of the same kind
    /// replaces it; everything else appends. The oldest entry is dropped once
    /// the limit is exceeded.
    pub fn push(&mut self, rect: DataRect, kind: NavigationKind) {
        if kind.coalesces() && self.last_kind == kind {
            self.entries.pop_back();
        }
        self.entries.push_back(rect);
        while self.entries.len() > self.limit {
            self.entries.pop_front();
        }
        self.last_kind = kind;
        trace!(len = self.entries.len(), ?kind, "history push");
    }

    /// Drops the top entry and returns the new top, if more than one entry
    /// was stored.
    pub fn step_back(&mut self) -> Option<DataRect> {
        if self.entries.len() < 2 {
            return None;
        }
        self.entries.pop_back();
        // The restored entry must not be swallowed by the next gesture.
        self.last_kind = NavigationKind::None;
        self.entries.back().copied()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.last_kind = NavigationKind::None;
    }

    #[must_use]
    pub fn top(&self) -> Option<DataRect> {
        self.entries.back().copied()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[must_use]
    pub fn last_kind(&self) -> NavigationKind {
        self.last_kind
    }

    #[must_use]
    pub fn limit(&self) -> usize {
        self.limit
    }

    pub fn entries(&self) -> impl Iterator<Item = &DataRect> {
        self.entries.iter()
    }
}
