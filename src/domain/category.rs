// SPDX-FileCopyrightText: 2026 Sephyi <me@sephy.io>
// SPDX-License-Identifier: GPL-3.0-only

use super::CommitRecord;

/// Changelog section a commit lands in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub enum Category {
    Enhancement,
    Bug,
    #[default]
    Miscellaneous,
}

impl Category {
    /// Rendering order
    pub const ALL: [Category; 3] = [Self::Enhancement, Self::Bug, Self::Miscellaneous];

    pub fn heading(&self) -> &'static str {
        match self {
            Self::Enhancement => "Implemented enhancements",
            Self::Bug => "Fixed bugs",
            Self::Miscellaneous => "Miscellaneous",
        }
    }

    fn index(self) -> usize {
        match self {
            Self::Enhancement => 0,
            Self::Bug => 1,
            Self::Miscellaneous => 2,
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Enhancement => write!(f, "enhancement"),
            Self::Bug => write!(f, "bug"),
            Self::Miscellaneous => write!(f, "misc"),
        }
    }
}

/// Commits partitioned by category.
///
/// Every pushed commit lives in exactly one bucket; each bucket keeps the
/// order commits were pushed in (range order, newest first).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClassifiedChangeSet {
    buckets: [Vec<CommitRecord>; 3],
}

impl ClassifiedChangeSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, category: Category, commit: CommitRecord) {
        self.buckets[category.index()].push(commit);
    }

    pub fn get(&self, category: Category) -> &[CommitRecord] {
        &self.buckets[category.index()]
    }

    /// Buckets in rendering order, empty ones included
    pub fn iter(&self) -> impl Iterator<Item = (Category, &[CommitRecord])> {
        Category::ALL
            .into_iter()
            .map(move |category| (category, self.get(category)))
    }

    pub fn len(&self) -> usize {
        self.buckets.iter().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
