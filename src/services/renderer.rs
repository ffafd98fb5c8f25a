// SPDX-FileCopyrightText: 2026 Sephyi <me@sephy.io>
// SPDX-License-Identifier: GPL-3.0-only

use crate::domain::{ChangelogDocument, ClassifiedChangeSet, CommitRecord, ReleaseContext, RepoSlug};

/// Renders classified commits as a markdown changelog entry.
pub struct ChangelogRenderer {
    compare_base: String,
}

impl ChangelogRenderer {
    /// `web_url` is the host root, e.g. `https://github.com`
    pub fn new(web_url: &str, repo: &RepoSlug) -> Self {
        Self {
            compare_base: format!("{}/{}", web_url.trim_end_matches('/'), repo),
        }
    }

    pub fn compare_link(&self, context: &ReleaseContext) -> String {
        format!(
            "[Full Changelog]({}/compare/{}...{})",
            self.compare_base, context.previous_tag, context.new_tag
        )
    }

    /// Link line, then one bold-headed bullet list per non-empty category.
    pub fn render(&self, changes: &ClassifiedChangeSet, context: &ReleaseContext) -> ChangelogDocument {
        let sections: Vec<String> = changes
            .iter()
            .filter(|(_, commits)| !commits.is_empty())
            .map(|(category, commits)| {
                format!("**{}**\n\n{}", category.heading(), bullet_list(commits))
            })
            .collect();

        let mut text = self.compare_link(context);
        text.push_str("\n\n");
        text.push_str(&sections.join("\n"));

        ChangelogDocument::new(text)
    }
}

fn bullet_list(commits: &[CommitRecord]) -> String {
    commits
        .iter()
        .map(|c| format!("- {}\n", c.subject))
        .collect()
}
