// SPDX-FileCopyrightText: 2026 Sephyi <me@sephy.io>
//
// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0

use std::sync::LazyLock;

use regex::Regex;

/// Optional closing verb, then `#<digits>`. The verb never changes which
/// number is captured; it is matched so a closing reference is preferred
/// as the match span.
static ISSUE_REF: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?:(?:fix(?:es|ed)?|close[sd]?|resolve[sd]?)\s+)?#([0-9]+)").unwrap()
});

/// Issue number referenced by a commit subject.
///
/// Only the first reference counts: `"fixes #3, #4"` yields `3`. A first
/// reference that is `#0` or too large for `u64` yields `None` even when a
/// valid one follows, so `"#0 fixes #5"` has no issue.
pub fn extract_issue(subject: &str) -> Option<u64> {
    let caps = ISSUE_REF.captures(subject)?;
    caps[1].parse::<u64>().ok().filter(|n| *n > 0)
}
