// SPDX-FileCopyrightText: 2026 Sephyi <me@sephy.io>
//
// SPDX-License-Identifier: GPL-3.0-only

#![no_main]

use libfuzzer_sys::fuzz_target;
use tagcut::services::issue_ref::extract_issue;

fuzz_target!(|data: &[u8]| {
    if let Ok(subject) = std::str::from_utf8(data) {
        if let Some(number) = extract_issue(subject) {
            assert!(number > 0);
            assert!(subject.contains('#'));
        }
    }
});
