// SPDX-FileCopyrightText: 2026 Sephyi <me@sephy.io>
//
// SPDX-License-Identifier: GPL-3.0-only

#![no_main]

use libfuzzer_sys::fuzz_target;
use tagcut::services::git::parse_commit_log;

fuzz_target!(|data: &[u8]| {
    let output = String::from_utf8_lossy(data);
    for commit in parse_commit_log(&output) {
        assert!(commit.id.len() == 40 || commit.id.len() == 64);
        assert!(!commit.subject.is_empty());
        assert!(!commit.subject.contains('\n'));
    }
});
