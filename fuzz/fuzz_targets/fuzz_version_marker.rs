// SPDX-FileCopyrightText: 2026 Sephyi <me@sephy.io>
//
// SPDX-License-Identifier: GPL-3.0-only

#![no_main]

use libfuzzer_sys::fuzz_target;
use tagcut::services::version::{find_version, rewrite_version};

fuzz_target!(|data: &[u8]| {
    let Ok(content) = std::str::from_utf8(data) else {
        return;
    };
    match rewrite_version(content, "9.9.9") {
        Some(rewritten) => assert_eq!(find_version(&rewritten), Some("9.9.9")),
        None => assert!(find_version(content).is_none()),
    }
});
