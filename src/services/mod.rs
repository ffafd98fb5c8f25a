// SPDX-FileCopyrightText: 2026 Sephyi <me@sephy.io>
//
// SPDX-License-Identifier: GPL-3.0-only

pub mod changelog;
pub mod classifier;
pub mod executor;
pub mod git;
pub mod github;
pub mod issue_ref;
pub mod release;
pub mod renderer;
pub mod version;
