// SPDX-FileCopyrightText: 2026 Sephyi <me@sephy.io>
//
// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0

mod category;
mod commit;
mod release;

pub use category::*;
pub use commit::*;
pub use release::*;
