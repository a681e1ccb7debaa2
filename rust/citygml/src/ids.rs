// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Opaque element identifiers

use uuid::Uuid;

/// Fresh identifier of the form `<prefix>_<32 hex digits>`
///
/// Identifiers carry no meaning beyond uniqueness.
pub fn new_id(prefix: &str) -> String {
    format!("{}_{}", prefix, Uuid::new_v4().simple())
}
