// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Fixed fallback shapes
//!
//! All templates share a 10 x 10 m footprint in the local frame. Walls rise to
//! 5 m; the gable ridge runs along y at x = 5, z = 8. Windows and doors are
//! drawn 1 cm in front of the front wall (y = 0.01).

use crate::types::Point3D;

type Ring = &'static [Point3D];

const fn p(x: f64, y: f64, z: f64) -> Point3D {
    Point3D::new(x, y, z)
}

/// Six faces of the 10 x 10 x 5 block: bottom, top, front, back, left, right
pub const BOX: [Ring; 6] = [
    &[p(0.0, 0.0, 0.0), p(10.0, 0.0, 0.0), p(10.0, 10.0, 0.0), p(0.0, 10.0, 0.0)],
    &[p(0.0, 0.0, 5.0), p(10.0, 0.0, 5.0), p(10.0, 10.0, 5.0), p(0.0, 10.0, 5.0)],
    &[p(0.0, 0.0, 0.0), p(10.0, 0.0, 0.0), p(10.0, 0.0, 5.0), p(0.0, 0.0, 5.0)],
    &[p(0.0, 10.0, 0.0), p(10.0, 10.0, 0.0), p(10.0, 10.0, 5.0), p(0.0, 10.0, 5.0)],
    &[p(0.0, 0.0, 0.0), p(0.0, 10.0, 0.0), p(0.0, 10.0, 5.0), p(0.0, 0.0, 5.0)],
    &[p(10.0, 0.0, 0.0), p(10.0, 10.0, 0.0), p(10.0, 10.0, 5.0), p(10.0, 0.0, 5.0)],
];

/// Seven faces of the gable house: bottom, front, back, left, right and the
/// two roof planes
pub const GABLE: [Ring; 7] = [
    &[p(0.0, 0.0, 0.0), p(10.0, 0.0, 0.0), p(10.0, 10.0, 0.0), p(0.0, 10.0, 0.0)],
    &[
        p(0.0, 0.0, 0.0),
        p(10.0, 0.0, 0.0),
        p(10.0, 0.0, 5.0),
        p(5.0, 0.0, 8.0),
        p(0.0, 0.0, 5.0),
    ],
    &[
        p(0.0, 10.0, 0.0),
        p(10.0, 10.0, 0.0),
        p(10.0, 10.0, 5.0),
        p(5.0, 10.0, 8.0),
        p(0.0, 10.0, 5.0),
    ],
    &[p(0.0, 0.0, 0.0), p(0.0, 10.0, 0.0), p(0.0, 10.0, 5.0), p(0.0, 0.0, 5.0)],
    &[p(10.0, 0.0, 0.0), p(10.0, 10.0, 0.0), p(10.0, 10.0, 5.0), p(10.0, 0.0, 5.0)],
    &[p(0.0, 0.0, 5.0), p(5.0, 0.0, 8.0), p(5.0, 10.0, 8.0), p(0.0, 10.0, 5.0)],
    &[p(5.0, 0.0, 8.0), p(10.0, 0.0, 5.0), p(10.0, 10.0, 5.0), p(5.0, 10.0, 8.0)],
];

/// Placeholder window on the front wall
pub const WINDOW: Ring = &[
    p(2.0, 0.01, 2.0),
    p(4.0, 0.01, 2.0),
    p(4.0, 0.01, 4.0),
    p(2.0, 0.01, 4.0),
];

/// Placeholder door on the front wall
pub const DOOR: Ring = &[
    p(7.0, 0.01, 0.0),
    p(9.0, 0.01, 0.0),
    p(9.0, 0.01, 3.0),
    p(7.0, 0.01, 3.0),
];

/// Interior room volume `[2,8] x [2,8] x [0.1,4.9]`, same face order as [`BOX`]
pub const ROOM: [Ring; 6] = [
    &[p(2.0, 2.0, 0.1), p(8.0, 2.0, 0.1), p(8.0, 8.0, 0.1), p(2.0, 8.0, 0.1)],
    &[p(2.0, 2.0, 4.9), p(8.0, 2.0, 4.9), p(8.0, 8.0, 4.9), p(2.0, 8.0, 4.9)],
    &[p(2.0, 2.0, 0.1), p(8.0, 2.0, 0.1), p(8.0, 2.0, 4.9), p(2.0, 2.0, 4.9)],
    &[p(2.0, 8.0, 0.1), p(8.0, 8.0, 0.1), p(8.0, 8.0, 4.9), p(2.0, 8.0, 4.9)],
    &[p(2.0, 2.0, 0.1), p(2.0, 8.0, 0.1), p(2.0, 8.0, 4.9), p(2.0, 2.0, 4.9)],
    &[p(8.0, 2.0, 0.1), p(8.0, 8.0, 0.1), p(8.0, 8.0, 4.9), p(8.0, 2.0, 4.9)],
];
