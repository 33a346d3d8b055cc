// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Key types for the half-edge arena.
//!
//! Keys are created by `slotmap::SlotMap`; they are `Ord`, and a fresh arena
//! hands them out in insertion order, which is what tie-breaking relies on.

use slotmap::new_key_type;

new_key_type! {
    /// Key for a deduplicated vertex.
    pub struct VertexKey;

    /// Key for one directed side of a segment.
    pub struct HalfEdgeKey;

    /// Key for a closed face found by traversal.
    pub struct FaceKey;
}
