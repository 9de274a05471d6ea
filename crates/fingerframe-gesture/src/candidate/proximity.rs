use fingerframe_core::{midpoint, Point, Quad};

use super::{FrameCandidate, HandPair};
use crate::params::ProximityRectParams;

/// Policy A: two fingertip pairs in contact span an axis-aligned box.
///
/// Both the same-type pairing (index-index, thumb-thumb) and the
/// criss-cross pairing (index-thumb, thumb-index) are tried; when both
/// qualify the tighter one wins. The box corners are the midpoints of the
/// two matched pairs.
pub fn build_proximity_rect(pair: &HandPair, params: &ProximityRectParams) -> FrameCandidate {
    let d = pair.tip_distances();
    let limit = params.contact_distance;
    let same = d.same_pairing();
    let cross = d.cross_pairing();

    let use_same = match (same < limit, cross < limit) {
        (false, false) => return FrameCandidate::INVALID,
        (true, false) => true,
        (false, true) => false,
        (true, true) => same <= cross,
    };

    let (a, b): (Point, Point) = if use_same {
        (
            midpoint(pair.left.index, pair.right.index),
            midpoint(pair.left.thumb, pair.right.thumb),
        )
    } else {
        (
            midpoint(pair.left.index, pair.right.thumb),
            midpoint(pair.left.thumb, pair.right.index),
        )
    };

    let quad = Quad::axis_aligned(a, b);
    if quad.width() < params.min_size || quad.height() < params.min_size {
        return FrameCandidate::INVALID;
    }
    FrameCandidate::valid(quad)
}
