use fingerframe_core::Quad;

use super::{FrameCandidate, HandPair};
use crate::params::DirectConnectParams;

/// Policy B: the four tracked tips are the frame, connected left index,
/// right index, right thumb, left thumb.
///
/// No proximity test; the frame only has to be wide enough between the
/// index tips and tall enough between the index line and the thumb line.
pub fn build_direct_connect(pair: &HandPair, params: &DirectConnectParams) -> FrameCandidate {
    let width = (pair.right.index.x - pair.left.index.x).abs();
    let index_line = 0.5 * (pair.left.index.y + pair.right.index.y);
    let thumb_line = 0.5 * (pair.left.thumb.y + pair.right.thumb.y);
    let height = (thumb_line - index_line).abs();

    if width > params.min_width && height > params.min_height {
        FrameCandidate::valid(Quad::new(pair.points()))
    } else {
        FrameCandidate::INVALID
    }
}
