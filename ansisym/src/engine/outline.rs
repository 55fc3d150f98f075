use super::view::NormalBlockView;
use super::NECK_INDENT;
use crate::geometry::{Point, Stroke, BOX_LINE_WIDTH};

fn edge(x1: i32, y1: i32, x2: i32, y2: i32) -> Stroke {
    Stroke::new(Point::new(x1, y1), Point::new(x2, y2)).with_width(BOX_LINE_WIDTH)
}

impl NormalBlockView<'_> {
    /// Strokes of the block outline. Without a neck this is a plain box;
    /// with one, the sides step in to the neck indents.
    pub(crate) fn outline(&self) -> Vec<Stroke> {
        let Some(lo) = self.rect else {
            return Vec::new();
        };
        let mut out = vec![edge(lo.x, lo.top(), lo.right(), lo.top())];

        let neck = self
            .find_neck()
            .and_then(|(band, at_bottom)| band.rect.map(|r| (r, at_bottom)));
        let Some((neck, at_bottom)) = neck else {
            out.push(edge(lo.x, lo.y, lo.x, lo.top()));
            out.push(edge(lo.x, lo.y, lo.right(), lo.y));
            out.push(edge(lo.right(), lo.y, lo.right(), lo.top()));
            return out;
        };

        let left_indent = neck.x + NECK_INDENT;
        let right_indent = neck.right() - NECK_INDENT;
        out.push(edge(lo.x, lo.top(), lo.x, neck.top()));
        out.push(edge(lo.right(), lo.top(), lo.right(), neck.top()));
        out.push(edge(lo.x, neck.top(), left_indent, neck.top()));
        out.push(edge(lo.right(), neck.top(), right_indent, neck.top()));
        out.push(edge(left_indent, neck.top(), left_indent, neck.y));
        out.push(edge(right_indent, neck.top(), right_indent, neck.y));

        if at_bottom {
            out.push(edge(left_indent, lo.y, right_indent, lo.y));
        } else {
            out.push(edge(lo.x, neck.y, lo.right(), neck.y));
            out.push(edge(lo.x, lo.y, lo.x, neck.y));
            out.push(edge(lo.right(), lo.y, lo.right(), neck.y));
            out.push(edge(lo.x, lo.y, lo.right(), lo.y));
        }
        out
    }
}
