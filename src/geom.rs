use macroquad::prelude::*;

/// Strict AABB overlap: rectangles that only share an edge do not overlap.
///
/// `Rect::overlaps` from macroquad counts touching edges, which would stop
/// an actor that is flush against another one from sliding past it.
#[inline]
pub fn overlaps(a: &Rect, b: &Rect) -> bool {
    a.x < b.x + b.w && a.x + a.w > b.x && a.y < b.y + b.h && a.y + a.h > b.y
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn touching_edges_do_not_overlap() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        assert!(!overlaps(&a, &Rect::new(10.0, 0.0, 5.0, 5.0)));
        assert!(!overlaps(&a, &Rect::new(0.0, -5.0, 5.0, 5.0)));
        assert!(overlaps(&a, &Rect::new(9.5, 9.5, 5.0, 5.0)));
        assert!(overlaps(&a, &Rect::new(2.0, 2.0, 1.0, 1.0)));
    }
}
