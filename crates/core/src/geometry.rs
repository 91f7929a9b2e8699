use crate::types::Rect;

/// Intersection of two rectangles, or `None` when they do not overlap.
///
/// Rectangles that merely touch along an edge do not overlap.
pub fn intersect(a: &Rect, b: &Rect) -> Option<Rect> {
    let ix0 = a.x0.max(b.x0);
    let iy0 = a.y0.max(b.y0);
    let ix1 = a.x1.min(b.x1);
    let iy1 = a.y1.min(b.y1);

    if ix0 >= ix1 || iy0 >= iy1 {
        return None;
    }

    Some(Rect::new(ix0, iy0, ix1, iy1))
}

/// Fraction of `word` covered by `bx`: intersection area / word area.
///
/// Returns 0.0 for disjoint rectangles and for words with no area.
pub fn overlap_ratio(word: &Rect, bx: &Rect) -> f64 {
    let word_area = word.area();
    if word_area <= 0.0 {
        return 0.0;
    }

    match intersect(word, bx) {
        Some(inter) => inter.area() / word_area,
        None => 0.0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_intersect_overlapping() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        let b = Rect::new(5.0, 5.0, 15.0, 15.0);
        assert_eq!(intersect(&a, &b), Some(Rect::new(5.0, 5.0, 10.0, 10.0)));
    }

    #[test]
    fn test_intersect_disjoint() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        let b = Rect::new(20.0, 20.0, 30.0, 30.0);
        assert_eq!(intersect(&a, &b), None);
    }

    #[test]
    fn test_intersect_touching_edges() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        let b = Rect::new(10.0, 0.0, 20.0, 10.0);
        assert_eq!(intersect(&a, &b), None, "shared edge is not an overlap");
    }

    #[test]
    fn test_overlap_ratio_word_inside_box() {
        let word = Rect::new(110.0, 102.0, 190.0, 118.0);
        let bx = Rect::new(100.0, 100.0, 200.0, 120.0);
        assert_eq!(overlap_ratio(&word, &bx), 1.0);
    }

    #[test]
    fn test_overlap_ratio_disjoint_is_zero() {
        let word = Rect::new(0.0, 0.0, 10.0, 10.0);
        let bx = Rect::new(50.0, 50.0, 60.0, 60.0);
        assert_eq!(overlap_ratio(&word, &bx), 0.0);
    }

    #[test]
    fn test_overlap_ratio_half_covered() {
        let word = Rect::new(0.0, 0.0, 10.0, 10.0);
        let bx = Rect::new(5.0, -5.0, 20.0, 20.0);
        assert!((overlap_ratio(&word, &bx) - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_overlap_ratio_degenerate_word() {
        let word = Rect::new(5.0, 5.0, 5.0, 10.0);
        let bx = Rect::new(0.0, 0.0, 20.0, 20.0);
        assert_eq!(overlap_ratio(&word, &bx), 0.0);
    }

    #[test]
    fn test_overlap_ratio_monotonic_as_box_grows() {
        let word = Rect::new(10.0, 10.0, 30.0, 20.0);
        let mut previous = 0.0;
        for step in 0..=20 {
            let right = 10.0 + step as f64;
            let bx = Rect::new(0.0, 0.0, right, 30.0);
            let ratio = overlap_ratio(&word, &bx);
            assert!(
                ratio >= previous,
                "ratio decreased from {previous} to {ratio} at right edge {right}"
            );
            previous = ratio;
        }
        assert_eq!(previous, 1.0, "box containing the word covers it fully");
    }
}
