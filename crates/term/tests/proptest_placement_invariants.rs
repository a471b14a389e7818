use proptest::prelude::*;

use tui_tiles_term::types::ResizeEvent;
use tui_tiles_term::{compute_placement, orientation, Orientation};

fn available() -> impl Strategy<Value = ResizeEvent> {
    (0.0f64..2000.0, 0.0f64..2000.0, -500.0f64..500.0, -500.0f64..500.0)
        .prop_map(|(h, w, left, top)| ResizeEvent::new(h, w, left, top))
}

proptest! {
    #[test]
    fn placement_stays_inside_the_available_box(
        cw in 1u32..5000,
        ch in 1u32..5000,
        avail in available(),
    ) {
        let p = compute_placement(cw, ch, &avail);
        let eps = 1e-9 * (1.0 + avail.width + avail.height);

        prop_assert!(p.width >= 0.0 && p.height >= 0.0);
        prop_assert!(p.left >= avail.left - eps);
        prop_assert!(p.top >= avail.top - eps);
        prop_assert!(p.left + p.width <= avail.left + avail.width + eps);
        prop_assert!(p.top + p.height <= avail.top + avail.height + eps);
    }

    #[test]
    fn placement_preserves_aspect_and_fills_the_short_side(
        cw in 1u32..5000,
        ch in 1u32..5000,
        avail in available(),
    ) {
        let p = compute_placement(cw, ch, &avail);
        let side = avail.width.min(avail.height);

        match orientation(cw, ch) {
            Orientation::Horizontal => prop_assert_eq!(p.width, side),
            Orientation::Vertical => prop_assert_eq!(p.height, side),
        }

        if p.width > 0.0 && p.height > 0.0 {
            let want = f64::from(cw) / f64::from(ch);
            let got = p.width / p.height;
            prop_assert!((got - want).abs() <= want * 1e-9, "got {got}, want {want}");
        }
    }

    #[test]
    fn placement_is_centered(
        cw in 1u32..5000,
        ch in 1u32..5000,
        avail in available(),
    ) {
        let p = compute_placement(cw, ch, &avail);
        let eps = 1e-9 * (1.0 + avail.width + avail.height);
        let left_bar = p.left - avail.left;
        let right_bar = avail.left + avail.width - (p.left + p.width);
        let top_bar = p.top - avail.top;
        let bottom_bar = avail.top + avail.height - (p.top + p.height);
        prop_assert!((left_bar - right_bar).abs() <= eps);
        prop_assert!((top_bar - bottom_bar).abs() <= eps);
    }
}
