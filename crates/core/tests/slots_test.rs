//! Tests for slot generation and reading order.

mod common;

use common::{indexed, random_raster, slot};
use tonefill_core::error::{FillError, Stage};
use tonefill_core::geometry::{Area, EPSILON, HasBBox};
use tonefill_core::params::Tone;
use tonefill_core::raster::Raster;
use tonefill_core::region::extract_regions;
use tonefill_core::slots::{READING_ORDER_DECIMALS, Slot, generate_slots, sort_reading_order};

fn rounded_top(slot: &Slot) -> f64 {
    let scale = 10f64.powi(READING_ORDER_DECIMALS);
    (slot.top * scale).round() / scale
}

fn assert_reading_order(slots: &[Slot]) {
    for (i, s) in slots.iter().enumerate() {
        assert_eq!(s.index, i);
    }
    for (a, b) in slots.iter().zip(slots.iter().skip(1)) {
        let (ta, tb) = (rounded_top(a), rounded_top(b));
        assert!(ta >= tb, "{a:?} before {b:?}");
        if ta == tb {
            assert!(a.left <= b.left, "{a:?} before {b:?}");
        }
    }
}

// ============================================================================
// Two-by-two raster
// ============================================================================

#[test]
fn test_left_column_yields_two_stacked_slots() {
    // Cells enumerated column by column: the left column is black.
    let tones = [0.0, 0.0, 1.0, 1.0];
    let cells = (0..2)
        .flat_map(|col| (0..2).map(move |row| (col, row)))
        .zip(tones)
        .map(|((col, row), tone)| (col, row, tone));
    let raster = Raster::from_cells(2, 2, cells).unwrap();
    let map = extract_regions(&raster, 0.5, Tone::Dark).unwrap();
    assert_eq!(map.target, Area::from_rect((0.0, 0.0, 1.0, 2.0)));

    let slots = generate_slots(&map.target, 2.0, 2.0, 1.0).unwrap();
    assert_eq!(
        slots,
        vec![
            Slot {
                index: 0,
                ..slot(0.0, 1.0, 1.0, 2.0)
            },
            Slot {
                index: 1,
                ..slot(0.0, 0.0, 1.0, 1.0)
            },
        ]
    );
}

// ============================================================================
// Shapes
// ============================================================================

#[test]
fn test_u_shape_gives_two_slots_per_arm_row() {
    let u = Area::from_rects([
        (0.0, 0.0, 30.0, 10.0),
        (0.0, 10.0, 10.0, 30.0),
        (20.0, 10.0, 30.0, 30.0),
    ]);
    let slots = generate_slots(&u, 30.0, 30.0, 10.0).unwrap();
    let boxes: Vec<_> = slots.iter().map(HasBBox::bbox).collect();
    assert_eq!(
        boxes,
        vec![
            (0.0, 20.0, 10.0, 30.0),
            (20.0, 20.0, 30.0, 30.0),
            (0.0, 10.0, 10.0, 20.0),
            (20.0, 10.0, 30.0, 20.0),
            (0.0, 0.0, 30.0, 10.0),
        ]
    );
    assert_reading_order(&slots);
}

#[test]
fn test_slots_are_clipped_to_output_width() {
    let wide = Area::from_rect((-5.0, 0.0, 50.0, 10.0));
    let slots = generate_slots(&wide, 20.0, 10.0, 10.0).unwrap();
    assert_eq!(slots.len(), 1);
    assert_eq!(slots[0].bbox(), (0.0, 0.0, 20.0, 10.0));
}

#[test]
fn test_scanline_on_shared_edge_merges_both_sides() {
    // A staircase whose step sits exactly on the scanline.
    let stairs = Area::from_rects([(0.0, 0.0, 10.0, 5.0), (5.0, 5.0, 20.0, 10.0)]);
    let slots = generate_slots(&stairs, 20.0, 10.0, 10.0).unwrap();
    assert_eq!(slots.len(), 1);
    assert_eq!(slots[0].bbox(), (0.0, 0.0, 20.0, 10.0));
}

#[test]
fn test_empty_area_gives_no_slots() {
    let slots = generate_slots(&Area::empty(), 10.0, 10.0, 2.0).unwrap();
    assert!(slots.is_empty());
}

#[test]
fn test_thin_feature_between_scanlines_is_missed() {
    let sliver = Area::from_rect((0.0, 6.0, 10.0, 9.0));
    let slots = generate_slots(&sliver, 10.0, 20.0, 10.0).unwrap();
    assert!(slots.is_empty());
}

#[test]
fn test_non_positive_line_height_is_rejected() {
    let area = Area::from_rect((0.0, 0.0, 1.0, 1.0));
    for bad in [0.0, -1.0, f64::NAN] {
        let err = generate_slots(&area, 1.0, 1.0, bad).unwrap_err();
        assert!(matches!(
            err,
            FillError::Configuration {
                name: "line_height",
                ..
            }
        ));
        assert_eq!(err.stage(), Some(Stage::Slots));
    }
}

// ============================================================================
// Reading order
// ============================================================================

#[test]
fn test_random_areas_are_read_top_down_left_right() {
    for seed in 1..=10u64 {
        let raster = random_raster(seed * 104_729, 12, 9).with_extent(120.0, 90.0);
        let map = extract_regions(&raster, 0.5, Tone::Dark).unwrap();
        let slots = generate_slots(&map.target, 120.0, 90.0, 7.0).unwrap();
        assert_reading_order(&slots);

        for s in &slots {
            assert!((s.height() - 7.0).abs() < EPSILON, "{s:?}");
            assert!(s.left >= 0.0 && s.right <= 120.0, "{s:?}");
            // The middle of every slot sits on the area.
            let mid_y = (s.bottom + s.top) / 2.0;
            assert!(map.target.contains_point((s.left + s.right) / 2.0, mid_y));
        }
    }
}

#[test]
fn test_sort_is_stable_for_equal_keys() {
    let mut slots = vec![
        slot(0.0, 0.0, 4.0, 1.0),
        slot(0.0, 0.0, 9.0, 1.0),
        slot(2.0, 5.0, 3.0, 6.0),
        slot(0.0, 0.0, 6.0, 1.0),
    ];
    sort_reading_order(&mut slots);
    let rights: Vec<f64> = slots.iter().map(|s| s.right).collect();
    assert_eq!(rights, vec![3.0, 4.0, 9.0, 6.0]);
    assert_eq!(slots.iter().map(|s| s.index).collect::<Vec<_>>(), vec![0, 1, 2, 3]);
}

#[test]
fn test_nearly_equal_tops_share_a_row() {
    let mut slots = indexed([slot(5.0, 0.0, 6.0, 10.0002), slot(1.0, 0.0, 2.0, 10.0001)]);
    sort_reading_order(&mut slots);
    assert_eq!(slots[0].left, 1.0);
    assert_eq!(slots[1].left, 5.0);
}
