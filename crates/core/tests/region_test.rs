//! Tests for region extraction and the region buffer.

mod common;

use common::{random_raster, raster_from_art};
use tonefill_core::error::{FillError, Stage};
use tonefill_core::geometry::{Area, EPSILON, approx_eq};
use tonefill_core::params::Tone;
use tonefill_core::raster::Raster;
use tonefill_core::region::{buffer_area, extract_regions};

// ============================================================================
// Classification and partition
// ============================================================================

#[test]
fn test_classes_partition_random_rasters() {
    for seed in 1..=12u64 {
        let raster = random_raster(seed * 7919, 9, 6).with_extent(90.0, 30.0);
        let threshold = (seed as f64) / 13.0;
        let map = extract_regions(&raster, threshold, Tone::Dark).unwrap();

        let overlap = map.target.intersection(&map.non_target).area();
        assert!(overlap < EPSILON, "seed {seed}: classes overlap by {overlap}");

        let full = Area::from_rect((0.0, 0.0, 90.0, 30.0));
        assert_eq!(map.target.union(&map.non_target), full, "seed {seed}");

        for cell in raster.cells() {
            let (cx, cy) = (
                cell.x + raster.cell_width() / 2.0,
                cell.y + raster.cell_height() / 2.0,
            );
            let in_target = map.target.contains_point(cx, cy);
            let in_other = map.non_target.contains_point(cx, cy);
            assert!(in_target != in_other, "seed {seed}: cell {cell:?}");
            assert_eq!(in_target, cell.tone <= threshold, "seed {seed}: cell {cell:?}");
        }

        let region_area: f64 = map.regions.iter().map(|r| r.area.area()).sum();
        assert!(approx_eq(region_area, 90.0 * 30.0, 1e-6));
    }
}

#[test]
fn test_light_target_swaps_classes() {
    let raster = random_raster(42, 8, 8);
    let dark = extract_regions(&raster, 0.4, Tone::Dark).unwrap();
    let light = extract_regions(&raster, 0.4, Tone::Light).unwrap();
    assert_eq!(dark.target, light.non_target);
    assert_eq!(dark.non_target, light.target);
}

#[test]
fn test_threshold_boundary_is_dark() {
    let raster = Raster::new(2, 1, vec![0.5, 0.6]).unwrap();
    let map = extract_regions(&raster, 0.5, Tone::Dark).unwrap();
    assert_eq!(map.target, Area::from_rect((0.0, 0.0, 1.0, 1.0)));

    let map = extract_regions(&raster, 0.5, Tone::Light).unwrap();
    assert_eq!(map.target, Area::from_rect((1.0, 0.0, 2.0, 1.0)));
}

#[test]
fn test_threshold_out_of_range_is_rejected() {
    let raster = random_raster(3, 2, 2);
    let err = extract_regions(&raster, 1.5, Tone::Dark).unwrap_err();
    assert!(matches!(
        err,
        FillError::Configuration {
            name: "threshold",
            ..
        }
    ));
    assert_eq!(err.stage(), Some(Stage::Extract));
}

#[test]
fn test_non_finite_buffer_is_rejected() {
    let area = Area::from_rect((0.0, 0.0, 4.0, 4.0));
    let err = buffer_area(&area, f64::INFINITY).unwrap_err();
    assert!(matches!(err, FillError::Configuration { name: "buffer", .. }));
    assert_eq!(err.stage(), Some(Stage::Buffer));
}

// ============================================================================
// Connected regions
// ============================================================================

#[test]
fn test_checkerboard_regions_touch_only_at_corners() {
    let raster = raster_from_art(&["#.#", ".#.", "#.#"]);
    let map = extract_regions(&raster, 0.5, Tone::Dark).unwrap();
    assert_eq!(map.target_regions().count(), 5);
    assert_eq!(map.regions.len(), 9);
    assert!(map.regions.iter().all(|r| approx_eq(r.area.area(), 1.0, EPSILON)));
}

#[test]
fn test_regions_are_ordered_top_to_bottom_left_to_right() {
    let raster = raster_from_art(&[
        "..##", //
        "#...", //
        "#..#",
    ]);
    let map = extract_regions(&raster, 0.5, Tone::Dark).unwrap();
    let targets: Vec<_> = map
        .target_regions()
        .map(|r| r.area.bbox().unwrap())
        .collect();
    assert_eq!(
        targets,
        vec![
            (2.0, 2.0, 4.0, 3.0),
            (0.0, 0.0, 1.0, 2.0),
            (3.0, 0.0, 4.0, 1.0),
        ]
    );
    // The white background is a single region.
    assert_eq!(map.regions.iter().filter(|r| !r.target).count(), 1);
}

#[test]
fn test_merged_target_has_no_internal_seams() {
    let raster = raster_from_art(&["###", "###"]).with_extent(30.0, 20.0);
    let map = extract_regions(&raster, 0.5, Tone::Dark).unwrap();
    assert_eq!(map.target, Area::from_rect((0.0, 0.0, 30.0, 20.0)));
    assert_eq!(map.target.bands().len(), 1);
    assert!(map.non_target.is_empty());
}

// ============================================================================
// Region buffer
// ============================================================================

#[test]
fn test_buffer_zero_is_equivalent() {
    let raster = random_raster(99, 10, 10);
    let map = extract_regions(&raster, 0.5, Tone::Dark).unwrap();
    let usable = buffer_area(&map.target, 0.0).unwrap();
    assert_eq!(usable, map.target);
}

#[test]
fn test_buffer_grows_and_shrinks() {
    let raster = raster_from_art(&[
        "....", //
        ".##.", //
        ".##.", //
        "....",
    ])
    .with_extent(40.0, 40.0);
    let map = extract_regions(&raster, 0.5, Tone::Dark).unwrap();

    let grown = buffer_area(&map.target, 5.0).unwrap();
    assert_eq!(grown, Area::from_rect((5.0, 5.0, 35.0, 35.0)));

    let shrunk = buffer_area(&map.target, -5.0).unwrap();
    assert!(approx_eq(shrunk.area(), 100.0, 1e-6));
    assert_eq!(shrunk.bbox(), Some((15.0, 15.0, 25.0, 25.0)));
}

#[test]
fn test_buffer_eroding_everything_is_a_geometry_error() {
    let raster = raster_from_art(&["#."]);
    let map = extract_regions(&raster, 0.5, Tone::Dark).unwrap();
    let err = buffer_area(&map.target, -1.0).unwrap_err();
    assert_eq!(err.stage(), Some(Stage::Buffer));
    assert!(err.is_empty_area());
}
