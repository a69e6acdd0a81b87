//! Property-based invariant tests for the coordinate mapper and frame statistics.
//!
//! 1. Any pointer, finite or not, maps inside the grid.
//! 2. Pointers at or past the bottom-right corner map to the last cell.
//! 3. Pointers inside the drawn area map to the cell drawn under them.
//! 4. History length is `min(calls, 100)`.
//! 5. `mean`, `min`, and `max` describe exactly the retained history.
//! 6. Samples older than the window no longer influence the report.

use std::time::Duration;

use lifecanvas_core::{
    BoundingBox, CellIndex, FRAME_HISTORY_CAPACITY, FrameStats, GridSize, PointerEvent,
    map_to_cell,
};
use proptest::prelude::*;

// ── Helpers ─────────────────────────────────────────────────────────────

fn grid_strategy() -> impl Strategy<Value = GridSize> {
    (1u32..=256, 1u32..=256).prop_map(|(w, h)| GridSize::new(w, h).unwrap())
}

fn any_coord() -> impl Strategy<Value = f64> {
    prop_oneof![
        8 => -1.0e6f64..1.0e6,
        1 => Just(f64::NAN),
        1 => Just(f64::INFINITY),
        1 => Just(f64::NEG_INFINITY),
    ]
}

fn deltas_ms() -> impl Strategy<Value = Vec<u64>> {
    prop::collection::vec(1u64..=200, 1..=300)
}

fn feed(deltas: &[u64]) -> (FrameStats, Vec<f64>) {
    let mut stats = FrameStats::new(Duration::ZERO);
    let mut now = Duration::ZERO;
    let mut expected = Vec::with_capacity(deltas.len());
    for &d in deltas {
        now += Duration::from_millis(d);
        stats.record(now);
        expected.push(1000.0 / d as f64);
    }
    (stats, expected)
}

// ═════════════════════════════════════════════════════════════════════════
// 1. Any pointer maps inside the grid
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn mapped_cell_is_always_in_range(
        grid in grid_strategy(),
        cell_size in 1u32..=16,
        x in any_coord(),
        y in any_coord(),
        left in -500.0f64..500.0,
        top in -500.0f64..500.0,
        display_scale in 0.25f64..4.0,
    ) {
        let px_w = f64::from(grid.width * cell_size);
        let px_h = f64::from(grid.height * cell_size);
        let bounds = BoundingBox::new(left, top, px_w * display_scale, px_h * display_scale);
        let cell = map_to_cell(PointerEvent::new(x, y), bounds, px_w, px_h, f64::from(cell_size), grid);
        prop_assert!(cell.row < grid.height, "row {} out of range for {:?}", cell.row, grid);
        prop_assert!(cell.col < grid.width, "col {} out of range for {:?}", cell.col, grid);
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 2. At or beyond the bottom-right corner
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn bottom_right_and_beyond_clamps_to_last_cell(
        grid in grid_strategy(),
        cell_size in 1u32..=16,
        extra_x in 0.0f64..10_000.0,
        extra_y in 0.0f64..10_000.0,
    ) {
        let px_w = f64::from(grid.width * cell_size);
        let px_h = f64::from(grid.height * cell_size);
        let bounds = BoundingBox::new(0.0, 0.0, px_w, px_h);
        let cell = map_to_cell(
            PointerEvent::new(px_w + extra_x, px_h + extra_y),
            bounds,
            px_w,
            px_h,
            f64::from(cell_size),
            grid,
        );
        prop_assert_eq!(cell, CellIndex { row: grid.height - 1, col: grid.width - 1 });
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 3. Inside the drawn area
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn interior_pointer_hits_drawn_cell(
        grid in grid_strategy(),
        cell_size in 1u32..=16,
        row_frac in 0.0f64..1.0,
        col_frac in 0.0f64..1.0,
    ) {
        let row = ((row_frac * f64::from(grid.height)) as u32).min(grid.height - 1);
        let col = ((col_frac * f64::from(grid.width)) as u32).min(grid.width - 1);
        let size = f64::from(cell_size);
        let px_w = f64::from(grid.width * cell_size);
        let px_h = f64::from(grid.height * cell_size);
        // Centre of the target cell.
        let x = (f64::from(col) + 0.5) * size;
        let y = (f64::from(row) + 0.5) * size;
        let cell = map_to_cell(
            PointerEvent::new(x, y),
            BoundingBox::new(0.0, 0.0, px_w, px_h),
            px_w,
            px_h,
            size,
            grid,
        );
        prop_assert_eq!(cell, CellIndex { row, col });
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 4. History length
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn history_length_is_bounded(deltas in deltas_ms()) {
        let (stats, _) = feed(&deltas);
        prop_assert_eq!(stats.len(), deltas.len().min(FRAME_HISTORY_CAPACITY));
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 5. Aggregates describe the retained history
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn aggregates_match_window(deltas in deltas_ms()) {
        let (stats, expected) = feed(&deltas);
        let window = &expected[expected.len().saturating_sub(FRAME_HISTORY_CAPACITY)..];
        let report = stats.report().unwrap();

        let mean = window.iter().sum::<f64>() / window.len() as f64;
        let min = window.iter().copied().fold(f64::INFINITY, f64::min);
        let max = window.iter().copied().fold(f64::NEG_INFINITY, f64::max);

        prop_assert!((report.mean - mean).abs() < 1e-6 * mean.max(1.0));
        prop_assert!((report.min - min).abs() < 1e-9 * min.max(1.0));
        prop_assert!((report.max - max).abs() < 1e-9 * max.max(1.0));
        prop_assert_eq!(report.samples, window.len());

        let samples: Vec<f64> = stats.samples().collect();
        prop_assert_eq!(samples.len(), window.len());
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 6. Evicted samples are forgotten
// ═════════════════════════════════════════════════════════════════════════

#[test]
fn first_sample_leaves_after_101_records() {
    // One very fast frame first, then a steady 20 ms.
    let mut deltas = vec![1u64];
    deltas.extend(std::iter::repeat_n(20, FRAME_HISTORY_CAPACITY));
    let (stats, _) = feed(&deltas);
    let report = stats.report().unwrap();
    assert_eq!(stats.len(), FRAME_HISTORY_CAPACITY);
    assert!((report.max - 50.0).abs() < 1e-9, "max still sees 1000 fps: {report:?}");
    assert!((report.mean - 50.0).abs() < 1e-9);
}
