//! Shared assertions over liquid state.

use decant::LiquidWorld;

/// Asserts every vessel's fill level lies in `[0, 1]`.
///
/// # Panics
/// Panics naming the first vessel outside the range.
pub fn assert_fill_in_range(world: &LiquidWorld) {
    for &id in world.ids() {
        let Some(vessel) = world.get(id) else {
            continue;
        };
        let fill = vessel.container.fill_percent();
        assert!(
            (0.0..=1.0).contains(&fill),
            "vessel {id:?} fill {fill} outside [0, 1]"
        );
    }
}

/// Asserts two litre amounts agree within `1e-5`.
///
/// # Panics
/// Panics with both values if they differ.
pub fn assert_litres_close(actual: f32, expected: f32) {
    assert!(
        (actual - expected).abs() <= 1e-5,
        "expected {expected} L, got {actual} L"
    );
}
