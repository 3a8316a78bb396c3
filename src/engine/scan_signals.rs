// src/engine/scan_signals.rs

use std::cmp::Ordering;

use crate::engine::position::Side;

/// Forecast side for step `i` given the previous one: long when the next
/// prediction is above the current actual, short when below. A tie keeps
/// `previous`, so once a direction exists it is never reset to `None`.
pub fn forecast_side(next_predicted: f64, current_actual: f64, previous: Option<Side>) -> Option<Side> {
    match next_predicted.partial_cmp(&current_actual) {
        Some(Ordering::Greater) => Some(Side::Long),
        Some(Ordering::Less) => Some(Side::Short),
        _ => previous,
    }
}

/// Forecast side in effect at each step `0..n-1`. The terminal bar has no
/// forecast, so the result is one shorter than the inputs.
pub fn scan_directions(predicted: &[f64], actual: &[f64]) -> Vec<Option<Side>> {
    let steps = predicted.len().min(actual.len()).saturating_sub(1);
    let mut sides = Vec::with_capacity(steps);
    let mut side = None;
    for i in 0..steps {
        side = forecast_side(predicted[i + 1], actual[i], side);
        sides.push(side);
    }
    sides
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strict_inequality_sets_direction() {
        assert_eq!(forecast_side(2.0, 1.0, None), Some(Side::Long));
        assert_eq!(forecast_side(0.5, 1.0, None), Some(Side::Short));
    }

    #[test]
    fn tie_retains_previous_direction() {
        assert_eq!(forecast_side(1.0, 1.0, None), None);
        assert_eq!(forecast_side(1.0, 1.0, Some(Side::Short)), Some(Side::Short));
    }

    #[test]
    fn scan_carries_direction_across_ties() {
        let predicted = [0.0, 1.0, 3.0, 3.0, 3.0, 1.0];
        let actual = [1.0, 2.0, 3.0, 3.0, 2.0, 2.0];
        assert_eq!(
            scan_directions(&predicted, &actual),
            vec![
                None,              // 1 == 1
                Some(Side::Long),  // 3 > 2
                Some(Side::Long),  // 3 == 3, retained
                Some(Side::Long),  // 3 == 3, retained
                Some(Side::Short), // 1 < 2
            ]
        );
    }

    #[test]
    fn single_point_has_no_steps() {
        assert!(scan_directions(&[1.0], &[1.0]).is_empty());
    }
}
