//! Vertical de-collision of signal labels.

use charter_core::SignalLevel;

/// Resolve label rows so neighbours are at least `spacing` pixels apart.
///
/// `anchors` holds each label's level and the pixel row of its line. Labels
/// are stacked top to bottom in (row, level) order, each pushed down below
/// the previous one as needed. When the stack runs past `bottom` it is
/// shifted back up as a whole. The result is in the same order as `anchors`.
pub fn resolve_label_positions(
    anchors: &[(SignalLevel, f64)],
    spacing: f64,
    top: f64,
    bottom: f64,
) -> Vec<f64> {
    let mut order: Vec<usize> = (0..anchors.len()).collect();
    order.sort_by(|&a, &b| {
        let (level_a, y_a) = anchors[a];
        let (level_b, y_b) = anchors[b];
        y_a.total_cmp(&y_b).then(level_a.cmp(&level_b))
    });

    let mut placed = vec![0.0; anchors.len()];
    let mut previous: Option<f64> = None;
    for &i in &order {
        let y = match previous {
            Some(prev) => anchors[i].1.max(prev + spacing),
            None => anchors[i].1,
        };
        placed[i] = y;
        previous = Some(y);
    }

    if let (Some(&first), Some(&last)) = (order.first(), order.last()) {
        let overflow = placed[last] - bottom;
        if overflow > 0.0 {
            let room = placed[first] - top;
            let shift = overflow.min(room.max(0.0));
            for y in placed.iter_mut() {
                *y -= shift;
            }
        }
    }

    placed
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_far_apart_labels_stay_on_their_lines() {
        let anchors = [
            (SignalLevel::Entry, 300.0),
            (SignalLevel::StopLoss, 500.0),
            (SignalLevel::TakeProfit, 100.0),
        ];
        assert_eq!(
            resolve_label_positions(&anchors, 18.0, 0.0, 800.0),
            vec![300.0, 500.0, 100.0]
        );
    }

    #[test]
    fn test_close_labels_are_separated() {
        let anchors = [
            (SignalLevel::Entry, 400.0),
            (SignalLevel::StopLoss, 405.0),
            (SignalLevel::TakeProfit, 400.0),
        ];
        let placed = resolve_label_positions(&anchors, 18.0, 0.0, 800.0);

        // Equal rows resolve by level order: entry first, then take profit
        assert_eq!(placed[0], 400.0);
        assert_eq!(placed[2], 418.0);
        assert_eq!(placed[1], 436.0);
        assert_eq!(placed, resolve_label_positions(&anchors, 18.0, 0.0, 800.0));
    }

    #[test]
    fn test_stack_shifted_up_at_bottom() {
        let anchors = [
            (SignalLevel::Entry, 795.0),
            (SignalLevel::StopLoss, 796.0),
            (SignalLevel::TakeProfit, 797.0),
        ];
        let placed = resolve_label_positions(&anchors, 18.0, 0.0, 800.0);
        assert_eq!(placed, vec![764.0, 782.0, 800.0]);
    }

    #[test]
    fn test_empty() {
        assert!(resolve_label_positions(&[], 18.0, 0.0, 800.0).is_empty());
    }
}
