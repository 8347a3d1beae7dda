use crate::race_interface::DataPoint;

/// Points from the first at or after `from` through the first at or after
/// `to`, inclusive. `points` must be sorted by `t`.
pub fn slice_between_times(points: &[DataPoint], from: i64, to: i64) -> &[DataPoint] {
    let from_idx = points.partition_point(|p| p.t < from);
    let to_idx = points.partition_point(|p| p.t < to);
    let end = (to_idx + 1).min(points.len());
    if from_idx >= end {
        return &[];
    }
    &points[from_idx..end]
}

/// Points from `before_s` seconds ahead of `time` to `after_s` seconds past it.
pub fn slice_around_time(points: &[DataPoint], time: i64, before_s: f64, after_s: f64) -> &[DataPoint] {
    let from = time - (before_s * 1000.0).round() as i64;
    let to = time + (after_s * 1000.0).round() as i64;
    slice_between_times(points, from, to)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(times: &[i64]) -> Vec<DataPoint> {
        times.iter().map(|&t| DataPoint::new(t, 0.0)).collect()
    }

    #[test]
    fn includes_first_point_past_upper_bound() {
        let points = at(&[0, 1_000, 2_000, 3_000, 4_000]);
        let slice = slice_between_times(&points, 500, 2_500);
        let times: Vec<i64> = slice.iter().map(|p| p.t).collect();
        assert_eq!(times, vec![1_000, 2_000, 3_000]);
    }

    #[test]
    fn exact_bounds_are_inclusive() {
        let points = at(&[0, 1_000, 2_000, 3_000]);
        assert_eq!(slice_between_times(&points, 1_000, 2_000).len(), 2);
    }

    #[test]
    fn clamps_at_series_edges() {
        let points = at(&[0, 1_000, 2_000]);
        assert_eq!(slice_around_time(&points, 1_000, 30.0, 120.0).len(), 3);
        assert!(slice_between_times(&points, 5_000, 9_000).is_empty());
        assert!(slice_between_times(&[], 0, 1).is_empty());
    }
}
