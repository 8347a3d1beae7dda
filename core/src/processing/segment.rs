use crate::math::StatsHelper;
use crate::race_interface::{DataPoint, Field, LonLat};
use serde::{Deserialize, Serialize};

/// Half-open time range `[start, end)`, epoch ms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Span {
    pub start: i64,
    pub end: i64,
}

/// Points falling inside a span.
#[derive(Debug, Clone)]
pub struct Segment<'a> {
    pub span: Span,
    pub data: Vec<&'a DataPoint>,
}

/// Mean of a field over one time bucket.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bucket {
    pub start: i64,
    pub end: i64,
    pub value: Option<f64>,
}

impl Bucket {
    pub fn span(&self) -> Span {
        Span {
            start: self.start,
            end: self.end,
        }
    }
}

/// Splits sorted points across sorted, non-overlapping spans.
///
/// Points before the current span are dropped, points past its end move on
/// to the next span, and the pass stops once spans run out.
pub fn segment_data<'a>(points: &'a [DataPoint], spans: &[Span]) -> Vec<Segment<'a>> {
    let mut segments: Vec<Segment<'a>> = spans
        .iter()
        .map(|span| Segment {
            span: *span,
            data: Vec::new(),
        })
        .collect();

    let mut j = 0;
    for point in points {
        while j < segments.len() && point.t >= segments[j].span.end {
            j += 1;
        }
        let Some(segment) = segments.get_mut(j) else {
            break;
        };
        if point.t >= segment.span.start {
            segment.data.push(point);
        }
    }

    segments
}

/// Buckets points into fixed `step_ms` windows anchored at the first
/// timestamp and averages `field` in each.
///
/// A bucket closes when a point lands past `start + step_ms`; that point
/// opens the next bucket. The trailing, still-open bucket is not reported.
pub fn summarize_data(points: &[DataPoint], field: Field, step_ms: i64) -> Vec<Bucket> {
    let Some(first) = points.first() else {
        return Vec::new();
    };

    let mut buckets = Vec::new();
    let mut start = first.t;
    let mut values: Vec<f64> = Vec::new();

    for point in points {
        if point.t > start + step_ms {
            buckets.push(Bucket {
                start,
                end: point.t,
                value: StatsHelper::mean(values.drain(..)),
            });
            start = point.t;
        }
        if let Some(value) = point.get(field) {
            values.push(value);
        }
    }

    buckets
}

/// One performance-coloured piece of the sailed track.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrackSegment {
    #[serde(flatten)]
    pub bucket: Bucket,
    pub path: Vec<LonLat>,
}

/// Splits the track into `step_ms` pieces, each carrying its mean
/// performance and the positions it covers.
pub fn performance_track(points: &[DataPoint], step_ms: i64) -> Vec<TrackSegment> {
    let buckets = summarize_data(points, Field::Performance, step_ms);
    let spans: Vec<Span> = buckets.iter().map(Bucket::span).collect();
    buckets
        .into_iter()
        .zip(segment_data(points, &spans))
        .map(|(bucket, segment)| TrackSegment {
            bucket,
            path: segment.data.iter().filter_map(|p| p.position()).collect(),
        })
        .collect()
}

/// Circular mean of `twd` over the first `window` points, used to orient
/// charts with the wind at the top.
pub fn reference_wind_direction(points: &[DataPoint], window: usize) -> Option<f64> {
    let twds: Vec<f64> = points.iter().take(window).filter_map(|p| p.twd).collect();
    StatsHelper::circular_mean(&twds)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn series(values: &[(i64, Option<f64>)]) -> Vec<DataPoint> {
        values
            .iter()
            .map(|&(t, performance)| DataPoint {
                t,
                performance,
                ..Default::default()
            })
            .collect()
    }

    #[test]
    fn segment_drops_leading_points_and_advances() {
        let points = series(&[(0, None), (5, None), (10, None), (15, None), (25, None), (40, None)]);
        let spans = [Span { start: 5, end: 15 }, Span { start: 15, end: 30 }];
        let segments = segment_data(&points, &spans);
        let times = |s: &Segment| s.data.iter().map(|p| p.t).collect::<Vec<_>>();
        assert_eq!(times(&segments[0]), vec![5, 10]);
        assert_eq!(times(&segments[1]), vec![15, 25]);
    }

    #[test]
    fn segment_skips_gap_between_spans() {
        let points = series(&[(1, None), (12, None), (21, None)]);
        let spans = [Span { start: 0, end: 10 }, Span { start: 20, end: 30 }];
        let segments = segment_data(&points, &spans);
        assert_eq!(segments[0].data.len(), 1);
        assert_eq!(segments[1].data.len(), 1);
        assert_eq!(segments[1].data[0].t, 21);
    }

    #[test]
    fn summarize_anchors_on_first_point() {
        let points = series(&[
            (1_000, Some(90.0)),
            (6_000, Some(110.0)),
            (11_000, None),
            (11_500, Some(100.0)),
            (16_000, Some(104.0)),
            (22_000, Some(50.0)),
        ]);
        let buckets = summarize_data(&points, Field::Performance, 10_000);
        assert_eq!(buckets.len(), 2);
        assert_eq!(buckets[0], Bucket { start: 1_000, end: 11_500, value: Some(100.0) });
        assert_eq!(buckets[1].start, 11_500);
        assert_eq!(buckets[1].end, 22_000);
        assert_eq!(buckets[1].value, Some(102.0));
    }

    #[test]
    fn summarize_of_nothing_is_empty() {
        assert!(summarize_data(&[], Field::Performance, 10_000).is_empty());
    }

    #[test]
    fn performance_track_pairs_buckets_with_positions() {
        let mut points = series(&[(0, Some(100.0)), (5_000, Some(90.0)), (10_500, Some(80.0)), (21_000, None)]);
        for (i, p) in points.iter_mut().enumerate() {
            p.lon = Some(-122.0);
            p.lat = Some(47.0 + i as f64 * 0.001);
        }
        points[1].lat = None;
        let track = performance_track(&points, 10_000);
        assert_eq!(track.len(), 2);
        assert_eq!(track[0].bucket.value, Some(95.0));
        assert_eq!(track[0].path, vec![LonLat(-122.0, 47.0)]);
        assert_eq!(track[1].bucket.value, Some(80.0));
        assert_eq!(track[1].path.len(), 1);
    }

    #[test]
    fn reference_direction_uses_leading_window() {
        let mut points: Vec<DataPoint> = (0..4).map(|i| DataPoint::new(i, 0.0)).collect();
        points[0].twd = Some(350.0);
        points[1].twd = Some(10.0);
        points[3].twd = Some(180.0);
        let up = reference_wind_direction(&points, 3).unwrap();
        assert!(up < 1e-9 || 360.0 - up < 1e-9);
        assert_eq!(reference_wind_direction(&points[2..3], 600), None);
    }
}
