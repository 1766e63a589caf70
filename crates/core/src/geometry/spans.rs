//! Operations on sorted lists of horizontal spans.

use itertools::Itertools;
use smallvec::SmallVec;

use super::{EPSILON, Span};

pub(crate) type Spans = SmallVec<[Span; 4]>;

/// Boolean operation applied slab by slab.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum SetOp {
    Union,
    Intersection,
    Difference,
}

impl SetOp {
    fn keep(self, in_a: bool, in_b: bool) -> bool {
        match self {
            SetOp::Union => in_a || in_b,
            SetOp::Intersection => in_a && in_b,
            SetOp::Difference => in_a && !in_b,
        }
    }
}

/// Sorts spans and merges overlapping or touching ones. Empty spans are dropped.
pub(crate) fn normalize(spans: &mut Spans) {
    spans.retain(|s| s.1 - s.0 > EPSILON);
    spans.sort_by(|a, b| a.0.total_cmp(&b.0));
    let mut merged = Spans::with_capacity(spans.len());
    for span in spans.drain(..) {
        match merged.last_mut() {
            Some(last) if span.0 <= last.1 => last.1 = last.1.max(span.1),
            _ => merged.push(span),
        }
    }
    *spans = merged;
}

/// True if `x` lies in one of the normalized `spans` (endpoints included).
pub(crate) fn contains(spans: &[Span], x: f64) -> bool {
    let idx = spans.partition_point(|s| s.1 < x);
    idx < spans.len() && spans[idx].0 <= x
}

/// Combines two normalized span lists with a boolean operation.
pub(crate) fn combine(a: &[Span], b: &[Span], op: SetOp) -> Spans {
    let mut xs: Vec<f64> = a.iter().chain(b).flat_map(|&(x0, x1)| [x0, x1]).collect();
    xs.sort_by(f64::total_cmp);
    xs.dedup();

    let mut out = Spans::new();
    for (x0, x1) in xs.into_iter().tuple_windows() {
        let mid = (x0 + x1) / 2.0;
        if !op.keep(contains(a, mid), contains(b, mid)) {
            continue;
        }
        match out.last_mut() {
            Some(last) if last.1 == x0 => last.1 = x1,
            _ => out.push((x0, x1)),
        }
    }
    out.retain(|s| s.1 - s.0 > EPSILON);
    out
}

#[cfg(test)]
mod tests {
    use smallvec::smallvec;

    use super::*;

    #[test]
    fn normalize_merges_touching_and_overlapping() {
        let mut spans: Spans = smallvec![
            (5.0, 6.0),
            (0.0, 2.0),
            (2.0, 3.0),
            (2.5, 4.0),
            (7.0, 7.0)
        ];
        normalize(&mut spans);
        assert_eq!(spans.as_slice(), &[(0.0, 4.0), (5.0, 6.0)]);
    }

    #[test]
    fn combine_difference_splits_span() {
        let out = combine(&[(0.0, 10.0)], &[(3.0, 4.0), (6.0, 12.0)], SetOp::Difference);
        assert_eq!(out.as_slice(), &[(0.0, 3.0), (4.0, 6.0)]);
    }

    #[test]
    fn combine_intersection_and_union() {
        let a = [(0.0, 2.0), (4.0, 6.0)];
        let b = [(1.0, 5.0)];
        assert_eq!(
            combine(&a, &b, SetOp::Intersection).as_slice(),
            &[(1.0, 2.0), (4.0, 5.0)]
        );
        assert_eq!(combine(&a, &b, SetOp::Union).as_slice(), &[(0.0, 6.0)]);
    }

    #[test]
    fn contains_includes_endpoints() {
        let spans = [(0.0, 1.0), (3.0, 4.0)];
        assert!(contains(&spans, 1.0));
        assert!(contains(&spans, 3.0));
        assert!(!contains(&spans, 2.0));
        assert!(!contains(&spans, 4.5));
    }
}
