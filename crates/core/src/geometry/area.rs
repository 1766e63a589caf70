//! Band-decomposed rectilinear areas.

use itertools::Itertools;
use rustc_hash::FxHashMap;
use smallvec::smallvec;

use super::spans::{self, SetOp, Spans};
use super::{EPSILON, Rect, Span};

/// A horizontal slab `[bottom, top]` covered by a set of disjoint x-spans.
#[derive(Debug, Clone, PartialEq)]
pub struct Band {
    bottom: f64,
    top: f64,
    spans: Spans,
}

impl Band {
    pub fn new(bottom: f64, top: f64, spans: impl IntoIterator<Item = Span>) -> Self {
        let mut spans: Spans = spans.into_iter().collect();
        spans::normalize(&mut spans);
        Self { bottom, top, spans }
    }

    pub fn bottom(&self) -> f64 {
        self.bottom
    }

    pub fn top(&self) -> f64 {
        self.top
    }

    pub fn height(&self) -> f64 {
        self.top - self.bottom
    }

    pub fn spans(&self) -> &[Span] {
        &self.spans
    }
}

/// An immutable, possibly multi-part, rectilinear area.
///
/// Invariants:
/// - bands are sorted bottom-up and do not overlap vertically
/// - every band has at least one span, spans are sorted and never touch
/// - two vertically adjacent bands never carry identical spans (they are
///   coalesced into one)
///
/// Any two areas covering the same point set therefore compare equal.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Area {
    bands: Vec<Band>,
}

impl Area {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn from_rect(rect: Rect) -> Self {
        Self::from_rects([rect])
    }

    /// Union of a set of rectangles.
    ///
    /// Sweeps the distinct y-coordinates bottom-up, keeping the rectangles
    /// that cover the current slab in an active list.
    pub fn from_rects(rects: impl IntoIterator<Item = Rect>) -> Self {
        let mut rects: Vec<Rect> = rects
            .into_iter()
            .filter(|r| r.2 - r.0 > EPSILON && r.3 - r.1 > EPSILON)
            .collect();
        if rects.is_empty() {
            return Self::empty();
        }
        rects.sort_by(|a, b| a.1.total_cmp(&b.1));

        let mut ys: Vec<f64> = rects.iter().flat_map(|r| [r.1, r.3]).collect();
        ys.sort_by(f64::total_cmp);
        ys.dedup();

        let mut bands = Vec::with_capacity(ys.len());
        let mut active: Vec<Rect> = Vec::new();
        let mut next = 0;
        for (y0, y1) in ys.into_iter().tuple_windows() {
            while next < rects.len() && rects[next].1 <= y0 {
                active.push(rects[next]);
                next += 1;
            }
            active.retain(|r| r.3 > y0);
            bands.push(Band::new(y0, y1, active.iter().map(|r| (r.0, r.2))));
        }
        Self::from_bands(bands)
    }

    /// Builds an area from bottom-up sorted bands, dropping empty bands and
    /// coalescing touching bands with identical spans.
    pub fn from_bands(bands: impl IntoIterator<Item = Band>) -> Self {
        let mut out: Vec<Band> = Vec::new();
        for band in bands {
            if band.spans.is_empty() || band.height() <= EPSILON {
                continue;
            }
            match out.last_mut() {
                Some(last)
                    if (band.bottom - last.top).abs() <= EPSILON && last.spans == band.spans =>
                {
                    last.top = band.top;
                }
                _ => out.push(band),
            }
        }
        Self { bands: out }
    }

    pub fn is_empty(&self) -> bool {
        self.bands.is_empty()
    }

    pub fn bands(&self) -> &[Band] {
        &self.bands
    }

    /// Disjoint rectangles covering the area, one per band span.
    pub fn rects(&self) -> impl Iterator<Item = Rect> + '_ {
        self.bands.iter().flat_map(|band| {
            band.spans
                .iter()
                .map(move |&(x0, x1)| (x0, band.bottom, x1, band.top))
        })
    }

    pub fn bbox(&self) -> Option<Rect> {
        let first = self.bands.first()?;
        let last = self.bands.last()?;
        let (x0, x1) = self.bands.iter().fold((f64::MAX, f64::MIN), |(lo, hi), band| {
            let first_span = band.spans[0];
            let last_span = band.spans[band.spans.len() - 1];
            (lo.min(first_span.0), hi.max(last_span.1))
        });
        Some((x0, first.bottom, x1, last.top))
    }

    /// Surface of the area.
    pub fn area(&self) -> f64 {
        self.rects().map(|(x0, y0, x1, y1)| (x1 - x0) * (y1 - y0)).sum()
    }

    /// True if the point lies in the closed area.
    pub fn contains_point(&self, x: f64, y: f64) -> bool {
        self.bands
            .iter()
            .filter(|b| b.bottom <= y && y <= b.top)
            .any(|b| spans::contains(&b.spans, x))
    }

    pub fn union(&self, other: &Area) -> Area {
        self.combine(other, SetOp::Union)
    }

    pub fn intersection(&self, other: &Area) -> Area {
        self.combine(other, SetOp::Intersection)
    }

    pub fn difference(&self, other: &Area) -> Area {
        self.combine(other, SetOp::Difference)
    }

    fn combine(&self, other: &Area, op: SetOp) -> Area {
        let mut ys: Vec<f64> = self
            .bands
            .iter()
            .chain(&other.bands)
            .flat_map(|b| [b.bottom, b.top])
            .collect();
        ys.sort_by(f64::total_cmp);
        ys.dedup();

        let (mut ia, mut ib) = (0, 0);
        let mut bands = Vec::with_capacity(ys.len());
        for (y0, y1) in ys.into_iter().tuple_windows() {
            let a = slab_spans(&self.bands, &mut ia, y0, y1);
            let b = slab_spans(&other.bands, &mut ib, y0, y1);
            bands.push(Band {
                bottom: y0,
                top: y1,
                spans: spans::combine(a, b, op),
            });
        }
        Area::from_bands(bands)
    }

    /// Minkowski sum with the square `[-r, r]²`.
    pub fn dilate(&self, r: f64) -> Area {
        Area::from_rects(
            self.rects()
                .map(|(x0, y0, x1, y1)| (x0 - r, y0 - r, x1 + r, y1 + r)),
        )
    }

    /// Minkowski erosion by the square `[-r, r]²`: the points whose whole
    /// square neighbourhood lies inside the area.
    pub fn erode(&self, r: f64) -> Area {
        let Some((x0, y0, x1, y1)) = self.bbox() else {
            return Area::empty();
        };
        let margin = r + 1.0;
        let frame = Area::from_rect((x0 - margin, y0 - margin, x1 + margin, y1 + margin));
        let outside = frame.difference(self);
        self.difference(&outside.dilate(r))
    }

    /// Signed offset: grows for `distance > 0`, shrinks for `distance < 0`.
    ///
    /// The structuring element is a square, so edges stay straight and
    /// corners stay square.
    pub fn buffer(&self, distance: f64) -> Area {
        if distance > 0.0 {
            self.dilate(distance)
        } else if distance < 0.0 {
            self.erode(-distance)
        } else {
            self.clone()
        }
    }

    /// Intersects the horizontal segment `[x_min, x_max]` at height `y` with
    /// the closed area.
    ///
    /// A line running along a horizontal edge picks up the spans on both
    /// sides. Touching pieces merge, zero-length pieces are dropped.
    pub fn intersect_hline(&self, y: f64, x_min: f64, x_max: f64) -> Vec<Span> {
        let start = self.bands.partition_point(|b| b.top < y);
        let mut hits: Spans = self.bands[start..]
            .iter()
            .take_while(|b| b.bottom <= y)
            .flat_map(|b| b.spans.iter().map(|&(x0, x1)| (x0.max(x_min), x1.min(x_max))))
            .collect();
        spans::normalize(&mut hits);
        hits.into_vec()
    }

    /// Splits the area into its connected single-part pieces.
    ///
    /// Pieces sharing only a corner are separate. Pieces are returned in the
    /// order of their topmost, then leftmost, span.
    pub fn components(&self) -> Vec<Area> {
        let mut offsets = Vec::with_capacity(self.bands.len());
        let mut total = 0;
        for band in &self.bands {
            offsets.push(total);
            total += band.spans.len();
        }

        let mut sets = DisjointSet::new(total);
        for (i, (lo, hi)) in self.bands.iter().tuple_windows().enumerate() {
            if (hi.bottom - lo.top).abs() > EPSILON {
                continue;
            }
            let (mut a, mut b) = (0, 0);
            while a < lo.spans.len() && b < hi.spans.len() {
                let (ax0, ax1) = lo.spans[a];
                let (bx0, bx1) = hi.spans[b];
                if ax1.min(bx1) - ax0.max(bx0) > EPSILON {
                    sets.union(offsets[i] + a, offsets[i + 1] + b);
                }
                if ax1 < bx1 {
                    a += 1;
                } else {
                    b += 1;
                }
            }
        }

        let mut part_of_root: FxHashMap<usize, usize> = FxHashMap::default();
        let mut parts: Vec<Vec<Band>> = Vec::new();
        for (bi, band) in self.bands.iter().enumerate().rev() {
            for (si, &span) in band.spans.iter().enumerate() {
                let root = sets.find(offsets[bi] + si);
                let part = *part_of_root.entry(root).or_insert_with(|| {
                    parts.push(Vec::new());
                    parts.len() - 1
                });
                let part_bands = &mut parts[part];
                match part_bands.last_mut() {
                    Some(last) if last.bottom == band.bottom => last.spans.push(span),
                    _ => part_bands.push(Band {
                        bottom: band.bottom,
                        top: band.top,
                        spans: smallvec![span],
                    }),
                }
            }
        }

        parts
            .into_iter()
            .map(|mut bands| {
                bands.reverse();
                Area::from_bands(bands)
            })
            .collect()
    }
}

/// Spans of the band covering slab `[y0, y1]`, or none if the slab is a gap.
/// `cursor` only moves forward, so slabs must be visited bottom-up.
fn slab_spans<'a>(bands: &'a [Band], cursor: &mut usize, y0: f64, y1: f64) -> &'a [Span] {
    while *cursor < bands.len() && bands[*cursor].top <= y0 {
        *cursor += 1;
    }
    match bands.get(*cursor) {
        Some(band) if band.bottom <= y0 && band.top >= y1 => &band.spans,
        _ => &[],
    }
}

struct DisjointSet {
    parent: Vec<usize>,
}

impl DisjointSet {
    fn new(n: usize) -> Self {
        Self {
            parent: (0..n).collect(),
        }
    }

    fn find(&mut self, mut x: usize) -> usize {
        while self.parent[x] != x {
            self.parent[x] = self.parent[self.parent[x]];
            x = self.parent[x];
        }
        x
    }

    fn union(&mut self, a: usize, b: usize) {
        let (ra, rb) = (self.find(a), self.find(b));
        if ra != rb {
            self.parent[ra.max(rb)] = ra.min(rb);
        }
    }
}
