//! Coordinate mapping for control charts: a band scale for categories and a
//! linear scale for values. Both follow the d3-scale conventions so layouts
//! match what users of the browser version are used to.

use std::collections::HashMap;

/// Maps ordered categories onto evenly spaced bands across `[start, end]`.
///
/// Inner and outer padding are equal and bands are centred in the range.
/// A category listed twice keeps its first band.
#[derive(Debug, Clone, PartialEq)]
pub struct BandScale {
    index: HashMap<String, usize>,
    start: f64,
    step: f64,
    bandwidth: f64,
}

impl BandScale {
    pub fn new<I, S>(categories: I, range: (f64, f64), padding: f64) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut index = HashMap::new();
        for category in categories {
            let next = index.len();
            index.entry(category.into()).or_insert(next);
        }

        let padding = padding.clamp(0.0, 1.0);
        let (r0, r1) = range;
        let n = index.len() as f64;
        let step = (r1 - r0) / (n - padding + padding * 2.0).max(1.0);
        let start = r0 + (r1 - r0 - step * (n - padding)) * 0.5;

        Self {
            index,
            start,
            step,
            bandwidth: step * (1.0 - padding),
        }
    }

    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    pub fn bandwidth(&self) -> f64 {
        self.bandwidth
    }

    pub fn step(&self) -> f64 {
        self.step
    }

    pub fn band_start(&self, category: &str) -> Option<f64> {
        self.index
            .get(category)
            .map(|&i| self.start + self.step * i as f64)
    }

    /// Horizontal centre of the category's band.
    pub fn center(&self, category: &str) -> Option<f64> {
        self.band_start(category)
            .map(|start| start + self.bandwidth / 2.0)
    }
}

/// Continuous mapping from a value domain to a pixel range.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearScale {
    domain: (f64, f64),
    range: (f64, f64),
}

impl LinearScale {
    pub fn new(domain: (f64, f64), range: (f64, f64)) -> Self {
        Self { domain, range }
    }

    /// Value scale for a chart: `[0, max(observed, ucl) * headroom]` mapped
    /// onto `[height, 0]` so larger values sit higher on the surface.
    pub fn for_values(observations: &[f64], ucl: Option<f64>, headroom: f64, height: f64) -> Self {
        Self::new((0.0, value_domain_max(observations, ucl, headroom)), (height, 0.0))
    }

    pub fn domain(&self) -> (f64, f64) {
        self.domain
    }

    pub fn range(&self) -> (f64, f64) {
        self.range
    }

    pub fn map(&self, value: f64) -> f64 {
        let (d0, d1) = self.domain;
        let (r0, r1) = self.range;
        let span = d1 - d0;
        let t = if span != 0.0 { (value - d0) / span } else { 0.5 };
        r0 + (r1 - r0) * t
    }

    pub fn ticks(&self, count: usize) -> Vec<f64> {
        nice_ticks(self.domain.0, self.domain.1, count)
    }
}

/// Upper bound of the value domain: the larger of the observed maximum and
/// the upper control limit, plus headroom so the UCL line is never clipped.
pub fn value_domain_max(observations: &[f64], ucl: Option<f64>, headroom: f64) -> f64 {
    let observed = observations
        .iter()
        .copied()
        .fold(f64::NEG_INFINITY, f64::max);
    let top = observed.max(ucl.unwrap_or(f64::NEG_INFINITY));
    if top.is_finite() {
        top * headroom
    } else {
        0.0
    }
}

/// Round tick values covering `[start, stop]`, roughly `count` of them, on a
/// 1/2/5 x 10^k grid (same rule as d3's `ticks`).
pub fn nice_ticks(start: f64, stop: f64, count: usize) -> Vec<f64> {
    if count == 0 || !start.is_finite() || !stop.is_finite() {
        return Vec::new();
    }
    if start == stop {
        return vec![start];
    }

    let (lo, hi) = if stop < start { (stop, start) } else { (start, stop) };
    let Some((i1, i2, inc)) = tick_spec(lo, hi, count as f64) else {
        return Vec::new();
    };
    if i2 < i1 {
        return Vec::new();
    }

    let mut ticks: Vec<f64> = (i1..=i2)
        .map(|i| {
            if inc < 0.0 {
                i as f64 / -inc
            } else {
                i as f64 * inc
            }
        })
        .collect();
    if stop < start {
        ticks.reverse();
    }
    ticks
}

fn tick_spec(start: f64, stop: f64, count: f64) -> Option<(i64, i64, f64)> {
    let e10 = 50f64.sqrt();
    let e5 = 10f64.sqrt();
    let e2 = 2f64.sqrt();

    let step = (stop - start) / count.max(0.0);
    if !step.is_finite() || step <= 0.0 {
        return None;
    }
    let power = step.log10().floor();
    let error = step / 10f64.powf(power);
    let factor = if error >= e10 {
        10.0
    } else if error >= e5 {
        5.0
    } else if error >= e2 {
        2.0
    } else {
        1.0
    };

    let (mut i1, mut i2, inc);
    if power < 0.0 {
        let scaled = 10f64.powf(-power) / factor;
        i1 = (start * scaled).round() as i64;
        i2 = (stop * scaled).round() as i64;
        if (i1 as f64) / scaled < start {
            i1 += 1;
        }
        if (i2 as f64) / scaled > stop {
            i2 -= 1;
        }
        inc = -scaled;
    } else {
        let scaled = 10f64.powf(power) * factor;
        i1 = (start / scaled).round() as i64;
        i2 = (stop / scaled).round() as i64;
        if (i1 as f64) * scaled < start {
            i1 += 1;
        }
        if (i2 as f64) * scaled > stop {
            i2 -= 1;
        }
        inc = scaled;
    }

    if i2 < i1 && (0.5..2.0).contains(&count) {
        return tick_spec(start, stop, count * 2.0);
    }
    Some((i1, i2, inc))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn domain_upper_bound_leaves_room_above_ucl() {
        let max = value_domain_max(&[1.0, 2.0, 3.0], Some(10.0), 1.05);
        assert!((max - 10.5).abs() < 1e-9);
    }

    #[test]
    fn domain_upper_bound_uses_observed_max_when_larger() {
        let max = value_domain_max(&[1.0, 20.0, 3.0], Some(10.0), 1.05);
        assert!((max - 21.0).abs() < 1e-9);
    }

    #[test]
    fn domain_is_zero_without_data_or_limits() {
        assert_eq!(value_domain_max(&[], None, 1.05), 0.0);
    }

    #[test]
    fn linear_scale_is_inverted_for_screen_space() {
        let scale = LinearScale::for_values(&[5.0], Some(10.0), 1.0, 300.0);
        assert_eq!(scale.domain(), (0.0, 10.0));
        assert_eq!(scale.map(0.0), 300.0);
        assert_eq!(scale.map(10.0), 0.0);
        assert_eq!(scale.map(5.0), 150.0);
    }

    #[test]
    fn degenerate_domain_maps_to_middle() {
        let scale = LinearScale::new((0.0, 0.0), (300.0, 0.0));
        assert_eq!(scale.map(0.0), 150.0);
        assert_eq!(scale.ticks(5), vec![0.0]);
    }

    #[test]
    fn band_scale_matches_d3_layout() {
        // d3.scaleBand().domain(["a","b","c"]).range([0, 760]).padding(0.2)
        let scale = BandScale::new(["a", "b", "c"], (0.0, 760.0), 0.2);
        let step = 760.0 / 3.2;
        assert!((scale.step() - step).abs() < 1e-9);
        assert!((scale.bandwidth() - step * 0.8).abs() < 1e-9);
        assert!((scale.band_start("a").unwrap() - step * 0.2).abs() < 1e-9);
        assert!((scale.band_start("c").unwrap() - step * 2.2).abs() < 1e-9);
        assert!(scale.band_start("zzz").is_none());
    }

    #[test]
    fn band_order_follows_input_not_sorting() {
        let scale = BandScale::new(["Mar", "Jan", "Feb"], (0.0, 300.0), 0.2);
        let mar = scale.center("Mar").unwrap();
        let jan = scale.center("Jan").unwrap();
        let feb = scale.center("Feb").unwrap();
        assert!(mar < jan && jan < feb);
    }

    #[test]
    fn duplicate_categories_share_a_band() {
        let scale = BandScale::new(["a", "b", "a"], (0.0, 300.0), 0.2);
        assert_eq!(scale.len(), 2);
        assert!(scale.center("a").unwrap() < scale.center("b").unwrap());
    }

    #[test]
    fn ticks_follow_one_two_five_rule() {
        assert_eq!(nice_ticks(0.0, 10.5, 5), vec![0.0, 2.0, 4.0, 6.0, 8.0, 10.0]);
        assert_eq!(nice_ticks(0.0, 100.0, 5), vec![0.0, 20.0, 40.0, 60.0, 80.0, 100.0]);
        assert_eq!(nice_ticks(0.0, 1.0, 5), vec![0.0, 0.2, 0.4, 0.6, 0.8, 1.0]);
    }

    #[test]
    fn ticks_stay_inside_domain() {
        let ticks = nice_ticks(0.0, 17.83, 5);
        assert_eq!(ticks.first().copied(), Some(0.0));
        assert!(ticks.iter().all(|&t| (0.0..=17.83).contains(&t)));
        assert!(ticks.len() >= 3);
    }
}
