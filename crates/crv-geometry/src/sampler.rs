//! Evenly spaced sampling of a curve, segment by segment.
//!
//! Every segment `[b_i, b_{i+1}]` between consecutive breakpoints receives
//! `per_segment` parameters including both ends. A boundary shared by two
//! segments is emitted once, so a curve with `s` segments yields
//! `s * (per_segment - 1) + 1` samples. The last parameter is exactly the
//! domain maximum.

use std::iter::FusedIterator;
use std::marker::PhantomData;

use crv_core::{CurveError, Result};
use crv_math::VectorSpace;
use rayon::prelude::*;

use crate::curve::Curve;

/// Upper bound on samples per segment, given directly or derived from a step size.
pub const MAX_SAMPLES_PER_SEGMENT: usize = 1 << 20;

/// The parameter values visited by a sampler.
#[derive(Debug, Clone, PartialEq)]
pub struct ParameterSequence {
    breakpoints: Vec<f64>,
    per_segment: usize,
}

impl ParameterSequence {
    pub fn new(breakpoints: Vec<f64>, per_segment: usize) -> Result<Self> {
        if per_segment < 2 {
            return Err(CurveError::configuration(format!(
                "sample count must be at least 2 per segment, got {per_segment}"
            )));
        }
        if breakpoints.len() < 2 {
            return Err(CurveError::configuration(format!(
                "sampling needs at least 2 breakpoints, got {}",
                breakpoints.len()
            )));
        }
        if breakpoints.iter().any(|b| !b.is_finite()) || breakpoints.windows(2).any(|w| w[1] < w[0]) {
            return Err(CurveError::configuration(
                "breakpoints must be finite and non-decreasing",
            ));
        }
        if per_segment > MAX_SAMPLES_PER_SEGMENT {
            return Err(CurveError::configuration(format!(
                "sample count {per_segment} exceeds {MAX_SAMPLES_PER_SEGMENT} per segment"
            )));
        }
        // len() must not wrap for any accepted sequence
        (breakpoints.len() - 1)
            .checked_mul(per_segment - 1)
            .and_then(|n| n.checked_add(1))
            .ok_or_else(|| {
                CurveError::configuration(format!(
                    "{} segments x {per_segment} samples overflows the sample count",
                    breakpoints.len() - 1
                ))
            })?;
        Ok(Self {
            breakpoints,
            per_segment,
        })
    }

    /// Choose the per-segment count so that no parameter step exceeds `max_step`.
    pub fn with_max_step(breakpoints: Vec<f64>, max_step: f64) -> Result<Self> {
        if !(max_step.is_finite() && max_step > 0.0) {
            return Err(CurveError::configuration(format!(
                "maximum parameter step must be positive, got {max_step}"
            )));
        }
        let longest = breakpoints
            .windows(2)
            .map(|w| w[1] - w[0])
            .fold(0.0, f64::max);
        let steps = (longest / max_step).ceil();
        if !(steps < MAX_SAMPLES_PER_SEGMENT as f64) {
            return Err(CurveError::configuration(format!(
                "step {max_step} needs more than {MAX_SAMPLES_PER_SEGMENT} samples per segment"
            )));
        }
        Self::new(breakpoints, (steps as usize + 1).max(2))
    }

    pub fn per_segment(&self) -> usize {
        self.per_segment
    }

    pub fn segment_count(&self) -> usize {
        self.breakpoints.len() - 1
    }

    pub fn len(&self) -> usize {
        self.segment_count() * (self.per_segment - 1) + 1
    }

    /// Never true: a valid sequence holds at least two parameters.
    pub fn is_empty(&self) -> bool {
        false
    }

    pub fn get(&self, k: usize) -> Option<f64> {
        (k < self.len()).then(|| self.at(k))
    }

    pub fn iter(&self) -> impl ExactSizeIterator<Item = f64> + '_ {
        (0..self.len()).map(|k| self.at(k))
    }

    fn at(&self, k: usize) -> f64 {
        let steps = self.per_segment - 1;
        let (segment, j) = (k / steps, k % steps);
        if segment == self.segment_count() {
            return self.breakpoints[segment];
        }
        let (a, b) = (self.breakpoints[segment], self.breakpoints[segment + 1]);
        if j == 0 {
            a
        } else {
            a + (b - a) * (j as f64 / steps as f64)
        }
    }
}

/// Lazy, restartable sequence of curve points.
///
/// Yields one `Result` per parameter; an evaluation failure (for example a
/// vanishing NURBS denominator) is reported in place and sampling may continue.
#[derive(Debug, Clone)]
pub struct Samples<C, P> {
    curve: C,
    parameters: ParameterSequence,
    front: usize,
    _point: PhantomData<fn() -> P>,
}

impl<C: Curve<P>, P: VectorSpace> Samples<C, P> {
    pub fn new(curve: C, per_segment: usize) -> Result<Self> {
        let parameters = ParameterSequence::new(curve.breakpoints(), per_segment)?;
        Ok(Self::from_parameters(curve, parameters))
    }

    pub fn with_max_step(curve: C, max_step: f64) -> Result<Self> {
        let parameters = ParameterSequence::with_max_step(curve.breakpoints(), max_step)?;
        Ok(Self::from_parameters(curve, parameters))
    }

    fn from_parameters(curve: C, parameters: ParameterSequence) -> Self {
        log::trace!(
            "sampling {} segments x {} -> {} points",
            parameters.segment_count(),
            parameters.per_segment(),
            parameters.len()
        );
        Self {
            curve,
            parameters,
            front: 0,
            _point: PhantomData,
        }
    }

    pub fn parameters(&self) -> &ParameterSequence {
        &self.parameters
    }

    pub fn curve(&self) -> &C {
        &self.curve
    }

    /// Rewind to the first sample.
    pub fn restart(&mut self) {
        self.front = 0;
    }

    /// Evaluate the remaining samples, stopping at the first error.
    pub fn collect_points(self) -> Result<Vec<P>> {
        self.collect()
    }
}

impl<C: Curve<P>, P: VectorSpace> Iterator for Samples<C, P> {
    type Item = Result<P>;

    fn next(&mut self) -> Option<Self::Item> {
        let t = self.parameters.get(self.front)?;
        self.front += 1;
        Some(self.curve.point_at(t))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.parameters.len() - self.front;
        (remaining, Some(remaining))
    }
}

impl<C: Curve<P>, P: VectorSpace> ExactSizeIterator for Samples<C, P> {}

impl<C: Curve<P>, P: VectorSpace> FusedIterator for Samples<C, P> {}

/// Evaluate the same parameters as [`Samples`] on the rayon thread pool.
///
/// Output order matches sequential sampling. The first failing parameter
/// aborts the whole batch.
pub fn sample_par<P, C>(curve: &C, per_segment: usize) -> Result<Vec<P>>
where
    P: VectorSpace,
    C: Curve<P> + ?Sized,
{
    let parameters = ParameterSequence::new(curve.breakpoints(), per_segment)?;
    (0..parameters.len())
        .into_par_iter()
        .map(|k| curve.point_at(parameters.at(k)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::curve::{CatmullRomSpline, LagrangeCurve};
    use crate::tangent::EndCondition;
    use crv_math::DVec2;

    #[test]
    fn test_parameter_counts() {
        let seq = ParameterSequence::new(vec![0.0, 1.0, 2.0, 3.0], 4).unwrap();
        assert_eq!(seq.len(), 10);
        let ts: Vec<f64> = seq.iter().collect();
        assert_eq!(ts.first(), Some(&0.0));
        assert_eq!(ts.last(), Some(&3.0));
        assert_eq!(ts[3], 1.0);
        assert_eq!(ts[6], 2.0);
        assert!(ts.windows(2).all(|w| w[0] < w[1]));
        assert_eq!(seq.get(10), None);
    }

    #[test]
    fn test_two_samples_per_segment_are_breakpoints() {
        let seq = ParameterSequence::new(vec![0.0, 0.5, 2.0], 2).unwrap();
        assert_eq!(seq.iter().collect::<Vec<_>>(), vec![0.0, 0.5, 2.0]);
    }

    #[test]
    fn test_rejects_bad_counts() {
        assert!(matches!(
            ParameterSequence::new(vec![0.0, 1.0], 1),
            Err(CurveError::Configuration(_))
        ));
        assert!(ParameterSequence::new(vec![0.0], 5).is_err());
        assert!(ParameterSequence::new(vec![1.0, 0.0], 5).is_err());
    }

    #[test]
    fn test_rejects_oversized_counts() {
        for per_segment in [usize::MAX, MAX_SAMPLES_PER_SEGMENT + 1] {
            assert!(matches!(
                ParameterSequence::new(vec![0.0, 1.0, 2.0], per_segment),
                Err(CurveError::Configuration(_))
            ));
        }
        let seq = ParameterSequence::new(vec![0.0, 1.0, 2.0], MAX_SAMPLES_PER_SEGMENT).unwrap();
        assert_eq!(seq.len(), 2 * (MAX_SAMPLES_PER_SEGMENT - 1) + 1);

        let curve = LagrangeCurve::new(vec![0.0, 1.0, 4.0]).unwrap();
        assert!(matches!(
            Samples::<_, f64>::new(&curve, usize::MAX),
            Err(CurveError::Configuration(_))
        ));
        assert!(matches!(
            sample_par::<f64, _>(&curve, usize::MAX),
            Err(CurveError::Configuration(_))
        ));
    }

    #[test]
    fn test_max_step() {
        let seq = ParameterSequence::with_max_step(vec![0.0, 1.0, 3.0], 0.5).unwrap();
        // Longest segment of length 2 needs 4 steps
        assert_eq!(seq.per_segment(), 5);
        assert!(seq
            .iter()
            .collect::<Vec<_>>()
            .windows(2)
            .all(|w| w[1] - w[0] <= 0.5 + 1e-12));
        assert!(ParameterSequence::with_max_step(vec![0.0, 1.0], 0.0).is_err());
        assert!(ParameterSequence::with_max_step(vec![0.0, 1.0], 1e-12).is_err());
    }

    #[test]
    fn test_samples_with_max_step() {
        let curve = LagrangeCurve::new(vec![0.0, 1.0, 4.0]).unwrap();
        let samples = Samples::with_max_step(&curve, 0.3).unwrap();
        // Domain [0, 2] in steps of at most 0.3 needs 7 steps
        assert_eq!(samples.len(), 8);
        let points: Vec<f64> = samples.collect_points().unwrap();
        assert_eq!(points.first(), Some(&0.0));
        assert_eq!(points.last(), Some(&4.0));
    }

    #[test]
    fn test_samples_restart() {
        let curve = LagrangeCurve::new(vec![0.0, 1.0, 4.0]).unwrap();
        let mut samples = curve.samples(5).unwrap();
        assert_eq!(samples.len(), 5);
        let first: Vec<f64> = samples.by_ref().map(|p| p.unwrap()).collect();
        assert_eq!(samples.next(), None);
        samples.restart();
        let second: Vec<f64> = samples.map(|p| p.unwrap()).collect();
        assert_eq!(first, second);
        assert_eq!(first, vec![0.0, 0.25, 1.0, 2.25, 4.0]);
    }

    #[test]
    fn test_sample_par_matches_sequential() {
        let points: Vec<_> = (0..7)
            .map(|i| DVec2::new(i as f64, ((i * 3) % 4) as f64))
            .collect();
        let curve = CatmullRomSpline::new(points, EndCondition::Reflect).unwrap();
        let sequential: Vec<DVec2> = Samples::new(&curve, 9).unwrap().collect_points().unwrap();
        let parallel: Vec<DVec2> = sample_par(&curve, 9).unwrap();
        assert_eq!(sequential.len(), 6 * 8 + 1);
        assert_eq!(sequential, parallel);
    }
}
