//! Step-histogram paths for filled-area plots.

use crate::metrics::MetricsError;
use crate::models::{StepPath, YearSeries};

/// Turn per-year values into a closed step polyline.
///
/// The path rises from `(y_0, 0)`, draws one flat segment
/// `(y_i, v_i) -> (y_i + w, v_i)` per bin and drops back to `(y_n + w, 0)`.
/// Adjacent segments meet with a vertical jump. Where the axis has a gap
/// (`y_i + w < y_{i+1}`) the path drops to 0 and runs along the baseline to the
/// next bin. With `center` set, every x is shifted left by half a bin so the
/// bars sit on their year.
pub fn build_step(
    years: &[i32],
    values: &[f64],
    bin_width: f64,
    center: bool,
) -> Result<StepPath, MetricsError> {
    if years.len() != values.len() {
        return Err(MetricsError::InvalidArgument(format!(
            "{} years but {} values",
            years.len(),
            values.len()
        )));
    }
    if !bin_width.is_finite() || bin_width <= 0.0 {
        return Err(MetricsError::InvalidArgument(format!(
            "bin width must be positive, got {}",
            bin_width
        )));
    }

    let (Some(&first), Some(&last)) = (years.first(), years.last()) else {
        return Ok(StepPath::default());
    };

    let offset = if center { -bin_width / 2.0 } else { 0.0 };
    let capacity = 2 * years.len() + 2;
    let mut path = StepPath {
        x: Vec::with_capacity(capacity),
        y: Vec::with_capacity(capacity),
    };

    let mut push = |x: f64, y: f64| {
        path.x.push(x + offset);
        path.y.push(y);
    };

    push(f64::from(first), 0.0);
    let mut previous_end: Option<f64> = None;
    for (&year, &value) in years.iter().zip(values) {
        let x = f64::from(year);
        if let Some(end) = previous_end.filter(|&end| end < x) {
            push(end, 0.0);
            push(x, 0.0);
        }
        push(x, value);
        push(x + bin_width, value);
        previous_end = Some(x + bin_width);
    }
    push(f64::from(last) + bin_width, 0.0);

    Ok(path)
}

impl YearSeries {
    /// Step path of one channel (`None` if the channel does not exist)
    pub fn step(
        &self,
        channel: &str,
        bin_width: f64,
        center: bool,
    ) -> Option<Result<StepPath, MetricsError>> {
        self.channel(channel)
            .map(|values| build_step(self.years(), values, bin_width, center))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metrics::align;
    use std::collections::BTreeMap;

    #[test]
    fn test_two_year_path() {
        let path = build_step(&[2020, 2021], &[2.0, 5.0], 1.0, false).unwrap();
        let points: Vec<_> = path.points().collect();
        assert_eq!(
            points,
            vec![
                (2020.0, 0.0),
                (2020.0, 2.0),
                (2021.0, 2.0),
                (2021.0, 5.0),
                (2022.0, 5.0),
                (2022.0, 0.0),
            ]
        );
    }

    #[test]
    fn test_centered_path() {
        let path = build_step(&[2020], &[3.0], 1.0, true).unwrap();
        assert_eq!(path.x, vec![2019.5, 2019.5, 2020.5, 2020.5]);
        assert_eq!(path.y, vec![0.0, 3.0, 3.0, 0.0]);
    }

    #[test]
    fn test_wider_bins() {
        let path = build_step(&[2000, 2002], &[1.0, 1.0], 2.0, false).unwrap();
        assert_eq!(path.x, vec![2000.0, 2000.0, 2002.0, 2002.0, 2004.0, 2004.0]);
    }

    #[test]
    fn test_empty_input() {
        let path = build_step(&[], &[], 1.0, false).unwrap();
        assert!(path.is_empty());
    }

    #[test]
    fn test_invalid_arguments() {
        assert!(matches!(
            build_step(&[2020], &[], 1.0, false),
            Err(MetricsError::InvalidArgument(_))
        ));
        for width in [0.0, -1.0, f64::NAN, f64::INFINITY] {
            assert!(matches!(
                build_step(&[2020], &[1.0], width, false),
                Err(MetricsError::InvalidArgument(_))
            ));
        }
    }

    #[test]
    fn test_gap_drops_to_baseline() {
        let path = build_step(&[2019, 2021], &[1.0, 4.0], 1.0, false).unwrap();
        let points: Vec<_> = path.points().collect();
        assert_eq!(
            points,
            vec![
                (2019.0, 0.0),
                (2019.0, 1.0),
                (2020.0, 1.0),
                (2020.0, 0.0),
                (2021.0, 0.0),
                (2021.0, 4.0),
                (2022.0, 4.0),
                (2022.0, 0.0),
            ]
        );

        let centered = build_step(&[2019, 2021], &[1.0, 4.0], 1.0, true).unwrap();
        assert_eq!(centered.x[3], 2019.5);
        assert_eq!(centered.x[4], 2020.5);
    }

    #[test]
    fn test_series_step() {
        let series = align([("refereed", BTreeMap::from([(2019, 1.0), (2021, 4.0)]))]);
        let path = series.step("refereed", 1.0, false).unwrap().unwrap();
        assert_eq!(path.len(), 8);
        assert_eq!(path.y[3], 0.0);
        assert!(series.step("missing", 1.0, false).is_none());
    }
}
