//! Chart-side transforms over query results.
//!
//! This crate turns the totals produced by `fde-index` into forms the
//! charts draw directly: colour positions for the choropleth and stacked
//! bar layers.

/// Outlier-resistant linear scale for choropleth colouring.
pub mod robust_scale {
    use serde::Serialize;

    /// Fraction of the interquartile range allowed past each quartile.
    pub const IQR_FENCE: f64 = 1.5;

    /// Maps values onto `[0, 1]` over a domain clipped at the Tukey fences.
    ///
    /// A handful of extreme airports would otherwise wash the rest of the
    /// map into a single colour.
    #[derive(Debug, Clone, Copy, PartialEq, Serialize)]
    pub struct RobustScale {
        q1: f64,
        q3: f64,
        lower: f64,
        upper: f64,
    }

    /// `sorted[floor(n * q)]`; `sorted` must be non-empty.
    fn quantile(sorted: &[f64], q: f64) -> f64 {
        let idx = ((sorted.len() as f64) * q).floor() as usize;
        sorted[idx.min(sorted.len() - 1)]
    }

    impl RobustScale {
        /// Build a scale from metric values.
        ///
        /// `None` and non-finite values are ignored; returns `None` when
        /// nothing is left.
        pub fn build<I, V>(values: I) -> Option<RobustScale>
        where
            I: IntoIterator<Item = V>,
            V: Into<Option<f64>>,
        {
            let mut valid: Vec<f64> = values
                .into_iter()
                .filter_map(Into::into)
                .filter(|v: &f64| v.is_finite())
                .collect();
            if valid.is_empty() {
                return None;
            }
            valid.sort_by(f64::total_cmp);

            let q1 = quantile(&valid, 0.25);
            let q3 = quantile(&valid, 0.75);
            let iqr = q3 - q1;
            let min = valid[0];
            let max = valid[valid.len() - 1];

            let scale = RobustScale {
                q1,
                q3,
                lower: (q1 - IQR_FENCE * iqr).max(min),
                upper: (q3 + IQR_FENCE * iqr).min(max),
            };
            log::debug!(
                "[FDE Debug] scale: {} values, q1={} q3={} domain=[{}, {}]",
                valid.len(),
                scale.q1,
                scale.q3,
                scale.lower,
                scale.upper
            );
            Some(scale)
        }

        /// Position of `value` in the clipped domain, clamped to `[0, 1]`.
        ///
        /// Returns 0 for non-finite input and for a zero-width domain.
        pub fn map(&self, value: f64) -> f64 {
            let width = self.upper - self.lower;
            if !value.is_finite() || width <= 0.0 {
                return 0.0;
            }
            ((value - self.lower) / width).clamp(0.0, 1.0)
        }

        pub fn lower(&self) -> f64 {
            self.lower
        }

        pub fn upper(&self) -> f64 {
            self.upper
        }

        pub fn q1(&self) -> f64 {
            self.q1
        }

        pub fn q3(&self) -> f64 {
            self.q3
        }
    }

}

/// Stacked bar layout over per-counterpart totals.
pub mod stacking {
    use fde_index::models::FieldTotals;
    use fde_records::metrics::Field;
    use serde::Serialize;

    /// One bar's slice of a layer.
    #[derive(Debug, Clone, PartialEq, Serialize)]
    pub struct StackSegment {
        pub label: String,
        pub y0: f64,
        pub y1: f64,
    }

    /// All segments for one key, in row order.
    #[derive(Debug, Clone, PartialEq, Serialize)]
    pub struct StackLayer {
        pub key: Field,
        pub segments: Vec<StackSegment>,
    }

    /// Stack `keys` bottom to top for every row.
    ///
    /// Keys missing from a row count as zero, so every layer has one segment
    /// per row.
    pub fn stack(rows: &[(String, FieldTotals)], keys: &[Field]) -> Vec<StackLayer> {
        let mut baselines = vec![0.0; rows.len()];
        keys.iter()
            .map(|key| {
                let segments = rows
                    .iter()
                    .zip(baselines.iter_mut())
                    .map(|((label, totals), base)| {
                        let y0 = *base;
                        let y1 = y0 + totals.get(key).copied().unwrap_or(0.0);
                        *base = y1;
                        StackSegment {
                            label: label.clone(),
                            y0,
                            y1,
                        }
                    })
                    .collect();
                StackLayer { key: *key, segments }
            })
            .collect()
    }

    #[cfg(test)]
    mod tests {
        use super::*;
        use fde_records::metrics::DelayCause;

        fn row(label: &str, values: &[(Field, f64)]) -> (String, FieldTotals) {
            (label.to_string(), values.iter().copied().collect())
        }

        #[test]
        fn test_layers_are_contiguous() {
            let keys = DelayCause::count_fields();
            let rows = vec![
                row(
                    "Delta",
                    &[
                        (Field::CarrierCt, 3.0),
                        (Field::WeatherCt, 1.0),
                        (Field::NasCt, 2.5),
                        (Field::SecurityCt, 0.0),
                        (Field::LateAircraftCt, 4.0),
                    ],
                ),
                row("United", &[(Field::CarrierCt, 2.0), (Field::NasCt, 1.0)]),
            ];
            let layers = stack(&rows, &keys);
            assert_eq!(layers.len(), 5);
            for pair in layers.windows(2) {
                for (below, above) in pair[0].segments.iter().zip(&pair[1].segments) {
                    assert_eq!(below.label, above.label);
                    assert_eq!(below.y1, above.y0);
                }
            }
            let top = &layers[4].segments;
            assert!((top[0].y1 - 10.5).abs() < 1e-9);
            assert!((top[1].y1 - 3.0).abs() < 1e-9);
            assert_eq!(layers[0].segments[0].y0, 0.0);
        }

        #[test]
        fn test_empty_rows() {
            let layers = stack(&[], &[Field::CarrierCt]);
            assert_eq!(layers.len(), 1);
            assert!(layers[0].segments.is_empty());
        }
    }
}
