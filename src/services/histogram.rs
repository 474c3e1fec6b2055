use std::collections::BTreeMap;

use plotters::prelude::*;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum HistogramError {
    #[error("failed to render histogram: {0}")]
    Render(String),
}

/// Labels of one histogram chart.
#[derive(Debug, Clone, Copy)]
pub struct HistogramLabels<'a> {
    pub caption: &'a str,
    pub x_desc: &'a str,
}

pub fn write_histogram_png(
    output_path: &str,
    samples: &[f64],
    labels: HistogramLabels<'_>,
) -> Result<(), HistogramError> {
    if samples.is_empty() {
        return Ok(());
    }
    let counts = bucket_counts(samples);
    render_histogram_png(output_path, &counts, labels)
}

/// Bucketed sample counts using sqrt(n) bins over the sample range.
#[derive(Debug, Clone, PartialEq)]
struct BucketCounts {
    bin_width: f64,
    counts: BTreeMap<i64, usize>,
}

fn bucket_counts(samples: &[f64]) -> BucketCounts {
    let min_value = samples.iter().cloned().fold(f64::INFINITY, f64::min);
    let max_value = samples.iter().cloned().fold(f64::NEG_INFINITY, f64::max);

    let range = max_value - min_value;
    let bin_width = if range < f64::EPSILON {
        1.0
    } else {
        range / (samples.len() as f64).sqrt()
    };

    let mut counts = BTreeMap::new();
    for value in samples {
        let bucket = (*value / bin_width).floor() as i64;
        *counts.entry(bucket).or_insert(0usize) += 1;
    }
    BucketCounts { bin_width, counts }
}

fn render_histogram_png(
    output_path: &str,
    buckets: &BucketCounts,
    labels: HistogramLabels<'_>,
) -> Result<(), HistogramError> {
    let max_count = buckets.counts.values().copied().max().unwrap_or(1);
    let min_bucket = buckets.counts.keys().next().copied().unwrap_or(0) - 1;
    let max_bucket = buckets.counts.keys().next_back().copied().unwrap_or(0) + 2;
    let bin_width = buckets.bin_width;

    let root = BitMapBackend::new(output_path, (800, 600)).into_drawing_area();
    root.fill(&WHITE)
        .map_err(|e| HistogramError::Render(e.to_string()))?;

    let mut chart = ChartBuilder::on(&root)
        .margin(20)
        .caption(labels.caption, ("sans-serif", 30))
        .x_label_area_size(55)
        .y_label_area_size(65)
        .build_cartesian_2d(min_bucket..max_bucket, 0..(max_count + 1))
        .map_err(|e| HistogramError::Render(e.to_string()))?;

    chart
        .configure_mesh()
        .disable_mesh()
        .x_desc(labels.x_desc)
        .y_desc("Frequency")
        .label_style(("sans-serif", 18))
        .axis_desc_style(("sans-serif", 22))
        .x_label_formatter(&|value| format!("{:.0}", *value as f64 * bin_width))
        .draw()
        .map_err(|e| HistogramError::Render(e.to_string()))?;

    let bar_color = RGBColor(30, 122, 204);
    let bar_style = ShapeStyle::from(&bar_color).filled();
    chart
        .draw_series(buckets.counts.iter().map(|(bucket, count)| {
            Rectangle::new([(*bucket, 0), (*bucket + 1, *count)], bar_style)
        }))
        .map_err(|e| HistogramError::Render(e.to_string()))?;

    root.present()
        .map_err(|e| HistogramError::Render(e.to_string()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_samples_write_nothing() {
        let labels = HistogramLabels {
            caption: "Completion",
            x_desc: "Days",
        };
        assert!(write_histogram_png("unused.png", &[], labels).is_ok());
        assert!(!std::path::Path::new("unused.png").exists());
    }

    #[test]
    fn buckets_cover_every_sample() {
        let samples: Vec<f64> = (0..100).map(|value| value as f64).collect();
        let buckets = bucket_counts(&samples);

        assert!((buckets.bin_width - 9.9).abs() < 1e-9);
        assert_eq!(buckets.counts.values().sum::<usize>(), 100);
    }

    #[test]
    fn identical_samples_share_one_bucket() {
        let buckets = bucket_counts(&[420.0; 10]);
        assert_eq!(buckets.bin_width, 1.0);
        assert_eq!(buckets.counts.len(), 1);
        assert_eq!(buckets.counts.get(&420), Some(&10));
    }
}
