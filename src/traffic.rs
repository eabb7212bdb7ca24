//! # Simulated road traffic
//! Synthetic traffic samples on a fixed grid over lower Manhattan, plus the
//! reshapes the dashboard charts consume. Generation cannot fail and draws
//! fresh values on every call; nothing here is cached.

use rand::Rng;
use serde::Serialize;

/// Bounding box for the simulated area (NYC).
pub const LAT_MIN: f64 = 40.70;
pub const LAT_MAX: f64 = 40.80;
pub const LON_MIN: f64 = -74.02;
pub const LON_MAX: f64 = -73.93;

/// Grid resolution per axis; the full grid is GRID_POINTS².
pub const GRID_POINTS: usize = 15;

/// Bin count for the jam-factor histogram.
pub const JAM_HISTOGRAM_BINS: usize = 20;

/// One simulated measurement at a grid point.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TrafficSample {
    pub latitude: f64,
    pub longitude: f64,
    pub current_speed: f64,
    pub free_flow_speed: f64,
    pub jam_factor: f64,
    pub confidence: f64,
}

/// Scalar aggregates shown under the charts.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TrafficSummary {
    pub avg_current_speed: f64,
    pub avg_free_flow_speed: f64,
    pub avg_jam_factor: f64,
    pub max_jam_factor: f64,
}

/// Row of the current-vs-free-flow speed line chart, sorted by latitude.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SpeedPoint {
    pub latitude: f64,
    pub current_speed: f64,
    pub free_flow_speed: f64,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HistogramBin {
    pub lo: f64,
    pub hi: f64,
    pub count: usize,
}

/// Everything the traffic view renders in one pass.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TrafficView {
    pub samples: Vec<TrafficSample>,
    /// First rows shown as a table peek above the charts.
    pub preview: Vec<TrafficSample>,
    pub speed_profile: Vec<SpeedPoint>,
    pub jam_histogram: Vec<HistogramBin>,
    pub summary: TrafficSummary,
}

fn linspace(min: f64, max: f64, n: usize) -> Vec<f64> {
    if n < 2 {
        return vec![min];
    }
    let step = (max - min) / (n as f64 - 1.0);
    (0..n).map(|i| min + step * i as f64).collect()
}

/// Generate the full 15×15 grid of samples with uniform random values.
pub fn generate_grid() -> Vec<TrafficSample> {
    let mut rng = rand::thread_rng();
    let lats = linspace(LAT_MIN, LAT_MAX, GRID_POINTS);
    let lons = linspace(LON_MIN, LON_MAX, GRID_POINTS);

    let mut samples = Vec::with_capacity(GRID_POINTS * GRID_POINTS);
    for &lat in &lats {
        for &lon in &lons {
            samples.push(TrafficSample {
                latitude: lat,
                longitude: lon,
                current_speed: rng.gen_range(10.0..60.0),
                free_flow_speed: rng.gen_range(40.0..70.0),
                jam_factor: rng.gen_range(0.0..10.0),
                confidence: rng.gen_range(0.5..1.0),
            });
        }
    }
    samples
}

pub fn summarize(samples: &[TrafficSample]) -> TrafficSummary {
    let n = samples.len().max(1) as f64;
    let mut sum_cur = 0.0;
    let mut sum_free = 0.0;
    let mut sum_jam = 0.0;
    let mut max_jam = f64::MIN;
    for s in samples {
        sum_cur += s.current_speed;
        sum_free += s.free_flow_speed;
        sum_jam += s.jam_factor;
        if s.jam_factor > max_jam {
            max_jam = s.jam_factor;
        }
    }
    if samples.is_empty() {
        max_jam = 0.0;
    }
    TrafficSummary {
        avg_current_speed: sum_cur / n,
        avg_free_flow_speed: sum_free / n,
        avg_jam_factor: sum_jam / n,
        max_jam_factor: max_jam,
    }
}

/// Speed rows sorted ascending by latitude for the line chart.
pub fn speed_profile(samples: &[TrafficSample]) -> Vec<SpeedPoint> {
    let mut rows: Vec<SpeedPoint> = samples
        .iter()
        .map(|s| SpeedPoint {
            latitude: s.latitude,
            current_speed: s.current_speed,
            free_flow_speed: s.free_flow_speed,
        })
        .collect();
    rows.sort_by(|a, b| a.latitude.total_cmp(&b.latitude));
    rows
}

/// Equal-width bins over the observed jam-factor range. The last bin is
/// closed on both ends so the maximum lands inside it.
pub fn jam_histogram(samples: &[TrafficSample], nbins: usize) -> Vec<HistogramBin> {
    if samples.is_empty() || nbins == 0 {
        return Vec::new();
    }
    let mut lo = f64::MAX;
    let mut hi = f64::MIN;
    for s in samples {
        lo = lo.min(s.jam_factor);
        hi = hi.max(s.jam_factor);
    }
    let span = hi - lo;
    if span <= f64::EPSILON {
        return vec![HistogramBin {
            lo,
            hi,
            count: samples.len(),
        }];
    }

    let width = span / nbins as f64;
    let mut counts = vec![0usize; nbins];
    for s in samples {
        let idx = (((s.jam_factor - lo) / width) as usize).min(nbins - 1);
        counts[idx] += 1;
    }
    counts
        .into_iter()
        .enumerate()
        .map(|(i, count)| HistogramBin {
            lo: lo + width * i as f64,
            hi: lo + width * (i + 1) as f64,
            count,
        })
        .collect()
}

impl TrafficView {
    /// One full render pass: fresh samples plus every chart input.
    pub fn generate() -> Self {
        let samples = generate_grid();
        let preview = samples.iter().take(10).cloned().collect();
        let speed_profile = speed_profile(&samples);
        let jam_histogram = jam_histogram(&samples, JAM_HISTOGRAM_BINS);
        let summary = summarize(&samples);
        Self {
            samples,
            preview,
            speed_profile,
            jam_histogram,
            summary,
        }
    }
}
