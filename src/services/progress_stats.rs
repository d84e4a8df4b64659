use serde::Serialize;

use crate::models::progress::{Measurements, Progress, ProgressType};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetricProgress {
    pub start: f64,
    pub current: f64,
    pub change: f64,
    pub percentage: String, // one decimal, e.g. "-3.5"
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressStats {
    pub total_measurements: usize,
    pub total_performances: usize,
    pub latest_measurement: Option<Progress>,
    pub latest_performance: Option<Progress>,
    pub weight_progress: Option<MetricProgress>,
    pub body_fat_progress: Option<MetricProgress>,
}

#[derive(Debug, Serialize)]
pub struct ClientProgressReport {
    pub stats: ProgressStats,
    pub measurements: Vec<Progress>,
    pub performances: Vec<Progress>,
}

fn metric_progress(start: Option<f64>, current: Option<f64>) -> Option<MetricProgress> {
    let (start, current) = (start?, current?);
    if start == 0.0 || current == 0.0 {
        return None;
    }

    let change = current - start;
    Some(MetricProgress {
        start,
        current,
        change,
        percentage: format!("{:.1}", change / start * 100.0),
    })
}

fn field(record: &Progress, pick: impl Fn(&Measurements) -> Option<f64>) -> Option<f64> {
    record.measurements.as_ref().and_then(pick)
}

/// Summarizes one client's records. Input order does not matter; records are
/// sorted oldest first before comparing.
pub fn client_progress_report(records: Vec<Progress>) -> ClientProgressReport {
    let (mut measurements, mut performances): (Vec<Progress>, Vec<Progress>) = records
        .into_iter()
        .filter(|r| {
            matches!(
                r.progress_type,
                ProgressType::Measurement | ProgressType::Performance
            )
        })
        .partition(|r| r.progress_type == ProgressType::Measurement);

    measurements.sort_by_key(|r| r.date);
    performances.sort_by_key(|r| r.date);

    let (weight_progress, body_fat_progress) = match (measurements.first(), measurements.last()) {
        (Some(first), Some(latest)) if measurements.len() >= 2 => (
            metric_progress(field(first, |m| m.weight), field(latest, |m| m.weight)),
            metric_progress(field(first, |m| m.body_fat), field(latest, |m| m.body_fat)),
        ),
        _ => (None, None),
    };

    let stats = ProgressStats {
        total_measurements: measurements.len(),
        total_performances: performances.len(),
        latest_measurement: measurements.last().cloned(),
        latest_performance: performances.last().cloned(),
        weight_progress,
        body_fat_progress,
    };

    ClientProgressReport {
        stats,
        measurements,
        performances,
    }
}
