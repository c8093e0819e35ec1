use itertools::Itertools;

pub fn mean(data: &[f64]) -> Option<f64> {
    let sum = data.iter().sum::<f64>();
    let count = data.len();

    match count {
        positive if positive > 0 => Some(sum / count as f64),
        _ => None,
    }
}

/// Midpoint rule on a sorted copy: exact middle element for odd lengths,
/// average of the two middle elements for even lengths.
pub fn median(data: &[f64]) -> Option<f64> {
    if data.is_empty() {
        return None;
    }

    let sorted: Vec<f64> = data
        .iter()
        .copied()
        .sorted_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal))
        .collect();

    let half = sorted.len() / 2;
    if sorted.len() % 2 == 1 {
        Some(sorted[half])
    } else {
        Some((sorted[half - 1] + sorted[half]) / 2.0)
    }
}
