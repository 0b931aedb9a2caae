//! One-dimensional gap clustering of word positions.

/// Gap thresholds for grouping word positions into rows and columns.
#[derive(Debug, Clone, PartialEq)]
pub struct ClusterOptions {
    /// Maximum gap between successive x positions in one column.
    pub x_gap: f64,
    /// Maximum gap between successive y positions in one row.
    pub y_gap: f64,
    /// Retry gap for x when the first pass finds too few columns.
    pub coarse_x_gap: f64,
    /// Retry gap for y when the first pass finds too few rows.
    pub coarse_y_gap: f64,
    /// Clusters required on each axis.
    pub min_clusters: usize,
}

impl Default for ClusterOptions {
    fn default() -> Self {
        Self {
            x_gap: 18.0,
            y_gap: 12.0,
            coarse_x_gap: 30.0,
            coarse_y_gap: 20.0,
            min_clusters: 5,
        }
    }
}

/// Cluster positions and return each cluster's mean, ascending.
///
/// Positions are sorted; each one joins the current cluster when it lies
/// within `max_gap` of that cluster's last member, otherwise it opens a new
/// cluster.
pub fn cluster_positions(positions: &[f64], max_gap: f64) -> Vec<f64> {
    let mut sorted = positions.to_vec();
    sorted.sort_by(f64::total_cmp);

    let mut clusters: Vec<Vec<f64>> = Vec::new();
    for p in sorted {
        let joins = clusters
            .last()
            .and_then(|c| c.last())
            .is_some_and(|last| (p - last).abs() <= max_gap);
        match clusters.last_mut() {
            Some(current) if joins => current.push(p),
            _ => clusters.push(vec![p]),
        }
    }

    clusters
        .iter()
        .map(|c| c.iter().sum::<f64>() / c.len() as f64)
        .collect()
}

/// Cluster with `gap`, retrying with `coarse_gap` when fewer than `min`
/// clusters come out.
pub fn cluster_axis(positions: &[f64], gap: f64, coarse_gap: f64, min: usize) -> Vec<f64> {
    let centers = cluster_positions(positions, gap);
    if centers.len() < min {
        cluster_positions(positions, coarse_gap)
    } else {
        centers
    }
}

/// Index of the center closest to `value`; ties go to the lower index.
pub fn nearest_index(centers: &[f64], value: f64) -> Option<usize> {
    let mut best: Option<(usize, f64)> = None;
    for (i, center) in centers.iter().enumerate() {
        let distance = (center - value).abs();
        if best.is_none_or(|(_, d)| distance < d) {
            best = Some((i, distance));
        }
    }
    best.map(|(i, _)| i)
}
