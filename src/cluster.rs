//! Greedy proximity clustering of geographic points

use crate::geometry::{haversine_distance, LatLon};

/// A group of nearby points represented by their running-mean centroid
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Cluster {
    /// Mean position of the member points
    pub centroid: LatLon,
    /// Number of member points
    pub count: usize,
}

impl Cluster {
    fn singleton(point: LatLon) -> Self {
        Self {
            centroid: point,
            count: 1,
        }
    }

    /// Fold a point into the centroid with an incremental mean update
    fn absorb(&mut self, point: LatLon) {
        let count = self.count as f64;
        let new_count = count + 1.0;
        self.centroid = LatLon::new(
            (self.centroid.lat * count + point.lat) / new_count,
            (self.centroid.lon * count + point.lon) / new_count,
        );
        self.count += 1;
    }
}

/// Merge points lying within `min_distance_m` meters of an existing centroid.
///
/// Each point joins the first cluster (in creation order) whose current centroid is
/// close enough, otherwise it starts a new one. The result depends on input order and
/// is not a globally optimal partition. A non-positive distance disables merging.
pub fn cluster_points(points: &[LatLon], min_distance_m: f64) -> Vec<Cluster> {
    if min_distance_m <= 0.0 {
        return points.iter().copied().map(Cluster::singleton).collect();
    }

    let mut clusters: Vec<Cluster> = Vec::new();
    for &point in points {
        match clusters
            .iter_mut()
            .find(|cluster| haversine_distance(point, cluster.centroid) <= min_distance_m)
        {
            Some(cluster) => cluster.absorb(point),
            None => clusters.push(Cluster::singleton(point)),
        }
    }
    clusters
}

/// Summary figures for a clustering pass
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClusterStats {
    pub points: usize,
    pub clusters: usize,
    pub largest: usize,
}

impl ClusterStats {
    pub fn from_clusters(clusters: &[Cluster]) -> Self {
        Self {
            points: clusters.iter().map(|c| c.count).sum(),
            clusters: clusters.len(),
            largest: clusters.iter().map(|c| c.count).max().unwrap_or(0),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_points() -> Vec<LatLon> {
        vec![
            LatLon::new(52.0, -8.0),
            LatLon::new(52.0001, -8.0001),
            LatLon::new(10.0, 10.0),
        ]
    }

    #[test]
    fn test_zero_distance_keeps_singletons() {
        let clusters = cluster_points(&sample_points(), 0.0);
        assert_eq!(clusters.len(), 3);
        assert!(clusters.iter().all(|c| c.count == 1));
        assert_eq!(clusters[1].centroid, LatLon::new(52.0001, -8.0001));
    }

    #[test]
    fn test_negative_distance_keeps_singletons() {
        assert_eq!(cluster_points(&sample_points(), -10.0).len(), 3);
    }

    #[test]
    fn test_nearby_points_merge() {
        let clusters = cluster_points(&sample_points(), 50.0);
        assert_eq!(clusters.len(), 2);
        assert_eq!(clusters[0].count, 2);
        assert_eq!(clusters[1].count, 1);
        assert!((clusters[0].centroid.lat - 52.00005).abs() < 1e-9);
        assert!((clusters[0].centroid.lon - -8.00005).abs() < 1e-9);
    }

    #[test]
    fn test_huge_distance_collapses_to_mean() {
        let points = sample_points();
        let clusters = cluster_points(&points, f64::INFINITY);
        assert_eq!(clusters.len(), 1);
        assert_eq!(clusters[0].count, 3);

        let mean_lat = points.iter().map(|p| p.lat).sum::<f64>() / 3.0;
        let mean_lon = points.iter().map(|p| p.lon).sum::<f64>() / 3.0;
        assert!((clusters[0].centroid.lat - mean_lat).abs() < 1e-9);
        assert!((clusters[0].centroid.lon - mean_lon).abs() < 1e-9);
    }

    #[test]
    fn test_first_match_wins() {
        // The third point is within reach of both clusters but joins the earlier one
        let points = vec![
            LatLon::new(0.0, 0.0),
            LatLon::new(0.0, 0.0018),
            LatLon::new(0.0, 0.0009),
        ];
        let clusters = cluster_points(&points, 150.0);
        assert_eq!(clusters.len(), 2);
        assert_eq!(clusters[0].count, 2);
        assert_eq!(clusters[1].count, 1);
    }

    #[test]
    fn test_empty_input() {
        assert!(cluster_points(&[], 100.0).is_empty());
        assert_eq!(
            ClusterStats::from_clusters(&[]),
            ClusterStats {
                points: 0,
                clusters: 0,
                largest: 0
            }
        );
    }

    #[test]
    fn test_stats() {
        let clusters = cluster_points(&sample_points(), 50.0);
        let stats = ClusterStats::from_clusters(&clusters);
        assert_eq!(stats.points, 3);
        assert_eq!(stats.clusters, 2);
        assert_eq!(stats.largest, 2);
    }
}
