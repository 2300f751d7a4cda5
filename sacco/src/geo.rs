use crate::{
    models::{Branch, Coordinates},
    state::Portal,
};

const EARTH_RADIUS_KM: f64 = 6371.0;

pub const DEFAULT_NEAREST_LIMIT: usize = 3;

/// Great-circle distance in kilometers between two coordinate pairs
/// (Haversine).
pub fn distance_km(a: Coordinates, b: Coordinates) -> f64 {
    let d_lat = (b.lat - a.lat).to_radians();
    let d_lng = (b.lng - a.lng).to_radians();

    let h = (d_lat / 2.0).sin().powi(2)
        + a.lat.to_radians().cos() * b.lat.to_radians().cos() * (d_lng / 2.0).sin().powi(2);
    let c = 2.0 * h.sqrt().atan2((1.0 - h).sqrt());

    EARTH_RADIUS_KM * c
}

#[derive(Debug, Clone)]
pub struct BranchDistance {
    pub branch: Branch,
    pub distance_km: f64,
}

/// Every branch with its distance from `from`, ascending, truncated to
/// `limit`.
pub fn rank_branches(branches: Vec<Branch>, from: Coordinates, limit: usize) -> Vec<BranchDistance> {
    let mut ranked: Vec<BranchDistance> = branches
        .into_iter()
        .map(|branch| {
            let distance_km = distance_km(from, branch.coordinates);
            BranchDistance {
                branch,
                distance_km,
            }
        })
        .collect();

    ranked.sort_by(|a, b| a.distance_km.total_cmp(&b.distance_km));
    ranked.truncate(limit);
    ranked
}

impl Portal {
    /// Nearest branches to the caller's position; read failures degrade to
    /// an empty list.
    pub async fn nearest_branches(&self, lat: f64, lng: f64, limit: usize) -> Vec<BranchDistance> {
        let branches = self.branches_or_empty().await;
        rank_branches(branches, Coordinates { lat, lng }, limit)
    }
}
