use geo::{Centroid, MultiPoint, Point};

use crate::models::{BoundingBox, Coordinate};

/// Mean Earth radius in kilometers
pub const EARTH_RADIUS_KM: f64 = 6371.0088;

/// Calculate the Haversine distance between two points in kilometers
///
/// # Arguments
/// * `lat1` - Latitude of first point in degrees
/// * `lon1` - Longitude of first point in degrees
/// * `lat2` - Latitude of second point in degrees
/// * `lon2` - Longitude of second point in degrees
///
/// # Returns
/// Distance in kilometers
#[inline]
pub fn haversine_distance(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let lat1_rad = lat1.to_radians();
    let lat2_rad = lat2.to_radians();
    let delta_lat = (lat2 - lat1).to_radians();
    let delta_lon = (lon2 - lon1).to_radians();

    let a = (delta_lat / 2.0).sin().powi(2)
        + lat1_rad.cos() * lat2_rad.cos() * (delta_lon / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

    EARTH_RADIUS_KM * c
}

impl Coordinate {
    /// Great-circle distance to another coordinate in kilometers
    #[inline]
    pub fn distance_km(&self, other: &Coordinate) -> f64 {
        haversine_distance(self.latitude, self.longitude, other.latitude, other.longitude)
    }
}

/// Arithmetic mean of a set of coordinates, `None` when empty
pub fn mean_coordinate<'a, I>(coords: I) -> Option<Coordinate>
where
    I: IntoIterator<Item = &'a Coordinate>,
{
    let points: MultiPoint<f64> = coords
        .into_iter()
        .map(|c| Point::new(c.longitude, c.latitude))
        .collect::<Vec<_>>()
        .into();
    points.centroid().map(|p| Coordinate {
        latitude: p.y(),
        longitude: p.x(),
    })
}

/// Check if a point is within a bounding box
#[inline]
pub fn is_within_bounding_box(
    lat: f64,
    lon: f64,
    bbox: &BoundingBox,
) -> bool {
    lat >= bbox.min_lat
        && lat <= bbox.max_lat
        && lon >= bbox.min_lon
        && lon <= bbox.max_lon
}

/// Symmetric all-pairs distance table in kilometers
///
/// Each unordered pair is computed once and mirrored.
#[derive(Debug, Clone, PartialEq)]
pub struct DistanceMatrix {
    n: usize,
    data: Vec<f64>,
}

impl DistanceMatrix {
    pub fn from_coordinates(coords: &[Coordinate]) -> Self {
        let n = coords.len();
        let mut data = vec![0.0; n * n];
        for i in 0..n {
            for j in (i + 1)..n {
                let d = coords[i].distance_km(&coords[j]);
                data[i * n + j] = d;
                data[j * n + i] = d;
            }
        }
        Self { n, data }
    }

    #[inline]
    pub fn get(&self, i: usize, j: usize) -> f64 {
        self.data[i * self.n + j]
    }

    pub fn len(&self) -> usize {
        self.n
    }

    pub fn is_empty(&self) -> bool {
        self.n == 0
    }

    /// Sum of distances from `i` to every listed club
    #[inline]
    pub fn row_sum_over(&self, i: usize, members: &[usize]) -> f64 {
        members.iter().map(|&j| self.get(i, j)).sum()
    }

    /// Sum of unordered pairwise distances inside a group
    pub fn pairwise_sum(&self, members: &[usize]) -> f64 {
        let mut total = 0.0;
        for (k, &i) in members.iter().enumerate() {
            for &j in &members[k + 1..] {
                total += self.get(i, j);
            }
        }
        total
    }
}
