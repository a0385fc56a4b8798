use crate::models::GeoPoint;
use std::fmt;
use thiserror::Error;

/// Minimum number of input points before closure (a triangle)
pub const MIN_RING_POINTS: usize = 3;

/// Errors raised while turning client points into a polygon ring
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum GeometryError {
    #[error("coordinates must have at least 3 points (got {0})")]
    TooFewPoints(usize),

    #[error("invalid coordinate at index {0}")]
    InvalidCoordinate(usize),
}

impl GeometryError {
    /// Stable machine-readable code for this error
    pub fn code(&self) -> &'static str {
        match self {
            GeometryError::TooFewPoints(_) => "coordinates_must_have_at_least_3_points",
            GeometryError::InvalidCoordinate(_) => "invalid_coordinate",
        }
    }
}

/// A closed polygon boundary, stored as WKT vertex tokens (`"lng lat"`)
///
/// The first and last tokens are always textually equal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ring {
    tokens: Vec<String>,
}

impl Ring {
    /// Number of vertices including the closing one
    pub fn vertex_count(&self) -> usize {
        self.tokens.len()
    }

    pub fn tokens(&self) -> &[String] {
        &self.tokens
    }

    /// Render as a WKT polygon literal
    pub fn to_wkt(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Ring {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "POLYGON(({}))", self.tokens.join(", "))
    }
}

/// Format a point as a WKT vertex token
///
/// WKT puts longitude first, so the struct order is inverted here.
#[inline]
pub fn vertex_token(point: &GeoPoint) -> String {
    format!("{} {}", unsigned_zero(point.lng), unsigned_zero(point.lat))
}

/// Negative zero is written as `0`
#[inline]
fn unsigned_zero(value: f64) -> f64 {
    if value == 0.0 { 0.0 } else { value }
}

/// Build a closed ring from an ordered point sequence
///
/// Closure compares the formatted first and last tokens as text and appends
/// a copy of the first token when they differ.
///
/// # Errors
/// * `TooFewPoints` if fewer than 3 points are given
/// * `InvalidCoordinate` if any latitude or longitude is NaN or infinite
pub fn build_ring(points: &[GeoPoint]) -> Result<Ring, GeometryError> {
    if points.len() < MIN_RING_POINTS {
        return Err(GeometryError::TooFewPoints(points.len()));
    }

    let mut tokens = Vec::with_capacity(points.len() + 1);
    for (index, point) in points.iter().enumerate() {
        if !point.lat.is_finite() || !point.lng.is_finite() {
            return Err(GeometryError::InvalidCoordinate(index));
        }
        tokens.push(vertex_token(point));
    }

    if tokens.first() != tokens.last() {
        let first = tokens[0].clone();
        tokens.push(first);
    }

    Ok(Ring { tokens })
}
