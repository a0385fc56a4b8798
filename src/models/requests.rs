use crate::core::ring::{GeometryError, MIN_RING_POINTS};
use crate::models::domain::{GeoPoint, QueryFilter, RegionSelector};
use serde::Deserialize;
use serde_json::Value;
use validator::Validate;

/// Boolean flag that also accepts the string `"true"`
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum FlagParam {
    Bool(bool),
    Text(String),
    Other(Value),
}

impl FlagParam {
    pub fn is_set(&self) -> bool {
        match self {
            FlagParam::Bool(b) => *b,
            FlagParam::Text(s) => s == "true",
            FlagParam::Other(_) => false,
        }
    }
}

/// Requested row cap; numbers and numeric strings are both honoured
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum LimitParam {
    Number(f64),
    Text(String),
    Other(Value),
}

impl LimitParam {
    /// Numeric reading of the value, `None` when it has none
    pub fn as_number(&self) -> Option<f64> {
        match self {
            LimitParam::Number(n) => Some(*n),
            LimitParam::Text(s) => {
                let trimmed = s.trim();
                if trimmed.is_empty() {
                    Some(0.0)
                } else {
                    trimmed.parse().ok()
                }
            }
            LimitParam::Other(Value::Bool(b)) => Some(if *b { 1.0 } else { 0.0 }),
            LimitParam::Other(_) => None,
        }
    }
}

/// Request to find addresses inside a polygon
///
/// POST /api/addresses/in-polygon
///
/// `coordinates` stays untyped until [`PolygonQueryRequest::points`] so that
/// a short list is reported before a malformed point. Region names are capped
/// at the width of the `road_name_code` name columns.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct PolygonQueryRequest {
    #[serde(default)]
    pub coordinates: Option<Value>,
    #[validate(length(max = 40))]
    #[serde(default)]
    pub sidonm: Option<String>,
    #[validate(length(max = 40))]
    #[serde(default)]
    pub sggnm: Option<String>,
    #[validate(length(max = 40))]
    #[serde(default)]
    pub emdnm: Option<String>,
    #[serde(alias = "only_missing", rename = "onlyMissing", default)]
    pub only_missing: Option<FlagParam>,
    #[serde(default)]
    pub limit: Option<LimitParam>,
}

impl PolygonQueryRequest {
    /// Convert the raw coordinate list into points
    ///
    /// # Errors
    /// * `TooFewPoints` if `coordinates` is missing, not an array, or shorter than 3
    /// * `InvalidCoordinate` if a point's `lat` or `lng` is not a JSON number
    pub fn points(&self) -> Result<Vec<GeoPoint>, GeometryError> {
        let items = match &self.coordinates {
            Some(Value::Array(items)) => items,
            _ => return Err(GeometryError::TooFewPoints(0)),
        };

        if items.len() < MIN_RING_POINTS {
            return Err(GeometryError::TooFewPoints(items.len()));
        }

        items
            .iter()
            .enumerate()
            .map(|(index, item)| {
                GeoPoint::from_json(&item["lat"], &item["lng"])
                    .ok_or(GeometryError::InvalidCoordinate(index))
            })
            .collect()
    }

    pub fn filter(&self) -> QueryFilter {
        QueryFilter {
            sidonm: self.sidonm.clone(),
            sggnm: self.sggnm.clone(),
            emdnm: self.emdnm.clone(),
            only_missing: self.only_missing.as_ref().is_some_and(FlagParam::is_set),
        }
    }

    pub fn requested_limit(&self) -> Option<f64> {
        self.limit.as_ref().and_then(LimitParam::as_number)
    }
}

/// Query string of the region listing
///
/// GET /api/addresses?sidonm=..&sggnm=..&emdnm=..&onlyMissing=true
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct RegionQueryParams {
    #[validate(length(max = 40))]
    pub sidonm: Option<String>,
    #[validate(length(max = 40))]
    pub sggnm: Option<String>,
    #[validate(length(max = 40))]
    pub emdnm: Option<String>,
    #[serde(rename = "onlyMissing")]
    pub only_missing: Option<String>,
}

impl RegionQueryParams {
    /// Fill missing region names from the configured defaults
    pub fn selector(&self, defaults: &RegionSelector) -> RegionSelector {
        RegionSelector {
            sido_nm: self.sidonm.clone().unwrap_or_else(|| defaults.sido_nm.clone()),
            sgg_nm: self.sggnm.clone().unwrap_or_else(|| defaults.sgg_nm.clone()),
            emd_nm: self.emdnm.clone().unwrap_or_else(|| defaults.emd_nm.clone()),
        }
    }

    pub fn only_missing(&self) -> bool {
        self.only_missing.as_deref() == Some("true")
    }
}

/// Path of the coordinate update endpoint
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct AddressPath {
    #[serde(rename = "mgtNo")]
    #[validate(length(min = 1, max = 26))]
    pub mgt_no: String,
}

/// Request to overwrite one address's coordinates
///
/// POST /api/address/{mgtNo}/coords
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateCoordsRequest {
    #[serde(default)]
    pub lat: Value,
    #[serde(default)]
    pub lng: Value,
}

impl UpdateCoordsRequest {
    pub fn point(&self) -> Option<GeoPoint> {
        GeoPoint::from_json(&self.lat, &self.lng)
    }
}
