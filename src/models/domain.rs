use serde::{Deserialize, Serialize};

/// A geographic point in WGS 84 degrees
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub lat: f64,
    pub lng: f64,
}

impl GeoPoint {
    /// Build a point from loosely-typed JSON values
    ///
    /// Only JSON numbers are accepted; numeric-looking strings are not.
    pub fn from_json(lat: &serde_json::Value, lng: &serde_json::Value) -> Option<Self> {
        Some(Self {
            lat: lat.as_f64()?,
            lng: lng.as_f64()?,
        })
    }
}

/// Optional categorical constraints for an address query
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryFilter {
    pub sidonm: Option<String>,
    pub sggnm: Option<String>,
    pub emdnm: Option<String>,
    /// Select rows with a missing latitude or longitude instead of located ones
    pub only_missing: bool,
}

impl QueryFilter {
    /// Present region filters as `(column, value)` in sido, sgg, emd order
    ///
    /// Empty strings are treated as absent.
    pub fn categories(&self) -> impl Iterator<Item = (&'static str, &str)> {
        [
            ("b.sido_nm", self.sidonm.as_deref()),
            ("b.sgg_nm", self.sggnm.as_deref()),
            ("b.emd_nm", self.emdnm.as_deref()),
        ]
        .into_iter()
        .filter_map(|(column, value)| match value {
            Some(v) if !v.is_empty() => Some((column, v)),
            _ => None,
        })
    }
}

/// Fully specified administrative region for the listing query
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegionSelector {
    pub sido_nm: String,
    pub sgg_nm: String,
    pub emd_nm: String,
}

/// Polygon query result row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AddressItem {
    pub mgt_no: String,
    pub lat: Option<f64>,
    pub lng: Option<f64>,
    pub road_addr: Option<String>,
}

/// Full address row as returned by the region listing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AddressRecord {
    pub mgt_no: String,
    pub road_cd: String,
    pub emd_seq: String,
    pub bld_main_no: i32,
    pub bld_sub_no: i32,
    pub zone_no: Option<String>,
    pub lat: Option<f64>,
    pub lng: Option<f64>,
    pub sido_nm: String,
    pub sgg_nm: Option<String>,
    pub emd_nm: Option<String>,
    pub road_nm: String,
    pub road_addr: Option<String>,
}
