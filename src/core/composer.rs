use crate::core::limit::LimitPolicy;
use crate::core::ring::{build_ring, GeometryError};
use crate::models::{GeoPoint, QueryFilter, RegionSelector};

/// WGS 84, the system client lat/lng values are expressed in
pub const DEFAULT_SRID: i32 = 4326;

const ADDRESS_JOIN: &str = "FROM kr_juso.juso_addr a \
     JOIN kr_juso.road_name_code b \
       ON a.road_cd = b.road_cd \
      AND a.emd_seq = b.emd_seq";

const ROAD_ADDR_EXPR: &str = "CONCAT_WS(' ', b.sido_nm, b.sgg_nm, b.emd_nm, b.road_nm, \
     a.bld_main_no::text || CASE WHEN a.bld_sub_no > 0 THEN '-' || a.bld_sub_no::text ELSE '' END\
     ) AS road_addr";

const ORDER_BY: &str = "ORDER BY b.road_nm, a.bld_main_no, a.bld_sub_no";

pub const COORDS_PRESENT: &str = "a.lat IS NOT NULL AND a.lng IS NOT NULL";
pub const COORDS_MISSING: &str = "(a.lat IS NULL OR a.lng IS NULL)";

/// A value bound to a positional placeholder
#[derive(Debug, Clone, PartialEq)]
pub enum SqlParam {
    Text(String),
    Int(i64),
}

impl From<&str> for SqlParam {
    fn from(value: &str) -> Self {
        SqlParam::Text(value.to_string())
    }
}

impl From<i64> for SqlParam {
    fn from(value: i64) -> Self {
        SqlParam::Int(value)
    }
}

/// A fully parameterized query: SQL text plus values in placeholder order
///
/// `predicates` holds the individual `WHERE` clauses in the order they are
/// conjoined.
#[derive(Debug, Clone, PartialEq)]
pub struct QueryPlan {
    pub sql: String,
    pub predicates: Vec<String>,
    pub params: Vec<SqlParam>,
}

/// Positional parameter list that hands out `$n` placeholders in push order
#[derive(Debug, Default)]
struct Bindings {
    params: Vec<SqlParam>,
}

impl Bindings {
    fn bind(&mut self, value: impl Into<SqlParam>) -> String {
        self.params.push(value.into());
        format!("${}", self.params.len())
    }
}

/// Builds address queries out of static SQL fragments and bound values
///
/// Client values only ever reach the store through `QueryPlan::params`.
/// The SRID is server configuration and is written into the SQL text.
#[derive(Debug, Clone, Copy)]
pub struct QueryComposer {
    limits: LimitPolicy,
    srid: i32,
}

impl Default for QueryComposer {
    fn default() -> Self {
        Self::new(LimitPolicy::default(), DEFAULT_SRID)
    }
}

impl QueryComposer {
    pub fn new(limits: LimitPolicy, srid: i32) -> Self {
        Self { limits, srid }
    }

    pub fn limits(&self) -> LimitPolicy {
        self.limits
    }

    pub fn srid(&self) -> i32 {
        self.srid
    }

    /// Containment test of each row's point against the bound polygon
    fn spatial_clause(&self, placeholder: &str) -> String {
        format!(
            "ST_Contains(ST_GeomFromText({placeholder}, {srid}), \
             ST_SetSRID(ST_MakePoint(a.lng, a.lat), {srid}))",
            srid = self.srid
        )
    }

    /// Build a ring from client points and compose the polygon query
    ///
    /// A ring error aborts before any parameter is built.
    pub fn plan_polygon_query(
        &self,
        points: &[GeoPoint],
        filter: &QueryFilter,
        limit: Option<f64>,
    ) -> Result<QueryPlan, GeometryError> {
        let ring = build_ring(points)?;
        Ok(self.compose(&ring.to_wkt(), filter, limit))
    }

    /// Compose the polygon-containment query
    ///
    /// Parameter layout: `$1` is the polygon WKT, then one value per present
    /// region filter (sido, sgg, emd), then the row cap.
    pub fn compose(&self, geometry: &str, filter: &QueryFilter, limit: Option<f64>) -> QueryPlan {
        let mut bindings = Bindings::default();
        let mut predicates = Vec::with_capacity(5);

        let geometry_slot = bindings.bind(geometry);
        predicates.push(self.spatial_clause(&geometry_slot));

        predicates.push(presence_clause(filter.only_missing).to_string());

        for (column, value) in filter.categories() {
            let slot = bindings.bind(value);
            predicates.push(format!("{column} = {slot}"));
        }

        let effective_limit = self.limits.effective(limit);
        let limit_slot = bindings.bind(i64::from(effective_limit));

        let sql = format!(
            "SELECT a.mgt_no, a.lat, a.lng, b.sido_nm, b.sgg_nm, b.emd_nm, b.road_nm, {ROAD_ADDR_EXPR} \
             {ADDRESS_JOIN} \
             WHERE {} \
             {ORDER_BY} \
             LIMIT {limit_slot}",
            predicates.join(" AND ")
        );

        tracing::trace!(
            filters = predicates.len() - 2,
            limit = effective_limit,
            "Composed polygon query"
        );

        QueryPlan {
            sql,
            predicates,
            params: bindings.params,
        }
    }

    /// Compose the plain region listing query (no spatial predicate, no cap)
    pub fn compose_region(&self, region: &RegionSelector, only_missing: bool) -> QueryPlan {
        let mut bindings = Bindings::default();
        let mut predicates = Vec::with_capacity(4);

        let slot = bindings.bind(region.sido_nm.as_str());
        predicates.push(format!("b.sido_nm = {slot}"));
        let slot = bindings.bind(region.sgg_nm.as_str());
        predicates.push(format!("b.sgg_nm = {slot}"));
        let slot = bindings.bind(region.emd_nm.as_str());
        predicates.push(format!("b.emd_nm = {slot}"));

        if only_missing {
            predicates.push(COORDS_MISSING.to_string());
        }

        let sql = format!(
            "SELECT a.mgt_no, a.road_cd, a.emd_seq, a.bld_main_no, a.bld_sub_no, a.zone_no, \
                    a.lat, a.lng, b.sido_nm, b.sgg_nm, b.emd_nm, b.road_nm, {ROAD_ADDR_EXPR} \
             {ADDRESS_JOIN} \
             WHERE {} \
             {ORDER_BY}",
            predicates.join(" AND ")
        );

        QueryPlan {
            sql,
            predicates,
            params: bindings.params,
        }
    }
}

/// Coordinate-presence predicate for the requested mode
#[inline]
pub fn presence_clause(only_missing: bool) -> &'static str {
    if only_missing {
        COORDS_MISSING
    } else {
        COORDS_PRESENT
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filter(sido: Option<&str>, sgg: Option<&str>, emd: Option<&str>) -> QueryFilter {
        QueryFilter {
            sidonm: sido.map(str::to_string),
            sggnm: sgg.map(str::to_string),
            emdnm: emd.map(str::to_string),
            only_missing: false,
        }
    }

    fn placeholder_count(sql: &str) -> usize {
        (1..=16).filter(|n| sql.contains(&format!("${n}"))).count()
    }

    #[test]
    fn test_end_to_end_example() {
        let composer = QueryComposer::default();
        let points = [
            GeoPoint { lat: 1.0, lng: 1.0 },
            GeoPoint { lat: 1.0, lng: 2.0 },
            GeoPoint { lat: 2.0, lng: 2.0 },
        ];

        let plan = composer
            .plan_polygon_query(&points, &QueryFilter::default(), None)
            .unwrap();

        assert_eq!(plan.predicates.len(), 2);
        assert!(plan.predicates[0].starts_with("ST_Contains(ST_GeomFromText($1, 4326)"));
        assert_eq!(plan.predicates[1], COORDS_PRESENT);
        assert_eq!(
            plan.params,
            vec![
                SqlParam::Text("POLYGON((1 1, 2 1, 2 2, 1 1))".to_string()),
                SqlParam::Int(1000),
            ]
        );
        assert!(plan.sql.ends_with("LIMIT $2"));
    }

    #[test]
    fn test_filters_in_lock_step() {
        let composer = QueryComposer::default();
        let plan = composer.compose("POLYGON((0 0, 1 0, 1 1, 0 0))", &filter(Some("A"), None, Some("B")), None);

        assert_eq!(plan.predicates.len(), 4);
        assert_eq!(plan.predicates[2], "b.sido_nm = $2");
        assert_eq!(plan.predicates[3], "b.emd_nm = $3");
        assert_eq!(plan.params[1], SqlParam::Text("A".to_string()));
        assert_eq!(plan.params[2], SqlParam::Text("B".to_string()));
        assert_eq!(plan.params[3], SqlParam::Int(1000));
        assert!(plan.sql.contains("LIMIT $4"));
    }

    #[test]
    fn test_all_filters_order() {
        let composer = QueryComposer::default();
        let plan = composer.compose("POLYGON((0 0, 1 0, 1 1, 0 0))", &filter(Some("A"), Some("B"), Some("C")), Some(10.0));

        assert_eq!(
            &plan.predicates[2..],
            &["b.sido_nm = $2", "b.sgg_nm = $3", "b.emd_nm = $4"]
        );
        assert_eq!(plan.params.last(), Some(&SqlParam::Int(10)));
        assert_eq!(placeholder_count(&plan.sql), plan.params.len());
    }

    #[test]
    fn test_empty_filter_values_skipped() {
        let composer = QueryComposer::default();
        let plan = composer.compose("POLYGON((0 0, 1 0, 1 1, 0 0))", &filter(Some(""), Some("B"), None), None);

        assert_eq!(plan.predicates[2..], ["b.sgg_nm = $2"]);
        assert_eq!(plan.params.len(), 3);
    }

    #[test]
    fn test_limit_fallback_and_clamp() {
        let composer = QueryComposer::default();
        let wkt = "POLYGON((0 0, 1 0, 1 1, 0 0))";

        let plan = composer.compose(wkt, &QueryFilter::default(), Some(0.0));
        assert_eq!(plan.params.last(), Some(&SqlParam::Int(1000)));

        let plan = composer.compose(wkt, &QueryFilter::default(), Some(999_999.0));
        assert_eq!(plan.params.last(), Some(&SqlParam::Int(5000)));
    }

    #[test]
    fn test_only_missing_keeps_spatial_clause() {
        let composer = QueryComposer::default();
        let only_missing = QueryFilter {
            only_missing: true,
            ..QueryFilter::default()
        };

        let plan = composer.compose("POLYGON((0 0, 1 0, 1 1, 0 0))", &only_missing, None);

        assert!(plan.predicates[0].starts_with("ST_Contains"));
        assert_eq!(plan.predicates[1], COORDS_MISSING);
        assert!(!plan.sql.contains(COORDS_PRESENT));
    }

    #[test]
    fn test_values_never_interpolated() {
        let composer = QueryComposer::default();
        let hostile = "x' OR '1'='1";
        let plan = composer.compose("POLYGON((0 0, 1 0, 1 1, 0 0))", &filter(Some(hostile), Some(hostile), Some(hostile)), None);

        assert!(!plan.sql.contains(hostile));
        assert!(!plan.sql.contains("POLYGON"));
        assert_eq!(placeholder_count(&plan.sql), plan.params.len());
    }

    #[test]
    fn test_srid_is_configurable() {
        let composer = QueryComposer::new(LimitPolicy::default(), 5179);
        let plan = composer.compose("POLYGON((0 0, 1 0, 1 1, 0 0))", &QueryFilter::default(), None);

        assert!(plan.predicates[0].contains("ST_GeomFromText($1, 5179)"));
        assert!(plan.predicates[0].contains("ST_MakePoint(a.lng, a.lat), 5179)"));
    }

    #[test]
    fn test_ring_error_aborts_composition() {
        let composer = QueryComposer::default();
        let result = composer.plan_polygon_query(
            &[GeoPoint { lat: 1.0, lng: 1.0 }],
            &QueryFilter::default(),
            None,
        );

        assert_eq!(result, Err(GeometryError::TooFewPoints(1)));
    }

    #[test]
    fn test_region_query() {
        let composer = QueryComposer::default();
        let region = RegionSelector {
            sido_nm: "경기도".to_string(),
            sgg_nm: "화성시".to_string(),
            emd_nm: "남양읍".to_string(),
        };

        let plan = composer.compose_region(&region, false);
        assert_eq!(plan.predicates.len(), 3);
        assert_eq!(plan.params.len(), 3);
        assert!(!plan.sql.contains("LIMIT"));
        assert!(!plan.sql.contains("ST_Contains"));

        let plan = composer.compose_region(&region, true);
        assert_eq!(plan.predicates.last().map(String::as_str), Some(COORDS_MISSING));
        assert_eq!(plan.params[0], SqlParam::Text("경기도".to_string()));
    }
}
