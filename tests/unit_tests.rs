// Unit tests for Juso Geo

use juso_geo::core::{
    composer::{COORDS_MISSING, COORDS_PRESENT},
    ring::{build_ring, vertex_token, GeometryError},
    LimitPolicy, QueryComposer, SqlParam,
};
use juso_geo::models::{GeoPoint, QueryFilter};

fn square() -> Vec<GeoPoint> {
    vec![
        GeoPoint { lat: 37.20, lng: 126.80 },
        GeoPoint { lat: 37.20, lng: 126.90 },
        GeoPoint { lat: 37.30, lng: 126.90 },
        GeoPoint { lat: 37.30, lng: 126.80 },
    ]
}

#[test]
fn test_ring_closure_appends_first_point() {
    let ring = build_ring(&square()).unwrap();

    assert_eq!(ring.vertex_count(), 5);
    assert_eq!(
        ring.to_wkt(),
        "POLYGON((126.8 37.2, 126.9 37.2, 126.9 37.3, 126.8 37.3, 126.8 37.2))"
    );
}

#[test]
fn test_ring_closure_idempotent() {
    let mut points = square();
    points.push(points[0]);

    let ring = build_ring(&points).unwrap();
    assert_eq!(ring.vertex_count(), points.len());

    // Building from an already closed ring changes nothing
    let again = build_ring(&points).unwrap();
    assert_eq!(ring, again);
}

#[test]
fn test_minimum_vertices() {
    let points = square();

    assert_eq!(build_ring(&points[..2]), Err(GeometryError::TooFewPoints(2)));
    assert!(build_ring(&points[..3]).is_ok());
}

#[test]
fn test_coordinate_order_inverted() {
    let token = vertex_token(&GeoPoint { lat: 37.5, lng: 127.0 });
    assert_eq!(token, "127 37.5");
    assert_ne!(token, "37.5 127");
}

#[test]
fn test_parameter_lock_step() {
    let composer = QueryComposer::default();
    let filter = QueryFilter {
        sidonm: Some("A".to_string()),
        sggnm: None,
        emdnm: Some("B".to_string()),
        only_missing: false,
    };

    let plan = composer.plan_polygon_query(&square(), &filter, None).unwrap();

    let categorical: Vec<&String> = plan.predicates.iter().filter(|p| p.starts_with("b.")).collect();
    assert_eq!(categorical, vec!["b.sido_nm = $2", "b.emd_nm = $3"]);
    assert_eq!(plan.params[1], SqlParam::Text("A".to_string()));
    assert_eq!(plan.params[2], SqlParam::Text("B".to_string()));
}

#[test]
fn test_limit_fallback_and_clamp() {
    let composer = QueryComposer::default();
    let filter = QueryFilter::default();

    let plan = composer.plan_polygon_query(&square(), &filter, Some(0.0)).unwrap();
    assert_eq!(plan.params.last(), Some(&SqlParam::Int(1000)));

    let plan = composer.plan_polygon_query(&square(), &filter, Some(999_999.0)).unwrap();
    assert_eq!(plan.params.last(), Some(&SqlParam::Int(5000)));
}

#[test]
fn test_custom_limit_policy() {
    let composer = QueryComposer::new(LimitPolicy::new(50, 100), 4326);

    let plan = composer.plan_polygon_query(&square(), &QueryFilter::default(), None).unwrap();
    assert_eq!(plan.params.last(), Some(&SqlParam::Int(50)));

    let plan = composer.plan_polygon_query(&square(), &QueryFilter::default(), Some(101.0)).unwrap();
    assert_eq!(plan.params.last(), Some(&SqlParam::Int(100)));
}

#[test]
fn test_end_to_end_example() {
    let composer = QueryComposer::default();
    let points = [
        GeoPoint { lat: 1.0, lng: 1.0 },
        GeoPoint { lat: 1.0, lng: 2.0 },
        GeoPoint { lat: 2.0, lng: 2.0 },
    ];

    let plan = composer.plan_polygon_query(&points, &QueryFilter::default(), None).unwrap();

    assert_eq!(plan.predicates.len(), 2);
    assert!(plan.predicates[0].contains("ST_Contains"));
    assert_eq!(plan.predicates[1], COORDS_PRESENT);
    assert_eq!(
        plan.params,
        vec![
            SqlParam::Text("POLYGON((1 1, 2 1, 2 2, 1 1))".to_string()),
            SqlParam::Int(1000),
        ]
    );
}

#[test]
fn test_only_missing_mode() {
    let composer = QueryComposer::default();
    let filter = QueryFilter {
        only_missing: true,
        ..QueryFilter::default()
    };

    let plan = composer.plan_polygon_query(&square(), &filter, None).unwrap();

    assert_eq!(plan.predicates[1], COORDS_MISSING);
    assert!(plan.predicates[0].contains("ST_Contains"));
    assert!(matches!(plan.params[0], SqlParam::Text(ref wkt) if wkt.starts_with("POLYGON((")));
}

#[test]
fn test_sql_shape() {
    let composer = QueryComposer::default();
    let plan = composer.plan_polygon_query(&square(), &QueryFilter::default(), None).unwrap();

    assert!(plan.sql.contains("FROM kr_juso.juso_addr a"));
    assert!(plan.sql.contains("JOIN kr_juso.road_name_code b"));
    assert!(plan.sql.contains("ORDER BY b.road_nm, a.bld_main_no, a.bld_sub_no"));
    assert!(plan.sql.contains(" AS road_addr"));
}
