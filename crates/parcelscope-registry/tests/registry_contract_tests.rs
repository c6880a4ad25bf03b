//! Contract tests for the registry clients against the open-data row API.
//!
//! These tests use wiremock to simulate the registries. Request shapes
//! (`$where`, `$limit`, `$order`, `parid`) and the string-valued row
//! payloads mirror the live datasets.

use parcelscope_core::{Bbl, Borough};
use parcelscope_registry::{Predicate, RegistryClient, RegistryConfig};
use wiremock::matchers::{header, method, path, query_param, query_param_contains};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Build a RegistryClient pointed at a wiremock server.
fn test_client(mock_server: &MockServer) -> RegistryClient {
    let config = RegistryConfig::local_mock(&mock_server.uri()).unwrap();
    RegistryClient::new(config).unwrap()
}

// ── Parcel registry ──────────────────────────────────────────────────

#[tokio::test]
async fn parcel_query_sends_where_and_limit() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/parcels.json"))
        .and(query_param("$where", "borough = '1'"))
        .and(query_param("$limit", "5"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([{
            "borough": "1",
            "block": "00373",
            "lot": "0021",
            "address": "522 EAST 5 STREET",
            "unitsres": "10",
            "unitstotal": "11",
            "yearbuilt": "1920",
            "bldgclass": "C1",
            "ownername": "522 E 5 LLC",
            "assessland": "150000",
            "assesstot": "900000"
        }])))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = test_client(&mock_server);
    let filter = Predicate::EqText("borough".into(), "1".into());
    let records = client.parcels().query(&filter, 5).await.unwrap();

    assert_eq!(records.len(), 1);
    let rec = &records[0];
    assert_eq!(rec.bbl, Bbl::new(Borough::Manhattan, 373, 21).unwrap());
    assert_eq!(rec.address.as_deref(), Some("522 EAST 5 STREET"));
    assert_eq!(rec.total_units, 11);
    assert_eq!(rec.year_built, Some(1920));
    assert_eq!(rec.assessed_total, Some(900_000.0));
}

#[tokio::test]
async fn parcel_query_drops_rows_with_unusable_keys() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/parcels.json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
            {"borough": "9", "block": "1", "lot": "1"},
            {"block": "1", "lot": "1"},
            {"borough": "3", "block": "1234", "lot": "56"}
        ])))
        .mount(&mock_server)
        .await;

    let client = test_client(&mock_server);
    let filter = Predicate::Gt("lot".into(), 0.0);
    let records = client.parcels().query(&filter, 10).await.unwrap();

    assert_eq!(records.len(), 1);
    assert_eq!(records[0].bbl.borough(), Borough::Brooklyn);
}

#[tokio::test]
async fn parcel_query_surfaces_api_errors() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/parcels.json"))
        .respond_with(ResponseTemplate::new(400).set_body_string("malformed $where"))
        .mount(&mock_server)
        .await;

    let client = test_client(&mock_server);
    let filter = Predicate::EqText("borough".into(), "1".into());
    let result = client.parcels().query(&filter, 1).await;

    match result.unwrap_err() {
        parcelscope_registry::RegistryError::ApiError { status, body, .. } => {
            assert_eq!(status, 400);
            assert!(body.contains("malformed"));
        }
        other => panic!("expected ApiError, got: {other:?}"),
    }
}

#[tokio::test]
async fn invalid_field_name_fails_before_any_request() {
    let mock_server = MockServer::start().await;
    // No mocks mounted: a request would 404 and fail differently.

    let client = test_client(&mock_server);
    let filter = Predicate::EqText("borough'; --".into(), "1".into());
    let result = client.parcels().query(&filter, 1).await;

    assert!(matches!(
        result.unwrap_err(),
        parcelscope_registry::RegistryError::Predicate(_)
    ));
}

// ── Sales ledger ─────────────────────────────────────────────────────

#[tokio::test]
async fn sales_query_orders_newest_first() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/sales.json"))
        .and(query_param("$order", "sale_date DESC"))
        .and(query_param_contains("$where", "sale_price > 10000"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([{
            "borough": "1",
            "block": "373",
            "lot": "21",
            "address": "522 EAST 5TH STREET",
            "apartment_number": "",
            "sale_price": "3500000",
            "sale_date": "2024-03-15T00:00:00.000",
            "building_class_at_time_of_sale": "C1",
            "neighborhood": "EAST VILLAGE",
            "total_units": "10",
            "gross_square_feet": "8000",
            "year_built": "1920"
        }])))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = test_client(&mock_server);
    let filter = Predicate::Gt("sale_price".into(), 10_000.0);
    let records = client.sales().query(&filter, 10).await.unwrap();

    assert_eq!(records.len(), 1);
    let rec = &records[0];
    assert!(rec.is_whole_building());
    assert_eq!(rec.price, Some(3_500_000.0));
    assert_eq!(rec.neighborhood.as_deref(), Some("EAST VILLAGE"));
    assert_eq!(
        rec.sale_date,
        chrono::NaiveDate::from_ymd_opt(2024, 3, 15)
    );
}

#[tokio::test]
async fn sale_rows_tolerate_unknown_fields_and_missing_optionals() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/sales.json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([{
            "borough": "1",
            "block": "373",
            "lot": "21",
            "future_field": "ignored",
            "sale_price": "not a number"
        }])))
        .mount(&mock_server)
        .await;

    let client = test_client(&mock_server);
    let filter = Predicate::Gt("sale_price".into(), 0.0);
    let records = client.sales().query(&filter, 10).await.unwrap();

    assert_eq!(records.len(), 1);
    let rec = &records[0];
    assert_eq!(rec.price, None);
    assert_eq!(rec.sale_date, None);
    assert_eq!(rec.neighborhood, None);
    assert_eq!(rec.total_units, 0);
    assert!(rec.is_whole_building());
}

// ── Tax-benefit registries ───────────────────────────────────────────

#[tokio::test]
async fn exemptions_query_filters_by_packed_bbl() {
    let mock_server = MockServer::start().await;
    let bbl = Bbl::new(Borough::Manhattan, 373, 21).unwrap();

    Mock::given(method("GET"))
        .and(path("/exemptions.json"))
        .and(query_param("parid", "1003730021"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([{
            "parid": "1003730021",
            "exmp_code": "5113",
            "description": "421A AFFORDABLE",
            "year": "2024",
            "exempt_val": "125000"
        }])))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = test_client(&mock_server);
    let rows = client.benefits().query_exemptions(&bbl).await.unwrap();

    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].code.as_deref(), Some("5113"));
    assert_eq!(rows[0].value, Some(125_000.0));
}

#[tokio::test]
async fn abatements_query_maps_rows() {
    let mock_server = MockServer::start().await;
    let bbl = Bbl::new(Borough::Brooklyn, 1234, 56).unwrap();

    Mock::given(method("GET"))
        .and(path("/abatements.json"))
        .and(query_param("parid", "3012340056"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([{
            "parid": "3012340056",
            "abate_code": "J51",
            "description": "J-51 ALTERATION",
            "year": "2023",
            "appliedabt": "2500"
        }])))
        .mount(&mock_server)
        .await;

    let client = test_client(&mock_server);
    let rows = client.benefits().query_abatements(&bbl).await.unwrap();

    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].code.as_deref(), Some("J51"));
    assert_eq!(rows[0].amount, Some(2_500.0));
}

#[tokio::test]
async fn benefit_query_surfaces_upstream_failure() {
    let mock_server = MockServer::start().await;
    let bbl = Bbl::new(Borough::Manhattan, 373, 21).unwrap();

    Mock::given(method("GET"))
        .and(path("/exemptions.json"))
        .respond_with(ResponseTemplate::new(503).set_body_string("maintenance window"))
        .mount(&mock_server)
        .await;

    let client = test_client(&mock_server);
    let result = client.benefits().query_exemptions(&bbl).await;

    match result.unwrap_err() {
        parcelscope_registry::RegistryError::ApiError { status, .. } => assert_eq!(status, 503),
        other => panic!("expected ApiError, got: {other:?}"),
    }
}

// ── App token ────────────────────────────────────────────────────────

#[tokio::test]
async fn app_token_is_sent_as_header_when_configured() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/parcels.json"))
        .and(header("X-App-Token", "test-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([])))
        .expect(1)
        .mount(&mock_server)
        .await;

    let mut config = RegistryConfig::local_mock(&mock_server.uri()).unwrap();
    config.app_token = Some("test-token".into());
    let client = RegistryClient::new(config).unwrap();

    let filter = Predicate::EqText("borough".into(), "1".into());
    let records = client.parcels().query(&filter, 1).await.unwrap();
    assert!(records.is_empty());
}
