//! Verify build/parse methods against JSON test vectors stored in `test-vectors/`.
//!
//! Each vector file describes inputs, expected requests, simulated responses,
//! and expected parse results. Comparing parsed JSON (not raw strings) avoids
//! false negatives from field-ordering differences.

use serde_json::Value;
use zoo_core::sports::LeagueQuery;
use zoo_core::{ApiError, HttpMethod, HttpRequest, HttpResponse, ListQuery, Record, Resource, SportsClient, ZooClient};

const BASE_URL: &str = "http://localhost:3000";

fn client() -> ZooClient {
    ZooClient::new(BASE_URL)
}

/// Parse the method string from test vectors into `HttpMethod`.
fn parse_method(s: &str) -> HttpMethod {
    match s {
        "GET" => HttpMethod::Get,
        "POST" => HttpMethod::Post,
        "PUT" => HttpMethod::Put,
        "DELETE" => HttpMethod::Delete,
        other => panic!("unknown method: {other}"),
    }
}

fn resource(case: &Value) -> Resource {
    case["input"]["resource"].as_str().unwrap().parse().unwrap()
}

fn simulated(case: &Value) -> HttpResponse {
    let sim = &case["simulated_response"];
    HttpResponse::new(
        sim["status"].as_u64().unwrap() as u16,
        sim["body"].as_str().unwrap(),
    )
}

fn check_request(name: &str, req: &HttpRequest, expected: &Value) {
    assert_eq!(req.method, parse_method(expected["method"].as_str().unwrap()), "{name}: method");
    assert_eq!(req.url, format!("{BASE_URL}{}", expected["path"].as_str().unwrap()), "{name}: url");

    if let Some(headers) = expected["headers"].as_array() {
        let expected_headers: Vec<(String, String)> = headers
            .iter()
            .map(|h| {
                let arr = h.as_array().unwrap();
                (arr[0].as_str().unwrap().to_string(), arr[1].as_str().unwrap().to_string())
            })
            .collect();
        assert_eq!(req.headers, expected_headers, "{name}: headers");
    }

    match expected.get("body") {
        Some(body) => {
            let req_body: Value = serde_json::from_str(req.body.as_deref().unwrap()).unwrap();
            assert_eq!(&req_body, body, "{name}: body");
        }
        None => assert!(req.body.is_none(), "{name}: body should be None"),
    }
}

fn check_error(name: &str, err: ApiError, case: &Value) {
    match case["expected_error"].as_str().unwrap() {
        "NotFound" => assert!(matches!(err, ApiError::NotFound), "{name}: expected NotFound, got {err:?}"),
        "Http" => assert!(matches!(err, ApiError::Http { .. }), "{name}: expected Http, got {err:?}"),
        "Duplicate" => match err {
            ApiError::Duplicate { id } => {
                assert_eq!(id, case["expected_id"].as_str().unwrap(), "{name}: duplicate id")
            }
            other => panic!("{name}: expected Duplicate, got {other:?}"),
        },
        other => panic!("{name}: unknown expected_error: {other}"),
    }
}

// ---------------------------------------------------------------------------
// List
// ---------------------------------------------------------------------------

#[test]
fn list_test_vectors() {
    let raw = include_str!("../../test-vectors/list.json");
    let vectors: Value = serde_json::from_str(raw).unwrap();

    let c = client();
    for case in vectors["cases"].as_array().unwrap() {
        let name = case["name"].as_str().unwrap();
        let input = &case["input"];
        let mut query = ListQuery::new(
            input["page"].as_u64().unwrap() as u32,
            input["page_size"].as_u64().unwrap() as u32,
        );
        for pair in input["filters"].as_array().unwrap() {
            query = query.filter(pair[0].as_str().unwrap(), pair[1].as_str().unwrap());
        }

        let req = c.build_list(resource(case), &query);
        check_request(name, &req, &case["expected_request"]);

        match c.parse_list(simulated(case)) {
            Ok(page) => {
                let expected = &case["expected_result"];
                assert_eq!(
                    u64::from(page.total_pages),
                    expected["total_pages"].as_u64().unwrap(),
                    "{name}: total_pages"
                );
                let items: Vec<Record> = serde_json::from_value(expected["items"].clone()).unwrap();
                assert_eq!(page.items, items, "{name}: items");
            }
            Err(err) => check_error(name, err, case),
        }
    }
}

// ---------------------------------------------------------------------------
// Create
// ---------------------------------------------------------------------------

#[test]
fn create_test_vectors() {
    let raw = include_str!("../../test-vectors/create.json");
    let vectors: Value = serde_json::from_str(raw).unwrap();

    let c = client();
    for case in vectors["cases"].as_array().unwrap() {
        let name = case["name"].as_str().unwrap();
        let record: Record = serde_json::from_value(case["input"]["record"].clone()).unwrap();

        let req = c.build_create(resource(case), &record).unwrap();
        check_request(name, &req, &case["expected_request"]);

        let result = c.parse_create(simulated(case));
        if case.get("expected_error").is_some() {
            check_error(name, result.unwrap_err(), case);
        } else {
            let expected: Option<Record> = serde_json::from_value(case["expected_result"].clone()).unwrap();
            assert_eq!(result.unwrap(), expected, "{name}: parsed result");
        }
    }
}

// ---------------------------------------------------------------------------
// Update
// ---------------------------------------------------------------------------

#[test]
fn update_test_vectors() {
    let raw = include_str!("../../test-vectors/update.json");
    let vectors: Value = serde_json::from_str(raw).unwrap();

    let c = client();
    for case in vectors["cases"].as_array().unwrap() {
        let name = case["name"].as_str().unwrap();
        let record: Record = serde_json::from_value(case["input"]["record"].clone()).unwrap();

        let req = c.build_update(resource(case), &record).unwrap();
        check_request(name, &req, &case["expected_request"]);

        let result = c.parse_update(simulated(case));
        if case.get("expected_error").is_some() {
            check_error(name, result.unwrap_err(), case);
        } else {
            assert!(result.is_ok(), "{name}: expected success");
        }
    }
}

// ---------------------------------------------------------------------------
// Delete
// ---------------------------------------------------------------------------

#[test]
fn delete_test_vectors() {
    let raw = include_str!("../../test-vectors/delete.json");
    let vectors: Value = serde_json::from_str(raw).unwrap();

    let c = client();
    for case in vectors["cases"].as_array().unwrap() {
        let name = case["name"].as_str().unwrap();
        let id = case["input"]["id"].as_str().unwrap();

        let req = c.build_delete(resource(case), id).unwrap();
        check_request(name, &req, &case["expected_request"]);

        let result = c.parse_delete(simulated(case));
        if case.get("expected_error").is_some() {
            check_error(name, result.unwrap_err(), case);
        } else {
            assert!(result.is_ok(), "{name}: expected success");
        }
    }
}

// ---------------------------------------------------------------------------
// Leagues
// ---------------------------------------------------------------------------

#[test]
fn league_test_vectors() {
    let raw = include_str!("../../test-vectors/leagues.json");
    let vectors: Value = serde_json::from_str(raw).unwrap();

    let sports = SportsClient::new(BASE_URL);
    for case in vectors["cases"].as_array().unwrap() {
        let name = case["name"].as_str().unwrap();
        let input = &case["input"];
        let query = LeagueQuery {
            country: input["country"].as_str().map(str::to_string),
            sport: input["sport"].as_str().map(str::to_string),
        };

        let req = sports.build_search_leagues(&query);
        check_request(name, &req, &case["expected_request"]);

        let leagues = sports.parse_search_leagues(simulated(case)).unwrap();
        let names: Vec<&str> = leagues.iter().filter_map(|l| l.name.as_deref()).collect();
        let expected: Vec<&str> = case["expected_names"]
            .as_array()
            .unwrap()
            .iter()
            .map(|v| v.as_str().unwrap())
            .collect();
        assert_eq!(names, expected, "{name}: league names");
    }
}
