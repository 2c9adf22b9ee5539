//! Router-level tests for the finals endpoints.

mod common;

use axum::http::StatusCode;
use serde_json::json;

use common::{basic, config_for, dataset, empty_dataset, get, get_with_key, PASSWORD, USERNAME};
use wimbledon_api::HttpServer;

fn app(path: &std::path::Path) -> axum::Router {
    HttpServer::new(config_for(path)).router()
}

// ============================================================================
// Health
// ============================================================================

#[tokio::test]
async fn test_health_is_public() {
    let data = dataset();
    let (status, headers, body) = get(app(&data.path), "/health", &[]).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
    assert!(body["message"].is_string());
    assert!(headers.contains_key("x-request-id"));
    assert_eq!(headers["x-content-type-options"], "nosniff");
}

#[tokio::test]
async fn test_client_request_id_is_echoed() {
    let data = dataset();
    let (_, headers, _) = get(app(&data.path), "/health", &[("x-request-id", "abc-123")]).await;
    assert_eq!(headers["x-request-id"], "abc-123");
}

// ============================================================================
// Year endpoint
// ============================================================================

#[tokio::test]
async fn test_year_returns_normalized_record() {
    let data = dataset();
    let (status, body) = get_with_key(app(&data.path), "/wimbledon?year=2021").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({
            "year": 2021,
            "champion": "Novak Djokovic",
            "runner_up": "Matteo Berrettini",
            "score": "6-7(4-7), 6-4, 6-4, 6-3",
            "sets": 4,
            "tiebreak": true
        })
    );
}

#[tokio::test]
async fn test_year_infers_tiebreak_when_column_empty() {
    let data = dataset();
    let (status, body) = get_with_key(app(&data.path), "/wimbledon?year=2019").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["year"], 2019);
    assert_eq!(body["sets"], 5);
    assert_eq!(body["tiebreak"], true);
}

#[tokio::test]
async fn test_every_listed_year_round_trips() {
    let data = dataset();
    for year in [2021, 2019, 2017, 2008, 2003, 1980] {
        let (status, body) =
            get_with_key(app(&data.path), &format!("/wimbledon?year={year}")).await;
        assert_eq!(status, StatusCode::OK, "year {year}");
        assert_eq!(body["year"], year);
        assert!(body["sets"].is_u64());
        assert!(body["tiebreak"].is_boolean());
    }
}

#[tokio::test]
async fn test_year_missing_parameter() {
    let data = dataset();
    for uri in ["/wimbledon", "/wimbledon?year="] {
        let (status, body) = get_with_key(app(&data.path), uri).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Missing required parameter 'year'");
    }
}

#[tokio::test]
async fn test_year_out_of_range_or_not_integer() {
    let data = dataset();
    for year in ["1800", "1876", "2025", "abc", "2021.0"] {
        let (status, body) =
            get_with_key(app(&data.path), &format!("/wimbledon?year={year}")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "year {year}");
        assert_eq!(body["error"], "Invalid year parameter");
    }
}

#[tokio::test]
async fn test_repeated_year_is_json_error() {
    let data = dataset();
    let (status, headers, body) = get(
        app(&data.path),
        "/wimbledon?year=2021&year=2022",
        &[("x-api-key", common::API_KEY)],
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(headers["content-type"], "application/json");
    assert_eq!(body["error"], "Invalid year parameter");
    assert!(body["message"].is_string());
}

#[tokio::test]
async fn test_invalid_year_never_touches_dataset() {
    // No file and no producer: any lookup attempt would be a 500.
    let data = empty_dataset();
    let (status, _) = get_with_key(app(&data.path), "/wimbledon?year=1800").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_year_without_row_is_not_found() {
    let data = dataset();
    let (status, body) = get_with_key(app(&data.path), "/wimbledon?year=1877").await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Data not found");
    assert!(body["message"].as_str().unwrap().contains("1877"));
}

#[tokio::test]
async fn test_missing_dataset_without_producer_is_generic_500() {
    let data = empty_dataset();
    let (status, body) = get_with_key(app(&data.path), "/wimbledon?year=2021").await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"], "Data not available");
    assert!(!body["message"]
        .as_str()
        .unwrap()
        .contains(data.path.to_str().unwrap()));
}

// ============================================================================
// Auth gate
// ============================================================================

#[tokio::test]
async fn test_no_credentials_is_unauthorized() {
    let data = dataset();
    let (status, _, body) = get(app(&data.path), "/wimbledon?year=2021", &[]).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "Authentication required");
}

#[tokio::test]
async fn test_wrong_key_is_forbidden() {
    let data = dataset();
    let (status, _, body) = get(
        app(&data.path),
        "/wimbledon?year=2021",
        &[("x-api-key", "guess")],
    )
    .await;

    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"], "Invalid credentials");
}

#[tokio::test]
async fn test_query_key_is_accepted() {
    let data = dataset();
    let (status, _, body) = get(
        app(&data.path),
        "/wimbledon?year=2017&api_key=test-key",
        &[],
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["champion"], "Roger Federer");
}

#[tokio::test]
async fn test_wrong_query_key_is_forbidden() {
    let data = dataset();
    let (status, _, _) = get(app(&data.path), "/wimbledon?year=2017&api_key=nope", &[]).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_empty_header_key_defers_to_query_key() {
    let data = dataset();
    let (status, _, body) = get(
        app(&data.path),
        "/wimbledon?year=2021&api_key=test-key",
        &[("x-api-key", "")],
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["champion"], "Novak Djokovic");
}

#[tokio::test]
async fn test_basic_auth() {
    let data = dataset();

    let good = basic(USERNAME, PASSWORD);
    let (status, _, _) = get(
        app(&data.path),
        "/wimbledon?year=2021",
        &[("authorization", good.as_str())],
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let bad = basic(USERNAME, "wrong");
    let (status, _, _) = get(
        app(&data.path),
        "/wimbledon?year=2021",
        &[("authorization", bad.as_str())],
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_malformed_basic_auth_is_distinct() {
    let data = dataset();
    let (_, _, missing) = get(app(&data.path), "/wimbledon?year=2021", &[]).await;

    for header in ["Basic !!!not-base64!!!", "Basic dXNlcm5hbWVvbmx5"] {
        let (status, _, body) = get(
            app(&data.path),
            "/wimbledon?year=2021",
            &[("authorization", header)],
        )
        .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED, "{header}");
        assert_eq!(body["error"], "Invalid authentication format");
        assert_ne!(body["error"], missing["error"]);
    }
}

#[tokio::test]
async fn test_auth_runs_before_validation() {
    let data = dataset();
    let (status, _, _) = get(app(&data.path), "/wimbledon?year=1800", &[]).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_unprotected_variant() {
    let data = dataset();
    let mut config = config_for(&data.path);
    config.auth.enabled = false;
    let app = HttpServer::new(config).router();

    let (status, _, body) = get(app, "/wimbledon?year=2003", &[]).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["runner_up"], "Mark Philippoussis");
}

// ============================================================================
// Player endpoint
// ============================================================================

#[tokio::test]
async fn test_player_summary_is_case_insensitive() {
    let data = dataset();
    let (status, body) =
        get_with_key(app(&data.path), "/wimbledon/player/roger%20FEDERER").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({
            "player_search": "roger FEDERER",
            "total_finals": 4,
            "wins": 2,
            "losses": 2
        })
    );
}

#[tokio::test]
async fn test_player_details() {
    let data = dataset();
    let (status, body) = get_with_key(
        app(&data.path),
        "/wimbledon/player/Roger%20Federer?details=true",
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let finals = body["finals"].as_array().unwrap();
    let years: Vec<_> = finals.iter().map(|f| f["year"].as_i64().unwrap()).collect();
    assert_eq!(years, vec![2019, 2017, 2008, 2003]);

    for f in finals {
        let champion = f["champion"] == "Roger Federer";
        assert_eq!(f["player_won"], champion);
    }
    assert_eq!(
        finals[2]["score"],
        "6-4, 6-4, 6-7(5-7), 6-7(8-10), 9-7"
    );
}

#[tokio::test]
async fn test_unparseable_details_flag_is_json_error() {
    let data = dataset();
    let (status, headers, body) = get(
        app(&data.path),
        "/wimbledon/player/Roger%20Federer?details=1",
        &[("x-api-key", common::API_KEY)],
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(headers["content-type"], "application/json");
    assert_eq!(body["error"], "Invalid query parameters");
    assert!(body["message"].as_str().unwrap().contains("details"));
}

#[tokio::test]
async fn test_player_champion_only() {
    let data = dataset();
    let (status, body) = get_with_key(app(&data.path), "/wimbledon/player/bjorn%20borg").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total_finals"], 1);
    assert_eq!(body["wins"], 1);
    assert_eq!(body["losses"], 0);
}

#[tokio::test]
async fn test_unknown_player_is_not_found() {
    let data = dataset();
    let (status, body) = get_with_key(app(&data.path), "/wimbledon/player/Federer").await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "No finals found");
}

#[tokio::test]
async fn test_blank_player_name_is_rejected() {
    let data = dataset();
    let (status, body) = get_with_key(app(&data.path), "/wimbledon/player/%20%20").await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Missing player name");
}

#[tokio::test]
async fn test_player_requires_credentials() {
    let data = dataset();
    let (status, _, _) = get(app(&data.path), "/wimbledon/player/Rafael%20Nadal", &[]).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}
