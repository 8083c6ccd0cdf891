//! The Odds API client against a mock HTTP server

use parlay_engine::{
    config::OddsApiSettings,
    feed::suggest_value_bets,
    models::MarketType,
    provider::{OddsApiClient, OddsSource, ProviderError},
};
use std::time::Duration;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client(server: &MockServer) -> OddsApiClient {
    OddsApiClient::new(format!("{}/v4", server.uri()), "test-key", Duration::from_secs(5)).unwrap()
}

#[tokio::test]
async fn test_fetch_events() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v4/sports/basketball_nba/odds"))
        .and(query_param("apiKey", "test-key"))
        .and(query_param("oddsFormat", "american"))
        .and(query_param("markets", "h2h,spreads,totals"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("x-requests-remaining", "499")
                .set_body_json(serde_json::json!([{
                    "id": "evt-1",
                    "sport_key": "basketball_nba",
                    "sport_title": "NBA",
                    "commence_time": "2026-01-18T00:30:00Z",
                    "home_team": "Los Angeles Lakers",
                    "away_team": "Boston Celtics",
                    "bookmakers": [{
                        "key": "fanduel",
                        "title": "FanDuel",
                        "last_update": "2026-01-17T21:00:00Z",
                        "markets": [
                            {"key": "h2h", "outcomes": [
                                {"name": "Los Angeles Lakers", "price": 110},
                                {"name": "Boston Celtics", "price": -130}
                            ]},
                            {"key": "totals", "outcomes": [
                                {"name": "Over", "price": -110, "point": 225.5},
                                {"name": "Under", "price": -110, "point": 225.5}
                            ]}
                        ]
                    }]
                }])),
        )
        .expect(1)
        .mount(&server)
        .await;

    let events = client(&server).events("basketball_nba").await.unwrap();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].home_team, "Los Angeles Lakers");

    let odds = events[0].market_odds();
    assert_eq!(odds.home_moneyline, Some(110));
    assert_eq!(odds.away_moneyline, Some(-130));
    assert_eq!(odds.total.unwrap().points, 225.5);
    assert!(odds.spread.is_none());

    let suggestions = suggest_value_bets(&events, 0.5);
    assert_eq!(suggestions[0].selection.name, "Boston Celtics");
    assert!(suggestions
        .iter()
        .any(|s| s.selection.market == MarketType::TotalOver));
}

#[tokio::test]
async fn test_fetch_sports() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v4/sports"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
            {"key": "americanfootball_nfl", "group": "American Football", "title": "NFL",
             "description": "US Football", "active": true, "has_outrights": false},
            {"key": "icehockey_nhl", "group": "Ice Hockey", "title": "NHL",
             "description": "US Ice Hockey", "active": true, "has_outrights": false}
        ])))
        .mount(&server)
        .await;

    let sports = client(&server).sports().await.unwrap();
    assert_eq!(sports.len(), 2);
    assert_eq!(sports[1].key, "icehockey_nhl");
    assert!(sports[0].active);
}

#[tokio::test]
async fn test_unauthorized_is_status_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v4/sports"))
        .respond_with(ResponseTemplate::new(401).set_body_string("invalid api key"))
        .mount(&server)
        .await;

    let err = client(&server).sports().await.unwrap_err();
    match err {
        ProviderError::Status { status, body, .. } => {
            assert_eq!(status, 401);
            assert_eq!(body, "invalid api key");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[tokio::test]
async fn test_rate_limit_reports_retry_after() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v4/sports/americanfootball_nfl/odds"))
        .respond_with(ResponseTemplate::new(429).insert_header("retry-after", "30"))
        .mount(&server)
        .await;

    let err = client(&server).events("americanfootball_nfl").await.unwrap_err();
    assert!(matches!(
        err,
        ProviderError::RateLimit {
            retry_after: Some(30),
            ..
        }
    ));
}

#[tokio::test]
async fn test_malformed_body_is_invalid_response() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v4/sports/basketball_nba/odds"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&server)
        .await;

    let err = client(&server).events("basketball_nba").await.unwrap_err();
    assert!(matches!(err, ProviderError::InvalidResponse(_)));
}

#[tokio::test]
async fn test_settings_regions_are_sent() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v4/sports/icehockey_nhl/odds"))
        .and(query_param("regions", "eu"))
        .and(query_param("markets", "h2h"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([])))
        .expect(1)
        .mount(&server)
        .await;

    let settings = OddsApiSettings {
        base_url: format!("{}/v4", server.uri()),
        api_key: Some("k".to_string()),
        regions: "eu".to_string(),
        markets: "h2h".to_string(),
        timeout_secs: 5,
    };
    let client = OddsApiClient::from_settings(&settings).unwrap();
    assert!(client.events("icehockey_nhl").await.unwrap().is_empty());
}
