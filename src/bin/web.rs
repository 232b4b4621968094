use askama::Template;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use golf_fantasy::bet_stats::{betting_analytics, betting_stats, BettingAnalytics, BettingStats};
use golf_fantasy::fantasy_scoring::{
    scoring_examples, FantasyScoreCalculator, LogarithmicCurve, Projection, ScoringExample,
};
use golf_fantasy::lineup::WeeklyLineup;
use golf_fantasy::odds::{
    american_to_decimal, decimal_to_american, format_american, implied_probability,
    parse_american,
};
use golf_fantasy::{
    build_league_report, AppConfig, Bet, LeagueReport, LeagueScoringConfig, PlayerResult,
    ScoreBreakdown, ScoringError, TournamentResult,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::services::ServeDir;
use tracing::{error, info, warn};

// Custom filters for formatting
mod filters {
    pub fn format_odds(odds: &i32) -> ::askama::Result<String> {
        Ok(format!("{:+}", odds))
    }

    pub fn format_points(value: &f64) -> ::askama::Result<String> {
        Ok(format!("{:.2}", value))
    }

    pub fn format_multiplier(value: &f64) -> ::askama::Result<String> {
        Ok(format!("{:.3}x", value))
    }
}

#[derive(Template)]
#[template(path = "home.html")]
struct HomeTemplate {
    league: LeagueScoringConfig,
    examples: Vec<ScoringExample>,
}

struct HtmlTemplate<T>(T);

impl<T> IntoResponse for HtmlTemplate<T>
where
    T: Template,
{
    fn into_response(self) -> Response {
        match self.0.render() {
            Ok(html) => Html(html).into_response(),
            Err(err) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Failed to render template: {}", err),
            )
                .into_response(),
        }
    }
}

/// Validation failures become `400 {"error": "..."}`
struct ApiError(StatusCode, String);

impl From<ScoringError> for ApiError {
    fn from(err: ScoringError) -> Self {
        ApiError(StatusCode::BAD_REQUEST, err.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if self.0.is_server_error() {
            error!("{}", self.1);
        } else {
            warn!("Rejected request: {}", self.1);
        }
        (self.0, Json(serde_json::json!({ "error": self.1 }))).into_response()
    }
}

type ApiResult<T> = Result<Json<T>, ApiError>;

struct AppState {
    config: AppConfig,
    curve: LogarithmicCurve,
}

type SharedState = Arc<AppState>;

impl AppState {
    fn calculator(
        &self,
        league: Option<LeagueScoringConfig>,
    ) -> Result<FantasyScoreCalculator<&LogarithmicCurve>, ScoringError> {
        let league = league.unwrap_or_else(|| self.config.league.clone());
        FantasyScoreCalculator::with_curve(league, &self.curve)
    }
}

#[derive(Debug, Serialize)]
struct OddsResponse {
    american: i32,
    american_display: String,
    decimal: f64,
    implied_probability: f64,
}

fn odds_response(american: i32, decimal: f64) -> Result<OddsResponse, ScoringError> {
    Ok(OddsResponse {
        american,
        american_display: format_american(american),
        decimal,
        implied_probability: implied_probability(decimal)?,
    })
}

#[derive(Debug, Deserialize)]
struct ScoreRequest {
    result: PlayerResult,
    #[serde(default)]
    config: Option<LeagueScoringConfig>,
}

#[derive(Debug, Deserialize)]
struct ReportRequest {
    lineups: Vec<WeeklyLineup>,
    #[serde(default)]
    results: Vec<TournamentResult>,
}

async fn home(State(state): State<SharedState>) -> impl IntoResponse {
    let examples = match state
        .calculator(None)
        .and_then(|calculator| scoring_examples(&calculator))
    {
        Ok(examples) => examples,
        Err(err) => {
            return ApiError(StatusCode::INTERNAL_SERVER_ERROR, err.to_string()).into_response()
        }
    };

    let template = HomeTemplate {
        league: state.config.league.clone(),
        examples,
    };

    HtmlTemplate(template).into_response()
}

async fn convert_american(Path(odds): Path<String>) -> ApiResult<OddsResponse> {
    let american = parse_american(&odds)?;
    let decimal = american_to_decimal(american)?;
    Ok(Json(odds_response(american, decimal)?))
}

fn parse_decimal(odds: &str) -> Result<f64, ScoringError> {
    odds.trim().parse().map_err(|_| {
        ScoringError::InvalidOddsInput(format!("cannot parse decimal odds from {:?}", odds))
    })
}

async fn convert_decimal(Path(odds): Path<String>) -> ApiResult<OddsResponse> {
    let decimal = parse_decimal(&odds)?;
    let american = decimal_to_american(decimal)?;
    Ok(Json(odds_response(american, decimal)?))
}

async fn projection(
    State(state): State<SharedState>,
    Path(odds): Path<String>,
) -> ApiResult<Projection> {
    let decimal = parse_decimal(&odds)?;
    let calculator = state.calculator(None)?;
    Ok(Json(calculator.projected_points(decimal)?))
}

async fn score_player(
    State(state): State<SharedState>,
    Json(request): Json<ScoreRequest>,
) -> ApiResult<ScoreBreakdown> {
    let calculator = state.calculator(request.config)?;
    Ok(Json(calculator.score_breakdown(&request.result)?))
}

async fn league_report(
    State(state): State<SharedState>,
    Json(request): Json<ReportRequest>,
) -> ApiResult<LeagueReport> {
    let report = build_league_report(&request.lineups, &request.results, &state.curve)?;
    Ok(Json(report))
}

async fn examples(State(state): State<SharedState>) -> ApiResult<Vec<ScoringExample>> {
    let calculator = state.calculator(None)?;
    Ok(Json(scoring_examples(&calculator)?))
}

async fn bet_stats(Json(bets): Json<Vec<Bet>>) -> ApiResult<BettingStats> {
    Ok(Json(betting_stats(&bets)?))
}

async fn bet_analytics(Json(bets): Json<Vec<Bet>>) -> ApiResult<BettingAnalytics> {
    Ok(Json(betting_analytics(&bets)?))
}

fn app(state: SharedState) -> Router {
    Router::new()
        // This will serve files from the "static" directory at the "/static" URL path
        .nest_service("/static", ServeDir::new("static"))
        .route("/", get(home))
        .route("/api/odds/american/:odds", get(convert_american))
        .route("/api/odds/decimal/:odds", get(convert_decimal))
        .route("/api/fantasy/score", post(score_player))
        .route("/api/fantasy/projection/:odds", get(projection))
        .route("/api/fantasy/report", post(league_report))
        .route("/api/fantasy/scoring-examples", get(examples))
        .route("/api/bets/stats", post(bet_stats))
        .route("/api/bets/analytics", post(bet_analytics))
        .with_state(state)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenv::dotenv().ok();

    // Initialize logging
    tracing_subscriber::fmt::init();

    let config = AppConfig::from_env()?;
    let curve = LogarithmicCurve::with_field_size(config.field_size);
    let bind_addr = config.bind_addr.clone();

    info!(
        win_points = config.league.win_points,
        odds_multiplier = config.league.odds_multiplier,
        field_size = config.field_size,
        "Loaded league defaults"
    );

    let state = Arc::new(AppState { config, curve });

    println!("\nStarting web server at http://{}", bind_addr);
    println!("Press Ctrl+C to stop\n");

    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    axum::serve(listener, app(state)).await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::Request;
    use tower::ServiceExt;

    fn test_app() -> Router {
        app(Arc::new(AppState {
            config: AppConfig::default(),
            curve: LogarithmicCurve::default(),
        }))
    }

    async fn send(request: Request<Body>) -> (StatusCode, serde_json::Value) {
        let response = test_app().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    fn get_request(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    fn post_json(uri: &str, body: serde_json::Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    #[tokio::test]
    async fn test_convert_american() {
        let (status, body) = send(get_request("/api/odds/american/-150")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["american_display"], "-150");
        assert!((body["decimal"].as_f64().unwrap() - 1.6667).abs() < 0.0001);
    }

    #[tokio::test]
    async fn test_convert_decimal() {
        let (status, body) = send(get_request("/api/odds/decimal/2.5")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["american"], 150);
        assert_eq!(body["american_display"], "+150");
    }

    #[tokio::test]
    async fn test_invalid_odds_are_bad_requests() {
        let (status, body) = send(get_request("/api/odds/decimal/1.0")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].as_str().unwrap().contains("Invalid odds input"));

        let (status, _) = send(get_request("/api/odds/american/0")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_score_player() {
        let request = post_json(
            "/api/fantasy/score",
            serde_json::json!({
                "result": { "finish": { "position": 1 }, "decimal_odds": 3.0 },
                "config": { "win_points": 100, "odds_multiplier": 1.0 }
            }),
        );
        let (status, body) = send(request).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["bonus_points"], 100.0);
        assert_eq!(body["total"], 300.0);

        let missed = post_json(
            "/api/fantasy/score",
            serde_json::json!({ "result": { "finish": "missed_cut", "decimal_odds": 50.0 } }),
        );
        let (status, body) = send(missed).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["total"], 0.0);
    }

    #[tokio::test]
    async fn test_score_player_rejects_bad_config() {
        let request = post_json(
            "/api/fantasy/score",
            serde_json::json!({
                "result": { "finish": { "position": 4 }, "decimal_odds": 5.0 },
                "config": { "odds_multiplier": 0.0 }
            }),
        );
        let (status, body) = send(request).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].as_str().unwrap().contains("odds_multiplier"));
    }

    #[tokio::test]
    async fn test_league_report() {
        let picks = serde_json::json!([
            { "player_id": 1, "player_name": "A", "decimal_odds": 6.0 },
            { "player_id": 2, "player_name": "B", "decimal_odds": 11.0 },
            { "player_id": 3, "player_name": "C", "decimal_odds": 26.0 }
        ]);
        let request = post_json(
            "/api/fantasy/report",
            serde_json::json!({
                "lineups": [
                    { "team_id": 1, "tournament_id": 5, "picks": picks, "is_locked": true }
                ],
                "results": [
                    { "tournament_id": 5, "player_id": 2, "position": 3, "made_cut": true }
                ]
            }),
        );
        let (status, body) = send(request).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["standings"][0]["team_id"], 1);
        assert!(body["lineup_scores"][0]["total_points"].as_f64().unwrap() > 0.0);
    }

    #[tokio::test]
    async fn test_league_report_rejects_repeated_lineup() {
        let lineup = serde_json::json!({
            "team_id": 1,
            "tournament_id": 5,
            "picks": [
                { "player_id": 1, "player_name": "A", "decimal_odds": 6.0 },
                { "player_id": 2, "player_name": "B", "decimal_odds": 11.0 },
                { "player_id": 3, "player_name": "C", "decimal_odds": 26.0 }
            ]
        });
        let request = post_json(
            "/api/fantasy/report",
            serde_json::json!({ "lineups": [lineup.clone(), lineup], "results": [] }),
        );
        let (status, body) = send(request).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].as_str().unwrap().contains("tournament 5"));
    }

    #[tokio::test]
    async fn test_projection() {
        let (status, body) = send(get_request("/api/fantasy/projection/21.0")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["american_odds"], 2000);
        assert!(body["projected_points"].as_f64().unwrap() > 0.0);

        let (status, _) = send(get_request("/api/fantasy/projection/evens")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_bet_stats() {
        let request = post_json(
            "/api/bets/stats",
            serde_json::json!([
                { "id": 1, "bet_type": "outright", "amount": 10.0, "odds": 21.0,
                  "status": "won", "placed_at": "2025-04-10T12:00:00Z" },
                { "id": 2, "bet_type": "top_10", "amount": 50.0, "odds": 3.0,
                  "status": "lost", "placed_at": "2025-04-11T12:00:00Z" }
            ]),
        );
        let (status, body) = send(request).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["won_bets"], 1);
        assert_eq!(body["net_profit"], 150.0);
    }

    #[tokio::test]
    async fn test_bet_stats_rejects_won_bet_without_odds() {
        let request = post_json(
            "/api/bets/stats",
            serde_json::json!([
                { "id": 4, "bet_type": "outright", "amount": 10.0,
                  "status": "won", "placed_at": "2025-04-10T12:00:00Z" }
            ]),
        );
        let (status, body) = send(request).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].as_str().unwrap().contains("Invalid bet 4"));
    }

    #[tokio::test]
    async fn test_scoring_examples() {
        let (status, body) = send(get_request("/api/fantasy/scoring-examples")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body.as_array().unwrap().len(), 8);
    }

    #[tokio::test]
    async fn test_home_page_renders() {
        let response = test_app().oneshot(get_request("/")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let html = String::from_utf8(bytes.to_vec()).unwrap();
        assert!(html.contains("longshot_wins"));
        assert!(html.contains("+7900"));
    }
}
