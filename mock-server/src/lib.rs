//! In-memory imitation of the ESI fleet and character routes.
//!
//! Everything is served below `/esi`; a request reaching any other path
//! means the client dropped its base path and gets a 500. Every non-2xx
//! response carries the error rate-limit headers, with the remaining budget
//! decreasing on each failure. The character route is marked deprecated
//! with a `warning` header.

use std::{
    collections::HashMap,
    sync::{
        atomic::{AtomicI64, Ordering},
        Arc,
    },
    time::Duration,
};

use axum::{
    extract::{Path, Query, Request, State},
    http::{header::HeaderValue, StatusCode},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::{get, post, put},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tokio::{net::TcpListener, sync::RwLock};

pub const BASE_PATH: &str = "/esi";
pub const ERROR_LIMIT: i64 = 100;
pub const ERROR_LIMIT_RESET_SECS: i64 = 60;
pub const DEPRECATION_WARNING: &str = "299 - This route is deprecated.";

pub const SEED_CHARACTER_ID: i64 = 93265215;
pub const SEED_FLEET_ID: i64 = 1234567890;
pub const SEED_WING_ID: i64 = 1;
pub const SEED_SQUAD_ID: i64 = 1;

const LANGUAGES: &[&str] = &["de", "en", "en-us", "es", "fr", "ja", "ko", "ru", "zh"];

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Character {
    pub name: String,
    pub birthday: String,
    pub corporation_id: i64,
    pub security_status: f64,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Member {
    pub character_id: i64,
    pub join_time: String,
    pub role: String,
    pub squad_id: i64,
    pub wing_id: i64,
    pub takes_fleet_warp: bool,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Squad {
    pub id: i64,
    pub name: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Wing {
    pub id: i64,
    pub name: String,
    pub squads: Vec<Squad>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Fleet {
    pub is_free_move: bool,
    pub is_registered: bool,
    pub is_voice_enabled: bool,
    pub motd: String,
    #[serde(skip)]
    pub members: Vec<Member>,
    #[serde(skip)]
    pub wings: Vec<Wing>,
}

#[derive(Deserialize)]
pub struct FleetUpdate {
    pub is_free_move: Option<bool>,
    pub motd: Option<String>,
}

#[derive(Deserialize)]
pub struct Invitation {
    pub character_id: i64,
    pub role: String,
    pub squad_id: Option<i64>,
    pub wing_id: Option<i64>,
}

#[derive(Deserialize)]
pub struct Movement {
    pub role: String,
    pub squad_id: Option<i64>,
    pub wing_id: Option<i64>,
}

#[derive(Deserialize)]
pub struct Naming {
    pub name: String,
}

#[derive(Deserialize)]
pub struct Language {
    pub language: Option<String>,
}

#[derive(Default)]
pub struct Universe {
    pub characters: HashMap<i64, Character>,
    pub fleets: HashMap<i64, Fleet>,
    next_id: i64,
}

impl Universe {
    /// One character commanding one fleet with a single wing and squad.
    pub fn seeded() -> Self {
        let mut universe = Self {
            next_id: 100,
            ..Self::default()
        };
        universe.characters.insert(
            SEED_CHARACTER_ID,
            Character {
                name: "Pascal".to_string(),
                birthday: "2015-03-24T11:37:00Z".to_string(),
                corporation_id: 109299958,
                security_status: 0.5,
            },
        );
        universe.fleets.insert(
            SEED_FLEET_ID,
            Fleet {
                is_free_move: false,
                is_registered: false,
                is_voice_enabled: false,
                motd: "Welcome".to_string(),
                members: vec![Member {
                    character_id: SEED_CHARACTER_ID,
                    join_time: "2016-04-29T12:34:56Z".to_string(),
                    role: "fleet_commander".to_string(),
                    squad_id: -1,
                    wing_id: -1,
                    takes_fleet_warp: true,
                }],
                wings: vec![Wing {
                    id: SEED_WING_ID,
                    name: "Wing 1".to_string(),
                    squads: vec![Squad {
                        id: SEED_SQUAD_ID,
                        name: "Squad 1".to_string(),
                    }],
                }],
            },
        );
        universe
    }

    fn next_id(&mut self) -> i64 {
        self.next_id += 1;
        self.next_id
    }
}

#[derive(Clone)]
pub struct AppState {
    pub universe: Arc<RwLock<Universe>>,
    pub errors_remaining: Arc<AtomicI64>,
}

/// An ESI-shaped error body.
pub struct ApiError(StatusCode, &'static str);

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.0, Json(serde_json::json!({ "error": self.1 }))).into_response()
    }
}

fn not_found(what: &'static str) -> ApiError {
    ApiError(StatusCode::NOT_FOUND, what)
}

pub fn app() -> Router {
    let state = AppState {
        universe: Arc::new(RwLock::new(Universe::seeded())),
        errors_remaining: Arc::new(AtomicI64::new(ERROR_LIMIT)),
    };

    let api = Router::new()
        .route("/v1/characters/{cid}/", get(get_character))
        .route("/v1/characters/{cid}/fleet/", get(get_character_fleet))
        .route("/v1/fleets/{fid}/", get(get_fleet).put(update_fleet))
        .route("/v1/fleets/{fid}/members/", get(get_members).post(invite))
        .route(
            "/v1/fleets/{fid}/members/{cid}/",
            put(move_member).delete(kick),
        )
        .route(
            "/v1/fleets/{fid}/squads/{sid}/",
            put(rename_squad).delete(delete_squad),
        )
        .route("/v1/fleets/{fid}/wings/", get(get_wings).post(create_wing))
        .route(
            "/v1/fleets/{fid}/wings/{wid}/",
            put(rename_wing).delete(delete_wing),
        )
        .route("/v1/fleets/{fid}/wings/{wid}/squads/", post(create_squad))
        .route("/v1/slow/", get(slow));

    Router::new()
        .nest(BASE_PATH, api)
        .fallback(base_path_not_preserved)
        .layer(middleware::from_fn_with_state(state.clone(), rate_headers))
        .with_state(state)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

/// Attach the error rate-limit headers to every failed response.
async fn rate_headers(State(state): State<AppState>, request: Request, next: Next) -> Response {
    let mut response = next.run(request).await;
    if !response.status().is_success() {
        let remaining = state.errors_remaining.fetch_sub(1, Ordering::SeqCst) - 1;
        let headers = response.headers_mut();
        headers.insert("x-esi-error-limit-remain", HeaderValue::from(remaining.max(0)));
        headers.insert(
            "x-esi-error-limit-reset",
            HeaderValue::from(ERROR_LIMIT_RESET_SECS),
        );
    }
    response
}

async fn base_path_not_preserved() -> (StatusCode, &'static str) {
    tracing::error!("request outside of {BASE_PATH}; did the client use an absolute path?");
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        "Client base URL path prefix is not preserved in the request URL.",
    )
}

async fn slow() -> StatusCode {
    tokio::time::sleep(Duration::from_secs(30)).await;
    StatusCode::NO_CONTENT
}

async fn get_character(
    State(state): State<AppState>,
    Path(cid): Path<i64>,
) -> Result<impl IntoResponse, ApiError> {
    let universe = state.universe.read().await;
    let character = universe
        .characters
        .get(&cid)
        .cloned()
        .ok_or(not_found("Character not found"))?;
    Ok((
        [("warning", DEPRECATION_WARNING)],
        Json(character),
    ))
}

async fn get_character_fleet(
    State(state): State<AppState>,
    Path(cid): Path<i64>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let universe = state.universe.read().await;
    universe
        .fleets
        .iter()
        .find_map(|(fid, fleet)| {
            fleet.members.iter().find(|m| m.character_id == cid).map(|m| {
                serde_json::json!({
                    "fleet_id": fid,
                    "role": m.role,
                    "squad_id": m.squad_id,
                    "wing_id": m.wing_id,
                })
            })
        })
        .map(Json)
        .ok_or(not_found("Character is not in a fleet"))
}

async fn get_fleet(
    State(state): State<AppState>,
    Path(fid): Path<i64>,
) -> Result<Json<Fleet>, ApiError> {
    let universe = state.universe.read().await;
    universe
        .fleets
        .get(&fid)
        .cloned()
        .map(Json)
        .ok_or(not_found("Fleet not found"))
}

async fn update_fleet(
    State(state): State<AppState>,
    Path(fid): Path<i64>,
    Json(input): Json<FleetUpdate>,
) -> Result<StatusCode, ApiError> {
    let mut universe = state.universe.write().await;
    let fleet = universe
        .fleets
        .get_mut(&fid)
        .ok_or(not_found("Fleet not found"))?;
    if let Some(free_move) = input.is_free_move {
        fleet.is_free_move = free_move;
    }
    if let Some(motd) = input.motd {
        fleet.motd = motd;
    }
    Ok(StatusCode::NO_CONTENT)
}

fn check_language(query: &Language) -> Result<(), ApiError> {
    match query.language.as_deref() {
        Some(lang) if !LANGUAGES.contains(&lang) => {
            Err(ApiError(StatusCode::BAD_REQUEST, "Invalid language"))
        }
        _ => Ok(()),
    }
}

async fn get_members(
    State(state): State<AppState>,
    Path(fid): Path<i64>,
    Query(query): Query<Language>,
) -> Result<Json<Vec<Member>>, ApiError> {
    check_language(&query)?;
    let universe = state.universe.read().await;
    let fleet = universe.fleets.get(&fid).ok_or(not_found("Fleet not found"))?;
    Ok(Json(fleet.members.clone()))
}

async fn invite(
    State(state): State<AppState>,
    Path(fid): Path<i64>,
    Json(input): Json<Invitation>,
) -> Result<StatusCode, ApiError> {
    let mut universe = state.universe.write().await;
    let fleet = universe
        .fleets
        .get_mut(&fid)
        .ok_or(not_found("Fleet not found"))?;
    if fleet.members.iter().any(|m| m.character_id == input.character_id) {
        return Err(ApiError(
            StatusCode::UNPROCESSABLE_ENTITY,
            "Character is already in the fleet",
        ));
    }
    fleet.members.push(Member {
        character_id: input.character_id,
        join_time: "2018-01-01T18:00:00Z".to_string(),
        role: input.role,
        squad_id: input.squad_id.unwrap_or(-1),
        wing_id: input.wing_id.unwrap_or(-1),
        takes_fleet_warp: true,
    });
    Ok(StatusCode::NO_CONTENT)
}

async fn kick(
    State(state): State<AppState>,
    Path((fid, cid)): Path<(i64, i64)>,
) -> Result<StatusCode, ApiError> {
    let mut universe = state.universe.write().await;
    let fleet = universe
        .fleets
        .get_mut(&fid)
        .ok_or(not_found("Fleet not found"))?;
    let before = fleet.members.len();
    fleet.members.retain(|m| m.character_id != cid);
    if fleet.members.len() == before {
        return Err(not_found("Member not found"));
    }
    Ok(StatusCode::NO_CONTENT)
}

async fn move_member(
    State(state): State<AppState>,
    Path((fid, cid)): Path<(i64, i64)>,
    Json(input): Json<Movement>,
) -> Result<StatusCode, ApiError> {
    let mut universe = state.universe.write().await;
    let fleet = universe
        .fleets
        .get_mut(&fid)
        .ok_or(not_found("Fleet not found"))?;
    let member = fleet
        .members
        .iter_mut()
        .find(|m| m.character_id == cid)
        .ok_or(not_found("Member not found"))?;
    member.role = input.role;
    member.squad_id = input.squad_id.unwrap_or(-1);
    member.wing_id = input.wing_id.unwrap_or(-1);
    Ok(StatusCode::NO_CONTENT)
}

async fn get_wings(
    State(state): State<AppState>,
    Path(fid): Path<i64>,
    Query(query): Query<Language>,
) -> Result<Json<Vec<Wing>>, ApiError> {
    check_language(&query)?;
    let universe = state.universe.read().await;
    let fleet = universe.fleets.get(&fid).ok_or(not_found("Fleet not found"))?;
    Ok(Json(fleet.wings.clone()))
}

async fn create_wing(
    State(state): State<AppState>,
    Path(fid): Path<i64>,
) -> Result<(StatusCode, Json<serde_json::Value>), ApiError> {
    let mut universe = state.universe.write().await;
    let id = universe.next_id();
    let fleet = universe
        .fleets
        .get_mut(&fid)
        .ok_or(not_found("Fleet not found"))?;
    fleet.wings.push(Wing {
        id,
        name: format!("Wing {}", fleet.wings.len() + 1),
        squads: Vec::new(),
    });
    Ok((StatusCode::CREATED, Json(serde_json::json!({ "wing_id": id }))))
}

async fn rename_wing(
    State(state): State<AppState>,
    Path((fid, wid)): Path<(i64, i64)>,
    Json(input): Json<Naming>,
) -> Result<StatusCode, ApiError> {
    let mut universe = state.universe.write().await;
    let fleet = universe
        .fleets
        .get_mut(&fid)
        .ok_or(not_found("Fleet not found"))?;
    let wing = fleet
        .wings
        .iter_mut()
        .find(|w| w.id == wid)
        .ok_or(not_found("Wing not found"))?;
    wing.name = input.name;
    Ok(StatusCode::NO_CONTENT)
}

async fn delete_wing(
    State(state): State<AppState>,
    Path((fid, wid)): Path<(i64, i64)>,
) -> Result<StatusCode, ApiError> {
    let mut universe = state.universe.write().await;
    let fleet = universe
        .fleets
        .get_mut(&fid)
        .ok_or(not_found("Fleet not found"))?;
    let occupied = fleet.members.iter().any(|m| m.wing_id == wid);
    let index = fleet
        .wings
        .iter()
        .position(|w| w.id == wid)
        .ok_or(not_found("Wing not found"))?;
    if occupied {
        return Err(ApiError(StatusCode::BAD_REQUEST, "Wing is not empty"));
    }
    fleet.wings.remove(index);
    Ok(StatusCode::NO_CONTENT)
}

async fn create_squad(
    State(state): State<AppState>,
    Path((fid, wid)): Path<(i64, i64)>,
) -> Result<(StatusCode, Json<serde_json::Value>), ApiError> {
    let mut universe = state.universe.write().await;
    let id = universe.next_id();
    let fleet = universe
        .fleets
        .get_mut(&fid)
        .ok_or(not_found("Fleet not found"))?;
    let wing = fleet
        .wings
        .iter_mut()
        .find(|w| w.id == wid)
        .ok_or(not_found("Wing not found"))?;
    wing.squads.push(Squad {
        id,
        name: format!("Squad {}", wing.squads.len() + 1),
    });
    Ok((StatusCode::CREATED, Json(serde_json::json!({ "squad_id": id }))))
}

async fn rename_squad(
    State(state): State<AppState>,
    Path((fid, sid)): Path<(i64, i64)>,
    Json(input): Json<Naming>,
) -> Result<StatusCode, ApiError> {
    let mut universe = state.universe.write().await;
    let fleet = universe
        .fleets
        .get_mut(&fid)
        .ok_or(not_found("Fleet not found"))?;
    let squad = fleet
        .wings
        .iter_mut()
        .flat_map(|w| w.squads.iter_mut())
        .find(|s| s.id == sid)
        .ok_or(not_found("Squad not found"))?;
    squad.name = input.name;
    Ok(StatusCode::NO_CONTENT)
}

async fn delete_squad(
    State(state): State<AppState>,
    Path((fid, sid)): Path<(i64, i64)>,
) -> Result<StatusCode, ApiError> {
    let mut universe = state.universe.write().await;
    let fleet = universe
        .fleets
        .get_mut(&fid)
        .ok_or(not_found("Fleet not found"))?;
    if fleet.members.iter().any(|m| m.squad_id == sid) {
        return Err(ApiError(StatusCode::BAD_REQUEST, "Squad is not empty"));
    }
    for wing in &mut fleet.wings {
        if let Some(index) = wing.squads.iter().position(|s| s.id == sid) {
            wing.squads.remove(index);
            return Ok(StatusCode::NO_CONTENT);
        }
    }
    Err(not_found("Squad not found"))
}
