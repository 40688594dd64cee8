use std::{collections::HashMap, sync::Arc};

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde_json::{json, Map, Value};
use tokio::{net::TcpListener, sync::RwLock};
use tracing::{debug, info};

/// Collection name and its primary-key field.
pub const COLLECTIONS: &[(&str, &str)] = &[
    ("species", "species_id"),
    ("habitats", "habitat_id"),
    ("diets", "diet_id"),
    ("classifications", "classification_id"),
];

pub const DUPLICATE_KEY_CODE: u32 = 23000;

#[derive(Debug, Clone, Default)]
pub struct Store {
    pub collections: HashMap<String, Vec<Value>>,
    pub leagues: Vec<Value>,
}

impl Store {
    /// Add records to a collection, keeping insertion order.
    pub fn with(mut self, collection: &str, records: impl IntoIterator<Item = Value>) -> Self {
        self.collections
            .entry(collection.to_string())
            .or_default()
            .extend(records);
        self
    }

    pub fn with_leagues(mut self, leagues: impl IntoIterator<Item = Value>) -> Self {
        self.leagues.extend(leagues);
        self
    }

    /// A small zoo for local runs.
    pub fn seeded() -> Self {
        let habitats = [
            ("HA-001", "Savannah", "Tropical", "Grassland", "East Africa", 12000),
            ("HA-002", "Rainforest", "Tropical", "Dense canopy", "Amazon Basin", 5500),
            ("HA-003", "Arctic Tundra", "Polar", "Moss and lichen", "Svalbard", 8000),
            ("HA-004", "Coral Reef", "Marine", "Coral", "Great Barrier Reef", 3400),
            ("HA-005", "Temperate Forest", "Temperate", "Deciduous", "Bavaria", 2100),
            ("HA-006", "Desert", "Arid", "Scrub", "Sahara", 90000),
            ("HA-007", "Wetland", "Temperate", "Reeds", "Okavango Delta", 1500),
            ("HA-008", "Mountain", "Alpine", "Conifer", "Himalaya", 4300),
        ]
        .into_iter()
        .map(|(id, name, climate, vegetation, region, area)| {
            json!({
                "habitat_id": id, "name": name, "climate": climate,
                "vegetation": vegetation, "region": region, "area_km2": area
            })
        });

        let diets = [
            ("DI-001", "Carnivore"),
            ("DI-002", "Herbivore"),
            ("DI-003", "Omnivore"),
        ]
        .into_iter()
        .map(|(id, name)| json!({ "diet_id": id, "name": name }));

        let classifications = [
            ("CL-001", "Mammal"),
            ("CL-002", "Bird"),
            ("CL-003", "Reptile"),
            ("CL-004", "Fish"),
        ]
        .into_iter()
        .map(|(id, name)| json!({ "classification_id": id, "name": name }));

        let species = [
            ("SP-001", "Lion", "Panthera leo", "VU", "HA-001", "DI-001", "CL-001"),
            ("SP-002", "African Elephant", "Loxodonta africana", "EN", "HA-001", "DI-002", "CL-001"),
            ("SP-003", "Giraffe", "Giraffa camelopardalis", "VU", "HA-001", "DI-002", "CL-001"),
            ("SP-004", "Jaguar", "Panthera onca", "NT", "HA-002", "DI-001", "CL-001"),
            ("SP-005", "Scarlet Macaw", "Ara macao", "LC", "HA-002", "DI-002", "CL-002"),
            ("SP-006", "Polar Bear", "Ursus maritimus", "VU", "HA-003", "DI-001", "CL-001"),
            ("SP-007", "Clownfish", "Amphiprion ocellaris", "LC", "HA-004", "DI-003", "CL-004"),
            ("SP-008", "Green Sea Turtle", "Chelonia mydas", "EN", "HA-004", "DI-002", "CL-003"),
            ("SP-009", "Red Fox", "Vulpes vulpes", "LC", "HA-005", "DI-003", "CL-001"),
            ("SP-010", "Fennec Fox", "Vulpes zerda", "LC", "HA-006", "DI-003", "CL-001"),
            ("SP-011", "Shoebill", "Balaeniceps rex", "VU", "HA-007", "DI-001", "CL-002"),
            ("SP-012", "Snow Leopard", "Panthera uncia", "VU", "HA-008", "DI-001", "CL-001"),
        ]
        .into_iter()
        .map(|(id, name, sci, status, habitat, diet, class)| {
            json!({
                "species_id": id, "name": name, "scientific_name": sci,
                "conservation_status": status, "habitat_id": habitat,
                "diet_id": diet, "classification_id": class
            })
        });

        let leagues = [
            ("4328", "English Premier League", "Soccer", "England"),
            ("4329", "English League Championship", "Soccer", "England"),
            ("4414", "English Premiership Rugby", "Rugby", "England"),
            ("4331", "German Bundesliga", "Soccer", "Germany"),
            ("4335", "Spanish La Liga", "Soccer", "Spain"),
            ("4387", "NBA", "Basketball", "United States"),
        ]
        .into_iter()
        .map(|(id, name, sport, country)| {
            json!({ "idLeague": id, "strLeague": name, "strSport": sport, "strCountry": country })
        });

        Store::default()
            .with("habitats", habitats)
            .with("diets", diets)
            .with("classifications", classifications)
            .with("species", species)
            .with_leagues(leagues)
    }
}

pub type Db = Arc<RwLock<Store>>;

pub fn app() -> Router {
    app_with(Store::default())
}

pub fn app_with(store: Store) -> Router {
    let db: Db = Arc::new(RwLock::new(store));
    Router::new()
        .route("/search_all_leagues.php", get(search_leagues))
        .route(
            "/{collection}",
            get(list_records)
                .post(create_record)
                .put(update_record)
                .delete(delete_record),
        )
        .with_state(db)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    run_with(listener, Store::seeded()).await
}

pub async fn run_with(listener: TcpListener, store: Store) -> Result<(), std::io::Error> {
    axum::serve(listener, app_with(store)).await
}

/// Error body in the shape the real API uses.
#[derive(Debug)]
struct Failure(StatusCode, Value);

impl IntoResponse for Failure {
    fn into_response(self) -> Response {
        (self.0, Json(self.1)).into_response()
    }
}

fn message(status: StatusCode, text: &str) -> Failure {
    Failure(status, json!({ "message": text }))
}

fn id_field(collection: &str) -> Result<&'static str, Failure> {
    COLLECTIONS
        .iter()
        .find(|(name, _)| *name == collection)
        .map(|(_, field)| *field)
        .ok_or_else(|| message(StatusCode::NOT_FOUND, "unknown collection"))
}

fn text_of(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// The single record of a write body.
fn single_record(mut body: Vec<Value>, key: &str) -> Result<(String, Map<String, Value>), Failure> {
    if body.len() != 1 {
        return Err(message(StatusCode::BAD_REQUEST, "expected exactly one record"));
    }
    let Value::Object(record) = body.remove(0) else {
        return Err(message(StatusCode::BAD_REQUEST, "record must be an object"));
    };
    let id = record
        .get(key)
        .and_then(text_of)
        .filter(|id| !id.is_empty())
        .ok_or_else(|| message(StatusCode::BAD_REQUEST, "missing primary key"))?;
    Ok((id, record))
}

fn parse_positive(raw: Option<&String>, default: usize) -> usize {
    raw.and_then(|v| v.parse::<usize>().ok())
        .filter(|n| *n > 0)
        .unwrap_or(default)
}

async fn list_records(
    State(db): State<Db>,
    Path(collection): Path<String>,
    Query(params): Query<HashMap<String, String>>,
) -> Result<Json<Value>, Failure> {
    id_field(&collection)?;
    let page = parse_positive(params.get("page"), 1);
    let page_size = parse_positive(params.get("pageSize"), 5);

    let filters: Vec<(&String, String)> = params
        .iter()
        .filter(|(k, v)| k.as_str() != "page" && k.as_str() != "pageSize" && !v.is_empty())
        .map(|(k, v)| (k, v.to_lowercase()))
        .collect();

    let store = db.read().await;
    let matching: Vec<&Value> = store
        .collections
        .get(&collection)
        .map(|records| {
            records
                .iter()
                .filter(|record| {
                    filters.iter().all(|(field, needle)| {
                        record
                            .get(field.as_str())
                            .and_then(text_of)
                            .is_some_and(|text| text.to_lowercase().contains(needle))
                    })
                })
                .collect()
        })
        .unwrap_or_default();

    let total_records = matching.len();
    debug!(%collection, page, page_size, total_records, "list");
    let total_pages = total_records.div_ceil(page_size);
    let data: Vec<Value> = matching
        .into_iter()
        .skip((page - 1).saturating_mul(page_size))
        .take(page_size)
        .cloned()
        .collect();

    Ok(Json(json!({
        "data": data,
        "metadata": {
            "total_pages": total_pages,
            "total_records": total_records
        }
    })))
}

async fn create_record(
    State(db): State<Db>,
    Path(collection): Path<String>,
    Json(body): Json<Vec<Value>>,
) -> Result<(StatusCode, Json<Value>), Failure> {
    let key = id_field(&collection)?;
    let (id, record) = single_record(body, key)?;

    let mut store = db.write().await;
    let records = store.collections.entry(collection.clone()).or_default();
    if records
        .iter()
        .any(|r| r.get(key).and_then(text_of).as_deref() == Some(id.as_str()))
    {
        debug!(%collection, %id, "duplicate key");
        return Err(Failure(
            StatusCode::CONFLICT,
            json!({ "code": DUPLICATE_KEY_CODE, "id": id }),
        ));
    }
    let record = Value::Object(record);
    records.push(record.clone());
    info!(%collection, %id, "record created");
    Ok((StatusCode::CREATED, Json(json!([record]))))
}

async fn update_record(
    State(db): State<Db>,
    Path(collection): Path<String>,
    Json(body): Json<Vec<Value>>,
) -> Result<Json<Value>, Failure> {
    let key = id_field(&collection)?;
    let (id, changes) = single_record(body, key)?;

    let mut store = db.write().await;
    let existing = store
        .collections
        .get_mut(&collection)
        .and_then(|records| {
            records
                .iter_mut()
                .find(|r| r.get(key).and_then(text_of).as_deref() == Some(id.as_str()))
        })
        .and_then(Value::as_object_mut)
        .ok_or_else(|| message(StatusCode::NOT_FOUND, "no such record"))?;
    existing.extend(changes);
    info!(%collection, %id, "record updated");
    Ok(Json(json!([existing.clone()])))
}

async fn delete_record(
    State(db): State<Db>,
    Path(collection): Path<String>,
    Json(body): Json<Vec<Value>>,
) -> Result<StatusCode, Failure> {
    let key = id_field(&collection)?;
    let (id, _) = single_record(body, key)?;

    let mut store = db.write().await;
    let records = store
        .collections
        .get_mut(&collection)
        .ok_or_else(|| message(StatusCode::NOT_FOUND, "no such record"))?;
    let before = records.len();
    records.retain(|r| r.get(key).and_then(text_of).as_deref() != Some(id.as_str()));
    if records.len() == before {
        return Err(message(StatusCode::NOT_FOUND, "no such record"));
    }
    info!(%collection, %id, "record deleted");
    Ok(StatusCode::NO_CONTENT)
}

/// Mirrors the public API: matches land under `countries`, and a miss is
/// `null` rather than an empty list.
async fn search_leagues(
    State(db): State<Db>,
    Query(params): Query<HashMap<String, String>>,
) -> Json<Value> {
    let matches_param = |league: &Value, field: &str, key: &str| {
        match params.get(key).filter(|v| !v.is_empty()) {
            None => true,
            Some(wanted) => league
                .get(field)
                .and_then(Value::as_str)
                .is_some_and(|v| v.eq_ignore_ascii_case(wanted)),
        }
    };

    let store = db.read().await;
    let found: Vec<Value> = store
        .leagues
        .iter()
        .filter(|l| matches_param(l, "strCountry", "c") && matches_param(l, "strSport", "s"))
        .cloned()
        .collect();

    if found.is_empty() {
        Json(json!({ "countries": null }))
    } else {
        Json(json!({ "countries": found }))
    }
}
