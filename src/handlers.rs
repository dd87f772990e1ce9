use crate::errors::{AppError, NutritionError};
use crate::filters::{MealFilter, ReportWindow};
use crate::goals::UserProfile;
use crate::models::{
    EntryPatch, FoodEntry, NewEntryRequest, NutritionGoals, ScanRequest, StatsQuery, WaterRequest,
    WaterResponse,
};
use crate::recognition::RecognitionResult;
use crate::state::AppState;
use crate::stats::{DailyStats, HistoryResponse};
use crate::storage::persist_log;
use crate::store::{FoodStore, WaterAction};
use crate::ui::render_index;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Html,
    Json,
};
use tracing::warn;
use uuid::Uuid;

pub async fn index(State(state): State<AppState>) -> Html<String> {
    let mut store = state.store.lock().await;
    let goals = *store.goals();
    let water = store.water_today();
    let stats = store.today_stats().cloned();
    Html(render_index(&water.date, stats.as_ref(), &goals, water.glasses))
}

pub async fn get_today(State(state): State<AppState>) -> Json<Option<DailyStats>> {
    let mut store = state.store.lock().await;
    Json(store.today_stats().cloned())
}

pub async fn get_stats(
    State(state): State<AppState>,
    Query(query): Query<StatsQuery>,
) -> Result<Json<Option<DailyStats>>, AppError> {
    let (window, meal) = parse_query(&query)?;
    let store = state.store.lock().await;
    Ok(Json(store.stats(window, meal)))
}

pub async fn get_history(State(state): State<AppState>) -> Json<HistoryResponse> {
    let store = state.store.lock().await;
    Json(store.history())
}

pub async fn list_entries(
    State(state): State<AppState>,
    Query(query): Query<StatsQuery>,
) -> Result<Json<Vec<FoodEntry>>, AppError> {
    let (window, meal) = parse_query(&query)?;
    let store = state.store.lock().await;
    let entries = store.entries_in(window, meal).into_iter().cloned().collect();
    Ok(Json(entries))
}

pub async fn create_entry(
    State(state): State<AppState>,
    Json(payload): Json<NewEntryRequest>,
) -> Result<(StatusCode, Json<FoodEntry>), AppError> {
    let mut store = state.store.lock().await;
    let entry = store.create_entry(payload);
    persist(&state, &store).await?;
    Ok((StatusCode::CREATED, Json(entry)))
}

pub async fn update_entry(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(patch): Json<EntryPatch>,
) -> Result<Json<FoodEntry>, AppError> {
    let mut store = state.store.lock().await;
    let entry = store.update_entry(id, patch).inspect_err(log_rejected)?;
    persist(&state, &store).await?;
    Ok(Json(entry))
}

pub async fn delete_entry(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    let mut store = state.store.lock().await;
    store.delete_entry(id).inspect_err(log_rejected)?;
    persist(&state, &store).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn get_goals(State(state): State<AppState>) -> Json<NutritionGoals> {
    let store = state.store.lock().await;
    Json(*store.goals())
}

pub async fn put_goals(
    State(state): State<AppState>,
    Json(goals): Json<NutritionGoals>,
) -> Result<Json<NutritionGoals>, AppError> {
    let mut store = state.store.lock().await;
    let goals = store.set_goals(goals);
    persist(&state, &store).await?;
    Ok(Json(goals))
}

pub async fn onboarding(
    State(state): State<AppState>,
    Json(profile): Json<UserProfile>,
) -> Result<Json<NutritionGoals>, AppError> {
    let mut store = state.store.lock().await;
    let goals = store.apply_profile(&profile).inspect_err(log_rejected)?;
    persist(&state, &store).await?;
    Ok(Json(goals))
}

pub async fn get_water(State(state): State<AppState>) -> Json<WaterResponse> {
    let store = state.store.lock().await;
    Json(store.water_today())
}

pub async fn water(
    State(state): State<AppState>,
    Json(payload): Json<WaterRequest>,
) -> Result<Json<WaterResponse>, AppError> {
    let action = payload.action.parse::<WaterAction>().inspect_err(log_rejected)?;
    let mut store = state.store.lock().await;
    let response = store.apply_water(action);
    persist(&state, &store).await?;
    Ok(Json(response))
}

pub async fn scan(
    State(state): State<AppState>,
    Json(payload): Json<ScanRequest>,
) -> Result<Json<RecognitionResult>, AppError> {
    let image_uri = payload.image_uri.trim();
    if image_uri.is_empty() {
        return Err(AppError::bad_request("imageUri must not be empty"));
    }
    Ok(Json(state.recognizer.recognize(image_uri)))
}

fn parse_query(query: &StatsQuery) -> Result<(ReportWindow, MealFilter), NutritionError> {
    let window = query
        .window
        .as_deref()
        .map_or(Ok(ReportWindow::Daily), |value| value.parse())
        .inspect_err(log_rejected)?;
    let meal = query
        .meal_type
        .as_deref()
        .map_or(Ok(MealFilter::All), |value| value.parse())
        .inspect_err(log_rejected)?;
    Ok((window, meal))
}

async fn persist(state: &AppState, store: &FoodStore) -> Result<(), AppError> {
    persist_log(&state.data_path, store.log()).await
}

fn log_rejected(err: &NutritionError) {
    warn!("rejected request: {err}");
}
