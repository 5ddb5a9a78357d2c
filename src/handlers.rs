use crate::calendar::{build_month_grid, DisplayedMonth};
use crate::errors::AppError;
use crate::models::{CalendarQuery, CalendarResponse, WageEnvelope, WagesQuery, CODE_BAD_REQUEST};
use crate::state::AppState;
use crate::ui::render_index;
use crate::wages::{build_wage_index, WageDataset};
use axum::{
    extract::{Query, State},
    response::Html,
    Json,
};
use std::str::FromStr;
use tracing::error;

pub async fn index(
    State(state): State<AppState>,
    Query(query): Query<CalendarQuery>,
) -> Result<Html<String>, AppError> {
    let month = displayed_month(&state, &query)?;
    let name = requested_name(&query.name);
    let dataset = state.dataset_for(name, wants_refresh(&query.refresh)).await;
    let view = calendar_view(&dataset, month);

    Ok(Html(render_index(&view, name, &state.config.currency)))
}

pub async fn get_calendar(
    State(state): State<AppState>,
    Query(query): Query<CalendarQuery>,
) -> Result<Json<CalendarResponse>, AppError> {
    let month = displayed_month(&state, &query)?;
    let dataset = state
        .dataset_for(requested_name(&query.name), wants_refresh(&query.refresh))
        .await;

    Ok(Json(calendar_view(&dataset, month)))
}

pub async fn get_wages(
    State(state): State<AppState>,
    Query(query): Query<WagesQuery>,
) -> Json<WageEnvelope> {
    match requested_name(&query.name) {
        Some(name) => {
            let dataset = state.dataset_for(Some(name), false).await;
            Json(WageEnvelope::ok(WageDataset::clone(&dataset)))
        }
        None => {
            error!("missing required query parameter: name");
            Json(WageEnvelope::error(CODE_BAD_REQUEST, "missing required query parameter: name"))
        }
    }
}

/// Grid and total for `month`, built from scratch on every call.
pub fn calendar_view(dataset: &WageDataset, month: DisplayedMonth) -> CalendarResponse {
    let index = build_wage_index(&dataset.records, month);
    CalendarResponse {
        user_name: dataset.user_name.clone(),
        year: month.year,
        month: month.month_number(),
        monthly_total: index.monthly_total,
        cells: build_month_grid(month, &index.by_date),
    }
}

fn displayed_month(state: &AppState, query: &CalendarQuery) -> Result<DisplayedMonth, AppError> {
    let default = state.config.default_month;
    let year = parse_param::<i32>(&query.year, "year")?.unwrap_or(default.year);
    let month_number = parse_param::<i64>(&query.month, "month")?
        .unwrap_or_else(|| i64::from(default.month_number()));
    let offset = parse_param::<i64>(&query.offset, "offset")?.unwrap_or(0);

    Ok(DisplayedMonth::normalized(year, month_number - 1).advance(offset))
}

fn parse_param<T: FromStr>(value: &Option<String>, key: &str) -> Result<Option<T>, AppError> {
    match value.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(raw) => raw
            .parse()
            .map(Some)
            .map_err(|_| AppError::bad_request(format!("{key} must be an integer"))),
    }
}

fn requested_name(name: &Option<String>) -> Option<&str> {
    name.as_deref().map(str::trim).filter(|name| !name.is_empty())
}

fn wants_refresh(value: &Option<String>) -> bool {
    matches!(value.as_deref(), Some("1" | "true"))
}
