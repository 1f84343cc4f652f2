use crate::errors::{AppError, SessionError};
use crate::loader;
use crate::models::{
    DayEditRequest, DayField, LogoutRequest, LogoutResponse, Navigation, SaveResponse,
    SessionView, StartDateRequest, WeekEditRequest, WeekField, WeekSummary,
};
use crate::persistence::{self, SaveMode, SaveOutcome};
use crate::state::AppState;
use crate::summary::build_summary;
use crate::tracker::{DayEdit, Edit, WeekEdit};
use crate::ui::{render_index, render_summary};
use axum::{extract::State, response::Html, Json};
use chrono::NaiveDate;
use serde_json::Value;

pub async fn index(State(state): State<AppState>) -> Html<String> {
    let view = state.session.lock().await.view();
    Html(render_index(&view))
}

pub async fn summary_page(State(state): State<AppState>) -> Result<Html<String>, AppError> {
    let rows = current_summary(&state).await?;
    Ok(Html(render_summary(&rows)))
}

pub async fn get_session(State(state): State<AppState>) -> Json<SessionView> {
    Json(state.session.lock().await.view())
}

pub async fn get_summary(State(state): State<AppState>) -> Result<Json<Vec<WeekSummary>>, AppError> {
    Ok(Json(current_summary(&state).await?))
}

pub async fn sign_in(State(state): State<AppState>) -> Result<Json<SessionView>, AppError> {
    Ok(Json(loader::sign_in(&state).await?))
}

pub async fn logout(
    State(state): State<AppState>,
    payload: Option<Json<LogoutRequest>>,
) -> Json<LogoutResponse> {
    let request = payload.map(|Json(request)| request).unwrap_or_default();
    let outcome = persistence::logout(&state, || request.save).await;
    Json(LogoutResponse {
        prompted: outcome.prompted,
        saved: outcome.saved,
    })
}

pub async fn save(State(state): State<AppState>) -> Result<Json<SaveResponse>, AppError> {
    let outcome = persistence::save_now(&state, SaveMode::Always).await?;
    Ok(Json(SaveResponse {
        saved: outcome == SaveOutcome::Saved,
    }))
}

pub async fn edit_day(
    State(state): State<AppState>,
    Json(payload): Json<DayEditRequest>,
) -> Result<Json<SessionView>, AppError> {
    let edit = day_edit(payload.field, payload.value)?;
    let view = persistence::apply_edit(
        &state,
        Edit::Day {
            week: payload.week,
            day: payload.day,
            edit,
        },
    )
    .await?;
    Ok(Json(view))
}

pub async fn edit_week(
    State(state): State<AppState>,
    Json(payload): Json<WeekEditRequest>,
) -> Result<Json<SessionView>, AppError> {
    let edit = match payload.field {
        WeekField::Checkpoint => WeekEdit::Checkpoint(payload.value),
        WeekField::Weight => WeekEdit::Weight(payload.value),
    };
    let view = persistence::apply_edit(
        &state,
        Edit::Week {
            week: payload.week,
            edit,
        },
    )
    .await?;
    Ok(Json(view))
}

pub async fn set_start_date(
    State(state): State<AppState>,
    Json(payload): Json<StartDateRequest>,
) -> Result<Json<SessionView>, AppError> {
    let date = match payload.date.as_deref().map(str::trim) {
        None | Some("") => None,
        Some(raw) => Some(
            NaiveDate::parse_from_str(raw, "%Y-%m-%d")
                .map_err(|_| AppError::bad_request("date must be YYYY-MM-DD"))?,
        ),
    };
    let view = persistence::apply_edit(
        &state,
        Edit::StartDate {
            week: payload.week,
            date,
        },
    )
    .await?;
    Ok(Json(view))
}

pub async fn navigate(
    State(state): State<AppState>,
    Json(payload): Json<Navigation>,
) -> Result<Json<SessionView>, AppError> {
    let mut session = state.session.lock().await;
    if session.user().is_none() {
        return Err(SessionError::NotSignedIn.into());
    }
    session.navigate(payload);
    Ok(Json(session.view()))
}

async fn current_summary(state: &AppState) -> Result<Vec<WeekSummary>, AppError> {
    let session = state.session.lock().await;
    if session.user().is_none() {
        return Err(SessionError::NotSignedIn.into());
    }
    Ok(build_summary(session.tracker()))
}

fn day_edit(field: DayField, value: Value) -> Result<DayEdit, AppError> {
    match (field, value) {
        (DayField::Done, Value::Bool(done)) => Ok(DayEdit::Done(done)),
        (DayField::Done, _) => Err(AppError::bad_request("done must be a boolean")),
        (DayField::Workout, Value::String(text)) => Ok(DayEdit::Workout(text)),
        (DayField::Cardio, Value::String(text)) => Ok(DayEdit::Cardio(text)),
        (DayField::Notes, Value::String(text)) => Ok(DayEdit::Notes(text)),
        (_, _) => Err(AppError::bad_request("text fields take a string value")),
    }
}
