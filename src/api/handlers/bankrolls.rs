use axum::extract::{Path, Query, State};
use axum::Json;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::db::bankroll_repo::{self, NewBankroll, RiskParamsUpdate};
use crate::errors::AppError;
use crate::models::{Bankroll, UnitMode};
use crate::AppState;

#[derive(Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub success: bool,
    pub data: Option<T>,
    pub error: Option<String>,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn ok(data: T) -> Json<Self> {
        Json(Self {
            success: true,
            data: Some(data),
            error: None,
        })
    }
}

// ---------------------------------------------------------------------------
// DTOs
// ---------------------------------------------------------------------------

#[derive(Deserialize)]
pub struct CreateBankrollRequest {
    pub owner_id: Uuid,
    pub name: String,
    pub currency: Option<String>,
    pub starting_balance: Decimal,
    pub unit_mode: UnitMode,
    pub unit_value: Decimal,
    pub max_bet_pct: Option<Decimal>,
    pub daily_loss_limit_pct: Option<Decimal>,
    pub weekly_loss_limit_pct: Option<Decimal>,
    pub kelly_fraction: Option<Decimal>,
}

#[derive(Deserialize)]
pub struct UpdateRiskParamsRequest {
    pub max_bet_pct: Option<Decimal>,
    /// Nested option: present-and-null clears the limit.
    #[serde(default, with = "double_option")]
    pub daily_loss_limit_pct: Option<Option<Decimal>>,
    #[serde(default, with = "double_option")]
    pub weekly_loss_limit_pct: Option<Option<Decimal>>,
    pub kelly_fraction: Option<Decimal>,
    pub unit_value: Option<Decimal>,
}

mod double_option {
    use serde::{Deserialize, Deserializer};

    pub fn deserialize<'de, D, T>(de: D) -> Result<Option<Option<T>>, D::Error>
    where
        D: Deserializer<'de>,
        T: Deserialize<'de>,
    {
        Option::<T>::deserialize(de).map(Some)
    }
}

#[derive(Deserialize)]
pub struct OwnerQuery {
    pub owner_id: Uuid,
}

fn validate_fraction(name: &str, value: Decimal) -> Result<(), AppError> {
    if value <= Decimal::ZERO || value > Decimal::ONE {
        return Err(AppError::Validation(format!(
            "{name} must be in (0, 1], got {value}"
        )));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// GET /api/bankrolls?owner_id= — the owner's bankrolls
pub async fn list(
    State(state): State<AppState>,
    Query(query): Query<OwnerQuery>,
) -> Result<Json<ApiResponse<Vec<Bankroll>>>, AppError> {
    let bankrolls = bankroll_repo::list_by_owner(&state.db, query.owner_id).await?;
    Ok(ApiResponse::ok(bankrolls))
}

/// GET /api/bankrolls/{id}
pub async fn detail(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<Bankroll>>, AppError> {
    let bankroll = bankroll_repo::get_by_id(&state.db, id)
        .await?
        .ok_or_else(|| AppError::NotFound("bankroll not found".into()))?;
    Ok(ApiResponse::ok(bankroll))
}

/// POST /api/bankrolls
pub async fn create(
    State(state): State<AppState>,
    Json(body): Json<CreateBankrollRequest>,
) -> Result<Json<ApiResponse<Bankroll>>, AppError> {
    if body.starting_balance < Decimal::ZERO {
        return Err(AppError::Validation(format!(
            "starting_balance must be >= 0, got {}",
            body.starting_balance
        )));
    }
    if body.unit_value <= Decimal::ZERO {
        return Err(AppError::Validation(format!(
            "unit_value must be > 0, got {}",
            body.unit_value
        )));
    }

    let max_bet_pct = body.max_bet_pct.unwrap_or(state.config.default_max_bet_pct);
    let kelly_fraction = body
        .kelly_fraction
        .unwrap_or(state.config.default_kelly_fraction);

    validate_fraction("max_bet_pct", max_bet_pct)?;
    validate_fraction("kelly_fraction", kelly_fraction)?;
    if let Some(pct) = body.daily_loss_limit_pct {
        validate_fraction("daily_loss_limit_pct", pct)?;
    }
    if let Some(pct) = body.weekly_loss_limit_pct {
        validate_fraction("weekly_loss_limit_pct", pct)?;
    }

    let bankroll = bankroll_repo::create(
        &state.db,
        NewBankroll {
            owner_id: body.owner_id,
            name: body.name,
            currency: body.currency.unwrap_or_else(|| "USD".into()),
            starting_balance: body.starting_balance,
            unit_mode: body.unit_mode,
            unit_value: body.unit_value,
            max_bet_pct,
            daily_loss_limit_pct: body.daily_loss_limit_pct,
            weekly_loss_limit_pct: body.weekly_loss_limit_pct,
            kelly_fraction,
        },
    )
    .await?;

    tracing::info!(bankroll_id = %bankroll.id, owner_id = %bankroll.owner_id, "Bankroll created");
    Ok(ApiResponse::ok(bankroll))
}

/// PUT /api/bankrolls/{id} — mutable risk parameters only
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(body): Json<UpdateRiskParamsRequest>,
) -> Result<Json<ApiResponse<Bankroll>>, AppError> {
    if let Some(pct) = body.max_bet_pct {
        validate_fraction("max_bet_pct", pct)?;
    }
    if let Some(Some(pct)) = body.daily_loss_limit_pct {
        validate_fraction("daily_loss_limit_pct", pct)?;
    }
    if let Some(Some(pct)) = body.weekly_loss_limit_pct {
        validate_fraction("weekly_loss_limit_pct", pct)?;
    }
    if let Some(kf) = body.kelly_fraction {
        validate_fraction("kelly_fraction", kf)?;
    }
    if let Some(uv) = body.unit_value {
        if uv <= Decimal::ZERO {
            return Err(AppError::Validation(format!(
                "unit_value must be > 0, got {uv}"
            )));
        }
    }

    let bankroll = bankroll_repo::update_risk_params(
        &state.db,
        id,
        RiskParamsUpdate {
            max_bet_pct: body.max_bet_pct,
            daily_loss_limit_pct: body.daily_loss_limit_pct,
            weekly_loss_limit_pct: body.weekly_loss_limit_pct,
            kelly_fraction: body.kelly_fraction,
            unit_value: body.unit_value,
        },
    )
    .await?
    .ok_or_else(|| AppError::NotFound("bankroll not found".into()))?;

    Ok(ApiResponse::ok(bankroll))
}

/// POST /api/bankrolls/{id}/activate — make this the owner's single
/// active bankroll
pub async fn activate(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<Bankroll>>, AppError> {
    let bankroll = bankroll_repo::activate(&state.db, id)
        .await?
        .ok_or_else(|| AppError::NotFound("bankroll not found".into()))?;

    if let Ok(active) = bankroll_repo::count_active(&state.db).await {
        metrics::gauge!("active_bankrolls").set(active as f64);
    }

    Ok(ApiResponse::ok(bankroll))
}

/// DELETE /api/bankrolls/{id} — refused while settled bets exist
pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<bool>>, AppError> {
    let deleted = bankroll_repo::delete(&state.db, id)
        .await
        .map_err(|e| AppError::Conflict(e.to_string()))?;

    if !deleted {
        return Err(AppError::NotFound("bankroll not found".into()));
    }

    Ok(ApiResponse::ok(true))
}
