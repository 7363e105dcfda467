use crate::{
    AppState,
    auth::Claims,
    errors::{ApiError, ApiJson, ApiPath},
    models::{
        CreateDrinkRequest, DeleteDrinkResponse, Drink, DrinkDetailResponse, DrinkListResponse,
        DrinkLong, DrinkShort, UpdateDrinkRequest,
    },
};
use axum::{Json, extract::State};
use uuid::Uuid;

// --- Projection Helpers ---

/// Collects short projections, coercing a recipe parse failure to 422.
fn short_all(drinks: &[Drink]) -> Result<Vec<DrinkShort>, ApiError> {
    drinks
        .iter()
        .map(|d| d.short())
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| {
            tracing::error!("stored recipe failed to parse: {:?}", e);
            ApiError::Unprocessable
        })
}

/// Collects long projections, coercing a recipe parse failure to 422.
fn long_all(drinks: &[Drink]) -> Result<Vec<DrinkLong>, ApiError> {
    drinks
        .iter()
        .map(|d| d.long())
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| {
            tracing::error!("stored recipe failed to parse: {:?}", e);
            ApiError::Unprocessable
        })
}

// --- Handlers ---

/// get_drinks
///
/// [Public Route] Lists the menu in its short representation.
/// An empty menu is a 404, matching the original service contract.
#[utoipa::path(
    get,
    path = "/drinks",
    responses(
        (status = 200, description = "Menu", body = DrinkListResponse),
        (status = 404, description = "No drinks exist")
    )
)]
pub async fn get_drinks(State(state): State<AppState>) -> Result<Json<DrinkListResponse>, ApiError> {
    let drinks = state.repo.list().await.map_err(|_| ApiError::Unprocessable)?;
    if drinks.is_empty() {
        return Err(ApiError::NotFound);
    }
    Ok(Json(DrinkListResponse {
        success: true,
        drinks: short_all(&drinks)?,
    }))
}

/// get_drink_details
///
/// [Protected Route: get:drinks-detail] Lists the menu in its long
/// representation, including ingredient names.
#[utoipa::path(
    get,
    path = "/drinks-detail",
    responses(
        (status = 200, description = "Menu with full recipes", body = DrinkDetailResponse),
        (status = 404, description = "No drinks exist")
    ),
    security(("bearer" = []))
)]
pub async fn get_drink_details(
    claims: Claims,
    State(state): State<AppState>,
) -> Result<Json<DrinkDetailResponse>, ApiError> {
    claims.require("get:drinks-detail")?;

    let drinks = state.repo.list().await.map_err(|_| ApiError::Unprocessable)?;
    if drinks.is_empty() {
        return Err(ApiError::NotFound);
    }
    Ok(Json(DrinkDetailResponse {
        success: true,
        drinks: long_all(&drinks)?,
    }))
}

/// create_drink
///
/// [Protected Route: post:drinks] Adds a drink to the menu.
/// Title and recipe are both required (422 otherwise); a duplicate title is
/// a 409 since titles are unique across the table.
#[utoipa::path(
    post,
    path = "/drinks",
    request_body = CreateDrinkRequest,
    responses(
        (status = 200, description = "Created", body = DrinkDetailResponse),
        (status = 409, description = "Title already exists"),
        (status = 422, description = "Missing title or recipe")
    ),
    security(("bearer" = []))
)]
pub async fn create_drink(
    claims: Claims,
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<CreateDrinkRequest>,
) -> Result<Json<DrinkDetailResponse>, ApiError> {
    claims.require("post:drinks")?;

    let title = match payload.title.as_deref() {
        Some(t) if !t.is_empty() => t,
        _ => return Err(ApiError::Unprocessable),
    };
    let recipe = match payload.recipe.as_deref() {
        Some(r) if !r.is_empty() => r,
        _ => return Err(ApiError::Unprocessable),
    };

    // Uniqueness check before insert.
    let existing = state
        .repo
        .find_by_title(title)
        .await
        .map_err(|_| ApiError::Unprocessable)?;
    if existing.is_some() {
        return Err(ApiError::Conflict);
    }

    let recipe_json = serde_json::to_string(recipe).map_err(|_| ApiError::Unprocessable)?;
    let drink = state
        .repo
        .insert(title, &recipe_json)
        .await
        .map_err(|_| ApiError::Unprocessable)?;

    Ok(Json(DrinkDetailResponse {
        success: true,
        drinks: long_all(std::slice::from_ref(&drink))?,
    }))
}

/// update_drink
///
/// [Protected Route: patch:drinks] Partially updates a drink. Only the
/// supplied fields change; supplying neither is a 422 and an unknown id is
/// a 404.
#[utoipa::path(
    patch,
    path = "/drinks/{id}",
    params(("id" = Uuid, Path, description = "Drink ID")),
    request_body = UpdateDrinkRequest,
    responses(
        (status = 200, description = "Updated", body = DrinkDetailResponse),
        (status = 404, description = "Unknown id"),
        (status = 422, description = "No fields supplied")
    ),
    security(("bearer" = []))
)]
pub async fn update_drink(
    claims: Claims,
    State(state): State<AppState>,
    ApiPath(id): ApiPath<Uuid>,
    ApiJson(payload): ApiJson<UpdateDrinkRequest>,
) -> Result<Json<DrinkDetailResponse>, ApiError> {
    claims.require("patch:drinks")?;

    if payload.title.is_none() && payload.recipe.is_none() {
        return Err(ApiError::Unprocessable);
    }

    let recipe_json = match &payload.recipe {
        Some(r) => Some(serde_json::to_string(r).map_err(|_| ApiError::Unprocessable)?),
        None => None,
    };

    let updated = state
        .repo
        .update(id, payload.title.as_deref(), recipe_json.as_deref())
        .await
        .map_err(|_| ApiError::Unprocessable)?;

    match updated {
        Some(drink) => Ok(Json(DrinkDetailResponse {
            success: true,
            drinks: long_all(std::slice::from_ref(&drink))?,
        })),
        None => Err(ApiError::NotFound),
    }
}

/// delete_drink
///
/// [Protected Route: delete:drinks] Removes a drink and echoes its id.
/// Deleting an unknown id is a 400.
#[utoipa::path(
    delete,
    path = "/drinks/{id}",
    params(("id" = Uuid, Path, description = "Drink ID")),
    responses(
        (status = 200, description = "Deleted", body = DeleteDrinkResponse),
        (status = 400, description = "Unknown id")
    ),
    security(("bearer" = []))
)]
pub async fn delete_drink(
    claims: Claims,
    State(state): State<AppState>,
    ApiPath(id): ApiPath<Uuid>,
) -> Result<Json<DeleteDrinkResponse>, ApiError> {
    claims.require("delete:drinks")?;

    let removed = state
        .repo
        .delete(id)
        .await
        .map_err(|_| ApiError::Unprocessable)?;
    if !removed {
        return Err(ApiError::BadRequest);
    }

    Ok(Json(DeleteDrinkResponse {
        success: true,
        delete: id,
    }))
}
