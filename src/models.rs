use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use ts_rs::TS;
use utoipa::ToSchema;
use uuid::Uuid;

// --- Core Application Schemas (Mapped to Database) ---

/// Drink
///
/// A menu item row from the `drinks` table. The recipe is stored as a
/// serialized JSON string and only parsed when a representation is built;
/// the projection methods below own that parsing.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, Default)]
pub struct Drink {
    pub id: Uuid,
    /// Unique across the table; uniqueness is checked before insert.
    pub title: String,
    /// Serialized `Vec<Ingredient>`.
    pub recipe: String,
}

/// Ingredient
///
/// One component of a drink recipe: what it is, how it renders in the UI,
/// and how many parts of the drink it makes up.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
pub struct Ingredient {
    pub name: String,
    pub color: String,
    pub parts: i64,
}

/// IngredientParts
///
/// The reduced ingredient view used by the short representation: the graphic
/// can be drawn from color and proportion alone, without naming ingredients.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
pub struct IngredientParts {
    pub color: String,
    pub parts: i64,
}

/// DrinkShort
///
/// The public projection of a drink: id, title, and recipe colors only.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
pub struct DrinkShort {
    pub id: Uuid,
    pub title: String,
    pub recipe: Vec<IngredientParts>,
}

/// DrinkLong
///
/// The full projection including ingredient names, reserved for callers
/// holding the `get:drinks-detail` permission (and returned from mutations).
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
pub struct DrinkLong {
    pub id: Uuid,
    pub title: String,
    pub recipe: Vec<Ingredient>,
}

impl Drink {
    /// Parses the stored recipe string into its structured form.
    pub fn ingredients(&self) -> Result<Vec<Ingredient>, serde_json::Error> {
        serde_json::from_str(&self.recipe)
    }

    /// Builds the short representation. Fails only if the stored recipe
    /// string does not parse.
    pub fn short(&self) -> Result<DrinkShort, serde_json::Error> {
        let recipe = self
            .ingredients()?
            .into_iter()
            .map(|i| IngredientParts {
                color: i.color,
                parts: i.parts,
            })
            .collect();
        Ok(DrinkShort {
            id: self.id,
            title: self.title.clone(),
            recipe,
        })
    }

    /// Builds the long representation with the full recipe.
    pub fn long(&self) -> Result<DrinkLong, serde_json::Error> {
        Ok(DrinkLong {
            id: self.id,
            title: self.title.clone(),
            recipe: self.ingredients()?,
        })
    }
}

// --- Request Payloads (Input Schemas) ---

/// CreateDrinkRequest
///
/// Input payload for POST /drinks. Both fields are optional at the serde
/// level so the handler can answer a missing field with 422 rather than a
/// deserialization rejection.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
pub struct CreateDrinkRequest {
    pub title: Option<String>,
    pub recipe: Option<Vec<Ingredient>>,
}

/// UpdateDrinkRequest
///
/// Partial update payload for PATCH /drinks/{id}. Only supplied fields are
/// applied; supplying neither is a 422.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
pub struct UpdateDrinkRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub recipe: Option<Vec<Ingredient>>,
}

// --- Response Envelopes (Output Schemas) ---

/// DrinkListResponse
///
/// Success envelope for GET /drinks: short representations only.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
pub struct DrinkListResponse {
    pub success: bool,
    pub drinks: Vec<DrinkShort>,
}

/// DrinkDetailResponse
///
/// Success envelope for GET /drinks-detail and for mutations, which return
/// the affected drink as a one-element list.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
pub struct DrinkDetailResponse {
    pub success: bool,
    pub drinks: Vec<DrinkLong>,
}

/// DeleteDrinkResponse
///
/// Success envelope for DELETE /drinks/{id}: echoes the removed id.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
pub struct DeleteDrinkResponse {
    pub success: bool,
    pub delete: Uuid,
}
