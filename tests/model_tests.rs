use cafe_portal::models::{
    DeleteDrinkResponse, Drink, DrinkListResponse, Ingredient, UpdateDrinkRequest,
};
use uuid::Uuid;

fn mocha() -> Drink {
    Drink {
        id: Uuid::from_u128(7),
        title: "mocha".to_string(),
        recipe: r#"[
            {"name": "espresso", "color": "brown", "parts": 1},
            {"name": "chocolate", "color": "dark", "parts": 1},
            {"name": "milk", "color": "white", "parts": 2}
        ]"#
        .to_string(),
    }
}

#[test]
fn short_projection_drops_ingredient_names() {
    let short = mocha().short().unwrap();

    assert_eq!(short.title, "mocha");
    assert_eq!(short.recipe.len(), 3);
    assert_eq!(short.recipe[0].color, "brown");
    assert_eq!(short.recipe[2].parts, 2);

    let json = serde_json::to_value(&short).unwrap();
    assert!(json["recipe"][0].get("name").is_none());
}

#[test]
fn long_projection_keeps_full_recipe() {
    let long = mocha().long().unwrap();

    assert_eq!(long.recipe.len(), 3);
    assert_eq!(long.recipe[1].name, "chocolate");
}

#[test]
fn corrupt_stored_recipe_fails_projection() {
    let drink = Drink {
        id: Uuid::from_u128(8),
        title: "broken".to_string(),
        recipe: "not json".to_string(),
    };

    assert!(drink.short().is_err());
    assert!(drink.long().is_err());
}

#[test]
fn update_request_omits_unset_fields_when_serialized() {
    let req = UpdateDrinkRequest {
        title: Some("cortado".to_string()),
        recipe: None,
    };

    let json = serde_json::to_value(&req).unwrap();
    assert_eq!(json["title"], serde_json::json!("cortado"));
    assert!(json.get("recipe").is_none());
}

#[test]
fn update_request_accepts_partial_bodies() {
    let req: UpdateDrinkRequest = serde_json::from_str(r#"{"title": "cortado"}"#).unwrap();
    assert_eq!(req.title.as_deref(), Some("cortado"));
    assert!(req.recipe.is_none());

    let req: UpdateDrinkRequest = serde_json::from_str(
        r#"{"recipe": [{"name": "espresso", "color": "brown", "parts": 1}]}"#,
    )
    .unwrap();
    assert!(req.title.is_none());
    assert_eq!(req.recipe.unwrap()[0].parts, 1);
}

#[test]
fn success_envelopes_serialize_with_expected_keys() {
    let list = DrinkListResponse {
        success: true,
        drinks: vec![mocha().short().unwrap()],
    };
    let json = serde_json::to_value(&list).unwrap();
    assert_eq!(json["success"], serde_json::json!(true));
    assert!(json["drinks"].is_array());

    let delete = DeleteDrinkResponse {
        success: true,
        delete: Uuid::from_u128(7),
    };
    let json = serde_json::to_value(&delete).unwrap();
    assert_eq!(
        json["delete"],
        serde_json::json!("00000000-0000-0000-0000-000000000007")
    );
}

#[test]
fn ingredient_round_trips_through_stored_form() {
    let recipe = vec![Ingredient {
        name: "espresso".to_string(),
        color: "brown".to_string(),
        parts: 1,
    }];

    let stored = serde_json::to_string(&recipe).unwrap();
    let drink = Drink {
        id: Uuid::from_u128(9),
        title: "espresso".to_string(),
        recipe: stored,
    };

    assert_eq!(drink.ingredients().unwrap()[0].name, "espresso");
}
