//! Store contract tests run against both backends.
//!
//! The in-memory store always runs. The PostgreSQL store runs when
//! `TEST_DATABASE_URL` points at a database the tests may write to; otherwise
//! those cases are skipped. Every PostgreSQL case uses unique emails and
//! titles so runs against a shared database do not interfere.

use std::sync::Arc;

use tastetrail_core::mode::{ModeOptions, StorageMode, connect_durable};
use tastetrail_core::models::Diet;
use tastetrail_core::models::auth::{DietaryPreferences, NewUser, ProfileUpdate};
use tastetrail_core::models::recipe::{
    Ingredient, IngredientCategory, NewRecipe, RecipeChanges, RecipeFilter,
};
use tastetrail_core::store::memory::MemoryStore;
use tastetrail_core::store::postgres::PgStore;
use tastetrail_core::store::{Store, StoreError};
use tastetrail_core::uuid::uuidv7;

async fn pg_store() -> Option<Arc<dyn Store>> {
    let url = std::env::var("TEST_DATABASE_URL").ok()?;
    let pool = connect_durable(&url, &ModeOptions::default())
        .await
        .expect("connect to TEST_DATABASE_URL");
    Some(Arc::new(PgStore::new(pool)))
}

async fn stores() -> Vec<Arc<dyn Store>> {
    let mut stores: Vec<Arc<dyn Store>> = vec![Arc::new(MemoryStore::new())];
    if let Some(pg) = pg_store().await {
        stores.push(pg);
    }
    stores
}

fn unique(prefix: &str) -> String {
    format!("{prefix}-{}", uuidv7().simple())
}

fn new_user(email: &str) -> NewUser {
    NewUser {
        name: "Parity".into(),
        email: email.into(),
        password_hash: "not-a-real-hash".into(),
    }
}

fn new_recipe(title: &str, diet: Diet, prep_time: u32, owner: Option<String>) -> NewRecipe {
    NewRecipe {
        title: title.into(),
        description: format!("{title} description"),
        prep_time,
        cook_time: 5,
        diet,
        cuisines: vec!["fusion".into()],
        ingredients: vec![Ingredient {
            name: "Quinoa".into(),
            quantity: "1 cup".into(),
            category: IngredientCategory::Grains,
        }],
        steps: vec!["Cook".into()],
        images: vec![],
        rating: 4.5,
        owner,
    }
}

#[tokio::test]
async fn user_lifecycle_is_identical_across_backends() {
    for store in stores().await {
        let email = format!("{}@example.com", unique("user"));
        let user = store.create_user(new_user(&email)).await.unwrap();
        assert_eq!(user.email, email);
        assert!(!user.is_admin);
        assert_eq!(user.dietary_preferences, DietaryPreferences::default());

        let dup = store.create_user(new_user(&email)).await.unwrap_err();
        assert!(
            matches!(dup, StoreError::Conflict(_)),
            "{:?}: {dup}",
            store.mode()
        );

        let found = store.find_user_by_email(&email).await.unwrap().unwrap();
        assert_eq!(found.user.id, user.id);
        assert_eq!(found.password_hash, "not-a-real-hash");

        let updated = store
            .update_profile(
                &user.id,
                ProfileUpdate {
                    name: Some("Renamed".into()),
                    dietary_preferences: None,
                },
            )
            .await
            .unwrap()
            .unwrap();
        assert_eq!(updated.name, "Renamed");
        assert_eq!(updated.email, email);

        let json = serde_json::to_value(&updated).unwrap();
        let obj = json.as_object().unwrap();
        assert_eq!(obj.len(), 7, "{:?}", store.mode());
        assert!(!obj.contains_key("passwordHash"));

        assert!(store.get_user("not-an-id").await.unwrap().is_none());
    }
}

#[tokio::test]
async fn recipe_filtering_is_identical_across_backends() {
    for store in stores().await {
        let tag = unique("tag");
        for (title, diet, prep) in [("A", Diet::Vegan, 15), ("B", Diet::Vegan, 30), ("C", Diet::Keto, 10)] {
            store
                .create_recipe(new_recipe(&format!("{tag} {title}"), diet, prep, None))
                .await
                .unwrap();
        }

        let filter = RecipeFilter {
            q: Some(tag.to_uppercase()),
            diet: Some(Diet::Vegan),
            max_prep_time: Some(20),
            ..Default::default()
        };
        let titles: Vec<String> = store
            .list_recipes(&filter)
            .await
            .unwrap()
            .into_iter()
            .map(|r| r.title)
            .collect();
        assert_eq!(titles, vec![format!("{tag} A")], "{:?}", store.mode());

        let by_ingredient = RecipeFilter {
            q: Some(tag.clone()),
            ingredient: Some("quin".into()),
            ..Default::default()
        };
        assert_eq!(store.list_recipes(&by_ingredient).await.unwrap().len(), 3);
    }
}

#[tokio::test]
async fn id_and_case_matching_is_identical_across_backends() {
    for store in stores().await {
        let tag = unique("crème");
        let recipe = store
            .create_recipe(new_recipe(&format!("{tag} Brûlée"), Diet::None, 10, None))
            .await
            .unwrap();

        let upper = recipe.id.to_uppercase();
        let braced = format!("{{{}}}", recipe.id);
        for id in [upper, braced] {
            assert!(store.get_recipe(&id).await.unwrap().is_none(), "{:?} {id}", store.mode());
        }
        assert!(store.get_recipe(&recipe.id).await.unwrap().is_some());

        let count = |q: String| {
            let store = Arc::clone(&store);
            async move {
                let filter = RecipeFilter {
                    q: Some(q),
                    ..Default::default()
                };
                store.list_recipes(&filter).await.unwrap().len()
            }
        };
        assert_eq!(count(tag.replace("cr", "CR")).await, 1, "{:?}", store.mode());
        assert_eq!(count(tag.replace('è', "È")).await, 0, "{:?}", store.mode());
    }
}

#[tokio::test]
async fn recipe_crud_is_identical_across_backends() {
    for store in stores().await {
        let email = format!("{}@example.com", unique("owner"));
        let owner = store.create_user(new_user(&email)).await.unwrap();
        let created = store
            .create_recipe(new_recipe(&unique("crud"), Diet::Paleo, 12, Some(owner.id.clone())))
            .await
            .unwrap();
        assert_eq!(created.owner.as_deref(), Some(owner.id.as_str()));
        assert_eq!(created.ingredients.len(), 1);

        let updated = store
            .update_recipe(
                &created.id,
                RecipeChanges {
                    title: Some("Renamed".into()),
                    ..Default::default()
                },
            )
            .await
            .unwrap()
            .unwrap();
        assert_eq!(updated.title, "Renamed");
        assert_eq!(updated.prep_time, 12);
        assert_eq!(updated.diet, Diet::Paleo);

        let with_owners = store.list_recipes_with_owners().await.unwrap();
        let mine = with_owners
            .iter()
            .find(|r| r.recipe.id == created.id)
            .unwrap();
        assert_eq!(
            mine.owner_details.as_ref().map(|o| o.email.as_str()),
            Some(email.as_str())
        );

        let deleted = store.delete_recipe(&created.id).await.unwrap().unwrap();
        assert_eq!(deleted.id, created.id);
        assert!(store.get_recipe(&created.id).await.unwrap().is_none());
        assert!(store.delete_recipe("not-an-id").await.unwrap().is_none());
    }
}

#[tokio::test]
async fn admin_flag_is_set_out_of_band() {
    for store in stores().await {
        let email = format!("{}@example.com", unique("admin"));
        store.create_user(new_user(&email)).await.unwrap();
        let admin = store.set_admin(&email, true).await.unwrap().unwrap();
        assert!(admin.is_admin);
        let demoted = store.set_admin(&email, false).await.unwrap().unwrap();
        assert!(!demoted.is_admin);
    }
}

#[tokio::test]
async fn memory_store_reports_ephemeral_mode() {
    assert_eq!(MemoryStore::new().mode(), StorageMode::Ephemeral);
}
