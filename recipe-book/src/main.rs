//! Recipe book demo binary
//!
//! Walks through a session against the in-memory identity provider: a
//! failed login with its alert, a successful login, recipe and shopping
//! list edits, and logout.

use anyhow::Context;
use recipe_book::auth::AuthService;
use recipe_book::mocks::MockIdentityProvider;
use recipe_book::overlay::{self, AlertNode, AlertOverlay, OverlaySlot};
use recipe_book::providers::AuthMode;
use recipe_book::recipes::RecipeService;
use recipe_book::shopping_list::ShoppingListService;
use recipe_book::storage::JsonFileSessionStorage;
use recipe_book::{AppConfig, AppEnvironment, AppState, Ingredient, Recipe, build_store};
use recipebook_core::environment::SystemClock;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

const DEMO_IDENTITY: &str = "cook@example.com";
const DEMO_SECRET: &str = "hunter22";

/// Prints alerts to stdout and remembers the mounted one.
#[derive(Default)]
struct ConsoleSlot {
    mounted: Mutex<Option<AlertNode>>,
}

impl ConsoleSlot {
    fn dismiss(&self) {
        let close = self
            .mounted
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .as_ref()
            .map(|alert| alert.close.clone());
        if let Some(close) = close {
            println!("    [alert] user clicked close");
            close.fire();
        }
    }
}

impl OverlaySlot for ConsoleSlot {
    fn clear(&self) {
        if self.mounted.lock().unwrap_or_else(PoisonError::into_inner).take().is_some() {
            println!("    [alert] removed");
        }
    }

    fn mount(&self, alert: AlertNode) {
        println!("    [alert #{}] {}", alert.id, alert.message);
        *self.mounted.lock().unwrap_or_else(PoisonError::into_inner) = Some(alert);
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = AppConfig::from_env();
    config.validate().context("invalid configuration")?;

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_new(&config.log_filter)
                .unwrap_or_else(|_| recipe_book::config::DEFAULT_LOG_FILTER.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    recipebook_runtime::metrics::register_metrics();
    overlay::register_metrics();

    println!("=== Recipe Book ===\n");

    let env = AppEnvironment::new(
        MockIdentityProvider::new()
            .with_account(DEMO_IDENTITY, DEMO_SECRET)
            .with_lifetime(config.demo_token_lifetime_secs),
        JsonFileSessionStorage::new(&config.session_file),
        SystemClock,
    );
    let initial = if config.seed_data {
        AppState::seeded()
    } else {
        AppState::default()
    };
    let store = build_store(initial, env, config.action_broadcast_capacity);

    let auth = AuthService::new(store.clone());
    let recipes = RecipeService::new(store.clone());
    let shopping_list = ShoppingListService::new(store.clone());

    let slot = Arc::new(ConsoleSlot::default());
    let alerts = AlertOverlay::spawn(store.clone(), Arc::clone(&slot)).await;

    println!(">>> Restoring session from {}", config.session_file.display());
    auth.restore_session().await.wait().await;
    let state = auth.state().await;
    println!("Signed in: {}", state.is_authenticated());

    if !state.is_authenticated() {
        println!("\n>>> Logging in with the wrong password");
        let outcome = auth
            .authenticate(AuthMode::Login, DEMO_IDENTITY, "wrong", Duration::from_secs(5))
            .await?;
        println!("Outcome: {outcome:?}");
        tokio::time::sleep(Duration::from_millis(20)).await;
        slot.dismiss();
        tokio::time::sleep(Duration::from_millis(20)).await;

        println!("\n>>> Logging in with the right password");
        let outcome = auth
            .authenticate(AuthMode::Login, DEMO_IDENTITY, DEMO_SECRET, Duration::from_secs(5))
            .await?;
        println!("Outcome: {outcome:?}");
    }
    println!("Phase: {:?}", auth.state().await.phase());

    println!("\n>>> Adding a recipe");
    let _ = recipes
        .add(Recipe::new(
            "Pancakes",
            "Fluffy breakfast pancakes",
            "https://example.com/pancakes.jpg",
            vec![Ingredient::new("Flour", 2.0), Ingredient::new("Eggs", 3.0)],
        ))
        .await;
    for (index, recipe) in recipes.get_all().await.iter().enumerate() {
        println!("  {index}: {} ({} ingredients)", recipe.name, recipe.ingredients.len());
    }

    println!("\n>>> Deleting recipe 99");
    if let Err(error) = recipes.delete(99).await {
        println!("Rejected: {error}");
    }

    println!("\n>>> Sending every recipe's ingredients to the shopping list");
    let count = recipes.get_all().await.len();
    for index in 0..count {
        recipes.add_ingredients_to_shopping_list(index).await?;
    }
    shopping_list.add_one(Ingredient::new("Salt", 1.0)).await?;

    let list = shopping_list.get_all().await;
    println!("Shopping list has {} entries; totals:", list.len());
    for item in list.totals() {
        println!("  {} x {}", item.name, item.amount);
    }

    println!("\n>>> Logging out");
    auth.logout().await.wait().await;
    println!("Signed in: {}", auth.state().await.is_authenticated());

    alerts.shutdown().await;
    println!("\n=== Done ===");
    Ok(())
}
