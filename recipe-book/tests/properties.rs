//! Property tests for the reducers.

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)] // Test code can use unwrap/expect/panic

use proptest::prelude::*;
use recipe_book::auth::{AuthAction, AuthReducer, AuthState, UserSession};
use recipe_book::mocks::{InMemorySessionStorage, MockIdentityProvider};
use recipe_book::recipes::{RecipesAction, RecipesReducer};
use recipe_book::shopping_list::{ShoppingList, ShoppingListAction, ShoppingListReducer};
use recipe_book::{AppEnvironment, Ingredient, Recipe};
use recipebook_core::reducer::Reducer;
use recipebook_testing::mocks::test_epoch;
use recipebook_testing::{FixedClock, test_clock};
use std::sync::Arc;

type Env = AppEnvironment<MockIdentityProvider, InMemorySessionStorage, FixedClock>;

fn env() -> Env {
    AppEnvironment::new(
        MockIdentityProvider::new(),
        InMemorySessionStorage::new(),
        test_clock(),
    )
}

fn arb_session() -> impl Strategy<Value = UserSession> {
    ("[a-z]{1,8}", 1i64..100_000).prop_map(|(name, secs)| UserSession {
        identity: format!("{name}@example.com"),
        token: format!("token-{name}"),
        token_expires_at: test_epoch() + chrono::Duration::seconds(secs),
    })
}

fn arb_auth_action() -> impl Strategy<Value = AuthAction> {
    prop_oneof![
        ("[a-z]{1,8}", "[a-z]{0,8}")
            .prop_map(|(identity, secret)| AuthAction::LoginStart { identity, secret }),
        ("[a-z]{1,8}", "[a-z]{0,8}")
            .prop_map(|(identity, secret)| AuthAction::SignupStart { identity, secret }),
        arb_session().prop_map(|session| AuthAction::LoginSuccess { session }),
        arb_session().prop_map(|session| AuthAction::SignupSuccess { session }),
        arb_session().prop_map(|session| AuthAction::AutoLogin { session }),
        "[A-Za-z ]{1,20}".prop_map(|message| AuthAction::LoginFail { message }),
        "[A-Za-z ]{1,20}".prop_map(|message| AuthAction::SignupFail { message }),
        Just(AuthAction::Logout),
        Just(AuthAction::AutoLogout),
        Just(AuthAction::ClearError),
        Just(AuthAction::RestoreSession),
    ]
}

fn arb_ingredient() -> impl Strategy<Value = Ingredient> {
    ("[a-z]{1,6}", 0.1f64..100.0).prop_map(|(name, amount)| Ingredient::new(name, amount))
}

#[derive(Debug, Clone)]
enum RecipeOp {
    Add(String),
    Update(usize, String),
    Delete(usize),
}

fn arb_recipe_op() -> impl Strategy<Value = RecipeOp> {
    prop_oneof![
        "[A-Z][a-z]{0,6}".prop_map(RecipeOp::Add),
        (0usize..6, "[A-Z][a-z]{0,6}").prop_map(|(i, name)| RecipeOp::Update(i, name)),
        (0usize..6).prop_map(RecipeOp::Delete),
    ]
}

fn named(name: &str) -> Recipe {
    Recipe::new(name, "", "", vec![])
}

proptest! {
    /// Loading and an error are never visible at the same time, and
    /// transitions with nothing to do keep the same slice.
    #[test]
    fn auth_state_stays_consistent(actions in prop::collection::vec(arb_auth_action(), 0..40)) {
        let reducer = AuthReducer::<MockIdentityProvider, InMemorySessionStorage, FixedClock>::new();
        let env = env();
        let mut state = Arc::new(AuthState::default());

        for action in actions {
            let before = Arc::clone(&state);
            let expect_login = matches!(
                action,
                AuthAction::LoginSuccess { .. } | AuthAction::SignupSuccess { .. } | AuthAction::AutoLogin { .. }
            );
            let expect_same = match action {
                AuthAction::RestoreSession => true,
                AuthAction::ClearError => before.auth_error.is_none(),
                AuthAction::Logout | AuthAction::AutoLogout => *before == AuthState::default(),
                _ => false,
            };
            let _ = reducer.reduce(&mut state, action, &env);

            prop_assert!(state.is_consistent(), "inconsistent: {:?}", state);
            if expect_login {
                prop_assert!(state.is_authenticated());
                prop_assert!(state.auth_error.is_none());
            }
            if expect_same {
                prop_assert!(Arc::ptr_eq(&before, &state));
            }
        }
    }

    /// A bulk add is the concatenation of the prior list and the batch,
    /// committed as a single replacement.
    #[test]
    fn add_many_is_concatenation(
        prior in prop::collection::vec(arb_ingredient(), 0..10),
        batch in prop::collection::vec(arb_ingredient(), 0..10),
    ) {
        let mut state = Arc::new(ShoppingList::new(prior.clone()));
        let before = Arc::clone(&state);

        let _ = ShoppingListReducer.reduce(
            &mut state,
            ShoppingListAction::AddIngredients { ingredients: batch.clone() },
            &(),
        );

        let expected: Vec<Ingredient> = prior.into_iter().chain(batch).collect();
        prop_assert_eq!(state.items(), expected.as_slice());
        prop_assert!(!Arc::ptr_eq(&before, &state));
    }

    /// Index-addressed edits behave like the same edits on a plain vector,
    /// and rejected edits leave the collection untouched.
    #[test]
    fn recipe_edits_match_a_vector_model(ops in prop::collection::vec(arb_recipe_op(), 0..30)) {
        let mut state: Arc<Vec<Recipe>> = Arc::default();
        let mut model: Vec<String> = Vec::new();

        for op in ops {
            let before = Arc::clone(&state);
            let in_range = match &op {
                RecipeOp::Add(_) => true,
                RecipeOp::Update(i, _) | RecipeOp::Delete(i) => *i < model.len(),
            };
            let action = match op {
                RecipeOp::Add(name) => {
                    model.push(name.clone());
                    RecipesAction::Add { recipe: named(&name) }
                },
                RecipeOp::Update(index, name) => {
                    if in_range {
                        model[index].clone_from(&name);
                    }
                    RecipesAction::Update { index, recipe: named(&name) }
                },
                RecipeOp::Delete(index) => {
                    if in_range {
                        model.remove(index);
                    }
                    RecipesAction::Delete { index }
                },
            };

            let _ = RecipesReducer.reduce(&mut state, action, &());

            let names: Vec<String> = state.iter().map(|r| r.name.clone()).collect();
            prop_assert_eq!(&names, &model);
            prop_assert_eq!(Arc::ptr_eq(&before, &state), !in_range);
        }
    }
}
