//! Shopping list: ingredient aggregation with bulk append.

pub mod list;
pub mod reducer;
pub mod service;

pub use list::ShoppingList;
pub use reducer::{ShoppingListAction, ShoppingListReducer};
pub use service::ShoppingListService;
