//! Entity module - Contains all SeaORM entity definitions for the database.
//! These entities represent the database tables and their relationships.
//! Each entity has a Model struct for data and an Entity struct for operations.

pub mod game;
pub mod game_autocomplete;
pub mod owned_game;
pub mod user;

// Re-export specific types to avoid conflicts
pub use game::{Column as GameColumn, Entity as Game, Model as GameModel};
pub use game_autocomplete::{
    Column as GameAutocompleteColumn, Entity as GameAutocomplete, Model as GameAutocompleteModel,
};
pub use owned_game::{Column as OwnedGameColumn, Entity as OwnedGame, Model as OwnedGameModel};
pub use user::{Column as UserColumn, Entity as User, Model as UserModel};
