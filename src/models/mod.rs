pub mod bulk;
pub mod card;
pub mod deck;

pub use bulk::*;
pub use card::*;
pub use deck::*;
