//! Domain models returned by the repository layer and serialized by routes.

pub mod item;
pub mod review;
pub mod user;

pub use item::{Item, ItemWithReviews};
pub use review::{Review, ReviewView};
pub use user::User;
