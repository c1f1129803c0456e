mod categories;
pub mod dto;
mod items;
pub mod response;
mod router;
pub mod validation;

pub use router::{AppState, create_router};
