mod models;
mod requests;

pub use models::*;
pub use requests::*;
