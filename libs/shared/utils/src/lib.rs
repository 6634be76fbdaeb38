pub mod extractor;
pub mod jwt;
pub mod password;
pub mod state;
pub mod test_utils;
pub mod users;

pub use state::AppState;
