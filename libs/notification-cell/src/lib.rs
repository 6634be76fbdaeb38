pub mod handlers;
pub mod router;
pub mod session;

pub use router::notification_routes;
pub use session::serve_connection;
