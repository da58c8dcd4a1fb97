pub mod handlers;
pub mod html;
pub mod memorized;
pub mod middleware;
pub mod popular;
pub mod routes;
pub mod search;

pub use routes::create_router;
