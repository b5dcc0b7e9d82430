pub mod dtos;
pub mod handlers;
pub mod models;
pub mod resume;
pub mod routes;
pub mod services;

pub use routes::routes;
pub use services::StudentService;
