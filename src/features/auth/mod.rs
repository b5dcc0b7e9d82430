pub mod dtos;
pub mod guards;
pub mod handlers;
pub mod model;
pub mod models;
pub mod routes;
pub mod services;

pub use guards::{RequireAdmin, RequireRecruiter, RequireStaff, RequireStudent};
pub use model::{AuthenticatedUser, UserRole};
pub use services::{AuthService, TokenService};
