pub mod controllers;
pub mod models;
pub mod repositories;

pub use models::ClientProfile;
pub use repositories::ClientRepository;
