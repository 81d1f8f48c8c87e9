pub mod assistant;
pub mod auth;
pub mod backings;
pub mod campaigns;
pub mod error;
pub mod freelancer;
pub mod middleware;
pub mod updates;
