pub mod jwt;
pub mod resolver;
pub mod reviews;

pub use jwt::JwtService;
