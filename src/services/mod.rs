pub mod auth_service;
pub mod price_series;
pub mod price_service;
pub mod product_service;
