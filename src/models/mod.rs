mod price_point;
mod product;
mod user;

pub use price_point::{LatestPrice, NewObservation, PricePoint, RawPrice, RawPriceRecord};
pub use product::{CreateProduct, Product, ProductView, UpdateProduct};
pub use user::{LoginRequest, SessionRecord, SessionResponse, SignupRequest, User, UserRecord};
