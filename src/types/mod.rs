mod errors;
mod price;

pub use errors::PriceError;
pub use price::Price;

pub type GroupLabel = String;
pub type SenderId = String;
