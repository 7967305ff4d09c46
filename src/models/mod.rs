mod edge;
mod position;
mod token;

pub use edge::PriceEdge;
pub use position::{LockedSource, Position};
pub use token::{PricedToken, Token};
