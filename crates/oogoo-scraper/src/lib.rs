pub mod detail;
pub mod driver;
pub mod error;
pub mod extract;
pub mod normalize;
pub mod selectors;
pub mod walker;

pub use detail::{DetailFields, DetailResolver};
pub use driver::chrome::HeadlessChrome;
pub use error::ScrapeError;
pub use normalize::publish_timestamp;
pub use walker::ListingWalker;
