use thiserror::Error;

use crate::driver::DriverError;

/// Attempt-scoped failures inside a listing walk. These drive the walker's
/// retry loop and never escape [`crate::ListingWalker::walk`].
#[derive(Debug, Error)]
pub enum ScrapeError {
    #[error(transparent)]
    Driver(#[from] DriverError),

    #[error("no listing cards found on {url} with any known container selector")]
    NoListingCards { url: String },
}
