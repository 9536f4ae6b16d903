pub mod drive;
pub mod error;
pub mod sheet;

pub use drive::DriveClient;
pub use error::{DriveError, ExportError};
pub use sheet::write_category_csv;
