pub mod coords;
pub mod error;
pub mod exif_reader;
pub mod geocode;
pub mod map;
pub mod model;
pub mod scan;
pub mod table;

pub use error::{PoseError, Result};
pub use geocode::{LabelStyle, LocationNameMap};
pub use map::{MapWriter, TileLayer};
pub use model::{ImageRecord, ScanFailure, ScanReport};
pub use table::PoseTable;
