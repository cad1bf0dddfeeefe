pub mod basemap;
pub mod bundle;
pub mod dataset;
pub mod error;
pub mod geojson;
pub mod regions;
pub mod theme;

pub use basemap::*;
pub use bundle::*;
pub use dataset::*;
pub use error::AssetError;
pub use regions::*;
pub use theme::*;
