pub mod analyzer;
pub mod channel;
pub mod loader;
pub mod roi;

pub use analyzer::{Bias, ImagePairStatistics, ImageStatistics};
pub use channel::{BayerPattern, Channel, CHANNELS};
pub use loader::factory::{image_from, simulated_dark_from};
pub use loader::{ImageLoader, ImageMetadata, PlaneStats};
pub use roi::{NormRoi, Point, Roi};
