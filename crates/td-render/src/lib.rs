pub mod canvas;
pub mod present;
mod raster;

pub use canvas::{Canvas, to_point, to_rect};
pub use present::{PngExport, Present, PresentError};
