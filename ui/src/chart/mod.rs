//! Control chart rendering: frame preparation, layered drawing and
//! compositing onto a single raster surface.

pub mod canvas;
pub mod frame;
pub mod palette;
pub mod renderer;

pub use frame::ChartFrame;
pub use renderer::{encode_png, png_data_url, ChartRenderer};

use thiserror::Error;

use crate::core::limits::LimitError;

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("unable to allocate a {width}x{height} surface")]
    Surface { width: u32, height: u32 },
    #[error("chart layer could not be built: {0}")]
    Layer(#[from] usvg::Error),
    #[error("PNG encoding failed: {0}")]
    Encode(#[from] png::EncodingError),
    #[error(transparent)]
    Limits(#[from] LimitError),
}
