//! Cover image generation.

mod http;
mod types;

pub use http::{HttpImageGenerator, ImageGeneratorConfig};
pub use types::{ImageError, ImageGenerator, ImageRef, ImageRequest};
