//! Publishing target abstraction.

mod http;
mod traits;
mod types;

pub use http::{HttpPublisher, PublisherConfig};
pub use traits::Publisher;
pub use types::{MediaHandle, PublishError, PublishRequest, PublishResult};
