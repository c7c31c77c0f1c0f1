//! Application use cases. Orchestrate domain logic via ports.

pub mod extract;
pub mod paginate;
pub mod pipeline;
pub mod resolve;
pub mod titles;

pub use paginate::Paginator;
pub use pipeline::{PipelineService, sanitize_title};
pub use resolve::VideoResolver;
pub use titles::TitleResolver;
