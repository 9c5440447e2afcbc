pub mod configuration;
pub mod registry;
pub mod request;

pub use configuration::{CachedHeader, Configuration, ConfigurationBuilder, HeaderCache};
pub use registry::Registry;
pub use request::RequestConfig;
