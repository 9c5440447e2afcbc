pub mod directives;
pub mod policy;
pub mod setting;
pub mod source;

pub use directives::*;
pub use policy::{CspPolicy, CspPolicyBuilder};
pub use setting::Setting;
pub use source::{HashAlgorithm, Source};
