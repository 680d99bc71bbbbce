pub mod arguments;
pub mod classpath;
pub mod defaults;

pub use arguments::{expand_placeholders, ArgumentsBuilder};
pub use classpath::{compare_versions, ClasspathBuilder};
