mod headers;

pub use headers::{header_binary, header_nominal};
