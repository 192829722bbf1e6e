pub mod json;
pub mod latex;

pub use json::{JsonConfig, JsonFormatter, convert_to_json};
pub use latex::{LatexConfig, LatexFormatter, convert_to_latex};
