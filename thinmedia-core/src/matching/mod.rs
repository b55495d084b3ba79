pub mod fuzzy;
pub mod resolver;

pub use fuzzy::{ratio, ratio_ignore_case};
pub use resolver::{DEFAULT_MIN_MATCH, TitleResolver, first_acceptable};
