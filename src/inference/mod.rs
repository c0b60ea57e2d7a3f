//! Module hierarchy inference
//!
//! Derives modules and submodules from the heading outline of the crawled
//! pages, falling back to URL structure when headings are too sparse.

mod clean;
mod model;
mod strategies;

pub use clean::{clean_heading, MIN_NAME_CHARS};
pub use model::{ModuleMap, ModuleNode, SubmoduleNode};
pub use strategies::{
    infer_modules, modules_from_h1, modules_from_h2, modules_from_url_paths, try_strategies,
    Strategy, DEFAULT_STRATEGIES,
};
