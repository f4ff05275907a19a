pub mod handlers;
pub mod model;

pub use handlers::load_template;
