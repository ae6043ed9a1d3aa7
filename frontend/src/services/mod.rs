pub mod api;
pub mod logging;

pub use api::ApiClient;
pub use logging::Logger;
