pub mod events;
pub mod host;
pub mod platform_api;
pub mod types;

pub use events::*;
pub use host::*;
pub use platform_api::*;
pub use types::*;
