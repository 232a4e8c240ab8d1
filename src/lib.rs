// Export modules for use in tests and the binary
pub mod backend;
pub mod container;
pub mod debounce;
pub mod error;
pub mod events;
pub mod fetch;
pub mod gesture;
pub mod keyboard;
pub mod location;
pub mod navigation;
pub mod panic_handler;
pub mod progress;
pub mod script;
pub mod settings;
pub mod state;
pub mod status;
pub mod surface;
pub mod theme;
pub mod viewer;
pub mod zoom;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

// Re-export the viewer surface
pub use error::{Result, ViewerError};
pub use events::{ListenerId, ViewerEvent};
pub use fetch::FetchResponse;
pub use viewer::{Destination, Viewer};
