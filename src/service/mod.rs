//! Tower Service implementations

pub mod core;
pub mod request;
pub mod response;
pub mod stream;

pub use core::A2AProtocolService;
pub use request::{A2ARequest, RequestContext};
pub use response::{A2AResponse, EventStream};
pub use stream::TaskTracker;
