//! HTTP dispatch: the transport port and the request dispatcher

pub mod dispatcher;
pub mod ports;

pub use dispatcher::{build_request, classify, join_url, Dispatcher};
pub use ports::Transport;
