mod webex_transport;

pub use webex_transport::WebexTransport;
