pub mod http;
pub mod noop_ports;
pub mod registry;
