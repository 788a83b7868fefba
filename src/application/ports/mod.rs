pub mod block_inserter;
pub mod block_registry;
pub mod script_host;
pub mod transport;
