// Module layout (Clean Architecture style)
// - bootstrap: configuration and pipeline wiring
// - infrastructure: HTTP transport and registry adapters
// - application: capability ports, pipeline services, use cases
// - domain: catalog records and the install lifecycle

pub mod application;
pub mod bootstrap;
pub mod domain;
pub mod infrastructure;
