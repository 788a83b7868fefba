pub mod transport_reqwest;
