pub mod ttl;
pub mod sweeper;
