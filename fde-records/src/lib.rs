pub mod location;
pub mod metrics;
pub mod raw;
pub mod record;
