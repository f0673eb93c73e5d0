pub mod config;
pub mod event;
pub mod event_bus;
pub mod feature_record;
pub mod feature_registry;
pub mod gate;
