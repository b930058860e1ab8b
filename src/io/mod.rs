pub mod config_io;
pub mod logging;
pub mod state;
pub mod store;
