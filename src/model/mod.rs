pub mod activity;
pub mod config;
pub mod form;
pub mod medication;
pub mod record;
pub mod user;

pub use activity::*;
pub use config::*;
pub use form::*;
pub use medication::*;
pub use record::*;
pub use user::*;
