//! Command implementations.

pub mod profile;
pub mod run;

pub use self::profile::execute_profile;
pub use self::run::execute_run;
