//! Command implementations.

pub mod check;
pub mod init;
pub mod run;

pub use self::check::execute_check;
pub use self::init::execute_init;
pub use self::run::execute_run;
