mod boot;
mod probe;
mod status;

pub use boot::run_boot;
pub use probe::run_probe;
pub use status::run_status;
