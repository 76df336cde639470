pub mod api;
pub mod core;

pub fn init_logging() {
    // idempotent: later calls keep the first logger
    let _ = env_logger::Builder::from_default_env().try_init();
}
