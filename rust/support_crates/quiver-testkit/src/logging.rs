/// Routes `log` output through `env_logger` in test mode.
///
/// Safe to call from every test; only the first call installs the logger.
/// The level is controlled by `RUST_LOG` as usual.
pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}
