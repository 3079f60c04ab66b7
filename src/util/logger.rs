//! Logging setup.
//!
//! Everything the runtime has to say goes through the `log` facade, so a
//! host that has already registered a backend sees allocation and
//! collection records with no further wiring.  For hosts that have not,
//! the default `builtin_env_logger` cargo feature installs `env_logger`
//! the first time a collector is constructed, reading the usual `RUST_LOG`
//! variable and showing the info level when it is unset.  Disable the
//! feature to keep `env_logger` out of the dependency tree entirely.

/// Install the built-in `env_logger` unless a logger is already registered.
#[cfg(feature = "builtin_env_logger")]
pub(crate) fn try_init() {
    use env_logger::{Builder, Env};

    // Losing the race against a host-registered logger is fine; theirs
    // stays in place and this call is a no-op.
    let env = Env::default().default_filter_or("info");
    if Builder::from_env(env).try_init().is_ok() {
        debug!("installed the built-in env_logger");
    }
}

#[cfg(not(feature = "builtin_env_logger"))]
pub(crate) fn try_init() {}
