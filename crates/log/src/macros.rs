//! Convenience macros

/// Time a block of code through a [`Logger`](crate::Logger).
///
/// Evaluates to the block's value; the elapsed time is written as an info
/// event once the block completes.
///
/// ```no_run
/// # let logger = strata_log::resolve_preset("development").unwrap();
/// let rows = strata_log::timed!(logger, "load rows", { vec![1, 2, 3] });
/// ```
#[macro_export]
macro_rules! timed {
    ($logger:expr, $name:expr, $body:expr) => {{
        let timer = $logger.timer($name);
        let value = $body;
        timer.finish();
        value
    }};
}
