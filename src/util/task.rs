use futures::FutureExt;
use std::panic::AssertUnwindSafe;

/// Run a future, converting a panic into an `Err` carrying the panic message.
///
/// Spawned tasks that report back over a channel use this so a panic still
/// produces a message instead of silently dropping the sender.
///
/// ```
/// use riffle::util::catch_task_panic;
///
/// let value = futures::executor::block_on(catch_task_panic(async { 7 }));
/// assert_eq!(value, Ok(7));
/// ```
pub async fn catch_task_panic<F, T>(future: F) -> Result<T, String>
where
    F: std::future::Future<Output = T>,
{
    AssertUnwindSafe(future).catch_unwind().await.map_err(|panic| {
        if let Some(s) = panic.downcast_ref::<&'static str>() {
            s.to_string()
        } else if let Some(s) = panic.downcast_ref::<String>() {
            s.clone()
        } else {
            "task panicked with a non-string payload".to_string()
        }
    })
}
