//! Top-level fault boundary.
//!
//! Faults are treated asymmetrically:
//!
//! * a panic on the **main thread** is an uncaught fault: it is logged and
//!   the process exits with status 1;
//! * a panic inside a task started with [`spawn_guarded`] is an unhandled
//!   async fault: it is logged and the program keeps running.

use std::any::Any;
use std::future::Future;

use tokio::task::JoinHandle;

/// Install the process-wide panic hook.  Call once, early in `main`.
pub fn install_panic_hook() {
    std::panic::set_hook(Box::new(|info| {
        if std::thread::current().name() == Some("main") {
            tracing::error!("❌ Uncaught exception: {info}");
            std::process::exit(1);
        }
        // Worker panics are reported by the task watcher in `spawn_guarded`.
        tracing::debug!("panic on worker thread: {info}");
    }));
}

/// Spawn `fut` and log, without propagating, a panic that escapes it.
///
/// The returned handle resolves once the task has finished and any fault
/// has been logged.
pub fn spawn_guarded<F>(label: &'static str, fut: F) -> JoinHandle<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let task = tokio::spawn(fut);
    tokio::spawn(async move {
        match task.await {
            Ok(()) => {}
            Err(e) if e.is_panic() => {
                let payload = e.into_panic();
                tracing::error!("❌ Unhandled error in {label}: {}", panic_message(payload.as_ref()));
            }
            Err(_) => tracing::debug!("{label} cancelled"),
        }
    })
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s
    } else {
        "unknown panic"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn panicking_task_does_not_take_the_runtime_down() {
        spawn_guarded("exploding task", async {
            panic!("boom");
        })
        .await
        .unwrap();

        let (tx, rx) = tokio::sync::oneshot::channel();
        spawn_guarded("next task", async move {
            let _ = tx.send(7);
        });
        assert_eq!(rx.await.unwrap(), 7);
    }

    #[test]
    fn extracts_panic_messages() {
        let static_msg: Box<dyn Any + Send> = Box::new("static");
        let owned_msg: Box<dyn Any + Send> = Box::new(String::from("owned"));
        let other: Box<dyn Any + Send> = Box::new(42_u8);

        assert_eq!(panic_message(static_msg.as_ref()), "static");
        assert_eq!(panic_message(owned_msg.as_ref()), "owned");
        assert_eq!(panic_message(other.as_ref()), "unknown panic");
    }
}
