use crate::events::AppEvent;
use crate::source::{RowSource, SourceError};
use async_channel::{Receiver, Sender};
use std::sync::Arc;
use std::thread;
use tokio::runtime::Runtime;

/// Services fetch requests off the render thread. Each `()` received on
/// `requests` triggers one `source.fetch()`; the outcome comes back as
/// [`AppEvent::Fetched`].
pub fn start_background_services(
    source: Arc<dyn RowSource>,
    requests: Receiver<()>,
    tx: Sender<AppEvent>,
) -> std::io::Result<thread::JoinHandle<()>> {
    let rt = Runtime::new()?;

    thread::Builder::new()
        .name("sorcle-fetch".to_string())
        .spawn(move || {
            rt.block_on(async {
                while requests.recv().await.is_ok() {
                    let source = source.clone();
                    let result = tokio::task::spawn_blocking(move || source.fetch())
                        .await
                        .unwrap_or_else(|e| Err(SourceError::from(e)));

                    if tx.send(AppEvent::Fetched(result)).await.is_err() {
                        break;
                    }
                }
                log::debug!("Fetch service stopped");
            });
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::Table;

    struct Fixed;

    impl RowSource for Fixed {
        fn fetch(&self) -> Result<Table, SourceError> {
            Ok(Table::from_column(&["Cat"]))
        }
    }

    #[test]
    fn test_fetch_round_trip_through_service() {
        let (req_tx, req_rx) = async_channel::bounded(1);
        let (tx, rx) = async_channel::bounded(4);
        let handle = start_background_services(Arc::new(Fixed), req_rx, tx).unwrap();

        req_tx.send_blocking(()).unwrap();
        let AppEvent::Fetched(result) = rx.recv_blocking().unwrap();
        assert_eq!(result.unwrap(), Table::from_column(&["Cat"]));

        drop(req_tx);
        handle.join().unwrap();
    }

    struct Panicking;

    impl RowSource for Panicking {
        fn fetch(&self) -> Result<Table, SourceError> {
            panic!("export reader crashed");
        }
    }

    #[test]
    fn test_panicking_fetch_still_replies() {
        let (req_tx, req_rx) = async_channel::bounded(1);
        let (tx, rx) = async_channel::bounded(4);
        let handle = start_background_services(Arc::new(Panicking), req_rx, tx).unwrap();

        req_tx.send_blocking(()).unwrap();
        let AppEvent::Fetched(result) = rx.recv_blocking().unwrap();
        assert!(matches!(result, Err(SourceError::Task(_))));

        // the service keeps answering later requests
        req_tx.send_blocking(()).unwrap();
        let AppEvent::Fetched(result) = rx.recv_blocking().unwrap();
        assert!(result.is_err());

        drop(req_tx);
        handle.join().unwrap();
    }
}
