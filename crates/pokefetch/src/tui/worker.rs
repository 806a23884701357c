//! Background lookup worker thread

use crate::controller::LookupId;
use pokefetch_api::{DataSource, LookupError, LookupResult};
use std::sync::Arc;
use std::sync::mpsc::{self, Receiver, Sender};
use std::thread::{self, JoinHandle};

/// Lookup sent to the worker thread
#[derive(Debug, Clone)]
pub struct LookupRequest {
    pub id: LookupId,
    pub query: String,
    /// Download the image slots after a successful lookup
    pub with_sprites: bool,
}

/// Messages from the worker thread
#[derive(Debug)]
pub enum WorkerEvent {
    /// Exactly one per request
    Completed {
        id: LookupId,
        outcome: Result<LookupResult, LookupError>,
    },
    /// Image bytes for one slot of a completed lookup
    Sprite {
        id: LookupId,
        slot: usize,
        bytes: Vec<u8>,
    },
}

/// Images to download for one completed lookup
struct SpriteJob {
    id: LookupId,
    urls: Vec<(usize, String)>,
}

/// Spawn the lookup worker thread. It exits when the request channel closes.
///
/// Sprite downloads run on a second thread so a slow image never holds up
/// the next lookup.
pub fn spawn_worker(
    source: Arc<dyn DataSource>,
    request_rx: Receiver<LookupRequest>,
    event_tx: Sender<WorkerEvent>,
) -> JoinHandle<()> {
    thread::spawn(move || {
        let (job_tx, job_rx) = mpsc::channel::<SpriteJob>();
        let sprites = {
            let source = source.clone();
            let event_tx = event_tx.clone();
            thread::spawn(move || sprite_loop(source.as_ref(), job_rx, &event_tx))
        };

        while let Ok(request) = request_rx.recv() {
            let guard = CompletionGuard::new(request.id, &event_tx);
            let outcome = source.lookup(&request.query);

            let urls: Vec<(usize, String)> = match &outcome {
                Ok(result) if request.with_sprites => result
                    .sprites
                    .slots()
                    .into_iter()
                    .enumerate()
                    .filter_map(|(slot, (_, url))| url.map(|u| (slot, u.to_string())))
                    .collect(),
                _ => Vec::new(),
            };

            guard.complete(outcome);
            if !urls.is_empty() {
                let _ = job_tx.send(SpriteJob {
                    id: request.id,
                    urls,
                });
            }
        }

        drop(job_tx);
        let _ = sprites.join();
    })
}

/// Download image slots for completed lookups. A failed slot stays empty.
/// When a newer job is queued the rest of the current one is abandoned.
fn sprite_loop(
    source: &dyn DataSource,
    job_rx: Receiver<SpriteJob>,
    event_tx: &Sender<WorkerEvent>,
) {
    let mut pending: Option<SpriteJob> = None;

    loop {
        let job = match pending.take() {
            Some(job) => job,
            None => match job_rx.recv() {
                Ok(job) => job,
                Err(_) => return,
            },
        };

        for (slot, url) in job.urls {
            pending = job_rx.try_iter().last();
            if pending.is_some() {
                log::debug!("Skipping remaining sprites of lookup {}", job.id);
                break;
            }

            match source.fetch_sprite(&url) {
                Ok(bytes) => {
                    let event = WorkerEvent::Sprite {
                        id: job.id,
                        slot,
                        bytes,
                    };
                    if event_tx.send(event).is_err() {
                        return;
                    }
                }
                Err(e) => log::debug!("Sprite {} unavailable: {}", url, e.detail()),
            }
        }
    }
}

/// Guarantees one `Completed` event per request. Dropping it without calling
/// [`CompletionGuard::complete`] (e.g. while unwinding) reports an interrupted lookup.
struct CompletionGuard<'a> {
    id: LookupId,
    event_tx: &'a Sender<WorkerEvent>,
    completed: bool,
}

impl<'a> CompletionGuard<'a> {
    fn new(id: LookupId, event_tx: &'a Sender<WorkerEvent>) -> Self {
        Self {
            id,
            event_tx,
            completed: false,
        }
    }

    fn complete(mut self, outcome: Result<LookupResult, LookupError>) {
        self.completed = true;
        let _ = self.event_tx.send(WorkerEvent::Completed {
            id: self.id,
            outcome,
        });
    }
}

impl Drop for CompletionGuard<'_> {
    fn drop(&mut self) {
        if !self.completed {
            let _ = self.event_tx.send(WorkerEvent::Completed {
                id: self.id,
                outcome: Err(LookupError::Interrupted),
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::controller::tests::{FakeSource, Reply};
    use std::time::{Duration, Instant};

    fn run_one(reply: Reply) -> Vec<WorkerEvent> {
        let (request_tx, request_rx) = mpsc::channel();
        let (event_tx, event_rx) = mpsc::channel();
        let handle = spawn_worker(Arc::new(FakeSource::new(reply)), request_rx, event_tx);

        request_tx
            .send(LookupRequest {
                id: 7,
                query: "bulbasaur".to_string(),
                with_sprites: true,
            })
            .unwrap();
        drop(request_tx);
        let _ = handle.join();

        event_rx.try_iter().collect()
    }

    #[test]
    fn test_completes_once() {
        let events = run_one(Reply::NotFound);
        assert_eq!(events.len(), 1);
        assert!(matches!(
            &events[0],
            WorkerEvent::Completed {
                id: 7,
                outcome: Err(LookupError::NotFound)
            }
        ));
    }

    #[test]
    fn test_panic_still_completes() {
        let events = run_one(Reply::Panic);
        assert_eq!(events.len(), 1);
        assert!(matches!(
            &events[0],
            WorkerEvent::Completed {
                id: 7,
                outcome: Err(LookupError::Interrupted)
            }
        ));
    }

    /// Has a front and back image; the back image download fails
    struct SpriteSource;

    impl DataSource for SpriteSource {
        fn lookup(&self, query: &str) -> Result<LookupResult, LookupError> {
            let mut result = crate::controller::tests::sample(query, 1);
            result.sprites.front_default = Some("https://img.test/1.png".to_string());
            result.sprites.back_default = Some("https://img.test/back/1.png".to_string());
            Ok(result)
        }

        fn fetch_sprite(&self, url: &str) -> Result<Vec<u8>, LookupError> {
            if url.contains("back") {
                Err(LookupError::NotFound)
            } else {
                Ok(vec![0x89, b'P', b'N', b'G'])
            }
        }
    }

    fn run_sprites(with_sprites: bool) -> Vec<WorkerEvent> {
        let (request_tx, request_rx) = mpsc::channel();
        let (event_tx, event_rx) = mpsc::channel();
        let handle = spawn_worker(Arc::new(SpriteSource), request_rx, event_tx);

        request_tx
            .send(LookupRequest {
                id: 3,
                query: "bulbasaur".to_string(),
                with_sprites,
            })
            .unwrap();
        drop(request_tx);
        let _ = handle.join();

        event_rx.try_iter().collect()
    }

    #[test]
    fn test_sprites_follow_completion() {
        let events = run_sprites(true);
        assert_eq!(events.len(), 2);
        assert!(matches!(
            &events[0],
            WorkerEvent::Completed {
                id: 3,
                outcome: Ok(_)
            }
        ));
        assert!(matches!(
            &events[1],
            WorkerEvent::Sprite { id: 3, slot: 0, bytes } if bytes.len() == 4
        ));
    }

    #[test]
    fn test_sprites_skipped_when_not_requested() {
        let events = run_sprites(false);
        assert_eq!(events.len(), 1);
        assert!(matches!(&events[0], WorkerEvent::Completed { .. }));
    }

    /// Three images, each taking `SLOW_SPRITE` to download
    struct SlowSprites;

    const SLOW_SPRITE: Duration = Duration::from_millis(200);

    impl DataSource for SlowSprites {
        fn lookup(&self, query: &str) -> Result<LookupResult, LookupError> {
            let mut result = crate::controller::tests::sample(query, 1);
            result.sprites.front_default = Some("https://img.test/1.png".to_string());
            result.sprites.front_shiny = Some("https://img.test/shiny/1.png".to_string());
            result.sprites.back_default = Some("https://img.test/back/1.png".to_string());
            Ok(result)
        }

        fn fetch_sprite(&self, _url: &str) -> Result<Vec<u8>, LookupError> {
            thread::sleep(SLOW_SPRITE);
            Ok(vec![1, 2, 3])
        }
    }

    /// Every event received up to and including lookup `want` completing
    fn wait_completed(event_rx: &Receiver<WorkerEvent>, want: LookupId) -> Vec<WorkerEvent> {
        let mut seen = Vec::new();
        loop {
            match event_rx.recv_timeout(Duration::from_secs(5)) {
                Ok(event) => {
                    let done = matches!(&event, WorkerEvent::Completed { id, .. } if *id == want);
                    seen.push(event);
                    if done {
                        return seen;
                    }
                }
                Err(e) => panic!("lookup {} never completed: {}", want, e),
            }
        }
    }

    fn request(id: LookupId, with_sprites: bool) -> LookupRequest {
        LookupRequest {
            id,
            query: "bulbasaur".to_string(),
            with_sprites,
        }
    }

    #[test]
    fn test_sprite_downloads_do_not_delay_next_lookup() {
        let (request_tx, request_rx) = mpsc::channel();
        let (event_tx, event_rx) = mpsc::channel();
        let handle = spawn_worker(Arc::new(SlowSprites), request_rx, event_tx);

        request_tx.send(request(1, true)).unwrap();
        wait_completed(&event_rx, 1);

        let started = Instant::now();
        request_tx.send(request(2, false)).unwrap();
        wait_completed(&event_rx, 2);
        assert!(
            started.elapsed() < SLOW_SPRITE,
            "second lookup waited {:?}",
            started.elapsed()
        );

        drop(request_tx);
        let _ = handle.join();
    }

    #[test]
    fn test_newer_lookup_abandons_older_sprites() {
        let (request_tx, request_rx) = mpsc::channel();
        let (event_tx, event_rx) = mpsc::channel();
        let handle = spawn_worker(Arc::new(SlowSprites), request_rx, event_tx);

        request_tx.send(request(1, true)).unwrap();
        let mut events = wait_completed(&event_rx, 1);
        request_tx.send(request(2, true)).unwrap();
        events.extend(wait_completed(&event_rx, 2));

        drop(request_tx);
        let _ = handle.join();
        events.extend(event_rx.try_iter());

        let slots_for = |events: &[WorkerEvent], want: LookupId| {
            events
                .iter()
                .filter_map(|e| match e {
                    WorkerEvent::Sprite { id, slot, .. } if *id == want => Some(*slot),
                    _ => None,
                })
                .collect::<Vec<_>>()
        };
        assert!(slots_for(&events, 1).len() <= 1);
        assert_eq!(slots_for(&events, 2), vec![0, 1, 2]);
    }

    #[test]
    fn test_worker_exits_when_requests_close() {
        let (request_tx, request_rx) = mpsc::channel::<LookupRequest>();
        let (event_tx, event_rx) = mpsc::channel();
        let handle = spawn_worker(
            Arc::new(FakeSource::new(Reply::Found(1))),
            request_rx,
            event_tx,
        );
        drop(request_tx);

        assert!(handle.join().is_ok());
        assert!(event_rx.recv_timeout(Duration::from_millis(10)).is_err());
    }
}
