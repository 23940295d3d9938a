//! Serialized speech output.
//!
//! A bounded FIFO feeds exactly one worker thread that pulls phrases and
//! drives the blocking speech backend. Utterances never overlap, and the
//! tick loop never waits on audio: enqueue is non-blocking and drops on a
//! full queue. A sentinel item stops the worker cooperatively; an
//! utterance already in flight always finishes.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Condvar, Mutex};
use std::thread::{self, JoinHandle};
use tracing::{debug, info, warn};

use crate::speech::SpeechBackend;

const MUTE_NOTICE: &str = "Muted. Philosophy will be silent, temporarily.";

/// One queued unit of work for the worker.
enum SpeechRequest {
    Phrase(String),
    Shutdown,
}

struct Inner {
    queue: Mutex<VecDeque<SpeechRequest>>,
    available: Condvar,
    capacity: usize,
    enabled: AtomicBool,
    stopped: AtomicBool,
}

/// Owns the phrase queue and the single worker thread consuming it.
pub struct Announcer {
    inner: Arc<Inner>,
    worker: Option<JoinHandle<()>>,
}

impl Announcer {
    /// Start the worker thread. `enabled` is the initial speech toggle;
    /// the queue holds at most `capacity` phrases.
    pub fn spawn(capacity: usize, enabled: bool, backend: Box<dyn SpeechBackend + Send>) -> Self {
        let inner = Arc::new(Inner {
            queue: Mutex::new(VecDeque::new()),
            available: Condvar::new(),
            capacity,
            enabled: AtomicBool::new(enabled),
            stopped: AtomicBool::new(false),
        });

        let worker_inner = Arc::clone(&inner);
        let worker = thread::Builder::new()
            .name("announcer".into())
            .spawn(move || worker_loop(worker_inner, backend))
            .expect("failed to spawn announcer worker");

        info!("Announcer ready (queue capacity: {capacity}, speech: {enabled})");

        Self {
            inner,
            worker: Some(worker),
        }
    }

    pub fn speech_enabled(&self) -> bool {
        self.inner.enabled.load(Ordering::Relaxed)
    }

    pub fn set_speech_enabled(&self, enabled: bool) {
        self.inner.enabled.store(enabled, Ordering::Relaxed);
        info!("Speech {}", if enabled { "enabled" } else { "disabled" });
    }

    /// Append a phrase without blocking. Returns false when the phrase was
    /// dropped: queue at capacity, or the announcer has already shut down
    /// (post-shutdown enqueue is a silent no-op).
    pub fn try_enqueue(&self, text: String) -> bool {
        if self.inner.stopped.load(Ordering::Relaxed) {
            return false;
        }

        let mut queue = self.inner.queue.lock().unwrap();
        if queue.len() >= self.inner.capacity {
            debug!("Speech queue full, dropping phrase");
            return false;
        }
        queue.push_back(SpeechRequest::Phrase(text));
        drop(queue);

        self.inner.available.notify_one();
        true
    }

    /// Drop everything still queued, say a short notice if speech was on,
    /// and disable further announcements. The utterance currently in
    /// flight is not interrupted.
    pub fn mute_now(&self) {
        let was_enabled = self.inner.enabled.swap(false, Ordering::Relaxed);

        let dropped = {
            let mut queue = self.inner.queue.lock().unwrap();
            let before = queue.len();
            // Keep a pending shutdown sentinel alive through the drain.
            queue.retain(|r| matches!(r, SpeechRequest::Shutdown));
            let dropped = before - queue.len();

            if was_enabled && !self.inner.stopped.load(Ordering::Relaxed) {
                queue.push_back(SpeechRequest::Phrase(MUTE_NOTICE.into()));
            }
            dropped
        };
        self.inner.available.notify_one();

        info!("Muted, dropped {dropped} queued phrase(s)");
    }

    /// Ask the worker to stop after the current utterance and wait for it.
    /// Idempotent; later calls return immediately.
    pub fn shutdown(&mut self) {
        if self.inner.stopped.swap(true, Ordering::Relaxed) {
            return;
        }

        // The sentinel bypasses the capacity check so shutdown always lands.
        self.inner
            .queue
            .lock()
            .unwrap()
            .push_back(SpeechRequest::Shutdown);
        self.inner.available.notify_one();

        if let Some(worker) = self.worker.take() {
            if worker.join().is_err() {
                warn!("Announcer worker panicked");
            }
        }
    }

    #[cfg(test)]
    fn queued_phrases(&self) -> usize {
        self.inner
            .queue
            .lock()
            .unwrap()
            .iter()
            .filter(|r| matches!(r, SpeechRequest::Phrase(_)))
            .count()
    }
}

/// Idle on an empty queue, speak one phrase at a time, stop on the
/// sentinel. Backend failures are logged and the loop moves on.
fn worker_loop(inner: Arc<Inner>, mut backend: Box<dyn SpeechBackend + Send>) {
    loop {
        let request = {
            let mut queue = inner.queue.lock().unwrap();
            loop {
                match queue.pop_front() {
                    Some(request) => break request,
                    None => queue = inner.available.wait(queue).unwrap(),
                }
            }
        };

        match request {
            SpeechRequest::Phrase(text) => {
                debug!("Speaking: {text}");
                if let Err(e) = backend.speak(&text) {
                    warn!("Speech backend failed: {e}");
                }
            }
            SpeechRequest::Shutdown => {
                info!("Announcer worker stopping");
                break;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;
    use std::time::Duration;

    /// Records what was spoken and flags any overlapping speak calls.
    struct RecordingBackend {
        spoken: Arc<Mutex<Vec<String>>>,
        active: Arc<AtomicUsize>,
        overlapped: Arc<AtomicBool>,
    }

    impl SpeechBackend for RecordingBackend {
        fn speak(&mut self, text: &str) -> Result<(), String> {
            if self.active.fetch_add(1, Ordering::SeqCst) != 0 {
                self.overlapped.store(true, Ordering::SeqCst);
            }
            thread::sleep(Duration::from_millis(5));
            self.spoken.lock().unwrap().push(text.to_string());
            self.active.fetch_sub(1, Ordering::SeqCst);
            Ok(())
        }
    }

    /// Blocks inside speak until the gate opens, so tests can observe the
    /// queue while an utterance is in flight.
    struct GatedBackend {
        spoken: Arc<Mutex<Vec<String>>>,
        gate: Arc<(Mutex<bool>, Condvar)>,
        in_flight: Arc<AtomicBool>,
    }

    impl SpeechBackend for GatedBackend {
        fn speak(&mut self, text: &str) -> Result<(), String> {
            self.in_flight.store(true, Ordering::SeqCst);
            let (lock, cvar) = &*self.gate;
            let mut open = lock.lock().unwrap();
            while !*open {
                open = cvar.wait(open).unwrap();
            }
            drop(open);
            self.spoken.lock().unwrap().push(text.to_string());
            self.in_flight.store(false, Ordering::SeqCst);
            Ok(())
        }
    }

    fn open_gate(gate: &Arc<(Mutex<bool>, Condvar)>) {
        let (lock, cvar) = &**gate;
        *lock.lock().unwrap() = true;
        cvar.notify_all();
    }

    fn wait_until(cond: impl Fn() -> bool) {
        for _ in 0..200 {
            if cond() {
                return;
            }
            thread::sleep(Duration::from_millis(5));
        }
        panic!("condition not reached within 1s");
    }

    fn gated_announcer(capacity: usize) -> (Announcer, Arc<Mutex<Vec<String>>>, Arc<(Mutex<bool>, Condvar)>, Arc<AtomicBool>) {
        let spoken = Arc::new(Mutex::new(Vec::new()));
        let gate = Arc::new((Mutex::new(false), Condvar::new()));
        let in_flight = Arc::new(AtomicBool::new(false));
        let backend = GatedBackend {
            spoken: Arc::clone(&spoken),
            gate: Arc::clone(&gate),
            in_flight: Arc::clone(&in_flight),
        };
        let announcer = Announcer::spawn(capacity, true, Box::new(backend));
        (announcer, spoken, gate, in_flight)
    }

    #[test]
    fn phrases_spoken_in_fifo_order_without_overlap() {
        let spoken = Arc::new(Mutex::new(Vec::new()));
        let active = Arc::new(AtomicUsize::new(0));
        let overlapped = Arc::new(AtomicBool::new(false));
        let backend = RecordingBackend {
            spoken: Arc::clone(&spoken),
            active: Arc::clone(&active),
            overlapped: Arc::clone(&overlapped),
        };
        let mut announcer = Announcer::spawn(8, true, Box::new(backend));

        assert!(announcer.try_enqueue("P1".into()));
        assert!(announcer.try_enqueue("P2".into()));
        assert!(announcer.try_enqueue("P3".into()));
        announcer.shutdown();

        assert_eq!(*spoken.lock().unwrap(), vec!["P1", "P2", "P3"]);
        assert!(!overlapped.load(Ordering::SeqCst));
        assert_eq!(active.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn mute_drains_queue_and_disables_speech() {
        let (mut announcer, spoken, gate, in_flight) = gated_announcer(8);

        announcer.try_enqueue("busy".into());
        wait_until(|| in_flight.load(Ordering::SeqCst));

        announcer.try_enqueue("A".into());
        announcer.try_enqueue("B".into());
        announcer.try_enqueue("C".into());
        assert_eq!(announcer.queued_phrases(), 3);

        announcer.mute_now();

        // Only the mute notice survives the drain.
        assert_eq!(announcer.queued_phrases(), 1);
        assert!(!announcer.speech_enabled());

        open_gate(&gate);
        announcer.shutdown();
        assert_eq!(*spoken.lock().unwrap(), vec!["busy", MUTE_NOTICE]);
    }

    #[test]
    fn mute_while_already_disabled_skips_the_notice() {
        let spoken = Arc::new(Mutex::new(Vec::new()));
        let backend = RecordingBackend {
            spoken: Arc::clone(&spoken),
            active: Arc::new(AtomicUsize::new(0)),
            overlapped: Arc::new(AtomicBool::new(false)),
        };
        let mut announcer = Announcer::spawn(8, false, Box::new(backend));

        announcer.mute_now();
        assert_eq!(announcer.queued_phrases(), 0);

        announcer.shutdown();
        assert!(spoken.lock().unwrap().is_empty());
    }

    #[test]
    fn shutdown_stops_worker_and_rejects_new_phrases() {
        let spoken = Arc::new(Mutex::new(Vec::new()));
        let backend = RecordingBackend {
            spoken: Arc::clone(&spoken),
            active: Arc::new(AtomicUsize::new(0)),
            overlapped: Arc::new(AtomicBool::new(false)),
        };
        let mut announcer = Announcer::spawn(8, true, Box::new(backend));

        assert!(announcer.try_enqueue("P1".into()));
        announcer.shutdown();

        // Worker has joined; everything enqueued before the sentinel spoke.
        assert_eq!(*spoken.lock().unwrap(), vec!["P1"]);

        assert!(!announcer.try_enqueue("too late".into()));
        thread::sleep(Duration::from_millis(20));
        assert_eq!(*spoken.lock().unwrap(), vec!["P1"]);
    }

    #[test]
    fn enqueue_drops_when_queue_is_full() {
        let (mut announcer, spoken, gate, in_flight) = gated_announcer(2);

        announcer.try_enqueue("busy".into());
        wait_until(|| in_flight.load(Ordering::SeqCst));

        assert!(announcer.try_enqueue("Q1".into()));
        assert!(announcer.try_enqueue("Q2".into()));
        assert!(!announcer.try_enqueue("Q3".into()));

        open_gate(&gate);
        announcer.shutdown();
        assert_eq!(*spoken.lock().unwrap(), vec!["busy", "Q1", "Q2"]);
    }
}
