use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use parking_lot::Mutex;

use crate::models::level::LevelSample;
use crate::processing::level_meter;
use crate::processing::meter_window::MeterWindow;

/// Handle to the self-rescheduling level-meter loop.
///
/// The loop measures the most recent [`level_meter::METER_WINDOW`] samples
/// each tick and reports through `on_tick`. Cancellation is idempotent:
/// the first [`cancel`](Self::cancel) stops the loop and joins the
/// thread, later calls are no-ops. Dropping an uncancelled handle
/// cancels it, so the loop cannot outlive the session on any exit path.
pub struct MeterHandle {
    running: Arc<AtomicBool>,
    handle: Option<thread::JoinHandle<()>>,
}

impl MeterHandle {
    pub fn spawn(
        interval: Duration,
        window: Arc<Mutex<MeterWindow>>,
        on_tick: impl Fn(LevelSample) + Send + 'static,
    ) -> Self {
        let running = Arc::new(AtomicBool::new(true));
        let loop_running = Arc::clone(&running);

        let handle = thread::Builder::new()
            .name("level-meter".into())
            .spawn(move || {
                while loop_running.load(Ordering::SeqCst) {
                    thread::sleep(interval);
                    if !loop_running.load(Ordering::SeqCst) {
                        break;
                    }
                    let samples = window.lock().latest(level_meter::METER_WINDOW);
                    on_tick(level_meter::measure(&samples));
                }
            })
            .expect("failed to spawn level-meter thread");

        Self {
            running,
            handle: Some(handle),
        }
    }

    /// Stop the loop and wait for the thread to exit. Idempotent.
    pub fn cancel(&mut self) {
        if !self.running.swap(false, Ordering::SeqCst) {
            return;
        }
        if let Some(handle) = self.handle.take() {
            if handle.join().is_err() {
                log::error!("level-meter thread panicked");
            }
        }
    }

    pub fn is_cancelled(&self) -> bool {
        !self.running.load(Ordering::SeqCst)
    }
}

impl Drop for MeterHandle {
    fn drop(&mut self) {
        self.cancel();
    }
}

#[cfg(test)]
mod tests {
    use std::sync::mpsc;

    use super::*;

    fn shared_window(samples: &[f32]) -> Arc<Mutex<MeterWindow>> {
        let mut window = MeterWindow::new(level_meter::METER_WINDOW);
        window.push(samples);
        Arc::new(Mutex::new(window))
    }

    #[test]
    fn ticks_report_the_window_level() {
        let window = shared_window(&[0.5; 256]);
        let (tx, rx) = mpsc::channel();

        let mut meter = MeterHandle::spawn(Duration::from_millis(1), window, move |level| {
            let _ = tx.send(level);
        });

        let level = rx
            .recv_timeout(Duration::from_secs(2))
            .expect("meter never ticked");
        assert!(level.rms > 0.4);

        meter.cancel();
    }

    #[test]
    fn cancel_is_idempotent() {
        let window = shared_window(&[]);
        let mut meter = MeterHandle::spawn(Duration::from_millis(1), window, |_| {});

        meter.cancel();
        assert!(meter.is_cancelled());
        meter.cancel(); // no-op, must not panic or hang
        assert!(meter.is_cancelled());
    }

    #[test]
    fn cancel_stops_ticking() {
        let window = shared_window(&[0.1; 64]);
        let (tx, rx) = mpsc::channel();

        let mut meter = MeterHandle::spawn(Duration::from_millis(1), window, move |level| {
            let _ = tx.send(level);
        });
        let _ = rx.recv_timeout(Duration::from_secs(2));
        meter.cancel();

        // Drain anything in flight, then confirm silence.
        while rx.try_recv().is_ok() {}
        assert!(rx.recv_timeout(Duration::from_millis(50)).is_err());
    }

    #[test]
    fn drop_cancels_the_loop() {
        let window = shared_window(&[]);
        let meter = MeterHandle::spawn(Duration::from_millis(1), window, |_| {});
        drop(meter); // joins without hanging
    }
}
