// Kotoba Crossword – A vocabulary crossword game
// Copyright (C) 2024  Neil Roberts
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License
// along with this program.  If not, see <http://www.gnu.org/licenses/>.

use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};

/// A count of seconds that can be shared between the session and
/// whatever is driving the clock.
#[derive(Clone, Debug, Default)]
pub struct Stopwatch {
    seconds: Arc<AtomicU32>,
}

impl Stopwatch {
    pub fn new() -> Stopwatch {
        Stopwatch::default()
    }

    /// Adds a second and returns the new total
    pub fn tick(&self) -> u32 {
        self.seconds.fetch_add(1, Ordering::Relaxed) + 1
    }

    pub fn seconds(&self) -> u32 {
        self.seconds.load(Ordering::Relaxed)
    }
}

#[cfg(not(target_arch = "wasm32"))]
mod ticker {
    use super::Stopwatch;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::thread;
    use std::time::{Duration, Instant};

    /// Ticks a stopwatch from a background thread until it is
    /// stopped or dropped.
    pub struct Ticker {
        should_stop: Arc<AtomicBool>,
        thread: Option<thread::JoinHandle<()>>,
    }

    impl Ticker {
        pub fn start(stopwatch: Stopwatch) -> Ticker {
            Ticker::with_interval(stopwatch, Duration::from_secs(1))
        }

        pub fn with_interval(
            stopwatch: Stopwatch,
            interval: Duration,
        ) -> Ticker {
            let should_stop = Arc::new(AtomicBool::new(false));
            let thread_should_stop = Arc::clone(&should_stop);

            let thread = thread::spawn(move || {
                let mut deadline = Instant::now() + interval;

                loop {
                    // Parking can wake up spuriously so the deadline is
                    // checked every time
                    let now = Instant::now();

                    if now < deadline {
                        thread::park_timeout(deadline - now);
                    }

                    if thread_should_stop.load(Ordering::Acquire) {
                        break;
                    }

                    if Instant::now() >= deadline {
                        stopwatch.tick();
                        deadline += interval;
                    }
                }
            });

            Ticker {
                should_stop,
                thread: Some(thread),
            }
        }

        pub fn stop(mut self) {
            self.stop_thread();
        }

        fn stop_thread(&mut self) {
            let Some(thread) = self.thread.take()
            else {
                return;
            };

            self.should_stop.store(true, Ordering::Release);
            thread.thread().unpark();

            if thread.join().is_err() {
                log::warn!("ticker thread panicked");
            }
        }
    }

    impl Drop for Ticker {
        fn drop(&mut self) {
            self.stop_thread();
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
pub use ticker::Ticker;

#[cfg(test)]
mod test {
    use super::*;
    use std::time::{Duration, Instant};

    #[test]
    fn stopwatch() {
        let stopwatch = Stopwatch::new();
        let shared = stopwatch.clone();

        assert_eq!(stopwatch.seconds(), 0);
        assert_eq!(shared.tick(), 1);
        assert_eq!(shared.tick(), 2);
        assert_eq!(stopwatch.seconds(), 2);
    }

    #[test]
    fn ticker() {
        let stopwatch = Stopwatch::new();
        let ticker = Ticker::with_interval(
            stopwatch.clone(),
            Duration::from_millis(5),
        );

        let start = Instant::now();

        while stopwatch.seconds() < 3 {
            assert!(start.elapsed() < Duration::from_secs(10));
            std::thread::sleep(Duration::from_millis(5));
        }

        ticker.stop();

        let stopped_at = stopwatch.seconds();
        std::thread::sleep(Duration::from_millis(30));
        assert_eq!(stopwatch.seconds(), stopped_at);
    }

    #[test]
    fn stop_wakes_thread() {
        let stopwatch = Stopwatch::new();
        let ticker = Ticker::with_interval(
            stopwatch.clone(),
            Duration::from_secs(60),
        );

        let start = Instant::now();
        drop(ticker);

        assert!(start.elapsed() < Duration::from_secs(30));
        assert_eq!(stopwatch.seconds(), 0);
    }
}
