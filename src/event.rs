use std::io;
use std::sync::mpsc;
use std::thread;
use std::time::{Duration, Instant};

use crossterm::event::{self, KeyEvent};

pub enum Event {
    Key(KeyEvent),
    /// Fixed-rate step carrying the real time since the previous one.
    Tick(Duration),
    Resize,
}

pub struct EventHandler {
    rx: mpsc::Receiver<Event>,
}

impl EventHandler {
    /// Presses, repeats and releases are all forwarded; the app decides
    /// which kinds each screen sees.
    pub fn new(tick_rate: Duration) -> Self {
        let (tx, rx) = mpsc::channel();

        thread::spawn(move || {
            let mut last_tick = Instant::now();
            loop {
                let timeout = tick_rate.saturating_sub(last_tick.elapsed());
                if event::poll(timeout).unwrap_or(false) {
                    let forwarded = match event::read() {
                        Ok(event::Event::Key(key)) => Some(Event::Key(key)),
                        Ok(event::Event::Resize(..)) => Some(Event::Resize),
                        Ok(_) => None,
                        Err(e) => {
                            log::warn!("Terminal read failed: {}", e);
                            None
                        }
                    };
                    if let Some(ev) = forwarded {
                        if tx.send(ev).is_err() {
                            return;
                        }
                    }
                }
                if last_tick.elapsed() >= tick_rate {
                    let now = Instant::now();
                    let dt = now - last_tick;
                    last_tick = now;
                    if tx.send(Event::Tick(dt)).is_err() {
                        return;
                    }
                }
            }
        });

        Self { rx }
    }

    pub fn next(&self) -> io::Result<Event> {
        self.rx.recv().map_err(io::Error::other)
    }
}
