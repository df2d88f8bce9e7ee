use std::sync::mpsc::{self, Receiver, RecvTimeoutError};
use std::time::Duration;

use crossterm::event::{self, Event as CtEvent, KeyEvent, KeyEventKind};
use thiserror::Error;

/// Unified event type consumed by the app
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TypistEvent {
    Key(KeyEvent),
    /// bracketed paste, delivered as one chunk
    Paste(String),
    Resize,
    Tick,
}

/// The producer side hung up; no further events will arrive
#[derive(Debug, Error, PartialEq, Eq)]
#[error("terminal event source closed")]
pub struct SourceClosed;

/// Terminal (or scripted) events, delivered over a channel
pub struct ChannelSource {
    rx: Receiver<TypistEvent>,
}

impl ChannelSource {
    pub fn new(rx: Receiver<TypistEvent>) -> Self {
        Self { rx }
    }

    /// Spawn a reader thread translating crossterm events.
    /// The thread exits on a read error, which closes the source.
    pub fn crossterm() -> Self {
        let (tx, rx) = mpsc::channel();

        std::thread::spawn(move || loop {
            let ev = match event::read() {
                // windows reports releases too
                Ok(CtEvent::Key(key)) if key.kind != KeyEventKind::Release => {
                    TypistEvent::Key(key)
                }
                Ok(CtEvent::Paste(text)) => TypistEvent::Paste(text),
                Ok(CtEvent::Resize(_, _)) => TypistEvent::Resize,
                Ok(_) => continue,
                Err(e) => {
                    tracing::error!(error = %e, "terminal event read failed");
                    break;
                }
            };
            if tx.send(ev).is_err() {
                break;
            }
        });

        Self::new(rx)
    }

    /// `Ok(None)` when nothing arrived within `timeout`
    pub fn recv_timeout(&self, timeout: Duration) -> Result<Option<TypistEvent>, SourceClosed> {
        match self.rx.recv_timeout(timeout) {
            Ok(ev) => Ok(Some(ev)),
            Err(RecvTimeoutError::Timeout) => Ok(None),
            Err(RecvTimeoutError::Disconnected) => Err(SourceClosed),
        }
    }
}

/// Pulls one event at a time, turning quiet periods into ticks
pub struct EventLoop {
    source: ChannelSource,
    tick: Duration,
}

impl EventLoop {
    pub fn new(source: ChannelSource, tick: Duration) -> Self {
        Self { source, tick }
    }

    /// Blocks up to one tick; a closed source is an error so callers stop polling
    pub fn next(&self) -> Result<TypistEvent, SourceClosed> {
        Ok(self
            .source
            .recv_timeout(self.tick)?
            .unwrap_or(TypistEvent::Tick))
    }
}
