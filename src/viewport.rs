//! Viewport - the window the document is laid out in.
//!
//! Hosts report size changes through [`Page::resize`](crate::page::Page::resize).
//! A terminal can act as a host: [`Viewport::from_terminal`] reads its size
//! (one unit per cell) and [`translate`] turns crossterm resize events into
//! viewports.

use std::io;
use std::time::Duration;

use crossterm::event::{poll, read, Event as CrosstermEvent};
use serde::Deserialize;

/// Default when nothing better is known.
pub const DEFAULT_WIDTH: f32 = 1024.0;
pub const DEFAULT_HEIGHT: f32 = 768.0;

#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
        }
    }
}

impl Viewport {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            width: width.max(0.0),
            height: height.max(0.0),
        }
    }

    /// Current terminal size in cells.
    pub fn from_terminal() -> io::Result<Self> {
        let (columns, rows) = crossterm::terminal::size()?;
        Ok(Self::new(columns as f32, rows as f32))
    }
}

/// New viewport for a terminal resize event; `None` for anything else.
pub fn translate(event: &CrosstermEvent) -> Option<Viewport> {
    match event {
        CrosstermEvent::Resize(columns, rows) => Some(Viewport::new(*columns as f32, *rows as f32)),
        _ => None,
    }
}

/// Wait up to `timeout` for the next terminal resize.
/// Returns None if no resize arrived within the timeout.
pub fn poll_resize(timeout: Duration) -> io::Result<Option<Viewport>> {
    if poll(timeout)? {
        Ok(translate(&read()?))
    } else {
        Ok(None)
    }
}
