//! Frame loop for multi-frame images
//!
//! Each frame goes through `render → display → pause → rewind`, where rewind
//! moves the cursor back up over the frame just drawn so the next one
//! overwrites it in place. The loop runs until the interrupt future resolves
//! (or an optional cycle bound is reached).

use std::future::Future;
use std::io::Write;
use std::time::Duration;

use crossterm::cursor::{MoveDown, MoveUp};
use crossterm::queue;
use crossterm::style::{Print, ResetColor};
use tracing::{debug, trace};

use super::frame::FrameRenderer;
use crate::errors::{PixcatError, Result};
use crate::source::Animation;

/// Pause between two frames
pub const FRAME_INTERVAL: Duration = Duration::from_millis(100);

/// Drives an [`Animation`] on a terminal writer
pub struct AnimationDriver<'a, W: Write> {
    renderer: &'a mut FrameRenderer,
    out: &'a mut W,
    interval: Duration,
    loops: Option<u32>,
}

impl<'a, W: Write> AnimationDriver<'a, W> {
    pub fn new(renderer: &'a mut FrameRenderer, out: &'a mut W) -> Self {
        Self {
            renderer,
            out,
            interval: FRAME_INTERVAL,
            loops: None,
        }
    }

    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    /// Stop after `loops` complete cycles; `None` loops until interrupted
    pub fn with_loops(mut self, loops: Option<u32>) -> Self {
        self.loops = loops;
        self
    }

    /// Play `animation` until `interrupt` resolves
    ///
    /// On interrupt the cursor is moved below the image and colors are reset
    /// before `PixcatError::Interrupted` is returned.
    pub async fn play<F>(self, animation: &Animation, interrupt: F) -> Result<()>
    where
        F: Future<Output = ()>,
    {
        let Self {
            renderer,
            out,
            interval,
            loops,
        } = self;

        tokio::select! {
            biased;
            result = run_frames(renderer, out, animation, interval, loops) => result,
            () = interrupt => {
                debug!("animation interrupted");
                Err(PixcatError::Interrupted)
            }
        }
    }
}

async fn run_frames<W: Write>(
    renderer: &mut FrameRenderer,
    out: &mut W,
    animation: &Animation,
    interval: Duration,
    loops: Option<u32>,
) -> Result<()> {
    let frame_count = animation.frame_count();
    let mut guard = TerminalRestore::new(out);
    let mut cycle: u32 = 0;

    debug!(frame_count, ?interval, ?loops, "starting animation");
    loop {
        for (index, frame) in animation.frames().iter().enumerate() {
            trace!(index, cycle, "frame");

            let rendered = renderer.render(frame)?;
            renderer.buffer_mut().truncate();
            guard.rows = rendered.rows;

            queue!(guard.out, Print(&rendered.text), Print('\n'))?;
            guard.out.flush()?;

            tokio::time::sleep(interval).await;

            let finished = index + 1 == frame_count && loops.is_some_and(|n| cycle + 1 >= n);
            if finished {
                guard.disarm();
                return Ok(());
            }

            queue!(guard.out, MoveUp(clamp_rows(rendered.rows)))?;
            guard.out.flush()?;
        }
        cycle = cycle.saturating_add(1);
    }
}

fn clamp_rows(rows: u32) -> u16 {
    u16::try_from(rows).unwrap_or(u16::MAX)
}

/// Leaves the cursor below the image with colors reset when dropped
///
/// Held across the frame loop, so the restore runs on every exit path:
/// interrupt (the loop future is dropped), render errors and panics.
struct TerminalRestore<'a, W: Write> {
    out: &'a mut W,
    rows: u32,
    armed: bool,
}

impl<'a, W: Write> TerminalRestore<'a, W> {
    fn new(out: &'a mut W) -> Self {
        Self {
            out,
            rows: 0,
            armed: true,
        }
    }

    fn disarm(&mut self) {
        self.armed = false;
    }
}

impl<W: Write> Drop for TerminalRestore<'_, W> {
    fn drop(&mut self) {
        if !self.armed {
            return;
        }
        let _ = queue!(self.out, MoveDown(clamp_rows(self.rows)), ResetColor, Print('\n'));
        let _ = self.out.flush();
    }
}
