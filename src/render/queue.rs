//! Render job queue.
//!
//! The queue is the single source of truth for what remains to render. Jobs
//! run strictly in insertion order; the scheduler peeks the head to dispatch
//! it and pops it once the engine reports completion.

use std::collections::VecDeque;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::errors::{MulticamError, Result};

/// One unit of work: a camera and an inclusive frame range.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenderJob {
    pub camera_name: String,
    pub frame_start: i32,
    pub frame_end: i32,
}

impl RenderJob {
    #[must_use]
    pub fn new(camera_name: impl Into<String>, frame_start: i32, frame_end: i32) -> Self {
        Self {
            camera_name: camera_name.into(),
            frame_start,
            frame_end,
        }
    }

    #[must_use]
    pub fn single_frame(camera_name: impl Into<String>, frame: i32) -> Self {
        Self::new(camera_name, frame, frame)
    }
}

impl fmt::Display for RenderJob {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.frame_start == self.frame_end {
            write!(f, "{} [{}]", self.camera_name, self.frame_start)
        } else {
            write!(f, "{} [{}..={}]", self.camera_name, self.frame_start, self.frame_end)
        }
    }
}

/// Inclusive frame range with a step, as configured on the scene.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FrameRange {
    pub start: i32,
    pub end: i32,
    pub step: i32,
}

impl FrameRange {
    #[must_use]
    pub fn new(start: i32, end: i32) -> Self {
        Self { start, end, step: 1 }
    }

    #[must_use]
    pub fn with_step(mut self, step: i32) -> Self {
        self.step = step;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.step < 1 || self.end < self.start {
            return Err(MulticamError::InvalidFrameRange {
                start: self.start,
                end: self.end,
                step: self.step,
            });
        }
        Ok(())
    }

    /// Frames in the range, honouring the step.
    pub fn frames(&self) -> impl Iterator<Item = i32> {
        let step = usize::try_from(self.step.max(1)).unwrap_or(1);
        (self.start..=self.end).step_by(step)
    }
}

/// FIFO of render jobs.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RenderQueue {
    jobs: VecDeque<RenderJob>,
}

impl RenderQueue {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds the queue for `cameras` over `range`.
    ///
    /// With `frame_by_frame`, frames are the outer loop and cameras the inner
    /// one, so every camera finishes frame `n` before any camera starts frame
    /// `n + step`. Otherwise each camera gets one job spanning the whole range.
    pub fn build<I, S>(cameras: I, range: FrameRange, frame_by_frame: bool) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        range.validate()?;
        let cameras: Vec<String> = cameras.into_iter().map(Into::into).collect();

        let mut queue = Self::new();
        if frame_by_frame {
            for frame in range.frames() {
                for camera in &cameras {
                    queue.push(RenderJob::single_frame(camera.clone(), frame));
                }
            }
        } else {
            for camera in cameras {
                queue.push(RenderJob::new(camera, range.start, range.end));
            }
        }
        Ok(queue)
    }

    pub fn push(&mut self, job: RenderJob) {
        self.jobs.push_back(job);
    }

    /// Removes and returns the head.
    pub fn pop(&mut self) -> Option<RenderJob> {
        self.jobs.pop_front()
    }

    #[must_use]
    pub fn peek(&self) -> Option<&RenderJob> {
        self.jobs.front()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.jobs.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.jobs.len()
    }

    pub fn clear(&mut self) {
        self.jobs.clear();
    }

    pub fn iter(&self) -> impl Iterator<Item = &RenderJob> {
        self.jobs.iter()
    }
}

impl<'a> IntoIterator for &'a RenderQueue {
    type Item = &'a RenderJob;
    type IntoIter = std::collections::vec_deque::Iter<'a, RenderJob>;

    fn into_iter(self) -> Self::IntoIter {
        self.jobs.iter()
    }
}

impl FromIterator<RenderJob> for RenderQueue {
    fn from_iter<T: IntoIterator<Item = RenderJob>>(iter: T) -> Self {
        Self {
            jobs: iter.into_iter().collect(),
        }
    }
}
