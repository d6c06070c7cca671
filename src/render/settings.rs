//! Render Sequence Settings
//!
//! [`MulticamSettings`] configures how a render sequence is built and driven.
//! It is a plain value: construct it with struct-update syntax or load it
//! from JSON at the host's configuration boundary.
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use multicam::render::MulticamSettings;
//!
//! // One job per camera and frame, no lens syncing
//! let settings = MulticamSettings {
//!     frame_by_frame: true,
//!     copy_base_properties: false,
//!     ..Default::default()
//! };
//!
//! // From a host-side config file
//! let settings = MulticamSettings::from_json(r#"{ "frame_by_frame": true }"#)?;
//! ```

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::errors::Result;

/// Configuration of a render sequence.
///
/// # Fields
///
/// | Field                  | Description                                    | Default |
/// |------------------------|------------------------------------------------|---------|
/// | `tick_interval`        | Period of the scheduler's timer                | 1 s     |
/// | `frame_by_frame`       | One job per (frame, camera) instead of per camera | `false` |
/// | `copy_base_properties` | Copy the base lens onto each child before rendering | `true` |
/// | `create_output_dirs`   | Create `output/<camera>/` before each job      | `true`  |
/// | `completion_message`   | Text of the notice emitted when a sequence ends | see below |
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MulticamSettings {
    /// How often the host delivers scheduler ticks.
    pub tick_interval: Duration,

    /// Split each camera's range into single-frame jobs, frames outer and
    /// cameras inner.
    pub frame_by_frame: bool,

    /// Keep every child's lens in sync with the base camera at dispatch time.
    pub copy_base_properties: bool,

    /// Create the per-camera output directory before dispatching a job.
    pub create_output_dirs: bool,

    /// Reported through the host once per sequence, on every terminal path.
    pub completion_message: String,
}

impl Default for MulticamSettings {
    fn default() -> Self {
        Self {
            tick_interval: Duration::from_secs(1),
            frame_by_frame: false,
            copy_base_properties: true,
            create_output_dirs: true,
            completion_message: "Multi-camera render finished".to_owned(),
        }
    }
}

impl MulticamSettings {
    /// Parses settings from JSON; missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
