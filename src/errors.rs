//! Error Types
//!
//! This module defines the error type shared by rig generation, the scene
//! graph and the render sequence scheduler.
//!
//! # Overview
//!
//! [`MulticamError`] groups failures by how they are handled:
//! - Parameter validation: rejected before any rig child is touched
//! - Lookups: abort the current rig generation or render sequence
//! - Session state: misuse of the scheduler lifecycle
//! - I/O and serialization: abort the current job or persistence step
//!
//! Engine-reported cancellation is not an error; it is a regular termination
//! path of the scheduler.
//!
//! # Usage
//!
//! ```rust,ignore
//! use multicam::errors::{MulticamError, Result};
//!
//! fn regenerate() -> Result<()> {
//!     Ok(())
//! }
//! ```

use thiserror::Error;

/// The main error type for rig generation and render sequencing.
#[derive(Error, Debug)]
pub enum MulticamError {
    // ========================================================================
    // Parameter Validation Errors
    // ========================================================================
    /// A rig parameter is outside its valid range.
    #[error("Invalid rig parameter `{field}`: {reason}")]
    InvalidParameter {
        /// Name of the offending parameter
        field: &'static str,
        /// Why the value was rejected
        reason: String,
    },

    /// The frame range or frame step cannot produce any job.
    #[error("Invalid frame range {start}..={end} (step {step})")]
    InvalidFrameRange {
        /// First frame
        start: i32,
        /// Last frame
        end: i32,
        /// Frame step
        step: i32,
    },

    // ========================================================================
    // Lookup Errors
    // ========================================================================
    /// No node with the given name exists in the scene.
    #[error("Node not found: {0}")]
    NodeNotFound(String),

    /// A node handle no longer refers to a live node.
    #[error("Stale node handle")]
    StaleHandle,

    /// The node exists but carries no camera data.
    #[error("Node is not a camera: {0}")]
    NotACamera(String),

    /// A mesh rig was requested without a resolvable target.
    #[error("Mesh rig on `{0}` has no valid target")]
    MissingTarget(String),

    /// A rig child name is already taken by a node outside the rig.
    #[error("Name already in use: {0}")]
    DuplicateName(String),

    /// A queued camera could not be resolved; the rig and the queue have
    /// drifted apart.
    #[error("Queued camera not found: {0}")]
    CameraNotFound(String),

    // ========================================================================
    // Session Errors
    // ========================================================================
    /// A render sequence is already running.
    #[error("A render sequence is already running")]
    SessionAlreadyRunning,

    /// The render engine refused to start a job.
    #[error("Render engine error: {0}")]
    Engine(String),

    // ========================================================================
    // I/O & Serialization Errors
    // ========================================================================
    /// File I/O error.
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// JSON (de)serialization error.
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
}

/// Alias for `Result<T, MulticamError>`.
pub type Result<T> = std::result::Result<T, MulticamError>;
