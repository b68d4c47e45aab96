//! `calidrone` - Drone flight-path planning and camera recording core
//!
//! This library holds the waypoint path model and its coordinate geometry,
//! the catalogs of saved paths and recordings, and the camera recording state
//! machine. Hosts drive everything through a [`GroundStation`].

#![warn(missing_docs)]
#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

pub mod catalog;
pub mod cli;
pub mod clock;
pub mod config;
pub mod error;
pub mod geometry;
pub mod logging;
pub mod path;
pub mod recording;
pub mod station;

pub use catalog::{PathCatalog, RecordingCatalog, RecordingStats};
pub use clock::{Clock, IdGenerator};
pub use config::Config;
pub use error::{Error, ErrorKind, Result};
pub use logging::init_logging;
pub use path::{DraftPath, Path, Waypoint};
pub use recording::{CameraDevice, RecordingArtifact, RecordingSession, SessionStatus};
pub use station::GroundStation;
