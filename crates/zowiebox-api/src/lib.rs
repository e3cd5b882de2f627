// zowiebox-api: Async Rust client for the Zowietek ZowieBox HTTP API

pub mod audio;
pub mod camera;
pub mod client;
pub mod error;
pub mod ptz;
pub mod record;
pub mod status;
pub mod streamplay;
pub mod system;
pub mod video;

pub use client::{Ack, DeviceClient, Envelope};
pub use error::Error;
pub use status::Outcome;
