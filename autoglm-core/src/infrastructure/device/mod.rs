//! Device control: the actions an agent can perform on a phone and the
//! bridge that carries them out.

mod adb;

pub use adb::AdbDevice;

use async_trait::async_trait;
use std::io;
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Point {
    pub x: u32,
    pub y: u32,
}

/// A device action in absolute screen pixels.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeviceAction {
    Tap(Point),
    DoubleTap(Point),
    LongPress(Point),
    Swipe { start: Point, end: Point },
    Type(String),
    Back,
    Home,
    Launch(String),
    Wait(Duration),
}

/// PNG screenshot, base64 encoded, with its pixel size.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Screenshot {
    pub png_base64: String,
    pub width: u32,
    pub height: u32,
}

#[async_trait]
pub trait DeviceBridge: Send + Sync {
    async fn screenshot(&self) -> Result<Screenshot, DeviceError>;

    async fn perform(&self, action: &DeviceAction) -> Result<(), DeviceError>;
}

#[derive(Debug, Error)]
pub enum DeviceError {
    #[error("failed to spawn '{program}': {source}")]
    Spawn {
        program: String,
        #[source]
        source: io::Error,
    },
    #[error("device command '{command}' failed: {stderr}")]
    CommandFailed { command: String, stderr: String },
    #[error("invalid screenshot: {0}")]
    InvalidScreenshot(String),
}
