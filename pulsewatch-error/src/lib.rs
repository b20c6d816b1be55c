// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

#![allow(clippy::multiple_crate_versions)]
//! Error types for the PulseWatch vital-signs monitor
//!
//! Two layers are defined here:
//!
//! - [`DeviceError`] is what an external collaborator (sensor driver, display,
//!   HTTP client, Wi-Fi link) reports when one of its operations fails.
//! - [`MonitorError`] is the root error of the monitor itself. It classifies a
//!   collaborator failure by where it happened, which decides whether the
//!   monitor keeps running ([`MonitorError::is_recoverable`]) or halts
//!   ([`MonitorError::is_fatal`]).
//!
//! # Examples
//!
//! ```
//! use pulsewatch_error::{DeviceError, MonitorError, Result};
//!
//! fn read_sensor() -> Result<f32> {
//!     Err(MonitorError::Sensor(DeviceError::new("max30100", "bus timeout")))
//! }
//!
//! let err = read_sensor().unwrap_err();
//! assert!(err.is_fatal());
//! ```

/// Failure reported by an external collaborator
///
/// Collaborators are opaque to the monitor, so the error only carries the
/// device name and a human-readable message.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{device}: {message}")]
pub struct DeviceError {
    /// Name of the device or driver that failed
    pub device: String,
    /// What went wrong
    pub message: String,
}

impl DeviceError {
    /// Create a device error for the named collaborator
    pub fn new(device: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            device: device.into(),
            message: message.into(),
        }
    }
}

/// Root error type for all monitor operations
#[derive(Debug, thiserror::Error)]
pub enum MonitorError {
    /// The sensor read failed
    ///
    /// This is an unrecoverable hardware I/O failure. The acquisition path
    /// halts and the monitor shuts down.
    #[error("Sensor read failed: {0}")]
    Sensor(#[source] DeviceError),

    /// Writing to the character display failed
    #[error("Display write failed: {0}")]
    Display(#[source] DeviceError),

    /// An outbound dashboard request failed at the transport level
    #[error("HTTP request to {url} failed: {source}")]
    Http {
        /// The request that was attempted
        url: String,
        /// Transport failure
        #[source]
        source: DeviceError,
    },

    /// The network link rejected an association request
    #[error("Link error: {0}")]
    Link(#[source] DeviceError),

    /// A channel endpoint was dropped while an activity still used it
    #[error("Channel closed: {channel}")]
    ChannelClosed {
        /// Which channel closed
        channel: String,
    },

    /// Configuration could not be loaded or is invalid
    #[error("Invalid configuration: {message}")]
    Config {
        /// Description of the problem
        message: String,
    },

    /// An operation was attempted in a state that does not allow it
    #[error("Invalid state: {message}")]
    InvalidState {
        /// Description of the invalid state
        message: String,
    },
}

impl MonitorError {
    /// Create a configuration error with the given message
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create an invalid state error with the given message
    pub fn invalid_state(message: impl Into<String>) -> Self {
        Self::InvalidState {
            message: message.into(),
        }
    }

    /// Create a channel-closed error naming the channel
    pub fn channel_closed(channel: impl Into<String>) -> Self {
        Self::ChannelClosed {
            channel: channel.into(),
        }
    }

    /// Create an HTTP error for the given request
    pub fn http(url: impl Into<String>, source: DeviceError) -> Self {
        Self::Http {
            url: url.into(),
            source,
        }
    }

    /// Check if this is a recoverable error
    ///
    /// Recoverable errors are logged by the activity that hit them, which then
    /// carries on with its next natural cycle. Exposed for device drivers and
    /// embedders that want to apply the same policy to their own errors.
    #[must_use]
    pub const fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Self::Display(_) | Self::Http { .. } | Self::Link(_)
        )
    }

    /// Check if this error must halt the monitor
    ///
    /// The monitor handle reports a fatal task error in preference to others.
    #[must_use]
    pub const fn is_fatal(&self) -> bool {
        matches!(
            self,
            Self::Sensor(_) | Self::Config { .. } | Self::InvalidState { .. }
        )
    }
}

/// Specialized Result type for monitor operations
///
/// ```
/// use pulsewatch_error::Result;
///
/// fn process() -> Result<u32> {
///     Ok(10)
/// }
/// ```
pub type Result<T> = std::result::Result<T, MonitorError>;

/// Helper trait for adding context to `Result`s
pub trait ResultExt<T> {
    /// Prefix the error message with `context`
    ///
    /// Only message-bearing variants (`Config`, `InvalidState`) are rewritten.
    /// Device failures keep their source chain untouched.
    ///
    /// # Errors
    /// Returns `Err(MonitorError)` if the underlying result is `Err`.
    fn context(self, context: impl Into<String>) -> Result<T>;

    /// Lazy variant of [`ResultExt::context`]
    ///
    /// # Errors
    /// Returns `Err(MonitorError)` if the underlying result is `Err`.
    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String;
}

fn prefix(error: MonitorError, context: String) -> MonitorError {
    match error {
        MonitorError::Config { message } => MonitorError::Config {
            message: format!("{context}: {message}"),
        },
        MonitorError::InvalidState { message } => MonitorError::InvalidState {
            message: format!("{context}: {message}"),
        },
        other => other,
    }
}

impl<T, E> ResultExt<T> for std::result::Result<T, E>
where
    E: Into<MonitorError>,
{
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| prefix(e.into(), context.into()))
    }

    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String,
    {
        self.map_err(|e| prefix(e.into(), f()))
    }
}
