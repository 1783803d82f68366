// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! In-memory loopback transport.

use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;

use super::Transport;
use crate::error::TransportError;
use crate::frame::Frame;

/// Longest time [`MockTransport::recv`] waits before answering.
const MOCK_LATENCY: Duration = Duration::from_millis(50);

/// Shared view of the frames a [`MockTransport`] has sent.
///
/// Clones share the same log, so a handle taken before the transport is
/// moved into a controller keeps observing it.
#[derive(Debug, Clone, Default)]
pub struct MockLog {
    frames: Arc<Mutex<Vec<Frame>>>,
}

impl MockLog {
    /// Returns a copy of every frame sent so far, oldest first.
    #[must_use]
    pub fn frames(&self) -> Vec<Frame> {
        self.frames.lock().clone()
    }

    /// Returns the most recently sent frame.
    #[must_use]
    pub fn last(&self) -> Option<Frame> {
        self.frames.lock().last().copied()
    }

    /// Returns the number of frames sent.
    #[must_use]
    pub fn len(&self) -> usize {
        self.frames.lock().len()
    }

    /// Returns true if nothing was sent.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.frames.lock().is_empty()
    }

    /// Forgets all recorded frames.
    pub fn clear(&self) {
        self.frames.lock().clear();
    }

    fn push(&self, frame: Frame) {
        self.frames.lock().push(frame);
    }
}

/// A transport that talks to nothing.
///
/// Every query is answered after a short delay with one byte, the XOR of
/// the last frame's address and data bytes. Useful for exercising the
/// controller without hardware.
///
/// # Examples
///
/// ```
/// use std::time::Duration;
/// use dali_host::frame::Frame;
/// use dali_host::transport::{MockTransport, Transport};
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() {
/// let mut mock = MockTransport::new();
/// mock.connect().await.unwrap();
/// mock.send(Frame::new(0x01, 0x90)).await.unwrap();
/// let answer = mock.recv(Duration::from_millis(10)).await.unwrap();
/// assert_eq!(answer, Some(vec![0x91]));
/// # }
/// ```
#[derive(Debug, Default)]
pub struct MockTransport {
    connected: bool,
    last_sent: Option<Frame>,
    log: MockLog,
}

impl MockTransport {
    /// Creates a disconnected mock.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a handle to the sent-frame log.
    #[must_use]
    pub fn log(&self) -> MockLog {
        self.log.clone()
    }

    /// Returns the last frame sent, if any.
    #[must_use]
    pub const fn last_sent(&self) -> Option<Frame> {
        self.last_sent
    }
}

impl Transport for MockTransport {
    async fn connect(&mut self) -> Result<(), TransportError> {
        self.connected = true;
        tracing::info!(transport = "mock", "Connected");
        Ok(())
    }

    async fn disconnect(&mut self) -> Result<(), TransportError> {
        self.connected = false;
        tracing::info!(transport = "mock", "Disconnected");
        Ok(())
    }

    async fn send(&mut self, frame: Frame) -> Result<(), TransportError> {
        if !self.connected {
            return Err(TransportError::NotConnected);
        }
        tracing::trace!(transport = "mock", frame = %frame, "Sent frame");
        self.last_sent = Some(frame);
        self.log.push(frame);
        Ok(())
    }

    async fn recv(&mut self, timeout: Duration) -> Result<Option<Vec<u8>>, TransportError> {
        tokio::time::sleep(timeout.min(MOCK_LATENCY)).await;
        Ok(self
            .last_sent
            .map(|frame| vec![frame.address() ^ frame.data()]))
    }

    fn is_connected(&self) -> bool {
        self.connected
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn send_requires_connection() {
        let mut mock = MockTransport::new();
        let log = mock.log();
        let result = mock.send(Frame::new(0xFE, 0x00)).await;
        assert!(matches!(result, Err(TransportError::NotConnected)));
        assert!(log.is_empty());
        assert_eq!(mock.last_sent(), None);
    }

    #[tokio::test(start_paused = true)]
    async fn recv_without_traffic_is_none() {
        let mut mock = MockTransport::new();
        assert_eq!(mock.recv(Duration::from_secs(5)).await.unwrap(), None);
    }

    #[tokio::test(start_paused = true)]
    async fn recv_waits_at_most_latency() {
        let mut mock = MockTransport::new();
        mock.connect().await.unwrap();
        mock.send(Frame::new(0x03, 0x90)).await.unwrap();

        let start = tokio::time::Instant::now();
        let answer = mock.recv(Duration::from_secs(5)).await.unwrap();
        assert_eq!(answer, Some(vec![0x93]));
        let elapsed = start.elapsed();
        assert!(elapsed >= MOCK_LATENCY && elapsed < Duration::from_secs(1));
    }

    #[tokio::test]
    async fn log_is_shared_between_clones() {
        let mut mock = MockTransport::new();
        let log = mock.log();
        mock.connect().await.unwrap();
        mock.send(Frame::new(1, 2)).await.unwrap();
        mock.send(Frame::new(3, 4)).await.unwrap();
        assert_eq!(log.frames(), vec![Frame::new(1, 2), Frame::new(3, 4)]);
        assert_eq!(log.last(), Some(Frame::new(3, 4)));
        log.clear();
        assert_eq!(log.len(), 0);
    }
}
