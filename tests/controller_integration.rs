// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Integration tests for the controller against a scripted transport.

use std::collections::HashMap;
use std::time::Duration;

use dali_host::error::TransportError;
use dali_host::transport::Transport;
use dali_host::{
    Controller, ControllerConfig, Error, Frame, GroupEntry, SceneEntry, Target, parse_frames,
};

const TIMEOUT: Duration = Duration::from_millis(50);

/// Records every frame and answers from a fixed table.
#[derive(Debug, Default)]
struct ScriptedTransport {
    connected: bool,
    sent: Vec<Frame>,
    pending: Option<Frame>,
    answers: HashMap<Frame, Vec<u8>>,
    attempts: usize,
    fail_at: Option<usize>,
}

impl ScriptedTransport {
    fn connected() -> Self {
        Self {
            connected: true,
            ..Self::default()
        }
    }

    fn answer(mut self, frame: Frame, response: &[u8]) -> Self {
        self.answers.insert(frame, response.to_vec());
        self
    }

    /// Makes the n-th send attempt (zero-based) fail.
    fn fail_at(mut self, index: usize) -> Self {
        self.fail_at = Some(index);
        self
    }
}

impl Transport for ScriptedTransport {
    async fn connect(&mut self) -> Result<(), TransportError> {
        self.connected = true;
        Ok(())
    }

    async fn disconnect(&mut self) -> Result<(), TransportError> {
        self.connected = false;
        Ok(())
    }

    async fn send(&mut self, frame: Frame) -> Result<(), TransportError> {
        if !self.connected {
            return Err(TransportError::NotConnected);
        }
        let attempt = self.attempts;
        self.attempts += 1;
        if self.fail_at == Some(attempt) {
            return Err(std::io::Error::from(std::io::ErrorKind::BrokenPipe).into());
        }
        self.sent.push(frame);
        self.pending = Some(frame);
        Ok(())
    }

    async fn recv(&mut self, _timeout: Duration) -> Result<Option<Vec<u8>>, TransportError> {
        Ok(self
            .pending
            .take()
            .and_then(|frame| self.answers.get(&frame).cloned()))
    }

    fn is_connected(&self) -> bool {
        self.connected
    }
}

fn sent(controller: &Controller<ScriptedTransport>) -> Vec<[u8; 2]> {
    controller
        .transport()
        .sent
        .iter()
        .map(|f| *f.as_bytes())
        .collect()
}

// ============================================================================
// Frame sequences
// ============================================================================

mod sequences {
    use super::*;

    #[tokio::test]
    async fn scene_store_level_exact_order() {
        let mut controller = Controller::new(ScriptedTransport::connected());
        controller
            .scene_store_level(Target::short(1), 2, 128)
            .await
            .unwrap();
        assert_eq!(
            sent(&controller),
            vec![[0x03, 0xA3], [0x02, 0x80], [0x03, 0xA3], [0x03, 0x52]]
        );
    }

    #[tokio::test]
    async fn tc_4000k_broadcast() {
        let mut controller = Controller::new(ScriptedTransport::connected());
        let setting = controller
            .dt8_set_tc_kelvin(Target::broadcast(), 4000)
            .await
            .unwrap();
        assert_eq!(setting.mirek, 250);
        assert_eq!(
            sent(&controller),
            vec![[0xA3, 0xFA], [0xC3, 0x00], [0xC1, 0x08], [0xFF, 0xE7]]
        );
    }

    #[tokio::test]
    async fn rgbw_is_twelve_frames() {
        let mut controller = Controller::new(ScriptedTransport::connected());
        controller
            .dt8_set_rgbw(Target::short(10), 254, 0, 0, 0)
            .await
            .unwrap();
        let frames = sent(&controller);
        assert_eq!(frames.len(), 12);
        assert_eq!(&frames[..3], &[[0xA3, 0xFE], [0xC1, 0x08], [0x15, 0xE2]]);
        assert_eq!(frames[11], [0x15, 0xE5]);
    }

    #[tokio::test]
    async fn script_text_goes_out_verbatim() {
        let mut controller = Controller::new(ScriptedTransport::connected());
        let frames = parse_frames("A3 FA; C3 00\nC1 08; FF E7").unwrap();
        controller.send_sequence(frames).await.unwrap();
        assert_eq!(
            sent(&controller),
            vec![[0xA3, 0xFA], [0xC3, 0x00], [0xC1, 0x08], [0xFF, 0xE7]]
        );
    }
}

// ============================================================================
// Queries
// ============================================================================

mod queries {
    use super::*;

    #[tokio::test]
    async fn group_membership_from_two_halves() {
        let transport = ScriptedTransport::connected()
            .answer(Frame::new(0x0B, 0xC0), &[0b0000_0101])
            .answer(Frame::new(0x0B, 0xC1), &[0b0000_0001]);
        let mut controller = Controller::new(transport);
        let membership = controller.query_groups(5, TIMEOUT).await.unwrap();
        assert_eq!(membership.groups().collect::<Vec<_>>(), vec![0, 2, 8]);
    }

    #[tokio::test]
    async fn silent_high_half_reads_empty() {
        let transport =
            ScriptedTransport::connected().answer(Frame::new(0x0B, 0xC0), &[0xFF]);
        let mut controller = Controller::new(transport);
        let membership = controller.query_groups(5, TIMEOUT).await.unwrap();
        assert_eq!(
            membership.groups().collect::<Vec<_>>(),
            (0..8).collect::<Vec<u8>>()
        );
    }

    #[tokio::test]
    async fn scan_reports_only_answering_devices() {
        let transport = ScriptedTransport::connected()
            .answer(Frame::new(0x03, 0x90), &[0x04])
            .answer(Frame::new(0x07, 0x90), &[0x00])
            .answer(Frame::new(0x09, 0x90), &[]);
        let mut controller = Controller::new(transport);
        let found = controller.scan_devices(0..=63, TIMEOUT).await.unwrap();
        assert_eq!(found, vec![1, 3]);
        assert_eq!(controller.transport().sent.len(), 64);
    }

    #[tokio::test]
    async fn scan_continues_after_transport_failure() {
        let transport = ScriptedTransport::connected()
            .answer(Frame::new(0x05, 0x90), &[0x04])
            .fail_at(1);
        let mut controller = Controller::new(transport);
        let found = controller.scan_devices(0..4, TIMEOUT).await.unwrap();
        assert_eq!(found, vec![2]);
    }

    #[tokio::test]
    async fn scene_levels_mark_silent_scenes() {
        let transport = ScriptedTransport::connected()
            .answer(Frame::new(0x01, 0xB0), &[10])
            .answer(Frame::new(0x01, 0xBF), &[254]);
        let mut controller = Controller::new(transport);
        let levels = controller.query_scene_levels(0, TIMEOUT).await.unwrap();
        let answered: Vec<(u8, u8)> = levels.answered().map(|(s, l)| (s.value(), l)).collect();
        assert_eq!(answered, vec![(0, 10), (15, 254)]);
    }
}

// ============================================================================
// Failure semantics
// ============================================================================

mod failures {
    use super::*;

    #[tokio::test]
    async fn not_connected_is_reported() {
        let mut controller = Controller::new(ScriptedTransport::default());
        let err = controller.send_arc(Target::broadcast(), 100).await.unwrap_err();
        assert!(matches!(
            err,
            Error::Transport(TransportError::NotConnected)
        ));
        assert!(controller.transport().sent.is_empty());
    }

    #[tokio::test]
    async fn failing_frame_stops_the_sequence() {
        let transport = ScriptedTransport::connected().fail_at(2);
        let mut controller = Controller::new(transport);
        let err = controller
            .dt8_set_xy(Target::broadcast(), 0.3, 0.3)
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Transport(TransportError::Io(_))));
        assert_eq!(controller.transport().sent.len(), 2);
    }

    #[tokio::test]
    async fn invalid_commands_send_nothing() {
        let mut controller = Controller::new(ScriptedTransport::connected());
        assert!(controller.scene_recall(Target::short(0), 16).await.is_err());
        assert!(controller.group_remove(Target::short(0), 99).await.is_err());
        assert!(controller.send_arc(Target::group(16), 1).await.is_err());
        assert!(
            controller
                .dt8_set_primary(Target::broadcast(), "x", 1)
                .await
                .is_err()
        );
        assert!(controller.query_status(64, TIMEOUT).await.is_err());
        assert!(
            controller
                .apply_groups(&[GroupEntry::new(70, [1])], true)
                .await
                .is_err()
        );
        assert!(
            controller
                .apply_scenes(&[SceneEntry::new(1, [(20, 1)])], false)
                .await
                .is_err()
        );
        assert!(controller.transport().sent.is_empty());
    }
}

// ============================================================================
// Configuration
// ============================================================================

mod configuration {
    use super::*;

    #[tokio::test]
    async fn mock_gateway_from_json() {
        let config = ControllerConfig::from_json_str(
            r#"{"gateway": {"type": "mock"}, "ops": {"recall_scene_base": 16}}"#,
        )
        .unwrap();
        let mut controller = Controller::from_config(&config).unwrap();
        controller.connect().await.unwrap();
        assert!(controller.is_connected());

        controller.scene_recall(Target::broadcast(), 1).await.unwrap();
        let dali_host::Gateway::Mock(mock) = controller.transport() else {
            panic!("expected mock gateway");
        };
        assert_eq!(mock.last_sent(), Some(Frame::new(0xFF, 0x11)));

        controller.disconnect().await.unwrap();
        assert!(!controller.is_connected());
    }

    #[tokio::test]
    async fn extra_primary_keeps_rgbw_working() {
        let config = ControllerConfig::from_json_str(
            r#"{"gateway": {"type": "TCP"}, "ops": {"dt8_set_primary": {"a": 234}}}"#,
        )
        .unwrap();
        assert_eq!(config.gateway.kind(), "tcp");

        let mut controller =
            Controller::with_opcodes(ScriptedTransport::connected(), config.ops, config.tc)
                .unwrap();
        controller
            .dt8_set_rgbw(Target::broadcast(), 1, 2, 3, 4)
            .await
            .unwrap();
        controller
            .dt8_set_primary(Target::broadcast(), "A", 5)
            .await
            .unwrap();
        let frames = sent(&controller);
        assert_eq!(frames.len(), 15);
        assert_eq!(frames[2], [0xFF, 0xE2]);
        assert_eq!(frames[11], [0xFF, 0xE5]);
        assert_eq!(frames[14], [0xFF, 0xEA]);
    }

    #[test]
    fn gateway_without_type_is_mock() {
        let config =
            ControllerConfig::from_json_str(r#"{"gateway": {"host": "10.0.0.9"}}"#).unwrap();
        assert_eq!(config.gateway, dali_host::GatewayConfig::Mock);
    }

    #[tokio::test]
    async fn serial_gateway_fails_fast() {
        let config =
            ControllerConfig::from_json_str(r#"{"gateway": {"type": "serial"}}"#).unwrap();
        let mut controller = Controller::from_config(&config).unwrap();
        assert!(matches!(
            controller.connect().await,
            Err(Error::Transport(TransportError::NotImplemented("serial")))
        ));
        assert!(!controller.is_connected());
    }
}
