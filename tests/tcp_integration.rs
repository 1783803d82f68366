// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Integration tests for the TCP gateway transport against a local listener.

#![cfg(feature = "tcp")]

use std::time::Duration;

use dali_host::config::{GatewayConfig, TcpConfig};
use dali_host::error::TransportError;
use dali_host::{Controller, ControllerConfig, Error, Target};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tokio::sync::mpsc;

/// A fake gateway: reports every received frame and answers status
/// queries to short address 1 with `0x04`.
async fn spawn_gateway() -> (TcpConfig, mpsc::UnboundedReceiver<[u8; 2]>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();
    let (tx, rx) = mpsc::unbounded_channel();

    tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();
        let mut frame = [0u8; 2];
        while socket.read_exact(&mut frame).await.is_ok() {
            if frame == [0x03, 0x90] {
                socket.write_all(&[0x04]).await.unwrap();
            }
            if tx.send(frame).is_err() {
                break;
            }
        }
    });

    let config = TcpConfig::new("127.0.0.1")
        .with_port(port)
        .with_timeout(Duration::from_millis(500));
    (config, rx)
}

async fn controller_for(config: TcpConfig) -> Controller {
    let config = ControllerConfig::new(GatewayConfig::Tcp(config));
    let mut controller = Controller::from_config(&config).unwrap();
    controller.connect().await.unwrap();
    controller
}

#[tokio::test]
async fn frames_reach_the_gateway_in_order() {
    let (config, mut rx) = spawn_gateway().await;
    let mut controller = controller_for(config).await;

    controller
        .scene_store_level(Target::short(1), 2, 128)
        .await
        .unwrap();

    let mut received = Vec::new();
    for _ in 0..4 {
        received.push(rx.recv().await.unwrap());
    }
    assert_eq!(
        received,
        vec![[0x03, 0xA3], [0x02, 0x80], [0x03, 0xA3], [0x03, 0x52]]
    );
}

#[tokio::test]
async fn query_answer_and_silence() {
    let (config, _rx) = spawn_gateway().await;
    let mut controller = controller_for(config).await;

    let answer = controller
        .query_status(1, Duration::from_millis(500))
        .await
        .unwrap();
    assert_eq!(answer, Some(vec![0x04]));

    let answer = controller
        .query_status(2, Duration::from_millis(50))
        .await
        .unwrap();
    assert_eq!(answer, None);
}

#[tokio::test]
async fn connect_refused_is_an_error() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();
    drop(listener);

    let config = ControllerConfig::new(GatewayConfig::Tcp(
        TcpConfig::new("127.0.0.1")
            .with_port(port)
            .with_timeout(Duration::from_millis(500)),
    ));
    let mut controller = Controller::from_config(&config).unwrap();
    let err = controller.connect().await.unwrap_err();
    assert!(matches!(
        err,
        Error::Transport(TransportError::ConnectionFailed(_))
    ));
    assert!(!controller.is_connected());
}

#[tokio::test]
async fn disconnect_then_send_fails() {
    let (config, _rx) = spawn_gateway().await;
    let mut controller = controller_for(config).await;
    controller.disconnect().await.unwrap();
    assert!(matches!(
        controller.send_arc(Target::broadcast(), 0).await,
        Err(Error::Transport(TransportError::NotConnected))
    ));
}
