//! Integration tests for api_facades crate
//!
//! Every test touches the process-wide subsystem count, so they run one at a
//! time under `SERIAL`.

use adapters_socket::{Candidate, Connector, Resolve};
use api_facades::*;
use frameworks_system_integration::NetworkSubsystem;
use std::io::{Read, Write};
use std::net::{Ipv4Addr, SocketAddr, TcpListener, TcpStream};
use std::sync::{Mutex, MutexGuard};
use std::time::{Duration, Instant};

static SERIAL: Mutex<()> = Mutex::new(());

fn serial() -> MutexGuard<'static, ()> {
    SERIAL.lock().unwrap_or_else(|p| p.into_inner())
}

fn listener() -> (TcpListener, String) {
    let listener = TcpListener::bind((Ipv4Addr::LOCALHOST, 0)).unwrap();
    let port = listener.local_addr().unwrap().port().to_string();
    (listener, port)
}

fn connected() -> (TransportAdapter, TcpStream) {
    let (listener, port) = listener();
    let adapter = TransportAdapter::connect(TransportConfig::new("127.0.0.1", port)).unwrap();
    let (peer, _) = listener.accept().unwrap();
    (adapter, peer)
}

/// Line engine answering every `ping` with `pong` and flagging `bye`
#[derive(Default)]
struct PingPong {
    lines: Vec<String>,
}

impl ProtocolEngine for PingPong {
    fn parse(&mut self, data: &[u8], handler: &mut dyn ConnectionHandler) -> usize {
        let mut consumed = 0;
        while let Some(pos) = data[consumed..].iter().position(|b| *b == b'\n') {
            let line = String::from_utf8_lossy(&data[consumed..consumed + pos]).into_owned();
            consumed += pos + 1;
            match line.as_str() {
                "hello" => handler.on_connected(),
                "ping" => {
                    let _ = handler.on_data(b"pong\n");
                }
                "garbage" => handler.on_error("unexpected line"),
                "bye" => handler.on_closed(),
                _ => {}
            }
            self.lines.push(line);
        }
        consumed
    }
}

fn pump_until(adapter: &mut TransportAdapter, engine: &mut PingPong, lines: usize) {
    let deadline = Instant::now() + Duration::from_secs(5);
    while engine.lines.len() < lines {
        assert!(Instant::now() < deadline, "timed out waiting for lines");
        adapter.wait_and_pump(engine, None).unwrap();
    }
}

fn read_exact_from(peer: &mut TcpStream, len: usize) -> Vec<u8> {
    peer.set_read_timeout(Some(Duration::from_secs(5))).unwrap();
    let mut buf = vec![0; len];
    peer.read_exact(&mut buf).unwrap();
    buf
}

#[test]
fn test_session_round_trip() {
    let _serial = serial();
    let (mut adapter, mut peer) = connected();
    let mut engine = PingPong::default();

    peer.write_all(b"hello\nping\npi").unwrap();
    pump_until(&mut adapter, &mut engine, 2);
    assert_eq!(adapter.state(), SessionState::Connected);
    assert_eq!(adapter.buffered(), b"pi");
    assert_eq!(read_exact_from(&mut peer, 5), b"pong\n");

    peer.write_all(b"ng\nbye\n").unwrap();
    pump_until(&mut adapter, &mut engine, 4);
    assert_eq!(engine.lines, vec!["hello", "ping", "ping", "bye"]);
    assert_eq!(adapter.state(), SessionState::Closed);
    assert!(adapter.buffered().is_empty());
}

#[test]
fn test_idle_pump_returns_false() {
    let _serial = serial();
    let (mut adapter, _peer) = connected();
    let mut engine = PingPong::default();

    for _ in 0..10 {
        assert!(!adapter.pump(&mut engine).unwrap());
    }
    assert!(!adapter.wait_and_pump(&mut engine, Some(Duration::from_millis(5))).unwrap());
}

#[test]
fn test_engine_error_is_reported_by_next_pump() {
    let _serial = serial();
    let (mut adapter, mut peer) = connected();
    let mut engine = PingPong::default();

    peer.write_all(b"garbage\n").unwrap();
    let deadline = Instant::now() + Duration::from_secs(5);
    let err = loop {
        assert!(Instant::now() < deadline, "engine error never surfaced");
        match adapter.wait_and_pump(&mut engine, None) {
            Ok(_) => continue,
            Err(err) => break err,
        }
    };

    assert_eq!(err.kind(), TransportErrorKind::Protocol);
    assert_eq!(err.phase(), Phase::Protocol);
    assert_eq!(adapter.state(), SessionState::Failed);
    assert_eq!(adapter.pump(&mut engine).unwrap_err(), err);
    assert_eq!(adapter.send(b"late").unwrap_err(), err);
}

#[test]
fn test_direct_send_and_handler() {
    let _serial = serial();
    let (mut adapter, mut peer) = connected();

    adapter.send(b"").unwrap();
    adapter.send(b"abc").unwrap();
    adapter.handler().on_data(b"def").unwrap();
    assert_eq!(read_exact_from(&mut peer, 6), b"abcdef");
}

#[test]
fn test_peer_close_is_recorded() {
    let _serial = serial();
    let (mut adapter, peer) = connected();
    let mut engine = PingPong::default();
    drop(peer);

    let deadline = Instant::now() + Duration::from_secs(5);
    while !adapter.peer_closed() {
        assert!(Instant::now() < deadline, "peer close never observed");
        assert!(!adapter.wait_and_pump(&mut engine, None).unwrap());
    }
    assert!(adapter.failure().is_none());
}

#[test]
fn test_close_shuts_down_write_half() {
    let _serial = serial();
    let before = NetworkSubsystem::active_users();
    let (adapter, mut peer) = connected();

    adapter.close().unwrap();
    assert_eq!(NetworkSubsystem::active_users(), before);

    peer.set_read_timeout(Some(Duration::from_secs(5))).unwrap();
    let mut rest = Vec::new();
    assert_eq!(peer.read_to_end(&mut rest).unwrap(), 0);
}

#[test]
fn test_drop_closes_connection() {
    let _serial = serial();
    let (adapter, mut peer) = connected();
    drop(adapter);

    peer.set_read_timeout(Some(Duration::from_secs(5))).unwrap();
    let mut buf = [0u8; 8];
    assert_eq!(peer.read(&mut buf).unwrap(), 0);
}

#[test]
fn test_failed_connect_releases_subsystem() {
    let _serial = serial();
    let before = NetworkSubsystem::active_users();

    let port = {
        let (_listener, port) = listener();
        port
    };
    let err = TransportAdapter::connect(TransportConfig::new("127.0.0.1", port)).unwrap_err();
    assert_eq!(err.kind(), TransportErrorKind::Connect);
    assert_eq!(err.phase(), Phase::Connect);
    assert_eq!(NetworkSubsystem::active_users(), before);

    let err = TransportAdapter::connect(TransportConfig::new("no-such-host.invalid", "80")).unwrap_err();
    assert_eq!(err.kind(), TransportErrorKind::Resolve);
    assert_eq!(NetworkSubsystem::active_users(), before);
}

#[test]
fn test_subsystem_count_follows_adapters() {
    let _serial = serial();
    let before = NetworkSubsystem::active_users();

    let (first, _first_peer) = connected();
    let (second, _second_peer) = connected();
    assert_eq!(NetworkSubsystem::active_users(), before + 2);

    drop(first);
    assert_eq!(NetworkSubsystem::active_users(), before + 1);
    drop(second);
    assert_eq!(NetworkSubsystem::active_users(), before);
}

struct FixedResolver(Vec<SocketAddr>);

impl Resolve for FixedResolver {
    fn resolve(&self, _host: &str, _port: &str) -> TransportResult<Vec<Candidate>> {
        Ok(self.0.iter().copied().map(Candidate::tcp).collect())
    }
}

#[test]
fn test_connect_with_custom_resolver() {
    let _serial = serial();
    let (listener, _port) = listener();
    let target = listener.local_addr().unwrap();
    let connector = Connector::with_resolver(FixedResolver(vec![target]));

    let adapter = TransportAdapter::connect_with(&connector, TransportConfig::new("ignored", "0")).unwrap();
    let _peer = listener.accept().unwrap();
    assert_eq!(adapter.peer_addr(), Some(target));
    assert!(adapter.local_addr().is_some());
}
