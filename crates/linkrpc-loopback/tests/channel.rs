//! Channel + loopback integration tests.
//!
//! Each test wires a `Channel` with a `LogicalRetryPolicy` to an in-process
//! server and checks what the caller sees and how often the handler ran.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use linkrpc_core::codes;
use linkrpc_core::{
    Channel, ChannelConfig, ErrorCode, LogicalRetryPolicy, MuxPushRequest, RetryConfig,
    SimpleAuthenticator, TransportError,
};
use linkrpc_loopback::{LoopbackServer, LoopbackTransport, ScriptedHandler};

// ─── Helpers ──────────────────────────────────────────────────────────────────

const SECRET: &str = "secret123";

fn peer() -> SocketAddr {
    "127.0.0.1:6100".parse().unwrap()
}

fn server(handler: Arc<ScriptedHandler>) -> Arc<LoopbackServer> {
    Arc::new(LoopbackServer::new(handler).with_authenticator(Arc::new(SimpleAuthenticator::new(SECRET))))
}

fn channel(transport: LoopbackTransport, max_retry: u32) -> Channel {
    Channel::new(
        Arc::new(transport),
        ChannelConfig {
            timeout: Duration::from_secs(2),
            max_retry,
        },
    )
    .with_authenticator(&SimpleAuthenticator::new(SECRET))
    .with_retry_policy(Arc::new(LogicalRetryPolicy::with_delay(Duration::from_millis(2))))
}

fn push() -> MuxPushRequest {
    MuxPushRequest::new("link-7", 1, "round-0", b"payload".to_vec())
}

// ─── Application-level outcomes ───────────────────────────────────────────────

#[tokio::test]
async fn recovers_after_unexpected_errors() {
    let handler = Arc::new(ScriptedHandler::failing(ErrorCode::UnexpectedError, 2));
    let ch = channel(LoopbackTransport::new(server(handler.clone()), peer()), 3);

    let resp = ch.push(push()).await.unwrap();
    assert!(resp.is_success());
    assert_eq!(handler.calls(), 3);
}

#[tokio::test]
async fn gives_up_when_budget_runs_out() {
    let handler = Arc::new(ScriptedHandler::failing(ErrorCode::UnexpectedError, 5));
    let ch = channel(LoopbackTransport::new(server(handler.clone()), peer()), 1);

    let resp = ch.push(push()).await.unwrap();
    assert_eq!(resp.error_code, ErrorCode::UnexpectedError);
    assert_eq!(handler.calls(), 2);
}

#[tokio::test]
async fn invalid_request_is_returned_at_once() {
    let handler = Arc::new(ScriptedHandler::failing(ErrorCode::InvalidRequest, 1));
    let ch = channel(LoopbackTransport::new(server(handler.clone()), peer()), 3);

    let resp = ch.push(push()).await.unwrap();
    assert_eq!(resp.error_code, ErrorCode::InvalidRequest);
    assert_eq!(handler.calls(), 1);
}

#[tokio::test]
async fn extra_retryable_codes() {
    let handler = Arc::new(ScriptedHandler::failing(ErrorCode::LinkIdNotFound, 1));
    let policy = LogicalRetryPolicy::new(RetryConfig {
        retry_delay: Duration::ZERO,
        retryable_codes: vec![ErrorCode::UnexpectedError, ErrorCode::LinkIdNotFound],
    });
    let ch = channel(LoopbackTransport::new(server(handler.clone()), peer()), 3)
        .with_retry_policy(Arc::new(policy));

    assert!(ch.push(push()).await.unwrap().is_success());
    assert_eq!(handler.calls(), 2);
}

// ─── Transport-level outcomes ─────────────────────────────────────────────────

#[tokio::test]
async fn connection_faults_are_retried() {
    let handler = Arc::new(ScriptedHandler::default());
    let transport = LoopbackTransport::new(server(handler.clone()), peer())
        .with_faults([codes::ECONNREFUSED, codes::EFAILEDSOCKET]);
    let ch = channel(transport, 3);

    assert!(ch.push(push()).await.unwrap().is_success());
    assert_eq!(handler.calls(), 1);
}

#[tokio::test]
async fn attempts_count_faulted_sends() {
    let handler = Arc::new(ScriptedHandler::failing(ErrorCode::UnexpectedError, 1));
    let transport = Arc::new(
        LoopbackTransport::new(server(handler.clone()), peer())
            .with_faults([codes::ECONNRESET, codes::EEOF]),
    );
    let ch = Channel::new(transport.clone(), ChannelConfig::default())
        .with_authenticator(&SimpleAuthenticator::new(SECRET))
        .with_retry_policy(Arc::new(LogicalRetryPolicy::with_delay(Duration::ZERO)));

    assert!(ch.push(push()).await.unwrap().is_success());
    assert_eq!(transport.attempts(), 4);
    assert_eq!(handler.calls(), 2);
}

#[tokio::test]
async fn deadline_fault_is_not_retried() {
    let handler = Arc::new(ScriptedHandler::default());
    let transport = LoopbackTransport::new(server(handler.clone()), peer())
        .with_faults([codes::ERPCTIMEDOUT]);
    let ch = channel(transport, 3);

    let err = ch.push(push()).await.unwrap_err();
    assert_eq!(err.code(), Some(codes::ERPCTIMEDOUT));
    assert_eq!(handler.calls(), 0);
}

#[tokio::test]
async fn wrong_credential_is_rejected_once() {
    let handler = Arc::new(ScriptedHandler::default());
    let ch = channel(LoopbackTransport::new(server(handler.clone()), peer()), 3)
        .with_authenticator(&SimpleAuthenticator::new("secret124"));

    let err = ch.push(push()).await.unwrap_err();
    assert!(matches!(err, TransportError::Call { code: codes::ERPCAUTH, .. }));
    assert!(!err.is_retryable());
    assert_eq!(handler.calls(), 0);
}

#[tokio::test]
async fn slow_link_hits_call_timeout() {
    let handler = Arc::new(ScriptedHandler::failing(ErrorCode::UnexpectedError, 10));
    let transport = LoopbackTransport::new(server(handler.clone()), peer())
        .with_latency(Duration::from_millis(5));
    let ch = Channel::new(
        Arc::new(transport),
        ChannelConfig {
            timeout: Duration::from_millis(50),
            max_retry: 10,
        },
    )
    .with_authenticator(&SimpleAuthenticator::new(SECRET))
    .with_retry_policy(Arc::new(LogicalRetryPolicy::with_delay(Duration::from_millis(100))));

    let err = ch.push(push()).await.unwrap_err();
    assert!(matches!(err, TransportError::Timeout { ms: 50 }));
    assert_eq!(handler.calls(), 1);
}

#[tokio::test]
async fn many_calls_in_flight() {
    let handler = Arc::new(ScriptedHandler::failing(ErrorCode::UnexpectedError, 8));
    let ch = Arc::new(channel(
        LoopbackTransport::new(server(handler.clone()), peer()),
        10,
    ));

    let calls = (0..8).map(|i| {
        let ch = ch.clone();
        tokio::spawn(async move {
            ch.push(MuxPushRequest::new("link-7", 1, format!("round-{i}"), Vec::new()))
                .await
        })
    });
    for joined in futures::future::join_all(calls).await {
        assert!(joined.unwrap().unwrap().is_success());
    }
    assert_eq!(handler.calls(), 16);
}
