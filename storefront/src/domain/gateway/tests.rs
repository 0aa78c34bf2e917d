//! Retry and re-authentication behaviour of the gateway.

use std::sync::atomic::{AtomicBool, AtomicUsize};

use async_trait::async_trait;
use mockall::Sequence;
use rstest::{fixture, rstest};
use tokio::sync::Barrier;

use super::*;
use crate::domain::ports::{MockHttpTransport, MockTokenProvider, TransportError};

const MENU_PATH: &str = "/api/menu";

#[fixture]
fn menu_request() -> ApiRequest {
    ApiRequest::get(MENU_PATH)
}

fn gateway(transport: MockHttpTransport, provider: MockTokenProvider) -> AuthenticatedGateway {
    AuthenticatedGateway::new(Arc::new(transport), Arc::new(provider))
}

fn respond(transport: &mut MockHttpTransport, seq: &mut Sequence, status: u16, body: &'static str) {
    transport
        .expect_execute()
        .withf(|request| request.path() == MENU_PATH)
        .times(1)
        .in_sequence(seq)
        .returning(move |_| Ok(ApiResponse::new(status, body)));
}

#[rstest]
#[case::ok(200, "[]")]
#[case::created(201, "{}")]
#[case::no_content(204, "")]
#[tokio::test]
async fn success_responses_are_returned_verbatim_without_retry(
    menu_request: ApiRequest,
    #[case] status: u16,
    #[case] body: &'static str,
) {
    let mut seq = Sequence::new();
    let mut transport = MockHttpTransport::new();
    respond(&mut transport, &mut seq, status, body);
    let mut provider = MockTokenProvider::new();
    provider.expect_authenticate().times(0);

    let response = gateway(transport, provider)
        .send(&menu_request)
        .await
        .expect("success passes through");

    assert_eq!(response, ApiResponse::new(status, body));
}

#[rstest]
#[case::forbidden(403)]
#[case::not_found(404)]
#[case::server_error(500)]
#[tokio::test]
async fn non_401_failures_are_not_retried(menu_request: ApiRequest, #[case] status: u16) {
    let mut seq = Sequence::new();
    let mut transport = MockHttpTransport::new();
    respond(&mut transport, &mut seq, status, r#"{"message":"nope"}"#);
    let mut provider = MockTokenProvider::new();
    provider.expect_authenticate().times(0);

    let error = gateway(transport, provider)
        .send(&menu_request)
        .await
        .expect_err("non-2xx fails");

    assert_eq!(
        error,
        GatewayError::api(status, "nope", None::<String>),
        "status {status} should surface as an Api error"
    );
}

#[rstest]
#[tokio::test]
async fn unauthorized_then_reauth_retries_exactly_once(menu_request: ApiRequest) {
    let mut seq = Sequence::new();
    let mut transport = MockHttpTransport::new();
    respond(&mut transport, &mut seq, 401, "");
    respond(&mut transport, &mut seq, 200, r#"[{"id":1}]"#);
    let mut provider = MockTokenProvider::new();
    provider.expect_authenticate().times(1).returning(|| true);

    let gateway = gateway(transport, provider);
    let response = gateway.send(&menu_request).await.expect("retry succeeds");

    assert_eq!(response.body(), br#"[{"id":1}]"#);
    assert_eq!(gateway.reauthentication_epoch(), 1);
}

#[rstest]
#[tokio::test]
async fn failed_reauth_is_terminal(menu_request: ApiRequest) {
    let mut seq = Sequence::new();
    let mut transport = MockHttpTransport::new();
    respond(&mut transport, &mut seq, 401, "");
    let mut provider = MockTokenProvider::new();
    provider.expect_authenticate().times(1).returning(|| false);

    let error = gateway(transport, provider)
        .send(&menu_request)
        .await
        .expect_err("authentication fails");

    assert_eq!(error, GatewayError::authentication());
    assert_eq!(error.to_string(), "Authentication failed");
}

#[rstest]
#[tokio::test]
async fn second_401_after_retry_is_terminal(menu_request: ApiRequest) {
    let mut seq = Sequence::new();
    let mut transport = MockHttpTransport::new();
    respond(&mut transport, &mut seq, 401, "");
    respond(&mut transport, &mut seq, 401, "");
    let mut provider = MockTokenProvider::new();
    provider.expect_authenticate().times(1).returning(|| true);

    let error = gateway(transport, provider)
        .send(&menu_request)
        .await
        .expect_err("second 401 fails");

    assert_eq!(error.status(), Some(401));
}

#[rstest]
#[tokio::test]
async fn transport_failures_surface_immediately(menu_request: ApiRequest) {
    let mut transport = MockHttpTransport::new();
    transport
        .expect_execute()
        .times(1)
        .returning(|_| Err(TransportError::connection("dns lookup failed")));
    let mut provider = MockTokenProvider::new();
    provider.expect_authenticate().times(0);

    let error = gateway(transport, provider)
        .send(&menu_request)
        .await
        .expect_err("transport fails");

    assert!(matches!(error, GatewayError::Transport { .. }));
}

#[rstest]
#[tokio::test]
async fn transport_failure_on_retry_is_not_retried_again(menu_request: ApiRequest) {
    let mut seq = Sequence::new();
    let mut transport = MockHttpTransport::new();
    respond(&mut transport, &mut seq, 401, "");
    transport
        .expect_execute()
        .times(1)
        .in_sequence(&mut seq)
        .returning(|_| Err(TransportError::timeout("30s")));
    let mut provider = MockTokenProvider::new();
    provider.expect_authenticate().times(1).returning(|| true);

    let error = gateway(transport, provider)
        .send(&menu_request)
        .await
        .expect_err("retry times out");

    assert!(matches!(error, GatewayError::Transport { .. }));
}

#[rstest]
#[tokio::test]
async fn later_session_expiry_triggers_a_fresh_reauth(menu_request: ApiRequest) {
    let mut seq = Sequence::new();
    let mut transport = MockHttpTransport::new();
    respond(&mut transport, &mut seq, 401, "");
    respond(&mut transport, &mut seq, 200, "[]");
    respond(&mut transport, &mut seq, 401, "");
    respond(&mut transport, &mut seq, 200, "[]");
    let mut provider = MockTokenProvider::new();
    provider.expect_authenticate().times(2).returning(|| true);

    let gateway = gateway(transport, provider);
    gateway.send(&menu_request).await.expect("first call");
    gateway.send(&menu_request).await.expect("second call");

    assert_eq!(gateway.reauthentication_epoch(), 2);
}

/// Transport that rejects every request until the session is marked valid.
///
/// Rejections wait on a barrier so both concurrent callers observe their
/// `401` before either re-authenticates.
struct ExpiringSessionTransport {
    session_valid: Arc<AtomicBool>,
    rejections: Barrier,
    calls: AtomicUsize,
}

#[async_trait]
impl HttpTransport for ExpiringSessionTransport {
    async fn execute(&self, _request: &ApiRequest) -> Result<ApiResponse, TransportError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.session_valid.load(Ordering::SeqCst) {
            return Ok(ApiResponse::new(200, "[]"));
        }
        self.rejections.wait().await;
        Ok(ApiResponse::new(401, ""))
    }
}

struct CountingProvider {
    session_valid: Arc<AtomicBool>,
    calls: AtomicUsize,
    succeeds: bool,
}

#[async_trait]
impl TokenProvider for CountingProvider {
    async fn authenticate(&self) -> bool {
        self.calls.fetch_add(1, Ordering::SeqCst);
        tokio::task::yield_now().await;
        if self.succeeds {
            self.session_valid.store(true, Ordering::SeqCst);
        }
        self.succeeds
    }
}

fn concurrent_fixture(succeeds: bool) -> (Arc<ExpiringSessionTransport>, Arc<CountingProvider>) {
    let session_valid = Arc::new(AtomicBool::new(false));
    let transport = Arc::new(ExpiringSessionTransport {
        session_valid: Arc::clone(&session_valid),
        rejections: Barrier::new(2),
        calls: AtomicUsize::new(0),
    });
    let provider = Arc::new(CountingProvider {
        session_valid,
        calls: AtomicUsize::new(0),
        succeeds,
    });
    (transport, provider)
}

#[rstest]
#[tokio::test]
async fn concurrent_401s_share_one_reauthentication(menu_request: ApiRequest) {
    let (transport, provider) = concurrent_fixture(true);
    let gateway = AuthenticatedGateway::new(transport.clone(), provider.clone());

    let (first, second) =
        futures::future::join(gateway.send(&menu_request), gateway.send(&menu_request)).await;

    assert!(first.is_ok(), "first call should succeed: {first:?}");
    assert!(second.is_ok(), "second call should succeed: {second:?}");
    assert_eq!(provider.calls.load(Ordering::SeqCst), 1);
    assert_eq!(transport.calls.load(Ordering::SeqCst), 4);
    assert_eq!(gateway.reauthentication_epoch(), 1);
}

#[rstest]
#[tokio::test]
async fn concurrent_callers_share_a_failed_reauthentication(menu_request: ApiRequest) {
    let (transport, provider) = concurrent_fixture(false);
    let gateway = AuthenticatedGateway::new(transport.clone(), provider.clone());

    let (first, second) =
        futures::future::join(gateway.send(&menu_request), gateway.send(&menu_request)).await;

    assert_eq!(first, Err(GatewayError::authentication()));
    assert_eq!(second, Err(GatewayError::authentication()));
    assert_eq!(provider.calls.load(Ordering::SeqCst), 1);
    assert_eq!(transport.calls.load(Ordering::SeqCst), 2);
}
