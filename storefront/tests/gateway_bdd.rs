//! Behaviour tests for the authenticated gateway and the action wrapper.
//!
//! The backend is scripted response by response so each scenario controls
//! exactly when the session expires and whether re-authentication works.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use rstest::fixture;
use rstest_bdd_macros::{given, scenario, then, when};
use storefront::domain::ports::{HttpTransport, TokenProvider, TransportError};
use storefront::domain::{
    ActionFailure, ActionResult, ApiRequest, ApiResponse, AuthenticatedGateway, MenuItem,
    StorefrontActions,
};
use tokio::runtime::{Builder, Runtime};

const VALID_MENU: &str = r#"[
    {"id": 1, "name": "Margherita", "price": 9.5, "category": "Pizza"},
    {"id": 2, "name": "Tiramisu", "price": 6, "category": "Desserts", "isFavorite": true}
]"#;
const MALFORMED_MENU: &str = r#"[{"id": 1, "name": "Soup", "price": -2, "category": "Starters"}]"#;

#[derive(Default)]
struct ScriptedTransport {
    responses: Mutex<VecDeque<ApiResponse>>,
    calls: AtomicUsize,
}

impl ScriptedTransport {
    fn push(&self, response: ApiResponse) {
        self.responses
            .lock()
            .expect("script lock")
            .push_back(response);
    }
}

#[async_trait]
impl HttpTransport for ScriptedTransport {
    async fn execute(&self, _request: &ApiRequest) -> Result<ApiResponse, TransportError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.responses
            .lock()
            .expect("script lock")
            .pop_front()
            .ok_or_else(|| TransportError::connection("no scripted response left"))
    }
}

struct ScriptedProvider {
    succeeds: AtomicBool,
    calls: AtomicUsize,
}

#[async_trait]
impl TokenProvider for ScriptedProvider {
    async fn authenticate(&self) -> bool {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.succeeds.load(Ordering::SeqCst)
    }
}

struct GatewayWorld {
    runtime: Runtime,
    transport: Arc<ScriptedTransport>,
    provider: Arc<ScriptedProvider>,
    outcome: RefCell<Option<ActionResult<Vec<MenuItem>>>>,
}

impl GatewayWorld {
    fn new() -> Self {
        let runtime = Builder::new_current_thread()
            .enable_all()
            .build()
            .expect("create runtime");
        Self {
            runtime,
            transport: Arc::new(ScriptedTransport::default()),
            provider: Arc::new(ScriptedProvider {
                succeeds: AtomicBool::new(true),
                calls: AtomicUsize::new(0),
            }),
            outcome: RefCell::new(None),
        }
    }

    fn request_menu(&self) {
        let gateway = AuthenticatedGateway::new(self.transport.clone(), self.provider.clone());
        let actions = StorefrontActions::new(Arc::new(gateway));
        let result = self.runtime.block_on(actions.get_menu());
        *self.outcome.borrow_mut() = Some(result);
    }

    fn with_items<F>(&self, f: F)
    where
        F: FnOnce(&[MenuItem]),
    {
        let outcome = self.outcome.borrow();
        let items = outcome
            .as_ref()
            .expect("action outcome")
            .data()
            .expect("expected the action to succeed");
        f(items);
    }

    fn with_failure<F>(&self, f: F)
    where
        F: FnOnce(&ActionFailure),
    {
        let outcome = self.outcome.borrow();
        let failure = outcome
            .as_ref()
            .expect("action outcome")
            .failure()
            .expect("expected the action to fail");
        f(failure);
    }
}

#[fixture]
fn world() -> GatewayWorld {
    GatewayWorld::new()
}

#[given("the backend answers 200 with a valid menu")]
fn the_backend_answers_with_a_valid_menu(world: &GatewayWorld) {
    world.transport.push(ApiResponse::new(200, VALID_MENU));
}

#[given("the backend answers 200 with a malformed menu")]
fn the_backend_answers_with_a_malformed_menu(world: &GatewayWorld) {
    world.transport.push(ApiResponse::new(200, MALFORMED_MENU));
}

#[given("the backend answers {status:u16}")]
fn the_backend_answers(world: &GatewayWorld, status: u16) {
    world.transport.push(ApiResponse::new(status, Vec::new()));
}

#[given("re-authentication succeeds")]
fn reauthentication_succeeds(world: &GatewayWorld) {
    world.provider.succeeds.store(true, Ordering::SeqCst);
}

#[given("re-authentication fails")]
fn reauthentication_fails(world: &GatewayWorld) {
    world.provider.succeeds.store(false, Ordering::SeqCst);
}

#[when("the storefront requests the menu")]
fn the_storefront_requests_the_menu(world: &GatewayWorld) {
    world.request_menu();
}

#[then("the action succeeds with {count:usize} menu items")]
fn the_action_succeeds_with_items(world: &GatewayWorld, count: usize) {
    world.with_items(|items| assert_eq!(items.len(), count));
}

#[then("the action fails with error {message}")]
fn the_action_fails_with_error(world: &GatewayWorld, message: String) {
    world.with_failure(|failure| assert_eq!(failure.error(), message));
}

#[then("the action fails with code {code}")]
fn the_action_fails_with_code(world: &GatewayWorld, code: String) {
    world.with_failure(|failure| assert_eq!(failure.code(), Some(code.as_str())));
}

#[then("the action fails with status {status:u16}")]
fn the_action_fails_with_status(world: &GatewayWorld, status: u16) {
    world.with_failure(|failure| assert_eq!(failure.status(), Some(status)));
}

#[then("the failure has no code")]
fn the_failure_has_no_code(world: &GatewayWorld) {
    world.with_failure(|failure| {
        assert_eq!(failure.code(), None);
        assert_eq!(failure.status(), None);
    });
}

#[then("the failure message starts with {prefix}")]
fn the_failure_message_starts_with(world: &GatewayWorld, prefix: String) {
    world.with_failure(|failure| {
        assert!(
            failure.error().starts_with(&prefix),
            "unexpected message: {}",
            failure.error()
        );
    });
}

#[then("the backend call count is {count:usize}")]
fn the_backend_call_count_is(world: &GatewayWorld, count: usize) {
    assert_eq!(world.transport.calls.load(Ordering::SeqCst), count);
}

#[then("the re-authentication count is {count:usize}")]
fn the_reauthentication_count_is(world: &GatewayWorld, count: usize) {
    assert_eq!(world.provider.calls.load(Ordering::SeqCst), count);
}

#[scenario(
    path = "tests/features/authenticated_gateway.feature",
    name = "A successful request needs no re-authentication"
)]
fn successful_request_needs_no_reauthentication(world: GatewayWorld) {
    drop(world);
}

#[scenario(
    path = "tests/features/authenticated_gateway.feature",
    name = "An expired session is re-established and the request retried"
)]
fn expired_session_is_reestablished_and_retried(world: GatewayWorld) {
    drop(world);
}

#[scenario(
    path = "tests/features/authenticated_gateway.feature",
    name = "Failed re-authentication is terminal"
)]
fn failed_reauthentication_is_terminal(world: GatewayWorld) {
    drop(world);
}

#[scenario(
    path = "tests/features/authenticated_gateway.feature",
    name = "A second rejection after re-authentication is terminal"
)]
fn second_rejection_after_reauthentication_is_terminal(world: GatewayWorld) {
    drop(world);
}

#[scenario(
    path = "tests/features/authenticated_gateway.feature",
    name = "A malformed payload is reported as a validation failure"
)]
fn malformed_payload_is_a_validation_failure(world: GatewayWorld) {
    drop(world);
}

#[scenario(
    path = "tests/features/authenticated_gateway.feature",
    name = "Backend errors are not retried"
)]
fn backend_errors_are_not_retried(world: GatewayWorld) {
    drop(world);
}
