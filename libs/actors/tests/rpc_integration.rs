//! End-to-end calls through namespace, stub, transport and dispatcher

use actor_rpc::{
    actor_interface, ActorDispatcher, ActorIdentity, ActorNamespace, DecodedResponse,
    DispatchError, LocalRuntime, LookupOptions, RetryPolicy, RpcError, RpcNamespace, Transport,
    TransportError, TransportRef, TransportRequest, TransportResponse,
};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::sync::atomic::{AtomicU32, AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

#[derive(Default)]
struct Calculator {
    counter: AtomicU64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct Order {
    id: u64,
    items: Vec<String>,
    rush: bool,
    note: Option<String>,
}

impl Calculator {
    async fn add(self: Arc<Self>, (a, b): (i64, i64)) -> Result<i64, DispatchError> {
        Ok(a + b)
    }

    async fn increment(self: Arc<Self>, _: ()) -> Result<u64, DispatchError> {
        Ok(self.counter.fetch_add(1, Ordering::SeqCst) + 1)
    }

    async fn echo(self: Arc<Self>, (value,): (Value,)) -> Result<Value, DispatchError> {
        Ok(value)
    }

    async fn submit(self: Arc<Self>, (order,): (Order,)) -> Result<Order, DispatchError> {
        let mut order = order;
        order.items.sort();
        Ok(order)
    }

    async fn teapot(self: Arc<Self>, _: ()) -> Result<TransportResponse, DispatchError> {
        Ok(TransportResponse::new(418, r#"{"short":"stout"}"#)
            .with_header("content-type", "application/json"))
    }

    async fn native(
        self: Arc<Self>,
        request: TransportRequest,
    ) -> Result<TransportResponse, DispatchError> {
        Ok(TransportResponse::ok(format!("native {}", request.url.path())))
    }
}

fn calculator(_: &ActorIdentity) -> ActorDispatcher<Calculator> {
    ActorDispatcher::new(Calculator::default())
        .method("add", Calculator::add)
        .method("increment", Calculator::increment)
        .method("echo", Calculator::echo)
        .method("submit", Calculator::submit)
        .raw_method("teapot", Calculator::teapot)
        .fallback(Calculator::native)
}

fn namespace() -> RpcNamespace<LocalRuntime<Calculator>> {
    RpcNamespace::new(LocalRuntime::new("calculators", calculator))
}

#[tokio::test]
async fn add_returns_sum() {
    let stub = namespace().get("math").unwrap();
    let sum: i64 = stub.call("add", (3, 4)).await.unwrap();
    assert_eq!(sum, 7);
}

#[tokio::test]
async fn missing_method_rejects_with_500() {
    let stub = namespace().get("math").unwrap();
    let error = stub.invoke("foo", vec![]).await.unwrap_err();

    assert_eq!(error.status(), Some(500));
    assert!(error.to_string().contains("foo"));
}

#[tokio::test]
async fn raw_response_reaches_caller_untouched() {
    let stub = namespace().get("math").unwrap();

    match stub.invoke("teapot", vec![]).await.unwrap() {
        DecodedResponse::Raw(response) => {
            assert_eq!(response.status, 418);
            assert_eq!(response.text(), Some(r#"{"short":"stout"}"#));
            assert_eq!(response.headers.get("content-type"), Some("application/json"));
            assert!(!response.headers.contains("x-direct-response"));
        }
        other => panic!("expected raw response, got {:?}", other),
    }
}

#[tokio::test]
async fn counter_state_persists_across_calls() {
    let namespace = namespace();
    let first: u64 = namespace.get("clicks").unwrap().call("increment", ()).await.unwrap();
    let second: u64 = namespace.get("clicks").unwrap().call("increment", ()).await.unwrap();
    let elsewhere: u64 = namespace.get("other").unwrap().call("increment", ()).await.unwrap();

    assert_eq!((first, second, elsewhere), (1, 2, 1));
}

#[tokio::test]
async fn canonical_id_reaches_the_named_actor() {
    let namespace = namespace();
    let named = namespace.get("clicks").unwrap();
    let _: u64 = named.call("increment", ()).await.unwrap();

    let by_id = namespace.get(named.identity().to_hex()).unwrap();
    assert_eq!(by_id.identity(), named.identity());
    let count: u64 = by_id.call("increment", ()).await.unwrap();
    assert_eq!(count, 2);
}

#[tokio::test]
async fn generated_identities_are_fresh_actors() {
    let namespace = namespace();
    let a = namespace.get(()).unwrap();
    let b = namespace.get(()).unwrap();
    assert_ne!(a.identity(), b.identity());

    let _: u64 = a.call("increment", ()).await.unwrap();
    let count: u64 = b.call("increment", ()).await.unwrap();
    assert_eq!(count, 1);
}

#[tokio::test]
async fn nested_json_echoes_exactly() {
    let stub = namespace().get("echo").unwrap();
    let value = json!({
        "numbers": [0, -1, 2.5, 1e10],
        "text": "snowman \u{2603}",
        "nested": {"deep": [[], {}, [null, true, false]]},
    });

    let echoed = stub.invoke("echo", vec![value.clone()]).await.unwrap();
    assert_eq!(echoed, DecodedResponse::Value(value));
}

#[tokio::test]
async fn structured_arguments_round_trip() {
    let stub = namespace().get("orders").unwrap();
    let order = Order {
        id: 9,
        items: vec!["pear".into(), "apple".into()],
        rush: true,
        note: None,
    };

    let accepted: Order = stub.call("submit", (order.clone(),)).await.unwrap();
    assert_eq!(accepted.items, vec!["apple".to_string(), "pear".to_string()]);
    assert_eq!(accepted.id, order.id);
}

#[tokio::test]
async fn invalid_arguments_are_rejected_with_400() {
    let stub = namespace().get("math").unwrap();
    let result: Result<i64, RpcError> = stub.call("add", ("three", 4)).await;

    let error = result.unwrap_err();
    assert_eq!(error.status(), Some(400));
    assert!(error.to_string().contains("invalid arguments for method 'add'"));
}

#[tokio::test]
async fn native_fetch_bypasses_rpc() {
    let stub = namespace().get("math").unwrap();
    let request = TransportRequest::new(
        actor_rpc::Method::Get,
        "https://calculators.example/socket".parse().unwrap(),
    );

    let response = stub.fetch(request).await.unwrap();
    assert_eq!(response.text(), Some("native /socket"));
}

#[tokio::test]
async fn memoised_methods_are_stable() {
    let stub = namespace().get("math").unwrap();
    let add = stub.method("add");
    assert!(add.ptr_eq(&stub.method("add")));

    let sum: i64 = add.call((20, 22)).await.unwrap();
    assert_eq!(sum, 42);
}

#[tokio::test]
async fn method_names_outside_ascii_identifiers_are_callable() {
    let namespace = RpcNamespace::new(LocalRuntime::new("names", |_| {
        ActorDispatcher::new(Calculator::default())
            .method("größe", Calculator::add)
            .method("get value", Calculator::increment)
    }));
    let stub = namespace.get("names").unwrap();

    let sum: i64 = stub.call("größe", (1, 2)).await.unwrap();
    assert_eq!(sum, 3);
    let count: u64 = stub.call("get value", ()).await.unwrap();
    assert_eq!(count, 1);

    let error = stub.invoke("größer", vec![]).await.unwrap_err();
    assert!(error.to_string().contains("'größer'"));
}

actor_interface! {
    /// Typed client for the calculator actor
    pub struct CalculatorClient {
        fn add(a: i64, b: i64) -> i64;
        fn increment() -> u64;
        fn echo(value: Value) -> Value;
    }
}

#[tokio::test]
async fn typed_client_forwards_calls() {
    let client = CalculatorClient::from(namespace().get("typed").unwrap());

    assert_eq!(client.add(3, 4).await.unwrap(), 7);
    assert_eq!(client.increment().await.unwrap(), 1);
    assert_eq!(client.increment().await.unwrap(), 2);
    assert_eq!(client.echo(json!([1, "two"])).await.unwrap(), json!([1, "two"]));
}

/// Fails the first `failures` sends with `message`, then delegates
struct Flaky {
    inner: TransportRef,
    failures: u32,
    message: &'static str,
    sends: AtomicU32,
}

#[async_trait]
impl Transport for Flaky {
    async fn fetch(&self, request: TransportRequest) -> Result<TransportResponse, TransportError> {
        let send = self.sends.fetch_add(1, Ordering::SeqCst);
        if send < self.failures {
            return Err(TransportError::unclassified(self.message));
        }
        self.inner.fetch(request).await
    }
}

/// Namespace whose transports are wrapped in [`Flaky`]
struct FlakyNamespace {
    runtime: LocalRuntime<Calculator>,
    failures: u32,
    message: &'static str,
    last: parking_lot::Mutex<Option<Arc<Flaky>>>,
}

impl FlakyNamespace {
    fn new(failures: u32, message: &'static str) -> Arc<Self> {
        Arc::new(Self {
            runtime: LocalRuntime::new("flaky", calculator),
            failures,
            message,
            last: parking_lot::Mutex::new(None),
        })
    }

    fn sends(&self) -> u32 {
        self.last
            .lock()
            .as_ref()
            .map_or(0, |flaky| flaky.sends.load(Ordering::SeqCst))
    }
}

impl ActorNamespace for FlakyNamespace {
    fn id_from_string(&self, hex: &str) -> actor_types::Result<ActorIdentity> {
        self.runtime.id_from_string(hex)
    }

    fn id_from_name(&self, name: &str) -> ActorIdentity {
        self.runtime.id_from_name(name)
    }

    fn new_unique_id(&self) -> ActorIdentity {
        self.runtime.new_unique_id()
    }

    fn get(&self, id: &ActorIdentity, options: &LookupOptions) -> TransportRef {
        let flaky = Arc::new(Flaky {
            inner: self.runtime.get(id, options),
            failures: self.failures,
            message: self.message,
            sends: AtomicU32::new(0),
        });
        *self.last.lock() = Some(Arc::clone(&flaky));
        flaky
    }
}

#[tokio::test]
async fn transient_failures_are_retried_with_backoff() {
    let flaky = FlakyNamespace::new(2, "Error: Network connection lost.");
    let namespace = RpcNamespace::new(Arc::clone(&flaky));
    let stub = namespace.get("math").unwrap();

    let started = Instant::now();
    let sum: i64 = stub.call("add", (3, 4)).await.unwrap();

    assert_eq!(sum, 7);
    assert_eq!(flaky.sends(), 3);
    assert!(started.elapsed() >= Duration::from_millis(10 + 20));
}

#[tokio::test]
async fn unknown_failures_are_not_retried() {
    let flaky = FlakyNamespace::new(1, "TypeError: something else broke");
    let namespace = RpcNamespace::new(Arc::clone(&flaky));
    let stub = namespace.get("math").unwrap();

    let error = stub.call::<_, i64>("add", (3, 4)).await.unwrap_err();

    assert!(error.is_transport());
    assert_eq!(flaky.sends(), 1);
}

#[tokio::test]
async fn retries_stop_at_the_attempt_ceiling() {
    let flaky = FlakyNamespace::new(u32::MAX, "Network connection lost");
    let namespace =
        RpcNamespace::new(Arc::clone(&flaky)).with_policy(RetryPolicy::new(11, Duration::ZERO));
    let stub = namespace.get("math").unwrap();

    let error = stub.call::<_, i64>("add", (3, 4)).await.unwrap_err();
    assert_eq!(error.to_string(), "Transport error: Network connection lost");
    assert_eq!(flaky.sends(), 11);
}

#[tokio::test]
async fn location_hints_do_not_change_identity() {
    let namespace = namespace();
    let hinted = namespace
        .lookup("math", &LookupOptions::default().with_location_hint("weur"))
        .unwrap();
    assert_eq!(hinted.identity(), namespace.get("math").unwrap().identity());
    assert_eq!(namespace.inner().id_from_name("math"), *hinted.identity());
}
