use crate::{FetchStub, FetchStubConfiguration};
use lazy_static::lazy_static;
use std::{
    future::Future,
    sync::{Mutex, MutexGuard, PoisonError},
};
use tracing::debug;

lazy_static! {
    static ref GLOBAL_STUB: FetchStub = FetchStub::new(FetchStubConfiguration::default());
    static ref TEST_LOCK: Mutex<()> = Mutex::new(());
}

/// The process-wide stub, shared by every test that goes through [`TestSession`].
pub fn global() -> &'static FetchStub {
    &GLOBAL_STUB
}

/// Gives a test exclusive use of [`global`]. The stub is restored when the
/// session starts and again when it ends, even if the test panicked.
pub struct TestSession {
    _test_lock: MutexGuard<'static, ()>,
}

impl TestSession {
    pub fn begin() -> Self {
        // a panicking test poisons the lock without leaving anything behind
        let test_lock = TEST_LOCK.lock().unwrap_or_else(PoisonError::into_inner);
        GLOBAL_STUB.restore();
        debug!("test session started");

        Self {
            _test_lock: test_lock,
        }
    }

    /// Runs `future` to completion on a fresh current-thread runtime inside a session.
    pub fn run<F: Future>(future: F) -> F::Output {
        let _session = Self::begin();

        tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .expect("couldn't build the test runtime")
            .block_on(future)
    }
}

impl Drop for TestSession {
    fn drop(&mut self) {
        GLOBAL_STUB.restore();
        debug!("test session finished");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{json_ok, Error, HttpClient, RequestData};
    use std::time::Duration;

    #[test]
    fn session_restores_the_global_stub() {
        TestSession::run(async {
            let interception = global().on_request(|_| Some(json_ok("global")));
            let response = global()
                .client()
                .fetch(RequestData::get("https://api.test/"))
                .await
                .unwrap();

            assert_eq!(response.json::<String>().unwrap(), "global");
            std::mem::forget(interception);
        });

        let _session = TestSession::begin();
        assert!(!global().is_intercepting());
    }

    #[test]
    fn session_survives_a_panicking_test() {
        let outcome = std::panic::catch_unwind(|| {
            TestSession::run(async {
                let _interception = global().on_request(|_| None);
                panic!("boom");
            })
        });
        assert!(outcome.is_err());

        let _session = TestSession::begin();
        assert!(!global().is_intercepting());
    }

    #[test]
    fn session_runtime_drives_response_timeouts() {
        let mut configuration = FetchStubConfiguration::new();
        configuration.set_response_timeout(Duration::from_millis(20));
        let stub = FetchStub::new(configuration);
        let _interception = stub.on_request(|_| None);

        let result = TestSession::run(stub.client().fetch(RequestData::get("https://api.test/")));

        assert!(matches!(result, Err(Error::Timeout(_))));
    }
}
