use crate::{
    configuration::FetchStubConfiguration, error::Error, http_client::HttpClient,
    responders::Responder, RequestData, ResponseData,
};
use async_trait::async_trait;
use futures::{
    channel::oneshot,
    future::{FutureExt, Shared},
};
use std::{
    fmt::Debug,
    sync::{Arc, Mutex, PoisonError},
    time::Duration,
};
use tracing::{debug, trace};

type Handler = dyn Fn(&RequestData) -> Option<Responder> + Send + Sync;

/// Replaces the transport of the code under test while a test runs.
///
/// Hand [`FetchStub::client`] to the code under test, then install handlers with
/// [`FetchStub::on_request`], [`FetchStub::on_get`] or [`FetchStub::on_post`].
/// Only one installation is active at a time: installing a handler removes the
/// previous one.
#[derive(Debug)]
pub struct FetchStub {
    configuration: FetchStubConfiguration,
    state: Arc<Mutex<State>>,
}

#[derive(Debug, Default)]
struct State {
    installation: Option<Arc<Installation>>,
    next_id: u64,
}

enum Resolver {
    Pending(oneshot::Sender<Responder>),
    Responded,
    Removed,
}

struct Installation {
    id: u64,
    handler: Box<Handler>,
    deferred: Shared<oneshot::Receiver<Responder>>,
    resolver: Mutex<Resolver>,
    requests: Mutex<Vec<RequestData>>,
}

impl Installation {
    async fn intercept(
        &self,
        request: RequestData,
        timeout: Option<Duration>,
    ) -> Result<ResponseData, Error> {
        trace!(method = %request.method, uri = %request.uri, "intercepted request");
        self.requests.lock()?.push(request.clone());

        let responder = match (self.handler)(&request) {
            Some(responder) => responder,
            None => {
                trace!(uri = %request.uri, "waiting for a deferred responder");
                let deferred = self.deferred.clone();
                let outcome = match timeout {
                    Some(duration) => tokio::time::timeout(duration, deferred)
                        .await
                        .map_err(|_| Error::Timeout(duration))?,
                    None => deferred.await,
                };

                outcome.map_err(|_| Error::InterceptionRemoved)?
            }
        };

        responder.respond(&request)
    }

    fn remove(&self) {
        // dropping a pending sender wakes every waiting request with an error
        *self
            .resolver
            .lock()
            .unwrap_or_else(PoisonError::into_inner) = Resolver::Removed;
    }
}

impl Debug for Installation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Installation").field("id", &self.id).finish()
    }
}

impl FetchStub {
    pub fn new(configuration: FetchStubConfiguration) -> Self {
        Self {
            configuration,
            state: Arc::new(Mutex::new(State::default())),
        }
    }

    pub fn configuration(&self) -> &FetchStubConfiguration {
        &self.configuration
    }

    /// A transport that routes requests through whatever is installed on this stub.
    pub fn client(&self) -> StubbedClient {
        StubbedClient {
            state: self.state.clone(),
            passthrough: if self.configuration.passthrough() {
                Some(self.configuration.http_client())
            } else {
                None
            },
            response_timeout: self.configuration.response_timeout(),
        }
    }

    /// Intercepts every request. `handler` decides per request whether to answer
    /// right away; requests it returns `None` for wait until
    /// [`Interception::respond`] supplies a responder.
    pub fn on_request<F>(&self, handler: F) -> Interception
    where
        F: Fn(&RequestData) -> Option<Responder> + Send + Sync + 'static,
    {
        let (sender, receiver) = oneshot::channel();
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);

        if let Some(previous) = state.installation.take() {
            debug!(id = previous.id, "removing previous interception");
            previous.remove();
        }

        state.next_id += 1;
        let installation = Arc::new(Installation {
            id: state.next_id,
            handler: Box::new(handler),
            deferred: receiver.shared(),
            resolver: Mutex::new(Resolver::Pending(sender)),
            requests: Mutex::new(Vec::new()),
        });
        state.installation = Some(installation.clone());
        debug!(id = installation.id, "installed interception");

        Interception {
            installation,
            state: self.state.clone(),
        }
    }

    /// Like [`FetchStub::on_request`], but `handler` only sees requests whose
    /// method is `method`. Method names are compared ignoring ASCII case.
    pub fn on_method<S, F>(&self, method: S, handler: F) -> Interception
    where
        S: Into<String>,
        F: Fn(&RequestData) -> Option<Responder> + Send + Sync + 'static,
    {
        let method = method.into();

        self.on_request(move |request| {
            if request.method.eq_ignore_ascii_case(&method) {
                handler(request)
            } else {
                None
            }
        })
    }

    pub fn on_get<F>(&self, handler: F) -> Interception
    where
        F: Fn(&RequestData) -> Option<Responder> + Send + Sync + 'static,
    {
        self.on_method("GET", handler)
    }

    pub fn on_post<F>(&self, handler: F) -> Interception
    where
        F: Fn(&RequestData) -> Option<Responder> + Send + Sync + 'static,
    {
        self.on_method("POST", handler)
    }

    /// Removes the active interception, if any. Safe to call repeatedly.
    pub fn restore(&self) {
        let removed = self
            .state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .installation
            .take();

        if let Some(installation) = removed {
            debug!(id = installation.id, "restored transport");
            installation.remove();
        }
    }

    pub fn is_intercepting(&self) -> bool {
        self.state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .installation
            .is_some()
    }
}

impl Default for FetchStub {
    fn default() -> Self {
        Self::new(FetchStubConfiguration::default())
    }
}

/// An installed interception. Dropping it removes the installation unless a
/// newer one already replaced it.
#[must_use = "dropping an Interception removes it"]
#[derive(Debug)]
pub struct Interception {
    installation: Arc<Installation>,
    state: Arc<Mutex<State>>,
}

impl Interception {
    /// Supplies the deferred responder, releasing every request waiting on it.
    /// Requests that arrive afterwards and find no immediate handler use it too.
    ///
    /// Fails with `Error::InterceptionRemoved` once the installation has been
    /// removed or superseded, whether or not it was answered before. Otherwise a
    /// second call fails with `Error::AlreadyResponded`.
    pub fn respond(&self, responder: Responder) -> Result<(), Error> {
        let mut resolver = self.installation.resolver.lock()?;

        match std::mem::replace(&mut *resolver, Resolver::Responded) {
            Resolver::Pending(sender) => {
                debug!(id = self.installation.id, "deferred responder supplied");
                sender
                    .send(responder)
                    .map_err(|_| Error::InterceptionRemoved)
            }
            Resolver::Responded => Err(Error::AlreadyResponded),
            Resolver::Removed => {
                *resolver = Resolver::Removed;
                Err(Error::InterceptionRemoved)
            }
        }
    }

    /// Requests seen by this installation, in arrival order.
    pub fn requests(&self) -> Vec<RequestData> {
        self.installation
            .requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn call_count(&self) -> usize {
        self.installation
            .requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_active(&self) -> bool {
        self.state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .installation
            .as_ref()
            .map_or(false, |current| current.id == self.installation.id)
    }

    /// Removes the installation now instead of at the end of the scope.
    pub fn restore(self) {
        drop(self)
    }
}

impl Drop for Interception {
    fn drop(&mut self) {
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        let is_current = state
            .installation
            .as_ref()
            .map_or(false, |current| current.id == self.installation.id);

        if is_current {
            state.installation = None;
            debug!(id = self.installation.id, "interception dropped");
        }
        drop(state);

        self.installation.remove();
    }
}

/// The transport given to code under test.
#[derive(Debug, Clone)]
pub struct StubbedClient {
    state: Arc<Mutex<State>>,
    passthrough: Option<Arc<dyn HttpClient + Send + Sync>>,
    response_timeout: Option<Duration>,
}

#[async_trait]
impl HttpClient for StubbedClient {
    async fn fetch(&self, request: RequestData) -> Result<ResponseData, Error> {
        let installation = self.state.lock()?.installation.clone();

        match installation {
            Some(installation) => {
                installation
                    .intercept(request, self.response_timeout)
                    .await
            }
            None => match &self.passthrough {
                Some(http_client) => {
                    debug!(uri = %request.uri, "no interception installed, passing through");
                    http_client.fetch(request).await
                }
                None => Err(Error::NotIntercepted),
            },
        }
    }
}
