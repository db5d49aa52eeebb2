use std::net::SocketAddr;
use std::sync::Arc;

use room_service::bootstrap::jobs::Started;
use room_service::servers::status_api::routes::Status;
use room_service::servers::status_api::{server, STATUS_API_LOG_TARGET};
use room_service_configuration::Service;
use room_service_registry::RegistrationState;
use tokio::sync::{oneshot, watch};
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;

pub struct Running {
    pub local_addr: SocketAddr,
    pub shutdown: CancellationToken,
    pub tasks: JoinSet<Result<(), std::io::Error>>,
    pub bind_to: SocketAddr,
}

pub struct Stopped {
    pub bind_to: SocketAddr,
}

pub struct Environment<S> {
    pub app_name: Arc<str>,
    pub registration: watch::Sender<RegistrationState>,
    pub state: S,
}

impl Environment<Stopped> {
    pub fn new(config: &Service) -> Self {
        let (registration, _) = watch::channel(RegistrationState::default());

        Self {
            app_name: Arc::from(config.app_name.as_str()),
            registration,
            state: Stopped {
                bind_to: config.bind_address,
            },
        }
    }

    /// Start the test environment for the status API.
    pub async fn start(self) -> Environment<Running> {
        let (tx_start, rx_start) = oneshot::channel::<Started>();
        let shutdown = CancellationToken::new();

        let status = Status::new(self.app_name.clone(), self.registration.subscribe());
        let bind_to = self.state.bind_to;

        let mut tasks = JoinSet::new();
        server::start(bind_to, tx_start, shutdown.clone(), status, &mut tasks).expect("it should start the status api");

        let local_addr = rx_start.await.expect("it should send service binding").local_addr;

        tracing::debug!(target: STATUS_API_LOG_TARGET, %local_addr, "started");

        Environment {
            app_name: self.app_name,
            registration: self.registration,
            state: Running {
                local_addr,
                shutdown,
                tasks,
                bind_to,
            },
        }
    }
}

impl Environment<Running> {
    pub async fn new(config: &Service) -> Self {
        Environment::<Stopped>::new(config).start().await
    }

    pub fn url(&self, path: &str) -> String {
        format!("http://{}{path}", self.state.local_addr)
    }

    pub async fn stop(mut self) -> Environment<Stopped> {
        self.state.shutdown.cancel();

        while let Some(task) = self.state.tasks.join_next().await {
            match task {
                Ok(Ok(())) => (),
                Ok(Err(e)) => panic!("task failed with error: {e}"),
                Err(e) => panic!("failed to cleanly join task: {e}"),
            }
        }

        Environment {
            app_name: self.app_name,
            registration: self.registration,
            state: Stopped {
                bind_to: self.state.bind_to,
            },
        }
    }
}
