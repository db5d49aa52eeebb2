//! Heartbeat job.
//!
//! Once registered, a background task renews the lease of the instance every
//! [`Timing::heartbeat_interval`](crate::Timing). A failed heartbeat is only
//! logged: the next tick is the retry, and the registration state does not
//! change.
//!
//! The task runs until its halt token is cancelled. [`Heartbeat::stop`]
//! cancels it and waits for the task to acknowledge; dropping the
//! [`Heartbeat`] cancels it without waiting. A heartbeat interrupted by the
//! halt token is not counted.
use std::sync::Arc;

use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;

use crate::client::Client;
use crate::descriptor::InstanceIdentity;
use crate::transport::RegistryTransport;
use crate::REGISTRY_CLIENT_LOG_TARGET;

/// Handle of a running heartbeat task.
#[derive(Debug)]
pub struct Heartbeat {
    task: JoinHandle<u64>,
    halt: CancellationToken,
}

impl Heartbeat {
    /// Spawns the heartbeat task. The first heartbeat is sent one interval
    /// after the call.
    #[must_use]
    pub fn start<T>(client: Arc<Client<T>>, identity: Arc<InstanceIdentity>) -> Self
    where
        T: RegistryTransport,
    {
        let halt = CancellationToken::new();

        let task = tokio::spawn(run(client, identity, halt.clone()));

        Self { task, halt }
    }

    /// Stops the task and returns the number of heartbeats it completed.
    ///
    /// # Errors
    ///
    /// Will return an error if the task panicked.
    pub async fn stop(mut self) -> Result<u64, tokio::task::JoinError> {
        self.halt.cancel();
        (&mut self.task).await
    }
}

impl Drop for Heartbeat {
    fn drop(&mut self) {
        self.halt.cancel();
    }
}

async fn run<T>(client: Arc<Client<T>>, identity: Arc<InstanceIdentity>, halt: CancellationToken) -> u64
where
    T: RegistryTransport,
{
    let period = client.timing().heartbeat_interval;
    let instance_key = identity.instance_key();

    let mut interval = tokio::time::interval_at(Instant::now() + period, period);
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

    let mut beats: u64 = 0;

    tracing::debug!(target: REGISTRY_CLIENT_LOG_TARGET, %instance_key, ?period, "heartbeat started");

    loop {
        tokio::select! {
            biased;
            () = halt.cancelled() => break,
            _ = interval.tick() => {}
        }

        let renewed = tokio::select! {
            biased;
            () = halt.cancelled() => break,
            renewed = client.transport().heartbeat(&identity) => renewed,
        };

        beats += 1;

        if renewed {
            tracing::debug!(target: REGISTRY_CLIENT_LOG_TARGET, %instance_key, beats, "heartbeat sent");
        } else {
            tracing::warn!(target: REGISTRY_CLIENT_LOG_TARGET, %instance_key, beats, "heartbeat failed, waiting for the next tick");
        }
    }

    tracing::debug!(target: REGISTRY_CLIENT_LOG_TARGET, %instance_key, beats, "heartbeat stopped");

    beats
}

#[cfg(test)]
mod tests {
    use std::net::Ipv4Addr;
    use std::sync::{Arc, Mutex};
    use std::time::Duration;

    use futures::FutureExt as _;

    use super::Heartbeat;
    use crate::client::{Client, Timing};
    use crate::descriptor::DescriptorBuilder;
    use crate::transport::MockRegistryTransport;

    fn timing() -> Timing {
        Timing::new(Duration::from_secs(5), Duration::from_secs(30))
    }

    #[tokio::test(start_paused = true)]
    async fn it_should_send_one_heartbeat_per_interval_with_the_registered_identity() {
        let identity = Arc::new(DescriptorBuilder::new("roomSvc", Ipv4Addr::new(10, 0, 0, 5), 8096, 443).build());

        let keys = Arc::new(Mutex::new(Vec::new()));
        let recorded = keys.clone();

        let mut transport = MockRegistryTransport::new();
        transport.expect_heartbeat().times(3).returning(move |identity| {
            recorded.lock().unwrap().push(identity.instance_key());
            futures::future::ready(true).boxed()
        });

        let heartbeat = Heartbeat::start(Client::new(transport, timing()), identity.clone());

        tokio::time::sleep(Duration::from_secs(95)).await;

        assert_eq!(heartbeat.stop().await.unwrap(), 3);
        assert_eq!(*keys.lock().unwrap(), vec![identity.instance_key(); 3]);
    }

    #[tokio::test(start_paused = true)]
    async fn it_should_keep_beating_after_a_failed_heartbeat() {
        let identity = Arc::new(DescriptorBuilder::new("roomSvc", Ipv4Addr::new(10, 0, 0, 5), 8096, 443).build());

        let mut calls = 0;
        let mut transport = MockRegistryTransport::new();
        transport.expect_heartbeat().times(4).returning(move |_| {
            calls += 1;
            futures::future::ready(calls % 2 == 0).boxed()
        });

        let client = Client::new(transport, timing());
        let heartbeat = Heartbeat::start(client.clone(), identity);

        tokio::time::sleep(Duration::from_secs(125)).await;

        assert_eq!(heartbeat.stop().await.unwrap(), 4);
        assert_eq!(client.state(), crate::RegistrationState::Unregistered);
    }

    #[tokio::test(start_paused = true)]
    async fn it_should_not_send_a_heartbeat_when_stopped_before_the_first_tick() {
        let identity = Arc::new(DescriptorBuilder::new("roomSvc", Ipv4Addr::new(10, 0, 0, 5), 8096, 443).build());

        let mut transport = MockRegistryTransport::new();
        transport.expect_heartbeat().never();

        let heartbeat = Heartbeat::start(Client::new(transport, timing()), identity);

        tokio::time::sleep(Duration::from_secs(29)).await;

        assert_eq!(heartbeat.stop().await.unwrap(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn it_should_not_count_a_heartbeat_interrupted_by_the_stop() {
        let identity = Arc::new(DescriptorBuilder::new("roomSvc", Ipv4Addr::new(10, 0, 0, 5), 8096, 443).build());

        let mut transport = MockRegistryTransport::new();
        transport.expect_heartbeat().times(1).returning(|_| {
            async {
                tokio::time::sleep(Duration::from_secs(10)).await;
                true
            }
            .boxed()
        });

        let heartbeat = Heartbeat::start(Client::new(transport, timing()), identity);

        tokio::time::sleep(Duration::from_secs(35)).await;

        assert_eq!(heartbeat.stop().await.unwrap(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn it_should_stop_beating_when_dropped() {
        let identity = Arc::new(DescriptorBuilder::new("roomSvc", Ipv4Addr::new(10, 0, 0, 5), 8096, 443).build());

        let mut transport = MockRegistryTransport::new();
        transport.expect_heartbeat().never();

        let client = Client::new(transport, timing());

        drop(Heartbeat::start(client.clone(), identity));

        tokio::time::sleep(Duration::from_secs(95)).await;

        assert_eq!(Arc::strong_count(&client), 1);
    }
}
