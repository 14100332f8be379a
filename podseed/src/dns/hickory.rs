//! SRV backend on hickory-resolver, driven by a runtime on its own thread so callers can block.

use std::fmt;
use std::net::SocketAddr;
use std::sync::{mpsc, Arc};
use std::thread;
use std::time::Duration;

use hickory_resolver::config::{NameServerConfigGroup, ResolverConfig};
use hickory_resolver::lookup::SrvLookup;
use hickory_resolver::name_server::TokioConnectionProvider;
use hickory_resolver::{ResolveError, Resolver, TokioResolver};
use tokio::runtime::{Builder, Handle};
use tokio::sync::oneshot;
use tracing::debug;

use super::{DnsError, SrvAnswer, SrvBackend, SrvRecord};

/// Hickory resolver plus the runtime that drives it.
///
/// The runtime lives on a dedicated `podseed-dns` thread. Lookups are spawned onto it and
/// the caller waits on a channel, so the backend works from plain threads and from inside
/// another tokio runtime alike (in the latter case the calling worker is blocked for the
/// lookup). Dropping the backend stops the thread. Hickory's own cache is disabled;
/// caching is a resolver-level knob.
pub struct HickoryBackend {
    handle: Handle,
    resolver: Arc<TokioResolver>,
    _shutdown: oneshot::Sender<()>,
}

impl fmt::Debug for HickoryBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HickoryBackend").finish_non_exhaustive()
    }
}

impl HickoryBackend {
    /// Build from the system configuration (`/etc/resolv.conf` on Unix).
    pub fn from_system_conf(timeout: Duration) -> Result<Self, DnsError> {
        let (handle, shutdown) = spawn_runtime()?;
        let resolver = {
            let _guard = handle.enter();
            let mut builder = TokioResolver::builder_tokio()?;
            let opts = builder.options_mut();
            opts.timeout = timeout;
            opts.cache_size = 0;
            builder.build()
        };
        Ok(Self::from_parts(handle, resolver, shutdown))
    }

    /// Build against explicit nameservers (UDP and TCP on each address).
    pub fn with_name_servers(servers: &[SocketAddr], timeout: Duration) -> Result<Self, DnsError> {
        if servers.is_empty() {
            return Err(DnsError::Backend("no dns servers configured".to_string()));
        }
        let mut group = NameServerConfigGroup::with_capacity(servers.len() * 2);
        for server in servers {
            group.merge(NameServerConfigGroup::from_ips_clear(
                &[server.ip()],
                server.port(),
                true,
            ));
        }
        let config = ResolverConfig::from_parts(None, vec![], group);

        let (handle, shutdown) = spawn_runtime()?;
        let resolver = {
            let _guard = handle.enter();
            let mut builder = Resolver::builder_with_config(config, TokioConnectionProvider::default());
            let opts = builder.options_mut();
            opts.timeout = timeout;
            opts.cache_size = 0;
            builder.build()
        };
        Ok(Self::from_parts(handle, resolver, shutdown))
    }

    fn from_parts(handle: Handle, resolver: TokioResolver, shutdown: oneshot::Sender<()>) -> Self {
        Self {
            handle,
            resolver: Arc::new(resolver),
            _shutdown: shutdown,
        }
    }
}

/// Start a current-thread runtime on its own thread; it runs until the sender is dropped.
fn spawn_runtime() -> Result<(Handle, oneshot::Sender<()>), DnsError> {
    let (ready_tx, ready_rx) = mpsc::channel();
    let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();
    thread::Builder::new()
        .name("podseed-dns".to_string())
        .spawn(move || {
            let runtime = match Builder::new_current_thread().enable_all().build() {
                Ok(runtime) => runtime,
                Err(err) => {
                    let _ = ready_tx.send(Err(err));
                    return;
                }
            };
            let _ = ready_tx.send(Ok(runtime.handle().clone()));
            runtime.block_on(async {
                let _ = shutdown_rx.await;
            });
        })?;
    let handle = ready_rx
        .recv()
        .map_err(|_| DnsError::Backend("dns runtime thread exited during startup".to_string()))??;
    Ok((handle, shutdown_tx))
}

impl SrvBackend for HickoryBackend {
    fn lookup(&self, query: &str, timeout: Duration) -> Result<SrvAnswer, DnsError> {
        let (tx, rx) = mpsc::channel();
        let resolver = Arc::clone(&self.resolver);
        let owned = query.to_owned();
        self.handle.spawn(async move {
            let outcome = tokio::time::timeout(timeout, resolver.srv_lookup(owned.as_str()))
                .await
                .ok();
            let _ = tx.send(map_result(&owned, timeout, outcome));
        });
        rx.recv()
            .map_err(|_| DnsError::Backend(format!("dns runtime stopped during lookup of {}", query)))?
    }
}

/// Turn a hickory outcome into an answer. `None` means the deadline passed.
///
/// NOERROR with no records is an empty answer; NXDOMAIN and everything else are errors.
fn map_result(
    query: &str,
    timeout: Duration,
    outcome: Option<Result<SrvLookup, ResolveError>>,
) -> Result<SrvAnswer, DnsError> {
    match outcome {
        None => Err(DnsError::Timeout {
            query: query.to_owned(),
            timeout,
        }),
        Some(Ok(lookup)) => {
            let valid_until = lookup.as_lookup().valid_until();
            let records: Vec<SrvRecord> = lookup
                .iter()
                .map(|srv| SrvRecord {
                    target: srv.target().to_utf8(),
                    port: srv.port(),
                    priority: srv.priority(),
                    weight: srv.weight(),
                })
                .collect();
            debug!(query, records = records.len(), "srv lookup answered");
            Ok(SrvAnswer::new(records, Some(valid_until)))
        }
        Some(Err(err)) if err.is_nx_domain() => Err(DnsError::NxDomain(query.to_owned())),
        Some(Err(err)) if err.is_no_records_found() => Ok(SrvAnswer::empty()),
        Some(Err(err)) => Err(err.into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hickory_resolver::lookup::Lookup;
    use hickory_resolver::proto::op::Query;
    use hickory_resolver::proto::rr::rdata::SRV;
    use hickory_resolver::proto::rr::{Name, RData, Record, RecordType};
    use std::time::Instant;

    fn srv_lookup(records: &[(&str, u16)], valid_until: Instant) -> SrvLookup {
        let name = Name::from_ascii("_discovery._tcp.my-service.").unwrap();
        let records: Vec<Record> = records
            .iter()
            .map(|&(target, port)| {
                let target = Name::from_ascii(target).unwrap();
                Record::from_rdata(name.clone(), 30, RData::SRV(SRV::new(10, 50, port, target)))
            })
            .collect();
        let query = Query::query(name, RecordType::SRV);
        SrvLookup::from(Lookup::new_with_deadline(query, Arc::from(records), valid_until))
    }

    #[test]
    fn deadline_passed_is_timeout() {
        let err = map_result("svc", Duration::from_millis(1000), None).unwrap_err();
        match err {
            DnsError::Timeout { query, timeout } => {
                assert_eq!(query, "svc");
                assert_eq!(timeout, Duration::from_millis(1000));
            }
            other => panic!("expected Timeout, got {:?}", other),
        }
    }

    #[test]
    fn records_keep_target_verbatim_and_expiry() {
        let valid_until = Instant::now() + Duration::from_secs(30);
        let lookup = srv_lookup(&[("pod-a.svc.", 47500), ("pod-b.svc.", 47501)], valid_until);
        let answer = map_result("svc", Duration::from_secs(1), Some(Ok(lookup))).unwrap();
        assert_eq!(answer.valid_until, Some(valid_until));
        assert_eq!(
            answer.records,
            vec![
                SrvRecord {
                    target: "pod-a.svc.".to_string(),
                    port: 47500,
                    priority: 10,
                    weight: 50,
                },
                SrvRecord {
                    target: "pod-b.svc.".to_string(),
                    port: 47501,
                    priority: 10,
                    weight: 50,
                },
            ]
        );
    }

    #[test]
    fn other_resolver_errors_propagate() {
        let err = ResolveError::from("connection refused");
        let mapped = map_result("svc", Duration::from_secs(1), Some(Err(err))).unwrap_err();
        assert!(matches!(mapped, DnsError::Lookup(_)));
    }

    #[test]
    fn unreachable_nameserver_fails_within_deadline() {
        let server: SocketAddr = "127.0.0.1:9".parse().unwrap();
        let backend = HickoryBackend::with_name_servers(&[server], Duration::from_millis(200)).unwrap();
        let started = Instant::now();
        let result = backend.lookup("_discovery._tcp.my-service.invalid.", Duration::from_millis(200));
        assert!(result.is_err());
        assert!(started.elapsed() < Duration::from_secs(5));
    }

    #[test]
    fn no_name_servers_rejected() {
        assert!(matches!(
            HickoryBackend::with_name_servers(&[], Duration::from_millis(200)),
            Err(DnsError::Backend(_))
        ));
    }
}
