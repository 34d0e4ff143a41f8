use std::net::{Ipv6Addr, SocketAddr};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::Result;
use binbuf::prelude::*;
use clap::Parser;
use tokio::net::UdpSocket;
use tokio::time;

use rpl_core::codec::{Dao, DaoAck, Dco, DcoAck, Dio, Dis, IcmpCode, IcmpHeader, ModeOfOperation as WireMop};
use rpl_core::collab::{Clock, NeighborCache, Rng};
use rpl_core::handlers::{self, DioOutcome, Effect};
use rpl_core::model::{Dag, Instance, InstanceBuilder};
use rpl_core::of::{Mrhof, ObjectiveFunction, Of0};
use rpl_core::RetransmissionQueue;
use rpl_sim::{InMemoryLinkStats, InMemoryNeighborCache, InMemoryRouteTable, InMemorySourceRouteTable};

use crate::config::{Config, ModeOfOperation, ObjectiveFunction as ConfiguredOf};
use crate::transport::{UdpTransport, RPL_DEMO_PORT};

mod config;
mod transport;

#[derive(Parser)]
#[command(name = "rpl-noded")]
struct Cli {
    /// Sets a custom config file
    #[arg(short, long, value_name = "FILE", default_value = "/etc/rpl/noded.toml")]
    config: PathBuf,

    /// Enables verbose output on STDOUT
    #[arg(short, long)]
    verbose: bool,
}

struct WallClock {
    started_at: Instant,
}

impl Clock for WallClock {
    fn now_ms(&self) -> u64 {
        self.started_at.elapsed().as_millis() as u64
    }
}

/// [`Rng`] backed by the system's real entropy source, used to jitter DAO
/// retransmission timers (§4.8).
struct RandRng;

impl Rng for RandRng {
    fn next_u16(&mut self) -> u16 {
        rand::random()
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::new(filter))
        .init();

    let cfg = Config::from_file(cli.config)?;
    tracing::info!(instance_id = cfg.instance_id, root = cfg.root, "starting");

    let of: Box<dyn ObjectiveFunction> = match cfg.objective_function {
        ConfiguredOf::Of0 => Box::new(Of0),
        ConfiguredOf::Mrhof => Box::new(Mrhof),
    };

    let mut instance = if cfg.root {
        let mop = match cfg.mode_of_operation {
            ModeOfOperation::Storing => rpl_core::codec::ModeOfOperation::StoringNoMulticast,
            ModeOfOperation::NonStoring => rpl_core::codec::ModeOfOperation::NonStoring,
        };
        InstanceBuilder::new(cfg.instance_id, cfg.dodag_id)
            .mode_of_operation(mop)
            .build()
    } else {
        Instance::new(cfg.instance_id)
    };

    let socket = Arc::new(UdpSocket::bind((Ipv6Addr::UNSPECIFIED, RPL_DEMO_PORT)).await?);
    let mut transport = UdpTransport::new(Arc::clone(&socket), RPL_DEMO_PORT);
    let mut routes = InMemoryRouteTable::default();
    let mut source_routes = InMemorySourceRouteTable::default();
    let link_stats = InMemoryLinkStats::default();
    let mut retransmissions = RetransmissionQueue::new();
    let mut neighbors = InMemoryNeighborCache::default();
    let mut rng = RandRng;
    let clock = WallClock {
        started_at: Instant::now(),
    };

    let mut dio_ticker = time::interval(Duration::from_secs(cfg.dao_retransmission_timeout_ms.max(1_000) / 1_000));
    let mut recv_buf = vec![0u8; 1280];

    loop {
        tokio::select! {
            recv = socket.recv_from(&mut recv_buf) => {
                let (len, src) = recv?;
                let src_addr = match src {
                    SocketAddr::V6(v6) => *v6.ip(),
                    SocketAddr::V4(_) => continue,
                };

                if let Err(err) = handle_datagram(
                    &mut instance,
                    &cfg,
                    &recv_buf[..len],
                    src_addr,
                    of.as_ref(),
                    &link_stats,
                    &mut retransmissions,
                    &mut neighbors,
                    &mut rng,
                    &clock,
                    &mut transport,
                    &mut routes,
                    &mut source_routes,
                ) {
                    instance.stats.dropped_malformed += 1;
                    tracing::warn!(%err, %src_addr, "failed to handle RPL message");
                }
            }

            _ = dio_ticker.tick() => {
                if instance.dag.is_some() {
                    of.update_metric_container(&mut instance);
                }

                if let Some(dag) = &instance.dag {
                    use rpl_core::collab::IcmpTransport;
                    let prefix = Some(handlers::DioPrefix {
                        prefix: cfg.local_prefix,
                        prefix_length: cfg.local_prefix_length,
                        valid_lifetime: u32::from(dag.default_lifetime) * u32::from(dag.lifetime_unit),
                        preferred_lifetime: u32::from(dag.default_lifetime) * u32::from(dag.lifetime_unit),
                    });
                    let dio = handlers::build_dio(dag, prefix);
                    transport.send_dio(rpl_core::ALL_RPL_NODES, &dio).ok();
                    instance.stats.dio_tx += 1;
                }

                let (due, exhausted) = retransmissions.poll(clock.now_ms(), &mut rng);
                if !due.is_empty() || !exhausted.is_empty() {
                    tracing::debug!(due = due.len(), exhausted = exhausted.len(), "retransmission tick");

                    if let Some(dag_snapshot) = instance.dag.clone() {
                        let path_sequence = instance.path_sequence;
                        let retransmit_effects = handlers::handle_retransmission_timeouts(
                            &mut instance,
                            &due,
                            &exhausted,
                            of.as_ref(),
                            |sequence, _attempt| self_dao(&dag_snapshot, &cfg, path_sequence, sequence),
                        );

                        for pending in &due {
                            retransmissions.track(pending.parent, pending.sequence, clock.now_ms(), &mut rng);
                        }

                        for effect in retransmit_effects {
                            if let Effect::SendDao { dst, msg } = effect {
                                use rpl_core::collab::IcmpTransport;
                                transport.send_dao(dst, &msg).ok();
                                instance.stats.dao_tx += 1;
                            }
                        }
                    }
                }
            }
        }
    }
}

/// Builds the DAO this node advertises for its own prefix, storing-mode to
/// its preferred parent or non-storing straight to the root (§4.6, §4.7).
/// `None` if there's no parent yet to hang it off of.
fn self_dao(dag: &Dag, cfg: &Config, path_sequence: u8, sequence: u8) -> Option<Dao> {
    let parent = dag.preferred_parent()?;
    let storing = matches!(dag.mop, WireMop::StoringNoMulticast | WireMop::StoringWithMulticast);

    Some(if storing {
        handlers::build_dao_storing(
            dag,
            sequence,
            cfg.local_prefix,
            cfg.local_prefix_length,
            path_sequence,
            dag.default_lifetime,
            cfg.dao_ack_enabled,
        )
    } else {
        handlers::build_dao_nonstoring(
            dag,
            sequence,
            cfg.local_prefix,
            cfg.local_prefix_length,
            path_sequence,
            dag.default_lifetime,
            parent.address,
            cfg.dao_ack_enabled,
        )
    })
}

/// Where `self_dao`'s result goes: the parent itself in storing mode, the
/// root directly in non-storing mode (§4.7).
fn self_dao_dst(dag: &Dag) -> Option<Ipv6Addr> {
    let storing = matches!(dag.mop, WireMop::StoringNoMulticast | WireMop::StoringWithMulticast);
    if storing {
        dag.preferred_parent().map(|p| p.address)
    } else {
        Some(dag.dodag_id)
    }
}

#[allow(clippy::too_many_arguments)]
fn handle_datagram(
    instance: &mut Instance,
    cfg: &Config,
    datagram: &[u8],
    src: Ipv6Addr,
    of: &dyn ObjectiveFunction,
    link_stats: &InMemoryLinkStats,
    retransmissions: &mut RetransmissionQueue,
    neighbors: &mut InMemoryNeighborCache,
    rng: &mut RandRng,
    clock: &WallClock,
    transport: &mut UdpTransport,
    routes: &mut InMemoryRouteTable,
    source_routes: &mut InMemorySourceRouteTable,
) -> Result<(), rpl_core::codec::CodecError> {
    use rpl_core::collab::{IcmpTransport, RouteTable, SourceRouteTable};

    let mut reader = ReadBuffer::new(datagram);
    let header = IcmpHeader::read::<BigEndian>(&mut reader)?;
    let now = clock.now_ms();

    let effects = match header.code {
        IcmpCode::Dis => {
            instance.stats.dis_rx += 1;
            let _ = Dis::read::<BigEndian>(&mut reader)?;
            handlers::handle_dis(instance, src)
        }
        IcmpCode::Dio => {
            instance.stats.dio_rx += 1;
            let dio = Dio::read::<BigEndian>(&mut reader)?;
            let etx = link_stats.etx(&src);
            let outcome = handlers::handle_dio(instance, &dio, src, of, etx, now);

            let mut dio_effects = Vec::new();
            let triggers_dao = !cfg.root
                && matches!(
                    outcome,
                    DioOutcome::Joined | DioOutcome::ParentSwitched | DioOutcome::DtsnIncreased
                );

            if triggers_dao {
                if let Some(dag) = instance.dag.clone() {
                    if let Some(dst) = self_dao_dst(&dag) {
                        let path_sequence = instance.next_path_sequence();
                        let sequence = instance.next_dao_sequence();
                        if let Some(msg) = self_dao(&dag, cfg, path_sequence, sequence) {
                            if cfg.dao_ack_enabled {
                                retransmissions.track(dst, sequence, now, rng);
                            }
                            dio_effects.push(Effect::SendDao { dst, msg });
                        }
                    }
                }
            }

            dio_effects
        }
        IcmpCode::Dao => {
            instance.stats.dao_rx += 1;
            let dao = Dao::read::<BigEndian>(&mut reader)?;
            handlers::handle_dao(instance, &dao, src, now, neighbors)
        }
        IcmpCode::DaoAck => {
            instance.stats.dao_ack_rx += 1;
            let ack = DaoAck::read::<BigEndian>(&mut reader)?;
            let (_, ack_effects) = handlers::handle_dao_ack(instance, retransmissions, &ack, src, of);
            ack_effects
        }
        IcmpCode::Dco => {
            instance.stats.dco_rx += 1;
            let dco = Dco::read::<BigEndian>(&mut reader)?;
            handlers::handle_dco(instance, &dco, src, now, (cfg.local_prefix, cfg.local_prefix_length))
        }
        IcmpCode::DcoAck => {
            instance.stats.dco_ack_rx += 1;
            let _ = DcoAck::read::<BigEndian>(&mut reader)?;
            Vec::new()
        }
    };

    for effect in effects {
        match effect {
            Effect::SendDis { dst, msg } => {
                transport.send_dis(dst, &msg).ok();
            }
            Effect::SendDio { dst, msg } => {
                transport.send_dio(dst, &msg).ok();
            }
            Effect::SendDao { dst, msg } => {
                transport.send_dao(dst, &msg).ok();
                instance.stats.dao_tx += 1;
            }
            Effect::SendDaoAck { dst, msg } => {
                transport.send_dao_ack(dst, &msg).ok();
            }
            Effect::SendDco { dst, msg } => {
                transport.send_dco(dst, &msg).ok();
            }
            Effect::SendDcoAck { dst, msg } => {
                transport.send_dco_ack(dst, &msg).ok();
            }
            Effect::InstallRoute { target, prefix_length, next_hop } => {
                routes.insert(target, prefix_length, next_hop);
            }
            Effect::RemoveRoute { target } => routes.remove(&target),
            Effect::InstallSourceRoute { target, prefix_length, via_parent } => {
                source_routes.update_node(target, prefix_length, via_parent);
            }
            Effect::RemoveSourceRoute { target } => source_routes.remove(&target),
        }
    }

    Ok(())
}
