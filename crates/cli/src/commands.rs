//! Command implementations.

use std::collections::BTreeSet;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{bail, Context};
use clap::Subcommand;
use corelib::{MirroredZonePartitioner, NodeId, PartitionId, PartitionRing, Partitioner, Topology, ZoneId};
use replication::{build_strategy, RoutingStrategy, StoreDefinition};
use tracing::{info, warn};

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Hash the keys "0".."N" and report how evenly they fall into buckets.
    Distribution {
        /// Number of keys to hash.
        #[arg(long)]
        iterations: usize,
        /// Number of buckets to count hashes into.
        #[arg(long)]
        buckets: usize,
        /// Triads the hash is reduced over.
        #[arg(long, default_value_t = 2048)]
        master_partitions: usize,
    },
    /// Print the replica partitions and nodes of each key.
    Route {
        /// Topology JSON file.
        #[arg(long)]
        topology: PathBuf,
        /// Store definition JSON file.
        #[arg(long)]
        store: PathBuf,
        #[arg(required = true)]
        keys: Vec<String>,
    },
    /// Check that a topology and store definition can route keys.
    Validate {
        #[arg(long)]
        topology: PathBuf,
        #[arg(long)]
        store: PathBuf,
    },
}

/// Hash count for one bucket.
#[derive(Debug, Clone, PartialEq)]
pub struct BucketCount {
    pub bucket: usize,
    pub count: usize,
    /// `count` relative to a perfectly even spread.
    pub ratio: f64,
}

/// One replica of a routed key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Replica {
    pub partition: PartitionId,
    pub node: NodeId,
    pub host: String,
    pub zone: ZoneId,
}

/// Routing result for one key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyRoute {
    pub key: String,
    pub replicas: Vec<Replica>,
    pub missing: usize,
}

/// What `validate` learned about the cluster.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClusterSummary {
    pub store: String,
    pub strategy: String,
    pub nodes: usize,
    pub partitions: usize,
    pub triads: usize,
    pub zones: BTreeSet<ZoneId>,
    /// Configured zones that own no partition; keys will be under-replicated.
    pub unserved_zones: Vec<ZoneId>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum CommandResult {
    Distribution(Vec<BucketCount>),
    Routes(Vec<KeyRoute>),
    Validated(ClusterSummary),
}

impl Command {
    pub fn execute(&self) -> anyhow::Result<CommandResult> {
        match self {
            Command::Distribution {
                iterations,
                buckets,
                master_partitions,
            } => distribution(*iterations, *buckets, *master_partitions)
                .map(CommandResult::Distribution),
            Command::Route {
                topology,
                store,
                keys,
            } => route(topology, store, keys).map(CommandResult::Routes),
            Command::Validate { topology, store } => {
                validate(topology, store).map(CommandResult::Validated)
            }
        }
    }
}

fn distribution(
    iterations: usize,
    buckets: usize,
    master_partitions: usize,
) -> anyhow::Result<Vec<BucketCount>> {
    if buckets == 0 {
        bail!("--buckets must be at least 1");
    }
    if master_partitions == 0 {
        bail!("--master-partitions must be at least 1");
    }

    let partitioner = MirroredZonePartitioner::new(master_partitions);
    let mut counts = vec![0usize; buckets];
    for i in 0..iterations {
        let index = partitioner.partition(i.to_string().as_bytes());
        counts[index % buckets] += 1;
    }

    let expected = iterations as f64 / buckets as f64;
    Ok(counts
        .into_iter()
        .enumerate()
        .map(|(bucket, count)| BucketCount {
            bucket,
            count,
            ratio: if expected > 0.0 {
                count as f64 / expected
            } else {
                0.0
            },
        })
        .collect())
}

fn load(topology: &Path, store: &Path) -> anyhow::Result<(Arc<PartitionRing>, StoreDefinition)> {
    let ring = Topology::load(topology)
        .and_then(Topology::into_ring)
        .with_context(|| format!("loading topology {}", topology.display()))?;
    let store = StoreDefinition::load(store)
        .with_context(|| format!("loading store definition {}", store.display()))?;
    info!(
        nodes = ring.node_count(),
        partitions = ring.partition_count(),
        store = %store.name,
        "loaded cluster"
    );
    Ok((Arc::new(ring), store))
}

fn route(topology: &Path, store: &Path, keys: &[String]) -> anyhow::Result<Vec<KeyRoute>> {
    let (ring, store) = load(topology, store)?;
    let strategy = build_strategy(&store, Arc::clone(&ring))?;

    keys.iter()
        .map(|key| -> anyhow::Result<KeyRoute> {
            let selection = strategy.partition_list(key.as_bytes())?;
            let replicas = selection
                .partitions()
                .iter()
                .filter_map(|&partition| {
                    ring.node_for_partition(partition).map(|node| Replica {
                        partition,
                        node: node.id,
                        host: node.host.clone(),
                        zone: node.zone_id,
                    })
                })
                .collect();
            if !selection.is_complete() {
                warn!(key = %key, missing = selection.missing(), "key is under-replicated");
            }
            Ok(KeyRoute {
                key: key.clone(),
                replicas,
                missing: selection.missing(),
            })
        })
        .collect()
}

fn validate(topology: &Path, store: &Path) -> anyhow::Result<ClusterSummary> {
    let (ring, store) = load(topology, store)?;
    let strategy = build_strategy(&store, Arc::clone(&ring))?;
    store
        .zone_replication_factor
        .validate_mirrored(store.replication_factor)
        .with_context(|| format!("store {}", store.name))?;

    let served: BTreeSet<ZoneId> = ring
        .nodes()
        .iter()
        .filter(|node| node.partition_count() > 0)
        .map(|node| node.zone_id)
        .collect();
    let unserved_zones: Vec<ZoneId> = store
        .zone_replication_factor
        .iter()
        .map(|(zone, _)| zone)
        .filter(|zone| !served.contains(zone))
        .collect();
    if !unserved_zones.is_empty() {
        warn!(zones = ?unserved_zones, "configured zones own no partitions");
    }

    Ok(ClusterSummary {
        store: store.name.clone(),
        strategy: strategy.strategy_type().to_string(),
        nodes: ring.node_count(),
        partitions: ring.partition_count(),
        triads: ring.master_partition_count(),
        zones: ring.zones(),
        unserved_zones,
    })
}

impl fmt::Display for CommandResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CommandResult::Distribution(buckets) => {
                for b in buckets {
                    writeln!(f, "{} {} {}", b.bucket, b.count, b.ratio)?;
                }
            }
            CommandResult::Routes(routes) => {
                for route in routes {
                    write!(f, "{}:", route.key)?;
                    for replica in &route.replicas {
                        write!(
                            f,
                            " {}@{}({}, {})",
                            replica.partition, replica.node, replica.host, replica.zone
                        )?;
                    }
                    if route.missing > 0 {
                        write!(f, " [under-replicated, {} missing]", route.missing)?;
                    }
                    writeln!(f)?;
                }
            }
            CommandResult::Validated(summary) => {
                writeln!(f, "store:      {}", summary.store)?;
                writeln!(f, "strategy:   {}", summary.strategy)?;
                writeln!(f, "nodes:      {}", summary.nodes)?;
                writeln!(f, "partitions: {}", summary.partitions)?;
                writeln!(f, "triads:     {}", summary.triads)?;
                let zones: Vec<String> = summary.zones.iter().map(ZoneId::to_string).collect();
                writeln!(f, "zones:      {}", zones.join(", "))?;
                if !summary.unserved_zones.is_empty() {
                    let unserved: Vec<String> =
                        summary.unserved_zones.iter().map(ZoneId::to_string).collect();
                    writeln!(f, "unserved:   {}", unserved.join(", "))?;
                }
            }
        }
        Ok(())
    }
}
