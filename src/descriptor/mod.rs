//! Connection descriptors for the backing store.
//!
//! A descriptor names where the store lives and how to authenticate; it is
//! consumed by a [`StoreFactory`](crate::store::StoreFactory) implementation.
//! The deployment shape is a tagged union, so a descriptor can never carry a
//! standalone host and a cluster endpoint list at the same time.

/// Descriptor validation error types.
pub mod error;

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

pub use error::DescriptorError;

/// Default port for a standalone store node.
pub const DEFAULT_STANDALONE_PORT: u16 = 6379;

/// Default port for a sentinel node.
pub const DEFAULT_SENTINEL_PORT: u16 = 26379;

/// Default port for a cluster node.
pub const DEFAULT_CLUSTER_PORT: u16 = 6379;

/// Default command timeout: 60 seconds.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

/// A single `host:port` address.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Endpoint {
    /// Host name or address.
    pub host: String,
    /// TCP port.
    pub port: u16,
}

impl Endpoint {
    /// Create an endpoint from a host and port.
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
        }
    }
}

impl FromStr for Endpoint {
    type Err = DescriptorError;

    /// Parse a `host:port` address.
    ///
    /// # Errors
    ///
    /// Returns [`DescriptorError::MalformedEndpoint`] when the separator or
    /// host is missing and [`DescriptorError::InvalidPort`] when the port is
    /// not a number in `[0, 65535]`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (host, port) = s
            .rsplit_once(':')
            .ok_or_else(|| DescriptorError::MalformedEndpoint(s.to_owned()))?;
        if host.is_empty() {
            return Err(DescriptorError::MalformedEndpoint(s.to_owned()));
        }
        let port = port
            .parse::<u16>()
            .map_err(|_| DescriptorError::InvalidPort(port.to_owned()))?;
        Ok(Self::new(host, port))
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.host, self.port)
    }
}

/// Deployment shape of the backing store connection.
///
/// Exactly one variant is selected when a descriptor is built; mode-specific
/// endpoint lists cannot coexist with a direct host/port.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Topology {
    /// A single store node.
    Standalone {
        /// The node address.
        endpoint: Endpoint,
    },
    /// A sentinel-monitored master/replica set.
    Sentinel {
        /// Sentinel node addresses.
        endpoints: Vec<Endpoint>,
        /// Logical name of the monitored master.
        master_id: String,
    },
    /// A sharded cluster.
    Cluster {
        /// Cluster node addresses.
        endpoints: Vec<Endpoint>,
    },
}

/// Validated connection parameters for the backing store.
///
/// Build one through [`ConnectionDescriptor::builder`]; direct construction
/// is possible but skips no validation since the topology is already a
/// tagged union.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectionDescriptor {
    /// Deployment shape and endpoint addresses.
    pub topology: Topology,
    /// Logical database index; only meaningful for standalone deployments.
    pub database: u32,
    /// Client name applied to the store connection, if any.
    pub client_name: Option<String>,
    /// Authentication secret; `None` skips authentication.
    pub password: Option<String>,
    /// Command timeout for synchronous store operations.
    pub timeout: Duration,
}

impl ConnectionDescriptor {
    /// Returns a new [`DescriptorBuilder`].
    pub fn builder() -> DescriptorBuilder {
        DescriptorBuilder::default()
    }

    /// Builder preset for a standalone node on the default port.
    pub fn standalone(host: impl Into<String>) -> DescriptorBuilder {
        Self::builder().host(host).port(DEFAULT_STANDALONE_PORT)
    }

    /// Builder preset for a sentinel deployment with one seed sentinel on
    /// the default sentinel port.
    pub fn sentinel(host: impl Into<String>, master_id: impl Into<String>) -> DescriptorBuilder {
        Self::builder()
            .sentinel(Endpoint::new(host, DEFAULT_SENTINEL_PORT))
            .master_id(master_id)
    }

    /// Builder preset for a cluster with one seed node on the default
    /// cluster port.
    pub fn cluster(host: impl Into<String>) -> DescriptorBuilder {
        Self::builder().cluster(Endpoint::new(host, DEFAULT_CLUSTER_PORT))
    }
}

impl fmt::Display for ConnectionDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.topology {
            Topology::Standalone { endpoint } => {
                write!(f, "standalone {endpoint} db={}", self.database)
            }
            Topology::Sentinel {
                endpoints,
                master_id,
            } => {
                write!(f, "sentinel master={master_id} via [")?;
                for (i, endpoint) in endpoints.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{endpoint}")?;
                }
                write!(f, "]")
            }
            Topology::Cluster { endpoints } => {
                write!(f, "cluster [")?;
                for (i, endpoint) in endpoints.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{endpoint}")?;
                }
                write!(f, "]")
            }
        }
    }
}

/// Validating builder for [`ConnectionDescriptor`].
///
/// Accumulates settings permissively and rejects invalid combinations at
/// [`build`](DescriptorBuilder::build) time: the three topology sources are
/// mutually exclusive, at least one must be set, and sentinel mode requires
/// a master id.
#[derive(Debug, Default)]
pub struct DescriptorBuilder {
    host: Option<String>,
    port: Option<u16>,
    sentinels: Vec<Endpoint>,
    master_id: Option<String>,
    clusters: Vec<Endpoint>,
    database: u32,
    client_name: Option<String>,
    password: Option<String>,
    timeout: Option<Duration>,
}

impl DescriptorBuilder {
    /// Set the standalone host.
    #[must_use]
    pub fn host(mut self, host: impl Into<String>) -> Self {
        self.host = Some(host.into());
        self
    }

    /// Set the standalone port. Defaults to [`DEFAULT_STANDALONE_PORT`].
    #[must_use]
    pub fn port(mut self, port: u16) -> Self {
        self.port = Some(port);
        self
    }

    /// Add a sentinel endpoint.
    #[must_use]
    pub fn sentinel(mut self, endpoint: Endpoint) -> Self {
        self.sentinels.push(endpoint);
        self
    }

    /// Set the sentinel master id.
    #[must_use]
    pub fn master_id(mut self, master_id: impl Into<String>) -> Self {
        self.master_id = Some(master_id.into());
        self
    }

    /// Add a cluster endpoint.
    #[must_use]
    pub fn cluster(mut self, endpoint: Endpoint) -> Self {
        self.clusters.push(endpoint);
        self
    }

    /// Set the logical database index.
    #[must_use]
    pub fn database(mut self, database: u32) -> Self {
        self.database = database;
        self
    }

    /// Set the client name applied to the connection.
    #[must_use]
    pub fn client_name(mut self, client_name: impl Into<String>) -> Self {
        self.client_name = Some(client_name.into());
        self
    }

    /// Set the authentication secret.
    #[must_use]
    pub fn password(mut self, password: impl Into<String>) -> Self {
        self.password = Some(password.into());
        self
    }

    /// Set the command timeout. Defaults to [`DEFAULT_TIMEOUT`].
    #[must_use]
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Validate the accumulated settings and build the descriptor.
    ///
    /// # Errors
    ///
    /// Returns [`DescriptorError::EmptyHost`] for an empty standalone host,
    /// [`DescriptorError::ConflictingTopology`] when more than one of
    /// {host, sentinel list, cluster list} is set,
    /// [`DescriptorError::MissingEndpoint`] when none is set, and
    /// [`DescriptorError::MissingMasterId`] for sentinel mode without a
    /// master id.
    pub fn build(self) -> Result<ConnectionDescriptor, DescriptorError> {
        if let Some(host) = &self.host {
            if host.is_empty() {
                return Err(DescriptorError::EmptyHost);
            }
        }

        let has_sentinels = !self.sentinels.is_empty();
        let has_clusters = !self.clusters.is_empty();

        let topology = if self.host.is_some() && has_sentinels {
            return Err(DescriptorError::ConflictingTopology("standalone", "sentinel"));
        } else if self.host.is_some() && has_clusters {
            return Err(DescriptorError::ConflictingTopology("standalone", "cluster"));
        } else if has_sentinels && has_clusters {
            return Err(DescriptorError::ConflictingTopology("sentinel", "cluster"));
        } else if let Some(host) = self.host {
            Topology::Standalone {
                endpoint: Endpoint::new(host, self.port.unwrap_or(DEFAULT_STANDALONE_PORT)),
            }
        } else if has_sentinels {
            Topology::Sentinel {
                endpoints: self.sentinels,
                master_id: self.master_id.ok_or(DescriptorError::MissingMasterId)?,
            }
        } else if has_clusters {
            Topology::Cluster {
                endpoints: self.clusters,
            }
        } else {
            return Err(DescriptorError::MissingEndpoint);
        };

        Ok(ConnectionDescriptor {
            topology,
            database: self.database,
            client_name: self.client_name,
            password: self.password,
            timeout: self.timeout.unwrap_or(DEFAULT_TIMEOUT),
        })
    }
}
