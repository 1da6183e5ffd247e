use std::{
    env, error, fmt, io,
    path::{Path, PathBuf},
    sync::Arc,
};

use async_trait::async_trait;
use model::{
    layer::MapLayer,
    service::{RoutingConfig, ServiceDefinition},
};
use serde::de::DeserializeOwned;
use serde_json::Value;

#[derive(Debug, Clone)]
pub enum SourceError {
    Io { path: PathBuf, error: Arc<io::Error> },
    Json { path: PathBuf, error: Arc<serde_json::Error> },
}

impl error::Error for SourceError {}

impl fmt::Display for SourceError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            SourceError::Io { path, error } => {
                write!(f, "could not read {}: {}", path.display(), error)
            }
            SourceError::Json { path, error } => {
                write!(f, "could not parse {}: {}", path.display(), error)
            }
        }
    }
}

pub type SourceResult<T> = Result<T, SourceError>;

/// Supplies the reference data of a reporting session. Implementations are
/// queried once per session; the results are treated as read only.
#[async_trait]
pub trait ConfigSource: Send + Sync {
    /// The jurisdiction boundary as a raw GeoJSON document, `None` if no
    /// boundary is configured.
    async fn boundary(&self) -> SourceResult<Option<Value>>;

    async fn map_layers(&self) -> SourceResult<Vec<MapLayer>>;

    async fn services(&self) -> SourceResult<Vec<ServiceDefinition>>;

    async fn routing_config(
        &self,
        service_code: &str,
    ) -> SourceResult<Option<RoutingConfig>> {
        Ok(self
            .services()
            .await?
            .into_iter()
            .find(|service| service.service_code == service_code)
            .and_then(|service| service.routing_config))
    }
}

#[derive(Debug, Clone, Default)]
pub struct InMemorySource {
    pub boundary: Option<Value>,
    pub layers: Vec<MapLayer>,
    pub services: Vec<ServiceDefinition>,
}

impl InMemorySource {
    pub fn new(
        boundary: Option<Value>,
        layers: Vec<MapLayer>,
        services: Vec<ServiceDefinition>,
    ) -> Self {
        Self {
            boundary,
            layers,
            services,
        }
    }
}

#[async_trait]
impl ConfigSource for InMemorySource {
    async fn boundary(&self) -> SourceResult<Option<Value>> {
        Ok(self.boundary.clone())
    }

    async fn map_layers(&self) -> SourceResult<Vec<MapLayer>> {
        Ok(self.layers.clone())
    }

    async fn services(&self) -> SourceResult<Vec<ServiceDefinition>> {
        Ok(self.services.clone())
    }
}

/// Locations of the JSON files read by [`FileSource`]. A missing path means
/// the corresponding data is not configured.
#[derive(Debug, Clone, Default)]
pub struct ResourcePaths {
    pub boundary: Option<PathBuf>,
    pub layers: Option<PathBuf>,
    pub services: Option<PathBuf>,
}

impl ResourcePaths {
    pub fn from_env() -> Self {
        let path = |key: &str| env::var(key).ok().map(PathBuf::from);
        Self {
            boundary: path("REPORTING_BOUNDARY_FILE"),
            layers: path("REPORTING_LAYERS_FILE"),
            services: path("REPORTING_SERVICES_FILE"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct FileSource {
    paths: ResourcePaths,
}

impl FileSource {
    pub fn new(paths: ResourcePaths) -> Self {
        Self { paths }
    }

    async fn read<T: DeserializeOwned>(path: &Path) -> SourceResult<T> {
        let text = tokio::fs::read_to_string(path)
            .await
            .map_err(|error| SourceError::Io {
                path: path.to_owned(),
                error: Arc::new(error),
            })?;
        serde_json::from_str(&text).map_err(|error| SourceError::Json {
            path: path.to_owned(),
            error: Arc::new(error),
        })
    }
}

#[async_trait]
impl ConfigSource for FileSource {
    async fn boundary(&self) -> SourceResult<Option<Value>> {
        match &self.paths.boundary {
            Some(path) => Self::read(path).await.map(Some),
            None => Ok(None),
        }
    }

    async fn map_layers(&self) -> SourceResult<Vec<MapLayer>> {
        match &self.paths.layers {
            Some(path) => Self::read(path).await,
            None => Ok(Vec::new()),
        }
    }

    async fn services(&self) -> SourceResult<Vec<ServiceDefinition>> {
        match &self.paths.services {
            Some(path) => Self::read(path).await,
            None => Ok(Vec::new()),
        }
    }
}
