//! Builder for creating and configuring [`ExecutionPlan`] instances.

use std::{
    collections::HashMap,
    path::{Path, PathBuf},
    sync::Arc,
};

use tokio::{
    sync::{Mutex, mpsc},
    task,
};
use tokio_util::sync::CancellationToken;

use super::{ExecutionPlan, dispatcher::Dispatcher};
use crate::{
    config::EngineConfig,
    db::Database,
    driver::{BrowserDriver, WebDriverClient, webdriver::DEFAULT_WEBDRIVER_URL},
    error::{EngineError, Result},
    store::Store,
};

/// Builder for creating and configuring execution plans.
#[derive(Default)]
pub struct ExecutionPlanBuilder {
    database_path: Option<PathBuf>,
    driver: Option<Arc<dyn BrowserDriver>>,
    config: EngineConfig,
}

impl ExecutionPlanBuilder {
    /// Creates a new builder with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets a custom database file path.
    ///
    /// If not specified, uses XDG Base Directory specification:
    /// `$XDG_DATA_HOME/wayfare/wayfare.db` or `~/.local/share/wayfare/wayfare.db`
    pub fn with_database_path<P: AsRef<Path>>(mut self, path: Option<P>) -> Self {
        if let Some(path) = path {
            self.database_path = Some(path.as_ref().to_path_buf());
        }
        self
    }

    /// Sets the browser driver. Defaults to a [`WebDriverClient`] on
    /// `http://localhost:9515`.
    pub fn with_driver(mut self, driver: Arc<dyn BrowserDriver>) -> Self {
        self.driver = Some(driver);
        self
    }

    pub fn with_config(mut self, config: EngineConfig) -> Self {
        self.config = config;
        self
    }

    /// Builds the plan and starts its dispatcher task.
    ///
    /// Must be called from within a tokio runtime.
    ///
    /// # Errors
    ///
    /// Returns `EngineError::FileSystem` if the database directory cannot be
    /// created, `EngineError::XdgDirectory` if no default path can be
    /// resolved, `EngineError::Database` if schema initialization fails and
    /// `EngineError::Driver` if the default WebDriver client cannot be built.
    pub async fn build(self) -> Result<ExecutionPlan> {
        let db_path = match self.database_path {
            Some(path) => path,
            None => Self::default_database_path()?,
        };

        if let Some(parent) = db_path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| EngineError::FileSystem {
                path: parent.to_path_buf(),
                source: e,
            })?;
        }

        let db_path_clone = db_path.clone();
        task::spawn_blocking(move || Database::new(&db_path_clone).map(drop))
            .await
            .map_err(EngineError::join)??;

        let store = Store::new(db_path);
        let driver: Arc<dyn BrowserDriver> = match self.driver {
            Some(driver) => driver,
            None => Arc::new(WebDriverClient::new(DEFAULT_WEBDRIVER_URL)?),
        };
        let config = Arc::new(self.config);
        let active = Arc::new(Mutex::new(HashMap::new()));
        let shutdown = CancellationToken::new();
        let (jobs, receiver) = mpsc::unbounded_channel();

        let dispatcher = Dispatcher::new(store.clone(), driver, config, Arc::clone(&active));
        let handle = tokio::spawn(dispatcher.run(receiver, shutdown.clone()));

        Ok(ExecutionPlan {
            store,
            jobs,
            active,
            shutdown,
            dispatcher: Mutex::new(Some(handle)),
        })
    }

    /// Returns the default database path following XDG Base Directory
    /// specification.
    fn default_database_path() -> Result<PathBuf> {
        xdg::BaseDirectories::with_prefix("wayfare")
            .place_data_file("wayfare.db")
            .map_err(|e| EngineError::XdgDirectory(e.to_string()))
    }
}
