use std::{sync::Arc, time::Duration};

use jiff::civil::date;
use tempfile::TempDir;
use wayfare_core::{
    EngineConfig, ExecutionPlan, ExecutionPlanBuilder, ScriptedDriver, SearchRequest,
    driver::RawListing,
};

/// Engine settings for tests: no settle delay between steps.
pub fn test_config() -> EngineConfig {
    EngineConfig::default().with_settle_delay(Duration::ZERO)
}

/// Helper function to create a test plan backed by a scripted driver
pub async fn create_test_plan(
    driver: ScriptedDriver,
    config: EngineConfig,
) -> (TempDir, ExecutionPlan, Arc<ScriptedDriver>) {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let db_path = temp_dir.path().join("test.db");
    let driver = Arc::new(driver);
    let plan = ExecutionPlanBuilder::new()
        .with_database_path(Some(&db_path))
        .with_driver(driver.clone())
        .with_config(config)
        .build()
        .await
        .expect("Failed to create plan");
    (temp_dir, plan, driver)
}

pub fn search_request(location: &str) -> SearchRequest {
    SearchRequest {
        query: format!("a few nights in {location}"),
        location: location.to_string(),
        start_date: date(2025, 7, 14),
        end_date: date(2025, 7, 18),
        adult_count: 2,
        child_count: 1,
        activity_type: Default::default(),
    }
}

/// `count` listings named "Hotel 1" through "Hotel N".
pub fn listings(count: usize) -> Vec<RawListing> {
    (1..=count)
        .map(|n| RawListing {
            name: format!("Hotel {n}"),
            price: format!("€ 1,{n:03}"),
            rating: format!("{}.{n}", 7 + n % 3),
            url: format!("https://www.booking.com/hotel/{n}"),
        })
        .collect()
}

pub const POLL: Duration = Duration::from_millis(5);
