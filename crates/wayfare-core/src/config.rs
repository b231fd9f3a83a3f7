//! Engine configuration: site locators, timeouts and scheduling knobs.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Locators and identity of the booking site the workflow drives.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SiteProfile {
    /// Human name stored on every extracted result
    pub website_name: String,
    /// Page the browser opens on
    pub start_url: String,
    pub location_input: String,
    pub dates_button: String,
    pub guests_button: String,
    pub adults_input: String,
    pub children_input: String,
    pub guests_close_button: String,
    pub search_button: String,
    /// One listing card on the results page
    pub result_card: String,
    pub result_title: String,
    pub result_price: String,
    pub result_rating: String,
    pub result_link: String,
}

impl SiteProfile {
    /// Locators for Booking.com.
    pub fn booking_com() -> Self {
        Self {
            website_name: "Booking.com".to_string(),
            start_url: "https://www.booking.com".to_string(),
            location_input: r#"input[name="ss"]"#.to_string(),
            dates_button: r#"button[data-testid="searchbox-dates-container"]"#.to_string(),
            guests_button: r#"button[data-testid="occupancy-config"]"#.to_string(),
            adults_input: "input#group_adults".to_string(),
            children_input: "input#group_children".to_string(),
            guests_close_button: r#"button[data-testid="occupancy-popup-close"]"#.to_string(),
            search_button: r#"button[type="submit"]"#.to_string(),
            result_card: r#"[data-testid="property-card"]"#.to_string(),
            result_title: r#"[data-testid="title"]"#.to_string(),
            result_price: r#"[data-testid="price-and-discounted-price"]"#.to_string(),
            result_rating: r#"[data-testid="review-score"]"#.to_string(),
            result_link: r#"a[data-testid="title-link"]"#.to_string(),
        }
    }
}

impl Default for SiteProfile {
    fn default() -> Self {
        Self::booking_com()
    }
}

/// Upper bounds on every wait the executors perform.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timeouts {
    /// Initial page load and post-submit navigation
    pub navigation: Duration,
    /// Waiting for an input field before typing
    pub input: Duration,
    /// Waiting for a clickable element
    pub click: Duration,
    /// Waiting for the first result card
    pub extraction: Duration,
}

impl Default for Timeouts {
    fn default() -> Self {
        Self {
            navigation: Duration::from_secs(30),
            input: Duration::from_secs(10),
            click: Duration::from_secs(15),
            extraction: Duration::from_secs(30),
        }
    }
}

/// Everything a workflow run and the execution plan are parameterized by.
#[derive(Debug, Clone, PartialEq)]
pub struct EngineConfig {
    pub site: SiteProfile,
    pub timeouts: Timeouts,
    /// Pause between steps so the page can settle
    pub settle_delay: Duration,
    /// Maximum number of listings stored per run
    pub result_cap: usize,
    /// Limit on concurrently running executions, unbounded when `None`
    pub max_concurrent_runs: Option<usize>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            site: SiteProfile::default(),
            timeouts: Timeouts::default(),
            settle_delay: Duration::from_secs(1),
            result_cap: 10,
            max_concurrent_runs: None,
        }
    }
}

impl EngineConfig {
    pub fn with_settle_delay(mut self, delay: Duration) -> Self {
        self.settle_delay = delay;
        self
    }

    pub fn with_timeouts(mut self, timeouts: Timeouts) -> Self {
        self.timeouts = timeouts;
        self
    }

    pub fn with_max_concurrent_runs(mut self, limit: Option<usize>) -> Self {
        self.max_concurrent_runs = limit.filter(|n| *n > 0);
        self
    }
}
