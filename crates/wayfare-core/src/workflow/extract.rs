//! Reading listings off the results page.

use std::sync::LazyLock;

use regex::Regex;
use serde_json::json;

use crate::{
    config::{SiteProfile, Timeouts},
    driver::{BrowserDriver, DriverError, PageHandle, RawListing, scripts},
    error::{EngineError, Result},
    models::{NewSearchResult, SearchStatus},
};

static PRICE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[\d,]+").expect("valid regex"));
static RATING_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\d+\.?\d*").expect("valid regex"));

/// First run of digits and commas in `text`, commas dropped.
///
/// ```rust
/// use wayfare_core::workflow::parse_price;
///
/// assert_eq!(parse_price("US$1,240"), Some(1240));
/// assert_eq!(parse_price("Sold out"), None);
/// ```
pub fn parse_price(text: &str) -> Option<i64> {
    PRICE_RE
        .find_iter(text)
        .map(|m| m.as_str().replace(',', ""))
        .find(|digits| !digits.is_empty())
        .and_then(|digits| digits.parse().ok())
}

/// First decimal number in `text`.
pub fn parse_rating(text: &str) -> Option<f64> {
    RATING_RE
        .find(text)
        .and_then(|m| m.as_str().parse().ok())
}

/// Waits for the results, reads up to `cap` listings and converts them to
/// rows ready for storage.
pub(crate) async fn extract_listings(
    driver: &dyn BrowserDriver,
    page: &PageHandle,
    site: &SiteProfile,
    timeouts: &Timeouts,
    cap: usize,
) -> Result<Vec<NewSearchResult>> {
    driver
        .wait_for_selector(page, &site.result_card, timeouts.extraction)
        .await
        .map_err(|e| match e {
            DriverError::Timeout(_) | DriverError::ElementNotFound(_) => {
                EngineError::ExtractionTimeout {
                    locator: site.result_card.clone(),
                }
            }
            other => other.into(),
        })?;

    let selectors = json!({
        "card": site.result_card,
        "title": site.result_title,
        "price": site.result_price,
        "rating": site.result_rating,
        "link": site.result_link,
    });
    let value = driver
        .evaluate(page, &scripts::EXTRACT_LISTINGS, &[selectors])
        .await?;
    let listings: Vec<RawListing> = serde_json::from_value(value)?;
    let source_url = driver.current_url(page).await?;

    Ok(listings
        .into_iter()
        .take(cap)
        .map(|listing| NewSearchResult {
            source_url: source_url.clone(),
            website_name: site.website_name.clone(),
            price: parse_price(&listing.price),
            rating: parse_rating(&listing.rating),
            property_name: listing.name,
            booking_url: listing.url,
            status: SearchStatus::Completed,
        })
        .collect())
}
