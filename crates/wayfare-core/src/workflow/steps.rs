//! The fixed step list of a booking search.

use crate::{
    config::SiteProfile,
    executors::{ClickElement, FillInput, LaunchBrowser, SetGuestCounts},
    models::SearchRequest,
    step::{Step, StepParams},
};

/// Builds the nine steps that take a fresh browser to a results page.
pub fn build_booking_steps(request: &SearchRequest, site: &SiteProfile) -> Vec<Step> {
    vec![
        Step::new(
            "launch-browser",
            "Launch Browser",
            StepParams::LaunchBrowser(LaunchBrowser {
                website_url: site.start_url.clone(),
            }),
        ),
        Step::new(
            "fill-location",
            "Fill Location",
            StepParams::FillInput(FillInput {
                selector: site.location_input.clone(),
                value: request.location.clone(),
            }),
        ),
        Step::new(
            "click-dates",
            "Open Date Picker",
            StepParams::ClickElement(ClickElement::on(&site.dates_button)),
        ),
        Step::new(
            "select-checkin",
            "Select Check-in Date",
            StepParams::ClickElement(ClickElement::on_date(request.start_date)),
        ),
        Step::new(
            "select-checkout",
            "Select Check-out Date",
            StepParams::ClickElement(ClickElement::on_date(request.end_date)),
        ),
        Step::new(
            "click-guests",
            "Open Guest Selector",
            StepParams::ClickElement(ClickElement::on(&site.guests_button)),
        ),
        Step::new(
            "set-guests",
            "Set Guests",
            StepParams::SetGuestCounts(SetGuestCounts {
                adults: request.adult_count,
                children: request.child_count,
                adults_selector: site.adults_input.clone(),
                children_selector: site.children_input.clone(),
            }),
        ),
        Step::new(
            "close-guests-popup",
            "Close Guest Selector",
            StepParams::ClickElement(ClickElement::on(&site.guests_close_button)),
        ),
        Step::new(
            "search",
            "Click Search",
            StepParams::ClickElement(ClickElement::on(&site.search_button).with_navigation()),
        ),
    ]
}
