//! Concrete step instances.

use serde::{Deserialize, Serialize};

use crate::{
    catalog::TaskKind,
    executors::{ClickElement, FillInput, LaunchBrowser, SetGuestCounts},
};

/// One step of a workflow: a task kind plus the arguments for it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Step {
    /// Stable identifier, e.g. `fill-location`
    pub id: String,
    /// Shown as the execution's current step while this step runs
    pub display_name: String,
    pub params: StepParams,
}

impl Step {
    pub fn new(id: impl Into<String>, display_name: impl Into<String>, params: StepParams) -> Self {
        Self {
            id: id.into(),
            display_name: display_name.into(),
            params,
        }
    }

    pub fn kind(&self) -> TaskKind {
        self.params.kind()
    }
}

/// Step arguments, one variant per [`TaskKind`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "task", rename_all = "snake_case")]
pub enum StepParams {
    LaunchBrowser(LaunchBrowser),
    FillInput(FillInput),
    ClickElement(ClickElement),
    SetGuestCounts(SetGuestCounts),
}

impl StepParams {
    pub fn kind(&self) -> TaskKind {
        match self {
            StepParams::LaunchBrowser(_) => TaskKind::LaunchBrowser,
            StepParams::FillInput(_) => TaskKind::FillInput,
            StepParams::ClickElement(_) => TaskKind::ClickElement,
            StepParams::SetGuestCounts(_) => TaskKind::SetGuestCounts,
        }
    }

    /// Names of the inputs this instance actually supplies.
    pub fn provided(&self) -> Vec<&'static str> {
        match self {
            StepParams::LaunchBrowser(p) => non_blank("website_url", &p.website_url)
                .into_iter()
                .collect(),
            StepParams::FillInput(p) => non_blank("selector", &p.selector)
                .into_iter()
                .chain(Some("value").filter(|_| !p.value.is_empty()))
                .collect(),
            StepParams::ClickElement(p) => p
                .selector
                .as_deref()
                .and_then(|s| non_blank("selector", s))
                .into_iter()
                .chain(p.date.map(|_| "date"))
                .collect(),
            StepParams::SetGuestCounts(p) => ["adults", "children"]
                .into_iter()
                .chain(non_blank("adults_selector", &p.adults_selector))
                .chain(non_blank("children_selector", &p.children_selector))
                .collect(),
        }
    }
}

fn non_blank(name: &'static str, value: &str) -> Option<&'static str> {
    (!value.trim().is_empty()).then_some(name)
}

#[cfg(test)]
mod tests {
    use jiff::civil::date;

    use super::*;

    #[test]
    fn test_click_provided_inputs() {
        let by_date = StepParams::ClickElement(ClickElement::on_date(date(2025, 7, 14)));
        assert_eq!(by_date.provided(), vec!["date"]);

        let blank = StepParams::ClickElement(ClickElement::on("  "));
        assert!(blank.provided().is_empty());
    }

    #[test]
    fn test_fill_with_empty_value_omits_value() {
        let params = StepParams::FillInput(FillInput {
            selector: "input".to_string(),
            value: String::new(),
        });
        assert_eq!(params.provided(), vec!["selector"]);
        assert_eq!(params.kind(), TaskKind::FillInput);
    }

    #[test]
    fn test_params_serialize_with_task_tag() {
        let params = StepParams::SetGuestCounts(SetGuestCounts {
            adults: 2,
            children: 1,
            adults_selector: "input#group_adults".to_string(),
            children_selector: "input#group_children".to_string(),
        });
        let json = serde_json::to_value(&params).unwrap();
        assert_eq!(json["task"], "set_guest_counts");
        assert_eq!(json["adults"], 2);
    }
}
