//! Static catalog of the step kinds a workflow can contain.
//!
//! Each [`TaskKind`] has exactly one [`TaskDefinition`] describing its inputs,
//! outputs and the browser capability it needs. The catalog is consulted
//! before every step runs: [`TaskDefinition::validate`] rejects a step whose
//! parameters break the definition's rules.
//!
//! ```rust
//! use wayfare_core::catalog::{self, Capability, TaskKind};
//!
//! let launch = catalog::definition(TaskKind::LaunchBrowser);
//! assert!(launch.entry_point);
//! assert_eq!(launch.requires, Capability::None);
//! assert_eq!(catalog::all().len(), 4);
//! ```

use std::{fmt, str::FromStr};

use serde::Serialize;

use crate::{
    error::{EngineError, Result},
    step::Step,
};

/// Kinds of step the engine knows how to execute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TaskKind {
    LaunchBrowser,
    FillInput,
    ClickElement,
    SetGuestCounts,
}

impl TaskKind {
    pub const ALL: [TaskKind; 4] = [
        TaskKind::LaunchBrowser,
        TaskKind::FillInput,
        TaskKind::ClickElement,
        TaskKind::SetGuestCounts,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            TaskKind::LaunchBrowser => "LAUNCH_BROWSER",
            TaskKind::FillInput => "FILL_INPUT",
            TaskKind::ClickElement => "CLICK_ELEMENT",
            TaskKind::SetGuestCounts => "SET_GUESTS",
        }
    }
}

impl fmt::Display for TaskKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TaskKind {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        TaskKind::ALL
            .into_iter()
            .find(|kind| kind.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("Unknown task kind: {s}"))
    }
}

/// Type of a task input or output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ParamType {
    String,
    Date,
    Number,
    Boolean,
    BrowserInstance,
}

/// One declared input or output of a task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TaskParam {
    pub name: &'static str,
    pub param_type: ParamType,
    pub required: bool,
    pub helper_text: Option<&'static str>,
}

/// What a task needs from the execution context before it can run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Capability {
    /// Runs on an empty context
    None,
    /// Needs the page produced by an earlier launch step
    LivePage,
}

/// Static description of a task kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TaskDefinition {
    pub kind: TaskKind,
    pub label: &'static str,
    pub inputs: &'static [TaskParam],
    pub outputs: &'static [TaskParam],
    pub requires: Capability,
    /// Inputs of which exactly one must be supplied, empty when unused
    pub exactly_one_of: &'static [&'static str],
    pub credits: u32,
    pub entry_point: bool,
}

const PAGE_OUTPUT: TaskParam = TaskParam {
    name: "page",
    param_type: ParamType::BrowserInstance,
    required: true,
    helper_text: None,
};

static LAUNCH_BROWSER: TaskDefinition = TaskDefinition {
    kind: TaskKind::LaunchBrowser,
    label: "Launch Browser",
    inputs: &[TaskParam {
        name: "website_url",
        param_type: ParamType::String,
        required: true,
        helper_text: Some("URL to navigate to"),
    }],
    outputs: &[
        TaskParam {
            name: "browser",
            param_type: ParamType::BrowserInstance,
            required: true,
            helper_text: None,
        },
        PAGE_OUTPUT,
    ],
    requires: Capability::None,
    exactly_one_of: &[],
    credits: 5,
    entry_point: true,
};

static FILL_INPUT: TaskDefinition = TaskDefinition {
    kind: TaskKind::FillInput,
    label: "Fill Input Field",
    inputs: &[
        TaskParam {
            name: "selector",
            param_type: ParamType::String,
            required: true,
            helper_text: Some("CSS selector for the input field"),
        },
        TaskParam {
            name: "value",
            param_type: ParamType::String,
            required: true,
            helper_text: Some("Value to fill in the input"),
        },
    ],
    outputs: &[PAGE_OUTPUT],
    requires: Capability::LivePage,
    exactly_one_of: &[],
    credits: 1,
    entry_point: false,
};

static CLICK_ELEMENT: TaskDefinition = TaskDefinition {
    kind: TaskKind::ClickElement,
    label: "Click Element",
    inputs: &[
        TaskParam {
            name: "selector",
            param_type: ParamType::String,
            required: false,
            helper_text: Some("CSS selector for the element to click"),
        },
        TaskParam {
            name: "date",
            param_type: ParamType::Date,
            required: false,
            helper_text: Some("Calendar date to pick in an open date picker"),
        },
        TaskParam {
            name: "wait_for_navigation",
            param_type: ParamType::Boolean,
            required: false,
            helper_text: Some("Wait for page navigation after click"),
        },
    ],
    outputs: &[PAGE_OUTPUT],
    requires: Capability::LivePage,
    exactly_one_of: &["selector", "date"],
    credits: 1,
    entry_point: false,
};

static SET_GUEST_COUNTS: TaskDefinition = TaskDefinition {
    kind: TaskKind::SetGuestCounts,
    label: "Set Guests",
    inputs: &[
        TaskParam {
            name: "adults",
            param_type: ParamType::Number,
            required: true,
            helper_text: Some("Number of adult guests"),
        },
        TaskParam {
            name: "children",
            param_type: ParamType::Number,
            required: true,
            helper_text: Some("Number of child guests"),
        },
        TaskParam {
            name: "adults_selector",
            param_type: ParamType::String,
            required: true,
            helper_text: Some("CSS selector for the adults count field"),
        },
        TaskParam {
            name: "children_selector",
            param_type: ParamType::String,
            required: true,
            helper_text: Some("CSS selector for the children count field"),
        },
    ],
    outputs: &[PAGE_OUTPUT],
    requires: Capability::LivePage,
    exactly_one_of: &[],
    credits: 1,
    entry_point: false,
};

/// Definition of one task kind.
pub fn definition(kind: TaskKind) -> &'static TaskDefinition {
    match kind {
        TaskKind::LaunchBrowser => &LAUNCH_BROWSER,
        TaskKind::FillInput => &FILL_INPUT,
        TaskKind::ClickElement => &CLICK_ELEMENT,
        TaskKind::SetGuestCounts => &SET_GUEST_COUNTS,
    }
}

/// Every definition, in [`TaskKind::ALL`] order.
pub fn all() -> Vec<&'static TaskDefinition> {
    TaskKind::ALL.into_iter().map(definition).collect()
}

impl TaskDefinition {
    /// Checks a step against this definition and reports the first rule it
    /// breaks.
    pub fn validate(&self, step: &Step) -> Result<()> {
        if step.kind() != self.kind {
            return Err(EngineError::invalid_step(
                &step.id,
                format!("expected a {} step, got {}", self.kind, step.kind()),
            ));
        }

        let provided = step.params.provided();
        if let Some(missing) = self
            .inputs
            .iter()
            .find(|input| input.required && !provided.contains(&input.name))
        {
            return Err(EngineError::invalid_step(
                &step.id,
                format!("missing required input '{}'", missing.name),
            ));
        }

        if !self.exactly_one_of.is_empty() {
            let supplied = self
                .exactly_one_of
                .iter()
                .filter(|name| provided.contains(*name))
                .count();
            if supplied != 1 {
                return Err(EngineError::invalid_step(
                    &step.id,
                    format!(
                        "exactly one of {} must be set, found {supplied}",
                        self.exactly_one_of.join(", ")
                    ),
                ));
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use jiff::civil::date;

    use super::*;
    use crate::executors::{ClickElement, FillInput};
    use crate::step::StepParams;

    fn click(selector: Option<&str>, with_date: bool) -> Step {
        Step::new(
            "select-checkin",
            "Select Check-in Date",
            StepParams::ClickElement(ClickElement {
                selector: selector.map(String::from),
                date: with_date.then(|| date(2025, 7, 14)),
                wait_for_navigation: false,
            }),
        )
    }

    #[test]
    fn test_every_kind_has_a_definition() {
        for kind in TaskKind::ALL {
            assert_eq!(definition(kind).kind, kind);
        }
        let entry_points: Vec<_> = all().into_iter().filter(|d| d.entry_point).collect();
        assert_eq!(entry_points.len(), 1);
        assert_eq!(entry_points[0].kind, TaskKind::LaunchBrowser);
    }

    #[test]
    fn test_click_requires_exactly_one_target() {
        let def = definition(TaskKind::ClickElement);

        assert!(def.validate(&click(Some("button"), false)).is_ok());
        assert!(def.validate(&click(None, true)).is_ok());

        let neither = def.validate(&click(None, false)).unwrap_err();
        assert!(matches!(neither, EngineError::InvalidStepParameters { .. }));
        assert!(neither.to_string().contains("found 0"));

        let both = def.validate(&click(Some("button"), true)).unwrap_err();
        assert!(matches!(both, EngineError::InvalidStepParameters { .. }));
        assert!(both.to_string().contains("found 2"));
    }

    #[test]
    fn test_fill_requires_selector() {
        let step = Step::new(
            "fill-location",
            "Fill Location",
            StepParams::FillInput(FillInput {
                selector: String::new(),
                value: "Lisbon".to_string(),
            }),
        );
        let err = definition(TaskKind::FillInput).validate(&step).unwrap_err();
        assert!(err.to_string().contains("'selector'"));
    }

    #[test]
    fn test_kind_mismatch_is_rejected() {
        let err = definition(TaskKind::FillInput)
            .validate(&click(Some("button"), false))
            .unwrap_err();
        assert!(matches!(err, EngineError::InvalidStepParameters { .. }));
    }

    #[test]
    fn test_kind_from_str() {
        assert_eq!("set_guests".parse::<TaskKind>(), Ok(TaskKind::SetGuestCounts));
        assert!("SCROLL".parse::<TaskKind>().is_err());
    }
}
