//! Display implementations for domain models.
//!
//! Kept apart from the model definitions so the data structures carry no
//! presentation logic.

use std::fmt;

use super::datetime::{LocalDateTime, RunDuration};
use crate::{
    catalog::TaskDefinition,
    models::{
        Activity, ActivityResults, ActivityType, ExecutionReport, ExecutionStatus, RunFilter,
        RunListing, RunsReport, SearchResult, SearchStatus, WorkflowExecution,
    },
};

impl fmt::Display for ExecutionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl fmt::Display for SearchStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl fmt::Display for ActivityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl fmt::Display for RunFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Text progress bar, e.g. `[######----] 6/10`.
fn progress_bar(completed: u32, total: u32) -> String {
    const WIDTH: u32 = 10;
    let filled = if total == 0 {
        0
    } else {
        completed.min(total) * WIDTH / total
    };
    format!(
        "[{}{}] {completed}/{total}",
        "#".repeat(filled as usize),
        "-".repeat((WIDTH - filled) as usize)
    )
}

impl fmt::Display for ExecutionReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "# Execution {} ({})", self.id, self.status.with_icon())?;
        writeln!(f)?;
        writeln!(f, "- Activity: {}", self.activity_id)?;
        writeln!(
            f,
            "- Progress: {} ({}%)",
            progress_bar(self.steps_completed, self.total_steps),
            self.percent()
        )?;
        if let Some(step) = &self.current_step {
            writeln!(f, "- Current step: {step}")?;
        }
        if let Some(started) = &self.started_at {
            writeln!(f, "- Started: {}", LocalDateTime(started))?;
        }
        if let Some(completed) = &self.completed_at {
            writeln!(f, "- Finished: {}", LocalDateTime(completed))?;
        }
        if let Some(duration) = RunDuration::between(self.started_at, self.completed_at) {
            writeln!(f, "- Duration: {duration}")?;
        }
        if let Some(error) = &self.error_message {
            writeln!(f)?;
            writeln!(f, "**Error:** {error}")?;
        }
        Ok(())
    }
}

impl fmt::Display for WorkflowExecution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", ExecutionReport::from(self))
    }
}

impl fmt::Display for Activity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "# Activity {}: {}", self.id, self.location)?;
        writeln!(f)?;
        writeln!(f, "- Type: {}", self.activity_type)?;
        writeln!(
            f,
            "- Dates: {} to {} ({} nights)",
            self.start_date,
            self.end_date,
            self.nights()
        )?;
        writeln!(
            f,
            "- Guests: {} adults, {} children",
            self.adult_count, self.child_count
        )?;
        writeln!(f, "- Updated: {}", LocalDateTime(&self.updated_at))?;
        if !self.query.is_empty() {
            writeln!(f)?;
            writeln!(f, "> {}", self.query)?;
        }
        Ok(())
    }
}

impl fmt::Display for SearchResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "### {}", self.property_name)?;
        writeln!(f)?;
        match self.price {
            Some(price) => writeln!(f, "- Price: {price}")?,
            None => writeln!(f, "- Price: n/a")?,
        }
        match self.rating {
            Some(rating) => writeln!(f, "- Rating: {rating:.1}")?,
            None => writeln!(f, "- Rating: n/a")?,
        }
        writeln!(f, "- Source: {}", self.website_name)?;
        if !self.booking_url.is_empty() {
            writeln!(f, "- Link: {}", self.booking_url)?;
        }
        writeln!(f)
    }
}

impl fmt::Display for ActivityResults {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.activity)?;
        writeln!(f)?;
        writeln!(f, "## Results ({})", self.total_results)?;
        writeln!(f)?;
        if self.results.is_empty() {
            writeln!(f, "No results yet.")?;
        }
        for result in &self.results {
            write!(f, "{result}")?;
        }
        Ok(())
    }
}

impl fmt::Display for RunListing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "## Execution {}: {} ({})",
            self.execution_id,
            self.location,
            self.status.with_icon()
        )?;
        writeln!(f)?;
        writeln!(f, "- Activity: {}", self.activity_id)?;
        writeln!(f, "- Guests: {}", self.guest_count)?;
        writeln!(
            f,
            "- Progress: {}",
            progress_bar(self.steps_completed, self.total_steps)
        )?;
        match &self.started_at {
            Some(started) => writeln!(f, "- Started: {}", LocalDateTime(started))?,
            None => writeln!(f, "- Created: {}", LocalDateTime(&self.created_at))?,
        }
        if let Some(duration) = RunDuration::between(self.started_at, self.completed_at) {
            writeln!(f, "- Duration: {duration}")?;
        }
        if self.status == ExecutionStatus::Completed {
            writeln!(f, "- Results: {}", self.result_count)?;
        }
        if let Some(error) = &self.error_message {
            writeln!(f, "- Error: {error}")?;
        }
        if !self.query.is_empty() {
            writeln!(f)?;
            writeln!(f, "> {}", self.query)?;
        }
        writeln!(f)
    }
}

impl fmt::Display for RunsReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "# Runs: {}", self.filter)?;
        writeln!(f)?;
        let tabs: Vec<_> = [
            RunFilter::All,
            RunFilter::Successful,
            RunFilter::Failed,
            RunFilter::Running,
        ]
        .iter()
        .map(|filter| format!("{filter} ({})", self.counts.get(*filter)))
        .collect();
        writeln!(f, "{}", tabs.join(" | "))?;
        writeln!(f)?;

        if self.runs.is_empty() {
            writeln!(f, "No runs found.")?;
            return match self.filter {
                RunFilter::All => writeln!(f, "No workflow runs have been executed yet."),
                other => writeln!(f, "No {other} runs found."),
            };
        }
        for run in &self.runs {
            write!(f, "{run}")?;
        }
        Ok(())
    }
}

impl fmt::Display for TaskDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "## {} ({})", self.label, self.kind)?;
        writeln!(f)?;
        for input in self.inputs {
            let required = if input.required { "required" } else { "optional" };
            write!(f, "- `{}` {required}", input.name)?;
            if let Some(help) = input.helper_text {
                write!(f, ": {help}")?;
            }
            writeln!(f)?;
        }
        if !self.exactly_one_of.is_empty() {
            writeln!(f, "- exactly one of: {}", self.exactly_one_of.join(", "))?;
        }
        let outputs: Vec<_> = self.outputs.iter().map(|o| o.name).collect();
        writeln!(f, "- produces: {}", outputs.join(", "))?;
        writeln!(f)
    }
}
