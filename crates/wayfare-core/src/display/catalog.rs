//! Task catalog listing.

use std::fmt;

use crate::catalog::{Capability, TaskDefinition};

/// Markdown listing of task definitions.
pub struct Catalog(pub Vec<&'static TaskDefinition>);

impl fmt::Display for Catalog {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "# Task Catalog")?;
        writeln!(f)?;
        writeln!(f, "| Kind | Label | Requires | Credits |")?;
        writeln!(f, "|------|-------|----------|---------|")?;
        for def in &self.0 {
            let requires = match def.requires {
                Capability::None => "-",
                Capability::LivePage => "live page",
            };
            let label = if def.entry_point {
                format!("{} (entry point)", def.label)
            } else {
                def.label.to_string()
            };
            writeln!(f, "| {} | {label} | {requires} | {} |", def.kind, def.credits)?;
        }
        writeln!(f)?;
        for def in &self.0 {
            write!(f, "{def}")?;
        }
        Ok(())
    }
}
