use owo_colors::OwoColorize;
use owo_colors::Stream::Stdout;
use serde::Serialize;

use rom_harvest_lib::tasks::{self, ContainerKind, TaskInfo};
use rom_harvest_lib::{Catalog, Status};

use crate::CliError;

/// Machine-readable view of a task for `list --json`.
#[derive(Serialize)]
struct TaskListing<'a> {
    name: &'a str,
    title: &'a str,
    system: &'a str,
    input: &'a str,
    container: &'a str,
    catalog: &'a Catalog,
}

impl<'a> From<&'a TaskInfo> for TaskListing<'a> {
    fn from(task: &'a TaskInfo) -> Self {
        Self {
            name: task.name,
            title: task.title,
            system: task.system,
            input: task.input_desc,
            container: container_label(task.container),
            catalog: task.catalog,
        }
    }
}

fn container_label(kind: ContainerKind) -> &'static str {
    match kind {
        ContainerKind::Executable => "executable",
        ContainerKind::Bundle => "bundle",
    }
}

pub(crate) fn run_list(json: bool) -> Result<(), CliError> {
    if json {
        let listings: Vec<TaskListing> = tasks::all().iter().map(TaskListing::from).collect();
        let out = serde_json::to_string_pretty(&listings)
            .map_err(|e| CliError::other(format!("Failed to serialize catalogs: {}", e)))?;
        println!("{}", out);
        return Ok(());
    }

    log::info!("Supported collections:");
    crate::log_blank();

    for task in tasks::all() {
        log::info!(
            "{} [{}]",
            task.name.if_supports_color(Stdout, |t| t.bold()),
            task.system.if_supports_color(Stdout, |t| t.cyan()),
        );
        log::info!("  {}", task.title);
        log::info!(
            "  Input: {}",
            task.input_desc.if_supports_color(Stdout, |t| t.dimmed())
        );

        for entry in task.catalog.entries {
            let status = format!("{:<10}", entry.status.label());
            let marks: String = entry.notes.iter().map(|id| format!(" [{}]", id)).collect();
            log::info!(
                "    {} {:<24} {}{}",
                color_status(entry.status, &status),
                entry.output_file_name(),
                entry.identity,
                marks.if_supports_color(Stdout, |t| t.dimmed()),
            );
        }

        for note in task.catalog.notes {
            log::info!(
                "    {}",
                format!("[{}] {}", note.id, note.text).if_supports_color(Stdout, |t| t.dimmed())
            );
        }
        crate::log_blank();
    }

    Ok(())
}

fn color_status(status: Status, padded: &str) -> String {
    match status {
        Status::Good => padded.if_supports_color(Stdout, |t| t.green()).to_string(),
        Status::Partial => padded.if_supports_color(Stdout, |t| t.yellow()).to_string(),
        Status::NoRom => padded.if_supports_color(Stdout, |t| t.dimmed()).to_string(),
        Status::Unresolved => padded.if_supports_color(Stdout, |t| t.red()).to_string(),
    }
}
