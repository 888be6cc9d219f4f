use std::path::{Path, PathBuf};

use indicatif::{ProgressBar, ProgressStyle};
use owo_colors::OwoColorize;
use owo_colors::Stream::Stdout;

use rom_harvest_lib::tasks::{self, TaskInfo};
use rom_harvest_lib::{BatchReport, ByteSize, EntryOutcome, ExtractProgress, SkipReason, settings};

use crate::CliError;

/// Run the extract command.
pub(crate) fn run_extract(
    task_name: &str,
    input: &Path,
    output: &Path,
    include_partials: Option<bool>,
    report_path: Option<PathBuf>,
    quiet: bool,
) -> Result<(), CliError> {
    let task = tasks::find(task_name).ok_or_else(|| {
        CliError::unknown_task(format!(
            "{} (available: {})",
            task_name,
            tasks::names().join(", ")
        ))
    })?;

    let options = settings::resolve_options(include_partials);

    log::info!(
        "Extracting {} from: {}",
        task.title.if_supports_color(Stdout, |t| t.bold()),
        input.display().if_supports_color(Stdout, |t| t.cyan()),
    );
    log::info!(
        "Output folder: {}",
        output.display().if_supports_color(Stdout, |t| t.cyan()),
    );
    if options.include_partials {
        log::info!(
            "{}",
            "Including partial and unresolved ROM sets".if_supports_color(Stdout, |t| t.dimmed()),
        );
    }
    crate::log_blank();

    std::fs::create_dir_all(output)?;

    let pb = if quiet {
        ProgressBar::hidden()
    } else {
        let pb = ProgressBar::new_spinner();
        pb.set_style(
            ProgressStyle::with_template("  {spinner:.cyan} {msg}")
                .expect("static pattern")
                .tick_chars("/-\\|"),
        );
        pb
    };

    let mut total = 0;
    let mut on_progress = |progress: ExtractProgress| match progress {
        ExtractProgress::Started { total: n } => {
            total = n;
        }
        ExtractProgress::Entry { index, identity } => {
            pb.set_message(format!("[{}/{}] {}", index + 1, total, identity));
            pb.tick();
        }
        ExtractProgress::Finished { .. } => {}
        ExtractProgress::Completed => {
            pb.finish_and_clear();
        }
    };

    let result = (task.run)(input, output, &options, &mut on_progress);
    pb.finish_and_clear();
    let report = result?;

    print_report(task, &report);

    if let Some(path) = report_path {
        report.write_to_file(&path, task.title)?;
        log::info!(
            "Report written to {}",
            path.display().if_supports_color(Stdout, |t| t.cyan()),
        );
    }

    let summary = report.summary();
    if summary.total_failed() > 0 {
        return Err(CliError::EntriesFailed {
            failed: summary.total_failed(),
            total: report.entries().len(),
        });
    }
    Ok(())
}

/// Print one line per entry followed by the overall summary.
fn print_report(task: &TaskInfo, report: &BatchReport) {
    for entry in report.entries() {
        match &entry.outcome {
            EntryOutcome::Extracted { path, members } => {
                let size: u64 = members.iter().map(|m| m.size).sum();
                log::info!(
                    "  {} {} {}",
                    "\u{2714}".if_supports_color(Stdout, |t| t.green()),
                    entry.identity,
                    format!(
                        "-> {} ({})",
                        path.file_name().unwrap_or_default().to_string_lossy(),
                        ByteSize(size)
                    )
                    .if_supports_color(Stdout, |t| t.dimmed()),
                );
                for m in members {
                    log::debug!(
                        "      {:<24} {:>12}  crc32 {:08x}",
                        m.name,
                        ByteSize(m.size),
                        m.crc32
                    );
                }
            }
            EntryOutcome::Skipped(reason) => {
                let why = match reason {
                    SkipReason::NoRom => "not in this collection",
                    SkipReason::IncompleteExcluded => "partial, use --include-partials",
                    SkipReason::NoRecipe => "no known location",
                };
                log::info!(
                    "  {} {} {}",
                    "-".if_supports_color(Stdout, |t| t.dimmed()),
                    entry.identity.if_supports_color(Stdout, |t| t.dimmed()),
                    format!("({})", why).if_supports_color(Stdout, |t| t.dimmed()),
                );
                let notes: Vec<&str> = task
                    .catalog
                    .entry(entry.identity)
                    .map(|e| e.notes.iter().filter_map(|&id| task.catalog.note(id)).collect())
                    .unwrap_or_default();
                for note in notes {
                    log::debug!("      {}", note);
                }
            }
            EntryOutcome::Failed(err) => {
                log::warn!(
                    "  {} {} {}",
                    "\u{2718}".if_supports_color(Stdout, |t| t.red()),
                    entry.identity,
                    format!("({}: {})", err.kind(), err).if_supports_color(Stdout, |t| t.red()),
                );
            }
        }
    }
    crate::log_blank();

    let summary = report.summary();
    log::info!("{}", "Summary:".if_supports_color(Stdout, |t| t.bold()));
    log::info!(
        "  {} {} extracted",
        "\u{2714}".if_supports_color(Stdout, |t| t.green()),
        summary.extracted,
    );
    for (reason, count) in &summary.skipped {
        log::info!(
            "  {} {} skipped ({})",
            "-".if_supports_color(Stdout, |t| t.dimmed()),
            count,
            reason,
        );
    }
    for (kind, count) in &summary.failed {
        log::warn!(
            "  {} {} failed ({})",
            "\u{2718}".if_supports_color(Stdout, |t| t.red()),
            count,
            kind,
        );
    }
}
