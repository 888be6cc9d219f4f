use owo_colors::OwoColorize;
use owo_colors::Stream::Stdout;

use rom_harvest_lib::settings;

use crate::CliError;

/// Show current settings and where each value comes from.
pub(crate) fn run_config_show() -> Result<(), CliError> {
    let path = settings::settings_path();

    log::info!(
        "{}",
        "rom-harvest Settings".if_supports_color(Stdout, |t| t.bold()),
    );
    crate::log_blank();

    if path.exists() {
        log::info!(
            "  Settings file: {} {}",
            path.display().if_supports_color(Stdout, |t| t.cyan()),
            "(exists)".if_supports_color(Stdout, |t| t.green()),
        );
    } else {
        log::info!(
            "  Settings file: {} {}",
            path.display().if_supports_color(Stdout, |t| t.cyan()),
            "(not found)".if_supports_color(Stdout, |t| t.dimmed()),
        );
    }
    crate::log_blank();

    let (value, source) = match settings::load_include_partials(&path) {
        Some(v) => (v, "settings file"),
        None => (false, "default"),
    };
    log::info!(
        "  {} {} {}",
        "include_partials:".if_supports_color(Stdout, |t| t.cyan()),
        value,
        format!("({})", source).if_supports_color(Stdout, |t| t.dimmed()),
    );

    if let Some(contents) = settings::load_settings_string(&path) {
        log::debug!("Settings file contents:\n{}", contents);
    }

    Ok(())
}

/// Print the settings file path.
pub(crate) fn run_config_path() -> Result<(), CliError> {
    log::info!("{}", settings::settings_path().display());
    Ok(())
}

/// Save or clear the default for extracting partial ROM sets.
pub(crate) fn run_config_set_partials(value: Option<bool>) -> Result<(), CliError> {
    let path = settings::settings_path();
    settings::save_include_partials(&path, value).map_err(|e| {
        CliError::config(format!("Failed to update {}: {}", path.display(), e))
    })?;

    match value {
        Some(v) => log::info!(
            "  {} include_partials = {} saved to {}",
            "\u{2714}".if_supports_color(Stdout, |t| t.green()),
            v,
            path.display().if_supports_color(Stdout, |t| t.cyan()),
        ),
        None => log::info!(
            "  {} include_partials cleared from {}",
            "\u{2714}".if_supports_color(Stdout, |t| t.green()),
            path.display().if_supports_color(Stdout, |t| t.cyan()),
        ),
    }
    Ok(())
}
