use owo_colors::OwoColorize;
use owo_colors::Stream::Stdout;

use pokedex_lib::settings::{self, ENV_API_URL, ENV_PAGE_SIZE};

use super::AppContext;
use crate::error::CliError;

/// Show the settings file status, environment overrides and the
/// effective settings after all layers are applied.
pub(crate) fn run_config_show(ctx: &AppContext) -> Result<(), CliError> {
    let path = settings::settings_path();

    log::info!(
        "{}",
        "Pokedex Configuration".if_supports_color(Stdout, |t| t.bold()),
    );
    log::info!("");

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
            "(not found, using defaults)".if_supports_color(Stdout, |t| t.dimmed()),
        );
    }
    log::info!(
        "  Favorites:     {}",
        ctx.favorites_path.display().if_supports_color(Stdout, |t| t.cyan()),
    );
    log::info!("");

    for var in [ENV_API_URL, ENV_PAGE_SIZE] {
        match std::env::var(var) {
            Ok(value) => log::info!(
                "  {} = {} {}",
                var,
                value,
                "(environment)".if_supports_color(Stdout, |t| t.yellow()),
            ),
            Err(_) => log::info!(
                "  {} {}",
                var,
                "(not set)".if_supports_color(Stdout, |t| t.dimmed()),
            ),
        }
    }
    log::info!("");

    log::info!(
        "{}",
        "Effective settings".if_supports_color(Stdout, |t| t.bold()),
    );
    for line in ctx.settings.to_toml()?.lines() {
        log::info!("  {}", line);
    }
    Ok(())
}

pub(crate) fn run_config_path() {
    log::info!("{}", settings::settings_path().display());
}

/// Write one `section.key` value to the settings file.
pub(crate) fn run_config_set(key: &str, value: &str) -> Result<(), CliError> {
    settings::save_value(key, value)?;
    log::info!(
        "{} {} = {} in {}",
        "Set".if_supports_color(Stdout, |t| t.green()),
        key.if_supports_color(Stdout, |t| t.bold()),
        value,
        settings::settings_path().display(),
    );
    Ok(())
}
