//! Command implementations

use std::collections::BTreeMap;
use std::path::Path;
use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};
use tracing::info;

use fleetgrid_app::config::Config;
use fleetgrid_app::repository::{open_board_preferences, open_gateway};
use fleetgrid_domain::model::{normalize_hex, GridModel};
use fleetgrid_domain::repository::ScheduleGateway;
use fleetgrid_types::{
    DirectoryEntry, Error, FilterState, Layer, MarkRequest, MetaResponse, OutputFormat, Result,
};

use crate::cli::{Cli, Commands, DirectoryAction, PaletteAction};
use crate::output;

pub fn execute(cli: Cli) -> Result<()> {
    // Load config
    let mut config = Config::load_effective()?;

    // Override from CLI args
    if let Some(ref server) = cli.server {
        config.server_url = server.trim().to_string();
    }

    if let Commands::Config {
        show,
        set_server,
        set_timeout,
        set_data_dir,
        set_filter_threshold,
        reset,
    } = &cli.command
    {
        return cmd_config(
            *show,
            set_server.clone(),
            *set_timeout,
            set_data_dir.clone(),
            *set_filter_threshold,
            *reset,
        );
    }

    let gateway = open_gateway(&config)?;
    let gateway = gateway.as_ref();
    let format = cli.format;

    match &cli.command {
        Commands::Meta => cmd_meta(gateway, format),
        Commands::Schedule { day, filters } => {
            cmd_schedule(&config, gateway, day.as_deref(), filters, format)
        }
        Commands::Mark {
            day,
            plate,
            kind,
            slot,
            value,
        } => cmd_mark(gateway, day, plate, *kind, slot, *value),
        Commands::Upload { file } => cmd_upload(gateway, file, format),
        Commands::Export {
            day,
            filters,
            output,
        } => cmd_export(gateway, day, filters, output),
        Commands::Palette { action } => cmd_palette(gateway, action.as_ref(), format),
        Commands::Directory { action } => cmd_directory(gateway, action.as_ref(), format),
        Commands::Config { .. } => Ok(()),
    }
}

/// Run a request behind a spinner
fn with_spinner<T>(message: &str, job: impl FnOnce() -> Result<T>) -> Result<T> {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    pb.set_message(message.to_string());
    pb.enable_steady_tick(Duration::from_millis(100));
    let result = job();
    pb.finish_and_clear();
    result
}

/// Group `COLUMN=VALUE` arguments by column
pub(crate) fn parse_filter_args(args: &[String]) -> Result<BTreeMap<String, Vec<String>>> {
    let mut grouped: BTreeMap<String, Vec<String>> = BTreeMap::new();
    for arg in args {
        let (column, value) = arg
            .split_once('=')
            .map(|(c, v)| (c.trim(), v.trim()))
            .filter(|(c, _)| !c.is_empty())
            .ok_or_else(|| Error::Rejected(format!("filter must be COLUMN=VALUE: {}", arg)))?;
        let values = grouped.entry(column.to_string()).or_default();
        if !values.iter().any(|v| v == value) {
            values.push(value.to_string());
        }
    }
    Ok(grouped)
}

/// FilterState over the dataset's columns with the requested restrictions
pub(crate) fn build_filters(meta: &MetaResponse, args: &[String]) -> Result<FilterState> {
    let mut filters = FilterState::for_columns(meta.columns.iter().cloned());
    for (column, values) in parse_filter_args(args)? {
        if !filters.set(&column, values) {
            return Err(Error::Rejected(format!("unknown filter column: {}", column)));
        }
    }
    Ok(filters)
}

fn load_meta(gateway: &dyn ScheduleGateway) -> Result<MetaResponse> {
    let meta = with_spinner("Загружаю...", || gateway.meta())?;
    if !meta.has_data {
        return Err(Error::NoData);
    }
    Ok(meta)
}

fn cmd_meta(gateway: &dyn ScheduleGateway, format: OutputFormat) -> Result<()> {
    let meta = with_spinner("Загружаю...", || gateway.meta())?;
    output::print_meta(format, &meta)
}

fn cmd_schedule(
    config: &Config,
    gateway: &dyn ScheduleGateway,
    day: Option<&str>,
    filter_args: &[String],
    format: OutputFormat,
) -> Result<()> {
    let meta = load_meta(gateway)?;
    let filters = build_filters(&meta, filter_args)?;
    let day = match day {
        Some(d) => d.to_string(),
        None => meta.dates.first().cloned().ok_or(Error::NoData)?,
    };

    let payload = with_spinner("Считаю...", || gateway.schedule(&day, &filters))?;
    if format == OutputFormat::Json {
        return output::print_json(&payload);
    }

    // Same layout model as the board, including saved column widths
    let prefs = open_board_preferences(config);
    let grid = GridModel::build(&payload, prefs.as_ref());
    output::print_grid(&payload, &grid);
    Ok(())
}

fn cmd_mark(
    gateway: &dyn ScheduleGateway,
    day: &str,
    plate: &str,
    kind: Layer,
    slot: &str,
    value: u8,
) -> Result<()> {
    if !kind.is_mutable() {
        return Err(Error::Rejected("plan cells are read-only".to_string()));
    }
    let request = MarkRequest::new(day, plate, kind, slot, value != 0);
    with_spinner("Сохраняю...", || gateway.mark(&request))?;
    info!(%day, %plate, %kind, %slot, value, "cell marked");
    println!("{} {} {} {} = {}", day, plate, kind, slot, value);
    Ok(())
}

fn cmd_upload(gateway: &dyn ScheduleGateway, file: &Path, format: OutputFormat) -> Result<()> {
    if !file.exists() {
        return Err(Error::FileNotFound(file.display().to_string()));
    }
    let meta = with_spinner("Загружаю...", || gateway.upload(file))?;
    println!("Загружено.");
    output::print_meta(format, &meta)
}

fn cmd_export(
    gateway: &dyn ScheduleGateway,
    day: &str,
    filter_args: &[String],
    output_path: &Path,
) -> Result<()> {
    let meta = load_meta(gateway)?;
    let filters = build_filters(&meta, filter_args)?;
    let bytes = with_spinner("Выгружаю...", || gateway.export(day, &filters))?;
    std::fs::write(output_path, &bytes)?;
    println!("Saved {} bytes to {}", bytes.len(), output_path.display());
    Ok(())
}

fn cmd_palette(
    gateway: &dyn ScheduleGateway,
    action: Option<&PaletteAction>,
    format: OutputFormat,
) -> Result<()> {
    let palette = match action {
        None | Some(PaletteAction::Get) => with_spinner("Загружаю...", || gateway.palette())?,
        Some(PaletteAction::Reset) => {
            with_spinner("Сбрасываю...", || gateway.reset_palette())?
        }
        Some(PaletteAction::Set {
            accent,
            schedule_fill,
            plan_fill,
            fact_fill,
            border,
        }) => {
            let mut palette = with_spinner("Загружаю...", || gateway.palette())?;
            let updates = [
                (accent, &mut palette.accent),
                (schedule_fill, &mut palette.schedule_fill),
                (plan_fill, &mut palette.plan_fill),
                (fact_fill, &mut palette.fact_fill),
                (border, &mut palette.border),
            ];
            for (input, field) in updates {
                if let Some(raw) = input {
                    *field = normalize_hex(raw)
                        .ok_or_else(|| Error::Rejected(format!("invalid color: {}", raw)))?;
                }
            }
            with_spinner("Сохраняю...", || gateway.save_palette(&palette))?
        }
    };
    output::print_palette(format, &palette)
}

fn cmd_directory(
    gateway: &dyn ScheduleGateway,
    action: Option<&DirectoryAction>,
    format: OutputFormat,
) -> Result<()> {
    match action {
        Some(DirectoryAction::Upsert {
            plate,
            schedule,
            start,
            end,
        }) => {
            let entry = DirectoryEntry {
                vehicle_plate: plate.clone(),
                schedule_text: schedule.clone(),
                regime_start: start.clone(),
                regime_end: end.clone(),
            }
            .trimmed();
            with_spinner("Сохраняю...", || gateway.upsert_directory(&entry))
                .map_err(|e| Error::Rejected(e.server_text()))?;
            println!("Сохранено: {}", entry.vehicle_plate);
        }
        Some(DirectoryAction::Delete { plate }) => {
            with_spinner("Удаляю...", || gateway.delete_directory(plate))?;
            println!("Удалено: {}", plate.trim());
        }
        None | Some(DirectoryAction::List) => {}
    }

    let items = with_spinner("Загружаю...", || gateway.directory())?;
    output::print_directory(format, &items)
}

fn cmd_config(
    show: bool,
    set_server: Option<String>,
    set_timeout: Option<u64>,
    set_data_dir: Option<std::path::PathBuf>,
    set_filter_threshold: Option<usize>,
    reset: bool,
) -> Result<()> {
    if reset {
        let config = Config::default();
        config.save()?;
        println!("Configuration reset to defaults");
        println!("\n{}", config);
        return Ok(());
    }

    let mut config = Config::load()?;
    let mut modified = false;

    if let Some(server) = set_server {
        config.server_url = server.trim().to_string();
        modified = true;
    }

    if let Some(secs) = set_timeout {
        config.request_timeout_secs = (secs > 0).then_some(secs);
        modified = true;
    }

    if let Some(dir) = set_data_dir {
        config.data_dir = Some(dir);
        modified = true;
    }

    if let Some(threshold) = set_filter_threshold {
        config.overbroad_filter_threshold = threshold;
        modified = true;
    }

    if modified {
        config.save()?;
        println!("Configuration updated");
    }

    if show || !modified {
        // Show what the board would actually use
        let mut effective = config.clone();
        effective.apply_env(std::env::var(fleetgrid_app::config::SERVER_ENV).ok());
        println!("{}", effective);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    fn meta() -> MetaResponse {
        MetaResponse {
            has_data: true,
            dates: vec!["2024-01-10".to_string()],
            columns: args(&["Статус", "ТС"]),
            values: Default::default(),
        }
    }

    #[test]
    fn test_parse_filter_args_groups_by_column() {
        let grouped =
            parse_filter_args(&args(&["Статус=В работе", "Статус = Новая", "ТС=КАМАЗ=5"])).unwrap();
        assert_eq!(grouped["Статус"], args(&["В работе", "Новая"]));
        assert_eq!(grouped["ТС"], args(&["КАМАЗ=5"]));
    }

    #[test]
    fn test_parse_filter_args_rejects_malformed() {
        assert!(parse_filter_args(&args(&["Статус"])).is_err());
        assert!(parse_filter_args(&args(&["=x"])).is_err());
    }

    #[test]
    fn test_build_filters_covers_every_column() {
        let filters = build_filters(&meta(), &args(&["Статус=В работе"])).unwrap();
        assert_eq!(
            filters.to_query_value().unwrap(),
            r#"{"Статус":["В работе"],"ТС":[]}"#
        );
        assert!(build_filters(&meta(), &args(&["Водитель=Иванов"])).is_err());
    }
}
