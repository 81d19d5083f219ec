use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use clap::Parser as ClapParser;
use log::{info, warn};
use nestrun::config::NestRunConfig;
use nestrun::io;
use nestrun::io::cli::Cli;
use nestrun::io::export::export_solution;
use nestrun::io::ext_repr::ExtInstance;
use nestrun::io::import::import_instance;
use nestrun::io::layout_svg::sheet_to_svg;
use thousands::Separable;
use turnest::nest::{NestProgress, Nester, ProgressSink};

fn main() -> Result<()> {
    let args = Cli::parse();
    io::init_logger(args.log_level)?;

    let config = match args.config_file {
        None => {
            warn!("[MAIN] no config file provided, use --config-file to provide a custom config");
            NestRunConfig::default()
        }
        Some(config_file) => {
            io::read_json(&config_file).context("incorrect config file format")?
        }
    };
    info!("[MAIN] using config: {config:?}");

    let ext_instance: ExtInstance = io::read_json(args.input_file.as_path())?;
    let input_stem = args
        .input_file
        .file_stem()
        .and_then(|s| s.to_str())
        .context("input file has no usable name")?;

    if !args.solution_folder.exists() {
        fs::create_dir_all(&args.solution_folder).with_context(|| {
            format!(
                "could not create solution folder: {}",
                args.solution_folder.display()
            )
        })?;
    }

    let (parts, tools, schedule) = import_instance(&ext_instance)?;
    let settings = ext_instance.settings.clone();
    let nester = Nester::new(parts, tools, settings.clone())?;

    let mut progress = LogProgress {
        every: config.progress_log_every.max(1),
        seen: 0,
    };
    let result = nester.run(&schedule, &mut progress)?;

    info!(
        "[MAIN] {} of {} items placed on {} sheets",
        result.placed_count.separate_with_commas(),
        result.total_count.separate_with_commas(),
        result.sheet_count(),
    );

    let solution = export_solution(&ext_instance.name, &result);
    let solution_path = args.solution_folder.join(format!("sol_{input_stem}.json"));
    io::write_json(&solution, Path::new(&solution_path))?;

    for (i, sheet) in result.sheets.iter().enumerate() {
        let svg_path = args
            .solution_folder
            .join(format!("sol_{input_stem}_{i}.svg"));
        let svg = sheet_to_svg(sheet, &settings.clamps, config.svg_draw_options);
        io::write_svg(&svg, Path::new(&svg_path))?;
    }

    Ok(())
}

/// Logs every n-th progress update.
struct LogProgress {
    every: usize,
    seen: usize,
}

impl ProgressSink for LogProgress {
    fn progress(&mut self, update: NestProgress<'_>) {
        self.seen += 1;
        if self.seen % self.every == 0 || update.fraction >= 1.0 {
            info!(
                "[MAIN] {:?}: {}/{} items placed ({:.0}%), {} sheets",
                update.state,
                update.placed,
                update.total,
                update.fraction * 100.0,
                update.sheets.len()
            );
        }
    }
}
