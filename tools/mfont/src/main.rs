// MFont
// copyright zipxing@hotmail.com 2022～2025

//! mfont: TTF to bitmap font builder.
//!
//! Writes a glyph table, one font descriptor per size and a texture atlas.
//! See `mfont --help` for the subcommands.

use clap::ArgMatches;
use log::{info, LevelFilter};
use mfont::config::{parse_size_path, Job, SizeSpec};
use mfont::error::{FontError, Result};
use mfont::format::OutputPaths;
use mfont::log::init_log;
use mfont::pack::PackOptions;
use std::path::PathBuf;

mod command;
use command::*;
mod inspect;
use inspect::*;

fn log_level(args: &ArgMatches) -> LevelFilter {
    if args.get_flag("verbose") {
        LevelFilter::Debug
    } else if args.get_flag("quiet") {
        LevelFilter::Warn
    } else {
        LevelFilter::Info
    }
}

fn required<'a, T: Clone + Send + Sync + 'static>(args: &'a ArgMatches, id: &str) -> Result<&'a T> {
    args.get_one::<T>(id)
        .ok_or_else(|| FontError::Config(format!("missing argument {}", id)))
}

fn find_size<'a>(sizes: &'a mut [SizeSpec], size: u32, what: &str) -> Result<&'a mut SizeSpec> {
    sizes.iter_mut().find(|s| s.size == size).ok_or_else(|| {
        FontError::Config(format!("{} given for size {} which is not registered", what, size))
    })
}

/// Job described by the `create` arguments
fn create_job(args: &ArgMatches) -> Result<Job> {
    let mut sizes: Vec<SizeSpec> = args
        .get_many::<SizeSpec>("sizes")
        .map(|v| v.cloned().collect())
        .unwrap_or_default();

    for spec in args.get_many::<String>("font").into_iter().flatten() {
        let (size, path) = parse_size_path(spec)?;
        find_size(&mut sizes, size, "--font")?.font = Some(path);
    }
    for size in args.get_many::<u32>("icons").into_iter().flatten() {
        find_size(&mut sizes, *size, "--icons")?.icons = true;
    }

    let mut output = OutputPaths::new(
        required::<PathBuf>(args, "glyph_table")?.clone(),
        required::<String>(args, "font_descriptor")?,
        required::<PathBuf>(args, "texture")?.clone(),
    );
    output.glyph_table_in_game = args.get_one::<String>("glyph_table_in_game").cloned();
    output.texture_in_game = args.get_one::<String>("texture_in_game").cloned();

    let options = PackOptions {
        algorithm: required::<String>(args, "algorithm")?.parse()?,
        order: required::<String>(args, "order")?.parse()?,
        icon_policy: required::<String>(args, "icon_policy")?.parse()?,
    };

    Ok(Job {
        font: required::<PathBuf>(args, "ttf")?.clone(),
        charset: required::<PathBuf>(args, "charset")?.clone(),
        icon_dir: args.get_one::<PathBuf>("icon_dir").cloned(),
        width: *required::<u32>(args, "width")?,
        height: *required::<u32>(args, "height")?,
        sizes,
        output,
        options,
    })
}

fn run_job(job: &Job) -> Result<()> {
    let fc = job.run()?;
    info!(
        "done: {} characters, {} sizes, {} icons",
        fc.chars().len(),
        fc.sizes().count(),
        fc.icon_count()
    );
    Ok(())
}

fn run(args: &ArgMatches) -> Result<()> {
    match args.subcommand() {
        Some(("create", sub_m)) => run_job(&create_job(sub_m)?),
        Some(("build", sub_m)) => {
            run_job(&Job::from_toml_file(required::<PathBuf>(sub_m, "job")?)?)
        }
        Some(("inspect", sub_m)) => mfont_inspect(required::<PathBuf>(sub_m, "file")?),
        _ => Ok(()),
    }
}

fn main() {
    let args = make_parser();
    let log_file = args.get_one::<PathBuf>("log_file").map(|p| p.as_path());
    if let Err(e) = init_log(log_level(&args), log_file) {
        eprintln!("❌ Error: {}", e);
        std::process::exit(1);
    }
    if let Err(e) = run(&args) {
        eprintln!("❌ Error: {}", e);
        std::process::exit(1);
    }
}
