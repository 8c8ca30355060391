use anyhow::Result;
use clap::{Arg, Command};

use patch_directory::config::{resolve_target_dir, target_dir_from_env, AppConfig};
use patch_directory::run_pass;
use pragma_marker::{COPY_WITH_PATTERN, PRAGMA_MARKER, TARGET_DIR_ENV, TARGET_EXTENSION};

fn main() -> Result<()> {
    let matches = Command::new("patch_directory")
        .version("0.1.0")
        .about("Inserts the inline pragma ahead of every copyWith getter that lacks it")
        .arg(
            Arg::new("dir")
                .value_name("DIR")
                .help(format!(
                    "Directory to patch (defaults to ${} or the built-in path)",
                    TARGET_DIR_ENV
                )),
        )
        .arg(
            Arg::new("extension")
                .long("extension")
                .num_args(1)
                .default_value(TARGET_EXTENSION)
                .help("Only patch files ending with this extension"),
        )
        .arg(
            Arg::new("marker")
                .long("marker")
                .num_args(1)
                .default_value(PRAGMA_MARKER)
                .help("Annotation line to insert"),
        )
        .arg(
            Arg::new("pattern")
                .long("pattern")
                .num_args(1)
                .default_value(COPY_WITH_PATTERN)
                .help("Declaration pattern; group 1 must capture the indent"),
        )
        .arg(
            Arg::new("check")
                .long("check")
                .help("Report files that would change without writing them; exit 2 if any")
                .action(clap::ArgAction::SetTrue),
        )
        .arg(
            Arg::new("keep_going")
                .long("keep-going")
                .help("Skip files that cannot be read or written instead of aborting")
                .action(clap::ArgAction::SetTrue),
        )
        .arg(
            Arg::new("verbose")
                .long("verbose")
                .help("Enable verbose logging")
                .action(clap::ArgAction::SetTrue),
        )
        .get_matches();

    let config = AppConfig {
        target_dir: resolve_target_dir(
            matches.get_one::<String>("dir").map(String::as_str),
            target_dir_from_env(),
        ),
        extension: matches
            .get_one::<String>("extension")
            .cloned()
            .unwrap_or_else(|| TARGET_EXTENSION.to_string()),
        marker: matches
            .get_one::<String>("marker")
            .cloned()
            .unwrap_or_else(|| PRAGMA_MARKER.to_string()),
        pattern: matches
            .get_one::<String>("pattern")
            .cloned()
            .unwrap_or_else(|| COPY_WITH_PATTERN.to_string()),
        check: matches.get_flag("check"),
        keep_going: matches.get_flag("keep_going"),
        verbose: matches.get_flag("verbose"),
    };

    let mut logger = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"));
    if config.verbose {
        logger.filter_level(log::LevelFilter::Debug);
    }
    logger.init();
    log::debug!("{:?}", config);

    let report = run_pass(&config.to_pass_config()?)?;
    log::info!(
        "{} of {} file(s) {}",
        report.patched.len(),
        report.scanned,
        if config.check { "need patching" } else { "patched" }
    );

    if !report.failed.is_empty() {
        eprintln!("{} file(s) could not be processed:", report.failed.len());
        for (path, err) in &report.failed {
            eprintln!("  - {}: {}", path.display(), err);
        }
        std::process::exit(1);
    }
    // 1 is taken by fatal errors and skipped files.
    if config.check && !report.patched.is_empty() {
        std::process::exit(2);
    }

    Ok(())
}
