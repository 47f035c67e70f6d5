//! Enroll Portal - Student enrollment with AI-assisted bios
//!
//! Main entry point for the `enroll` binary. Drives an interactive
//! enrollment session on stdin/stdout: field entry, validation, optional
//! picture attachment and bio generation, submission, roster display.

mod cli;

use std::fs;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use clap::Parser;
use tracing::info;

use enroll_portal::config::PortalConfig;
use enroll_portal::error::{Error, Result};
use enroll_portal::form::EnrollmentForm;
use enroll_portal::generator::{BioGenerator, GeminiGenerator};
use enroll_portal::registry::EnrollmentRegistry;
use enroll_portal::types::Field;
use enroll_portal::view::{RosterView, MAJORS};
use enroll_portal::{logging, version};

use crate::cli::{Cli, Commands, ConfigSubcommand};

fn main() {
    let cli = Cli::parse();
    if let Err(e) = run(cli) {
        eprint!("{}", e.format_for_terminal());
        std::process::exit(e.exit_code());
    }
}

fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Version => {
            version::print_version();
            Ok(())
        }
        Commands::Config { ref subcommand } => {
            logging::init_simple(tracing::Level::WARN)?;
            handle_config_command(subcommand.clone())
        }
        Commands::Run { ref config } => {
            let config = PortalConfig::load(config.as_deref())?;

            // Guards must be kept alive for the lifetime of the program
            let _log_guards = logging::init_logging(&config.logging, cli.verbose, cli.quiet)?;

            let build = version::build_info();
            info!(
                version = %build.full_version(),
                model = %config.generator.model,
                "Starting enrollment portal"
            );

            let rt = tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()
                .map_err(|e| Error::Internal(format!("Failed to create runtime: {}", e)))?;

            run_portal(&rt, config)
        }
    }
}

// ─────────────────────────────────────────────────────────────────
// Config Commands
// ─────────────────────────────────────────────────────────────────

fn handle_config_command(subcommand: ConfigSubcommand) -> Result<()> {
    match subcommand {
        ConfigSubcommand::Init { path, force } => {
            let target = path
                .map(PathBuf::from)
                .unwrap_or_else(PortalConfig::default_path);
            let written = PortalConfig::init(&target, force)?;
            println!("Configuration written to {}", written.display());
            Ok(())
        }
        ConfigSubcommand::Show { config } => {
            let config = PortalConfig::load(config.as_deref())?;
            print!("{}", config.to_toml()?);
            Ok(())
        }
        ConfigSubcommand::Validate { config } => {
            let config = PortalConfig::load(config.as_deref())?;
            config.validate()?;
            println!("Configuration is valid");
            Ok(())
        }
    }
}

// ─────────────────────────────────────────────────────────────────
// Interactive Session
// ─────────────────────────────────────────────────────────────────

fn run_portal(rt: &tokio::runtime::Runtime, config: PortalConfig) -> Result<()> {
    let registry = EnrollmentRegistry::new();
    let generator = GeminiGenerator::new(config.generator.clone());
    let view = RosterView::new();
    let mut form = EnrollmentForm::new(config.picture.clone());

    println!("Student Enrollment Portal");
    println!("=========================");

    loop {
        match run_session(rt, &mut form, &registry, &generator)? {
            SessionOutcome::Enrolled => {
                println!();
                println!("{}", view.render(&registry.list()));
            }
            SessionOutcome::InputClosed => break,
        }

        match prompt("Enroll another student? [y/N]: ")? {
            Some(answer) if answer.eq_ignore_ascii_case("y") => continue,
            _ => break,
        }
    }

    println!();
    println!("{}", view.render(&registry.list()));
    Ok(())
}

enum SessionOutcome {
    Enrolled,
    InputClosed,
}

fn run_session(
    rt: &tokio::runtime::Runtime,
    form: &mut EnrollmentForm,
    registry: &EnrollmentRegistry,
    generator: &dyn BioGenerator,
) -> Result<SessionOutcome> {
    let text_fields = [
        Field::FirstName,
        Field::LastName,
        Field::Email,
        Field::DateOfBirth,
    ];

    println!();
    for field in text_fields {
        let Some(value) = prompt(&format!("{}: ", field.label()))? else {
            return Ok(SessionOutcome::InputClosed);
        };
        form.update_field(field, value);
    }

    println!("Majors: {}", MAJORS.join(", "));
    let Some(major) = prompt("Major: ")? else {
        return Ok(SessionOutcome::InputClosed);
    };
    form.update_field(Field::Major, major);

    // Optional profile picture
    if let Some(path) = prompt("Profile picture path (blank to skip): ")? {
        if !path.is_empty() {
            match fs::read(&path) {
                Ok(bytes) => {
                    rt.block_on(form.attach_picture(bytes));
                    match form.notice().map(|n| n.message()) {
                        Some(message) => {
                            println!("  {}", message);
                            form.clear_notice();
                        }
                        None => println!("  Picture attached."),
                    }
                }
                Err(e) => println!("  Could not read '{}': {}", path, e),
            }
        }
    } else {
        return Ok(SessionOutcome::InputClosed);
    }

    // Optional bio: generated or hand-written
    match prompt("Generate bio with Gemini? [y/N]: ")? {
        Some(answer) if answer.eq_ignore_ascii_case("y") => {
            println!("  Generating...");
            if rt.block_on(form.generate_bio(generator)) {
                println!("  Bio: {}", form.draft().bio);
            } else if let Some(message) = form.notice().map(|n| n.message()) {
                println!("  {}", message);
                form.clear_notice();
            }
        }
        Some(_) => {
            if let Some(bio) = prompt("Bio (blank to skip): ")? {
                if !bio.is_empty() {
                    form.update_field(Field::Bio, bio);
                }
            } else {
                return Ok(SessionOutcome::InputClosed);
            }
        }
        None => return Ok(SessionOutcome::InputClosed),
    }

    // Submit, re-prompting failing fields until the draft passes
    loop {
        if form.submit(registry).is_some() {
            println!("Student enrolled.");
            return Ok(SessionOutcome::Enrolled);
        }

        println!("Please fix the following:");
        let failing: Vec<Field> = form.field_errors().keys().copied().collect();
        for field in &failing {
            println!("  {}: {}", field.label(), &form.field_errors()[field]);
        }
        for field in failing {
            let Some(value) = prompt(&format!("{}: ", field.label()))? else {
                return Ok(SessionOutcome::InputClosed);
            };
            form.update_field(field, value);
        }
    }
}

/// Prompt for one line of input. Returns None when stdin is closed.
fn prompt(label: &str) -> Result<Option<String>> {
    print!("{}", label);
    io::stdout().flush()?;

    let mut line = String::new();
    let bytes = io::stdin().lock().read_line(&mut line)?;
    if bytes == 0 {
        return Ok(None);
    }
    Ok(Some(line.trim_end_matches(['\r', '\n']).to_string()))
}
