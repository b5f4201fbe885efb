use clap::Parser;
use modplan::utils::logger;
use modplan::{
    CliConfig, Command, PlannerError, PlannerSession, RemoteCatalogue, Settings, Storage, Student,
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = CliConfig::parse();

    logger::init_cli_logger(cli.verbose);
    tracing::info!("Starting modplan");
    if cli.verbose {
        tracing::debug!("CLI config: {:?}", cli);
    }

    let settings = match Settings::resolve(&cli) {
        Ok(settings) => settings,
        Err(e) => {
            tracing::error!("❌ Configuration validation failed: {}", e);
            eprintln!("❌ {}", e);
            std::process::exit(1);
        }
    };

    let storage = Storage::new(settings.data_dir.clone());
    let catalogue = RemoteCatalogue::new(settings.catalogue_url.clone());

    let mut session = match PlannerSession::open(storage, catalogue).await {
        Ok(session) => session,
        Err(e) => {
            tracing::error!("❌ Could not load planner state: {}", e);
            eprintln!("❌ {}", e);
            std::process::exit(1);
        }
    };

    if let Err(e) = run_command(&mut session, &cli.command).await {
        tracing::error!("❌ Command failed: {}", e);
        eprintln!("❌ {}", e);
        if matches!(e, PlannerError::MissingProfile) {
            eprintln!("💡 Set one up with: modplan profile <name> <major> <year>");
        }
        std::process::exit(1);
    }

    if let Err(e) = session.save() {
        tracing::error!("❌ Could not save planner state: {}", e);
        eprintln!("❌ {}", e);
        std::process::exit(1);
    }

    Ok(())
}

async fn run_command(
    session: &mut PlannerSession<RemoteCatalogue>,
    command: &Command,
) -> modplan::Result<()> {
    match command {
        Command::Profile { name, major, year } => {
            session.set_profile(name, major, year)?;
            println!("✅ Profile saved for {}", name);
        }
        Command::Add { code, semester } => {
            session.add_module(code, *semester).await?;
            println!("✅ Added {} to semester {}", code.to_uppercase(), semester);
        }
        Command::Remove { code } => {
            session.remove_module(code).await?;
            println!("✅ Removed {}", code.to_uppercase());
        }
        Command::Complete { code } => {
            session.complete_module(code)?;
            println!("✅ Marked {} as completed", code.to_uppercase());
        }
        Command::Show => {
            let student = current_student(session)?;
            println!(
                "Schedule for {} ({}, {})",
                student.name(),
                student.major(),
                student.year()
            );
            for semester in 1..=8u8 {
                let modules = student.schedule().modules_in_semester(semester);
                if modules.is_empty() {
                    continue;
                }
                println!("Semester {}:", semester);
                for module in modules {
                    let marker = if module.is_completed() { "x" } else { " " };
                    println!("  [{}] {} {}", marker, module.code(), module.name());
                }
            }
        }
        Command::Required => {
            let student = current_student(session)?;
            println!("Required modules left for {}:", student.major());
            for code in student.incomplete_required() {
                println!("  {}", code);
            }
        }
        Command::Event { line } => {
            session.apply_event(line)?;
            println!("✅ Timetable updated");
        }
        Command::Timetable => {
            let student = current_student(session)?;
            println!("Timetable for semester {}:", student.current_semester());
            for weekly in student.timetable().modules_weekly() {
                for event in weekly.events() {
                    println!("  {}", event.to_save_line(weekly.code()));
                }
            }
        }
    }
    Ok(())
}

fn current_student(session: &PlannerSession<RemoteCatalogue>) -> modplan::Result<&Student> {
    session.student().ok_or(PlannerError::MissingProfile)
}
