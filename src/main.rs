use anyhow::{Context, Result};
use clap::Parser;
use cleaning_schedule::config::Config;
use cleaning_schedule::error::{Error, EXIT_FAILURE};
use cleaning_schedule::notifications::{
    verify_addresses, ConsoleNotifier, ConsoleStream, EmailMessage, NotificationContext, Notifier,
    SendmailNotifier, TemplateRenderer,
};
use cleaning_schedule::scheduler::{fetch_cleaning_tasks, RunRequest, ScheduleOrchestrator};
use cleaning_schedule::site::SiteClient;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(
    name = "cleaning-schedule",
    version,
    about = "Make the cleaning schedule - for clean coffee",
    long_about = "Takes a list of students from a file or the course website and randomly \
                  picks students for the cleaning tasks listed on the website."
)]
struct Cli {
    /// A file with student names to pick from; rebuilt from the website when
    /// missing or too short
    students_file: PathBuf,

    /// The current academic year (e.g. 2018-2019)
    #[arg(short, long)]
    year: Option<String>,

    /// Amount of students to pick (default 2)
    #[arg(short = 's', long = "students")]
    students: Option<usize>,

    /// Website username
    #[arg(short, long, env = "SITE_USER")]
    user: Option<String>,

    /// Website password
    #[arg(short, long, env = "SITE_PASS", hide_env_values = true)]
    password: Option<String>,

    /// Do not remove students from the student list after picking
    #[arg(long)]
    keep_picked_students: bool,

    /// Students to exclude (separated by spaces)
    #[arg(short = 'x', long, num_args = 0.., conflicts_with = "excluded_students_file")]
    excluded_students: Option<Vec<String>>,

    /// A file of students to exclude (one per line)
    #[arg(short = 'f', long)]
    excluded_students_file: Option<PathBuf>,

    /// The email address to send the cleaning schedule to
    #[arg(short, long, required_unless_present = "no_email", conflicts_with = "no_email")]
    email: Option<String>,

    /// Do not email, print the rendered message instead
    #[arg(long)]
    no_email: bool,

    /// CC addresses for the email (separated by spaces)
    #[arg(short, long, num_args = 1..)]
    cc: Vec<String>,

    /// Enable debug logging
    #[arg(short, long)]
    debug: bool,

    /// TOML configuration file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Log format (text, json)
    #[arg(long)]
    log_format: Option<String>,

    /// Print the run outcome as JSON on stdout; with --no-email the rendered
    /// message goes to stderr instead
    #[arg(long)]
    json: bool,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match load_config(&cli) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("error: {e:#}");
            return ExitCode::from(EXIT_FAILURE);
        }
    };

    let format = cli
        .log_format
        .clone()
        .unwrap_or_else(|| config.logging.format.clone());
    setup_tracing(&format, &config.logging.level, cli.debug);

    match run(cli, config).await {
        Ok(()) => {
            tracing::info!("Cleaning schedule completed successfully");
            ExitCode::SUCCESS
        }
        Err(e) => match e.downcast_ref::<Error>() {
            Some(err) => {
                tracing::error!(category = %err.category(), "{err}");
                err.exit_code()
            }
            None => {
                tracing::error!("{e:#}");
                ExitCode::from(EXIT_FAILURE)
            }
        },
    }
}

/// Layer command-line flags over file and environment configuration
fn load_config(cli: &Cli) -> Result<Config> {
    let mut config = Config::load(cli.config.as_deref())?;

    if let Some(year) = &cli.year {
        config.site.year = year.clone();
    }
    if let Some(user) = &cli.user {
        config.site.user = Some(user.clone());
    }
    if let Some(password) = &cli.password {
        config.site.password = Some(password.clone());
    }
    if let Some(students) = cli.students {
        config.schedule.pick_count = students;
    }
    if cli.keep_picked_students {
        config.schedule.keep_picked = true;
    }

    config.validate().context("Invalid configuration")?;

    if !cli.no_email {
        let primary: Vec<&str> = cli.email.iter().map(String::as_str).collect();
        if !verify_addresses(&primary) || !verify_addresses(&cli.cc) {
            anyhow::bail!("Email addresses not valid!");
        }
    }

    Ok(config)
}

fn setup_tracing(format: &str, level: &str, debug: bool) {
    let env_filter = if debug {
        tracing_subscriber::EnvFilter::new("cleaning_schedule=debug,info")
    } else {
        tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            tracing_subscriber::EnvFilter::new(format!("cleaning_schedule={level},warn"))
        })
    };

    match format {
        "json" => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
                .init();
        }
        _ => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
                .init();
        }
    }
}

async fn run(cli: Cli, config: Config) -> Result<()> {
    tracing::debug!("Argument validation successful");

    if cli.no_email && !cli.cc.is_empty() {
        tracing::warn!("CC email list given with no-email option enabled, ignoring CC list");
    }

    tracing::info!(url = %config.site.start_url(), "Connecting to the course website");
    let client = SiteClient::new(&config.site)?;

    let mut request = RunRequest::new(&cli.students_file, config.schedule.pick_count)
        .keep_picked(config.schedule.keep_picked);
    if let Some(names) = cli.excluded_students {
        request = request.exclude_names(names);
    }
    if let Some(path) = cli.excluded_students_file {
        request = request.exclude_file(path);
    }

    let orchestrator = ScheduleOrchestrator::new(&client, config.retry.clone());
    let mut rng = ChaCha8Rng::from_entropy();
    let outcome = orchestrator.run(&request, &mut rng).await?;

    tracing::info!(
        picked = ?outcome.picked,
        remaining = outcome.remaining.len(),
        origin = %outcome.origin,
        written = outcome.written,
        "Picked students"
    );

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&outcome)?);
    }

    let cleaning_url = config.site.cleaning_tasks_url();
    let tasks =
        fetch_cleaning_tasks(&client, &config.retry, &cleaning_url, &config.site.task_selector)
            .await;

    tracing::info!("Rendering email template");
    let context = NotificationContext::from_outcome(
        &outcome,
        chrono::Local::now().date_naive(),
        cleaning_url,
        tasks,
    );
    let renderer = TemplateRenderer::from_optional(config.mail.template_path.as_deref())?;
    let body = renderer.render(&context)?;

    let (notifier, message): (Box<dyn Notifier>, EmailMessage) = match cli.email {
        Some(to) if !cli.no_email => {
            tracing::debug!(body = %body, "Rendered email");
            tracing::info!(to = %to, "Sending email");
            let message = EmailMessage::new(&config.mail.from_address, to, context.subject(), body)
                .with_cc(cli.cc);
            let notifier = SendmailNotifier::new(&config.mail.sendmail_command)?;
            (Box::new(notifier) as Box<dyn Notifier>, message)
        }
        _ => {
            tracing::debug!("Printing rendered email");
            let message = EmailMessage::new(&config.mail.from_address, "", context.subject(), body);
            let notifier = ConsoleNotifier::on(ConsoleStream::for_output(cli.json));
            (Box::new(notifier) as Box<dyn Notifier>, message)
        }
    };

    let status = notifier.deliver(&message).await?;
    tracing::info!(status = %status, "Notification delivered");

    Ok(())
}
