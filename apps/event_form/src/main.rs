use std::{path::PathBuf, time::Duration};

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use client_core::{
    form::SAVE_ERROR_MESSAGE, DraftField, EventDraft, EventTransport, FormController, FormError,
    FormPhase, FormSettings, HttpEventClient,
};
use shared::domain::TimeSlot;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(about = "Create and inspect events stored by the event server")]
struct Cli {
    #[arg(long, default_value = "http://127.0.0.1:3000")]
    server_url: String,
    /// How long the form stays in its loading state after mount.
    #[arg(long, default_value_t = 1_000)]
    loading_delay_ms: u64,
    /// How long the confirmation is kept before it is dismissed.
    #[arg(long, default_value_t = 7_000)]
    dismiss_window_ms: u64,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Fill the form and submit it.
    Create(CreateArgs),
    /// Print the stored event, if any.
    Show,
    /// Load the stored event back into a form and print the draft.
    Edit,
    /// List the selectable start/end times.
    TimeSlots,
}

#[derive(Args, Debug)]
struct CreateArgs {
    #[arg(long, default_value = "")]
    name: String,
    /// `YYYY-MM-DD` or `June 1, 2025`.
    #[arg(long)]
    date: Option<String>,
    /// e.g. `10:00 AM`.
    #[arg(long)]
    start: Option<String>,
    #[arg(long)]
    end: Option<String>,
    #[arg(long)]
    time_zone: Option<String>,
    #[arg(long, default_value = "")]
    description: String,
    #[arg(long, default_value = "")]
    video_url: String,
    /// Banner image file (JPG or PNG).
    #[arg(long)]
    banner: Option<PathBuf>,
}

impl CreateArgs {
    fn field_values(&self) -> Vec<(DraftField, &str)> {
        let mut values = vec![
            (DraftField::EventName, self.name.as_str()),
            (DraftField::Description, self.description.as_str()),
            (DraftField::VideoUrl, self.video_url.as_str()),
        ];
        let optional = [
            (DraftField::EventDate, &self.date),
            (DraftField::StartTime, &self.start),
            (DraftField::EndTime, &self.end),
            (DraftField::TimeZone, &self.time_zone),
        ];
        values.extend(
            optional
                .into_iter()
                .filter_map(|(field, value)| value.as_deref().map(|value| (field, value))),
        );
        values
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .init();
    let cli = Cli::parse();

    let client = HttpEventClient::new(&cli.server_url)
        .with_context(|| format!("invalid server url {}", cli.server_url))?;
    let settings = FormSettings {
        loading_delay: Duration::from_millis(cli.loading_delay_ms),
        dismiss_window: Duration::from_millis(cli.dismiss_window_ms),
    };

    match cli.command {
        Command::Create(args) => create(client, settings, args).await,
        Command::Show => show(client).await,
        Command::Edit => edit(client, settings).await,
        Command::TimeSlots => {
            for slot in TimeSlot::all() {
                println!("{}", slot.label());
            }
            Ok(())
        }
    }
}

async fn ready_form(
    client: HttpEventClient,
    settings: FormSettings,
) -> FormController<HttpEventClient> {
    let mut form = FormController::mount(client, settings);
    while form.phase() == FormPhase::Loading {
        if form.next_signal().await.is_none() {
            break;
        }
    }
    form
}

async fn create(client: HttpEventClient, settings: FormSettings, args: CreateArgs) -> Result<()> {
    let mut form = ready_form(client, settings).await;
    for (field, value) in args.field_values() {
        form.update_field(field, value);
    }
    if let Some(path) = &args.banner {
        form.attach_image_from_path(path).await?;
    }

    match form.submit().await {
        Ok(created) => {
            if let Some(banner) = form.success_message() {
                println!("{banner}");
            }
            println!("{}", serde_json::to_string_pretty(&created)?);
            info!(event_name = %created.event_name, "submitted");
            form.unmount();
            Ok(())
        }
        Err(FormError::Validation(report)) => {
            for label in report.labels() {
                eprintln!("  - {label}");
            }
            anyhow::bail!("{report}")
        }
        Err(err) => {
            let message = form.message().unwrap_or(SAVE_ERROR_MESSAGE).to_string();
            Err(anyhow::Error::new(err).context(message))
        }
    }
}

async fn show(client: HttpEventClient) -> Result<()> {
    match client.fetch_latest().await? {
        Some(stored) => println!("{}", serde_json::to_string_pretty(&stored)?),
        None => println!("no event stored yet"),
    }
    Ok(())
}

async fn edit(client: HttpEventClient, settings: FormSettings) -> Result<()> {
    let mut form = ready_form(client, settings).await;
    if form.edit_last_event().await?.is_none() {
        println!("no event stored yet");
        return Ok(());
    }
    print_draft(form.draft());
    Ok(())
}

fn print_draft(draft: &EventDraft) {
    let unset = || "-".to_string();
    println!("{:<12} {}", DraftField::EventName.key(), draft.event_name);
    println!(
        "{:<12} {}",
        DraftField::EventDate.key(),
        draft.event_date.map(|date| date.to_string()).unwrap_or_else(unset)
    );
    println!(
        "{:<12} {}",
        DraftField::StartTime.key(),
        draft.start_time.map(TimeSlot::label).unwrap_or_else(unset)
    );
    println!(
        "{:<12} {}",
        DraftField::EndTime.key(),
        draft.end_time.map(TimeSlot::label).unwrap_or_else(unset)
    );
    println!(
        "{:<12} {}",
        DraftField::TimeZone.key(),
        draft.time_zone.map(|zone| zone.to_string()).unwrap_or_else(unset)
    );
    println!("{:<12} {}", DraftField::Description.key(), draft.description);
    println!("{:<12} {}", DraftField::VideoUrl.key(), draft.video_url);
}
