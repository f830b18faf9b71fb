use std::io::IsTerminal;

use chrono::Utc;
use clap::{Args, CommandFactory, Parser, Subcommand};
use inquire::Text;

use crate::clients::google_calendar_client::GoogleCalendarClient;
use crate::clients::openweather_client::OpenWeatherClient;
use crate::config::Settings;
use crate::error::AppError;
use crate::models::calendar::render_events;
use crate::oauth::{self, SystemBrowser};
use crate::service::calendar_service::CalendarService;
use crate::service::note_service::{self, NoteService};
use crate::service::todo_service::{self, TodoService};
use crate::service::weather_service::{LocationQuery, WeatherService};

#[derive(Parser)]
#[command(
    name = "personalcli",
    version,
    about = "A personal CLI to help with daily tasks",
    long_about = "Quick access to weather, todos, notes and your calendar from the command line."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Manage your todo list
    Todo {
        #[command(subcommand)]
        command: Option<TodoCommand>,
    },
    /// Manage your notes
    Note {
        #[command(subcommand)]
        command: Option<NoteCommand>,
    },
    /// Get the current weather for a zip code, city, or 'City, State'
    Weather(WeatherArgs),
    /// Interact with your Google Calendar
    Calendar {
        #[command(subcommand)]
        command: Option<CalendarCommand>,
    },
}

#[derive(Subcommand)]
pub enum TodoCommand {
    /// Add a new task to your todo list
    Add {
        #[arg(required = true, value_name = "DESCRIPTION")]
        description: Vec<String>,
    },
    /// List all of your tasks
    List,
    /// Mark a task as completed
    Done {
        #[arg(value_name = "TASK_ID")]
        task_id: String,
    },
    /// Clear all tasks from the list
    Clear,
}

#[derive(Subcommand)]
pub enum NoteCommand {
    /// Create a new note (prompts for the text when none is given)
    New {
        #[arg(value_name = "CONTENT")]
        content: Vec<String>,
    },
    /// List all of your notes
    List,
    /// Find notes containing a keyword
    Find { keyword: String },
}

#[derive(Args)]
pub struct WeatherArgs {
    /// Zip code for weather lookup
    #[arg(short = 'z', long)]
    pub zip: Option<String>,
    /// City name or 'City, State' for weather lookup
    #[arg(short = 'l', long, conflicts_with = "zip")]
    pub location: Option<String>,
    /// OpenWeatherMap API key (defaults to WEATHER_API_KEY)
    #[arg(short = 'k', long = "api-key")]
    pub api_key: Option<String>,
}

#[derive(Subcommand)]
pub enum CalendarCommand {
    /// List upcoming events from your primary calendar
    Events,
}

pub async fn run(cli: Cli, settings: &Settings) -> Result<(), AppError> {
    match cli.command {
        None => {
            let _ = Cli::command().print_help();
            println!();
            Ok(())
        }
        Some(Commands::Todo { command }) => run_todo(command.unwrap_or(TodoCommand::List), settings),
        Some(Commands::Note { command }) => run_note(command.unwrap_or(NoteCommand::List), settings),
        Some(Commands::Weather(args)) => run_weather(args, settings).await,
        Some(Commands::Calendar { command }) => {
            run_calendar(command.unwrap_or(CalendarCommand::Events), settings).await
        }
    }
}

fn run_todo(command: TodoCommand, settings: &Settings) -> Result<(), AppError> {
    let paths = &settings.paths;
    match command {
        TodoCommand::Add { description } => {
            let task = TodoService::add(paths, &description)?;
            println!("Added task: \"{}\"", task.description);
        }
        TodoCommand::List => {
            let tasks = TodoService::list(paths)?;
            println!("{}", todo_service::render_tasks(&tasks));
        }
        TodoCommand::Done { task_id } => {
            let id = TodoService::done(paths, &task_id)?;
            println!("Marked task {} as completed.", id);
        }
        TodoCommand::Clear => {
            TodoService::clear(paths)?;
            println!("All tasks cleared.");
        }
    }
    Ok(())
}

fn run_note(command: NoteCommand, settings: &Settings) -> Result<(), AppError> {
    let paths = &settings.paths;
    match command {
        NoteCommand::New { content } => {
            let words = if content.is_empty() {
                vec![prompt_note_text()?]
            } else {
                content
            };
            let note = NoteService::create(paths, &words, Utc::now())?;
            println!("Created note {}.", note.id);
        }
        NoteCommand::List => {
            let notes = NoteService::list(paths)?;
            println!("{}", note_service::render_notes(&notes, settings.timezone));
        }
        NoteCommand::Find { keyword } => {
            let notes = NoteService::find(paths, &keyword)?;
            println!("{}", note_service::render_matches(&keyword, &notes, settings.timezone));
        }
    }
    Ok(())
}

fn prompt_note_text() -> Result<String, AppError> {
    if !std::io::stdin().is_terminal() {
        return Err(AppError::input("Please provide the note content."));
    }
    Text::new("Enter your note.")
        .prompt()
        .map_err(|e| AppError::input(format!("No note content provided: {}", e)))
}

async fn run_weather(args: WeatherArgs, settings: &Settings) -> Result<(), AppError> {
    let api_key = WeatherService::resolve_api_key(args.api_key.as_deref(), settings)?;
    let query = LocationQuery::from_args(args.zip.as_deref(), args.location.as_deref())?;
    println!("{}", query.progress_line());

    let client = OpenWeatherClient::new(&settings.weather_base_url, api_key);
    let report = WeatherService::report(&client, &query).await?;
    println!();
    println!("{}", report.render());
    Ok(())
}

async fn run_calendar(command: CalendarCommand, settings: &Settings) -> Result<(), AppError> {
    match command {
        CalendarCommand::Events => {
            let token =
                oauth::authorized_token(&settings.paths, settings.redirect_port, &SystemBrowser).await?;
            let client = GoogleCalendarClient::new(&settings.calendar_base_url, token);
            let events = CalendarService::upcoming(&client, Utc::now()).await?;
            println!("{}", render_events(&events));
        }
    }
    Ok(())
}
