use anyhow::{anyhow, Context, Result};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use log::{debug, info};
use serde::Serialize;
use std::path::PathBuf;

use lifebattery::backend::domain::commands::profile::{AddProfileCommand, UpdateProfileCommand};
use lifebattery::backend::domain::models::{Profile, ProfileType, Theme};
use lifebattery::backend::domain::{Clock, ProgressService, SystemClock};
use lifebattery::backend::io::{ProfileMapper, ProgressMapper};
use lifebattery::config::AppConfig;
use lifebattery::{initialize_backend, AppState};

#[derive(Parser, Debug)]
#[command(name = "lifebattery", version, about = "How much of the battery is left")]
struct Cli {
    /// Configuration file (defaults to config.yaml in the data directory)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Print shared JSON records instead of text
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Show the active profile and its remaining time
    Status,
    /// List every profile
    List,
    /// Create a profile and make it active
    Add {
        #[arg(long)]
        name: String,
        #[arg(long = "type", default_value = "human")]
        profile_type: ProfileType,
        /// Birth date, YYYY-MM-DD
        #[arg(long)]
        dob: NaiveDate,
        /// Defaults to the configured lifespan for the profile type
        #[arg(long)]
        lifespan: Option<i64>,
        #[arg(long)]
        theme: Option<Theme>,
    },
    /// Change fields of a profile
    Update {
        id: String,
        #[arg(long)]
        name: Option<String>,
        #[arg(long = "type")]
        profile_type: Option<ProfileType>,
        #[arg(long)]
        dob: Option<NaiveDate>,
        #[arg(long)]
        lifespan: Option<i64>,
    },
    /// Delete a profile
    Delete { id: String },
    /// Make a profile active
    Switch { id: String },
    /// Activate the next profile
    Next,
    /// Activate the previous profile
    Prev,
    /// List themes, or select one for the active profile
    Theme {
        theme: Option<Theme>,
        /// The user holds a subscription
        #[arg(long)]
        pro: bool,
    },
    /// Manage the active profile's wish list
    Wish {
        #[command(subcommand)]
        action: WishAction,
    },
    /// Delete every profile and all stored data, legacy data included
    Reset {
        /// Confirm the reset
        #[arg(long)]
        yes: bool,
    },
}

#[derive(Subcommand, Debug)]
enum WishAction {
    List,
    Add { text: String },
    Toggle { id: u64 },
    Delete { id: u64 },
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();
    let config = AppConfig::load(cli.config.as_deref())?;
    debug!("Using configuration: {:?}", config);

    let mut app = initialize_backend(&config)?;
    run(&mut app, &config, cli.command, cli.json)
}

fn run(app: &mut AppState, config: &AppConfig, command: Command, json: bool) -> Result<()> {
    let store = &mut app.profile_store;

    match command {
        Command::Status => {
            let Some(profile) = store.get_active_profile() else {
                println!("No profiles yet. Create one with `lifebattery add --name <NAME> --dob <YYYY-MM-DD>`.");
                return Ok(());
            };
            let progress = progress_for(&app.progress_service, profile)?;
            print_status(progress, profile, json)?;
        }
        Command::List => {
            let response = ProfileMapper::to_profile_list_dto(store.list_profiles(), store.active_profile_id());
            if json {
                print_json(&response)?;
            } else if response.profiles.is_empty() {
                println!("No profiles yet.");
            } else {
                for profile in &response.profiles {
                    let marker = if response.active_profile_id.as_deref() == Some(profile.id.as_str()) { "*" } else { " " };
                    println!(
                        "{} {}  {} ({}), born {}, {} years, theme {}",
                        marker, profile.id, profile.name, profile.profile_type, profile.dob, profile.lifespan, profile.theme
                    );
                }
            }
        }
        Command::Add { name, profile_type, dob, lifespan, theme } => {
            let lifespan = lifespan.unwrap_or_else(|| i64::from(config.default_lifespan_for(profile_type)));
            let profile = store.add_profile(AddProfileCommand { name, profile_type, dob, lifespan, theme })?;
            print_profile(&profile, "Profile created successfully", json)?;
        }
        Command::Update { id, name, profile_type, dob, lifespan } => {
            let command = UpdateProfileCommand {
                name,
                profile_type,
                dob,
                lifespan,
                theme: None,
            };
            if command.is_empty() {
                return Err(anyhow!("Nothing to update; pass at least one field"));
            }
            let profile = store.update_profile(&id, command)?;
            print_profile(&profile, "Profile updated successfully", json)?;
        }
        Command::Delete { id } => {
            store.delete_profile(&id)?;
            let response = ProfileMapper::to_active_profile_dto(store.get_active_profile());
            if json {
                print_json(&response)?;
            } else {
                println!("Deleted profile {}", id);
            }
        }
        Command::Switch { id } => {
            if !store.switch_profile(&id) {
                return Err(anyhow!("Profile not found: {}", id));
            }
            print_active(store.get_active_profile(), json)?;
        }
        Command::Next => {
            let active = store.next_profile().cloned();
            print_active(active.as_ref(), json)?;
        }
        Command::Prev => {
            let active = store.prev_profile().cloned();
            print_active(active.as_ref(), json)?;
        }
        Command::Theme { theme: None, pro } => {
            for theme in Theme::ALL {
                let lock = if theme.is_available(pro) { "" } else { " (locked)" };
                println!("{}{}", theme, lock);
            }
        }
        Command::Theme { theme: Some(theme), pro } => {
            let id = active_id(store.get_active_profile())?;
            let profile = store.set_theme(&id, theme, pro)?;
            print_profile(&profile, "Theme updated successfully", json)?;
        }
        Command::Reset { yes: false } => {
            return Err(anyhow!("Reset deletes all profiles and wishes; pass --yes to confirm"));
        }
        Command::Reset { yes: true } => {
            store.reset();
            if json {
                print_json(&ProfileMapper::to_profile_list_dto(store.list_profiles(), store.active_profile_id()))?;
            } else {
                println!("All data has been reset.");
            }
        }
        Command::Wish { action } => {
            let id = active_id(store.get_active_profile())?;
            match action {
                WishAction::List => {}
                WishAction::Add { text } => {
                    let wish = store.add_wish(&id, &text)?;
                    info!("Added wish {}", wish.id);
                }
                WishAction::Toggle { id: wish_id } => {
                    store.toggle_wish(&id, wish_id)?;
                }
                WishAction::Delete { id: wish_id } => {
                    store.delete_wish(&id, wish_id)?;
                }
            }

            let response = ProfileMapper::to_wish_list_dto(store.wish_list(&id)?);
            if json {
                print_json(&response)?;
            } else {
                for wish in &response.pending {
                    println!("[ ] {}  {}", wish.id, wish.text);
                }
                for wish in &response.fulfilled {
                    println!("[x] {}  {}", wish.id, wish.text);
                }
            }
        }
    }

    Ok(())
}

fn progress_for(
    progress_service: &ProgressService<SystemClock>,
    profile: &Profile,
) -> Result<shared::LifeProgressResponse> {
    let progress = progress_service
        .snapshot_for(profile)
        .with_context(|| format!("Failed to calculate progress for profile {}", profile.id))?;
    let now = progress_service.clock().now();
    Ok(ProgressMapper::to_dto(&progress, Some(&profile.id), now))
}

fn active_id(active: Option<&Profile>) -> Result<String> {
    active
        .map(|p| p.id.clone())
        .ok_or_else(|| anyhow!("No active profile; create one with `lifebattery add`"))
}

fn print_status(progress: shared::LifeProgressResponse, profile: &Profile, json: bool) -> Result<()> {
    if json {
        return print_json(&progress);
    }

    println!("{} ({})", profile.name, profile.profile_type);
    println!(
        "Battery: {:.1}% [{}]",
        progress.display_percentage,
        progress.charge_level.as_str()
    );
    println!("Ends on: {}", progress.death_date);
    println!(
        "Remaining: {} years, {} weeks, {} days",
        progress.remaining.years, progress.remaining.weeks, progress.remaining.days
    );
    println!(
        "Countdown: {}:{:02}:{:02}.{:03}",
        progress.countdown.hours, progress.countdown.minutes, progress.countdown.seconds, progress.countdown.milliseconds
    );
    Ok(())
}

fn print_profile(profile: &Profile, message: &str, json: bool) -> Result<()> {
    if json {
        print_json(&ProfileMapper::to_profile_response(profile, message))
    } else {
        println!("{}: {} ({})", message, profile.name, profile.id);
        Ok(())
    }
}

fn print_active(active: Option<&Profile>, json: bool) -> Result<()> {
    if json {
        return print_json(&ProfileMapper::to_active_profile_dto(active));
    }
    match active {
        Some(profile) => println!("Active profile: {} ({})", profile.name, profile.id),
        None => println!("No profiles yet."),
    }
    Ok(())
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
