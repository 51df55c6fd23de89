//! View management commands.
//!
//! Each subcommand maps onto one `ViewClient` operation.

use std::io::Read;
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Subcommand;
use comfy_table::{Cell, Color, ContentArrangement, Table, presets::UTF8_FULL_CONDENSED};
use dialoguer::{Confirm, theme::ColorfulTheme};
use jenkins_views::api::JenkinsApi;
use jenkins_views::{ALL_VIEW, JobSummary, ListViewConfig, ViewClient, ViewType};
use tracing::warn;

/// View subcommands.
#[derive(Subcommand, Debug)]
pub enum ViewCommands {
    /// List views whose name matches a regular expression
    List {
        /// Regular expression (matches everything when omitted)
        #[arg(default_value = "")]
        filter: String,

        /// Match the filter case-sensitively
        #[arg(long)]
        case_sensitive: bool,

        /// Only views of this type (listview, myview)
        #[arg(long = "type")]
        view_type: Option<String>,
    },
    /// Create an empty view
    Create {
        name: String,

        /// View type (listview, myview)
        #[arg(long = "type", default_value = "listview")]
        view_type: String,
    },
    /// Create and configure a list view
    CreateListView {
        name: String,

        #[arg(long)]
        description: Option<String>,

        /// all_selected_jobs, enabled_jobs_only or disabled_jobs_only
        #[arg(long)]
        status_filter: Option<String>,

        /// Only show queued builds of the view's jobs
        #[arg(long)]
        filter_queue: bool,

        /// Only show executors running the view's jobs
        #[arg(long)]
        filter_executors: bool,

        /// Include jobs whose names match this regular expression
        #[arg(long)]
        regex: Option<String>,
    },
    /// Delete a view
    Delete { name: String },
    /// Delete every view except "All"
    DeleteAll {
        /// Skip the confirmation prompt
        #[arg(long, short)]
        yes: bool,
    },
    /// Check whether a view exists (exit status 1 when it does not)
    Exists { name: String },
    /// List the jobs in a view
    Jobs {
        name: String,

        /// Show job URL and status
        #[arg(long)]
        details: bool,
    },
    /// Add a job to a view
    AddJob { view: String, job: String },
    /// Remove a job from a view
    RemoveJob { view: String, job: String },
    /// Print a view's config.xml
    GetConfig {
        name: String,

        /// Write to a file instead of stdout
        #[arg(long, short)]
        output: Option<PathBuf>,
    },
    /// Replace a view's config.xml
    PostConfig {
        name: String,

        /// Read XML from a file instead of stdin
        #[arg(long, short)]
        file: Option<PathBuf>,
    },
}

/// Run a view command.
pub async fn run<A: JenkinsApi>(client: &ViewClient<A>, command: ViewCommands) -> Result<ExitCode> {
    match command {
        ViewCommands::List {
            filter,
            case_sensitive,
            view_type,
        } => {
            let names = match view_type {
                Some(t) => {
                    let view_type: ViewType = t.parse()?;
                    client.list_by_type(view_type, &filter, !case_sensitive).await?
                }
                None => client.list(&filter, !case_sensitive).await?,
            };
            for name in names {
                println!("{}", name);
            }
        }
        ViewCommands::Create { name, view_type } => {
            client.create_named(&name, &view_type).await?;
            println!("Created view '{}'", name);
        }
        ViewCommands::CreateListView {
            name,
            description,
            status_filter,
            filter_queue,
            filter_executors,
            regex,
        } => {
            let config = list_view_config(
                name,
                description,
                status_filter.as_deref(),
                filter_queue,
                filter_executors,
                regex,
            );
            client.create_list_view(&config).await?;
            println!("Created list view '{}'", config.name);
        }
        ViewCommands::Delete { name } => {
            client.delete(&name).await?;
            println!("Deleted view '{}'", name);
        }
        ViewCommands::DeleteAll { yes } => {
            if !yes && !confirm_delete_all()? {
                println!("Aborted.");
                return Ok(ExitCode::SUCCESS);
            }
            client.delete_all().await?;
            println!("Deleted all views except '{}'", ALL_VIEW);
        }
        ViewCommands::Exists { name } => {
            if client.exists(&name).await? {
                println!("yes");
            } else {
                println!("no");
                return Ok(ExitCode::FAILURE);
            }
        }
        ViewCommands::Jobs { name, details } => {
            if details {
                let jobs = client.list_jobs_with_details(&name).await?;
                print_jobs_table(&jobs);
            } else {
                for job in client.list_jobs(&name).await? {
                    println!("{}", job);
                }
            }
        }
        ViewCommands::AddJob { view, job } => {
            client.add_job(&view, &job).await?;
            println!("Added '{}' to view '{}'", job, view);
        }
        ViewCommands::RemoveJob { view, job } => {
            client.remove_job(&view, &job).await?;
            println!("Removed '{}' from view '{}'", job, view);
        }
        ViewCommands::GetConfig { name, output } => {
            let xml = client.get_config(&name).await?;
            match output {
                Some(path) => std::fs::write(&path, xml)
                    .with_context(|| format!("writing {}", path.display()))?,
                None => print!("{}", xml),
            }
        }
        ViewCommands::PostConfig { name, file } => {
            let xml = match file {
                Some(path) => std::fs::read_to_string(&path)
                    .with_context(|| format!("reading {}", path.display()))?,
                None => {
                    let mut buf = String::new();
                    std::io::stdin().read_to_string(&mut buf)?;
                    buf
                }
            };
            client.post_config(&name, &xml).await?;
            println!("Updated config of view '{}'", name);
        }
    }

    Ok(ExitCode::SUCCESS)
}

/// Assemble list view settings from command-line values.
fn list_view_config(
    name: String,
    description: Option<String>,
    status_filter: Option<&str>,
    filter_queue: bool,
    filter_executors: bool,
    regex: Option<String>,
) -> ListViewConfig {
    let mut config = ListViewConfig::new(name)
        .filter_queue(filter_queue)
        .filter_executors(filter_executors);

    if let Some(description) = description {
        config = config.description(description);
    }
    if let Some(filter) = status_filter {
        config = config.status_filter_name(filter);
        if config.status_filter.is_none() {
            warn!("unknown status filter '{}', showing all selected jobs", filter);
        }
    }
    if let Some(regex) = regex {
        config = config.regex(regex);
    }
    config
}

fn confirm_delete_all() -> Result<bool> {
    Ok(Confirm::with_theme(&ColorfulTheme::default())
        .with_prompt(format!("Delete every view except '{}'?", ALL_VIEW))
        .default(false)
        .interact()?)
}

fn print_jobs_table(jobs: &[JobSummary]) {
    if jobs.is_empty() {
        println!("No jobs in this view.");
        return;
    }

    let mut table = Table::new();
    table.load_preset(UTF8_FULL_CONDENSED);
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec![
        Cell::new("Job").fg(Color::Cyan),
        Cell::new("Status").fg(Color::Cyan),
        Cell::new("URL").fg(Color::Cyan),
    ]);

    for job in jobs {
        let color = job.color.as_deref().unwrap_or("-");
        table.add_row(vec![
            Cell::new(&job.name),
            Cell::new(color).fg(status_color(color)),
            Cell::new(job.url.as_deref().unwrap_or("-")),
        ]);
    }

    println!("{table}");
}

/// Terminal color for a Jenkins ball color (`blue`, `red_anime`, ...)
fn status_color(ball: &str) -> Color {
    match ball.trim_end_matches("_anime") {
        "blue" => Color::Green,
        "red" => Color::Red,
        "yellow" => Color::Yellow,
        _ => Color::Grey,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jenkins_views::StatusFilter;

    #[test]
    fn test_list_view_config_from_flags() {
        let config = list_view_config(
            "release".to_string(),
            Some("Release jobs".to_string()),
            Some("enabled_jobs_only"),
            true,
            false,
            Some("^rel".to_string()),
        );

        assert_eq!(config.name, "release");
        assert_eq!(config.description.as_deref(), Some("Release jobs"));
        assert_eq!(config.status_filter, Some(StatusFilter::EnabledJobsOnly));
        assert!(config.filter_queue);
        assert!(!config.filter_executors);
        assert_eq!(config.regex.as_deref(), Some("^rel"));
    }

    #[test]
    fn test_unknown_status_filter_is_dropped() {
        let config = list_view_config("v".to_string(), None, Some("sometimes"), false, false, None);
        assert!(config.status_filter.is_none());
    }

    #[test]
    fn test_status_color_ignores_animation_suffix() {
        assert_eq!(status_color("blue"), Color::Green);
        assert_eq!(status_color("red_anime"), Color::Red);
        assert_eq!(status_color("notbuilt"), Color::Grey);
    }
}
