use std::process::ExitCode;

use anyhow::{anyhow, Context};
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use codeowners::config::Config;
use codeowners::models::Team;
use codeowners::registry::Registry;
use codeowners::render;
use codeowners::review::{self, ApprovalVerdict};
use codeowners::service::{Enrollment, OwnershipService};

#[derive(Parser)]
#[command(name = "codeowners")]
#[command(about = "Manage which teams own which paths of a repository")]
struct Cli {
    /// Record file to operate on (defaults to CODEOWNERS_FILE or codeowners.json)
    #[arg(short, long, global = true)]
    file: Option<std::path::PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List every team with its members and paths
    Teams,
    /// Show the teams owning each path
    Owners {
        #[arg(required = true)]
        paths: Vec<String>,
    },
    /// Check that a change set has the approvals it needs
    Check {
        /// Author of the change; their own approval never counts
        #[arg(long)]
        author: String,
        /// Usernames that approved the change
        #[arg(long = "approver")]
        approvers: Vec<String>,
        /// Changed files
        paths: Vec<String>,
    },
    /// Work out which reviewers a change set needs
    Reviewers {
        #[arg(long)]
        author: String,
        /// Reviewers already assigned
        #[arg(long = "reviewer")]
        reviewers: Vec<String>,
        /// Changed files
        paths: Vec<String>,
    },
    /// Create an empty team
    CreateTeam {
        name: String,
        #[arg(short, long, default_value = "")]
        description: String,
    },
    /// Delete a team
    DeleteTeam { name: String },
    /// Rename a team
    RenameTeam { name: String, new_name: String },
    /// Make a team own a path
    AddPath { team: String, path: String },
    /// Stop a team owning a path
    RemovePath { team: String, path: String },
    /// Look a user up in GitLab and add them to a team
    AddMember { team: String, username: String },
    /// Remove a member from a team
    RemoveMember { team: String, username: String },
    /// Parse the record file and check team names are unique
    Validate,
}

/// Initialize tracing on stderr so stdout only carries command output.
fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::new(
        std::env::var("RUST_LOG").unwrap_or_else(|_| "codeowners=info".into()),
    );
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn team_mut<'a>(registry: &'a mut Registry, name: &str) -> anyhow::Result<&'a mut Team> {
    registry
        .team_mut(name)
        .ok_or_else(|| anyhow!("Team not found: {}", name))
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();
    init_tracing();

    let mut config = Config::from_env();
    if let Some(file) = cli.file {
        config.file = file;
    }

    let service = OwnershipService::open(&config.file, config.gitlab_client());
    let mut registry = if service.has_record_file() {
        Registry::load(&service)
            .with_context(|| format!("Failed to open {}", config.file.display()))?
    } else {
        tracing::info!("No record file at {}, starting empty", config.file.display());
        Registry::default()
    };

    match cli.command {
        Commands::Teams => {
            print!("{}", render::render_teams(registry.teams()));
        }
        Commands::Owners { paths } => {
            for path in paths {
                print!("{}", render::render_owners(&path, &registry.owners(&path)));
            }
        }
        Commands::Check {
            author,
            approvers,
            paths,
        } => {
            let verdict = review::check_approvals(
                &config.policy,
                registry.teams(),
                &paths,
                &approvers,
                &author,
            );
            match verdict {
                ApprovalVerdict::Approved => println!("Approved"),
                ApprovalVerdict::InsufficientApprovals { required, given } => {
                    println!("Not enough approvals: {} of {} required", given, required);
                    return Ok(ExitCode::FAILURE);
                }
                ApprovalVerdict::MissingTeams { teams } => {
                    let reviewers = review::team_reviewers(
                        registry.teams(),
                        &teams.iter().cloned().collect(),
                        &author,
                    );
                    println!("No approval from teams:");
                    for (team, members) in reviewers {
                        let members: Vec<String> =
                            members.iter().map(|m| format!("@{}", m)).collect();
                        println!("{:<7} - {}", team, members.join(", "));
                    }
                    return Ok(ExitCode::FAILURE);
                }
            }
        }
        Commands::Reviewers {
            author,
            reviewers,
            paths,
        } => {
            let plan = review::plan_reviewers(
                &config.policy,
                registry.teams(),
                &paths,
                &author,
                &reviewers,
            );
            println!("{}", serde_json::to_string_pretty(&plan)?);
        }
        Commands::CreateTeam { name, description } => {
            registry.add_team(Team::new(name, description))?;
        }
        Commands::DeleteTeam { name } => {
            registry
                .remove_team(&name)
                .ok_or_else(|| anyhow!("Team not found: {}", name))?;
        }
        Commands::RenameTeam { name, new_name } => {
            registry.rename_team(&name, &new_name)?;
        }
        Commands::AddPath { team, path } => {
            if !registry.add_path(&team, &path)? {
                println!("{} already owns {} or the path is empty", team, path);
            }
        }
        Commands::RemovePath { team, path } => {
            if !registry.remove_path(&team, &path)? {
                println!("{} does not own {}", team, path);
            }
        }
        Commands::AddMember { team, username } => {
            let team = team_mut(&mut registry, &team)?;
            match service.add_member_by_username(team, &username).await? {
                Enrollment::Added(member) => {
                    println!("Added @{} ({}) to {}", member.username, member.display_name, team.name)
                }
                Enrollment::AlreadyMember => println!("@{} is already in {}", username, team.name),
                Enrollment::NotFound => {
                    println!("No GitLab user named {}", username);
                    return Ok(ExitCode::FAILURE);
                }
            }
        }
        Commands::RemoveMember { team, username } => {
            team_mut(&mut registry, &team)?
                .remove_member(&username)
                .ok_or_else(|| anyhow!("{} is not a member of {}", username, team))?;
        }
        Commands::Validate => {
            if registry.has_duplicate_team_names() {
                println!("Duplicate team names found");
                return Ok(ExitCode::FAILURE);
            }
            println!("{} teams OK", registry.teams().len());
        }
    }

    registry.flush(&service)?;
    Ok(ExitCode::SUCCESS)
}
