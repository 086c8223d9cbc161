use clap::{Parser, Subcommand};
use minus::Pager;
use sprig::areas::repository::Repository;
use sprig::artifacts::core::PagerWriter;
use sprig::config::Settings;
use sprig::errors::{self, RepositoryError};
use sprig::logging;
use std::io::Write;
use std::process::ExitCode;

#[derive(Parser)]
#[command(
    name = "sprig",
    version = "0.1.0",
    author = "Sami Barbut-Dica",
    about = "A small local version-control system",
    long_about = "sprig keeps the history of the plain files in one directory: \
    stage files, commit them, branch, and merge branches back together with a \
    three-way merge.",
    help_template = r"
{name} {version} - {about}

USAGE:
    {usage}

OPTIONS:
    {all-args}
",
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    #[command(
        name = "init",
        about = "Initialize a new repository",
        long_about = "This command creates the .sprig directory in the current directory, \
        together with the initial commit and the master branch."
    )]
    Init,
    #[command(name = "add", about = "Stage a file for the next commit")]
    Add {
        #[arg(index = 1, help = "The file to stage")]
        file: String,
    },
    #[command(
        name = "commit",
        about = "Create a new commit with the specified message",
        long_about = "This command records the staged additions and removals \
        on top of the current branch tip."
    )]
    Commit {
        #[arg(index = 1, help = "The commit message")]
        message: String,
    },
    #[command(name = "rm", about = "Unstage a file or stage its removal")]
    Rm {
        #[arg(index = 1, help = "The file to remove")]
        file: String,
    },
    #[command(name = "log", about = "Show the history of the current branch")]
    Log,
    #[command(name = "global-log", about = "Show every commit ever made")]
    GlobalLog,
    #[command(name = "find", about = "Print the ids of the commits with a given message")]
    Find {
        #[arg(index = 1, help = "The exact commit message")]
        message: String,
    },
    #[command(name = "status", about = "Show branches, staged files and working changes")]
    Status,
    #[command(
        name = "checkout",
        about = "Restore a file or switch branches",
        long_about = "checkout -- <file> restores a file from the current branch tip, \
        checkout <commit> -- <file> restores it from any commit, \
        and checkout <branch> switches to another branch."
    )]
    Checkout {
        #[arg(index = 1, help = "The branch to switch to, or the commit to restore from")]
        target: Option<String>,
        #[arg(index = 2, last = true, help = "The file to restore")]
        file: Option<String>,
    },
    #[command(name = "branch", about = "Create a branch at the current commit")]
    Branch {
        #[arg(index = 1, help = "The name of the new branch")]
        name: String,
    },
    #[command(name = "rm-branch", about = "Delete a branch pointer")]
    RmBranch {
        #[arg(index = 1, help = "The branch to delete")]
        name: String,
    },
    #[command(name = "reset", about = "Move the current branch to a commit")]
    Reset {
        #[arg(index = 1, help = "The commit id, full or abbreviated")]
        commit: String,
    },
    #[command(name = "merge", about = "Merge a branch into the current branch")]
    Merge {
        #[arg(index = 1, help = "The branch to merge")]
        branch: String,
    },
}

impl Commands {
    /// Commands whose output may be long enough to page
    fn is_history(&self) -> bool {
        matches!(self, Commands::Log | Commands::GlobalLog)
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let settings = match Settings::from_env() {
        Ok(settings) => settings,
        Err(error) => return report(&error),
    };
    logging::init(&settings);
    colored::control::set_override(settings.color);

    match run(cli.command, settings).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => report(&error),
    }
}

async fn run(command: Commands, settings: Settings) -> anyhow::Result<()> {
    let pwd = std::env::current_dir()?;
    let use_pager = command.is_history()
        && !settings.no_pager
        && is_terminal::is_terminal(std::io::stdout());

    if use_pager {
        let writer = PagerWriter::new(Pager::new());
        let pager = writer.pager().clone();

        let mut repository = Repository::new(&pwd.to_string_lossy(), Box::new(writer), settings)?;
        execute(&mut repository, command).await?;
        minus::page_all(pager)?;
    } else {
        let mut repository = Repository::new(
            &pwd.to_string_lossy(),
            Box::new(std::io::stdout()),
            settings,
        )?;
        execute(&mut repository, command).await?;
        repository.writer().flush()?;
    }

    Ok(())
}

async fn execute(repository: &mut Repository, command: Commands) -> anyhow::Result<()> {
    let _lock = match command {
        Commands::Init => None,
        _ => {
            repository.ensure_initialized()?;
            Some(repository.lock()?)
        }
    };

    match command {
        Commands::Init => repository.init().await,
        Commands::Add { file } => repository.add(&file).await,
        Commands::Commit { message } => repository.commit(&message).await,
        Commands::Rm { file } => repository.rm(&file).await,
        Commands::Log => repository.log(),
        Commands::GlobalLog => repository.global_log(),
        Commands::Find { message } => repository.find(&message),
        Commands::Status => repository.status().await,
        Commands::Checkout { target, file } => match (target, file) {
            (target, Some(file)) => repository.checkout_file(target.as_deref(), &file),
            (Some(branch), None) => repository.checkout_branch(&branch).await,
            (None, None) => Err(RepositoryError::IncorrectOperands.into()),
        },
        Commands::Branch { name } => repository.branch(&name),
        Commands::RmBranch { name } => repository.rm_branch(&name),
        Commands::Reset { commit } => repository.reset(&commit).await,
        Commands::Merge { branch } => repository.merge(&branch).await,
    }
}

/// Print an error the way its kind asks for and pick the exit status
fn report(error: &anyhow::Error) -> ExitCode {
    match error.downcast_ref::<RepositoryError>() {
        Some(repository_error) => {
            println!("{repository_error}");
            tracing::debug!(kind = ?repository_error.kind(), "command rejected");
        }
        None => eprintln!("fatal: {error:#}"),
    }

    ExitCode::from(errors::exit_code_for(error))
}
