use clap::error::ErrorKind as ClapErrorKind;
use clap::{Parser, Subcommand};
use is_terminal::IsTerminal;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;
use twig::areas::repository::Repository;
use twig::artifacts::core::config::{DEFAULT_LOG_FILTER, LOG_FILTER_ENV};
use twig::artifacts::core::error::RepositoryError;

#[derive(Parser)]
#[command(
    name = "twig",
    version = "0.1.0",
    author = "Sami Barbut-Dica",
    about = "A small single-user version-control engine",
    long_about = "twig records snapshots of a working directory as commits, \
    keeps named branches over them and merges branches with a three-way merge.",
    help_template = r"
{name} {version} - {about}

USAGE:
    {usage}

OPTIONS:
    {all-args}
"
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    #[command(
        name = "init",
        about = "Create a new repository in the current directory"
    )]
    Init,
    #[command(name = "add", about = "Stage the current content of a file")]
    Add {
        #[arg(index = 1)]
        file: String,
    },
    #[command(
        name = "rm",
        about = "Unstage a file, or stage its removal if it is tracked"
    )]
    Rm {
        #[arg(index = 1)]
        file: String,
    },
    #[command(name = "commit", about = "Record the staged snapshot")]
    Commit {
        #[arg(index = 1, help = "The commit message")]
        message: Option<String>,
    },
    #[command(name = "log", about = "Show the history of the current branch")]
    Log,
    #[command(name = "global-log", about = "Show every commit ever made")]
    GlobalLog,
    #[command(name = "find", about = "Print the ids of commits with the given message")]
    Find {
        #[arg(index = 1)]
        message: String,
    },
    #[command(name = "status", about = "Show branches, staged and unstaged changes")]
    Status,
    #[command(name = "branch", about = "Create a branch at the current commit")]
    Branch {
        #[arg(index = 1)]
        name: String,
    },
    #[command(name = "rm-branch", about = "Delete a branch pointer")]
    RmBranch {
        #[arg(index = 1)]
        name: String,
    },
    #[command(
        name = "checkout",
        about = "Switch branches or restore a file",
        long_about = "checkout <branch> switches to a branch, \
        checkout -- <file> restores a file from the current commit and \
        checkout <commit> -- <file> restores it from another commit."
    )]
    Checkout {
        #[arg(index = 1, help = "Branch name, or commit id when a file is given")]
        target: Option<String>,
        #[arg(index = 2, last = true, help = "The file to restore")]
        file: Option<String>,
    },
    #[command(
        name = "reset",
        about = "Check out a commit and move the current branch to it"
    )]
    Reset {
        #[arg(index = 1)]
        commit: String,
    },
    #[command(name = "merge", about = "Merge another branch into the current one")]
    Merge {
        #[arg(index = 1)]
        branch: String,
    },
}

fn main() -> ExitCode {
    init_tracing();
    colored::control::set_override(std::io::stdout().is_terminal());

    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => return report_usage_error(err),
    };
    let Some(command) = cli.command else {
        println!("Please enter a command.");
        return ExitCode::SUCCESS;
    };

    match run(command) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => match err.downcast_ref::<RepositoryError>() {
            Some(repository_error) => {
                tracing::debug!(kind = ?repository_error.kind(), "command refused");
                println!("{}", repository_error);
                ExitCode::SUCCESS
            }
            None => {
                eprintln!("fatal: {:#}", err);
                ExitCode::FAILURE
            }
        },
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_env(LOG_FILTER_ENV)
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(std::io::stderr().is_terminal())
        .without_time()
        .init();
}

fn report_usage_error(err: clap::Error) -> ExitCode {
    let message = match err.kind() {
        ClapErrorKind::DisplayHelp | ClapErrorKind::DisplayVersion => err.exit(),
        ClapErrorKind::MissingSubcommand
        | ClapErrorKind::DisplayHelpOnMissingArgumentOrSubcommand => "Please enter a command.",
        ClapErrorKind::InvalidSubcommand => "No command with that name exists.",
        _ => "Incorrect operands.",
    };
    tracing::debug!(error = %err, "rejected command line");
    println!("{}", message);

    ExitCode::SUCCESS
}

fn run(command: Commands) -> anyhow::Result<()> {
    let pwd = std::env::current_dir()?;
    let repository = Repository::new(&pwd, Box::new(std::io::stdout()))?;

    match command {
        Commands::Init => repository.init(),
        Commands::Add { file } => repository.add(&file),
        Commands::Rm { file } => repository.rm(&file),
        Commands::Commit { message } => repository.commit(message.as_deref().unwrap_or_default()),
        Commands::Log => repository.log(),
        Commands::GlobalLog => repository.global_log(),
        Commands::Find { message } => repository.find(&message),
        Commands::Status => repository.status(),
        Commands::Branch { name } => repository.branch(&name),
        Commands::RmBranch { name } => repository.rm_branch(&name),
        Commands::Checkout { target, file } => match (target, file) {
            (Some(branch), None) => repository.checkout_branch(&branch),
            (commit, Some(file)) => repository.checkout_file(commit.as_deref(), &file),
            (None, None) => anyhow::bail!(RepositoryError::IncorrectOperands),
        },
        Commands::Reset { commit } => repository.reset(&commit),
        Commands::Merge { branch } => repository.merge(&branch),
    }
}
