use std::io::IsTerminal;
use std::path::PathBuf;

use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use miette::{IntoDiagnostic, Result};

use gitscope_core::{CommitInfo, DiffLineKind, DiffResult, OutputFormat, ScopeConfig};

#[derive(Parser)]
#[command(
    name = "gitscope",
    version,
    about = "Read-only git repository introspection and diff engine",
    long_about = "gitscope inspects bare git repositories without ever writing to them:\n\
                   commit history, branch lists, aggregate statistics, and structured\n\
                   line-level diffs between branches.\n\n\
                   Examples:\n  \
                     gitscope init /srv/repos/demo.git            Create a bare repository\n  \
                     gitscope log --repo demo.git                 Show recent commits\n  \
                     gitscope diff --repo demo.git feature main   Preview a merge\n  \
                     gitscope ahead --repo demo.git feature main  Commits not yet merged\n  \
                     gitscope stats --repo demo.git --format json Machine-readable stats"
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,

    /// Path to configuration file (default: .gitscope.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Output format
    #[arg(
        long,
        global = true,
        default_value = "text",
        long_help = "Output format for command results.\n\n\
                       Formats:\n  \
                         text      Human-readable tables and summaries (default)\n  \
                         json      Machine-readable JSON with camelCase keys\n  \
                         markdown  GitHub-flavored Markdown"
    )]
    format: OutputFormat,

    /// When to use colors
    #[arg(long, global = true, default_value = "auto")]
    color: ColorChoice,
}

#[derive(Subcommand)]
enum Command {
    /// Show commit history for a repository
    #[command(long_about = "Show commit history for a repository.\n\n\
        Walks backwards from HEAD, newest first. A repository with no commits\n\
        yet produces empty output rather than an error.\n\n\
        Examples:\n  gitscope log --repo demo.git\n  gitscope log --repo demo.git --limit 10")]
    Log {
        /// Repository path (default: current directory)
        #[arg(long, default_value = ".")]
        repo: PathBuf,

        /// Maximum commits to show (default from config, then 50)
        #[arg(long)]
        limit: Option<usize>,
    },
    /// List local branches
    #[command(long_about = "List local branches by friendly name.\n\n\
        Examples:\n  gitscope branches --repo demo.git\n  gitscope branches --repo demo.git --format json")]
    Branches {
        /// Repository path (default: current directory)
        #[arg(long, default_value = ".")]
        repo: PathBuf,
    },
    /// Show aggregate repository statistics
    #[command(long_about = "Show aggregate repository statistics.\n\n\
        Reports commit count, branch count, on-disk size, and the timestamp of\n\
        the latest commit. A freshly initialized repository reports zeros.\n\n\
        Examples:\n  gitscope stats --repo demo.git")]
    Stats {
        /// Repository path (default: current directory)
        #[arg(long, default_value = ".")]
        repo: PathBuf,
    },
    /// Show the structured diff between two branches
    #[command(
        long_about = "Show the structured diff between two branches.\n\n\
        The diff represents what SOURCE would apply on top of TARGET — the\n\
        pull-request preview direction. Renamed files are detected unless\n\
        disabled in configuration. Missing branches produce an empty diff.\n\n\
        Examples:\n  gitscope diff --repo demo.git feature main\n  gitscope diff --repo demo.git feature main --format json"
    )]
    Diff {
        /// Repository path (default: current directory)
        #[arg(long, default_value = ".")]
        repo: PathBuf,

        /// Branch whose changes are being previewed
        source: String,

        /// Branch the changes would land on
        target: String,
    },
    /// List commits on a branch that are not on another
    #[command(long_about = "List commits reachable from SOURCE but not from TARGET.\n\n\
        This is the \"commits ahead\" set used to summarize an unmerged branch.\n\n\
        Examples:\n  gitscope ahead --repo demo.git feature main")]
    Ahead {
        /// Repository path (default: current directory)
        #[arg(long, default_value = ".")]
        repo: PathBuf,

        /// Branch whose extra commits are listed
        source: String,

        /// Branch providing the baseline history
        target: String,
    },
    /// Create a bare repository
    #[command(long_about = "Create a bare repository at the given path.\n\n\
        Parent directories are created as needed. Fails if the path cannot be\n\
        written.\n\n\
        Example:\n  gitscope init /srv/repos/demo.git")]
    Init {
        /// Path for the new repository
        path: PathBuf,
    },
    /// Generate shell completion scripts
    #[command(hide = true)]
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

#[derive(Clone, PartialEq, Eq, ValueEnum)]
enum ColorChoice {
    /// Auto-detect based on terminal
    Auto,
    /// Always use colors
    Always,
    /// Never use colors
    Never,
}

fn print_welcome() {
    let version = env!("CARGO_PKG_VERSION");
    println!("gitscope v{version} — read-only git repository introspection\n");

    println!("Quick start:");
    println!("  gitscope init /srv/repos/demo.git       Create a bare repository");
    println!("  gitscope log --repo demo.git            Show recent commits");
    println!("  gitscope diff --repo demo.git a b       Structured branch diff\n");

    println!("All commands:");
    println!("  log       Commit history, newest first");
    println!("  branches  Local branch names");
    println!("  stats     Commit/branch counts and on-disk size");
    println!("  diff      Line-level diff between two branches");
    println!("  ahead     Commits on one branch missing from another");
    println!("  init      Create a bare repository\n");

    println!("Run 'gitscope <command> --help' for details.");
}

fn format_timestamp(timestamp: i64) -> String {
    chrono::DateTime::<chrono::Utc>::from_timestamp(timestamp, 0)
        .map(|dt| dt.format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_else(|| timestamp.to_string())
}

fn require_repository(path: &std::path::Path) -> Result<()> {
    if !gitscope_repo::reader::repository_exists(path) {
        miette::bail!(miette::miette!(
            help = "Check the path, or create the repository with 'gitscope init'",
            "Not a git repository: {}",
            path.display()
        ));
    }
    Ok(())
}

fn print_commits(commits: &[CommitInfo], format: OutputFormat, heading: &str) -> Result<()> {
    match format {
        OutputFormat::Json => {
            println!(
                "{}",
                serde_json::to_string_pretty(&commits).into_diagnostic()?
            );
        }
        OutputFormat::Markdown => {
            println!("# {heading}\n");
            if commits.is_empty() {
                println!("No commits.");
            } else {
                println!("| Commit | Date | Author | Message |");
                println!("|--------|------|--------|---------|");
                for c in commits {
                    println!(
                        "| `{}` | {} | {} | {} |",
                        &c.sha[..c.sha.len().min(8)],
                        format_timestamp(c.timestamp),
                        c.author,
                        c.message,
                    );
                }
            }
        }
        OutputFormat::Text => {
            if commits.is_empty() {
                println!("No commits.");
            } else {
                for c in commits {
                    println!(
                        "{}  {}  {:<20} {}",
                        &c.sha[..c.sha.len().min(8)],
                        format_timestamp(c.timestamp),
                        c.author,
                        c.message,
                    );
                }
            }
        }
    }
    Ok(())
}

fn print_diff(result: &DiffResult, format: OutputFormat, use_color: bool) -> Result<()> {
    match format {
        OutputFormat::Json => {
            println!(
                "{}",
                serde_json::to_string_pretty(&result).into_diagnostic()?
            );
        }
        OutputFormat::Markdown => {
            println!("# Branch Diff\n");
            println!(
                "**{} files changed**, +{} / -{}\n",
                result.total_files_changed, result.total_additions, result.total_deletions,
            );
            if !result.files.is_empty() {
                println!("| File | Status | + | - |");
                println!("|------|--------|---|---|");
                for f in &result.files {
                    let name = match &f.old_path {
                        Some(old) => format!("{old} to {}", f.path),
                        None => f.path.clone(),
                    };
                    println!(
                        "| `{name}` | {} | {} | {} |",
                        f.status, f.additions, f.deletions
                    );
                }
                println!();
                for f in &result.files {
                    if f.patch.is_empty() {
                        continue;
                    }
                    println!("## `{}`\n", f.path);
                    println!("```diff");
                    print!("{}", f.patch);
                    println!("```");
                    println!();
                }
            }
        }
        OutputFormat::Text => {
            if result.files.is_empty() {
                println!("No differences.");
                return Ok(());
            }
            println!(
                "{} files changed, +{} -{}",
                result.total_files_changed, result.total_additions, result.total_deletions,
            );
            for f in &result.files {
                println!("{:-<72}", "");
                match &f.old_path {
                    Some(old) => println!(
                        "{}  {} (from {old})  +{} -{}",
                        f.status, f.path, f.additions, f.deletions
                    ),
                    None => println!("{}  {}  +{} -{}", f.status, f.path, f.additions, f.deletions),
                }
                for hunk in &f.hunks {
                    if use_color {
                        println!("\x1b[36m{}\x1b[0m", hunk.header);
                    } else {
                        println!("{}", hunk.header);
                    }
                    for line in &hunk.lines {
                        let rendered = format!("{}{}", line.kind.marker(), line.content);
                        if use_color {
                            match line.kind {
                                DiffLineKind::Addition => println!("\x1b[32m{rendered}\x1b[0m"),
                                DiffLineKind::Deletion => println!("\x1b[31m{rendered}\x1b[0m"),
                                DiffLineKind::Context => println!("{rendered}"),
                            }
                        } else {
                            println!("{rendered}");
                        }
                    }
                }
            }
        }
    }
    Ok(())
}

fn main() -> Result<()> {
    miette::set_hook(Box::new(|_| {
        Box::new(
            miette::MietteHandlerOpts::new()
                .terminal_links(true)
                .build(),
        )
    }))
    .expect("miette handler");
    human_panic::setup_panic!();

    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => ScopeConfig::from_file(path).into_diagnostic()?,
        None => {
            let default_path = std::path::Path::new(".gitscope.toml");
            if default_path.exists() {
                ScopeConfig::from_file(default_path).into_diagnostic()?
            } else {
                ScopeConfig::default()
            }
        }
    };

    let use_color = match cli.color {
        ColorChoice::Always => true,
        ColorChoice::Never => false,
        ColorChoice::Auto => std::io::stdout().is_terminal() && std::env::var("NO_COLOR").is_err(),
    };

    match cli.command {
        None => {
            print_welcome();
        }
        Some(Command::Log { ref repo, limit }) => {
            require_repository(repo)?;
            let limit = limit.unwrap_or(config.log.limit);
            let commits = gitscope_repo::reader::commits(repo, limit);
            print_commits(&commits, cli.format, "Commit History")?;
        }
        Some(Command::Branches { ref repo }) => {
            require_repository(repo)?;
            let branches = gitscope_repo::reader::branches(repo);
            match cli.format {
                OutputFormat::Json => {
                    println!(
                        "{}",
                        serde_json::to_string_pretty(&branches).into_diagnostic()?
                    );
                }
                OutputFormat::Markdown => {
                    println!("# Branches\n");
                    if branches.is_empty() {
                        println!("No branches.");
                    } else {
                        for b in &branches {
                            println!("- `{b}`");
                        }
                    }
                }
                OutputFormat::Text => {
                    if branches.is_empty() {
                        println!("No branches.");
                    } else {
                        for b in &branches {
                            println!("{b}");
                        }
                    }
                }
            }
        }
        Some(Command::Stats { ref repo }) => {
            require_repository(repo)?;
            let stats = gitscope_repo::reader::stats(repo);
            match cli.format {
                OutputFormat::Json => {
                    println!(
                        "{}",
                        serde_json::to_string_pretty(&stats).into_diagnostic()?
                    );
                }
                OutputFormat::Markdown => {
                    println!("# Repository Statistics\n");
                    println!("- **Commits:** {}", stats.commit_count);
                    println!("- **Branches:** {}", stats.branch_count);
                    println!("- **Size:** {} bytes", stats.size_bytes);
                    match stats.last_commit_timestamp {
                        Some(ts) => println!("- **Last commit:** {}", format_timestamp(ts)),
                        None => println!("- **Last commit:** none"),
                    }
                }
                OutputFormat::Text => {
                    println!("Commits:      {}", stats.commit_count);
                    println!("Branches:     {}", stats.branch_count);
                    println!("Size:         {} bytes", stats.size_bytes);
                    match stats.last_commit_timestamp {
                        Some(ts) => println!("Last commit:  {}", format_timestamp(ts)),
                        None => println!("Last commit:  none"),
                    }
                }
            }
        }
        Some(Command::Diff {
            ref repo,
            ref source,
            ref target,
        }) => {
            require_repository(repo)?;
            let result = gitscope_repo::diff::diff_between(repo, source, target, &config.diff);
            print_diff(&result, cli.format, use_color)?;
        }
        Some(Command::Ahead {
            ref repo,
            ref source,
            ref target,
        }) => {
            require_repository(repo)?;
            let commits = gitscope_repo::reader::commits_between(repo, source, target);
            if cli.format == OutputFormat::Text {
                println!("{} commits in {source} not in {target}", commits.len());
            }
            print_commits(&commits, cli.format, "Commits Ahead")?;
        }
        Some(Command::Init { ref path }) => {
            gitscope_repo::reader::try_init_repository(path).map_err(|e| {
                miette::miette!(
                    help = "Check that the path is writable and not an existing file",
                    "Could not create repository at {}: {e}",
                    path.display()
                )
            })?;
            println!("Created bare repository at {}", path.display());
        }
        Some(Command::Completions { shell }) => {
            let mut cmd = Cli::command();
            clap_complete::generate(shell, &mut cmd, "gitscope", &mut std::io::stdout());
        }
    }

    Ok(())
}
