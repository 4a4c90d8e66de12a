//! CLI entry point for guidepost

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "guidepost")]
#[command(version = "0.1.0")]
#[command(about = "A markdown blog pipeline and static site generator", long_about = None)]
struct Cli {
    /// Set the base directory (defaults to current directory)
    #[arg(short, long, global = true)]
    cwd: Option<PathBuf>,

    /// Enable debug output
    #[arg(short, long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a new post scaffold
    New {
        /// Title of the new post
        title: String,
    },

    /// Generate the static site
    #[command(alias = "b")]
    Build {
        /// Ignore the cache and rebuild everything
        #[arg(short, long)]
        force: bool,
    },

    /// Print a rendered post to stdout
    Show {
        /// Slug of the post
        slug: String,
    },

    /// List site information
    List {
        /// Type of content to list (post, tag)
        #[arg(default_value = "post")]
        r#type: String,
    },

    /// Clean the public folder and cache
    Clean,

    /// Display version information
    Version,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.debug {
        "guidepost=debug,info"
    } else {
        "guidepost=info"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Determine base directory
    let base_dir = cli.cwd.unwrap_or_else(|| std::env::current_dir().unwrap());

    match cli.command {
        Commands::New { title } => {
            let blog = guidepost::Blog::new(&base_dir)?;
            tracing::info!("Creating new post: {}", title);
            blog.new_post(&title)?;
        }

        Commands::Build { force } => {
            let blog = guidepost::Blog::new(&base_dir)?;
            tracing::info!("Generating static files...");
            guidepost::commands::build::run(&blog, force)?;
            println!("Generated successfully!");
        }

        Commands::Show { slug } => {
            let blog = guidepost::Blog::new(&base_dir)?;
            guidepost::commands::show::run(&blog, &slug)?;
        }

        Commands::List { r#type } => {
            let blog = guidepost::Blog::new(&base_dir)?;
            guidepost::commands::list::run(&blog, &r#type)?;
        }

        Commands::Clean => {
            let blog = guidepost::Blog::new(&base_dir)?;
            tracing::info!("Cleaning public folder...");
            blog.clean()?;
            println!("Cleaned successfully!");
        }

        Commands::Version => {
            println!("guidepost version {}", env!("CARGO_PKG_VERSION"));
        }
    }

    Ok(())
}
