use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use playlist_organizer::menu::{build_menu, run_menu_loop, DialoguerChooser, Shell, TableRenderer};
use playlist_organizer::{
    Config, DeezerClient, Platform, PlaylistSource, SpotifyClient, TrackMatcher,
};

#[derive(Parser)]
#[command(name = "playlist-organizer")]
#[command(about = "Compare and reconcile Deezer and Spotify playlists")]
#[command(version)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Log level, takes precedence over --verbose
    #[arg(long, global = true, value_enum)]
    log_level: Option<LogLevel>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Clone, Copy, ValueEnum)]
enum LogLevel {
    Debug,
    Info,
    Warn,
    Error,
}

impl LogLevel {
    fn as_filter(self) -> &'static str {
        match self {
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum PlatformArg {
    Deezer,
    Spotify,
}

#[derive(Subcommand)]
enum Commands {
    /// Interactive menu (default)
    Menu {
        /// Maximum edit distance between normalized titles
        #[arg(long)]
        threshold: Option<usize>,

        /// Character budget per table cell
        #[arg(long)]
        width: Option<usize>,
    },

    /// Match a Deezer playlist against a Spotify playlist
    Match {
        /// Deezer playlist name
        #[arg(long)]
        deezer: String,

        /// Spotify playlist name
        #[arg(long)]
        spotify: String,

        /// Maximum edit distance between normalized titles
        #[arg(long)]
        threshold: Option<usize>,

        /// Character budget per table cell
        #[arg(long)]
        width: Option<usize>,

        /// Print the match result as JSON instead of tables
        #[arg(long)]
        json: bool,
    },

    /// List your playlists on one platform
    ListPlaylists {
        #[arg(long, value_enum)]
        platform: PlatformArg,
    },

    /// Show setup guide
    Setup,
}

fn setup_tracing(verbose: bool, log_level: Option<LogLevel>) {
    let level = match (log_level, verbose) {
        (Some(level), _) => level.as_filter(),
        (None, true) => "debug",
        (None, false) => "info",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    setup_tracing(cli.verbose, cli.log_level);

    match cli.command.unwrap_or(Commands::Menu {
        threshold: None,
        width: None,
    }) {
        Commands::Menu { threshold, width } => {
            run_menu(threshold, width).await?;
        }
        Commands::Match {
            deezer,
            spotify,
            threshold,
            width,
            json,
        } => {
            match_playlists(&deezer, &spotify, threshold, width, json).await?;
        }
        Commands::ListPlaylists { platform } => {
            list_playlists(platform).await?;
        }
        Commands::Setup => {
            show_setup_guide();
        }
    }

    Ok(())
}

fn load_config() -> Result<Config> {
    let config = Config::from_env().context("Failed to load configuration")?;

    let missing = config.get_missing_config();
    if !missing.is_empty() {
        println!("{}", "Missing configuration:".red());
        for item in &missing {
            println!("   - {}", item);
        }
        println!(
            "\n{}",
            "Run `playlist-organizer setup` to see how to fill in your credentials.".yellow()
        );
        std::process::exit(1);
    }

    Ok(config)
}

async fn run_menu(threshold: Option<usize>, width: Option<usize>) -> Result<()> {
    let config = load_config()?;

    let deezer = DeezerClient::new(&config).context("Failed to set up Deezer client")?;
    let spotify = SpotifyClient::new(&config).context("Failed to set up Spotify client")?;
    let matcher = TrackMatcher::new(threshold.unwrap_or(config.match_threshold));
    let renderer = TableRenderer::new(width.unwrap_or(config.display_width));

    let chooser = DialoguerChooser::default();
    let mut shell = Shell::new(&chooser, deezer, spotify, matcher, renderer);
    let menu = build_menu(Platform::Deezer, Platform::Spotify);

    run_menu_loop(&menu, &chooser, &mut shell)
        .await
        .context("Menu stopped")?;

    Ok(())
}

async fn match_playlists(
    deezer_name: &str,
    spotify_name: &str,
    threshold: Option<usize>,
    width: Option<usize>,
    json: bool,
) -> Result<()> {
    let config = load_config()?;

    let mut deezer = DeezerClient::new(&config).context("Failed to set up Deezer client")?;
    let mut spotify = SpotifyClient::new(&config).context("Failed to set up Spotify client")?;

    let deezer_tracks = deezer
        .get_playlist_tracks(deezer_name)
        .await
        .context("Failed to fetch Deezer playlist")?;
    let spotify_tracks = spotify
        .get_playlist_tracks(spotify_name)
        .await
        .context("Failed to fetch Spotify playlist")?;

    let matcher = TrackMatcher::new(threshold.unwrap_or(config.match_threshold));
    let result = matcher.match_named(
        &format!("Deezer: {}", deezer_name),
        &deezer_tracks,
        &format!("Spotify: {}", spotify_name),
        &spotify_tracks,
    );

    if json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        TableRenderer::new(width.unwrap_or(config.display_width)).print_matches(&result);
    }

    Ok(())
}

async fn list_playlists(platform: PlatformArg) -> Result<()> {
    let config = Config::from_env().context("Failed to load configuration")?;

    match platform {
        PlatformArg::Deezer => {
            let mut client = DeezerClient::new(&config)?;
            print_playlists(&mut client).await
        }
        PlatformArg::Spotify => {
            let mut client = SpotifyClient::new(&config)?;
            print_playlists(&mut client).await
        }
    }
}

async fn print_playlists<S: PlaylistSource>(source: &mut S) -> Result<()> {
    println!("{}", format!("Your {} Playlists", source.platform()).cyan().bold());
    println!("{}", "=".repeat(50));

    let names = source
        .get_playlist_names()
        .await
        .context("Failed to fetch playlists")?;

    if names.is_empty() {
        println!("{}", "No playlists found".yellow());
        return Ok(());
    }

    for (i, name) in names.iter().enumerate() {
        println!("{:2}. {}", i + 1, name.green());
    }

    println!("\n{}", format!("Total: {} playlists", names.len()).cyan());

    Ok(())
}

fn show_setup_guide() {
    println!("{}", "Playlist Organizer Setup Guide".cyan().bold());
    println!("{}", "=".repeat(50));

    println!("\n{}", "1. Spotify API Setup".yellow());
    println!("   - Go to https://developer.spotify.com/dashboard/");
    println!("   - Create a new app");
    println!("   - Copy your Client ID and Client Secret");
    println!("   - Add 'http://localhost:8000' as a redirect URI");

    println!("\n{}", "2. Deezer API Setup".yellow());
    println!("   - Go to https://developers.deezer.com/myapps");
    println!("   - Create a new application");
    println!("   - Copy your Application ID and Secret Key");
    println!("   - Set 'http://localhost:8912' as the redirect URL");

    println!("\n{}", "3. Configuration".yellow());
    println!("   - Create a .env file with:");
    println!("     SPOTIFY_CLIENT_ID=your_spotify_client_id");
    println!("     SPOTIFY_CLIENT_SECRET=your_spotify_client_secret");
    println!("     SPOTIFY_REDIRECT_URI=http://localhost:8000");
    println!("     DEEZER_APP_ID=your_deezer_app_id");
    println!("     DEEZER_SECRET_KEY=your_deezer_secret_key");
    println!("     DEEZER_REDIRECT_URI=http://localhost:8912");
    println!("   - Optional: MATCH_THRESHOLD=3, DISPLAY_WIDTH=93");

    println!("\n{}", "4. Usage".yellow());
    println!("   - playlist-organizer                                    (interactive menu)");
    println!("   - playlist-organizer list-playlists --platform deezer   (to see your playlists)");
    println!("   - playlist-organizer match --deezer \"Rock\" --spotify \"Rock\"");

    println!("\n{}", "Ready to start organizing!".green());
}
