use clap::Parser;
use galaxy::cli::{
    handle_about, handle_attachment, handle_changes, handle_comment, handle_export, handle_init,
    handle_login, handle_logout, handle_profile, handle_project, handle_resource, handle_review,
    handle_user, handle_whoami, Cli, Commands,
};
use galaxy::GalaxyConfig;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

fn init_logging(config: &GalaxyConfig) {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn main() {
    let config = GalaxyConfig::from_env();
    init_logging(&config);

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Init => handle_init(),
        Commands::Project(action) => handle_project(action),
        Commands::Resource(action) => handle_resource(action),
        Commands::Review(action) => handle_review(action),
        Commands::User(action) => handle_user(action),
        Commands::Comment(action) => handle_comment(action),
        Commands::Attachment(action) => handle_attachment(action),
        Commands::About(action) => handle_about(action),
        Commands::Login { user_id, password } => handle_login(user_id, password),
        Commands::Logout => handle_logout(),
        Commands::Whoami { json } => handle_whoami(json),
        Commands::Profile(args) => handle_profile(args),
        Commands::Changes { entity, json } => handle_changes(entity, json),
        Commands::Export { out } => handle_export(&out),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
