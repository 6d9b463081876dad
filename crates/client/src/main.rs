use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, anyhow};
use clap::{Parser, Subcommand};

use shopdesk_auth::{
    Action, GuardOutcome, Navigator, Permission, PrincipalId, Resource, View,
    explain_authorization,
};
use shopdesk_client::{AppContext, ClientConfig, LoginResponse};

#[derive(Parser)]
#[command(name = "shopdesk", about = "Inspect and drive the shopdesk client session")]
struct Cli {
    /// Session file (overrides SHOPDESK_SESSION_FILE).
    #[arg(long, global = true)]
    session_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Store a credential issued by the authentication service.
    Login {
        /// The access token as returned by the service.
        token: String,
    },

    /// End the current session.
    Logout,

    /// Show the locally resolved principal.
    Whoami,

    /// Run the navigation guard for a view path (e.g. "clients").
    Open { path: String },

    /// Explain whether the current principal may perform an action.
    Can {
        /// view, view_all, create, edit or delete.
        action: Action,

        /// clients, products, orders or order_items.
        resource: Resource,

        /// Owner id of the targeted record, for own-record rules.
        #[arg(long)]
        owner: Option<i64>,
    },

    /// Print the configured service endpoints.
    Endpoints,
}

/// Prints redirects instead of performing them.
struct StdoutNavigator;

impl Navigator for StdoutNavigator {
    fn navigate(&mut self, to: View) {
        println!("-> {to}");
    }
}

fn main() -> ExitCode {
    shopdesk_observability::init_with_default("warn");

    let cli = Cli::parse();
    match run(cli) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> anyhow::Result<ExitCode> {
    let mut config = ClientConfig::from_env();
    if let Some(path) = cli.session_file {
        config.session_file = path;
    }
    let app = AppContext::init(&config);

    match cli.command {
        Command::Login { token } => {
            let landing = app
                .complete_login(&LoginResponse::new(token))
                .context("failed to store credential")?;
            println!("logged in; landing view {landing}");
        }
        Command::Logout => {
            app.logout(&mut StdoutNavigator)
                .context("failed to clear session")?;
        }
        Command::Whoami => {
            let report = serde_json::json!({
                "has_session": app.identity().has_session(),
                "principal": app.identity().current_principal(),
                "admin": app.identity().is_admin(),
            });
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        Command::Open { path } => {
            let view = View::from_path(&path).ok_or_else(|| anyhow!("no view at path '{path}'"))?;
            return Ok(match app.guard().check_view(view) {
                GuardOutcome::Allow => {
                    println!("allowed {view}");
                    ExitCode::SUCCESS
                }
                GuardOutcome::Redirect { to, reason } => {
                    println!("denied {view} ({reason}); redirect to {to}");
                    ExitCode::from(2)
                }
            });
        }
        Command::Can { action, resource, owner } => {
            let principal = app.identity().current_principal();
            let explanation = explain_authorization(
                principal.as_ref(),
                Permission::new(resource, action),
                owner.map(PrincipalId::new),
            );
            println!("{}", serde_json::to_string_pretty(&explanation)?);
            if !explanation.granted {
                return Ok(ExitCode::from(2));
            }
        }
        Command::Endpoints => {
            println!("login     {}", config.login_url());
            for resource in Resource::ALL {
                println!("{:<9} {}", resource.as_str(), config.resource_url(resource));
            }
        }
    }

    Ok(ExitCode::SUCCESS)
}
