use actix_web::{web, App, HttpServer};
use clap::Parser;
use olist_briefing::api;
use olist_briefing::config::{Cli, Commands};
use olist_briefing::dashboard::load_dashboard_data;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[actix_web::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();
    let source = cli.data_source()?;
    let economics = cli.economics();

    // Everything is computed once, the server only reads it
    let data = load_dashboard_data(&source, economics).await?;

    match cli.command() {
        Commands::Report { pretty } => {
            let json = if pretty {
                serde_json::to_string_pretty(&data)?
            } else {
                serde_json::to_string(&data)?
            };
            println!("{json}");
        }
        Commands::Serve => {
            let addr = cli.addr;
            let data = web::Data::new(data);
            info!(%addr, "listening on http://{}", addr);

            HttpServer::new(move || {
                App::new()
                    .app_data(data.clone())
                    .configure(api::configure)
                    .service(web::resource("/").route(web::get().to(api::index)))
            })
            .bind(&addr)?
            .run()
            .await?;
        }
    }
    Ok(())
}
