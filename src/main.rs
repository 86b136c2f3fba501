use crate::advisor::Advisor;
use crate::appraisal::{AppraisalClient, GeminiClient, RetryPolicy};
use crate::config::AppConfig;
use crate::db::connection::{init_db, Database};
use crate::evidence::EvidenceVault;
use crate::geocode::{AddressResolver, NominatimClient, RegionProfile};
use crate::router::handle;
use crate::state::App;
use astra::Server;
use std::net::SocketAddr;
use std::sync::Arc;

mod advisor;
mod appraisal;
mod config;
mod db;
mod domain;
mod errors;
mod evidence;
mod geocode;
mod responses;
mod router;
mod spreadsheets;
mod state;
mod templates;

#[cfg(test)]
mod tests;

fn main() {
    dotenv::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .compact()
        .init();

    let config = AppConfig::from_env();

    // 1️⃣ Create the database handle
    let db = Database::new(config.database_path.clone());

    // 2️⃣ Initialize database from the bundled schema
    if let Err(e) = init_db(&db, include_str!("../sql/schema.sql")) {
        eprintln!("❌ Database initialization failed: {e}");
        std::process::exit(1);
    }

    // 3️⃣ Wire up the outside world: geocoder, model backend, evidence vault
    let geocoder = match NominatimClient::new(config.nominatim_url.clone()) {
        Ok(client) => client,
        Err(e) => {
            eprintln!("❌ Geocoder setup failed: {e}");
            std::process::exit(1);
        }
    };
    let resolver = AddressResolver::new(Box::new(geocoder), RegionProfile::kyotango());

    let gemini = Arc::new(GeminiClient::new(
        config.gemini_api_key.clone(),
        config.gemini_model.clone(),
        config.gemini_url.clone(),
    ));
    let appraiser = AppraisalClient::new(gemini.clone(), RetryPolicy::default());
    let advisor = Advisor::new(gemini);

    let vault = EvidenceVault::new(config.evidence_dir.clone());

    let addr: SocketAddr = match format!("{}:{}", config.server_host, config.server_port).parse() {
        Ok(addr) => addr,
        Err(e) => {
            eprintln!("❌ Bad server address: {e}");
            std::process::exit(1);
        }
    };

    let app = App::new(db, config, resolver, appraiser, advisor, vault);

    // 4️⃣ Start the server
    println!("Starting server at http://{addr}");
    let server = Server::bind(&addr).max_workers(8);

    // 5️⃣ Serve requests, passing the app state into the closure
    let result = server.serve(move |req, _info| match handle(req, &app) {
        Ok(resp) => resp,
        Err(err) => {
            tracing::warn!("request failed: {err}");
            templates::html_error_response(err)
        }
    });

    if let Err(e) = result {
        eprintln!("Server ended with error: {e}");
    }

    println!("Server shut down cleanly.");
}
