//! Demo entry point: boots the data core in mock mode and walks the main
//! flows (login, client CRUD, stats, dashboard, settings).

use std::sync::Arc;

use opsdesk::client::{ApiClient, ListFilters};
use opsdesk::gateway::{build_gateway, GatewayConfig};
use opsdesk::resources::clients::{client_stats, clients_store};
use opsdesk::resources::dashboard::DashboardStore;
use opsdesk::settings::{FileSettingsStore, SettingsManager};
use opsdesk::store::cache::QueryCache;
use opsdesk::store::notify::LogNotifier;
use opsdesk::token_store::FileTokenStore;
use opsdesk::types::{Client, ClientStatus};

#[tokio::main]
async fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = GatewayConfig::from_env();
    log::info!("Starting opsdesk demo ({:?} mode)", config.mode());

    let tokens = Arc::new(FileTokenStore::new());
    let gateway = build_gateway(&config, tokens.clone());
    let api = Arc::new(ApiClient::new(gateway, tokens));
    let cache = Arc::new(QueryCache::new());

    let session = match api.login("admin@opsdesk.example", "demo").await {
        Ok(session) => session,
        Err(e) => {
            log::error!("Login failed: {}", e);
            return;
        }
    };
    println!("Signed in as {} <{}>", session.user.name, session.user.email);

    let clients = clients_store(Arc::clone(&api), Arc::clone(&cache), Arc::new(LogNotifier));

    match clients.list(&ListFilters::default()).await {
        Ok(page) => {
            println!("\nClients ({} total):", page.total);
            for client in &page.data {
                println!(
                    "  {:<20} {:<12} {:?}",
                    client.client_name, client.client_contact, client.status
                );
            }
            let stats = client_stats(&page.data);
            println!(
                "  -> {} active / {} inactive",
                stats.active, stats.inactive
            );
        }
        Err(e) => log::error!("Failed to list clients: {}", e),
    }

    let draft = Client {
        id: String::new(),
        client_name: "Mehta Ceramics".into(),
        client_contact: "9870012345".into(),
        client_email: "hello@mehtaceramics.example".into(),
        address: "41 Ring Road, Surat".into(),
        gst: "24VWXYZ7890A1Z3".into(),
        pan: "VWXYZ7890A".into(),
        status: ClientStatus::Active,
        entry_date: chrono::Local::now().format("%Y-%m-%d").to_string(),
    };
    match clients.create(draft).await {
        Ok(created) => println!("\nOnboarded new client {} ({})", created.client_name, created.id),
        Err(e) => log::error!("Failed to onboard client: {}", e),
    }

    let dashboard = DashboardStore::new(Arc::clone(&api), Arc::clone(&cache));
    match dashboard.summary().await {
        Ok(summary) => {
            println!(
                "\nDashboard: {} clients, {} orders ({} pending), revenue {:.2}, outstanding {:.2}",
                summary.total_clients,
                summary.total_orders,
                summary.pending_orders,
                summary.total_revenue,
                summary.outstanding_balance
            );
        }
        Err(e) => log::error!("Failed to load dashboard: {}", e),
    }

    let settings = SettingsManager::new(FileSettingsStore::new());
    println!(
        "\nCompany: {} ({} / {})",
        settings.settings().general.company_name,
        settings.settings().general.currency,
        settings.settings().general.timezone
    );
    let violations = settings.validate_settings();
    if violations.is_empty() {
        println!("Settings valid");
    } else {
        for violation in violations {
            println!("Settings issue: {}", violation);
        }
    }

    cache.sweep();
}
