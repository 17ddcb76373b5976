use training_portal::{compile, AppConfig, SqliteStore};

fn usage_and_exit() -> ! {
    eprintln!(
        "Usage: cargo run --bin preflight\n\
         \n\
         Optional env vars:\n\
           DATABASE_URL, DB_MAX_CONNECTIONS, FORMS_CONFIG, BIND_ADDR\n"
    );
    std::process::exit(2);
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .try_init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    if args.iter().any(|a| a == "-h" || a == "--help") {
        usage_and_exit();
    }

    let config = AppConfig::from_env()?;
    println!("> Preflight:");
    println!("  DATABASE_URL={}", config.database_url);
    println!("  BIND_ADDR={}", config.bind_addr);
    match &config.forms_config {
        Some(p) => println!("  FORMS_CONFIG={}", p.display()),
        None => println!("  FORMS_CONFIG=<built-in catalog>"),
    }

    let registry = config.load_registry()?;
    let store = SqliteStore::connect(&config.database_url, config.max_connections).await?;
    store.ping().await?;
    compile(&registry, &store).await?;

    let tables = store.describe_tables().await?;
    for form in registry.forms() {
        let rows = store.count_rows(form.table_name()).await?;
        let layout = tables
            .iter()
            .find(|t| t.table_name.eq_ignore_ascii_case(form.table_name()))
            .map(|t| {
                t.columns
                    .iter()
                    .map(|c| format!("{} {}", c.name, c.data_type))
                    .collect::<Vec<_>>()
                    .join(", ")
            })
            .unwrap_or_default();
        println!("  {} -> {} ({} rows): {}", form.name(), form.table_name(), rows, layout);
    }

    println!("> Preflight OK.");
    Ok(())
}
