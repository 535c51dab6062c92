use clap::{Parser, Subcommand};
use uuid::Uuid;

#[derive(Debug, Parser)]
#[command(name = "leadlens-cli")]
#[command(about = "LeadLens command line interface")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Scrape, analyze, and persist a website as a new lead.
    Analyze { url: String },
    /// Re-run search enrichment for an existing lead.
    Enrich { lead_id: Uuid },
    /// List stored leads, newest first.
    Leads {
        #[arg(long, default_value_t = 20)]
        limit: i64,
    },
    /// Print aggregate lead and webhook delivery stats.
    Stats,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    let config = leadlens_core::load_app_config()?;
    let pool = leadlens_db::connect_pool(
        &config.database_url,
        leadlens_db::PoolConfig::from_app_config(&config),
    )
    .await?;
    leadlens_db::run_migrations(&pool).await?;

    match cli.command {
        Commands::Analyze { url } => {
            let pipeline = leadlens_pipeline::Pipeline::from_config(&config)?;
            let lead = pipeline.analyze(&pool, None, &url).await?;
            print_lead(&lead);
        }
        Commands::Enrich { lead_id } => {
            let pipeline = leadlens_pipeline::Pipeline::from_config(&config)?;
            let lead = pipeline.enrich(&pool, None, lead_id).await?;
            print_lead(&lead);
        }
        Commands::Leads { limit } => {
            let filter = leadlens_db::LeadFilter {
                limit: limit.clamp(1, 200),
                page: 1,
                ..leadlens_db::LeadFilter::default()
            };
            let rows = leadlens_db::list_leads(&pool, &filter).await?;
            if rows.is_empty() {
                println!("no leads stored yet");
            }
            for row in rows {
                println!(
                    "{}  {:<30}  score {:>4.1}  {}",
                    row.id, row.company_name, row.lead_score, row.url
                );
            }
        }
        Commands::Stats => {
            let leads = leadlens_db::lead_stats(&pool, None).await?;
            let webhooks = leadlens_db::webhook_stats(&pool).await?;
            println!("leads:          {}", leads.total);
            println!(
                "average score:  {}",
                leads
                    .avg_score
                    .map_or_else(|| "n/a".to_string(), |avg| format!("{avg:.1}"))
            );
            println!("high-score:     {}", leads.high_score_count);
            println!(
                "webhooks:       {} sent ({} ok, {} failed)",
                webhooks.total, webhooks.success_count, webhooks.failed_count
            );
        }
    }

    Ok(())
}

fn print_lead(lead: &leadlens_db::LeadRow) {
    println!("id:          {}", lead.id);
    println!("company:     {}", lead.company_name);
    println!("industry:    {}", lead.industry);
    println!("size:        {}", lead.company_size);
    println!("location:    {}", lead.location);
    println!("score:       {:.1}", lead.lead_score);
    println!("url:         {}", lead.url);
    if !lead.emails.is_empty() {
        println!("emails:      {}", lead.emails.join(", "));
    }
    if !lead.phones.is_empty() {
        println!("phones:      {}", lead.phones.join(", "));
    }
    if !lead.social_links.is_empty() {
        println!("social:      {}", lead.social_links.join(", "));
    }
    for person in &lead.key_people.0 {
        println!("key person:  {} ({})", person.name, person.role);
    }
    println!("summary:     {}", lead.summary);
}
