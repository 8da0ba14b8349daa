use clap::{Parser, Subcommand};
use comfy_table::{presets, Cell, Color, ContentArrangement, Table};
use console::{Style, Term};
use llm_costs_core::{
    error::CostsError,
    fetch,
    resolve::{resolve_and_cost, CostResult, ResolveError},
    store,
};

// ── Palette ──────────────────────────────────────────────────────────

fn s_header() -> Style { Style::new().color256(252).bold() }  // bright gray, bold
fn s_dim() -> Style    { Style::new().color256(248) }         // light gray
fn s_tree() -> Style   { Style::new().color256(245) }         // mid gray
fn s_hint() -> Style   { Style::new().color256(243) }         // soft gray
fn s_hot() -> Style    { Style::new().color256(114) }         // green
fn s_warm() -> Style   { Style::new().color256(214) }         // amber
fn s_err() -> Style    { Style::new().color256(167) }         // red
fn s_price() -> Style  { Style::new().color256(109) }         // teal
fn s_bold() -> Style   { Style::new().bold() }
fn s_label() -> Style  { Style::new().color256(146) }         // muted lavender

fn sep(width: usize) -> String {
    s_tree().apply_to("\u{2500}".repeat(width)).to_string()
}

const DASH: &str = "\u{2500}";

/// Per-1K prices as the table showed them: shortest faithful form.
fn fmt_price(v: Option<f64>) -> String {
    match v {
        Some(p) => format!("${p}"),
        None => DASH.to_string(),
    }
}

fn fmt_cost(v: f64) -> String {
    if v >= 1.0 {
        format!("${:.2}", v)
    } else {
        format!("${v}")
    }
}

// ── CLI Args ─────────────────────────────────────────────────────────

#[derive(Parser)]
#[command(
    name = "llm-costs",
    about = "Estimate LLM API costs from scraped pricing tables",
    version,
    after_help = "examples:\n  \
        llm-costs \"jurassic-2 ultra\" -i 100                 (100 input tokens, one request)\n  \
        llm-costs \"claude 3.5 sonet\" -i 2000 -o 1000 -n 50  (typos are fine)\n  \
        llm-costs \"claude 3 haiku\" -i 500 -o 500 --json\n  \
        llm-costs models                                     (what the snapshot knows)\n  \
        llm-costs sync                                       (refresh from the pricing page)"
)]
struct Cli {
    /// Model name to price, fuzzy-matched against the snapshot.
    query: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,

    /// Input tokens per request.
    #[arg(long = "input-tokens", short = 'i', default_value_t = 0, allow_negative_numbers = true)]
    input_tokens: i64,

    /// Output tokens per request.
    #[arg(long = "output-tokens", short = 'o', default_value_t = 0, allow_negative_numbers = true)]
    output_tokens: i64,

    /// Number of requests.
    #[arg(long, short = 'n', default_value_t = 1, allow_negative_numbers = true)]
    requests: i64,

    #[arg(long, short)]
    json: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// List the models in the current pricing snapshot.
    Models,
    /// Refresh the snapshot from the pricing page.
    Sync {
        #[arg(long, default_value = fetch::PRICING_URL)]
        url: String,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Models) => cmd_models(),
        Some(Commands::Sync { ref url }) => cmd_sync(url).await,
        None => match cli.query {
            Some(ref query) => cmd_quote(query, &cli),
            None => cmd_models(),
        },
    }
}

// ── Quote ────────────────────────────────────────────────────────────

fn cmd_quote(query: &str, cli: &Cli) -> anyhow::Result<()> {
    let records = store::load_cached()?;

    let result = match resolve_and_cost(
        query,
        cli.input_tokens,
        cli.output_tokens,
        cli.requests,
        &records,
    ) {
        Ok(result) => result,
        Err(err) => {
            print_resolve_error(&err);
            return Ok(());
        }
    };

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&result)?);
        return Ok(());
    }
    print_quote(&result, cli);
    Ok(())
}

fn print_quote(result: &CostResult, cli: &Cli) {
    let r = &result.record;

    println!();
    println!(
        "{}  {}  {}",
        s_bold().apply_to(&result.model_id),
        s_label().apply_to(&r.provider),
        s_dim().apply_to(&r.region),
    );
    let match_note = if result.confidence == 100 {
        "exact match".to_string()
    } else {
        format!("matched at {}/100", result.confidence)
    };
    println!("{}", s_dim().apply_to(match_note));
    println!("{}", sep(64));

    let mut table = Table::new();
    table.load_preset(presets::NOTHING);
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec![
        Cell::new("  ").fg(Color::AnsiValue(243)),
        Cell::new("Tokens").fg(Color::AnsiValue(243)),
        Cell::new("$/1K").fg(Color::AnsiValue(243)),
        Cell::new("Cost").fg(Color::AnsiValue(243)),
    ]);
    table.add_row(vec![
        Cell::new("  input").fg(Color::AnsiValue(252)),
        Cell::new(cli.input_tokens).fg(Color::AnsiValue(248)),
        Cell::new(fmt_price(r.input_price)).fg(Color::AnsiValue(109)),
        Cell::new(fmt_cost(result.input_cost)).fg(Color::AnsiValue(109)),
    ]);
    table.add_row(vec![
        Cell::new("  output").fg(Color::AnsiValue(252)),
        Cell::new(cli.output_tokens).fg(Color::AnsiValue(248)),
        Cell::new(fmt_price(r.output_price)).fg(Color::AnsiValue(109)),
        Cell::new(fmt_cost(result.output_cost)).fg(Color::AnsiValue(109)),
    ]);
    table.add_row(vec![
        Cell::new("  total").fg(Color::AnsiValue(252)).add_attribute(comfy_table::Attribute::Bold),
        Cell::new(""),
        Cell::new(""),
        Cell::new(fmt_cost(result.total_cost))
            .fg(Color::AnsiValue(114))
            .add_attribute(comfy_table::Attribute::Bold),
    ]);
    println!("{table}");

    // Secondary per-1K prices, when the source table had them.
    let extras: Vec<String> = [
        ("batch in", r.batch_input_price),
        ("batch out", r.batch_output_price),
        ("cache write", r.cache_write_price),
        ("cache read", r.cache_read_price),
    ]
    .iter()
    .filter_map(|(label, price)| price.map(|p| format!("{label} ${p}")))
    .collect();
    if !extras.is_empty() {
        println!();
        println!(
            "  {}",
            s_price().apply_to(extras.join(&format!("  {}  ", s_tree().apply_to("\u{00b7}"))))
        );
    }

    println!("{}", sep(64));
    println!(
        "{}",
        s_hint().apply_to(format!(
            "  {} request{}   prices {}",
            cli.requests,
            if cli.requests == 1 { "" } else { "s" },
            r.unit,
        ))
    );
    println!();
}

fn print_resolve_error(err: &ResolveError) {
    match err {
        ResolveError::NoMatch { query, best_score } => {
            eprintln!(
                "{}",
                s_err().apply_to(format!(
                    "error: no model matching '{query}' (best fuzzy score {best_score}/100)"
                ))
            );
            eprintln!();
            eprintln!(
                "{}",
                s_dim().apply_to("  Names come from the pricing snapshot; list them with: llm-costs models")
            );
        }
        ResolveError::PricingUnavailable { model_id, kind } => {
            eprintln!(
                "{}",
                s_err().apply_to(format!(
                    "error: '{model_id}' has no {kind}-token price in the current snapshot"
                ))
            );
            eprintln!();
            eprintln!(
                "{}",
                s_dim().apply_to("  The source table had no parsable cell for it; a newer page might: llm-costs sync")
            );
        }
        ResolveError::InvalidInput(reason) => {
            eprintln!("{}", s_err().apply_to(format!("error: {reason}")));
        }
    }
}

// ── Models ───────────────────────────────────────────────────────────

fn cmd_models() -> anyhow::Result<()> {
    let records = store::load_cached()?;

    println!();
    println!("{}", s_header().apply_to("pricing snapshot"));
    println!("{}", sep(72));

    let mut table = Table::new();
    table.load_preset(presets::NOTHING);
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec![
        Cell::new("  Model").fg(Color::AnsiValue(243)),
        Cell::new("Provider").fg(Color::AnsiValue(243)),
        Cell::new("Region").fg(Color::AnsiValue(243)),
        Cell::new("In $/1K").fg(Color::AnsiValue(243)),
        Cell::new("Out $/1K").fg(Color::AnsiValue(243)),
    ]);

    for (model_id, record) in records.iter() {
        let note = if record.has_pricing() { "" } else { "  (no pricing)" };
        table.add_row(vec![
            Cell::new(format!("  {model_id}{note}")).fg(Color::AnsiValue(252)),
            Cell::new(&record.provider).fg(Color::AnsiValue(146)),
            Cell::new(&record.region).fg(Color::AnsiValue(248)),
            Cell::new(fmt_price(record.input_price)).fg(Color::AnsiValue(109)),
            Cell::new(fmt_price(record.output_price)).fg(Color::AnsiValue(109)),
        ]);
    }
    println!("{table}");

    println!("{}", sep(72));
    println!(
        "{}",
        s_hint().apply_to(format!(
            "  {} models   llm-costs \"<model>\" -i 1000 -o 500 for a quote",
            records.len()
        ))
    );
    println!();
    Ok(())
}

// ── Sync ─────────────────────────────────────────────────────────────

async fn cmd_sync(url: &str) -> anyhow::Result<()> {
    let term = Term::stderr();
    term.write_line(&format!("{}", s_dim().apply_to("downloading pricing page...")))?;

    let outcome = match fetch::refresh(url).await {
        Ok(outcome) => outcome,
        Err(CostsError::LayoutDrift { tables_seen }) => {
            term.clear_last_lines(1)?;
            println!();
            println!(
                "  {}",
                s_warm().apply_to(format!(
                    "no pricing tables recognized ({tables_seen} tables seen)"
                ))
            );
            println!(
                "  {}",
                s_dim().apply_to("the page layout may have changed; the previous snapshot was kept")
            );
            println!();
            return Ok(());
        }
        Err(err) => return Err(err.into()),
    };

    term.clear_last_lines(1)?;
    let ex = &outcome.extraction;
    let now = chrono::Local::now().format("%Y-%m-%d %H:%M:%S");

    println!();
    println!("  {}", s_hot().apply_to("synced"));
    println!(
        "  {}",
        s_dim().apply_to(format!(
            "{} models from {} of {} tables   {} rows skipped   {}",
            ex.records.len(),
            ex.tables_classified,
            ex.tables_seen,
            ex.rows_skipped,
            now,
        ))
    );
    if let Some(ref path) = outcome.saved_to {
        println!("  {}", s_hint().apply_to(format!("cached in {}", path.display())));
    }
    println!();
    Ok(())
}
