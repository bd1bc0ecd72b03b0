use axum::extract::Extension;
use axum::http::{header, StatusCode};
use axum::response::{Html, IntoResponse};
use axum::routing::get;
use axum::Json;
use axum_prometheus::PrometheusMetricLayer;
use chrono::Local;
use clap::{Args, Parser, Subcommand};
use metrics_exporter_prometheus::PrometheusHandle;
use recruit_ease::config::AppConfig;
use recruit_ease::error::AppError;
use recruit_ease::screening::{
    screen_batch, screening_router, BatchSummary, OpenAiAnalyst, ResumeDataset, ScreeningService,
};
use recruit_ease::telemetry;
use serde_json::json;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::info;

#[derive(Clone)]
struct AppState {
    readiness: Arc<AtomicBool>,
    metrics: Arc<PrometheusHandle>,
}

#[derive(Parser, Debug)]
#[command(
    name = "Recruit Ease",
    about = "Screen candidate resumes against the eligibility rubric with a hosted model",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP service (default command)
    Serve(ServeArgs),
    /// Run one concurrent screening batch over a CSV export and print verdicts
    Screen(ScreenArgs),
}

#[derive(Args, Debug, Default)]
struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    port: Option<u16>,
}

#[derive(Args, Debug)]
struct ScreenArgs {
    /// Resume CSV export with ID and Resume columns
    #[arg(long)]
    csv: PathBuf,
    /// Override the configured batch cutoff for this run
    #[arg(long)]
    limit: Option<usize>,
}

#[tokio::main]
async fn main() {
    if let Err(err) = run_cli().await {
        eprintln!("application error: {err}");
        std::process::exit(1);
    }
}

async fn run_cli() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => run_server(args).await,
        Command::Screen(args) => run_screen(args).await,
    }
}

async fn run_server(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }

    telemetry::init(&config.telemetry)?;

    let api_key = config.screening.require_api_key()?.to_string();
    let analyst = OpenAiAnalyst::new(api_key, config.screening.model.clone())?;
    info!(model = %analyst.model(), "analysis client initialized");

    let dataset = ResumeDataset::from_path(&config.screening.data_path)?;
    info!(
        resumes = dataset.len(),
        path = %config.screening.data_path.display(),
        "resume dataset loaded"
    );

    let service = Arc::new(ScreeningService::new(
        Arc::new(analyst),
        dataset,
        config.screening.batch_limit,
    ));

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let app = screening_router(service)
        .route("/", get(index_page))
        .route("/health", get(healthcheck))
        .route("/ready", get(readiness_endpoint))
        .route("/metrics", get(metrics_endpoint))
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "resume screening service ready");

    axum::serve(listener, app).await?;
    Ok(())
}

async fn run_screen(args: ScreenArgs) -> Result<(), AppError> {
    let config = AppConfig::load()?;

    let api_key = config.screening.require_api_key()?.to_string();
    let analyst = OpenAiAnalyst::new(api_key, config.screening.model.clone())?;

    let dataset = ResumeDataset::from_path(&args.csv)?;
    let limit = args.limit.unwrap_or(config.screening.batch_limit);

    println!(
        "Analysis started at: {}",
        Local::now().format("%Y-%m-%d %H:%M:%S")
    );

    let summary = screen_batch(&analyst, dataset.records(), limit).await;

    render_screening_report(&summary);
    Ok(())
}

fn render_screening_report(summary: &BatchSummary) {
    for outcome in &summary.outcomes {
        println!("----- Resume ID: {} -----", outcome.id);
        for line in &outcome.lines {
            println!("{line}");
        }
        println!();
    }

    println!("Total tokens consumed: {}", summary.total_tokens);
    println!(
        "Analysis completed at: {}",
        Local::now().format("%Y-%m-%d %H:%M:%S")
    );
    println!(
        "Execution time: {:.2} seconds",
        summary.elapsed.as_secs_f64()
    );
}

async fn index_page() -> Html<&'static str> {
    Html(INDEX_HTML)
}

async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}

const INDEX_HTML: &str = r#"<!doctype html>
<html lang="en">
<head>
  <meta charset="utf-8">
  <title>Recruit Ease</title>
  <style>
    body { font-family: sans-serif; max-width: 52rem; margin: 2rem auto; padding: 0 1rem; }
    button { padding: 0.5rem 1.25rem; font-size: 1rem; }
    .resume { border-top: 1px solid #ccc; padding: 0.75rem 0; }
    .stats { color: #555; margin: 1rem 0; }
  </style>
</head>
<body>
  <h1>Recruit Ease</h1>
  <button id="run">Analyze Resumes</button>
  <div class="stats" id="stats"></div>
  <div id="results"></div>
  <script>
    const button = document.getElementById('run');
    button.addEventListener('click', async () => {
      button.disabled = true;
      document.getElementById('stats').textContent = 'Analyzing resumes...';
      document.getElementById('results').innerHTML = '';
      try {
        const response = await fetch('/api/v1/screening/run', {
          method: 'POST',
          headers: { 'Content-Type': 'application/json' },
          body: '{}',
        });
        if (!response.ok) {
          const failure = await response.json();
          document.getElementById('stats').textContent = 'Error: ' + failure.error;
          return;
        }
        const run = await response.json();
        document.getElementById('stats').textContent =
          'Total tokens consumed: ' + run.total_tokens +
          ' | Execution time: ' + run.elapsed_seconds.toFixed(2) + ' seconds';
        for (const outcome of run.outcomes) {
          const block = document.createElement('div');
          block.className = 'resume';
          const title = document.createElement('h3');
          title.textContent = '----- Resume ID: ' + outcome.id + ' -----';
          block.appendChild(title);
          for (const line of outcome.lines) {
            const p = document.createElement('p');
            p.textContent = line;
            block.appendChild(p);
          }
          document.getElementById('results').appendChild(block);
        }
      } finally {
        button.disabled = false;
      }
    });
  </script>
</body>
</html>
"#;
