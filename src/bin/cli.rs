use clap::Parser;
use hexmap::preview::{PreviewOptions, save_json, save_preview_png};
use hexmap::{BiomeSkins, MapConfig, generate_map};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use std::path::PathBuf;
use std::time::Instant;
use tracing_subscriber::EnvFilter;

/// Генератор гексагональных карт
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Путь к конфигурационному файлу в формате TOML (без него — карта радиуса 100 со 100 городами)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Путь для сохранения превью
    #[arg(short, long, default_value = "map.png")]
    output: PathBuf,

    /// Путь для сохранения карты в JSON
    #[arg(long)]
    json: Option<PathBuf>,

    /// Сид карты из [0, 1) (перекрывает конфигурацию)
    #[arg(long)]
    seed: Option<f64>,

    /// Радиус карты (перекрывает конфигурацию)
    #[arg(long)]
    radius: Option<i32>,

    /// Число городов (перекрывает конфигурацию)
    #[arg(long)]
    towns: Option<usize>,

    /// Оставить только центральный остров
    #[arg(long)]
    single_island: bool,

    /// Сид ГСЧ для подбора сида карты (по умолчанию — из энтропии ОС)
    #[arg(long)]
    search_seed: Option<u64>,

    /// Радиус гекса в пикселях для превью
    #[arg(long, default_value_t = 6.0)]
    cell_size: f32,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(env_filter).with_target(true).init();

    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => {
            tracing::info!(?path, "loading config");
            MapConfig::from_toml_file(path)?
        }
        None => MapConfig {
            radius: 100,
            total_towns: 100,
            ..MapConfig::default()
        },
    };
    if let Some(seed) = cli.seed {
        config.seed = Some(seed);
    }
    if let Some(radius) = cli.radius {
        config.radius = radius;
    }
    if let Some(towns) = cli.towns {
        config.total_towns = towns;
    }
    if cli.single_island {
        config.archipelago = false;
    }

    let mut rng = match cli.search_seed {
        Some(seed) => ChaCha8Rng::seed_from_u64(seed),
        None => ChaCha8Rng::from_entropy(),
    };

    let started = Instant::now();
    let generated = generate_map(config, &mut rng)?;
    tracing::info!(
        "Map Generation took {:.1}ms",
        started.elapsed().as_secs_f64() * 1000.0
    );

    let map = &generated.definition;
    let report = &generated.report;
    tracing::info!(
        seed = map.seed(),
        tiles = map.len(),
        towns = report.placement.placed,
        "map ready"
    );
    if report.placement.shortfall() > 0 {
        tracing::warn!(
            shortfall = report.placement.shortfall(),
            outcome = ?report.placement.outcome,
            "map is under-populated"
        );
    }

    let started = Instant::now();
    let options = PreviewOptions {
        cell_size: cli.cell_size,
        ..PreviewOptions::for_config(map.config())
    };
    save_preview_png(map, &BiomeSkins::default(), options, &cli.output)?;
    tracing::info!(
        path = ?cli.output,
        "Map Render took {:.1}ms",
        started.elapsed().as_secs_f64() * 1000.0
    );

    if let Some(path) = &cli.json {
        save_json(map, Some(report), path)?;
        tracing::info!(?path, "map exported");
    }

    Ok(())
}
