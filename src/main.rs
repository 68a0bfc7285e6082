use anyhow::Context;
use clap::Parser;
use cinefind::utils::{logger, validation::Validate};
use cinefind::{
    App, AppConfig, AppError, AppOptions, CliConfig, ConsoleNotifier, LocalStorage, PlacesClient,
    TmdbClient,
};

fn fail(e: &AppError) -> ! {
    tracing::error!("❌ {} (Category: {:?})", e, e.category());
    eprintln!("❌ {}", e.user_friendly_message());
    eprintln!("💡 Suggestion: {}", e.recovery_suggestion());
    std::process::exit(e.exit_code());
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = CliConfig::parse();

    // 初始化日誌
    if cli.log_json {
        logger::init_json_logger(cli.verbose);
    } else {
        logger::init_cli_logger(cli.verbose);
    }

    let config_path = cli.config.clone().unwrap_or_else(AppConfig::default_path);
    tracing::debug!("Loading configuration from: {}", config_path.display());

    // 只有明確指定 --config 時，檔案不存在才算錯誤
    let loaded = if cli.config.is_some() {
        AppConfig::from_file(&config_path)
    } else {
        AppConfig::load_or_default(&config_path)
    };
    let mut config = match loaded {
        Ok(config) => config,
        Err(e) => fail(&e),
    };
    config.apply_env_overrides();

    // 驗證配置
    if let Err(e) = config.validate() {
        fail(&e);
    }

    let screen = cli.command.into_screen();
    if screen.needs_movie_catalog() {
        if let Err(e) = config.require_tmdb_key() {
            fail(&e);
        }
    }
    if screen.needs_places_catalog() {
        if let Err(e) = config.require_places_key() {
            fail(&e);
        }
    }

    let leaving_soon = match config.leaving_soon_policy() {
        Ok(policy) => policy,
        Err(e) => fail(&e),
    };

    let catalog = TmdbClient::new(
        &config.tmdb.base_url,
        &config.tmdb.api_key,
        &config.tmdb.language,
        config.tmdb_timeout(),
    )
    .context("failed to build TMDB client")?;
    let places = PlacesClient::new(
        &config.places.base_url,
        &config.places.api_key,
        config.places_timeout(),
    )
    .context("failed to build Places client")?;

    let data_dir = config.data_dir();
    tracing::debug!("Data directory: {}", data_dir.display());
    let storage = LocalStorage::new(data_dir);

    let options = AppOptions {
        region_override: cli.region.clone(),
        default_region: config.region.default.clone(),
        reference_point: config.reference_point(),
        radius_meters: config.places.radius_meters,
        image_base_url: config.tmdb.image_base_url.clone(),
        leaving_soon,
        today: chrono::Local::now().date_naive(),
    };

    let mut app = App::new(catalog, places, storage, ConsoleNotifier, options);

    match app.show(screen).await {
        Ok(output) => {
            print!("{}", output.text);
            if output.failed {
                tracing::warn!("Screen finished with errors");
                std::process::exit(2);
            }
        }
        Err(e) => fail(&e),
    }

    Ok(())
}
