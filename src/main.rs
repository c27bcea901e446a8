use clap::Parser;
use order_batch::utils::{logger, validation::Validate};
use order_batch::{
    BatchConfig, CliArgs, CsvReportSink, HttpRemoteService, JsonFileRepository, OrderProcessor,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = CliArgs::parse();

    // 初始化日誌
    if args.json_logs {
        logger::init_json_logger(args.verbose);
    } else {
        logger::init_cli_logger(args.verbose);
    }

    tracing::info!("Starting order-batch for user {}", args.user_id);
    tracing::info!("📁 Loading configuration from: {}", args.config);

    let mut config = match BatchConfig::from_file(&args.config) {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("❌ Failed to load config file '{}': {}", args.config, e);
            eprintln!("❌ {}", e.user_friendly_message());
            std::process::exit(e.exit_code());
        }
    };

    // 應用命令列覆蓋設定
    if let Some(output_dir) = &args.output_dir {
        config.report.output_dir = output_dir.clone();
        tracing::info!("🔧 Report directory overridden to: {}", output_dir);
    }

    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        eprintln!("❌ {}", e.user_friendly_message());
        std::process::exit(e.exit_code());
    }

    if args.verbose {
        // ServiceConfig 的 Debug 不輸出 header 值
        tracing::debug!("Config: {:?}", config);
    }

    let repository = JsonFileRepository::new(&config.store.path);
    let remote = HttpRemoteService::from_config(&config.service);
    let sink = CsvReportSink::new(&config.report.output_dir);
    let processor = OrderProcessor::with_rules(repository, remote, sink, config.rules);

    if processor.run(args.user_id).await {
        println!("✅ Orders for user {} processed", args.user_id);
        Ok(())
    } else {
        eprintln!(
            "❌ Batch for user {} did not complete (no orders, or a batch-level failure)",
            args.user_id
        );
        std::process::exit(1);
    }
}
