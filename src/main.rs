use proxyopt::cli::Cli;
use proxyopt::config::Settings;
use proxyopt::core::runner::{disabled_notifier, ProxyOptimizer};
use proxyopt::notify::NotifyOutcome;

#[tokio::main(flavor = "current_thread")]
async fn main() {
    match main_impl().await {
        Ok(code) => std::process::exit(code),
        Err(e) => {
            eprintln!("❌ {}", e);
            std::process::exit(1);
        }
    }
}

async fn main_impl() -> Result<i32, Box<dyn std::error::Error>> {
    let cli = Cli::parse_args();

    // Handle settings commands
    if cli.init {
        let path = Settings::init(cli.settings.as_deref())?;
        println!("✓ Created settings file: {}", path.display());
        return Ok(0);
    }

    let mut settings = Settings::load(cli.settings.as_deref())?;
    if let Some(config_file) = cli.config_file {
        settings.target.config_file = config_file;
    }

    if cli.print {
        settings.print()?;
        return Ok(0);
    }

    if cli.check {
        settings.check()?;
        println!("✓ Settings valid");
        return Ok(0);
    }

    let mut optimizer = ProxyOptimizer::new(settings)?
        .with_dry_run(cli.dry_run)
        .with_progress(true);
    if cli.no_notify {
        optimizer = optimizer.with_notifier(disabled_notifier());
    }

    let report = optimizer.run().await?;

    match &report.notification {
        NotifyOutcome::Sent => println!("\n✓ Notification sent"),
        NotifyOutcome::Skipped(reason) => println!("\nNotification skipped: {}", reason),
        NotifyOutcome::Failed(error) => println!("\nNotification failed: {}", error),
    }

    println!("\nDone at {}", proxyopt::core::network::get_local_timestamp());
    Ok(report.exit_code())
}
