mod cli;
mod config;

use anyhow::{Context, Result};
use clap::Parser;
use cli::{Cli, Commands, ConvertArgs};
use df_core::{ConversionOutcome, TargetFormats};
use df_engine::{DocumentCategory, Engine, FormatRegistry};
use df_office::{AptProvisioner, Provisioner, ToolLocator};
use futures::StreamExt;
use std::path::Path;

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Respect RUST_LOG env var if set, otherwise use defaults based on verbose flag
    let env_filter = std::env::var("RUST_LOG").unwrap_or_else(|_| {
        if cli.verbose {
            "docforge=debug,df_engine=debug,df_office=debug".to_string()
        } else {
            "docforge=info,df_engine=info,df_office=warn".to_string()
        }
    });

    // Logs go to stderr; stdout carries conversion results.
    tracing_subscriber::fmt()
        .with_env_filter(&env_filter)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Convert(args) => convert(args, cli.config.as_deref()),
        Commands::Formats {
            category,
            inputs,
            outputs,
            json,
        } => list_formats(category.as_deref(), inputs, outputs, json),
        Commands::CanConvert { from, to } => can_convert(&from, &to),
        Commands::CheckTools => check_tools(cli.config.as_deref()),
        Commands::InstallTools => provision(true),
        Commands::UninstallTools => provision(false),
        Commands::Version => {
            println!("docforge {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
    }
}

fn convert(args: ConvertArgs, config_path: Option<&Path>) -> Result<()> {
    let mut config = config::load_config_or_default(config_path)?;
    config::Overrides {
        timeout_secs: args.timeout,
        max_concurrency: args.max_concurrency,
        parallel_workers: args.workers,
        no_install: args.no_install,
    }
    .apply(&mut config.engine);

    let engine = Engine::new(config.engine).context("Invalid engine settings")?;

    let targets = match args.to {
        Some(to) => TargetFormats::from(to),
        None => TargetFormats::from(args.to_each),
    };

    let total = args.paths.len();
    let mut failed = 0;
    let mut report = |outcome: ConversionOutcome| -> Result<()> {
        if !outcome.is_success() {
            failed += 1;
        }
        println!("{}", serde_json::to_string(&outcome)?);
        Ok(())
    };

    if args.use_async {
        let rt = tokio::runtime::Runtime::new()?;
        rt.block_on(async {
            let mut stream = engine.async_transform_many(&args.paths, targets).await?;
            while let Some(outcome) = stream.next().await {
                report(outcome)?;
            }
            Ok::<_, anyhow::Error>(())
        })?;
    } else {
        for outcome in engine.transform_many(&args.paths, targets)? {
            report(outcome)?;
        }
    }

    tracing::info!("{} of {} conversion(s) succeeded", total - failed, total);
    if failed > 0 {
        anyhow::bail!("{} of {} conversion(s) failed", failed, total);
    }
    Ok(())
}

fn list_formats(category: Option<&str>, inputs: bool, outputs: bool, json: bool) -> Result<()> {
    if inputs || outputs {
        let extensions = if inputs {
            Engine::supported_input_formats()
        } else {
            Engine::supported_output_formats()
        };
        if json {
            println!("{}", serde_json::to_string_pretty(&extensions)?);
        } else {
            for ext in extensions {
                println!("{}", ext);
            }
        }
        return Ok(());
    }

    let formats = match category {
        Some(name) => {
            let category: DocumentCategory = name.parse()?;
            FormatRegistry::formats_by_category(category)
        }
        None => FormatRegistry::all_formats().to_vec(),
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&formats)?);
        return Ok(());
    }

    for format in &formats {
        let mode = match (format.can_import, format.can_export) {
            (true, true) => "import/export",
            (true, false) => "import",
            (false, true) => "export",
            (false, false) => "-",
        };
        println!(
            "{:<6} {:<8} {:<14} {}",
            format.extension,
            format.category.to_string(),
            mode,
            format.filter_name
        );
    }

    Ok(())
}

fn can_convert(from: &str, to: &str) -> Result<()> {
    if !Engine::can_convert(from, to) {
        anyhow::bail!("Cannot convert {} to {}", from, to);
    }

    match FormatRegistry::export_filter(from, to) {
        Some(filter) => println!("✓ {} -> {} (filter: {})", from, to, filter),
        None => println!("✓ {} -> {}", from, to),
    }
    Ok(())
}

fn check_tools(config_path: Option<&Path>) -> Result<()> {
    println!("Checking external tools...\n");

    let config = config::load_config_or_default(config_path)?;
    let tool = ToolLocator::new(config.engine.soffice_path.as_deref()).check();

    let status = if tool.available { "✓" } else { "✗" };
    print!("{} {}", status, tool.name);

    if let Some(ref version) = tool.version {
        print!(" ({})", version);
    }

    if let Some(ref path) = tool.path {
        print!(" - {}", path.display());
    }

    println!();
    println!();
    if tool.available {
        println!("All required tools are available!");
    } else {
        println!("LibreOffice is missing. Run `docforge install-tools` to install it.");
    }

    Ok(())
}

fn provision(install: bool) -> Result<()> {
    let provisioner = AptProvisioner::default();
    let ok = if install {
        provisioner.install()
    } else {
        provisioner.uninstall()
    };

    let action = if install { "installation" } else { "removal" };
    if !ok {
        anyhow::bail!("LibreOffice {} failed", action);
    }
    println!("✓ LibreOffice {} succeeded", action);
    Ok(())
}
