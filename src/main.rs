use std::path::Path;
use std::process::ExitCode;
use std::sync::Arc;

use clap::{Arg, ArgAction, Command};
use mt_bridge::{
    BlockingService, BridgeResult, ResponseOptions, ResponseView, ServiceConfig, TranslationModel,
};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    let matches = Command::new("mt-bridge")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Translate texts through the blocking service and inspect the responses")
        .arg(
            Arg::new("texts")
                .help("Source texts to translate, one response per text")
                .required(true)
                .num_args(1..)
                .index(1),
        )
        .arg(
            Arg::new("from")
                .long("from")
                .short('f')
                .help("Source language code")
                .default_value("en"),
        )
        .arg(
            Arg::new("to")
                .long("to")
                .short('t')
                .help("Target language code")
                .required(true),
        )
        .arg(
            Arg::new("pivot")
                .long("pivot")
                .short('p')
                .help("Translate through this intermediate language"),
        )
        .arg(
            Arg::new("config")
                .long("config")
                .short('c')
                .help("Path to a JSON service configuration (default: $MT_BRIDGE_CONFIG)"),
        )
        .arg(
            Arg::new("alignments")
                .long("alignments")
                .short('a')
                .help("Request and print token alignments")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("json")
                .long("json")
                .help("Print responses as JSON")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("verbose")
                .long("verbose")
                .short('v')
                .help("Show sentence ranges and debug logs")
                .action(ArgAction::SetTrue),
        )
        .get_matches();

    let config = match matches.get_one::<String>("config") {
        Some(path) => ServiceConfig::from_file(Path::new(path)),
        None => ServiceConfig::from_env(),
    };
    let config = match config {
        Ok(config) => config,
        Err(e) => {
            eprintln!("❌ {}", e);
            return ExitCode::FAILURE;
        }
    };

    let verbose = matches.get_flag("verbose");
    let default_level = if verbose { "debug" } else { config.log_level.as_str() };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    let texts: Vec<String> = matches
        .get_many::<String>("texts")
        .map(|values| values.cloned().collect())
        .unwrap_or_default();
    let request = Request {
        from: matches.get_one::<String>("from").cloned().unwrap_or_default(),
        to: matches.get_one::<String>("to").cloned().unwrap_or_default(),
        pivot: matches.get_one::<String>("pivot").cloned(),
        alignment: matches.get_flag("alignments"),
    };

    let service = BlockingService::new(config);
    info!(engine = service.engine_name(), texts = texts.len(), "starting translation");

    let views = match run(&service, &request, texts) {
        Ok(views) => views,
        Err(e) => {
            error!("translation failed: {}", e);
            eprintln!("❌ {}", e);
            return ExitCode::FAILURE;
        }
    };

    if matches.get_flag("json") {
        match serde_json::to_string_pretty(&to_json(&views)) {
            Ok(json) => println!("{}", json),
            Err(e) => {
                eprintln!("❌ Failed to serialize responses: {}", e);
                return ExitCode::FAILURE;
            }
        }
    } else {
        print_views(&views, verbose, request.alignment);
    }

    ExitCode::SUCCESS
}

struct Request {
    from: String,
    to: String,
    pivot: Option<String>,
    alignment: bool,
}

fn run(service: &BlockingService, request: &Request, texts: Vec<String>) -> BridgeResult<Vec<ResponseView>> {
    let options = vec![
        ResponseOptions {
            alignment: request.alignment,
        };
        texts.len()
    ];

    match &request.pivot {
        Some(pivot) => {
            let first = Arc::new(TranslationModel::new(
                format!("{}{}", request.from, pivot),
                &request.from,
                pivot,
            )?);
            let second = Arc::new(TranslationModel::new(
                format!("{}{}", pivot, request.to),
                pivot,
                &request.to,
            )?);
            service.translate_via_pivoting(&first, &second, texts, &options)
        }
        None => {
            let model = Arc::new(TranslationModel::new(
                format!("{}{}", request.from, request.to),
                &request.from,
                &request.to,
            )?);
            service.translate(&model, texts, &options)
        }
    }
}

fn to_json(views: &[ResponseView]) -> serde_json::Value {
    views
        .iter()
        .map(|view| {
            let sentences: Vec<serde_json::Value> = (0..view.size())
                .map(|idx| {
                    serde_json::json!({
                        "source": view.source_sentence_range(idx).ok(),
                        "target": view.target_sentence_range(idx).ok(),
                    })
                })
                .collect();
            serde_json::json!({
                "original": view.original_text(),
                "translated": view.translated_text(),
                "sentences": sentences,
                "alignments": view.alignments(),
            })
        })
        .collect()
}

fn print_views(views: &[ResponseView], verbose: bool, alignments: bool) {
    for (i, view) in views.iter().enumerate() {
        if verbose {
            println!("📝 [{}] \"{}\"", i, view.original_text());
            for idx in 0..view.size() {
                if let (Ok(source), Ok(target)) =
                    (view.source_sentence_range(idx), view.target_sentence_range(idx))
                {
                    println!(
                        "   sentence {}: [{}, {}) → [{}, {})",
                        idx, source.begin, source.end, target.begin, target.end
                    );
                }
            }
        }
        println!("{}", view.translated_text());

        if alignments {
            for entry in view.alignments() {
                for (target_token, weights) in entry.target.iter().zip(&entry.alignments) {
                    let best = weights
                        .iter()
                        .enumerate()
                        .max_by(|a, b| a.1.total_cmp(b.1))
                        .map(|(s, _)| entry.source[s].as_str())
                        .unwrap_or("");
                    println!("   {} ← {}", target_token, best);
                }
            }
        }
    }
}
