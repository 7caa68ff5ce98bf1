/// Path Tracer - Shows the flow through path string → tokens → AST → value
///
/// Usage: cargo run --bin trace_path <path> [json-file]

use modelpath_access::{walk, GetPathVisitor};
use modelpath_core::PathConfig;
use modelpath_dsl::{tokenize, Parser};
use serde_json::Value;
use std::fs;
use tracing_subscriber::EnvFilter;

fn main() {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("modelpath=info"));
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let args: Vec<String> = std::env::args().collect();

    if args.len() < 2 {
        eprintln!("Usage: cargo run --bin trace_path <path> [json-file]");
        eprintln!();
        eprintln!("Example:");
        eprintln!("  cargo run --bin trace_path 'links[AD].attributes.memberOf' identity.json");
        std::process::exit(1);
    }

    let source = &args[1];

    let config = match PathConfig::from_env() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("❌ Invalid configuration: {}", e);
            std::process::exit(1);
        }
    };

    println!("╔═══════════════════════════════════════════════════════════════");
    println!("║ PATH TRACER");
    println!("╚═══════════════════════════════════════════════════════════════\n");

    println!("📝 INPUT PATH:");
    println!("{}", source);
    println!();

    // Step 1: Lex
    println!("🔤 TOKENS:");
    println!("─────────────────────────────────────────────────────────────");
    let tokens = match tokenize(source) {
        Ok(tokens) => tokens,
        Err(e) => {
            println!("❌ Lex error: {}", e);
            std::process::exit(1);
        }
    };
    for token in &tokens {
        println!("  {:>3}..{:<3} {}", token.span.start, token.span.end, token);
    }
    println!();

    // Step 2: Parse
    let path = match Parser::new(tokens, source.as_str()).parse() {
        Ok(path) => path,
        Err(e) => {
            println!("❌ Parse error: {}", e);
            std::process::exit(1);
        }
    };

    println!("🌳 AST:");
    println!("─────────────────────────────────────────────────────────────");
    println!("{:#?}", path);
    println!();

    // Step 3: Round-trip
    println!("🔄 CANONICAL FORM:");
    println!("─────────────────────────────────────────────────────────────");
    println!("{}", path);
    println!();

    // Step 4: Get against a model, when one is given
    let Some(model_path) = args.get(2) else {
        println!("✅ Parse succeeded!");
        return;
    };

    let model: Value = match fs::read_to_string(model_path)
        .map_err(|e| e.to_string())
        .and_then(|content| serde_json::from_str(&content).map_err(|e| e.to_string()))
    {
        Ok(model) => model,
        Err(e) => {
            eprintln!("❌ Failed to read {}: {}", model_path, e);
            std::process::exit(1);
        }
    };

    println!("🔍 GET RESULT:");
    println!("─────────────────────────────────────────────────────────────");
    let mut visitor = GetPathVisitor::new(&model, &config);
    match walk(&path, &mut visitor) {
        Ok(()) => match visitor.value() {
            Some(value) => match serde_json::to_string_pretty(value) {
                Ok(pretty) => println!("{}", pretty),
                Err(e) => println!("❌ Cannot render value: {}", e),
            },
            None => println!("null"),
        },
        Err(e) => println!("❌ Traversal error: {}", e),
    }
}
