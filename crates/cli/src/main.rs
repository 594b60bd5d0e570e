mod args;

use args::GoatArgs;
use clap::Parser as _;
use goat_syntax::error::ErrorKind;
use goat_syntax::messages::Messages;
use goat_syntax::Parser;
use std::process::exit;
use tracing_subscriber::{
    fmt::format::FmtSpan, prelude::__tracing_subscriber_SubscriberExt, util::SubscriberInitExt,
    EnvFilter,
};

fn main() {
    let cli = GoatArgs::parse();
    setup_stderr_logging(cli.log_spans, cli.verbose);

    match run(&cli) {
        Ok(code) => exit(code),
        Err(error) => {
            tracing::error!(error = %format!("{error:#}"), "operation failed");
            exit(1);
        }
    }
}

fn run(cli: &GoatArgs) -> anyhow::Result<i32> {
    let messages = Messages::new(cli.lang.into());
    let file_name = cli.file.display().to_string();

    let source = match std::fs::read_to_string(&cli.file) {
        Ok(source) => source,
        Err(error) => {
            tracing::debug!(%error, "failed to read the source file");
            eprintln!(
                "{}",
                messages.render(&ErrorKind::CannotReadSourceFile(file_name.as_str().into()))
            );
            return Ok(1);
        }
    };

    let parse = Parser::new(&source).parse();
    if !parse.errors.is_empty() {
        for error in &parse.errors {
            eprintln!("{}", messages.report_line(&file_name, error));
        }
        eprintln!("{}", messages.compilation_failed(parse.errors.len()));
        return Ok(1);
    }

    if cli.print_ast {
        if let Some(rendered) = parse.render_root() {
            println!("{rendered}");
        }
    }
    Ok(0)
}

fn setup_stderr_logging(spans: bool, verbose: bool) {
    let span_events = if spans {
        FmtSpan::NEW | FmtSpan::CLOSE
    } else {
        FmtSpan::NONE
    };

    let registry = tracing_subscriber::registry();

    let env_filter = match std::env::var("RUST_LOG").ok() {
        Some(log) => EnvFilter::new(log),
        None => EnvFilter::default().add_directive(tracing::Level::WARN.into()),
    };

    if verbose {
        registry
            .with(env_filter)
            .with(
                tracing_subscriber::fmt::layer()
                    .with_span_events(span_events)
                    .event_format(tracing_subscriber::fmt::format().pretty())
                    .with_writer(std::io::stderr),
            )
            .try_init()
            .ok();
    } else {
        registry
            .with(env_filter)
            .with(
                tracing_subscriber::fmt::layer()
                    .with_span_events(span_events)
                    .event_format(
                        tracing_subscriber::fmt::format()
                            .compact()
                            .with_source_location(false)
                            .with_target(false)
                            .without_time(),
                    )
                    .with_writer(std::io::stderr),
            )
            .try_init()
            .ok();
    }
}
