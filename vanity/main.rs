use std::{io, process};

use clap::Parser;
use vanity::{
    app,
    args::{Args, Command},
    config::Settings,
    engine::StopSignal,
    logging::init_logging,
    sink::WriterSink,
};

fn run() -> Result<(), failure::Error> {
    let args = Args::parse();
    let settings = Settings::load(args.config_path.as_deref())?.merge(args.overrides());
    init_logging(settings.log_file.as_deref())?;

    match &args.command {
        Command::Search(_) => {
            let config = settings.into_search_config()?;
            let sink = WriterSink::new(io::stdout(), config.output);
            let stop = StopSignal::new();
            app::stop_on_interrupt(stop.clone())?;
            app::search(&config, &stop, &sink)?;
        }
        Command::Derive(derive) => {
            let derivation = app::derive(&settings.key_config()?, &derive.target())?;
            if derive.json {
                println!("{}", serde_json::to_string(&derivation)?);
            } else {
                println!("{}", derivation);
            }
        }
    }
    Ok(())
}

fn main() {
    if let Err(e) = run() {
        eprintln!("error: {}", e);
        process::exit(1);
    }
}
