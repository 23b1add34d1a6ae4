use std::{path::PathBuf, process::ExitCode};

use cliparse::{help::HelpMessage, FlagOption, KeyValueOption, Parser, PositionalOption};

pub fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let mut parser = Parser::new();
    let verbose = parser.register_flag(
        FlagOption::new(["-v", "--verbose"]).description("Print more output, may be repeated"),
    );
    let value = parser.register_key_value(
        KeyValueOption::<Option<i32>>::new(["--value"]).description("An optional integer"),
    );
    let weights = parser.register_key_value(
        KeyValueOption::<Option<Vec<f64>>>::new(["-w", "--weights"])
            .description("Comma separated list of weights"),
    );
    let input = parser.register_positional(
        PositionalOption::<Option<PathBuf>>::new("input").description("File to read"),
    );

    let arguments: Vec<String> = std::env::args().collect();
    if cliparse::help::is_help_requested(&arguments) {
        let program = arguments.first().map_or("sandbox", String::as_str);
        println!("Usage: {program} [ options ] [input]\n");
        print!("{}", HelpMessage::new(&parser));
        return ExitCode::SUCCESS;
    }

    if let Err(error) = parser.parse(&arguments) {
        log::error!("{error}");
        return ExitCode::FAILURE;
    }

    log::info!("Verbosity: {}", parser.count(verbose));

    match parser.value(&value) {
        Some(value) => log::info!("--value is {value}"),
        None => log::info!("No --value defined"),
    }

    if let Some(weights) = parser.value(&weights) {
        log::info!("Sum of weights: {}", weights.iter().sum::<f64>());
    }

    if let Some(input) = parser.value(&input) {
        log::info!("Input file: {}", input.display());
    }

    ExitCode::SUCCESS
}
