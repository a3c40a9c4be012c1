mod extract;
mod functions;
mod localization;
mod read;
mod resolve;
mod statics;
mod syntax;
mod template;
mod types;

use crate::{
    extract::extract_symbol_table,
    localization::{Language, Localization},
    read::ReaderBuilder,
    statics::{DEFAULT_KEY_MARKER, DEFAULT_OUTPUT_DIR, LANGUAGE_KEY_TYPE},
    syntax::{Decompiler, DumpedSyntaxTree, ExternalDecompiler, SyntaxNode},
    types::{GamePaths, RequiredPath, ResultVec, SymbolTable},
};
use clap::{value_parser, Arg, ArgAction, ArgMatches, Command};
use color_print::cformat;
use log::{info, warn, LevelFilter, SetLoggerError};
use simplelog::{ColorChoice, ConfigBuilder, TermLogger, TerminalMode};
use std::{fmt::Display, fs::create_dir_all, path::PathBuf, process::exit, time::Instant};
use sys_locale::get_locale;

fn preparse_args() -> Language {
    let preparse = Command::new("preparse")
        .disable_help_flag(true)
        .disable_version_flag(true)
        .ignore_errors(true)
        .args([Arg::new("language")
            .short('l')
            .long("language")
            .value_parser(["en", "zh"])]);
    let mut preparse_matches = preparse.get_matches();
    let language_arg = preparse_matches.remove_one::<String>("language");

    let language = language_arg.unwrap_or_else(|| {
        let locale = get_locale().unwrap_or(String::from("en-US"));

        if let Some((lang, _)) = locale.split_once(['-', '_']) {
            lang.to_owned()
        } else {
            locale
        }
    });

    match language.as_str() {
        "zh" => Language::Chinese,
        _ => Language::English,
    }
}

fn setup_cli(localization: &Localization<'static>) -> Command {
    let game_dir_arg = Arg::new("game-dir")
        .help(localization.game_dir_arg_desc)
        .value_name(localization.game_path_arg_type)
        .value_parser(value_parser!(PathBuf));

    let output_dir_arg = Arg::new("output-dir")
        .short('o')
        .long("output-dir")
        .help(cformat!(
            "{}\n<bold>[{} {}]</>",
            localization.output_dir_arg_desc,
            localization.default_value,
            DEFAULT_OUTPUT_DIR
        ))
        .value_name(localization.output_path_arg_type)
        .value_parser(value_parser!(PathBuf))
        .default_value(DEFAULT_OUTPUT_DIR)
        .hide_default_value(true)
        .display_order(1);

    let syntax_tree_arg = Arg::new("syntax-tree")
        .short('t')
        .long("syntax-tree")
        .help(localization.syntax_tree_arg_desc)
        .value_name(localization.file_arg_type)
        .value_parser(value_parser!(PathBuf))
        .display_order(2);

    let decompiler_arg = Arg::new("decompiler")
        .short('d')
        .long("decompiler")
        .help(localization.decompiler_arg_desc)
        .value_name(localization.program_arg_type)
        .value_parser(value_parser!(PathBuf))
        .display_order(3);

    let marker_arg = Arg::new("marker")
        .short('m')
        .long("marker")
        .help(cformat!(
            "{}\n<bold>[{} {}]</>",
            localization.marker_arg_desc,
            localization.default_value,
            DEFAULT_KEY_MARKER
        ))
        .value_name(localization.marker_arg_type)
        .default_value(DEFAULT_KEY_MARKER)
        .hide_default_value(true)
        .display_order(4);

    let language_arg = Arg::new("language")
        .short('l')
        .long("language")
        .value_name(localization.language_arg_type)
        .help(cformat!(
            "{}\n{} --language zh<bold>\n[{} en, zh]</>",
            localization.language_arg_desc,
            localization.example,
            localization.allowed_values,
        ))
        .value_parser(["en", "zh"])
        .display_order(95);

    let log_flag = Arg::new("log")
        .short('L')
        .long("log")
        .action(ArgAction::SetTrue)
        .help(localization.log_arg_desc)
        .display_order(96);

    let version_flag = Arg::new("version")
        .short('v')
        .long("version")
        .action(ArgAction::Version)
        .help(localization.version_flag_desc)
        .display_order(98);

    let help_flag = Arg::new("help")
        .short('h')
        .long("help")
        .help(localization.help_arg_desc)
        .action(ArgAction::Help)
        .display_order(99);

    Command::new("taiwu-txt-rs")
        .version(env!("CARGO_PKG_VERSION"))
        .disable_version_flag(true)
        .disable_help_flag(true)
        .next_line_help(true)
        .term_width(120)
        .about(localization.about_msg)
        .help_template(localization.help_template)
        .args([
            game_dir_arg,
            output_dir_arg,
            syntax_tree_arg,
            decompiler_arg,
            marker_arg,
            language_arg,
            log_flag,
            help_flag,
            version_flag,
        ])
        .hide_possible_values(true)
}

fn fail(msg: &str, detail: impl Display) -> ! {
    eprintln!("{msg} {detail}");
    exit(1);
}

fn select_decompiler(matches: &ArgMatches, localization: &Localization<'static>) -> Box<dyn Decompiler> {
    if let Some(syntax_tree) = matches.get_one::<PathBuf>("syntax-tree") {
        Box::new(DumpedSyntaxTree::new(syntax_tree))
    } else if let Some(program) = matches.get_one::<PathBuf>("decompiler") {
        Box::new(ExternalDecompiler::new(program))
    } else {
        eprintln!("{}", localization.syntax_tree_source_missing_msg);
        exit(1);
    }
}

fn report_failures(results: &ResultVec, localization: &Localization) {
    let failed: usize = results.iter().filter(|result| result.is_err()).count();

    if failed != 0 {
        warn!("{} {failed}", localization.failed_files_msg);
    }
}

fn init_logger(logging: bool) -> Result<(), SetLoggerError> {
    TermLogger::init(
        if logging { LevelFilter::Info } else { LevelFilter::Warn },
        ConfigBuilder::new().set_time_level(LevelFilter::Off).build(),
        TerminalMode::Stderr,
        ColorChoice::Auto,
    )
}

fn main() {
    let start_time = Instant::now();

    let language = preparse_args();
    let localization = Localization::new(language);
    let cli = setup_cli(&localization);
    let matches = cli.get_matches();

    let logging = matches.get_flag("log");
    if let Err(err) = init_logger(logging) {
        eprintln!("{} {err}", localization.logger_init_failed_msg);
    }

    let game_dir = matches.get_one::<PathBuf>("game-dir").unwrap_or_else(|| {
        eprintln!("{}", localization.game_dir_missing_msg);
        exit(1);
    });

    if !game_dir.is_dir() {
        fail(localization.invalid_game_dir_msg, game_dir.display());
    }

    let game_paths = GamePaths::new(game_dir);

    if let Some((required, path)) = game_paths.find_missing() {
        let msg: &str = match required {
            RequiredPath::ManagedAssembly => localization.invalid_managed_assembly_msg,
            RequiredPath::EventLanguagesDir => localization.invalid_events_dir_msg,
            RequiredPath::LanguageAssetBundle => localization.invalid_asset_bundle_msg,
            RequiredPath::StreamingLanguageDir => localization.invalid_language_dir_msg,
        };

        fail(msg, path.display());
    }

    let decompiler = select_decompiler(&matches, &localization);
    let syntax_tree: SyntaxNode = decompiler
        .decompile_type(&game_paths.managed_assembly, LANGUAGE_KEY_TYPE)
        .unwrap_or_else(|err| fail(localization.decompile_failed_msg, err));
    let symbols: SymbolTable =
        extract_symbol_table(&syntax_tree).unwrap_or_else(|err| fail(localization.extract_failed_msg, err));

    if logging {
        info!("{} {}", localization.extracted_language_keys_msg, symbols.len());
    }

    let output_dir = matches
        .get_one::<PathBuf>("output-dir")
        .cloned()
        .unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT_DIR));

    if let Err(err) = create_dir_all(&output_dir) {
        fail(localization.output_dir_create_failed_msg, format!("{}: {err}", output_dir.display()));
    }

    let marker: &str = matches
        .get_one::<String>("marker")
        .map(String::as_str)
        .unwrap_or(DEFAULT_KEY_MARKER);

    let reader = ReaderBuilder::new(&localization)
        .logging(logging)
        .marker(marker)
        .build();

    println!("{}", localization.saving_events_msg);
    let event_results: ResultVec = reader.read_events(&game_paths.event_languages, &output_dir);
    report_failures(&event_results, &localization);

    println!("{}", localization.processing_language_files_msg);
    let language_results: ResultVec = reader.read_language(&game_paths.streaming_language, &symbols, &output_dir);
    report_failures(&language_results, &localization);

    println!(
        "{} {:.2}s",
        localization.elapsed_time_msg,
        start_time.elapsed().as_secs_f32()
    );
}
