//! abt command line interface.

use std::process;

use clap::{crate_authors, crate_description, crate_name, crate_version, App, AppSettings::*, Arg};
use console::style;
use log::{debug, trace, LevelFilter};
use simplelog::*;

use abt::{self as ab, ArduinoCli, Dispatcher, JsonFileStore, Verb};

fn main() {
    ctrlc::set_handler(move || {
        println!("🛑 received Ctrl+C!");
        process::exit(0);
    })
    .expect("Failed to install my Ctrl-C handler!");

    let version = format!("v{}", crate_version!());
    let mut app = App::new(crate_name!())
        .version(version.as_str())
        .author(crate_authors!())
        .about(crate_description!())
        .long_about(
            "\n\
            abt wraps `arduino-cli` so that the board and the serial port \
            only need to be chosen once per sketch. The choice is saved in \
            `.abt.json` in the current directory and reused by the compile \
            and upload commands.\n\
            \n\
            Commands:\n\
               \tc, config   \tchoose the board, then the port, interactively\n\
               \ta, all      \tcompile, then upload\n\
               \tcomp, compile\tcompile only\n\
               \tu, upload   \tupload only\n\
            \n\
            In the selection list, type `/` to filter, use the arrow keys \
            to move, `enter` to select and `q` to quit without saving.\n\
            \n\
            Log records go to stderr. With `-vv` or more, the records \
            written while the selection list is shown may overlay it until \
            the next key press redraws the screen.\
        ",
        )
        .max_term_width(80)
        .setting(ColoredHelp)
        .setting(NextLineHelp)
        .arg(
            Arg::with_name("COMMAND")
                .help("the action to perform")
                .long_help(
                    "the action to perform: `config` (or `c`), `all` (or `a`), \
                     `compile` (or `comp`) or `upload` (or `u`); prints this \
                     help when omitted.",
                )
                .index(1),
        )
        .arg(
            Arg::with_name("TOOLCHAIN")
                .help("the arduino-cli executable to use")
                .short("-t")
                .long("--toolchain")
                .takes_value(true)
                .default_value(ab::DEFAULT_TOOLCHAIN)
                .require_equals(true),
        )
        .arg(
            Arg::with_name("CONFIG")
                .help("where the board and port selection is kept")
                .short("-c")
                .long("--config")
                .takes_value(true)
                .default_value(ab::DEFAULT_CONFIG_PATH)
                .require_equals(true),
        )
        .arg(Arg::with_name("v").short("v").multiple(true).help(
            "Sets the logging level of verbosity, repeat several times for \
                higher verbosity",
        ));
    let matches = app.clone().get_matches();

    // Vary the output based on how many times the user used the "verbose" flag
    // (i.e. 'abt -v -v -v' or 'abt -vvv' vs 'abt -v'
    let log_level = match matches.occurrences_of("v") {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };

    // Logs go to stderr so they stay out of the way of the selection screen.
    if let Err(e) = TermLogger::init(
        log_level,
        Config::default(),
        TerminalMode::Stderr,
        ColorChoice::Auto,
    ) {
        eprintln!("{}: could not set up logging: {}", style("warning").yellow(), e);
    }

    trace!("{:#?}", matches);

    // Arguments with default values ===========================================

    // It's safe to call unwrap on these, because the value with either be what
    // the user input at runtime or the default value
    let settings = ab::SettingsBuilder::new()
        .toolchain(matches.value_of("TOOLCHAIN").unwrap())
        .config_path(matches.value_of("CONFIG").unwrap())
        .finalize();

    // END - Arguments =========================================================

    let command = match matches.value_of("COMMAND") {
        Some(command) => command,
        None => {
            if let Err(e) = app.print_long_help() {
                debug!("could not print help: {}", e);
            }
            println!();
            return;
        }
    };

    let result = command.parse::<Verb>().and_then(|verb| {
        let store = JsonFileStore::new(&settings.config_path);
        let mut dispatcher = Dispatcher::new(ArduinoCli::new(settings), store);
        dispatcher.run(verb)
    });

    // Every failure ends up here. The tool stays low-ceremony: report and
    // exit normally.
    if let Err(e) = result {
        println!("{}: {}", style("error").red(), e);
        if let ab::Error::UnknownCommand(_) = e {
            println!(
                "   {} expected one of {}; run `{} --help` for details",
                style("-->").cyan(),
                Verb::NAMES.join(", "),
                crate_name!()
            );
        }
    }
}
