use clap::{Arg, ArgAction, Command};
use i18n_ai_translate::{
    API_KEY_ENV, DEFAULT_PLACEHOLDER_PREFIX, DEFAULT_PLACEHOLDER_SUFFIX, FileTranslationOptions,
    GeminiBackend, GenerativeBackend, MockBackend, MockBackendMode, TranslateError,
    TranslateResult, all_language_codes, language_from_code, translate_file, translate_to_targets,
};
use std::path::PathBuf;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> TranslateResult<()> {
    dotenv::dotenv().ok();

    let directive = "i18n_ai_translate=info"
        .parse()
        .map_err(|e| TranslateError::ConfigError(format!("bad log directive: {e}")))?;
    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env().add_directive(directive))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let matches = Command::new("i18n-ai-translate")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Batch-translate nested JSON i18n files via a generative backend")
        .arg(
            Arg::new("input")
                .long("input")
                .short('i')
                .help("Source i18n JSON file; the file name must embed an ISO 639-1 code")
                .required(true),
        )
        .arg(
            Arg::new("output")
                .long("output")
                .short('o')
                .help("Output i18n JSON file (single-target mode)"),
        )
        .arg(
            Arg::new("force-language-name")
                .long("force-language-name")
                .short('f')
                .help("Force the target language name instead of detecting it from the output file name"),
        )
        .arg(
            Arg::new("all-languages")
                .long("all-languages")
                .short('A')
                .help("Translate to all supported languages")
                .action(ArgAction::SetTrue)
                .conflicts_with("languages"),
        )
        .arg(
            Arg::new("languages")
                .long("languages")
                .short('l')
                .help("Target language codes to translate to")
                .num_args(1..)
                .action(ArgAction::Append),
        )
        .arg(
            Arg::new("templated-string-prefix")
                .long("templated-string-prefix")
                .short('p')
                .help("Prefix for templated strings")
                .default_value(DEFAULT_PLACEHOLDER_PREFIX),
        )
        .arg(
            Arg::new("templated-string-suffix")
                .long("templated-string-suffix")
                .short('s')
                .help("Suffix for templated strings")
                .default_value(DEFAULT_PLACEHOLDER_SUFFIX),
        )
        .arg(
            Arg::new("key")
                .long("key")
                .short('k')
                .help("API key (overrides the API_KEY environment variable)"),
        )
        .arg(
            Arg::new("mock")
                .long("mock")
                .short('m')
                .help("Use the offline mock backend instead of the real API")
                .action(ArgAction::SetTrue),
        )
        .get_matches();

    let input_path = PathBuf::from(matches.get_one::<String>("input").expect("required"));
    let prefix = matches
        .get_one::<String>("templated-string-prefix")
        .expect("has default")
        .clone();
    let suffix = matches
        .get_one::<String>("templated-string-suffix")
        .expect("has default")
        .clone();
    let all_languages = matches.get_flag("all-languages");
    let languages: Option<Vec<String>> = matches
        .get_many::<String>("languages")
        .map(|values| values.cloned().collect());
    let forced_language_name = matches.get_one::<String>("force-language-name").cloned();

    let backend: Box<dyn GenerativeBackend> = if matches.get_flag("mock") {
        Box::new(MockBackend::new(MockBackendMode::Echo))
    } else {
        let api_key = matches
            .get_one::<String>("key")
            .cloned()
            .or_else(|| std::env::var(API_KEY_ENV).ok());
        let Some(api_key) = api_key else {
            eprintln!("{} not found; pass --key or set it in .env", API_KEY_ENV);
            return Err(TranslateError::ConfigError("missing API key".to_string()));
        };
        Box::new(GeminiBackend::new(api_key)?)
    };

    if !all_languages && languages.is_none() {
        // Mode (a): one explicit output path.
        let Some(output) = matches.get_one::<String>("output") else {
            eprintln!("Output file not specified");
            return Err(TranslateError::ConfigError(
                "output file not specified".to_string(),
            ));
        };

        let options = FileTranslationOptions {
            input_path,
            output_path: PathBuf::from(output),
            forced_language_name,
            placeholder_prefix: prefix,
            placeholder_suffix: suffix,
        };
        translate_file(backend.as_ref(), &options).await?;
    } else if let Some(codes) = languages {
        // Mode (b): explicit list of target codes.
        if forced_language_name.is_some() {
            eprintln!("Cannot use both --languages and --force-language-name");
            return Err(TranslateError::ConfigError(
                "conflicting language options".to_string(),
            ));
        }
        if codes.is_empty() {
            eprintln!("No languages specified");
            return Err(TranslateError::ConfigError(
                "empty language list".to_string(),
            ));
        }

        let names: Vec<&str> = codes
            .iter()
            .filter_map(|code| language_from_code(code).map(|l| l.name))
            .collect();
        println!("Translating to {}...", names.join(", "));

        translate_to_targets(backend.as_ref(), &input_path, &codes, &prefix, &suffix).await?;
    } else {
        // Mode (c): every supported language.
        if forced_language_name.is_some() {
            eprintln!("Cannot use both --all-languages and --force-language-name");
            return Err(TranslateError::ConfigError(
                "conflicting language options".to_string(),
            ));
        }

        eprintln!("Some languages may fail to translate due to the model's limitations");
        let codes: Vec<String> = all_language_codes().map(str::to_string).collect();
        translate_to_targets(backend.as_ref(), &input_path, &codes, &prefix, &suffix).await?;
    }

    Ok(())
}
