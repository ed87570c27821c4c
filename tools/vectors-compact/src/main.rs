use clap::{Arg, Command};
use khmer_news_rs::lexicon::Lexicon;
use khmer_news_rs::vectors::{VectorTable, WordVectors};
use tracing::info;
use tracing_subscriber::EnvFilter;

const DEFAULT_VOCAB_LIMIT: usize = 50_000;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    const BLUE: &str = "\x1B[1;34m"; // Bold Blue
    const RESET: &str = "\x1B[0m"; // Reset color

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let matches = Command::new("Vectors Compactor")
        .arg(
            Arg::new("input")
                .short('i')
                .long("input")
                .value_name("file")
                .required(true)
                .help("Source file: a fastText .vec table or a lexicon word list."),
        )
        .arg(
            Arg::new("output")
                .short('o')
                .long("output")
                .value_name("filename")
                .help(
                    "Write the compacted file to <filename>. \
                     If not specified, a default filename is used.",
                ),
        )
        .arg(
            Arg::new("kind")
                .short('k')
                .long("kind")
                .value_name("kind")
                .default_value("vectors")
                .help("Input kind: [vectors|lexicon]"),
        )
        .arg(
            Arg::new("limit")
                .short('l')
                .long("limit")
                .value_name("words")
                .value_parser(clap::value_parser!(usize))
                .help("Keep only the first <words> vectors (default 50000)."),
        )
        .arg(
            Arg::new("format")
                .short('f')
                .long("format")
                .value_name("format")
                .default_value("zstd")
                .help("Output format: [zstd|json]"),
        )
        .about(format!(
            "{BLUE}Vectors Compact: Command Line model compactor for khmer-news-rs{RESET}"
        ))
        .get_matches();

    let input_file = matches
        .get_one::<String>("input")
        .map(String::as_str)
        .unwrap_or_default();
    let kind = matches.get_one::<String>("kind").map(String::as_str);
    let format = matches.get_one::<String>("format").map(String::as_str);

    let default_output = match (kind, format) {
        (Some("lexicon"), Some("zstd")) => "lexicon.json.zst",
        (Some("lexicon"), Some("json")) => "lexicon.json",
        (_, Some("zstd")) => "vectors.json.zst",
        (_, Some("json")) => "vectors.json",
        _ => "vectors.unknown",
    };
    let output_file = matches
        .get_one::<String>("output")
        .map(|s| s.as_str())
        .unwrap_or(default_output);

    match kind {
        Some("vectors") => {
            let limit = matches
                .get_one::<usize>("limit")
                .copied()
                .unwrap_or(DEFAULT_VOCAB_LIMIT);
            let table = VectorTable::from_vec_path(input_file)?;
            let compact = table.compact(limit);
            info!(
                source_words = table.len(),
                kept_words = compact.len(),
                dimension = compact.dimension(),
                "compacted vector table"
            );
            match format {
                Some("zstd") => {
                    compact.save_compressed(output_file)?;
                    eprintln!("{BLUE}Vectors saved in ZSTD format at: {output_file}{RESET}");
                }
                Some("json") => {
                    compact.save_json(output_file)?;
                    eprintln!("{BLUE}Vectors saved in JSON format at: {output_file}{RESET}");
                }
                other => {
                    let format_str = other.unwrap_or("unknown");
                    eprintln!("{BLUE}Unsupported format: {format_str}{RESET}");
                }
            }
        }
        Some("lexicon") => {
            let lexicon = Lexicon::from_path(input_file)?;
            match format {
                Some("zstd") => {
                    lexicon.save_compressed(output_file)?;
                    eprintln!("{BLUE}Lexicon saved in ZSTD format at: {output_file}{RESET}");
                }
                Some("json") => {
                    lexicon.serialize_to_json(output_file)?;
                    eprintln!("{BLUE}Lexicon saved in JSON format at: {output_file}{RESET}");
                }
                other => {
                    let format_str = other.unwrap_or("unknown");
                    eprintln!("{BLUE}Unsupported format: {format_str}{RESET}");
                }
            }
        }
        other => {
            let kind_str = other.unwrap_or("unknown");
            eprintln!("{BLUE}Unsupported kind: {kind_str}{RESET}");
        }
    }

    Ok(())
}
