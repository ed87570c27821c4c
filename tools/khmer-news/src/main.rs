use std::fs::File;
use std::io::{self, BufWriter, Read, Write};
use std::path::{Path, PathBuf};

use clap::{Arg, ArgAction, Command};
use encoding_rs::Encoding;
use encoding_rs_io::DecodeReaderBytesBuilder;
use tracing::info;
use tracing_subscriber::EnvFilter;

use khmer_news_rs::config::{default_search_bases, find_model_directory};
use khmer_news_rs::demo::KeywordClassifier;
use khmer_news_rs::resources::SharedModels;
use khmer_news_rs::result::export_result_json;
use khmer_news_rs::{format_extracted_text, EmbeddingMethod, SessionHistory};

const FORMAT_LIST: [&str; 2] = ["text", "json"];

fn main() -> Result<(), Box<dyn std::error::Error>> {
    const BLUE: &str = "\x1B[1;34m";
    const RESET: &str = "\x1B[0m";

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    let matches = Command::new("Khmer News Classifier")
        .arg(
            Arg::new("input")
                .short('i')
                .long("input")
                .value_name("file")
                .help("Read news text from <file>. A .pdf file has its text extracted first."),
        )
        .arg(
            Arg::new("output")
                .short('o')
                .long("output")
                .value_name("file")
                .help("Write classification results to <file>."),
        )
        .arg(
            Arg::new("model_dir")
                .short('m')
                .long("model-dir")
                .value_name("dir")
                .help("Model directory holding config.json (searched for when omitted)."),
        )
        .arg(
            Arg::new("method")
                .long("method")
                .value_name("method")
                .help("Override the embedding method: [mean|weighted]"),
        )
        .arg(
            Arg::new("format")
                .short('f')
                .long("format")
                .value_name("format")
                .default_value("text")
                .help("Output format: [text|json]"),
        )
        .arg(
            Arg::new("lines")
                .short('l')
                .long("lines")
                .action(ArgAction::SetTrue)
                .help("Classify every non-empty input line as a separate article."),
        )
        .arg(
            Arg::new("demo")
                .long("demo")
                .action(ArgAction::SetTrue)
                .help("Keyword-based demo mode, no model files required."),
        )
        .arg(
            Arg::new("in_enc")
                .long("in-enc")
                .value_name("encoding")
                .default_value("UTF-8")
                .help("Encoding for input"),
        )
        .about(format!(
            "{BLUE}Khmer News: Command Line Khmer News Classifier{RESET}"
        ))
        .get_matches();

    let format = matches.get_one::<String>("format").map_or("text", String::as_str);
    if !FORMAT_LIST.contains(&format) {
        eprintln!("Invalid format: {format}");
        eprintln!("Valid formats are: [text|json]");
        return Ok(());
    }

    let input_file = matches.get_one::<String>("input");
    let output_file = matches.get_one::<String>("output");
    let in_enc = matches.get_one::<String>("in_enc").map_or("UTF-8", String::as_str);

    if input_file.is_none() {
        eprintln!("{BLUE}Input Khmer text to classify, <ctrl-z> or <ctrl-d> to submit:{RESET}");
    }
    let input_str = read_input(input_file.map(String::as_str), in_enc)?;

    let documents: Vec<&str> = if matches.get_flag("lines") {
        input_str.lines().map(str::trim).filter(|l| !l.is_empty()).collect()
    } else {
        vec![input_str.as_str()]
    };

    let output: Box<dyn Write> = match output_file {
        Some(file_name) => Box::new(File::create(file_name)?),
        None => Box::new(io::stdout()),
    };
    let mut output_buf = BufWriter::new(output);

    if matches.get_flag("demo") {
        let demo = KeywordClassifier::new();
        for document in &documents {
            let result = demo.classify(document);
            match format {
                "json" => writeln!(output_buf, "{}", serde_json::to_string_pretty(&result)?)?,
                _ => writeln!(
                    output_buf,
                    "{} ({:.1}%) [demo]",
                    result.prediction.label(),
                    result.confidence.get(&result.prediction).copied().unwrap_or(0.0) * 100.0
                )?,
            }
        }
        output_buf.flush()?;
        return Ok(());
    }

    let model_dir = match matches.get_one::<String>("model_dir") {
        Some(dir) => PathBuf::from(dir),
        None => find_model_directory(default_search_bases())?,
    };
    let models = SharedModels::new(model_dir);
    let mut classifier = (*models.get()?).clone();
    if let Some(method) = matches.get_one::<String>("method") {
        let method = EmbeddingMethod::try_from(method.as_str())
            .map_err(|_| format!("Invalid embedding method: {method}"))?;
        classifier = classifier.with_embedding_method(method);
    }
    info!(
        documents = documents.len(),
        method = classifier.embedding_method().as_str(),
        "classifying"
    );

    let mut history = SessionHistory::new();
    for result in classifier.classify_batch(documents.as_slice()) {
        history.push(result);
    }

    match format {
        "json" if history.len() == 1 => {
            if let Some(result) = history.latest() {
                writeln!(output_buf, "{}", export_result_json(result)?)?;
            }
        }
        "json" => writeln!(output_buf, "{}", history.export_json()?)?,
        _ => {
            for result in &history {
                writeln!(
                    output_buf,
                    "{} ({:.1}%) [{}] {:.3}s",
                    result.prediction.label(),
                    result.prediction_confidence() * 100.0,
                    result.prediction_id,
                    result.processing_time.as_secs_f64()
                )?;
                for (category, p) in &result.confidence {
                    writeln!(output_buf, "  {:<12} {:>6.2}%", category.label(), p * 100.0)?;
                }
            }
        }
    }
    output_buf.flush()?;

    eprintln!(
        "{BLUE}Classification completed: {} -> {} ({} article(s)){RESET}",
        input_file.map_or("<stdin>", String::as_str),
        output_file.map_or("stdout", String::as_str),
        history.len()
    );

    Ok(())
}

fn read_input(
    input_file: Option<&str>,
    in_enc: &str,
) -> Result<String, Box<dyn std::error::Error>> {
    if let Some(file_name) = input_file.filter(|f| is_pdf(f)) {
        return read_pdf(file_name);
    }
    let mut input: Box<dyn Read> = match input_file {
        Some(file_name) => Box::new(File::open(file_name)?),
        None => Box::new(io::stdin()),
    };

    let mut input_str = String::new();
    if in_enc.eq_ignore_ascii_case("UTF-8") {
        input.read_to_string(&mut input_str)?;
        return Ok(input_str);
    }

    let mut bytes = Vec::new();
    input.read_to_end(&mut bytes)?;
    let encoding = Encoding::for_label(in_enc.as_bytes()).ok_or_else(|| {
        let err_msg = format!("Unsupported input encoding: {}", in_enc);
        eprintln!("{}", &err_msg);
        io::Error::new(io::ErrorKind::Other, err_msg)
    })?;
    let mut decoder = DecodeReaderBytesBuilder::new()
        .encoding(Some(encoding))
        .build(&*bytes);
    decoder.read_to_string(&mut input_str)?;
    Ok(input_str)
}

fn is_pdf(file_name: &str) -> bool {
    Path::new(file_name)
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("pdf"))
}

fn read_pdf(file_name: &str) -> Result<String, Box<dyn std::error::Error>> {
    let raw = pdf_extract::extract_text(file_name)
        .map_err(|e| format!("Error extracting text from PDF {file_name}: {e}"))?;
    if raw.trim().is_empty() {
        return Err(format!("No extractable text in PDF: {file_name}").into());
    }
    info!(file = file_name, chars = raw.chars().count(), "extracted pdf text");
    Ok(format_extracted_text(&raw))
}
