//! Command-line interface for hanyu.

use clap::Parser;
use hanyu::{
    AnnotationFormat, CaseType, CharAnnotation, ConversionError, FormatError, OutputFormat,
    Pinyin, ToneType, VCharType,
};
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;
use std::fs;
use std::io::{self, BufRead, BufReader, BufWriter, IsTerminal, Write};
use std::path::PathBuf;
use thiserror::Error;
use unicode_width::UnicodeWidthStr;

#[derive(Error, Debug)]
enum HanyuError {
    #[error("Failed to open input file '{path}': {source}")]
    InputFileOpen { path: PathBuf, source: io::Error },

    #[error("Failed to create output file '{path}': {source}")]
    OutputFileCreate { path: PathBuf, source: io::Error },

    #[error(transparent)]
    Io(#[from] io::Error),

    #[error("REPL error: {0}")]
    Repl(#[from] ReadlineError),

    #[error("Invalid output format: {0}")]
    Format(#[from] FormatError),

    #[error("Conversion failed: {0}")]
    Conversion(#[from] ConversionError),
}

#[derive(Parser, Debug)]
#[command(version, about)]
struct Cli {
    /// Direct text input; every character is annotated with its pinyin.
    #[arg(value_name = "DIRECT_INPUT")]
    direct_input: Vec<String>,

    /// Input file path (default: stdin).
    #[arg(short, long, value_name = "FILE")]
    input_filename: Option<PathBuf>,

    /// Output file path (default: stdout).
    #[arg(short, long, value_name = "FILE")]
    output_filename: Option<PathBuf>,

    /// Tone notation of the rendered syllables.
    #[arg(short, long, value_enum, default_value_t = ToneType::default())]
    tone_type: ToneType,

    /// Spelling of the `ü` vowel.
    #[arg(long, value_enum, default_value_t = VCharType::default())]
    v_char: VCharType,

    /// Render syllables in uppercase.
    #[arg(short, long, action = clap::ArgAction::SetTrue)]
    uppercase: bool,

    /// Output layout. 'json' provides one annotation array per line.
    #[arg(short = 'f', long, value_enum, default_value_t = AnnotationFormat::default())]
    output_format: AnnotationFormat,

    /// Limit processing to the first n lines of a file.
    #[arg(long)]
    max_lines: Option<usize>,

    /// Suppress progress indicators.
    #[arg(long, action = clap::ArgAction::SetTrue)]
    silent: bool,
}

impl Cli {
    fn format(&self) -> OutputFormat {
        OutputFormat {
            tone_type: self.tone_type,
            v_char_type: self.v_char,
            case_type: if self.uppercase {
                CaseType::Upper
            } else {
                CaseType::Lower
            },
        }
    }
}

fn main() {
    if let Err(err) = run() {
        if let HanyuError::Io(e) = &err
            && e.kind() == io::ErrorKind::BrokenPipe
        {
            return;
        }

        eprintln!("Error: {}", err);
        std::process::exit(1);
    }
}

fn run() -> Result<(), HanyuError> {
    let cli = Cli::parse();
    cli.format().validate()?;

    let pinyin = Pinyin::new();

    if cli.direct_input.is_empty() && cli.input_filename.is_none() && io::stdin().is_terminal() {
        run_repl(&pinyin, &cli)?;
        return Ok(());
    }

    let mut writer = get_writer(&cli.output_filename)?;

    if !cli.direct_input.is_empty() {
        process_direct_input(&pinyin, &cli, &mut writer)?;
    }

    if cli.input_filename.is_some() || cli.direct_input.is_empty() {
        process_stream(&pinyin, &cli, &mut writer)?;
    }

    writer.flush()?;

    Ok(())
}

fn process_direct_input(
    pinyin: &Pinyin,
    cli: &Cli,
    writer: &mut dyn Write,
) -> Result<(), HanyuError> {
    let format = cli.format();
    for s in &cli.direct_input {
        let result = pinyin.convert_line(s, &format, cli.output_format)?;
        writeln!(writer, "{}", result.to_output_string()?)?;
    }
    Ok(())
}

fn process_stream(pinyin: &Pinyin, cli: &Cli, writer: &mut dyn Write) -> Result<(), HanyuError> {
    let reader = get_reader(&cli.input_filename)?;

    pinyin.convert_file(
        reader,
        writer,
        &cli.format(),
        cli.output_format,
        cli.max_lines,
        cli.silent,
    )?;
    Ok(())
}

fn get_reader(path: &Option<PathBuf>) -> Result<Box<dyn BufRead>, HanyuError> {
    match path {
        Some(p) => {
            let file = fs::File::open(p).map_err(|e| HanyuError::InputFileOpen {
                path: p.clone(),
                source: e,
            })?;
            Ok(Box::new(BufReader::new(file)))
        }
        None => Ok(Box::new(BufReader::new(io::stdin()))),
    }
}

fn get_writer(path: &Option<PathBuf>) -> Result<Box<dyn Write>, HanyuError> {
    match path {
        Some(p) => {
            let file = fs::File::create(p).map_err(|e| HanyuError::OutputFileCreate {
                path: p.clone(),
                source: e,
            })?;
            Ok(Box::new(BufWriter::new(file)))
        }
        None => Ok(Box::new(BufWriter::new(io::stdout()))),
    }
}

fn run_repl(pinyin: &Pinyin, cli: &Cli) -> Result<(), HanyuError> {
    let mut rl = DefaultEditor::new()?;

    let history_path = || -> Option<PathBuf> {
        let mut path = dirs::cache_dir()?;
        path.push("hanyu");
        fs::create_dir_all(&path).ok()?;
        path.push("history.txt");
        Some(path)
    };

    if let Some(path) = history_path()
        && rl.load_history(&path).is_err()
    {}

    let format = cli.format();

    loop {
        let readline = rl.readline(">> ");

        match readline {
            Ok(line) => {
                rl.add_history_entry(&line)?;

                if line.trim() == ":exit" || line.trim() == ":quit" {
                    break;
                }

                if line.trim().is_empty() {
                    continue;
                }

                match pinyin.annotate(line.trim(), &format) {
                    Ok(annotations) => print_annotations(&annotations),
                    Err(e) => eprintln!("Conversion error: {}", e),
                }
            }
            Err(ReadlineError::Interrupted) => {
                println!("Interrupted. To exit, press Ctrl-D or type :exit.");
                continue;
            }
            Err(ReadlineError::Eof) => {
                println!("Exiting.");
                break;
            }
            Err(err) => {
                eprintln!("REPL Error: {}", err);
                break;
            }
        }
    }

    if let Some(path) = history_path()
        && let Err(err) = rl.save_history(&path)
    {
        eprintln!("Warning: could not save history to {:?}: {}", path, err);
    }

    Ok(())
}

fn print_annotations(annotations: &[CharAnnotation]) {
    let column = annotations
        .iter()
        .map(|annotation| annotation.grapheme.width())
        .max()
        .unwrap_or(0);

    for annotation in annotations {
        if annotation.grapheme.trim().is_empty() {
            continue;
        }
        let readings = match &annotation.pinyin {
            Some(readings) => readings.join(", "),
            None => "-".to_string(),
        };
        let pad = column.saturating_sub(annotation.grapheme.width());
        println!("{}{}  {}", annotation.grapheme, " ".repeat(pad), readings);
    }
}
