#![allow(clippy::print_stderr)]

use anyhow::{bail, Context};
use clap::{Parser, ValueHint};
use kestrel_io::{
    GuessParser, RdfParser, RdfSerializer, RdfSyntax, SyntaxOption, WriterQuadSerializer,
};
use kestrel_iri::path_to_file_iri;
use std::fs::File;
use std::io::{stdin, stdout, BufWriter, Read, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

/// Converts RDF data between concrete syntaxes.
///
/// Inputs are file paths, or '-' for standard input; the result is written
/// to standard output.
#[derive(Parser)]
#[command(about, version, name = "kestrel")]
struct Args {
    /// Syntax of the input files; guessed from the suffix and the content
    /// when absent.
    #[arg(short, long)]
    from: Option<RdfSyntaxArg>,
    /// Syntax to serialize to.
    #[arg(short, long, default_value = "ntriples")]
    to: RdfSyntaxArg,
    /// Base IRI against which relative IRIs of the input are resolved.
    #[arg(short, long)]
    base: Option<String>,
    /// Parser tunable, as NAME=VALUE. May be repeated.
    #[arg(long = "input-option", value_name = "NAME=VALUE")]
    input_options: Vec<String>,
    /// Skip expensive validations on trusted input.
    #[arg(long)]
    lenient: bool,
    /// Input files, or '-' for standard input.
    #[arg(value_hint = ValueHint::FilePath, default_value = "-")]
    inputs: Vec<PathBuf>,
}

/// A [`RdfSyntax`] argument parsed from its short name.
#[derive(Clone, Copy)]
struct RdfSyntaxArg(RdfSyntax);

impl std::str::FromStr for RdfSyntaxArg {
    type Err = kestrel_io::UnknownSyntaxError;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        name.parse().map(Self)
    }
}

fn main() -> ExitCode {
    let args = Args::parse();
    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("kestrel: {e:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: &Args) -> anyhow::Result<()> {
    let options = parse_input_options(&args.input_options)?;

    let stdout = stdout();
    let mut serializer = RdfSerializer::from_syntax(args.to.0)
        .with_prefix("rdf", "http://www.w3.org/1999/02/22-rdf-syntax-ns#")?
        .for_writer(BufWriter::new(stdout.lock()));

    for input in &args.inputs {
        if input.as_os_str() == "-" {
            convert(args, &options, stdin().lock(), None, &mut serializer)
                .context("reading standard input")?;
        } else {
            let file = File::open(input)
                .with_context(|| format!("opening {}", input.display()))?;
            convert(args, &options, file, Some(input), &mut serializer)
                .with_context(|| format!("converting {}", input.display()))?;
        }
    }

    serializer.finish()?.flush()?;
    Ok(())
}

fn convert<W: Write>(
    args: &Args,
    options: &[(SyntaxOption, bool)],
    reader: impl Read,
    path: Option<&Path>,
    serializer: &mut WriterQuadSerializer<W>,
) -> anyhow::Result<()> {
    let base = match (&args.base, path) {
        (Some(base), _) => Some(base.clone()),
        (None, Some(path)) => path
            .canonicalize()
            .ok()
            .and_then(|p| path_to_file_iri(&p).ok())
            .map(kestrel_iri::Iri::into_inner),
        (None, None) => None,
    };

    if let Some(syntax) = args.from.map(|s| s.0) {
        let mut parser = RdfParser::from_syntax(syntax);
        if let Some(base) = &base {
            parser = parser.with_base_iri(base).context("invalid base IRI")?;
        }
        if args.lenient {
            parser = parser.lenient();
        }
        for (option, value) in options {
            parser = parser.with_option(*option, *value)?;
        }
        for quad in parser.for_reader(reader) {
            serializer.serialize_quad(quad?.as_ref())?;
        }
    } else {
        let mut parser = GuessParser::new();
        if let Some(base) = &base {
            parser = parser.with_base_iri(base).context("invalid base IRI")?;
        }
        if let Some(path) = path {
            parser = parser.with_file_name(path.to_string_lossy());
        }
        if args.lenient {
            parser = parser.lenient();
        }
        for quad in parser.for_reader(reader) {
            serializer.serialize_quad(quad?.as_ref())?;
        }
    }
    Ok(())
}

fn parse_input_options(raw: &[String]) -> anyhow::Result<Vec<(SyntaxOption, bool)>> {
    raw.iter()
        .map(|pair| {
            let Some((name, value)) = pair.split_once('=') else {
                bail!("input options must be of the form NAME=VALUE, found '{pair}'");
            };
            let option: SyntaxOption = name.parse()?;
            let value = option.parse_value(value)?;
            Ok((option, value))
        })
        .collect()
}
