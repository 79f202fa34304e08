use legenda::{Orientation, OutputFormat, fetch_document, parse_colormaps};

#[derive(Debug)]
enum CliError {
    Usage(&'static str),
    BadOrientation(String),
    BadFormat(String),
    Io(std::io::Error),
    Legend(legenda::GenerateError),
}

impl std::fmt::Display for CliError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CliError::Usage(msg) => write!(f, "{msg}"),
            CliError::BadOrientation(raw) => write!(
                f,
                "{raw} is not a valid legend orientation. Please choose horizontal or vertical."
            ),
            CliError::BadFormat(raw) => write!(
                f,
                "{raw} is not a valid output format. Supported formats: eps, pdf, pgf, png, ps, raw, rgba, svg, svgz."
            ),
            CliError::Io(err) => write!(f, "I/O error: {err}"),
            CliError::Legend(err) => write!(f, "{err}"),
        }
    }
}

impl From<std::io::Error> for CliError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<legenda::Error> for CliError {
    fn from(value: legenda::Error) -> Self {
        Self::Legend(value.into())
    }
}

impl From<legenda::GenerateError> for CliError {
    fn from(value: legenda::GenerateError) -> Self {
        Self::Legend(value)
    }
}

#[derive(Debug)]
enum Invocation {
    Run(Args),
    Help,
}

#[derive(Debug)]
struct Args {
    colormap: String,
    output: String,
    format: OutputFormat,
    orientation: Orientation,
    verbose: bool,
}

fn usage() -> &'static str {
    "legenda-cli\n\
\n\
USAGE:\n\
  legenda-cli --colormap <file-or-url> --output <file> [OPTIONS]\n\
\n\
OPTIONS:\n\
  -c, --colormap <file-or-url>   Full path or URL of the colormap file\n\
  -o, --output <file>            The full path of the output file\n\
  -f, --format <format>          Format of the output file: eps, pdf, pgf, png, ps, raw, rgba, svg (default), svgz\n\
  -r, --orientation <direction>  Orientation of the legend: horizontal or vertical (default)\n\
  -v, --verbose                  Print out detailed log messages\n\
  -h, --help                     Show this help\n\
"
}

fn parse_args(argv: &[String]) -> Result<Invocation, CliError> {
    let mut colormap: Option<String> = None;
    let mut output: Option<String> = None;
    let mut format = OutputFormat::Svg;
    let mut orientation = Orientation::Vertical;
    let mut verbose = false;

    let mut it = argv.iter().skip(1);
    while let Some(a) = it.next() {
        match a.as_str() {
            "--help" | "-h" => return Ok(Invocation::Help),
            "--colormap" | "-c" => {
                let Some(value) = it.next() else {
                    return Err(CliError::Usage(usage()));
                };
                colormap = Some(value.clone());
            }
            "--output" | "-o" => {
                let Some(value) = it.next() else {
                    return Err(CliError::Usage(usage()));
                };
                output = Some(value.clone());
            }
            "--format" | "-f" => {
                let Some(value) = it.next() else {
                    return Err(CliError::Usage(usage()));
                };
                format = OutputFormat::parse(value)
                    .ok_or_else(|| CliError::BadFormat(value.clone()))?;
            }
            "--orientation" | "-r" => {
                let Some(value) = it.next() else {
                    return Err(CliError::Usage(usage()));
                };
                orientation = Orientation::parse(value)
                    .ok_or_else(|| CliError::BadOrientation(value.clone()))?;
            }
            "--verbose" | "-v" => verbose = true,
            _ => return Err(CliError::Usage(usage())),
        }
    }

    let Some(colormap) = colormap else {
        return Err(CliError::Usage("colormap file must be specified...exiting"));
    };
    let Some(output) = output else {
        return Err(CliError::Usage("output file must be specified...exiting"));
    };

    Ok(Invocation::Run(Args {
        colormap,
        output,
        format,
        orientation,
        verbose,
    }))
}

fn run(args: Args) -> Result<(), CliError> {
    if args.verbose {
        tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::new("debug"))
            .init();
    }

    let text = fetch_document(&args.colormap)?;
    let maps = parse_colormaps(&text)?;
    let generated = legenda::generate_legend(&maps, args.format, args.orientation)?;
    std::fs::write(&args.output, &generated.bytes)?;
    if generated.tooltips_applied {
        println!("SVG tooltips added");
    }
    println!("{} generated successfully", args.output);
    Ok(())
}

fn main() {
    let args = match parse_args(&std::env::args().collect::<Vec<_>>()) {
        Ok(Invocation::Help) => {
            print!("{}", usage());
            return;
        }
        Ok(Invocation::Run(v)) => v,
        Err(err @ (CliError::Usage(_) | CliError::BadOrientation(_) | CliError::BadFormat(_))) => {
            eprintln!("{err}");
            std::process::exit(2);
        }
        Err(err) => {
            eprintln!("{err}");
            std::process::exit(1);
        }
    };

    match run(args) {
        Ok(()) => {}
        Err(err) => {
            eprintln!("{err}");
            std::process::exit(1);
        }
    }
}
