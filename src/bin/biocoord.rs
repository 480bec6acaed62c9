//! A binary that reads a GFF3, PSL, or FASTA file and prints either the
//! normalized interval of every record or the records themselves in their
//! canonical form.
//!
//! ```shell
//! cargo run --release --bin=biocoord --features=binaries -- genes.gff3.gz
//! ```

use std::fs::File;
use std::io;
use std::io::BufRead;
use std::io::BufReader;
use std::io::BufWriter;
use std::io::Write;
use std::path::PathBuf;

use anyhow::Context;
use anyhow::Result;
use anyhow::bail;
use biocoord::ErrorKind;
use biocoord::Format;
use biocoord::Reader;
use biocoord::Record;
use biocoord::fasta;
use biocoord::gff3;
use biocoord::options::Builder;
use biocoord::options::DEFAULT_WRAP_WIDTH;
use biocoord::psl;
use clap::Parser;
use clap::ValueEnum;
use clap_verbosity_flag::Verbosity;
use flate2::read::MultiGzDecoder;
use tracing::error;
use tracing::info;
use tracing_log::AsTrace as _;
use tracing_subscriber::EnvFilter;

/// The identifier that reads from standard input.
const STDIN: &str = "-";

/// The extensions of gzip-compressed inputs.
const GZIP_EXTENSIONS: &[&str] = &["gz", "bgz"];

////////////////////////////////////////////////////////////////////////////////////////
// Output
////////////////////////////////////////////////////////////////////////////////////////

/// What to print for each record.
#[derive(Clone, Copy, Debug, Eq, PartialEq, ValueEnum)]
enum Emit {
    /// The normalized interval (`reference\tstart\tend\tstrand`).
    Intervals,

    /// The record, re-serialized in its native format.
    Records,
}

/// A destination for records.
enum Output<W>
where
    W: Write,
{
    /// Normalized intervals.
    Intervals(W),

    /// GFF3 records.
    Gff3(gff3::Writer<W>),

    /// PSL records.
    Psl(psl::Writer<W>),

    /// FASTA records.
    Fasta(fasta::Writer<W>),
}

impl<W> Output<W>
where
    W: Write,
{
    /// Creates the output for a format.
    fn new(inner: W, emit: Emit, format: Format, wrap_width: usize) -> Self {
        match (emit, format) {
            (Emit::Intervals, _) => Output::Intervals(inner),
            (Emit::Records, Format::Gff3) => Output::Gff3(gff3::Writer::new(inner)),
            (Emit::Records, Format::Psl) => Output::Psl(psl::Writer::new(inner)),
            (Emit::Records, Format::Fasta) => {
                Output::Fasta(fasta::Writer::with_wrap_width(inner, wrap_width))
            }
        }
    }

    /// Writes a record.
    fn write(&mut self, record: &Record) -> io::Result<()> {
        match (self, record) {
            (Output::Intervals(inner), record) => {
                let interval = record.interval();
                writeln!(
                    inner,
                    "{}\t{}\t{}\t{}",
                    interval.reference(),
                    interval.start(),
                    interval.end(),
                    interval.strand()
                )
            }
            (Output::Gff3(writer), Record::Gff3(record)) => writer.write_record(record),
            (Output::Psl(writer), Record::Psl(record)) => writer.write_record(record),
            (Output::Fasta(writer), Record::Fasta(record)) => writer.write_record(record),
            (_, record) => Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("cannot write a {} record to this output", record.format()),
            )),
        }
    }

    /// Consumes self and returns the inner writer.
    fn into_inner(self) -> W {
        match self {
            Output::Intervals(inner) => inner,
            Output::Gff3(writer) => writer.into_inner(),
            Output::Psl(writer) => writer.into_inner(),
            Output::Fasta(writer) => writer.into_inner(),
        }
    }
}

////////////////////////////////////////////////////////////////////////////////////////
// Main
////////////////////////////////////////////////////////////////////////////////////////

/// Normalizes the coordinates of genomic records.
#[derive(Parser)]
struct Args {
    /// The file to read (`-` reads from standard input). Files ending in
    /// `.gz` or `.bgz` are decompressed.
    src: String,

    /// The format of the file, if it cannot be determined from the file name
    /// (`gff3`, `psl`, or `fasta`).
    #[arg(short, long)]
    format: Option<Format>,

    /// Reports and skips malformed records instead of stopping at the first
    /// one.
    #[arg(short, long, default_value_t = false)]
    keep_going: bool,

    /// Accepts GFF3 attributes that have no value.
    #[arg(long, default_value_t = false)]
    lenient_attributes: bool,

    /// The number of sequence characters per line when writing FASTA (`0`
    /// disables wrapping).
    #[arg(long, default_value_t = DEFAULT_WRAP_WIDTH)]
    wrap_width: usize,

    /// What to print for each record.
    #[arg(short, long, value_enum, default_value_t = Emit::Intervals)]
    emit: Emit,

    #[command(flatten)]
    verbose: Verbosity,
}

/// Opens the input, decompressing it if needed.
fn open(src: &str) -> Result<Box<dyn BufRead>> {
    if src == STDIN {
        return Ok(Box::new(BufReader::new(io::stdin())));
    }

    let path = PathBuf::from(src);
    let file = File::open(&path).with_context(|| format!("opening {}", path.display()))?;

    let compressed = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| GZIP_EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str()));

    match compressed {
        true => Ok(Box::new(BufReader::new(MultiGzDecoder::new(file)))),
        false => Ok(Box::new(BufReader::new(file))),
    }
}

/// Reads every record and writes it to standard output.
fn run(args: &Args) -> Result<()> {
    let options = Builder::default()
        .fail_fast(!args.keep_going)
        .strict_attributes(!args.lenient_attributes)
        .wrap_width(args.wrap_width)
        .build();

    let inner = open(&args.src)?;
    let mut reader = Reader::open(&args.src, args.format, inner, options)
        .with_context(|| format!("opening {}", args.src))?;

    info!("reading {} as {}", args.src, reader.format());

    let stdout = BufWriter::new(io::stdout().lock());
    let wrap_width = reader.options().wrap_width();
    let mut output = Output::new(stdout, args.emit, reader.format(), wrap_width);

    let mut written = 0usize;
    let mut skipped = 0usize;

    for result in reader.records() {
        match result {
            Ok(record) => {
                output.write(&record).context("writing record")?;
                written += 1;
            }
            Err(err) if args.keep_going && err.kind() == ErrorKind::MalformedRecord => {
                error!("{err}");
                skipped += 1;
            }
            Err(err) => return Err(err).with_context(|| format!("reading {}", args.src)),
        }
    }

    output.into_inner().flush().context("flushing output")?;

    info!("wrote {written} record(s)");

    if skipped > 0 {
        bail!("{skipped} malformed record(s) were skipped");
    }

    Ok(())
}

fn main() -> Result<()> {
    let args = Args::parse();

    match std::env::var("RUST_LOG") {
        Ok(_) => tracing_subscriber::fmt()
            .with_env_filter(EnvFilter::from_default_env())
            .with_writer(io::stderr)
            .init(),
        Err(_) => tracing_subscriber::fmt()
            .with_max_level(args.verbose.log_level_filter().as_trace())
            .with_writer(io::stderr)
            .init(),
    };

    run(&args)
}
