use std::error::Error;
use std::fs::{self, File};
use std::io::{self, BufReader, BufWriter, Write};
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing::info;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter, Layer};

use huffcode::{build_tree, compress, decompress, Alphabet, Bits, FrequencyTable, TreeSerializer};

#[derive(Parser, Debug)]
#[command(name = "huffcode", version, about = "Huffman code tables and table-driven decoding")]
struct Cli {
    /// Size of the symbol space; the end-of-data symbol is size + 1
    #[arg(long, env = "HUFFCODE_ALPHABET_SIZE", default_value_t = 256, global = true)]
    alphabet_size: u32,

    /// Verbosity, repeat for more (-d info, -dd debug, -ddd trace)
    #[arg(short = 'd', long = "debug", action = clap::ArgAction::Count, global = true)]
    debug: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Print the code table for a file
    Table { input: PathBuf },
    /// Write the code table and the packed message for a file
    Encode {
        input: PathBuf,
        #[arg(short, long)]
        table: PathBuf,
        #[arg(short, long)]
        output: PathBuf,
    },
    /// Decode a packed message using its code table
    Decode {
        payload: PathBuf,
        #[arg(short, long)]
        table: PathBuf,
        #[arg(short, long)]
        output: PathBuf,
    },
}

fn main() {
    let cli = Cli::parse();
    setup_logging(cli.debug);

    if let Err(e) = run(&cli) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run(cli: &Cli) -> Result<(), Box<dyn Error>> {
    let alphabet = Alphabet::new(cli.alphabet_size)?;
    match &cli.command {
        Commands::Table { input } => {
            let reader = BufReader::new(File::open(input)?);
            let frequencies = FrequencyTable::from_reader(alphabet, reader)?;
            let tree = build_tree(&frequencies);
            let stdout = io::stdout();
            let mut out = BufWriter::new(stdout.lock());
            let mut path_bits = Bits::new();
            let rows = TreeSerializer::new(&tree).write(&mut out, &mut path_bits)?;
            out.flush()?;
            info!(rows = rows.len(), bits = path_bits.len(), "printed code table");
        }
        Commands::Encode {
            input,
            table,
            output,
        } => {
            let data = fs::read(input)?;
            let mut table_out = BufWriter::new(File::create(table)?);
            let payload = compress(&data, alphabet, &mut table_out)?;
            table_out.flush()?;
            fs::write(output, &payload)?;
            info!(input = data.len(), output = payload.len(), "encoded {}", input.display());
        }
        Commands::Decode {
            payload,
            table,
            output,
        } => {
            let table_in = BufReader::new(File::open(table)?);
            let payload = fs::read(payload)?;
            let decoded = decompress(table_in, &payload, alphabet)?;
            fs::write(output, &decoded)?;
            info!(output = decoded.len(), "decoded into {}", output.display());
        }
    }
    Ok(())
}

fn setup_logging(verbosity: u8) {
    let level = match verbosity {
        0 => LevelFilter::WARN,
        1 => LevelFilter::INFO,
        2 => LevelFilter::DEBUG,
        _ => LevelFilter::TRACE,
    };
    // RUST_LOG wins over -d when set
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::default().add_directive(level.into()));

    let fmt_layer = fmt::layer()
        .with_writer(io::stderr)
        .with_target(true)
        .with_filter(filter);

    tracing_subscriber::registry().with(fmt_layer).init();
}
