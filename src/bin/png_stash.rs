use std::{
    fs,
    io::Write,
    path::{Path, PathBuf},
    time::Instant,
};

use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use log::info;
use png_stash::{DecoderConfig, EncoderConfig, PaddingStyle};

#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// Log what is being done
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Hide text or a file inside a PNG image
    Encode {
        /// Text to encode
        #[arg(short, long, conflicts_with = "file", required_unless_present = "file")]
        text: Option<String>,

        /// File to encode; its name is stored in the image
        #[arg(short, long)]
        file: Option<PathBuf>,

        /// Where to write the image
        #[arg(short, long, default_value = "output.png")]
        output: PathBuf,

        /// Pad with random bytes instead of random letters
        #[arg(long)]
        random_padding: bool,

        /// Leave out the Software text chunk
        #[arg(long)]
        no_software: bool,
    },
    /// Recover the text or file hidden in a PNG image
    Decode {
        /// Path to the image to decode
        #[arg(short, long)]
        path: PathBuf,

        /// Directory to write a recovered file into
        #[arg(short = 'd', long, default_value = ".")]
        dir: PathBuf,

        /// Accept chunks with bad checksums
        #[arg(long)]
        no_verify: bool,
    },
    /// Print the chunk layout of a PNG image as JSON
    Inspect {
        /// Path to the image to inspect
        #[arg(short, long)]
        path: PathBuf,
    },
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    let verbosity = if args.verbose {
        log::LevelFilter::Info
    } else {
        log::LevelFilter::Error
    };
    pretty_env_logger::formatted_builder()
        .filter_level(verbosity)
        .parse_default_env()
        .init();

    let start = Instant::now();
    match args.command {
        Command::Encode {
            text,
            file,
            output,
            random_padding,
            no_software,
        } => {
            let mut config = EncoderConfig::default();
            if random_padding {
                config = config.with_padding(PaddingStyle::Random);
            }
            if no_software {
                config = config.with_software(None);
            }
            let image = match (text, file) {
                (Some(text), _) => png_stash::encode_with(text.as_bytes(), None, &config)?,
                (None, Some(file)) => {
                    info!("Encoding file {}", file.display());
                    let content = fs::read(&file)
                        .with_context(|| format!("Couldn't read file {}", file.display()))?;
                    let file_name = file
                        .file_name()
                        .map(|name| name.to_string_lossy().into_owned());
                    png_stash::encode_with(&content, file_name.as_deref(), &config)?
                }
                (None, None) => bail!("Either --text or --file must be given"),
            };
            fs::write(&output, image)
                .with_context(|| format!("Couldn't write {}", output.display()))?;
        }
        Command::Decode {
            path,
            dir,
            no_verify,
        } => {
            info!("Decoding image {}", path.display());
            let bytes =
                fs::read(&path).with_context(|| format!("Couldn't open {}", path.display()))?;
            let config = DecoderConfig {
                verify_checksums: !no_verify,
            };
            let decoded = png_stash::decode_with(&bytes, &config)
                .with_context(|| format!("Couldn't decode {}", path.display()))?;
            match decoded.file_name {
                Some(file_name) => {
                    let Some(name) = Path::new(&file_name).file_name() else {
                        bail!("Recovered file name {file_name:?} isn't usable");
                    };
                    let target = dir.join(name);
                    fs::write(&target, &decoded.payload)
                        .with_context(|| format!("Couldn't create {}", target.display()))?;
                    info!("Wrote {}", target.display());
                }
                None => {
                    let mut stdout = std::io::stdout().lock();
                    stdout.write_all(&decoded.payload)?;
                    writeln!(stdout)?;
                }
            }
        }
        Command::Inspect { path } => {
            let bytes =
                fs::read(&path).with_context(|| format!("Couldn't open {}", path.display()))?;
            let summary = png_stash::inspect(&bytes)
                .with_context(|| format!("Couldn't read chunks of {}", path.display()))?;
            let now = time::OffsetDateTime::now_utc()
                .format(&time::format_description::well_known::Iso8601::DEFAULT)?;
            let chunks: Vec<_> = summary
                .chunks
                .iter()
                .map(|chunk| {
                    serde_json::json!({
                        "type": chunk.chunk_type,
                        "offset": chunk.offset,
                        "length": chunk.length,
                        "crc_valid": chunk.crc_valid,
                        "keyword": chunk.keyword,
                    })
                })
                .collect();
            let results = serde_json::json!({
                "inspected_at": now,
                "path": path.display().to_string(),
                "side": summary.side,
                "extra_bytes": summary.extra_bytes,
                "file_name": summary.file_name,
                "idat_chunks": summary.idat_count(),
                "chunks": chunks,
            });
            println!("{}", serde_json::to_string_pretty(&results)?);
        }
    }
    let elapsed = time::Duration::try_from(start.elapsed())?;
    info!("Done in {elapsed}");
    Ok(())
}
