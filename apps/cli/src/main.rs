use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Parser, Subcommand};
use modlocale_core::{
    pack_archive, unpack_archive, GoogleTranslator, ModTranslator, PipelineConfig,
    ProgressReporter, RunStats,
};

#[derive(Parser)]
#[command(
    name = "modlocale",
    version,
    about = "Machine-translates Minecraft mod language files"
)]
struct Cli {
    #[command(subcommand)]
    cmd: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Translate a mod directory or .jar archive
    Translate {
        /// Mod directory or archive file
        path: PathBuf,

        /// Output root (directory input) or archive path (archive input).
        /// Defaults to writing beside the source.
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Locale tag the source files are named with
        #[arg(long, default_value = "en")]
        source_lang: String,

        /// Locale tag to translate into
        #[arg(long, default_value = "ru")]
        target_lang: String,
    },

    /// Unpack an archive into a directory
    Extract {
        archive: PathBuf,

        /// Directory to extract into (default: beside the archive)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Pack a directory back into an archive; stale signature entries are
    /// dropped so the result stays loadable
    Pack {
        dir: PathBuf,

        /// Archive to write (default: `<dir>.jar` beside the directory)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

struct ConsoleProgress;

impl ProgressReporter for ConsoleProgress {
    fn report(&self, message: &str) {
        println!("{message}");
    }
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    match cli.cmd {
        Commands::Translate {
            path,
            output,
            source_lang,
            target_lang,
        } => {
            let config = PipelineConfig {
                source_lang,
                target_lang,
                output_dir: None,
            };
            let mut translator = ModTranslator::new(Box::new(GoogleTranslator::new()), config)
                .with_progress(Box::new(ConsoleProgress));

            let stats = translator
                .run(&path, output.as_deref())
                .with_context(|| format!("failed to translate {}", path.display()))?;
            print_stats(&stats);
        }

        Commands::Extract { archive, output } => {
            let output_dir = output.unwrap_or_else(|| {
                archive
                    .parent()
                    .map(Path::to_path_buf)
                    .unwrap_or_else(|| PathBuf::from("."))
            });
            let extracted = unpack_archive(&archive, &output_dir)
                .with_context(|| format!("failed to unpack {}", archive.display()))?;
            println!("Unpacked into {}", extracted.display());
        }

        Commands::Pack { dir, output } => {
            let output_path = output.unwrap_or_else(|| {
                let name = dir.file_name().and_then(|n| n.to_str()).unwrap_or("mod");
                dir.with_file_name(format!("{name}.jar"))
            });
            let packed = pack_archive(&dir, &output_path)
                .with_context(|| format!("failed to pack {}", dir.display()))?;
            println!("Packed into {}", packed.display());
        }
    }

    Ok(())
}

fn print_stats(stats: &RunStats) {
    println!("{}", "=".repeat(50));
    println!("Files processed:    {}", stats.files_processed);
    println!("Entries translated: {}", stats.translated);
    println!("Entries skipped:    {}", stats.skipped);
    println!("{}", "=".repeat(50));
}
