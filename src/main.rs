use std::error::Error;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use log::{error, info};

use notif_icon_fixer::{
    FixOutcome, FixerConfig, IconEntry, IconFixer, IconOverrideProvider, JsonFileOverrides,
    NoOverrides, SmallIcon, decode_icon_bitmap, encode_icon_bitmap, silhouette,
};

/// Rewrite notification small icons into monochrome silhouettes.
#[derive(Parser)]
#[command(name = "notif-icon", version)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run the full override/silhouette chain for one package.
    Fix {
        /// Package that posted the notification.
        #[arg(long)]
        package: String,

        /// JSON file of `{packageName, iconBitmap}` overrides.
        #[arg(long)]
        overrides: Option<PathBuf>,

        /// JSON fixer configuration.
        #[arg(long)]
        config: Option<PathBuf>,

        input: PathBuf,
        output: PathBuf,
    },

    /// Apply the silhouette filter directly.
    Silhouette { input: PathBuf, output: PathBuf },

    /// Print the base64 `iconBitmap` value for an image.
    Encode { input: PathBuf },

    /// Decode a stored `iconBitmap` value into an image file.
    Decode { input: PathBuf, output: PathBuf },
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    match run(Cli::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn Error>> {
    match cli.command {
        Command::Fix {
            package,
            overrides,
            config,
            input,
            output,
        } => {
            let config = match config {
                Some(path) => FixerConfig::load(path)?,
                None => FixerConfig::default(),
            };
            match overrides {
                Some(path) => {
                    let fixer = IconFixer::new(config, JsonFileOverrides::new(path));
                    fix(fixer, package, input, output)
                }
                None => fix(IconFixer::new(config, NoOverrides), package, input, output),
            }
        }
        Command::Silhouette { input, output } => {
            let icon = image::open(&input)?.to_rgba8();
            silhouette(&icon)?.save(&output)?;
            info!("wrote {}", output.display());
            Ok(())
        }
        Command::Encode { input } => {
            let icon = image::open(&input)?.to_rgba8();
            println!("{}", encode_icon_bitmap(&icon)?);
            Ok(())
        }
        Command::Decode { input, output } => {
            let encoded = std::fs::read_to_string(&input)?;
            decode_icon_bitmap(&encoded)?.save(&output)?;
            info!("wrote {}", output.display());
            Ok(())
        }
    }
}

fn fix<P: IconOverrideProvider>(
    fixer: IconFixer<P>,
    package: String,
    input: PathBuf,
    output: PathBuf,
) -> Result<(), Box<dyn Error>> {
    let icon = image::open(&input)?.to_rgba8();
    let mut entry = IconEntry::with_bitmap(package, icon);

    match fixer.fix_or_keep(&mut entry) {
        FixOutcome::Override(_) => info!("icon replaced by override"),
        FixOutcome::Silhouette(_) => info!("icon replaced by silhouette"),
        FixOutcome::Unchanged(reason) => info!("icon unchanged: {reason:?}"),
    }

    if let Some(SmallIcon::Bitmap(bitmap)) = &entry.small_icon {
        bitmap.save(&output)?;
        info!("wrote {}", output.display());
    }
    Ok(())
}
