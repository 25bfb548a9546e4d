use std::{fs, path::PathBuf, process::ExitCode, time::Duration};

use arboard::Clipboard;
use clap::Parser;
use log::info;
use tumor_scan::{
    AnalysisClient, EndpointConfig, Rendered, SelectedImage, ViewState,
    constants::{DEFAULT_ENDPOINT, DEFAULT_TIMEOUT_SECS},
};

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Path to the scan image (JPEG, PNG, DICOM, or anything else)
    image_path: Option<PathBuf>,

    /// Inference endpoint that accepts the multipart upload
    #[arg(long, env = "TUMORSCAN_ENDPOINT", default_value = DEFAULT_ENDPOINT)]
    endpoint: String,

    /// Extra request header as NAME:VALUE; replaces the default tunnel bypass header
    #[arg(long = "header", value_name = "NAME:VALUE")]
    headers: Vec<String>,

    /// Request timeout in seconds
    #[arg(long, env = "TUMORSCAN_TIMEOUT", default_value_t = DEFAULT_TIMEOUT_SECS)]
    timeout: u64,

    /// Declared content type of the image instead of sniffing it
    #[arg(long)]
    content_type: Option<String>,

    /// Write the analysis to a .json file next to the input image
    #[arg(long)]
    json: bool,

    /// Copy the analysis to the clipboard
    #[arg(long)]
    clip: bool,
}

fn build_config(args: &Args) -> anyhow::Result<EndpointConfig> {
    let mut config = EndpointConfig::new(&args.endpoint)?
        .with_timeout(Duration::from_secs(args.timeout));

    if !args.headers.is_empty() {
        config = config.without_headers();
        for line in &args.headers {
            config = config.with_header_line(line)?;
        }
    }

    Ok(config)
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    env_logger::init();

    let args = Args::parse();
    let client = AnalysisClient::new(build_config(&args)?)?;
    let mut state = ViewState::default();

    if let Some(path) = &args.image_path {
        let image = SelectedImage::from_path(path, args.content_type.as_deref())?;
        match image.dimensions() {
            Some((w, h)) => info!("Selected image: {} ({}x{})", image.file_name(), w, h),
            None => info!("Selected image: {}", image.file_name()),
        }
        state.select(image);
    }

    state.submit(&client).await;

    match state.render() {
        Some(Rendered::Result(text)) => {
            if !args.json && !args.clip {
                println!("{}", text);
            }

            if let (true, Some(image_path)) = (args.json, &args.image_path) {
                let mut path = image_path.clone();
                path.set_extension("json");
                fs::write(&path, format!("{}\n", text))?;
                info!("analysis saved to {}", path.display());
            }

            if args.clip {
                match Clipboard::new() {
                    Ok(mut clipboard) => {
                        if let Err(e) = clipboard.set_text(text) {
                            eprintln!("Failed to copy to clipboard: {}", e);
                        }
                    }
                    Err(e) => eprintln!("Failed to initialize clipboard: {}", e),
                }
            }

            Ok(ExitCode::SUCCESS)
        }
        Some(Rendered::Error(message)) => {
            eprintln!("Error: {}", message);
            Ok(ExitCode::FAILURE)
        }
        None => Ok(ExitCode::FAILURE),
    }
}
