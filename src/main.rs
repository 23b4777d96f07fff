use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{error, info};
use tracing_subscriber::{fmt, EnvFilter};

use face_overlay::render::{self, SummaryTable};
use face_overlay::{
    AngleUnit, AppConfig, DetectionParams, Detector, OverlayOptions, RekognitionDetector,
    ReplayDetector, Session,
};

/// Detect faces on an image and draw their boxes and head pose over it.
#[derive(Debug, Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Image to submit (JPEG, PNG, ...)
    image: PathBuf,

    /// JSON configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Replay a recorded DetectFaces JSON response instead of calling Rekognition
    #[arg(long)]
    replay: Option<PathBuf>,

    /// Where to write the HTML page
    #[arg(long, default_value = "overlay.html")]
    html: PathBuf,

    /// Also write the image with the overlays burnt in
    #[arg(long)]
    png: Option<PathBuf>,

    /// Also write the computed overlay geometry as JSON
    #[arg(long)]
    json: Option<PathBuf>,

    /// How pose angles enter sin/cos: raw or degrees
    #[arg(long)]
    angle_unit: Option<AngleUnit>,

    /// Length of the direction lines, in percent of the image
    #[arg(long)]
    line_length: Option<f64>,

    /// AWS region of the Rekognition endpoint
    #[arg(long)]
    region: Option<String>,
}

impl Cli {
    fn overlay_options(&self, config: &AppConfig) -> OverlayOptions {
        let mut options = config.overlay;
        if let Some(angle_unit) = self.angle_unit {
            options.angle_unit = angle_unit;
        }
        if let Some(line_length) = self.line_length {
            options.line_length = line_length;
        }
        options
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    match run(cli).await {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::from(2),
        Err(err) => {
            error!("{:#}", err);
            ExitCode::FAILURE
        }
    }
}

/// Returns whether the detection succeeded. Outputs are written either way.
async fn run(cli: Cli) -> Result<bool> {
    let mut config = AppConfig::load_or_default(cli.config.as_deref())
        .context("Failed to load configuration")?;
    if let Some(region) = &cli.region {
        config.detection.region = region.clone();
    }
    let options = cli.overlay_options(&config);
    config.overlay = options;
    config.validate().context("Invalid command line options")?;

    let image = face_overlay::load_image(&cli.image)
        .await
        .context("Failed to read image")?;
    let mut session = Session::new();
    session.select_image(image);

    let params = config.detection.params();
    match &cli.replay {
        Some(path) => submit(&mut session, &ReplayDetector::new(path), &params).await?,
        None => {
            let detector = RekognitionDetector::from_config(&config.detection).await;
            submit(&mut session, &detector, &params).await?
        }
    }

    let view = session.view(&options);
    print!("{}", SummaryTable(&view.overlays));

    render::write_html(&cli.html, &view).context("Failed to write HTML page")?;
    if let Some(path) = &cli.png {
        render::write_raster(path, &view).context("Failed to write annotated image")?;
    }
    if let Some(path) = &cli.json {
        render::write_json(path, &view.overlays).context("Failed to write overlay geometry")?;
    }

    match view.error {
        Some(message) => {
            error!("{}", message);
            Ok(false)
        }
        None => Ok(true),
    }
}

async fn submit<D: Detector>(
    session: &mut Session,
    detector: &D,
    params: &DetectionParams,
) -> Result<()> {
    let transition = session.detect_with(detector, params).await?;
    info!("Submission finished: {:?}", transition);
    Ok(())
}
