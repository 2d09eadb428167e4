use std::process::ExitCode;

use engine::{AppError, ControlLoop, LoopConfig, PixelSurface, PlatformError, WinitPlatform};
use tracing::{error, info};

use super::bootstrap::AppWiring;
use super::gameplay::{BlockField, FieldRenderer};

pub(crate) fn run(app: AppWiring) -> ExitCode {
    if let Err(err) = run_block_field(&app.config) {
        error!(error = %err, "startup_failed");
        return ExitCode::FAILURE;
    }

    ExitCode::SUCCESS
}

fn run_block_field(config: &LoopConfig) -> Result<(), AppError> {
    let platform = WinitPlatform::new(&config.window_config())?;
    let window = platform
        .window()
        .ok_or(AppError::Platform(PlatformError::DisplayUnavailable))?;
    let surface = PixelSurface::new(window).map_err(AppError::CreateRenderer)?;

    let mut control_loop = ControlLoop::new(
        platform,
        BlockField::new(),
        FieldRenderer::new(surface),
        config,
    )?;
    info!(
        width = config.window_width,
        height = config.window_height,
        "block_field_started"
    );

    control_loop.run();
    control_loop.destroy();
    Ok(())
}
