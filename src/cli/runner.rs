use anyhow::{Context, Result, bail};
use tracing::{error, info, warn};

use rawsquare_rs::image_pipeline::{
    BatchConverter, BatchOptions, BatchResult, ConversionPolicy, RawDecodeParameters, RawDecoder,
    square_file,
};

use super::args::{CliArgs, Command, DevelopArgs};

fn decode_parameters(develop: &DevelopArgs) -> RawDecodeParameters {
    RawDecodeParameters::builder()
        .compression_level(develop.compression)
        .gamma(develop.gamma)
        .resize(develop.resize)
        .build()
}

fn report_failures(result: &BatchResult) {
    for failure in &result.failures {
        warn!("Failed: {}: {}", failure.path.display(), failure.reason);
    }
}

pub fn run(args: CliArgs) -> Result<()> {
    match args.command {
        Command::Convert { input_dir, output_dir, develop, format, method, fill } => {
            let policy = ConversionPolicy::new(&method, fill)?;
            let params = decode_parameters(&develop);
            let converter = BatchConverter::new()
                .with_options(BatchOptions::builder().output_format(format.into()).build());

            let result = converter
                .convert_directory(&input_dir, output_dir.as_deref(), &policy, &params)
                .inspect_err(|e| error!("Batch conversion aborted: {}", e))?;
            info!(
                "Converted {}/{} files from {}",
                result.converted,
                result.total_found,
                input_dir.display()
            );
        }
        Command::Raw { input, output, develop, timings } => {
            let params = decode_parameters(&develop);
            let decoder = RawDecoder::new();

            if timings {
                let (image, step_timings) = decoder.decode_with_timings(&input, &params)?;
                let output = output.unwrap_or_else(|| input.with_extension("png"));
                decoder
                    .encode(&image, &output, params.compression_level)
                    .with_context(|| format!("writing {}", output.display()))?;
                step_timings.print_summary();
                info!("Saved {}", output.display());
            } else {
                let output = decoder.convert_file(&input, output.as_deref(), &params)?;
                info!("Saved {}", output.display());
            }
        }
        Command::Square { input, output, square } => {
            let policy = ConversionPolicy::new(&square.method, square.fill)?;
            let output = square_file(&input, output.as_deref(), &policy, square.compression)?;
            info!("Saved {}", output.display());
        }
        Command::SquareDir { input_dir, output_dir, square } => {
            let policy = ConversionPolicy::new(&square.method, square.fill)?;
            let result = BatchConverter::new().square_directory(
                &input_dir,
                output_dir.as_deref(),
                &policy,
                square.compression,
            )?;
            report_failures(&result);

            if result.all_failed() {
                bail!(
                    "none of the {} images in {} could be converted",
                    result.total_found,
                    input_dir.display()
                );
            }
        }
    }
    Ok(())
}
