#[cfg(not(all(feature = "script", feature = "export-wav")))]
fn main() {
    eprintln!(
        "vsu-render requires the \"script\" and \"export-wav\" features. Rebuild with default features enabled."
    );
}

#[cfg(all(feature = "script", feature = "export-wav"))]
mod cli {
    use std::path::PathBuf;

    use anyhow::Context;
    use clap::Parser;
    use tracing_subscriber::EnvFilter;

    use vsu::{write_wav, RegisterScript, StreamConfig};

    #[derive(Parser)]
    #[command(name = "vsu-render")]
    #[command(about = "Render a Virtual Boy VSU register script to WAV")]
    struct Args {
        /// JSON register script
        script: PathBuf,

        /// Output WAV file
        #[arg(short, long, default_value = "out.wav")]
        output: PathBuf,

        /// Frames per advance call; writes land on these boundaries
        #[arg(long)]
        buffer_frames: Option<usize>,

        /// JSON stream configuration (buffer_frames, ring_buffer_size)
        #[arg(long)]
        config: Option<PathBuf>,

        /// Also play the rendered audio on the default output device
        #[arg(long)]
        play: bool,
    }

    fn load_config(args: &Args) -> anyhow::Result<StreamConfig> {
        let mut config = match &args.config {
            Some(path) => {
                let text = std::fs::read_to_string(path)
                    .with_context(|| format!("reading config {}", path.display()))?;
                serde_json::from_str(&text)
                    .with_context(|| format!("parsing config {}", path.display()))?
            }
            None => StreamConfig::default(),
        };
        if let Some(buffer_frames) = args.buffer_frames {
            config.buffer_frames = buffer_frames;
        }
        config.validate()?;
        Ok(config)
    }

    pub fn run() -> anyhow::Result<()> {
        tracing_subscriber::fmt()
            .with_env_filter(
                EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
            )
            .init();

        let args = Args::parse();
        let config = load_config(&args)?;

        let script = RegisterScript::from_file(&args.script)
            .with_context(|| format!("loading script {}", args.script.display()))?;
        let frames = script.render(&config)?;

        let seconds = frames.len() as f32 / config.sample_rate as f32;
        tracing::info!(frames = frames.len(), seconds, "rendered");

        write_wav(&frames, &args.output)
            .with_context(|| format!("writing {}", args.output.display()))?;
        println!("Wrote {} ({:.2}s)", args.output.display(), seconds);

        if args.play {
            play(&frames, &config)?;
        }

        Ok(())
    }

    #[cfg(feature = "streaming")]
    fn play(frames: &vsu::AudioFrames, config: &StreamConfig) -> anyhow::Result<()> {
        vsu::streaming::play_frames(frames, config)?;
        Ok(())
    }

    #[cfg(not(feature = "streaming"))]
    fn play(_frames: &vsu::AudioFrames, _config: &StreamConfig) -> anyhow::Result<()> {
        anyhow::bail!("--play requires the \"streaming\" feature. Rebuild with `--features streaming`.")
    }
}

#[cfg(all(feature = "script", feature = "export-wav"))]
fn main() -> anyhow::Result<()> {
    cli::run()
}
