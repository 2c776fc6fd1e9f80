use std::path::PathBuf;

use audiorip_core::AudioFormat;
use clap::Parser;

const CLI_AFTER_HELP: &str = "Examples:\n  audiorip --input talk.mp4 --output talk.mp3\n  audiorip -i a.mov -i b.mkv --format flac\n  audiorip --list-formats";

/// Extract the audio track of a video file with ffmpeg.
#[derive(Debug, Parser)]
#[command(name = "audiorip", version, after_help = CLI_AFTER_HELP)]
pub struct Args {
    /// Input video file. Repeat to process several files one after another.
    #[arg(short, long = "input", value_name = "PATH", required_unless_present = "list_formats")]
    pub inputs: Vec<PathBuf>,

    /// Output audio file. Its extension selects the codec.
    #[arg(short, long, value_name = "PATH")]
    pub output: Option<PathBuf>,

    /// Output format used to name outputs when --output is absent.
    #[arg(short, long, value_name = "EXT")]
    pub format: Option<AudioFormat>,

    /// Path to the ffmpeg executable.
    #[arg(long, value_name = "PATH")]
    pub ffmpeg: Option<PathBuf>,

    /// Configuration file (defaults to $AUDIORIP_CONFIG, then ./audiorip.toml).
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Replace existing output files.
    #[arg(long)]
    pub overwrite: bool,

    /// Print one JSON result per input on stdout.
    #[arg(long)]
    pub json: bool,

    /// List supported output formats and exit.
    #[arg(long)]
    pub list_formats: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_args_are_consistent() {
        Args::command().debug_assert();
    }

    #[test]
    fn test_parse_inputs_and_format() {
        let args = Args::try_parse_from([
            "audiorip", "-i", "a.mov", "--input", "b.mkv", "--format", "FLAC",
        ])
        .unwrap();
        assert_eq!(args.inputs, vec![PathBuf::from("a.mov"), PathBuf::from("b.mkv")]);
        assert_eq!(args.format, Some(AudioFormat::Flac));
        assert!(args.output.is_none());
    }

    #[test]
    fn test_unknown_format_rejected() {
        let result = Args::try_parse_from(["audiorip", "-i", "a.mov", "--format", "ogg"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_input_required_unless_listing() {
        assert!(Args::try_parse_from(["audiorip"]).is_err());
        let args = Args::try_parse_from(["audiorip", "--list-formats"]).unwrap();
        assert!(args.list_formats);
        assert!(args.inputs.is_empty());
    }
}
