pub mod config;
pub mod session;
pub mod testing;
pub mod transcoder;

pub use config::{
    load_config, load_config_from_str, load_config_or_default, validate_config, Config,
    ConfigError, OutputConfig,
};
pub use session::{
    resolve_drop, suggested_name, DerivedDestination, DestinationChooser, DropDecision, DropItem,
    DropPayload, FixedDestination, Session, SessionStatus, Submission,
};
pub use transcoder::{
    resolve_codec, AudioFormat, EngineConfig, ErrorKind, FfmpegTranscoder, TranscodeError,
    TranscodeOutcome, TranscodeRequest, TranscodeResult, Transcoder,
};
