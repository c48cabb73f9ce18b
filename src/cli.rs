/// CLI argument parsing and help text

/// What the binary was asked to do
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Run the HTTP server; `port` overrides `PORT` when given
    Serve { port: Option<u16> },
    /// Print the segments for a text as JSON
    Segment(String),
    Help,
    Version,
}

/// Parse arguments (without the program name).
///
/// `--help` and `--version` win over everything else. `--server` selects
/// server mode. Otherwise `--segment TEXT`, or any bare words joined by spaces,
/// are segmented. No arguments at all prints help.
pub fn parse_args(args: &[String]) -> Result<Command, String> {
    if args.iter().any(|a| a == "-h" || a == "--help") {
        return Ok(Command::Help);
    }
    if args.iter().any(|a| a == "-v" || a == "--version") {
        return Ok(Command::Version);
    }

    if args.iter().any(|a| a == "--server") {
        let port = match args.iter().position(|a| a == "--port") {
            Some(pos) => {
                let value = args
                    .get(pos + 1)
                    .ok_or_else(|| "--port requires a value".to_string())?;
                Some(
                    value
                        .parse::<u16>()
                        .map_err(|_| format!("invalid port: {}", value))?,
                )
            }
            None => None,
        };
        return Ok(Command::Serve { port });
    }

    if let Some(pos) = args.iter().position(|a| a == "--segment") {
        let text = args[pos + 1..].join(" ");
        if text.is_empty() {
            return Err("--segment requires some text".to_string());
        }
        return Ok(Command::Segment(text));
    }

    if let Some(flag) = args.iter().find(|a| a.starts_with("--")) {
        return Err(format!("unknown option: {}", flag));
    }

    if args.is_empty() {
        return Ok(Command::Help);
    }

    Ok(Command::Segment(args.join(" ")))
}

pub fn print_help() {
    let version = env!("CARGO_PKG_VERSION");
    println!("Segment TTS Server v{}", version);
    println!("Text segmentation and sequential speech synthesis over DashScope");
    println!();
    println!("USAGE:");
    println!("    segment_tts_server [OPTIONS] [TEXT]");
    println!();
    println!("OPTIONS:");
    println!("    --server              Start HTTP server mode");
    println!("    --port <PORT>         Server port (default: PORT or 3000)");
    println!("    --segment <TEXT>      Print the segments for TEXT as JSON");
    println!("    -h, --help            Print this help message");
    println!("    -v, --version         Print version information");
    println!();
    println!("EXAMPLES:");
    println!("    # Start HTTP server on default port 3000");
    println!("    segment_tts_server --server");
    println!();
    println!("    # Start server on custom port");
    println!("    segment_tts_server --server --port 8080");
    println!();
    println!("    # Show how a text would be split before synthesis");
    println!("    segment_tts_server \"今天天气很好。我们去公园散步吧！\"");
    println!();
    println!("SERVER ENDPOINTS:");
    println!("    POST   /tts                       - Synthesize text in one provider call");
    println!("    POST   /tts/segments              - Segment text and synthesize each segment");
    println!("    POST   /tts/segments?debugSample=1 - Same, using the built-in sample text");
    println!("    GET    /health                    - Health check");
    println!();
    println!("ENVIRONMENT VARIABLES:");
    println!("    DASHSCOPE_API_KEY                - DashScope API key (required for synthesis)");
    println!("    DASHSCOPE_API_URL                - Generation endpoint URL");
    println!("    DASHSCOPE_MODEL                  - Model name (default: qwen3-tts-flash)");
    println!("    DASHSCOPE_LANGUAGE_TYPE          - Language type (default: Chinese)");
    println!("    TTS_DEFAULT_VOICE                - Voice when none is given (default: Jennifer)");
    println!("    TTS_MAX_SEGMENT_LENGTH           - Hard segment limit in characters (default: 400)");
    println!("    TTS_SAFE_SEGMENT_LENGTH          - Preferred segment length (default: 380)");
    println!("    TTS_MAX_TEXT_LENGTH              - Longest accepted text (default: 10000)");
    println!("    REQUEST_TIMEOUT_SECONDS          - Request timeout in seconds (default: 60)");
    println!("    PROVIDER_TIMEOUT_SECONDS         - Provider call timeout in seconds (default: 30)");
    println!("    SEGMENT_TTS_LOG_DIR              - Directory for access/application logs");
    println!("    RUST_LOG                         - Log level (error/warn/info/debug/trace)");
    println!();
    println!("CONFIGURATION:");
    println!("    Settings can also be placed in a .env file in the working directory");
}

pub fn print_version() {
    println!("Segment TTS Server v{}", env!("CARGO_PKG_VERSION"));
}
