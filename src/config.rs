use crate::constants::{DEBUG_GRID_HEIGHT, DEBUG_GRID_WIDTH, DEBUG_MAX_FRAMES, DEFAULT_LOG_FILE};

/// Command-line options. Problems are collected in `warnings` because the
/// logger is configured from these options and is not running yet.
#[derive(Clone, Debug, PartialEq)]
pub struct GameConfig {
    pub debug: bool,
    pub grid_width: u16,
    pub grid_height: u16,
    pub max_frames: Option<u64>,
    pub seed: Option<u64>,
    pub log_file: String,
    pub verbose: bool,
    pub warnings: Vec<String>,
}

impl Default for GameConfig {
    fn default() -> Self {
        GameConfig {
            debug: false,
            grid_width: DEBUG_GRID_WIDTH,
            grid_height: DEBUG_GRID_HEIGHT,
            max_frames: None,
            seed: None,
            log_file: DEFAULT_LOG_FILE.to_string(),
            verbose: false,
            warnings: Vec::new(),
        }
    }
}

impl GameConfig {
    /// `--debug [W H [MAX_FRAMES]]`, `--seed N`, `--log-file PATH`, `--verbose`.
    pub fn from_args<I: IntoIterator<Item = String>>(args: I) -> Self {
        let mut config = GameConfig::default();
        let mut args = args.into_iter().peekable();

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--debug" => {
                    config.debug = true;
                    config.max_frames = Some(DEBUG_MAX_FRAMES);
                    let mut positional = Vec::new();
                    while positional.len() < 3 {
                        match args.peek() {
                            Some(next) if !next.starts_with("--") => positional.push(args.next().unwrap_or_default()),
                            _ => break,
                        }
                    }
                    if let Some(width) = positional.first() {
                        config.grid_width = config.parse_or(width, "debug width", DEBUG_GRID_WIDTH).max(1);
                    }
                    if let Some(height) = positional.get(1) {
                        config.grid_height = config.parse_or(height, "debug height", DEBUG_GRID_HEIGHT).max(1);
                    }
                    if let Some(frames) = positional.get(2) {
                        config.max_frames = Some(config.parse_or(frames, "max frames", DEBUG_MAX_FRAMES));
                    }
                }
                "--seed" => match args.next() {
                    Some(value) => match value.parse::<u64>() {
                        Ok(seed) => config.seed = Some(seed),
                        Err(_) => config.warnings.push(format!("Ignoring unparsable seed '{}'", value)),
                    },
                    None => config.warnings.push("--seed needs a value".to_string()),
                },
                "--log-file" => match args.next() {
                    Some(path) => config.log_file = path,
                    None => config.warnings.push("--log-file needs a value".to_string()),
                },
                "--verbose" => config.verbose = true,
                other => config.warnings.push(format!("Ignoring unknown argument '{}'", other)),
            }
        }
        config
    }

    fn parse_or<T: std::str::FromStr>(&mut self, value: &str, what: &str, default: T) -> T {
        value.parse::<T>().unwrap_or_else(|_| {
            self.warnings.push(format!("Unparsable {} '{}', using default", what, value));
            default
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> GameConfig {
        GameConfig::from_args(args.iter().map(|s| s.to_string()))
    }

    #[test]
    fn test_no_arguments_is_interactive() {
        let config = parse(&[]);
        assert!(!config.debug);
        assert_eq!(config.max_frames, None);
        assert_eq!(config.log_file, DEFAULT_LOG_FILE);
        assert!(config.warnings.is_empty());
    }

    #[test]
    fn test_debug_with_geometry_and_frames() {
        let config = parse(&["--debug", "100", "30", "250", "--seed", "9"]);
        assert!(config.debug);
        assert_eq!((config.grid_width, config.grid_height), (100, 30));
        assert_eq!(config.max_frames, Some(250));
        assert_eq!(config.seed, Some(9));
    }

    #[test]
    fn test_debug_defaults() {
        let config = parse(&["--debug", "--verbose"]);
        assert_eq!((config.grid_width, config.grid_height), (DEBUG_GRID_WIDTH, DEBUG_GRID_HEIGHT));
        assert_eq!(config.max_frames, Some(DEBUG_MAX_FRAMES));
        assert!(config.verbose);
    }

    #[test]
    fn test_bad_values_fall_back_with_warning() {
        let config = parse(&["--debug", "wide", "30", "--seed", "x", "--bogus"]);
        assert_eq!(config.grid_width, DEBUG_GRID_WIDTH);
        assert_eq!(config.grid_height, 30);
        assert_eq!(config.seed, None);
        assert_eq!(config.warnings.len(), 3);
    }
}
