use std::env;

use crate::error::{UngzError, UngzResult};

#[derive(Debug, Clone)]
pub struct UngzArgs {
    pub files: Vec<String>,
    pub force: bool,
    pub list: bool,
    pub quiet: bool,
    pub verbose: bool,
    pub verbosity: u8,
    pub help: bool,
    pub version: bool,
}

impl Default for UngzArgs {
    fn default() -> Self {
        UngzArgs {
            files: Vec::new(),
            force: false,
            list: false,
            quiet: false,
            verbose: false,
            verbosity: 1,
            help: false,
            version: false,
        }
    }
}

impl UngzArgs {
    pub fn parse() -> UngzResult<Self> {
        Self::parse_from(env::args().skip(1).collect())
    }

    fn parse_from(argv: Vec<String>) -> UngzResult<Self> {
        let mut args = UngzArgs::default();
        let mut in_options = true;

        for arg in argv {
            if !in_options || !arg.starts_with('-') || arg == "-" {
                args.files.push(arg);
                continue;
            }

            if arg == "--" {
                in_options = false;
                continue;
            }

            if let Some(long) = arg.strip_prefix("--") {
                match long {
                    "help" => args.help = true,
                    "version" => args.version = true,
                    "force" => args.force = true,
                    "list" => args.list = true,
                    "quiet" | "silent" => {
                        args.quiet = true;
                        args.verbosity = 0;
                    }
                    "verbose" => {
                        args.verbose = true;
                        args.verbosity = 2;
                    }
                    _ => {
                        return Err(UngzError::invalid_argument(format!(
                            "unknown option: {}",
                            arg
                        )))
                    }
                }
            } else {
                // Bundled short options: -fv is -f -v
                for c in arg.chars().skip(1) {
                    match c {
                        'f' => args.force = true,
                        'l' => args.list = true,
                        'q' => {
                            args.quiet = true;
                            args.verbosity = 0;
                        }
                        'v' => {
                            args.verbose = true;
                            args.verbosity = 2;
                        }
                        'h' => args.help = true,
                        'V' => args.version = true,
                        _ => {
                            return Err(UngzError::invalid_argument(format!(
                                "unknown option: -{}",
                                c
                            )))
                        }
                    }
                }
            }
        }

        Ok(args)
    }
}
