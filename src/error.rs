use std::path::PathBuf;

/// Fatal conditions that stop the notice from being written
#[derive(Debug, thiserror::Error)]
pub enum NoticeError {
    #[error("Path to license file must be provided.")]
    MissingManifestArg,
    #[error("Path to licenses.json must be provided before the --include flag.")]
    IncludeBeforeManifest,
    #[error("The --include flag must be followed by a filename.")]
    MissingIncludeValue,
    /// `--help` or `--version` was requested, the text is in the clap error
    #[error("{0}")]
    HelpOrVersion(clap::Error),
    /// any other argument the parser rejected
    #[error("{0}")]
    Usage(String),
    #[error("The file at {} does not exist.", .0.display())]
    NotFound(PathBuf),
    #[error("Failed to parse {}. Ensure it is a valid JSON object of dependencies", .path.display())]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("Failed to read {}", .path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Failed to read include file at {}", .path.display())]
    IncludeRead {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Failed to write {}", .path.display())]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
}

impl NoticeError {
    /// true if the error came from a bad command line, in which case the usage line is useful
    pub fn is_usage(&self) -> bool {
        matches!(
            self,
            NoticeError::MissingManifestArg
                | NoticeError::IncludeBeforeManifest
                | NoticeError::MissingIncludeValue
                | NoticeError::Usage(_)
        )
    }
}
